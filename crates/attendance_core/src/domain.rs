//! crates/attendance_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;

/// Opaque identifier of a registered user, backed by the store's row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything a browser session can be bound to.
pub trait Identity {
    fn identity(&self) -> UserId;
}

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

impl Identity for User {
    fn identity(&self) -> UserId {
        self.id
    }
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
}

impl UserCredentials {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// How a stored status value is classified.
///
/// Matching is exact, so that a record reads as `Absent` here exactly when
/// the absence summary counts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Other,
}

impl AttendanceStatus {
    /// Raw value used by the store for absences.
    pub const ABSENT: &'static str = "absent";

    pub fn classify(raw: &str) -> Self {
        match raw {
            Self::ABSENT => Self::Absent,
            "present" | "présent" => Self::Present,
            _ => Self::Other,
        }
    }
}

/// One row of the attendance log. `status` is the stored value, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub student_name: String,
    pub subject_name: String,
    pub date: String,
    pub status: String,
}

impl AttendanceRecord {
    pub fn status_kind(&self) -> AttendanceStatus {
        AttendanceStatus::classify(&self.status)
    }
}

/// Number of absences of one student in one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceSummary {
    pub student_name: String,
    pub subject_name: String,
    pub total_absences: i64,
}

/// A single value of the grades relation, tagged with its storage class.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// The grades relation re-exposed verbatim: column names plus rows in store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}
