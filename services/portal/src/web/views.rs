//! services/portal/src/web/views.rs
//!
//! Form payloads and the JSON view models handed to presentation. Each view
//! carries exactly what the corresponding page template needs.

use attendance_core::domain::{AbsenceSummary, AttendanceRecord, Cell, GradeTable, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

//=========================================================================================
// Form Payloads
//=========================================================================================

/// Absent fields deserialize as empty strings.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegistrationForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

//=========================================================================================
// Page View Models
//=========================================================================================

/// A form page (login or registration) with an optional message to display.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FormPage {
    pub page: String,
    pub message: Option<String>,
}

impl FormPage {
    pub fn login(message: Option<&str>) -> Self {
        Self {
            page: "login".to_string(),
            message: message.map(str::to_string),
        }
    }

    pub fn registration(message: Option<&str>) -> Self {
        Self {
            page: "inscription".to_string(),
            message: message.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HomePage {
    pub page: String,
    pub user_id: i64,
}

impl HomePage {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            page: "accueil".to_string(),
            user_id: user_id.get(),
        }
    }
}

/// The grades relation as stored: column names and raw values.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GradeTableView {
    pub columns: Vec<String>,
    #[schema(value_type = Vec<Vec<Object>>)]
    pub rows: Vec<Vec<Value>>,
}

impl From<GradeTable> for GradeTableView {
    fn from(table: GradeTable) -> Self {
        Self {
            columns: table.columns,
            rows: table
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(cell_to_json).collect())
                .collect(),
        }
    }
}

fn cell_to_json(cell: Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Integer(n) => Value::from(n),
        // NaN and infinities have no JSON form.
        Cell::Real(x) => serde_json::Number::from_f64(x)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Text(s) => Value::String(s),
        Cell::Blob(bytes) => Value::from(bytes),
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AttendanceRecordView {
    pub student_name: String,
    pub subject_name: String,
    pub date: String,
    pub status: String,
}

impl From<AttendanceRecord> for AttendanceRecordView {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            status: record.status,
            student_name: record.student_name,
            subject_name: record.subject_name,
            date: record.date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AbsenceSummaryView {
    pub student_name: String,
    pub subject_name: String,
    pub total_absences: i64,
}

impl From<AbsenceSummary> for AbsenceSummaryView {
    fn from(summary: AbsenceSummary) -> Self {
        Self {
            student_name: summary.student_name,
            subject_name: summary.subject_name,
            total_absences: summary.total_absences,
        }
    }
}
