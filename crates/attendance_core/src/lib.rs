pub mod auth;
pub mod domain;
pub mod ports;

pub use auth::{AuthService, RegistrationOutcome};
pub use domain::{
    AbsenceSummary, AttendanceRecord, AttendanceStatus, AuthSession, Cell, GradeTable, Identity,
    User, UserCredentials, UserId,
};
pub use ports::{
    CredentialHasher, PortError, PortResult, RecordsQuery, SessionStore, UserRepository,
};
