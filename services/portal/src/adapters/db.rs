//! services/portal/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `UserRepository` and `RecordsQuery` ports from the `core` crate. It handles
//! all interactions with the SQLite store using `sqlx`.
//!
//! The schema is owned outside this service; table and column names follow the
//! deployed database.

use async_trait::async_trait;
use attendance_core::domain::{
    AbsenceSummary, AttendanceRecord, AttendanceStatus, Cell, GradeTable, User, UserCredentials,
    UserId,
};
use attendance_core::ports::{PortError, PortResult, RecordsQuery, UserRepository};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, FromRow, Row, TypeInfo, ValueRef};
use tracing::{debug, info};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the store-facing ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the connection pool used for the lifetime of the service.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        info!("Opening SQLite pool ({} connections max)", max_connections);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Waits for checked-out connections to be returned, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite pool closed.");
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    email: String,
    // Older rows hold the hash as a BLOB; TEXT decodes as bytes too.
    mot_de_passe: Vec<u8>,
}
impl UserRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            id: UserId::new(self.id),
            email: self.email,
            password_hash: String::from_utf8_lossy(&self.mot_de_passe).into_owned(),
        }
    }
}

#[derive(FromRow)]
struct PresenceRecord {
    nom_etudiant: String,
    nom_matiere: String,
    date_absence: String,
    statut_absence: String,
}
impl PresenceRecord {
    fn to_domain(self) -> AttendanceRecord {
        AttendanceRecord {
            student_name: self.nom_etudiant,
            subject_name: self.nom_matiere,
            date: self.date_absence,
            status: self.statut_absence,
        }
    }
}

#[derive(FromRow)]
struct AbsenceRecapRecord {
    nom_etudiant: String,
    nom_matiere: String,
    total_absences: i64,
}
impl AbsenceRecapRecord {
    fn to_domain(self) -> AbsenceSummary {
        AbsenceSummary {
            student_name: self.nom_etudiant,
            subject_name: self.nom_matiere,
            total_absences: self.total_absences,
        }
    }
}

/// Decodes one column by the storage class of the value actually stored,
/// since SQLite does not enforce declared column types.
fn decode_cell(row: &SqliteRow, index: usize) -> Result<Cell, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Cell::Null);
    }
    let kind = raw.type_info().name().to_string();
    let cell = match kind.as_str() {
        "INTEGER" => Cell::Integer(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" => Cell::Real(row.try_get_unchecked::<f64, _>(index)?),
        "BLOB" => Cell::Blob(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        _ => Cell::Text(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(cell)
}

//=========================================================================================
// `UserRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserRepository for DbAdapter {
    async fn find_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, mot_de_passe FROM utilisateurs WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(UserRecord::to_domain))
    }

    async fn email_exists(&self, email: &str) -> PortResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM utilisateurs WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(count > 0)
    }

    async fn insert_user(&self, email: &str, password_hash: &str) -> PortResult<User> {
        // A single conditional statement, so two concurrent registrations of
        // the same email cannot both insert.
        let result = sqlx::query(
            "INSERT INTO utilisateurs (email, mot_de_passe) \
             SELECT ?1, ?2 WHERE NOT EXISTS (SELECT 1 FROM utilisateurs WHERE email = ?1)",
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                PortError::Conflict(format!("email {} already registered", email))
            } else {
                unexpected(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(PortError::Conflict(format!("email {} already registered", email)));
        }

        let id = UserId::new(result.last_insert_rowid());
        debug!("Inserted user {}", id);
        Ok(User {
            id,
            email: email.to_string(),
        })
    }
}

//=========================================================================================
// `RecordsQuery` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecordsQuery for DbAdapter {
    async fn grades(&self) -> PortResult<GradeTable> {
        let rows = sqlx::query("SELECT * FROM Notes")
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        let header: Option<Vec<String>> = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect());

        let cells = rows
            .iter()
            .map(|row| {
                (0..row.len())
                    .map(|i| decode_cell(row, i))
                    .collect::<Result<Vec<Cell>, _>>()
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(unexpected)?;
        drop(rows);

        let columns = match header {
            Some(columns) => columns,
            None => grade_columns(&self.pool).await?,
        };

        Ok(GradeTable {
            columns,
            rows: cells,
        })
    }

    async fn attendance_log(&self) -> PortResult<Vec<AttendanceRecord>> {
        let records = sqlx::query_as::<_, PresenceRecord>(
            "SELECT nom_etudiant, nom_matiere, date_absence, statut_absence FROM Presences",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(PresenceRecord::to_domain).collect())
    }

    async fn absence_summary(&self) -> PortResult<Vec<AbsenceSummary>> {
        let records = sqlx::query_as::<_, AbsenceRecapRecord>(
            "SELECT nom_etudiant, nom_matiere, COUNT(*) AS total_absences \
             FROM Presences \
             WHERE statut_absence = ? \
             GROUP BY nom_etudiant, nom_matiere",
        )
        .bind(AttendanceStatus::ABSENT)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(AbsenceRecapRecord::to_domain).collect())
    }
}

/// Column names of the grades relation when it holds no rows.
async fn grade_columns(pool: &SqlitePool) -> PortResult<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info('Notes')")
        .fetch_all(pool)
        .await
        .map_err(unexpected)?;
    Ok(names)
}
