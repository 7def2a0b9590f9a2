pub mod db;
pub mod password;
pub mod sessions;

pub use db::DbAdapter;
pub use password::Argon2Hasher;
pub use sessions::MemorySessionStore;
