//! Application-wide defaults

use std::time::Duration;

pub const DEFAULT_DB_FILE: &str = "./cadastro.json"; // Registration store
pub const DEFAULT_LOG_FILE: &str = "./cadastro.log";
pub const DB_FILE_VAR: &str = "CADASTRO_DB";
pub const LOG_FILE_VAR: &str = "CADASTRO_LOG";

/// An admin session lapses this long after login
pub const SESSION_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);
