//! Gradebook configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    /// `LISTEN_ADDR` is not a socket address.
    #[error("invalid LISTEN_ADDR {value:?}: {source}")]
    InvalidListenAddr {
        /// Raw value.
        value: String,
        /// Parser error.
        source: std::net::AddrParseError,
    },

    /// The admin password points at a file that cannot be read.
    #[error("cannot read admin password file {}: {source}", path.display())]
    PasswordFile {
        /// Password file path.
        path: PathBuf,
        /// OS error.
        source: std::io::Error,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level gradebook configuration.
///
/// Loaded once at startup via [`GradebookConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GradebookConfig {
    /// Socket address to bind the HTTP server to (e.g. `127.0.0.1:8080`).
    pub listen_addr: SocketAddr,

    /// Directory holding `students.txt` and `db.json`.
    pub data_dir: PathBuf,

    /// Basic-auth username for admin routes.
    pub admin_user: String,

    /// Basic-auth password for admin routes.
    pub admin_pass: String,

    /// Reject submissions for names missing from the roster.
    pub require_roster_match: bool,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl GradebookConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing,
    /// `LISTEN_ADDR` does not parse, or the password file is unreadable.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `GRADEBOOK_ADMIN_PASS` names a file when such a file exists, in
    /// which case its contents (minus the trailing newline) are used.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let listen_addr: SocketAddr = raw_addr
            .parse()
            .map_err(|source| ConfigError::InvalidListenAddr {
                value: raw_addr.clone(),
                source,
            })?;

        let data_dir = lookup("GRADEBOOK_DATA_DIR")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("GRADEBOOK_DATA_DIR"))?;

        let admin_user = lookup("GRADEBOOK_ADMIN_USER").unwrap_or_else(|| "admin".to_string());
        let admin_pass = resolve_secret(
            lookup("GRADEBOOK_ADMIN_PASS").ok_or(ConfigError::Missing("GRADEBOOK_ADMIN_PASS"))?,
        )?;

        let require_roster_match =
            parse_bool(lookup("GRADEBOOK_REQUIRE_ROSTER_MATCH").as_deref(), false);

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            data_dir,
            admin_user,
            admin_pass,
            require_roster_match,
            log_format,
        })
    }
}

/// Uses the file contents when `value` names an existing file, else the
/// value itself.
fn resolve_secret(value: String) -> Result<String, ConfigError> {
    let path = PathBuf::from(&value);
    if !path.is_file() {
        return Ok(value);
    }
    std::fs::read_to_string(&path)
        .map(|contents| contents.trim_end_matches(['\n', '\r']).to_string())
        .map_err(|source| ConfigError::PasswordFile { path, source })
}

/// Parses a boolean flag. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
