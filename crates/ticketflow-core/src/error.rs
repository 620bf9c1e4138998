use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for scripts and agents driving the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    NotAuthenticated,
    TicketNotFound,
    ValidationFailed,
    StorageReadFailed,
    StorageWriteFailed,
    LockContention,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::NotAuthenticated => "E1101",
            Self::TicketNotFound => "E2001",
            Self::ValidationFailed => "E2101",
            Self::StorageReadFailed => "E5003",
            Self::StorageWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::NotAuthenticated => "Not logged in",
            Self::TicketNotFound => "Ticket not found",
            Self::ValidationFailed => "Form validation failed",
            Self::StorageReadFailed => "Storage read failed",
            Self::StorageWriteFailed => "Storage write failed",
            Self::LockContention => "Lock contention",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .ticketflow/config.toml and retry."),
            Self::NotAuthenticated => Some("Run `tf login` first."),
            Self::TicketNotFound => Some("Run `tf list` to see ticket IDs."),
            Self::ValidationFailed => Some("Please fix the errors in the form."),
            Self::StorageReadFailed => Some("Check that .ticketflow/ is readable."),
            Self::StorageWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `tf` process releases its lock."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures of a [`KeyValueStore`](crate::storage::KeyValueStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lock timed out after {waited:?} at {path}")]
    LockTimeout {
        path: PathBuf,
        waited: std::time::Duration,
    },

    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Machine-readable code associated with this storage error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::StorageReadFailed,
            Self::Write { .. } | Self::Unavailable(_) => ErrorCode::StorageWriteFailed,
            Self::LockTimeout { .. } => ErrorCode::LockContention,
            Self::Encode { .. } => ErrorCode::InternalUnexpected,
        }
    }
}

/// Top-level error for operations that callers surface to the user.
#[derive(Debug, thiserror::Error)]
pub enum TicketflowError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("ticket '{id}' not found")]
    TicketNotFound { id: String },

    #[error("not logged in")]
    NotAuthenticated,
}

impl TicketflowError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Storage(err) => err.code(),
            Self::TicketNotFound { .. } => ErrorCode::TicketNotFound,
            Self::NotAuthenticated => ErrorCode::NotAuthenticated,
        }
    }

    /// Remediation hint, falling back to the code's generic message.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, StorageError, TicketflowError};
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::NotAuthenticated,
            ErrorCode::TicketNotFound,
            ErrorCode::ValidationFailed,
            ErrorCode::StorageReadFailed,
            ErrorCode::StorageWriteFailed,
            ErrorCode::LockContention,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::TicketNotFound.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn storage_errors_map_to_codes() {
        let timeout = StorageError::LockTimeout {
            path: PathBuf::from("/tmp/storage.lock"),
            waited: Duration::from_millis(5),
        };
        assert_eq!(timeout.code(), ErrorCode::LockContention);

        let wrapped = TicketflowError::from(timeout);
        assert_eq!(wrapped.error_code(), ErrorCode::LockContention);
        assert!(wrapped.suggestion().contains("Retry"));
    }

    #[test]
    fn not_found_carries_id() {
        let err = TicketflowError::TicketNotFound { id: "42".into() };
        assert!(err.to_string().contains("42"));
        assert_eq!(err.error_code().code(), "E2001");
    }
}
