use thiserror::Error;

/// The three error kinds recognized at every adapter boundary.
///
/// `Transient` failures are retried implicitly by the next cycle; `Permanent`
/// failures skip the offending unit without retry; `Fatal` failures abort the
/// process and let the supervisor (systemd, k8s, ...) restart it.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("transient error: {0}")]
    Transient(String),

    #[error("permanent error: {0}")]
    Permanent(String),

    #[error("fatal error: {0}")]
    Fatal(String),

    /// A history record for this `(article_id, channel_name)` pair already
    /// exists — not a failure, the caller treats this as a successful dedup.
    #[error("history record already exists for this (article, channel) pair")]
    AlreadyExists,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl RouterError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RouterError::Transient(_))
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, RouterError::Permanent(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, RouterError::Fatal(_))
    }
}

/// Maps a backend-native error into one of the three router error kinds.
/// Implemented per adapter (document store, bus, history store) so each
/// backend's own error taxonomy (HTTP status, `sqlx::Error` variant, ...)
/// gets classified once, at the edge, instead of scattered through call sites.
pub trait Classify {
    fn classify(self) -> RouterError;
}

impl Classify for sqlx::Error {
    fn classify(self) -> RouterError {
        match &self {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    RouterError::AlreadyExists
                } else {
                    RouterError::Transient(self.to_string())
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                RouterError::Transient(self.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::TypeNotFound { .. } => {
                RouterError::Permanent(self.to_string())
            }
            _ => RouterError::Transient(self.to_string()),
        }
    }
}

impl Classify for serde_json::Error {
    fn classify(self) -> RouterError {
        RouterError::Permanent(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_are_permanent() {
        let err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(err.classify().is_permanent());
    }

    #[test]
    fn already_exists_is_not_transient_or_permanent() {
        let e = RouterError::AlreadyExists;
        assert!(!e.is_transient());
        assert!(!e.is_permanent());
        assert!(!e.is_fatal());
    }
}
