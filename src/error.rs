use std::fmt;

/// Configuration validation failure. Collects every violation so the caller
/// sees the full list at once, before any simulation work starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub violations: Vec<String>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid generation settings: {}",
            self.violations.join("; ")
        )
    }
}

impl std::error::Error for ConfigError {}

/// Crate-level error. Data-integrity problems and transient lookup misses are
/// deliberately not represented here: those self-heal or degrade to no-ops
/// inside the phase that hits them.
#[derive(Debug)]
pub enum SimError {
    Store(sqlx::Error),
    Config(ConfigError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Store(e) => write!(f, "store error: {e}"),
            SimError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Store(e) => Some(e),
            SimError::Config(e) => Some(e),
        }
    }
}

impl From<sqlx::Error> for SimError {
    fn from(e: sqlx::Error) -> Self {
        SimError::Store(e)
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_lists_all_violations() {
        let err = ConfigError {
            violations: vec!["a".to_string(), "b".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("a; b"), "{msg}");
    }
}
