use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the surface core that are reported back to the host UI.
///
/// Everything else the core runs into (unknown ids, aborted navigations,
/// listener panics) is absorbed and logged instead of being returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("cannot attach surface {id}: {reason}")]
    Attach { id: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("window.width = 0".into());
        assert_eq!(err.to_string(), "config validation error: window.width = 0");
    }

    #[test]
    fn attach_error_names_the_surface() {
        let err = SurfaceError::Attach {
            id: "v1".into(),
            reason: "connection has no window".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot attach surface v1: connection has no window"
        );
    }
}
