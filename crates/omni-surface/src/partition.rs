//! Storage partitions for surfaces.
//!
//! Surfaces share cookies and storage only when their partitions are equal.

use std::fmt;

const PERSIST_PREFIX: &str = "persist:";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Partition {
    /// The engine's default session.
    #[default]
    Default,
    /// `persist:<name>`: survives restarts.
    Persistent(String),
    /// Any other name: in-memory for the lifetime of the process.
    Ephemeral(String),
}

impl Partition {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Default;
        };
        match raw.strip_prefix(PERSIST_PREFIX) {
            Some(name) if !name.is_empty() => Self::Persistent(name.to_string()),
            Some(_) => Self::Default,
            None => Self::Ephemeral(raw.to_string()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Default => None,
            Self::Persistent(n) | Self::Ephemeral(n) => Some(n),
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Persistent(_))
    }

    /// Filesystem-safe directory name for this partition's storage.
    pub fn storage_dir_name(&self) -> Option<String> {
        self.name().map(|n| {
            n.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect()
        })
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Persistent(n) => write!(f, "{PERSIST_PREFIX}{n}"),
            Self::Ephemeral(n) => f.write_str(n),
        }
    }
}
