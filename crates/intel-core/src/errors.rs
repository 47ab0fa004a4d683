use std::path::PathBuf;

/// Failure to load a ruleset override file.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read ruleset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid ruleset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
