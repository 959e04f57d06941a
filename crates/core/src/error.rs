use std::path::PathBuf;

/// Errors that can occur while loading level content.
///
/// Gameplay itself never fails: rejected swaps are values, and generation
/// problems degrade to a best-effort result with a diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse level JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level book has no predefined levels and an empty catalog")]
    EmptyBook,
}
