use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum Error {
    /// The destination directory or file could not be created or written
    #[error("failed to write {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be drawn or serialized
    #[error("failed to render document: {0}")]
    Render(String),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    Font(#[from] owned_ttf_parser::FaceParsingError),

    /// The render configuration is invalid
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn storage<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Error {
        Error::Storage {
            path: path.into(),
            source,
        }
    }
}
