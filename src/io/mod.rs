#[cfg(feature = "stl-io")]
mod stl;

#[cfg(feature = "stl-io")]
pub use stl::{to_stl_ascii, to_stl_binary};

/// Export errors.
#[derive(Debug)]
pub enum IoError {
    StdIo(std::io::Error),

    /// The mesh handed to an exporter breaks the triangle-list contract.
    MalformedInput(String),
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use IoError::*;

        match self {
            StdIo(error) => write!(f, "std::io::Error: {error}"),
            MalformedInput(msg) => write!(f, "Input is malformed: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}

impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        Self::StdIo(value)
    }
}

impl From<crate::errors::GlyphError> for IoError {
    fn from(value: crate::errors::GlyphError) -> Self {
        Self::MalformedInput(value.to_string())
    }
}
