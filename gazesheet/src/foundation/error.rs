/// Convenience result type used across gazesheet.
pub type SheetResult<T> = Result<T, SheetError>;

/// Top-level error taxonomy used by the sheet pipeline.
///
/// Only [`SheetError::Config`] is fatal for a build. The per-frame variants are caught by the
/// builder and downgraded into [`crate::BuildWarning`] values.
#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    /// Invalid or internally inconsistent project configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A referenced source frame does not exist on disk.
    #[error("missing source frame: {0}")]
    MissingSource(String),

    /// A source frame exists but could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The remote segmentation service failed or returned unusable data.
    #[error("classification error: {0}")]
    Classification(String),

    /// Writing a sheet, index table or frame dump failed.
    #[error("output error: {0}")]
    Output(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SheetError {
    /// Build a [`SheetError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SheetError::MissingSource`] value.
    pub fn missing_source(msg: impl Into<String>) -> Self {
        Self::MissingSource(msg.into())
    }

    /// Build a [`SheetError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SheetError::Classification`] value.
    pub fn classification(msg: impl Into<String>) -> Self {
        Self::Classification(msg.into())
    }

    /// Build a [`SheetError::Output`] value.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
