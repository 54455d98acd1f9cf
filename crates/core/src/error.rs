//! Error types for block conversion.

use thiserror::Error;

/// Fatal problems found while rendering a single block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Header levels must lie in `1..=6`.
    #[error("invalid header level {level}, expected 1 to 6")]
    InvalidHeaderLevel { level: i64 },
    /// A field the block type cannot render without is absent.
    #[error("{block} block is missing required field `{field}`")]
    MissingField {
        block: &'static str,
        field: &'static str,
    },
}

/// Errors that abort the conversion of a whole document.
#[derive(Debug, Error)]
pub enum Error {
    /// A block failed to render; no partial output is produced.
    #[error("block #{index} ({kind}): {source}")]
    Render {
        index: usize,
        kind: String,
        #[source]
        source: RenderError,
    },
    /// The input is valid JSON but not a block list or editor document.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    /// The input could not be deserialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Raised when a recognized block type carries data of the wrong shape.
#[derive(Debug, Error)]
#[error("malformed `{kind}` block data: {source}")]
pub struct BlockDataError {
    pub kind: String,
    #[source]
    pub source: serde_json::Error,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_names_the_offending_value() {
        let err = RenderError::InvalidHeaderLevel { level: 7 };
        assert_eq!(err.to_string(), "invalid header level 7, expected 1 to 6");
    }

    #[test]
    fn document_error_locates_the_block() {
        let err = Error::Render {
            index: 2,
            kind: "image".into(),
            source: RenderError::MissingField {
                block: "image",
                field: "file.url",
            },
        };
        assert_eq!(
            err.to_string(),
            "block #2 (image): image block is missing required field `file.url`"
        );
    }
}
