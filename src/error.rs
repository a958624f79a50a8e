use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported nesting: {0}")]
    UnsupportedNesting(String),

    #[error("unexpected node: {0}")]
    UnexpectedNode(String),

    #[error("package is missing part {0}")]
    MissingPart(String),

    #[error("failed to open document package: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("malformed xml in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("invalid classifier pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid extraction profile {path}: {message}")]
    Profile { path: String, message: String },

    #[error("failed to read {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub fn xml(part: &str, err: impl std::fmt::Display) -> Self {
        Self::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Recoverable structural ambiguity. Each one is logged when it is detected and
/// resolved with a fixed fallback; none of them abort a parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    UnparsableHeadingLevel { style: String },
    HeadingDepthClamped { level: u32, max_depth: u32 },
    MissingMergeBottom { row: usize, column: usize },
    VerticalMergeWithoutOrigin { row: usize, column: usize },
    ListLevelJump { from: u32, to: u32 },
    ListLevelUnderflow { level: u32, list_level: u32 },
}
