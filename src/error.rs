use thiserror::Error;

/// Failures raised while decoding a Hessian 2 stream.
///
/// Apart from UTF-8 substitution (handled inside the codepoint reader, never
/// surfaced here), every condition is a deterministic format violation and is
/// fatal for the decode session: the class and reference tables may be left
/// partially populated.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of stream")]
    EndOfStream,

    #[error("unexpected tag {tag:#04X}, expected {expected}")]
    UnexpectedTag { tag: u8, expected: &'static str },

    #[error("tag {0:#04X} has no defined decoding")]
    UnsupportedTag(u8),

    #[error("object reference {index} out of bounds (table has {len} entries)")]
    InvalidReference { index: i32, len: usize },

    #[error("class reference {index} out of bounds (table has {len} entries)")]
    InvalidClassRef { index: i32, len: usize },

    #[error("malformed stream: {0}")]
    Malformed(String),

    #[error("deserialize failed: {0}")]
    Deserialize(String),
}

impl Error {
    pub(crate) fn unexpected_tag(tag: u8, expected: &'static str) -> Self {
        Error::UnexpectedTag { tag, expected }
    }
}
