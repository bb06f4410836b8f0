use thiserror::Error;

use crate::vocab::TokenId;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid vocabulary: {0}")]
    InvalidVocab(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unknown symbol: {0:?}")]
    UnknownSymbol(char),

    #[error("Invalid token id: {0}")]
    InvalidId(TokenId),
}

impl TokenizerError {
    /// The vocabulary file could not be read or written.
    pub fn is_io(&self) -> bool {
        matches!(self, TokenizerError::Io(_))
    }

    /// The vocabulary file was read but its contents are not a valid vocabulary.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            TokenizerError::Parse(_) | TokenizerError::InvalidVocab(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TokenizerError>;
