pub mod error;
pub mod vocab;

pub use error::{Result, TokenizerError};
pub use vocab::{EncodeOptions, SpecialToken, TokenId, VocabStore};
