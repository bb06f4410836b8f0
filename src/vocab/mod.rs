//! Character Vocabulary Module
//!
//! Maps single characters and the reserved tokens to dense integer ids,
//! encodes and decodes text, and persists the mapping as JSON.

mod persist;
pub mod special;
pub mod store;

pub use special::SpecialToken;
pub use store::{EncodeOptions, VocabStore};

/// Integer identifier assigned to a token.
pub type TokenId = u32;
