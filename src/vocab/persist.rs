//! Vocabulary file format
//!
//! ```json
//! {
//!   "vocab": { "<PAD>": 0, "<UNK>": 1, "a": 4 },
//!   "nextId": 5
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::special::SpecialToken;
use super::store::VocabStore;
use super::TokenId;
use crate::error::{Result, TokenizerError};

/// Borrowed view written to disk, entries in id order.
#[derive(Serialize)]
struct VocabFileRef<'a> {
    vocab: OrderedVocab<'a>,
    #[serde(rename = "nextId")]
    next_id: TokenId,
}

struct OrderedVocab<'a>(&'a VocabStore);

impl Serialize for OrderedVocab<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, token) in self.0.iter() {
            map.serialize_entry(token, &id)?;
        }
        map.end()
    }
}

/// Owned form read from disk. Both fields may be absent.
#[derive(Deserialize)]
struct VocabFile {
    #[serde(default)]
    vocab: HashMap<String, TokenId>,
    #[serde(default, rename = "nextId")]
    next_id: Option<TokenId>,
}

impl VocabStore {
    /// Serializes the forward mapping and next id as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        let file = VocabFileRef {
            vocab: OrderedVocab(self),
            next_id: self.next_id(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| TokenizerError::Serialize(e.to_string()))
    }

    /// Parses a vocabulary document, rebuilding the reverse mapping.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: VocabFile = serde_json::from_str(json)?;

        let missing: Vec<&str> = SpecialToken::ALL
            .iter()
            .map(|t| t.as_str())
            .filter(|t| !file.vocab.contains_key(*t))
            .collect();
        if !missing.is_empty() {
            tracing::warn!("Vocabulary lacks reserved tokens: {}", missing.join(", "));
        }

        VocabStore::from_parts(file.vocab, file.next_id)
    }

    /// Writes the vocabulary to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        fs::write(path, json)?;
        tracing::info!("Saved {} tokens to {}", self.len(), path.display());
        Ok(())
    }

    /// Reads a vocabulary from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;
        tracing::info!("Loaded {} tokens from {}", store.len(), path.display());
        Ok(store)
    }

    /// Replaces this store's contents with the vocabulary at `path`.
    /// On failure the store is left unchanged.
    pub fn restore(&mut self, path: impl AsRef<Path>) -> Result<()> {
        *self = Self::load(path)?;
        Ok(())
    }
}
