//! Vocabulary store
//!
//! Append-only bijection between tokens and dense integer ids. Both
//! directions live behind a single insert path so they cannot drift apart.

use std::collections::HashMap;

use super::special::SpecialToken;
use super::TokenId;
use crate::error::{Result, TokenizerError};

/// Options controlling [`VocabStore::encode`].
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Assign fresh ids to unseen characters instead of mapping them to `<UNK>`
    pub add_new: bool,
}

impl EncodeOptions {
    pub fn add_new() -> Self {
        Self { add_new: true }
    }
}

/// Character-level vocabulary with the reserved tokens seeded at ids 0..=3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabStore {
    forward: HashMap<String, TokenId>,
    backward: HashMap<TokenId, String>,
    next_id: TokenId,
}

impl Default for VocabStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VocabStore {
    pub fn new() -> Self {
        let mut store = Self::empty();
        for token in SpecialToken::ALL {
            store.insert_if_absent(token.as_str());
        }
        store
    }

    fn empty() -> Self {
        Self {
            forward: HashMap::new(),
            backward: HashMap::new(),
            next_id: 0,
        }
    }

    /// Rebuilds a store from a persisted mapping.
    ///
    /// Fails when two tokens share an id, since no exact inverse exists then.
    /// A `next_id` that would hand out an id already in use is raised past
    /// the largest loaded id.
    pub(crate) fn from_parts(
        forward: HashMap<String, TokenId>,
        next_id: Option<TokenId>,
    ) -> Result<Self> {
        let mut backward = HashMap::with_capacity(forward.len());
        for (token, &id) in &forward {
            if let Some(previous) = backward.insert(id, token.clone()) {
                return Err(TokenizerError::InvalidVocab(format!(
                    "id {} is assigned to both {:?} and {:?}",
                    id, previous, token
                )));
            }
        }

        let count = TokenId::try_from(forward.len()).map_err(|_| {
            TokenizerError::InvalidVocab(format!("{} entries exceed the id range", forward.len()))
        })?;
        let mut next_id = next_id.unwrap_or(count);

        if let Some(&max_id) = backward.keys().max() {
            if next_id <= max_id {
                let repaired = max_id.checked_add(1).ok_or_else(|| {
                    TokenizerError::InvalidVocab(format!("id {} leaves no room to grow", max_id))
                })?;
                tracing::warn!(
                    "nextId {} would reuse an assigned id, raising it to {}",
                    next_id,
                    repaired
                );
                next_id = repaired;
            }
        }

        Ok(Self {
            forward,
            backward,
            next_id,
        })
    }

    /// The only place ids are assigned. `TokenId::MAX` is never handed out:
    /// once `next_id` reaches it, unseen tokens map to `<UNK>` and the store
    /// stays unchanged.
    fn insert_if_absent(&mut self, token: &str) -> TokenId {
        if let Some(&id) = self.forward.get(token) {
            return id;
        }
        let id = self.next_id;
        let Some(next_id) = id.checked_add(1) else {
            tracing::warn!("Token ids exhausted, mapping {:?} to <UNK>", token);
            return self.unk_id();
        };
        self.forward.insert(token.to_string(), id);
        self.backward.insert(id, token.to_string());
        self.next_id = next_id;
        tracing::debug!("Assigned id {} to {:?}", id, token);
        id
    }

    /// Adds every unseen character of `text` in first-encounter order.
    /// Returns the vocabulary size afterwards.
    pub fn grow(&mut self, text: &str) -> usize {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.insert_if_absent(ch.encode_utf8(&mut buf));
        }
        self.len()
    }

    /// Encodes one id per character. With `add_new` unseen characters grow
    /// the vocabulary, otherwise they map to `<UNK>`.
    pub fn encode(&mut self, text: &str, options: &EncodeOptions) -> Vec<TokenId> {
        if !options.add_new {
            return self.encode_known(text);
        }
        let mut buf = [0u8; 4];
        text.chars()
            .map(|ch| self.insert_if_absent(ch.encode_utf8(&mut buf)))
            .collect()
    }

    /// Encodes without growing; unseen characters map to `<UNK>`.
    pub fn encode_known(&self, text: &str) -> Vec<TokenId> {
        let unk = self.unk_id();
        let mut buf = [0u8; 4];
        text.chars()
            .map(|ch| self.char_id(ch, &mut buf).unwrap_or(unk))
            .collect()
    }

    /// Like [`encode_known`](Self::encode_known) but fails on the first unseen character.
    pub fn try_encode(&self, text: &str) -> Result<Vec<TokenId>> {
        let mut buf = [0u8; 4];
        text.chars()
            .map(|ch| {
                self.char_id(ch, &mut buf)
                    .ok_or(TokenizerError::UnknownSymbol(ch))
            })
            .collect()
    }

    fn char_id(&self, ch: char, buf: &mut [u8; 4]) -> Option<TokenId> {
        self.forward.get(&*ch.encode_utf8(buf)).copied()
    }

    /// Concatenates the tokens for `ids`; unknown ids become the literal `<UNK>`.
    pub fn decode(&self, ids: &[TokenId]) -> String {
        self.decode_lossy(ids.iter().copied().map(Some))
    }

    /// Decodes ids that may not have parsed; `None` becomes `<UNK>`.
    pub fn decode_lossy<I>(&self, ids: I) -> String
    where
        I: IntoIterator<Item = Option<TokenId>>,
    {
        let mut out = String::new();
        for id in ids {
            let token = id
                .and_then(|id| self.token(id))
                .unwrap_or(SpecialToken::Unk.as_str());
            out.push_str(token);
        }
        out
    }

    /// Like [`decode`](Self::decode) but fails on the first unknown id.
    pub fn try_decode(&self, ids: &[TokenId]) -> Result<String> {
        let mut out = String::new();
        for &id in ids {
            let token = self.token(id).ok_or(TokenizerError::InvalidId(id))?;
            out.push_str(token);
        }
        Ok(out)
    }

    pub fn token_id(&self, token: &str) -> Option<TokenId> {
        self.forward.get(token).copied()
    }

    pub fn token(&self, id: TokenId) -> Option<&str> {
        self.backward.get(&id).map(|s| s.as_str())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.forward.contains_key(token)
    }

    /// Id used for unseen characters. Falls back to the reserved slot when a
    /// loaded vocabulary lacks `<UNK>`.
    pub fn unk_id(&self) -> TokenId {
        self.token_id(SpecialToken::Unk.as_str())
            .unwrap_or_else(|| SpecialToken::Unk.id())
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Id the next grown token will receive.
    pub fn next_id(&self) -> TokenId {
        self.next_id
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &str)> {
        let mut entries: Vec<(TokenId, &str)> = self
            .backward
            .iter()
            .map(|(&id, token)| (id, token.as_str()))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries.into_iter()
    }
}
