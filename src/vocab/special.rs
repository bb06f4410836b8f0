use super::TokenId;

/// Reserved tokens present in every fresh vocabulary, always at ids 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialToken {
    Pad,
    Unk,
    Cls,
    Sep,
}

impl SpecialToken {
    /// All reserved tokens in id order.
    pub const ALL: [SpecialToken; 4] = [
        SpecialToken::Pad,
        SpecialToken::Unk,
        SpecialToken::Cls,
        SpecialToken::Sep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialToken::Pad => "<PAD>",
            SpecialToken::Unk => "<UNK>",
            SpecialToken::Cls => "<CLS>",
            SpecialToken::Sep => "<SEP>",
        }
    }

    pub fn id(&self) -> TokenId {
        match self {
            SpecialToken::Pad => 0,
            SpecialToken::Unk => 1,
            SpecialToken::Cls => 2,
            SpecialToken::Sep => 3,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == token)
    }
}

impl std::fmt::Display for SpecialToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_declaration_order() {
        for (i, token) in SpecialToken::ALL.iter().enumerate() {
            assert_eq!(token.id() as usize, i);
        }
    }

    #[test]
    fn test_from_token() {
        assert_eq!(SpecialToken::from_token("<UNK>"), Some(SpecialToken::Unk));
        assert_eq!(SpecialToken::from_token("<SEP>"), Some(SpecialToken::Sep));
        assert_eq!(SpecialToken::from_token("UNK"), None);
        assert_eq!(SpecialToken::from_token("<"), None);
    }
}
