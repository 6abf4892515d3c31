//! RFC 6901 JSON Pointer path algebra.
//!
//! A [`Pointer`] is an immutable sequence of reference tokens rooted at the
//! empty sequence. Tokens are escaped once, when they are appended, so
//! rendering is plain concatenation with a separator chosen by the caller.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// The separator used by [`Pointer`]'s `Display` impl.
pub const DEFAULT_SEPARATOR: &str = "/";

/// Escape a key for use as a pointer reference token.
///
/// `~` is escaped before `/` so that the `~` introduced by `~1` is never
/// escaped a second time.
pub fn escape(key: &str) -> String {
    if !key.contains(['~', '/']) {
        return key.to_string();
    }
    key.replace('~', "~0").replace('/', "~1")
}

/// Reverse [`escape`].
pub fn unescape(token: &str) -> String {
    if !token.contains('~') {
        return token.to_string();
    }
    token.replace("~1", "/").replace("~0", "~")
}

/// A JSON Pointer into a value tree.
///
/// The root pointer has no tokens and renders as the empty string.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pointer {
    /// Escaped reference tokens.
    tokens: Vec<String>,
}

impl Pointer {
    /// The root pointer, addressing the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` if this is the root pointer.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of reference tokens.
    pub fn depth(&self) -> usize {
        self.tokens.len()
    }

    /// A new pointer with the object key `key` appended.
    pub fn append_key(&self, key: &str) -> Self {
        self.push_token(escape(key))
    }

    /// A new pointer with the array index `index` appended.
    pub fn append_index(&self, index: usize) -> Self {
        self.push_token(index.to_string())
    }

    fn push_token(&self, token: String) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend_from_slice(&self.tokens);
        tokens.push(token);
        Self { tokens }
    }

    /// The pointer to the enclosing container, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.tokens.split_last()?;
        Some(Self {
            tokens: init.to_vec(),
        })
    }

    /// The last token, unescaped.
    pub fn last(&self) -> Option<String> {
        self.tokens.last().map(|t| unescape(t))
    }

    /// Iterate over the unescaped tokens from the root down.
    pub fn tokens(&self) -> impl Iterator<Item = String> + '_ {
        self.tokens.iter().map(|t| unescape(t))
    }

    /// Returns `true` if `self` equals `other` or is one of its ancestors.
    pub fn is_prefix_of(&self, other: &Pointer) -> bool {
        other.tokens.starts_with(&self.tokens)
    }

    /// Returns `true` if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Pointer) -> bool {
        self.tokens.len() < other.tokens.len() && self.is_prefix_of(other)
    }

    /// Returns `true` if `self` is an immediate child of `parent`.
    pub fn is_child_of(&self, parent: &Pointer) -> bool {
        self.tokens.len() == parent.tokens.len() + 1 && parent.is_prefix_of(self)
    }

    /// Render the pointer with an explicit token separator.
    pub fn render(&self, separator: &str) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            out.push_str(separator);
            out.push_str(token);
        }
        out
    }

    /// Parse RFC 6901 pointer text.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = text.strip_prefix('/') else {
            return Err(TypeError::InvalidPointer {
                pointer: text.to_string(),
                reason: "must be empty or start with '/'".into(),
            });
        };
        let tokens = rest
            .split('/')
            .map(|token| {
                validate_token(token).map_err(|reason| TypeError::InvalidPointer {
                    pointer: text.to_string(),
                    reason,
                })?;
                Ok(token.to_string())
            })
            .collect::<Result<Vec<_>, TypeError>>()?;
        Ok(Self { tokens })
    }
}

fn validate_token(token: &str) -> Result<(), String> {
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == '~' && !matches!(chars.next(), Some('0' | '1')) {
            return Err(format!("dangling escape in token {token:?}"));
        }
    }
    Ok(())
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_SEPARATOR))
    }
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pointer({:?})", self.to_string())
    }
}

impl std::str::FromStr for Pointer {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
