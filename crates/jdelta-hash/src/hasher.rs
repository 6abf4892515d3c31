use std::fmt;

use jdelta_types::{Pointer, Value, ValueKind};

/// A 64-bit structural digest of a [`Value`].
///
/// Equal values have equal digests, including `0.0` and `-0.0`. The converse does not hold: `1` and
/// `1.0` share a digest because they share a bit pattern, and unrelated
/// values may collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueHash(u64);

impl ValueHash {
    pub fn to_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Debug for ValueHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueHash({})", self.to_hex())
    }
}

impl fmt::Display for ValueHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Domain-separated BLAKE3 structural hasher.
///
/// Every [`digest`](Self::digest) call owns its accumulator, so one hasher
/// can be shared freely between threads. Containers hash the digests of
/// their children, which lets [`index`](Self::index) hash a whole tree and
/// every subtree in it in a single pass.
#[derive(Clone, Copy, Debug)]
pub struct StructuralHasher {
    domain: &'static str,
}

impl Default for StructuralHasher {
    fn default() -> Self {
        Self::VALUE
    }
}

enum Edge<'v> {
    Index(usize),
    Key(&'v str),
}

impl StructuralHasher {
    /// Hasher for document values.
    pub const VALUE: Self = Self {
        domain: "jdelta-value-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }

    /// Digest a value tree.
    pub fn digest(&self, value: &Value) -> ValueHash {
        self.combine(value, |_, child| self.digest(child))
    }

    /// Digest `value` and every node beneath it.
    ///
    /// `visit` is called once per node in post-order with the node's pointer
    /// (relative to `at`), the node and its digest. Returns the digest of
    /// `value` itself.
    pub fn index<'v, F>(&self, value: &'v Value, at: &Pointer, visit: &mut F) -> ValueHash
    where
        F: FnMut(&Pointer, &'v Value, ValueHash),
    {
        let hash = self.combine(value, |edge, child| {
            let ptr = match edge {
                Edge::Index(i) => at.append_index(i),
                Edge::Key(k) => at.append_key(k),
            };
            self.index(child, &ptr, &mut *visit)
        });
        visit(at, value, hash);
        hash
    }

    fn combine<'v>(
        &self,
        value: &'v Value,
        mut child: impl FnMut(Edge<'v>, &'v Value) -> ValueHash,
    ) -> ValueHash {
        let mut acc = blake3::Hasher::new();
        acc.update(self.domain.as_bytes());
        acc.update(&[kind_tag(value.kind())]);

        match value {
            Value::Null => {
                acc.update(b"null");
            }
            Value::Bool(b) => write_text(&mut acc, if *b { "true" } else { "false" }),
            Value::Number(n) => {
                // -0.0 == 0.0, so both must share a digest.
                let n = if *n == 0.0 { 0.0 } else { *n };
                acc.update(&n.to_bits().to_be_bytes());
            }
            Value::String(s) => write_text(&mut acc, s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    write_text(&mut acc, &i.to_string());
                    acc.update(&child(Edge::Index(i), item).to_bytes());
                }
            }
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                for key in keys {
                    write_text(&mut acc, key);
                    acc.update(&child(Edge::Key(key), &map[key]).to_bytes());
                }
            }
        }

        let bytes = acc.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&bytes.as_bytes()[..8]);
        ValueHash(u64::from_be_bytes(head))
    }
}

/// Digest a value with the default [`StructuralHasher`].
pub fn digest(value: &Value) -> ValueHash {
    StructuralHasher::VALUE.digest(value)
}

fn kind_tag(kind: ValueKind) -> u8 {
    match kind {
        ValueKind::Null => 0,
        ValueKind::Bool => 1,
        ValueKind::Number => 2,
        ValueKind::String => 3,
        ValueKind::Array => 4,
        ValueKind::Object => 5,
    }
}

/// Length-prefixed so adjacent strings cannot run together.
fn write_text(acc: &mut blake3::Hasher, text: &str) {
    acc.update(&(text.len() as u64).to_be_bytes());
    acc.update(text.as_bytes());
}
