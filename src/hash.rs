//! Content addressing for node trees.
//!
//! Every call gets a BLAKE3 identity computed from its function name, the
//! function's registered version, and its inputs in order. Literal inputs
//! are encoded by value; child inputs contribute their own key, so a key
//! covers the whole subtree beneath it.
//!
//! Properties:
//! - Structurally identical subtrees hash identically, wherever they sit.
//! - Name decorations do not contribute: a clone, or a renamed copy, maps
//!   to the same cache entries as its source.
//! - Changing any literal, function or version anywhere below a node
//!   changes that node's key.

use crate::graph::{Arg, Node};
use crate::value::Value;

const HASH_VERSION: u8 = 1;

// ─── Content Hash ──────────────────────────────────────────────────

/// A 256-bit BLAKE3 content hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Display as full hex.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Parse the 64-digit form produced by `to_hex`, in either case.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (byte, pair) in bytes.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
            let pair = std::str::from_utf8(pair).ok()?;
            *byte = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(ContentHash(bytes))
    }

    /// Display as short base-32 (8 characters, 40 bits).
    pub fn to_short(&self) -> String {
        const ALPHABET: &[u8] = b"0123456789abcdefghjkmnpqrstuvwxyz";
        let val = u64::from_be_bytes([
            0, 0, 0, self.0[0], self.0[1], self.0[2], self.0[3], self.0[4],
        ]);
        let mut result = String::with_capacity(8);
        for i in (0..8).rev() {
            let idx = ((val >> (i * 5)) & 0x1F) as usize;
            result.push(ALPHABET[idx] as char);
        }
        result
    }
}

impl std::fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_short())
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_short())
    }
}

// ─── Call Keys ─────────────────────────────────────────────────────

/// One input of a call, as seen by the key encoder.
pub(crate) enum KeyInput<'a> {
    Literal(&'a Value),
    Child(ContentHash),
}

/// Key of a single call given its already-keyed inputs.
pub(crate) fn call_key<'a>(
    func: &str,
    version: u32,
    args: impl IntoIterator<Item = KeyInput<'a>>,
    kwargs: impl IntoIterator<Item = (&'a str, KeyInput<'a>)>,
) -> ContentHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[HASH_VERSION]);
    encode_str(&mut hasher, func);
    hasher.update(&version.to_le_bytes());

    hasher.update(b"A");
    for input in args {
        encode_input(&mut hasher, &input);
    }
    hasher.update(b"K");
    for (key, input) in kwargs {
        encode_str(&mut hasher, key);
        encode_input(&mut hasher, &input);
    }
    hasher.update(b"E");
    ContentHash(*hasher.finalize().as_bytes())
}

/// Structural hash of a subtree, with every function at version 0.
pub fn hash_node(node: &Node) -> ContentHash {
    let args: Vec<KeyInput> = node.args().iter().map(arg_input).collect();
    let kwargs: Vec<(&str, KeyInput)> = node
        .kwargs()
        .iter()
        .map(|(key, arg)| (key.as_str(), arg_input(arg)))
        .collect();
    call_key(node.func(), 0, args, kwargs)
}

fn arg_input(arg: &Arg) -> KeyInput<'_> {
    match arg {
        Arg::Literal(v) => KeyInput::Literal(v),
        Arg::Child(child) => KeyInput::Child(hash_node(child)),
    }
}

fn encode_input(hasher: &mut blake3::Hasher, input: &KeyInput) {
    match input {
        KeyInput::Literal(v) => {
            hasher.update(b"l");
            encode_value(hasher, v);
        }
        KeyInput::Child(hash) => {
            hasher.update(b"n");
            hasher.update(&hash.0);
        }
    }
}

fn encode_value(hasher: &mut blake3::Hasher, value: &Value) {
    match value {
        Value::Unit => {
            hasher.update(&[0]);
        }
        Value::Bool(b) => {
            hasher.update(&[1, *b as u8]);
        }
        Value::Int(v) => {
            hasher.update(&[2]);
            hasher.update(&v.to_le_bytes());
        }
        Value::Float(v) => {
            // NaN payloads are not preserved by JSON; hash them all alike.
            let bits = if v.is_nan() { f64::NAN.to_bits() } else { v.to_bits() };
            hasher.update(&[3]);
            hasher.update(&bits.to_le_bytes());
        }
        Value::Str(s) => {
            hasher.update(&[4]);
            encode_str(hasher, s);
        }
        Value::Tuple(items) => {
            hasher.update(&[5]);
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                encode_value(hasher, item);
            }
        }
    }
}

/// Length-prefixed so adjacent strings cannot run together.
fn encode_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::new("add")
            .arg(Node::new("mul").arg(1).arg(2))
            .kwarg("y", Node::named("y", "identity").arg(3))
    }

    #[test]
    fn test_hex_round_trip() {
        let hash = hash_node(&sample());
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(ContentHash::from_hex(&hex), Some(hash));
        assert_eq!(ContentHash::from_hex("zz"), None);
        assert_eq!(ContentHash::from_hex(&"g".repeat(64)), None);
        assert_eq!(ContentHash::from_hex(&hex.to_uppercase()), Some(hash));
        assert_eq!(ContentHash::from_hex(&"+f".repeat(32)), None);
    }

    #[test]
    fn test_short_display() {
        let hash = ContentHash([0xAB; 32]);
        assert_eq!(hash.to_short().len(), 8);
        assert_eq!(format!("{}", hash), format!("#{}", hash.to_short()));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(hash_node(&sample()), hash_node(&sample()));
    }

    #[test]
    fn test_clone_hashes_identically() {
        let node = sample();
        assert_eq!(hash_node(&node), hash_node(&node.clone()));
    }

    #[test]
    fn test_names_do_not_contribute() {
        let plain = Node::new("identity").arg(3);
        let named = Node::named("three", "identity").arg(3);
        assert_eq!(hash_node(&plain), hash_node(&named));
    }

    #[test]
    fn test_literal_change_propagates() {
        let mut node = sample();
        let before = hash_node(&node);
        node.set("0/1", 5).unwrap();
        assert_ne!(before, hash_node(&node));
    }

    #[test]
    fn test_positional_and_keyword_differ() {
        let positional = Node::new("f").arg(1);
        let keyword = Node::new("f").kwarg("x", 1);
        assert_ne!(hash_node(&positional), hash_node(&keyword));
    }

    #[test]
    fn test_int_and_float_differ() {
        let int = Node::new("f").arg(1);
        let float = Node::new("f").arg(1.0);
        assert_ne!(hash_node(&int), hash_node(&float));
    }

    #[test]
    fn test_version_changes_key() {
        let v: &Value = &Value::Int(1);
        let none = || Vec::<(&str, KeyInput)>::new();
        let a = call_key("f", 0, [KeyInput::Literal(v)], none());
        let b = call_key("f", 1, [KeyInput::Literal(v)], none());
        assert_ne!(a, b);
    }
}
