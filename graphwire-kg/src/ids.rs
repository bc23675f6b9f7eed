//! Entity id generation
//!
//! Every entity in the graph, including each relation (an entity in its
//! own right), is addressed by an opaque id: 16 random bytes encoded in
//! the Bitcoin Base58 alphabet. Ids are generated independently by every
//! writer, so uniqueness rests entirely on entropy (128 bits per id).

use rand::Rng;

/// Number of random bytes behind each id
const ID_BYTES: usize = 16;

/// Generate a fresh globally-unique entity id.
///
/// # Example
/// ```
/// let id = graphwire_kg::ids::generate();
/// assert!(graphwire_kg::ids::is_well_formed(&id));
/// ```
pub fn generate() -> String {
    let bytes: [u8; ID_BYTES] = rand::thread_rng().gen();
    bs58::encode(bytes).into_string()
}

/// Check that a string is a plausible entity id: non-empty, Base58
/// alphabet, and decoding to exactly 16 bytes.
///
/// Well-known schema ids predate this tool and are accepted as-is by the
/// rest of the library; this check exists for validating generated ids and
/// untrusted input, not as a gate on every operation.
pub fn is_well_formed(id: &str) -> bool {
    if id.is_empty() {
        return false;
    }
    match bs58::decode(id).into_vec() {
        Ok(bytes) => bytes.len() == ID_BYTES,
        Err(_) => false,
    }
}
