use xxhash_rust::xxh3::xxh3_64;

/// Fixed-width lowercase hex digest, used both for content hashing of
/// rewritten modules and for collision-resistant generated file names.
pub fn xxhash_hex(input: &[u8]) -> String {
  format!("{:016x}", xxh3_64(input))
}

#[test]
fn test_xxhash_hex() {
  assert_eq!(xxhash_hex(b"hello"), format!("{:016x}", xxh3_64(b"hello")));
  assert_eq!(xxhash_hex(b"hello").len(), 16);
  assert_ne!(xxhash_hex(b"./a/b.js"), xxhash_hex(b"./a-b.js"));
}
