use md5::{Digest, Md5};

/// Lowercase hex MD5 digest of the UTF-8 bytes of `s`.
pub fn md5_hash(s: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}
