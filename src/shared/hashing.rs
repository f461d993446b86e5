//! Content-derived names for stored media.

use rand::{distr::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Length of the random salt mixed into every derived name.
pub const SALT_LEN: usize = 16;

/// Hex digest length kept for file names.
const NAME_LEN: usize = 32;

/// Random alphanumeric string of the given length.
pub fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Hex SHA-256 of the text, truncated to a file-name friendly length.
pub fn digest_name(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..NAME_LEN].to_string()
}

/// Hash of the text with a fresh random salt appended.
///
/// Returns `(name, salt)`.
pub fn salted_name(text: &str) -> (String, String) {
    let salt = random_string(SALT_LEN);
    let name = digest_name(&format!("{}{}", text, salt));
    (name, salt)
}

/// Lower-cased extension of an uploaded file name, without the dot.
pub fn extension_of(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_ascii_lowercase())
}
