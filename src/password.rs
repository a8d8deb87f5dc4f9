use sha2::{Digest, Sha256};

/// One-way hash stored in place of the plaintext password (lowercase hex SHA-256).
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Compares a candidate password against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password).eq_ignore_ascii_case(stored_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify() {
        let stored = hash_password("s3cret");
        assert!(verify_password("s3cret", &stored));
        assert!(verify_password("s3cret", &stored.to_uppercase()));
        assert!(!verify_password("S3cret", &stored));
        assert!(!verify_password("s3cret", "s3cret"));
    }
}
