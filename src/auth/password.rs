use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Digests are stored as `salt$hex(sha256(salt:password))`.
pub fn digest(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest_with_salt(&salt, password))
}

pub fn verify(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    digest_with_salt(salt, password) == expected
}

fn digest_with_salt(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let stored = digest("s3cret-pw");
        assert!(verify("s3cret-pw", &stored));
        assert!(!verify("wrong", &stored));
    }

    #[test]
    fn salts_differ_between_digests() {
        assert_ne!(digest("same"), digest("same"));
    }

    #[test]
    fn malformed_digest_never_verifies() {
        assert!(!verify("anything", "no-separator-here"));
    }
}
