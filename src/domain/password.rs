use anyhow::Result;

/// Password hashing and verification seam. Hashing is CPU-bound and sync;
/// callers run it inline within their use case.
pub trait PasswordHashingService: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String>;
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool>;
}
