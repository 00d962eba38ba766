use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// JWT claims for short-lived access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id
    pub id: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, issued_at: OffsetDateTime, expiry_seconds: i64) -> Self {
        let now = issued_at.unix_timestamp();
        Self {
            id: user_id.to_string(),
            iat: now,
            exp: now + expiry_seconds,
        }
    }

    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.id).map_err(|e| anyhow::anyhow!("Invalid user ID in claims: {}", e))
    }
}

/// Client metadata captured alongside a refresh token for audit
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Persisted refresh token. Only the SHA-256 hash of the opaque token is
/// stored; the raw value lives solely in the client cookie.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub is_revoked: bool,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Repository trait for refresh tokens
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken>;

    /// Find a token by hash regardless of expiry or revocation; callers
    /// distinguish revoked from expired for precise error codes.
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>>;

    /// Mark a token revoked. Returns false when no row matched.
    async fn revoke(&self, id: Uuid) -> Result<bool>;

    /// Mark revoked by hash (logout path).
    async fn revoke_by_hash(&self, token_hash: &str) -> Result<bool>;

    /// Purge rows past their expiry. Stands in for a document-store TTL
    /// index; invoked opportunistically when new tokens are written.
    async fn delete_expired(&self) -> Result<u64>;
}

/// Access token signing and validation
pub trait AccessTokenService: Send + Sync {
    fn generate_access_token(&self, user_id: Uuid) -> Result<String>;
    fn validate_token(&self, token: &str) -> Result<Claims>;
}

/// Injectable time source so expiry logic is testable
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock implementation used outside tests
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
