//! Administrator credentials and the explicit authorization context.
//!
//! Passwords are kept only as `pbkdf2-sha256$iterations$salt$hexdigest`.
//! Checks re-derive the key from the candidate with the stored salt and
//! iteration count, then compare digests in constant time.

use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// PBKDF2-HMAC-SHA256 rounds used for newly generated hashes.
pub const DEFAULT_ITERATIONS: u32 = 600_000;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_BYTES: usize = 16;
const DIGEST_BYTES: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("password hash must have the form 'pbkdf2-sha256$iterations$salt$hexdigest'")]
    MalformedHash,
    #[error("unsupported password hash scheme: {0}")]
    UnsupportedScheme(String),
    #[error("password hash iteration count must be a positive integer, got '{0}'")]
    InvalidIterations(String),
    #[error("password hash digest is not valid hex: {0}")]
    InvalidDigest(String),
    #[error("admin username must be non-empty")]
    EmptyUsername,
}

/// A salted PBKDF2-HMAC-SHA256 password digest.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    iterations: u32,
    salt: String,
    digest: Vec<u8>,
}

impl PasswordHash {
    /// Derive a hash of `password` from a caller-supplied salt and round count.
    #[must_use]
    pub fn derive(password: &str, salt: &str, iterations: u32) -> Self {
        Self {
            iterations,
            salt: salt.to_string(),
            digest: derive_key(password, salt, iterations),
        }
    }

    /// Hash `password` with a freshly generated random salt.
    #[must_use]
    pub fn generate(password: &str, iterations: u32) -> Self {
        let mut salt = [0_u8; SALT_BYTES];
        rand::rng().fill(&mut salt);
        Self::derive(password, &hex::encode(salt), iterations)
    }

    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        let computed = derive_key(candidate, &self.salt, self.iterations);
        computed.ct_eq(&self.digest).into()
    }
}

impl std::fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{SCHEME}${}${}${}",
            self.iterations,
            self.salt,
            hex::encode(&self.digest)
        )
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash([redacted])")
    }
}

impl std::str::FromStr for PasswordHash {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(4, '$');
        let (Some(scheme), Some(iterations), Some(salt), Some(digest_hex)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CredentialError::MalformedHash);
        };
        if scheme != SCHEME {
            return Err(CredentialError::UnsupportedScheme(scheme.to_string()));
        }
        let iterations = iterations
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| CredentialError::InvalidIterations(iterations.to_string()))?;
        if salt.is_empty() || digest_hex.is_empty() {
            return Err(CredentialError::MalformedHash);
        }
        let digest =
            hex::decode(digest_hex).map_err(|e| CredentialError::InvalidDigest(e.to_string()))?;
        Ok(Self {
            iterations,
            salt: salt.to_string(),
            digest,
        })
    }
}

fn derive_key(password: &str, salt: &str, iterations: u32) -> Vec<u8> {
    let mut out = [0_u8; DIGEST_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut out);
    out.to_vec()
}

/// The configured administrator.
#[derive(Debug, Clone)]
pub struct AdminUser {
    username: String,
    password_hash: PasswordHash,
}

impl AdminUser {
    /// # Errors
    ///
    /// Returns [`CredentialError::EmptyUsername`] for a blank username.
    pub fn new(username: &str, password_hash: PasswordHash) -> Result<Self, CredentialError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialError::EmptyUsername);
        }
        Ok(Self {
            username: username.to_string(),
            password_hash,
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a username/password pair; on success return the context that
    /// admin-only operations require.
    #[must_use]
    pub fn authenticate(&self, username: &str, password: &str) -> Option<AdminContext> {
        // Digest runs regardless of the username match.
        let password_ok = self.password_hash.verify(password);
        let username_ok: bool = username.as_bytes().ct_eq(self.username.as_bytes()).into();
        (password_ok && username_ok).then(|| AdminContext {
            username: self.username.clone(),
        })
    }
}

/// Proof that the caller authenticated as an administrator.
///
/// Only [`AdminUser::authenticate`] and [`AdminContext::unauthenticated_dev`]
/// construct it; admin-only operations take it by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    username: String,
}

impl AdminContext {
    /// Context used when admin auth is disabled in a development environment.
    #[must_use]
    pub fn unauthenticated_dev() -> Self {
        Self {
            username: "dev".to_string(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}
