//! Reversible secret codec for opaque verification and password-reset tokens.
//!
//! Tokens are `base64url(nonce || ciphertext || tag)` under AES-256-GCM, so a
//! token is self-contained and any tampering fails authentication on decrypt.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const NONCE_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("secret key must be 64 hex characters")]
    InvalidKey,
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("encryption failed")]
    Encrypt,
}

/// Plaintext record carried inside verification and reset tokens.
///
/// `token` is a fresh random nonce so that successive tokens for the same user
/// are distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretPayload {
    pub user_id: Uuid,
    pub token: String,
}

impl SecretPayload {
    pub fn fresh(user_id: Uuid) -> Self {
        Self {
            user_id,
            token: hex::encode(rand::random::<[u8; 32]>()),
        }
    }
}

/// AES-256-GCM codec keyed once at start-up.
#[derive(Clone)]
pub struct SecretCodec {
    key: [u8; 32],
}

impl std::fmt::Debug for SecretCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretCodec(..)")
    }
}

impl SecretCodec {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Build from a 64-character hex string.
    pub fn from_hex(key: &str) -> Result<Self, SecretError> {
        let bytes = hex::decode(key.trim()).map_err(|_| SecretError::InvalidKey)?;
        let key: [u8; 32] = bytes.try_into().map_err(|_| SecretError::InvalidKey)?;
        Ok(Self { key })
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<String, SecretError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher()
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| SecretError::Encrypt)?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(combined))
    }

    /// Fails closed: any decoding or authentication failure yields `None`.
    pub fn open(&self, encoded: &str) -> Option<Vec<u8>> {
        let combined = URL_SAFE_NO_PAD.decode(encoded).ok()?;
        if combined.len() <= NONCE_LEN {
            return None;
        }
        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        self.cipher()
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .ok()
    }

    pub fn encrypt<T: Serialize>(&self, record: &T) -> Result<String, SecretError> {
        let plaintext = serde_json::to_vec(record)?;
        self.seal(&plaintext)
    }

    /// `None` when the token is garbage, tampered with, or not a `T`.
    pub fn decrypt<T: DeserializeOwned>(&self, encoded: &str) -> Option<T> {
        let plaintext = self.open(encoded)?;
        serde_json::from_slice(&plaintext).ok()
    }
}
