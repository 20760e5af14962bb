//! Public key lookup for clients.

use crate::{crypto::key::PublicKeyMaterial, error::Result};

/// P-384 key of the eID card the server was first deployed against
/// (base64 DER SubjectPublicKeyInfo). Used when no key is configured.
pub const EID_CARD_PUBLIC_KEY: &str = "MHYwEAYHKoZIzj0CAQYFK4EEACIDYgAExa/dAr+YHm1K9ytDopdcMVAehzWuYyzpyek7Aei85DrLr54hP9W63BiB3HeKhXc7HK78X3v6y+cWAMLNwW2MGmyM7dppzadf5q1qb3K5AodzgnRzQteWAdw7zqFoUKvQ";

/// Resolves the public key a client's signatures are checked against
pub trait KeyResolver: Send + Sync {
    fn lookup_public_key(&self, client_id: &str) -> Result<PublicKeyMaterial>;
}

/// Serves the same key for every client
#[derive(Clone, Debug)]
pub struct StaticKeyResolver {
    key: PublicKeyMaterial,
}

impl StaticKeyResolver {
    pub fn new(key: PublicKeyMaterial) -> Self {
        Self { key }
    }

    /// Decode a base64 DER SubjectPublicKeyInfo and serve it for every client
    pub fn from_base64(spki_b64: &str) -> Result<Self> {
        Ok(Self::new(PublicKeyMaterial::from_base64(spki_b64)?))
    }

    pub fn key(&self) -> &PublicKeyMaterial {
        &self.key
    }
}

impl KeyResolver for StaticKeyResolver {
    fn lookup_public_key(&self, _client_id: &str) -> Result<PublicKeyMaterial> {
        Ok(self.key.clone())
    }
}
