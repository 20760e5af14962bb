use crate::{
    crypto::{challenge::Challenge, ecdsa::verify_signature},
    error::{AuthError, Result},
    keys::KeyResolver,
    store::ChallengeStore,
};
use base64::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication service that handles ECDSA challenge-based authentication
///
/// This service provides:
/// - Challenge issuing, one outstanding challenge per client
/// - Signature verification against the stored challenge
/// - Consumption of the challenge once it has been signed correctly
///
/// A failed attempt leaves the challenge in place, so the client may retry
/// with the same challenge until it succeeds or requests a new one.
pub struct AuthService {
    store: ChallengeStore,
    keys: Arc<dyn KeyResolver>,
}

/// Request structure for authenticating with a signed challenge
///
/// In JSON the signature is a standard base64 string:
/// `{"clientId": "client-1", "signature": "MGQCMB..."}`
///
/// Field names are matched without regard to ASCII case, so `ClientId` and
/// `clientid` are accepted too.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct AuthRequest {
    pub client_id: String,
    #[serde(serialize_with = "base64_bytes")]
    pub signature: Vec<u8>,
}

impl TryFrom<Map<String, Value>> for AuthRequest {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let text_field = |name: &str| {
            fields
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .and_then(|(_, value)| value.as_str())
                .ok_or_else(|| format!("missing or invalid field `{name}`"))
        };

        let client_id = text_field("clientId")?.to_string();
        let signature = BASE64_STANDARD
            .decode(text_field("signature")?)
            .map_err(|e| format!("invalid signature encoding: {e}"))?;

        Ok(Self {
            client_id,
            signature,
        })
    }
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// # Arguments
    /// * `store` - Store holding outstanding challenges, owned by the service
    /// * `keys` - Source of the public key each client signs with
    ///
    /// # Example
    /// ```rust
    /// use eid_auth::{AuthService, ChallengeStore, StaticKeyResolver};
    /// use eid_auth::keys::EID_CARD_PUBLIC_KEY;
    /// use std::sync::Arc;
    ///
    /// let keys = StaticKeyResolver::from_base64(EID_CARD_PUBLIC_KEY).unwrap();
    /// let auth_service = AuthService::new(ChallengeStore::new(), Arc::new(keys));
    /// ```
    pub fn new(store: ChallengeStore, keys: Arc<dyn KeyResolver>) -> Self {
        Self { store, keys }
    }

    /// Issue a fresh challenge for a client
    ///
    /// Any challenge still outstanding for `client_id` is replaced.
    ///
    /// # Errors
    /// - `BadRequest` - `client_id` is empty
    ///
    /// # Example
    /// ```rust
    /// use eid_auth::{AuthService, ChallengeStore, StaticKeyResolver};
    /// use eid_auth::keys::EID_CARD_PUBLIC_KEY;
    /// use std::sync::Arc;
    ///
    /// let keys = StaticKeyResolver::from_base64(EID_CARD_PUBLIC_KEY).unwrap();
    /// let auth_service = AuthService::new(ChallengeStore::new(), Arc::new(keys));
    ///
    /// let challenge = auth_service.request_challenge("client-1").unwrap();
    /// // Send challenge.to_base64() to the client for signing
    /// ```
    pub fn request_challenge(&self, client_id: &str) -> Result<Challenge> {
        if client_id.is_empty() {
            return Err(missing_client_id());
        }

        let challenge = self.store.issue(client_id);
        debug!(client_id, "challenge issued");
        Ok(challenge)
    }

    /// Authenticate a client by verifying their signed challenge
    ///
    /// 1. Looks up the challenge outstanding for the client
    /// 2. Resolves the client's public key
    /// 3. Verifies the ECDSA P-384 / SHA-384 signature over the challenge
    /// 4. Consumes the challenge if the signature is valid
    ///
    /// # Returns
    /// * `Ok(true)` - Signature valid, challenge consumed
    /// * `Ok(false)` - Signature invalid or unverifiable, challenge retained
    /// * `Err(AuthError)` - The request could not be processed
    ///
    /// # Errors
    /// - `BadRequest` - `client_id` is empty
    /// - `NoChallengeForClient` - No challenge is outstanding for the client
    pub fn authenticate(&self, auth_request: &AuthRequest) -> Result<bool> {
        let client_id = auth_request.client_id.as_str();
        if client_id.is_empty() {
            return Err(missing_client_id());
        }

        let challenge = self
            .store
            .lookup(client_id)
            .ok_or(AuthError::NoChallengeForClient)?;

        let authenticated = match self.keys.lookup_public_key(client_id) {
            Ok(public_key) => {
                verify_signature(&public_key, challenge.as_bytes(), &auth_request.signature)
            }
            Err(e) => {
                warn!(client_id, error = %e, "cannot resolve public key");
                false
            }
        };

        if authenticated {
            // A concurrent issue may already have replaced it
            self.store.consume(client_id);
            info!(client_id, "client authenticated");
        } else {
            info!(client_id, "authentication failed");
        }

        Ok(authenticated)
    }

    pub fn store(&self) -> &ChallengeStore {
        &self.store
    }
}

fn missing_client_id() -> AuthError {
    AuthError::BadRequest("ClientId is required.".to_string())
}

fn base64_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
}
