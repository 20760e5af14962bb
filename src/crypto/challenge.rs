use crate::error::{AuthError, Result};
use base64::prelude::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Size of a challenge in bytes
pub const CHALLENGE_LEN: usize = 16;

/// A single-use value the client must sign
///
/// Serialised as a standard base64 string in JSON.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Challenge([u8; CHALLENGE_LEN]);

impl Challenge {
    /// Generate a fresh challenge from the raw bytes of a random v4 UUID
    ///
    /// # Example
    /// ```rust
    /// use eid_auth::crypto::challenge::{Challenge, CHALLENGE_LEN};
    ///
    /// let challenge = Challenge::generate();
    /// assert_eq!(challenge.as_bytes().len(), CHALLENGE_LEN);
    /// ```
    pub fn generate() -> Self {
        Self(Uuid::new_v4().into_bytes())
    }

    /// Wrap raw challenge bytes, rejecting anything that isn't 16 bytes long
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; CHALLENGE_LEN] = bytes.try_into().map_err(|_| AuthError::InvalidChallenge)?;
        Ok(Self(raw))
    }

    /// Decode a base64 challenge string
    ///
    /// # Returns
    /// * `Ok(Challenge)` - Challenge bytes
    /// * `Err(AuthError)` - If base64 decoding fails or the length is wrong
    pub fn from_base64(challenge_b64: &str) -> Result<Self> {
        let bytes = BASE64_STANDARD
            .decode(challenge_b64)
            .map_err(|e| AuthError::Base64Error(format!("Failed to decode challenge: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Challenge({})", hex::encode(self.0))
    }
}

impl Serialize for Challenge {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Challenge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Challenge::from_base64(&encoded).map_err(de::Error::custom)
    }
}

/// Generate a cryptographically secure random challenge
///
/// # Example
/// ```rust
/// use eid_auth::crypto::challenge::generate_challenge;
///
/// let challenge = generate_challenge();
/// println!("Challenge: {}", challenge.to_base64());
/// ```
pub fn generate_challenge() -> Challenge {
    Challenge::generate()
}
