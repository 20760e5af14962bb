use std::fmt;

/// Authentication and cryptographic operation errors
///
/// Only `BadRequest` and `NoChallengeForClient` ever reach a client. Key and
/// signature failures are caught by the verifier and turned into a `false`
/// verdict, so "wrong signature" and "cannot verify" look the same from the
/// outside.
///
/// # Example
/// ```rust
/// use eid_auth::{AuthError, Result};
///
/// fn handle_auth_result(result: Result<bool>) {
///     match result {
///         Ok(true) => println!("Authenticated"),
///         Ok(false) => println!("Signature rejected"),
///         Err(AuthError::NoChallengeForClient) => println!("Request a challenge first"),
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
#[derive(Debug)]
pub enum AuthError {
    /// A required client-supplied field is missing or malformed
    BadRequest(String),

    /// No outstanding challenge exists for the client
    ///
    /// Either no challenge was ever requested, it has already been consumed
    /// by a successful authentication, or it expired.
    NoChallengeForClient,

    /// Public key cannot be used for verification
    ///
    /// This error occurs when:
    /// - The DER structure is truncated or malformed
    /// - The key is not an EC key or names a curve other than P-384
    /// - The point is compressed, has the wrong length, or is not on the curve
    UnsupportedOrMalformedKey(String),

    /// ECDSA signature verification failed
    ///
    /// This error occurs when:
    /// - The signature encoding is invalid
    /// - The signature doesn't match the challenge and public key
    InvalidSignature(String),

    /// Challenge bytes have the wrong length
    InvalidChallenge,

    /// Base64 decoding failed
    Base64Error(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::BadRequest(msg) => write!(f, "{msg}"),
            AuthError::NoChallengeForClient => {
                write!(f, "No challenge found for this client.")
            }
            AuthError::UnsupportedOrMalformedKey(msg) => {
                write!(f, "Unsupported or malformed public key: {msg}")
            }
            AuthError::InvalidSignature(msg) => {
                write!(f, "ECDSA signature verification failed: {msg}")
            }
            AuthError::InvalidChallenge => write!(f, "Invalid challenge format"),
            AuthError::Base64Error(msg) => write!(f, "Base64 decode error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_facing_messages() {
        let missing = AuthError::BadRequest("ClientId is required.".to_string());
        assert_eq!(missing.to_string(), "ClientId is required.");
        assert_eq!(
            AuthError::NoChallengeForClient.to_string(),
            "No challenge found for this client."
        );
    }
}
