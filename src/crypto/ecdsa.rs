use crate::{
    crypto::key::{PublicKeyMaterial, COORDINATE_LEN},
    error::{AuthError, Result},
};
use p384::ecdsa::{signature::Verifier, Signature};
use tracing::warn;

/// Length of a fixed-width `r || s` signature
pub const SIGNATURE_LEN: usize = 2 * COORDINATE_LEN;

/// Verify an ECDSA P-384 signature over a message
///
/// The SHA-384 digest of `message` is computed by the verification
/// primitive. `signature` is either the 96-byte `r || s` form or ASN.1 DER.
///
/// Never fails: a malformed signature, an unusable key or a signature that
/// doesn't match all yield `false`.
///
/// # Arguments
/// * `public_key` - Decoded P-384 public key
/// * `message` - Raw bytes that were signed
/// * `signature` - Signature bytes
///
/// # Example
/// ```rust
/// use eid_auth::crypto::{key::PublicKeyMaterial, verify_signature};
/// use eid_auth::keys::EID_CARD_PUBLIC_KEY;
///
/// let public_key = PublicKeyMaterial::from_base64(EID_CARD_PUBLIC_KEY).unwrap();
/// let challenge = b"random challenge";
///
/// assert!(!verify_signature(&public_key, challenge, &[0u8; 96]));
/// ```
pub fn verify_signature(public_key: &PublicKeyMaterial, message: &[u8], signature: &[u8]) -> bool {
    match try_verify(public_key, message, signature) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "signature rejected");
            false
        }
    }
}

fn try_verify(public_key: &PublicKeyMaterial, message: &[u8], signature: &[u8]) -> Result<()> {
    let verifying_key = public_key.verifying_key()?;
    let signature = decode_signature(signature)?;

    verifying_key
        .verify(message, &signature)
        .map_err(|e| AuthError::InvalidSignature(format!("Failed to verify: {}", e)))
}

fn decode_signature(signature: &[u8]) -> Result<Signature> {
    let decoded = if signature.len() == SIGNATURE_LEN {
        Signature::from_slice(signature)
    } else {
        Signature::from_der(signature)
    };
    decoded.map_err(|e| AuthError::InvalidSignature(format!("Failed to parse signature: {}", e)))
}
