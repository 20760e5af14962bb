use crate::error::{AuthError, Result};
use base64::prelude::*;
use p384::{
    ecdsa::VerifyingKey,
    elliptic_curve::ALGORITHM_OID,
    pkcs8::{
        der::{Decode, Encode},
        spki::SubjectPublicKeyInfoRef,
    },
    EncodedPoint, FieldBytes,
};
use sha2::{Digest, Sha256};

/// DER contents of the secp384r1 OID (1.3.132.0.34)
pub const SECP384R1_OID: [u8; 5] = [0x2B, 0x81, 0x04, 0x00, 0x22];

/// Width of one P-384 affine coordinate
pub const COORDINATE_LEN: usize = 48;

// Parameters field layout: 06 05 <oid>
const CURVE_OID_OFFSET: usize = 2;
const CURVE_PARAMS_HEADER: [u8; CURVE_OID_OFFSET] = [0x06, SECP384R1_OID.len() as u8];

// Point layout: 04 <x> <y>
const UNCOMPRESSED_TAG: u8 = 0x04;
const POINT_LEN: usize = 1 + 2 * COORDINATE_LEN;

/// Elliptic curves a key may be declared on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedCurve {
    P384,
}

impl NamedCurve {
    /// DER contents of the curve's object identifier
    pub fn oid(&self) -> &'static [u8] {
        match self {
            NamedCurve::P384 => &SECP384R1_OID,
        }
    }
}

/// Decoded EC public key: the named curve and the affine point Q = (X, Y)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    curve: NamedCurve,
    x: [u8; COORDINATE_LEN],
    y: [u8; COORDINATE_LEN],
}

impl PublicKeyMaterial {
    /// Decode a DER SubjectPublicKeyInfo, see [`parse_public_key`]
    pub fn from_der(der_bytes: &[u8]) -> Result<Self> {
        parse_public_key(der_bytes)
    }

    /// Decode a base64-encoded DER SubjectPublicKeyInfo
    pub fn from_base64(spki_b64: &str) -> Result<Self> {
        let der_bytes = BASE64_STANDARD
            .decode(spki_b64.trim())
            .map_err(|e| AuthError::Base64Error(format!("Failed to decode public key: {}", e)))?;
        parse_public_key(&der_bytes)
    }

    pub fn curve(&self) -> NamedCurve {
        self.curve
    }

    pub fn x(&self) -> &[u8; COORDINATE_LEN] {
        &self.x
    }

    pub fn y(&self) -> &[u8; COORDINATE_LEN] {
        &self.y
    }

    /// Build the ECDSA verifying key for this point
    ///
    /// Fails if the point does not lie on the curve.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_encoded_point(&self.encoded_point()).map_err(|e| {
            AuthError::UnsupportedOrMalformedKey(format!("Point is not on the curve: {}", e))
        })
    }

    /// Hex SHA-256 of the uncompressed SEC1 point, for logging
    pub fn fingerprint(&self) -> String {
        let point = self.encoded_point();
        hex::encode(Sha256::digest(point.as_bytes()))
    }

    fn encoded_point(&self) -> EncodedPoint {
        EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(&self.x),
            FieldBytes::from_slice(&self.y),
            false,
        )
    }
}

/// Decode a DER-encoded SubjectPublicKeyInfo wrapping a P-384 key
///
/// The curve is identified by the five OID bytes at offset 2 of the encoded
/// algorithm parameters; only secp384r1 is accepted. The subjectPublicKey bit
/// string must hold an uncompressed point: a `0x04` tag followed by the 48-byte
/// X and Y coordinates.
///
/// # Errors
/// Every failure is reported as `UnsupportedOrMalformedKey`.
///
/// # Example
/// ```rust
/// use eid_auth::crypto::key::{parse_public_key, NamedCurve};
/// use eid_auth::keys::EID_CARD_PUBLIC_KEY;
/// use base64::prelude::*;
///
/// let der = BASE64_STANDARD.decode(EID_CARD_PUBLIC_KEY).unwrap();
/// let key = parse_public_key(&der).unwrap();
/// assert_eq!(key.curve(), NamedCurve::P384);
/// ```
pub fn parse_public_key(der_bytes: &[u8]) -> Result<PublicKeyMaterial> {
    let spki = SubjectPublicKeyInfoRef::from_der(der_bytes)
        .map_err(|e| malformed(format!("Invalid SubjectPublicKeyInfo: {}", e)))?;

    if spki.algorithm.oid != ALGORITHM_OID {
        return Err(malformed(format!(
            "Not an EC public key (algorithm {})",
            spki.algorithm.oid
        )));
    }

    let params = spki
        .algorithm
        .parameters
        .ok_or_else(|| malformed("Missing curve parameters".to_string()))?
        .to_der()
        .map_err(|e| malformed(format!("Invalid curve parameters: {}", e)))?;

    let (header, curve_oid) = params.split_at(CURVE_OID_OFFSET.min(params.len()));
    if header != CURVE_PARAMS_HEADER || curve_oid != SECP384R1_OID {
        return Err(malformed(format!(
            "Unsupported curve parameters: {}",
            hex::encode(&params)
        )));
    }

    let point = spki
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| malformed("Public key bit string is not byte aligned".to_string()))?;

    if point.len() != POINT_LEN {
        return Err(malformed(format!(
            "Expected a {}-byte point, got {} bytes",
            POINT_LEN,
            point.len()
        )));
    }
    if point[0] != UNCOMPRESSED_TAG {
        return Err(malformed(format!(
            "Unsupported point compression tag 0x{:02x}",
            point[0]
        )));
    }

    let mut x = [0u8; COORDINATE_LEN];
    let mut y = [0u8; COORDINATE_LEN];
    x.copy_from_slice(&point[1..1 + COORDINATE_LEN]);
    y.copy_from_slice(&point[1 + COORDINATE_LEN..]);

    Ok(PublicKeyMaterial {
        curve: NamedCurve::P384,
        x,
        y,
    })
}

fn malformed(msg: String) -> AuthError {
    AuthError::UnsupportedOrMalformedKey(msg)
}
