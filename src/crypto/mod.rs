pub mod challenge;
pub mod ecdsa;
pub mod key;

// Re-export main functions for easier access
pub use ecdsa::verify_signature;
pub use key::parse_public_key;
