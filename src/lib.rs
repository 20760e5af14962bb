//! # eid-auth
//!
//! **ECDSA challenge-response authentication** for clients holding a P-384 key,
//! such as an eID card. The server hands out single-use random challenges, the
//! client signs them with its private key, and the server checks the signature
//! against the client's public key.
//!
//! ## Features
//!
//! - **SubjectPublicKeyInfo decoding** - Extracts the curve and uncompressed point of a P-384 key
//! - **ECDSA Signature Verification** - P-384 with SHA-384, fail-closed
//! - **Challenge Store** - Concurrent in-memory bookkeeping with an optional expiry policy
//! - **HTTP Server** - `GET /auth/challenge` and `POST /auth/authenticate` built on axum
//!
//! ## Quick Start
//!
//! ```rust
//! use eid_auth::{AuthRequest, AuthService, ChallengeStore, StaticKeyResolver};
//! use eid_auth::keys::EID_CARD_PUBLIC_KEY;
//! use std::sync::Arc;
//!
//! // Setup authentication service
//! let keys = StaticKeyResolver::from_base64(EID_CARD_PUBLIC_KEY).unwrap();
//! let auth_service = AuthService::new(ChallengeStore::new(), Arc::new(keys));
//!
//! // Issue a challenge
//! let challenge = auth_service.request_challenge("client-1").unwrap();
//!
//! // Authenticate with the signed challenge
//! let auth_request = AuthRequest {
//!     client_id: "client-1".to_string(),
//!     signature: vec![0u8; 96], // r || s produced by the card
//! };
//!
//! match auth_service.authenticate(&auth_request) {
//!     Ok(authenticated) => println!("Authenticated: {}", authenticated),
//!     Err(e) => println!("Request rejected: {}", e),
//! }
//! ```
//!
//! ## Examples
//!
//! See the [basic_workflow demo](demos/basic_workflow.rs) for a complete authentication flow:
//!
//! ```bash
//! cargo run --example basic_workflow
//! ```

pub mod auth;
pub mod cleanup;
pub mod config;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod routing;
pub mod store;

// Re-export main types for easier access
pub use auth::{AuthRequest, AuthService};
pub use config::ServerConfig;
pub use crypto::challenge::{generate_challenge, Challenge};
pub use crypto::ecdsa::verify_signature;
pub use crypto::key::{parse_public_key, PublicKeyMaterial};
pub use error::{AuthError, Result};
pub use keys::{KeyResolver, StaticKeyResolver};
pub use store::{ChallengeStore, ExpiryPolicy, MaxAge, NeverExpire};
