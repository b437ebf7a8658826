//! Verification of the signed identity payload ("init data") supplied by the
//! chat-client host.
//!
//! - `parser` — form-decoding and the canonical check-string
//! - `verifier` — HMAC verification, replay window, per-tenant secrets
//! - `signer` — producing correctly signed payloads for development and tests
//! - `user` — the verified identity shape

pub mod parser;
pub mod signer;
pub mod user;
pub mod verifier;

pub use signer::sign_init_data;
pub use user::{InitDataUser, VerifiedUser};
pub use verifier::{FreshnessPolicy, InitDataSecrets, InitDataVerifier, verify};
