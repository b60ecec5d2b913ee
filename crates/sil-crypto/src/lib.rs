//! Cryptographic primitives for the student intro ledger.
//!
//! Provides the address deriver (seeded, off-curve record addresses),
//! domain-separated BLAKE3 hashing, and Ed25519 signing/verification.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod derive;
pub mod hasher;
pub mod signer;

pub use derive::{
    create_address, derive_address, is_on_curve, verify_derived, DeriveError, MAX_SEEDS,
    MAX_SEED_LEN,
};
pub use hasher::ContentHasher;
pub use signer::{verify_signature, Keypair, Signature, SignatureError};
