//! Foundation types for the student intro ledger.
//!
//! Every record in the ledger lives in an [`Account`] stored under a 32-byte
//! [`Address`]. Addresses double as signer identities (Ed25519 public keys)
//! and as deterministic record locations derived from seeds.
//!
//! # Key Types
//!
//! - [`Address`]: 32-byte account address / public identity
//! - [`Account`]: lamport balance, owning program, and raw record data
//! - [`SYSTEM_PROGRAM_ID`] / [`TOKEN_LEDGER_ID`]: builtin owner identities

pub mod account;
pub mod address;
pub mod error;

pub use account::Account;
pub use address::{Address, SYSTEM_PROGRAM_ID, TOKEN_LEDGER_ID};
pub use error::TypeError;
