//! Atomic execution substrate for the student intro ledger.
//!
//! This crate plays the role of the chain runtime underneath the protocol:
//! - `Transaction` / `Message` / `Instruction` types with Ed25519 signatures
//! - Per-address account locks (exclusive writers, shared readers)
//! - A copy-on-write overlay that commits all effects or none
//! - `InvokeContext`: account creation, resize, and close with rent accounting
//! - Program-signed cross-program invocation (`invoke_signed`)
//! - The `Program` trait implemented by everything the runtime can execute
//! - `AccountRecord`: discriminated `bincode` layout for typed account data

pub mod config;
pub mod context;
pub mod error;
pub mod locks;
pub mod overlay;
pub mod program;
pub mod record;
pub mod rent;
pub mod runtime;
pub mod transaction;

pub use config::{RuntimeConfig, MAX_ACCOUNT_DATA_LEN};
pub use context::InvokeContext;
pub use error::{ProgramError, ProgramResult, TransactionError};
pub use locks::{AccountLockGuard, AccountLocks};
pub use overlay::TransactionAccounts;
pub use program::Program;
pub use record::AccountRecord;
pub use rent::RentSchedule;
pub use runtime::{Runtime, TransactionReceipt};
pub use transaction::{AccountMeta, Instruction, Message, Transaction};
