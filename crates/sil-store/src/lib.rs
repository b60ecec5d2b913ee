//! Address-keyed account storage for the student intro ledger.
//!
//! The store holds the committed state of every account. It knows nothing
//! about record layouts or transactions: the runtime loads accounts into a
//! private overlay, executes against the overlay, and hands the store one
//! batch of changes to apply atomically.
//!
//! # Storage Backends
//!
//! All backends implement the [`AccountStore`] trait:
//!
//! - [`InMemoryAccountStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A commit batch is applied entirely or not at all.
//! 2. Writing an account with no lamports and no data removes it.
//! 3. Concurrent reads are always safe.
//! 4. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryAccountStore;
pub use traits::AccountStore;
