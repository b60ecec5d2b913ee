//! Token ledger for the student intro ledger.
//!
//! Tracks reward mints and the per-(mint, owner) balances that hold them.
//! Every record is an account owned by [`TOKEN_LEDGER_ID`]; other programs
//! reach the ledger through [`InvokeContext::invoke_signed`] with the ledger
//! as callee, signing for mint authorities they derive themselves.
//!
//! [`InvokeContext::invoke_signed`]: sil_runtime::InvokeContext::invoke_signed

pub mod error;
pub mod ledger;
pub mod state;

pub use error::{TokenError, TokenResult};
pub use ledger::{
    associated_balance_address, create_associated_balance, initialize_mint, mint_to, read_balance,
    read_mint, BALANCE_SEED,
};
pub use state::{Mint, TokenBalance};
pub use sil_types::TOKEN_LEDGER_ID;
