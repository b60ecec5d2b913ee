//! Client SDK for the student intro ledger.
//!
//! [`LocalCluster`] wires a runtime, an in-memory account store, and the
//! student intro program together. [`IntroClient`] drives the protocol on
//! top of it with typed operations and record fetches, and maps runtime
//! failures back to [`IntroError`] kinds.

pub mod client;
pub mod cluster;
pub mod config;
pub mod error;

pub use client::IntroClient;
pub use cluster::LocalCluster;
pub use config::ClusterConfig;
pub use error::{SdkError, SdkResult};

// Re-export key types
pub use sil_crypto::Keypair;
pub use sil_intro::{IntroError, IntroductionRecord, ProgramConfig, ReplyRecord};
pub use sil_runtime::{RuntimeConfig, TransactionReceipt};
pub use sil_types::Address;
