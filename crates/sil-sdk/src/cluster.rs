use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sil_crypto::Keypair;
use sil_intro::StudentIntroProgram;
use sil_runtime::{Instruction, Message, Runtime, Transaction, TransactionReceipt};
use sil_store::InMemoryAccountStore;
use sil_types::{Account, Address};
use tracing::debug;

use crate::config::ClusterConfig;
use crate::error::SdkResult;

/// A runtime over an in-memory store with the student intro program
/// registered: the local validator of this ledger.
pub struct LocalCluster {
    runtime: Runtime,
    store: Arc<InMemoryAccountStore>,
    config: ClusterConfig,
    nonce: AtomicU64,
}

impl LocalCluster {
    pub fn new(config: ClusterConfig) -> Self {
        let store = Arc::new(InMemoryAccountStore::new());
        let runtime = Runtime::new(store.clone(), config.runtime.clone());
        runtime.register_program(Arc::new(StudentIntroProgram::new(config.program.clone())));
        Self {
            runtime,
            store,
            config,
            nonce: AtomicU64::new(0),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn store(&self) -> &InMemoryAccountStore {
        &self.store
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn airdrop(&self, address: &Address, lamports: u64) -> SdkResult<()> {
        Ok(self.runtime.airdrop(address, lamports)?)
    }

    /// A fresh keypair holding `lamports`.
    pub fn funded_keypair(&self, lamports: u64) -> SdkResult<Keypair> {
        let keypair = Keypair::generate();
        self.airdrop(&keypair.address(), lamports)?;
        Ok(keypair)
    }

    pub fn get_account(&self, address: &Address) -> SdkResult<Option<Account>> {
        Ok(self.runtime.get_account(address)?)
    }

    /// Sign and execute `instructions` as one transaction.
    pub fn submit(
        &self,
        instructions: Vec<Instruction>,
        signers: &[&Keypair],
    ) -> SdkResult<TransactionReceipt> {
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        let tx = Transaction::new_signed(Message::new(instructions, nonce), signers)?;
        let receipt = self.runtime.process_transaction(&tx)?;
        for line in &receipt.logs {
            debug!(nonce, "{line}");
        }
        Ok(receipt)
    }
}

impl Default for LocalCluster {
    fn default() -> Self {
        Self::new(ClusterConfig::default())
    }
}

impl std::fmt::Debug for LocalCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCluster")
            .field("accounts", &self.store.len())
            .field("config", &self.config)
            .finish()
    }
}
