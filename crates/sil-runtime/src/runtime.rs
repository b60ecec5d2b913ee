use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use sil_store::AccountStore;
use sil_types::{Account, Address};
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::context::InvokeContext;
use crate::error::TransactionError;
use crate::locks::AccountLocks;
use crate::overlay::TransactionAccounts;
use crate::program::Program;
use crate::transaction::Transaction;

/// What a committed transaction produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Hash of the signed message.
    pub message_hash: [u8; 32],
    /// Log lines emitted by the executed instructions.
    pub logs: Vec<String>,
    /// Accounts whose committed state changed.
    pub changed_accounts: Vec<Address>,
}

/// The execution substrate.
///
/// Every transaction runs in four steps: verify signatures, lock every
/// referenced account, execute all instructions against a private overlay,
/// then commit the overlay to the store as one batch. A failure at any step
/// leaves the store exactly as it was.
pub struct Runtime {
    store: Arc<dyn AccountStore>,
    programs: RwLock<HashMap<Address, Arc<dyn Program>>>,
    locks: AccountLocks,
    config: RuntimeConfig,
}

impl Runtime {
    pub fn new(store: Arc<dyn AccountStore>, config: RuntimeConfig) -> Self {
        Self {
            store,
            programs: RwLock::new(HashMap::new()),
            locks: AccountLocks::new(),
            config,
        }
    }

    /// Make `program` callable at its id. Replaces any previous registration.
    pub fn register_program(&self, program: Arc<dyn Program>) {
        info!(program = program.name(), id = %program.id().short_id(), "registered program");
        self.programs
            .write()
            .expect("lock poisoned")
            .insert(program.id(), program);
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Committed state of an account, if any.
    pub fn get_account(&self, address: &Address) -> Result<Option<Account>, TransactionError> {
        Ok(self.store.read(address)?)
    }

    /// Credit `lamports` to `address` out of thin air (local faucet).
    pub fn airdrop(&self, address: &Address, lamports: u64) -> Result<(), TransactionError> {
        let _guard = self.locks.lock(vec![*address], vec![]);
        let mut account = self
            .store
            .read(address)?
            .unwrap_or_else(|| Account::with_lamports(0));
        account.lamports = account
            .lamports
            .checked_add(lamports)
            .ok_or(TransactionError::LamportOverflow)?;
        self.store.commit(&[(*address, account)])?;
        debug!(address = %address.short_id(), lamports, "airdrop");
        Ok(())
    }

    /// Execute `tx` atomically.
    pub fn process_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<TransactionReceipt, TransactionError> {
        let message_hash = tx.message.hash()?;
        let signers = tx.verify()?;

        let programs = self.resolve_programs(tx)?;
        let keys = tx.message.account_keys();
        let writable: Vec<Address> = keys.iter().filter(|(_, w)| *w).map(|(a, _)| *a).collect();
        let readonly: Vec<Address> = keys.iter().filter(|(_, w)| !*w).map(|(a, _)| *a).collect();
        let addresses: Vec<Address> = keys.iter().map(|(a, _)| *a).collect();

        let _guard = self.locks.lock(writable, readonly);
        let mut overlay = TransactionAccounts::load(self.store.as_ref(), &addresses)?;
        let mut logs = Vec::new();

        for (index, (instruction, program)) in
            tx.message.instructions.iter().zip(programs).enumerate()
        {
            let mut ctx = InvokeContext::new(
                instruction.program_id,
                &instruction.accounts,
                &mut overlay,
                signers.clone(),
                &self.config,
                &mut logs,
            );
            if let Err(error) = program.process(&mut ctx, &instruction.data) {
                warn!(
                    program = program.name(),
                    index,
                    %error,
                    "instruction failed, transaction rolled back"
                );
                return Err(TransactionError::InstructionError { index, error });
            }
        }

        let before = overlay.original_lamports();
        let after = overlay.total_lamports();
        if before != after {
            return Err(TransactionError::UnbalancedTransaction { before, after });
        }

        let changes = overlay.changes();
        self.store.commit(&changes)?;
        debug!(
            message = %hex_prefix(&message_hash),
            changed = changes.len(),
            "transaction committed"
        );

        Ok(TransactionReceipt {
            message_hash,
            logs,
            changed_accounts: changes.into_iter().map(|(a, _)| a).collect(),
        })
    }

    fn resolve_programs(
        &self,
        tx: &Transaction,
    ) -> Result<Vec<Arc<dyn Program>>, TransactionError> {
        let programs = self.programs.read().expect("lock poisoned");
        tx.message
            .instructions
            .iter()
            .map(|ix| {
                programs
                    .get(&ix.program_id)
                    .cloned()
                    .ok_or(TransactionError::UnknownProgram(ix.program_id))
            })
            .collect()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let programs = self.programs.read().expect("lock poisoned").len();
        f.debug_struct("Runtime")
            .field("programs", &programs)
            .field("config", &self.config)
            .finish()
    }
}

fn hex_prefix(hash: &[u8; 32]) -> String {
    hash[..4].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProgramError, ProgramResult};
    use crate::rent::RentSchedule;
    use crate::transaction::{AccountMeta, Instruction, Message};
    use sil_crypto::{derive_address, Keypair};
    use sil_store::InMemoryAccountStore;

    const TALLY: Address = Address::from_tag(b"tally-program");

    /// Keeps a one-byte tally at a derived address. Instruction data is
    /// `[increment, fail_after]`.
    struct Tally;

    impl Program for Tally {
        fn id(&self) -> Address {
            TALLY
        }

        fn name(&self) -> &str {
            "tally"
        }

        fn process(&self, ctx: &mut InvokeContext<'_>, data: &[u8]) -> ProgramResult {
            let [increment, fail_after] = data else {
                return Err(ProgramError::InvalidInstructionData);
            };
            let payer = ctx.account_metas()[0].address;
            let (tally, bump) = derive_address(&[b"tally"], &TALLY)
                .map_err(|_| ProgramError::InvalidSeeds)?;
            if !ctx.is_populated(&tally)? {
                ctx.create_account(&payer, &tally, 1, &TALLY, &[b"tally", &[bump]])?;
            }
            let slot = ctx.data_mut(&tally)?;
            slot[0] = slot[0].wrapping_add(*increment);
            let value = slot[0];
            ctx.log(format!("tally {value}"));
            if *fail_after != 0 {
                return Err(ProgramError::Custom(42));
            }
            Ok(())
        }
    }

    fn setup() -> (Runtime, Arc<InMemoryAccountStore>, Keypair, Address) {
        let store = Arc::new(InMemoryAccountStore::new());
        let runtime = Runtime::new(
            store.clone(),
            RuntimeConfig {
                rent: RentSchedule {
                    lamports_per_byte: 1,
                    account_overhead: 0,
                },
                ..RuntimeConfig::default()
            },
        );
        runtime.register_program(Arc::new(Tally));
        let payer = Keypair::generate();
        runtime.airdrop(&payer.address(), 1_000).unwrap();
        let (tally, _) = derive_address(&[b"tally"], &TALLY).unwrap();
        (runtime, store, payer, tally)
    }

    fn tally_tx(
        payer: &Keypair,
        tally: Address,
        increment: u8,
        fail: bool,
        nonce: u64,
    ) -> Transaction {
        let ix = Instruction::new(
            TALLY,
            vec![increment, u8::from(fail)],
            vec![
                AccountMeta::new(payer.address(), true),
                AccountMeta::new(tally, false),
            ],
        );
        Transaction::new_signed(Message::new(vec![ix], nonce), &[payer]).unwrap()
    }

    #[test]
    fn successful_transaction_commits() {
        let (runtime, _, payer, tally) = setup();
        let receipt = runtime
            .process_transaction(&tally_tx(&payer, tally, 3, false, 0))
            .unwrap();
        assert_eq!(receipt.logs, vec!["tally 3".to_string()]);
        assert_eq!(runtime.get_account(&tally).unwrap().unwrap().data, vec![3]);
        assert_eq!(
            runtime.get_account(&payer.address()).unwrap().unwrap().lamports,
            999
        );
    }

    #[test]
    fn failed_instruction_rolls_back_everything() {
        let (runtime, store, payer, tally) = setup();
        let before = store.total_lamports();
        let err = runtime
            .process_transaction(&tally_tx(&payer, tally, 3, true, 0))
            .unwrap_err();
        assert_eq!(
            err,
            TransactionError::InstructionError {
                index: 0,
                error: ProgramError::Custom(42)
            }
        );
        assert!(runtime.get_account(&tally).unwrap().is_none());
        assert_eq!(store.total_lamports(), before);
    }

    #[test]
    fn later_instruction_failure_undoes_earlier_ones() {
        let (runtime, _, payer, tally) = setup();
        let metas = vec![
            AccountMeta::new(payer.address(), true),
            AccountMeta::new(tally, false),
        ];
        let message = Message::new(
            vec![
                Instruction::new(TALLY, vec![1, 0], metas.clone()),
                Instruction::new(TALLY, vec![1, 1], metas),
            ],
            0,
        );
        let tx = Transaction::new_signed(message, &[&payer]).unwrap();
        let err = runtime.process_transaction(&tx).unwrap_err();
        assert_eq!(err.instruction_error(), Some(&ProgramError::Custom(42)));
        assert!(runtime.get_account(&tally).unwrap().is_none());
    }

    #[test]
    fn unsigned_transaction_is_rejected() {
        let (runtime, _, payer, tally) = setup();
        let mut tx = tally_tx(&payer, tally, 1, false, 0);
        tx.signatures.clear();
        assert_eq!(
            runtime.process_transaction(&tx),
            Err(TransactionError::MissingSignature(payer.address()))
        );
    }

    #[test]
    fn unknown_program_is_rejected() {
        let (runtime, _, payer, _) = setup();
        let stranger = Address::from_tag(b"nobody");
        let ix = Instruction::new(stranger, vec![], vec![AccountMeta::new(payer.address(), true)]);
        let tx = Transaction::new_signed(Message::new(vec![ix], 0), &[&payer]).unwrap();
        assert_eq!(
            runtime.process_transaction(&tx),
            Err(TransactionError::UnknownProgram(stranger))
        );
    }

    #[test]
    fn store_failure_aborts_commit() {
        let (runtime, store, payer, tally) = setup();
        store.set_read_only(true);
        let err = runtime
            .process_transaction(&tally_tx(&payer, tally, 1, false, 0))
            .unwrap_err();
        assert!(matches!(err, TransactionError::Store(_)));
        store.set_read_only(false);
        assert!(runtime.get_account(&tally).unwrap().is_none());
    }

    #[test]
    fn concurrent_writers_are_serialized() {
        let (runtime, _, payer, tally) = setup();
        let runtime = Arc::new(runtime);
        let payer = Arc::new(payer);

        std::thread::scope(|scope| {
            for nonce in 0..8u64 {
                let runtime = Arc::clone(&runtime);
                let payer = Arc::clone(&payer);
                scope.spawn(move || {
                    runtime
                        .process_transaction(&tally_tx(&payer, tally, 1, false, nonce))
                        .unwrap();
                });
            }
        });

        assert_eq!(runtime.get_account(&tally).unwrap().unwrap().data, vec![8]);
    }

    #[test]
    fn airdrop_accumulates() {
        let (runtime, _, payer, _) = setup();
        runtime.airdrop(&payer.address(), 5).unwrap();
        assert_eq!(
            runtime.get_account(&payer.address()).unwrap().unwrap().lamports,
            1_005
        );
    }
}
