//! Instruction processing.
//!
//! Each operation lives in its own module. They share the checks below:
//! every supplied account is compared with the address re-derived from its
//! seeds, and every record is decoded through its discriminator.

mod intro;
mod mint;
mod reply;
mod reward;

use sil_runtime::{AccountRecord, InvokeContext, Program, ProgramError, ProgramResult};
use sil_types::Address;
use tracing::debug;

use crate::address::{intro_address, PROGRAM_ID};
use crate::config::ProgramConfig;
use crate::error::{IntroError, IntroResult};
use crate::instruction::IntroInstruction;
use crate::state::IntroductionRecord;

/// The student intro program, ready to register with a runtime.
#[derive(Debug, Default)]
pub struct StudentIntroProgram {
    config: ProgramConfig,
}

impl StudentIntroProgram {
    pub fn new(config: ProgramConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    fn dispatch(&self, ctx: &mut InvokeContext<'_>, instruction: IntroInstruction) -> IntroResult {
        match instruction {
            IntroInstruction::InitializeTokenMint => mint::initialize_token_mint(ctx, &self.config),
            IntroInstruction::AddStudentIntro { name, message } => {
                intro::add_student_intro(ctx, &self.config, &name, &message)
            }
            IntroInstruction::UpdateStudentIntro { name, message } => {
                intro::update_student_intro(ctx, &self.config, &name, &message)
            }
            IntroInstruction::AddReply { reply } => reply::add_reply(ctx, &self.config, &reply),
            IntroInstruction::Close => intro::close(ctx),
        }
    }
}

impl Program for StudentIntroProgram {
    fn id(&self) -> Address {
        PROGRAM_ID
    }

    fn name(&self) -> &str {
        "student-intro"
    }

    fn process(&self, ctx: &mut InvokeContext<'_>, data: &[u8]) -> ProgramResult {
        let instruction = IntroInstruction::unpack(data)?;
        self.dispatch(ctx, instruction).map_err(|error| {
            debug!(%error, "instruction rejected");
            ProgramError::from(error)
        })
    }
}

fn account_key(ctx: &InvokeContext<'_>, index: usize) -> IntroResult<Address> {
    ctx.account_metas()
        .get(index)
        .map(|meta| meta.address)
        .ok_or(IntroError::SubstrateAbort(ProgramError::NotEnoughAccountKeys))
}

fn require_signer(ctx: &InvokeContext<'_>, address: &Address) -> IntroResult {
    if !ctx.is_signer(address) {
        return Err(IntroError::Unauthorized);
    }
    Ok(())
}

fn require_address(supplied: &Address, expected: &Address) -> IntroResult {
    if supplied != expected {
        return Err(IntroError::AddressMismatch);
    }
    Ok(())
}

fn check_len(content: &str, max: usize) -> IntroResult {
    if content.len() > max {
        return Err(IntroError::ContentTooLarge);
    }
    Ok(())
}

/// Decode the introduction at `address`.
fn load_intro(ctx: &InvokeContext<'_>, address: &Address) -> IntroResult<IntroductionRecord> {
    let account = ctx.account(address)?;
    if !account.is_populated() {
        return Err(IntroError::RecordNotFound);
    }
    if !account.is_owned_by(&PROGRAM_ID) {
        return Err(IntroError::AddressMismatch);
    }
    IntroductionRecord::try_from_bytes(&account.data).map_err(|_| IntroError::AddressMismatch)
}

/// The introduction must sit at the address its author derives.
fn verify_intro(address: &Address, record: &IntroductionRecord) -> IntroResult {
    let (expected, bump) = intro_address(&record.author)?;
    if expected != *address || bump != record.bump {
        return Err(IntroError::AddressMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::address::{counter_address, reply_address, reward_mint_address};
    use crate::instruction;
    use crate::state::{ReplyCounter, ReplyRecord};
    use sil_crypto::Keypair;
    use sil_runtime::{
        Instruction, Message, RentSchedule, Runtime, RuntimeConfig, Transaction, TransactionError,
        TransactionReceipt,
    };
    use sil_store::InMemoryAccountStore;
    use sil_token::{associated_balance_address, TokenBalance};

    fn runtime() -> Runtime {
        let runtime = Runtime::new(
            Arc::new(InMemoryAccountStore::new()),
            RuntimeConfig {
                rent: RentSchedule {
                    lamports_per_byte: 1,
                    account_overhead: 0,
                },
                ..RuntimeConfig::default()
            },
        );
        runtime.register_program(Arc::new(StudentIntroProgram::default()));
        runtime
    }

    fn funded(runtime: &Runtime, lamports: u64) -> Keypair {
        let keypair = Keypair::generate();
        runtime.airdrop(&keypair.address(), lamports).unwrap();
        keypair
    }

    fn submit(
        runtime: &Runtime,
        ix: Instruction,
        signer: &Keypair,
    ) -> Result<TransactionReceipt, IntroError> {
        let tx = Transaction::new_signed(Message::new(vec![ix], 0), &[signer]).unwrap();
        runtime.process_transaction(&tx).map_err(|err| match err {
            TransactionError::InstructionError { error, .. } => {
                IntroError::from_program_error(error)
            }
            other => panic!("unexpected transaction error: {other}"),
        })
    }

    fn fetch<T: AccountRecord>(runtime: &Runtime, address: &Address) -> Option<T> {
        let account = runtime.get_account(address).unwrap()?;
        T::try_from_bytes(&account.data).ok()
    }

    fn with_mint() -> Runtime {
        let runtime = runtime();
        let payer = funded(&runtime, 1_000);
        submit(
            &runtime,
            instruction::initialize_token_mint(&payer.address()).unwrap(),
            &payer,
        )
        .unwrap();
        runtime
    }

    fn intro_of(author: &Keypair) -> Address {
        intro_address(&author.address()).unwrap().0
    }

    #[test]
    fn mint_initializes_once() {
        let runtime = runtime();
        let payer = funded(&runtime, 1_000);
        let ix = instruction::initialize_token_mint(&payer.address()).unwrap();
        submit(&runtime, ix.clone(), &payer).unwrap();
        assert_eq!(submit(&runtime, ix, &payer).unwrap_err(), IntroError::AlreadyInitialized);
    }

    #[test]
    fn intro_without_mint_rolls_back() {
        let runtime = runtime();
        let author = funded(&runtime, 1_000);
        let ix = instruction::add_student_intro(&author.address(), "name", "message").unwrap();
        assert_eq!(submit(&runtime, ix, &author).unwrap_err(), IntroError::MintUninitialized);
        assert!(runtime.get_account(&intro_of(&author)).unwrap().is_none());
        assert_eq!(
            runtime.get_account(&author.address()).unwrap().unwrap().lamports,
            1_000
        );
    }

    #[test]
    fn intro_is_written_with_counter_at_zero_and_rewarded() {
        let runtime = with_mint();
        let author = funded(&runtime, 1_000);
        let ix = instruction::add_student_intro(&author.address(), "name", "message").unwrap();
        let receipt = submit(&runtime, ix, &author).unwrap();

        let intro = intro_of(&author);
        let record: IntroductionRecord = fetch(&runtime, &intro).unwrap();
        assert_eq!((record.name.as_str(), record.message.as_str()), ("name", "message"));
        assert_eq!(record.author, author.address());

        let (counter, _) = counter_address(&intro).unwrap();
        assert_eq!(fetch::<ReplyCounter>(&runtime, &counter).unwrap().counter, 0);

        let (mint, _) = reward_mint_address().unwrap();
        let (balance, _) = associated_balance_address(&mint, &author.address()).unwrap();
        let holding: TokenBalance = fetch(&runtime, &balance).unwrap();
        assert_eq!(holding.amount, ProgramConfig::default().intro_reward);
        assert!(receipt.logs.iter().any(|line| line.contains("introduced as")));
    }

    #[test]
    fn oversized_content_is_rejected() {
        let runtime = with_mint();
        let author = funded(&runtime, 10_000);
        let long_name = "x".repeat(65);
        let ix = instruction::add_student_intro(&author.address(), &long_name, "m").unwrap();
        assert_eq!(submit(&runtime, ix, &author).unwrap_err(), IntroError::ContentTooLarge);
    }

    #[test]
    fn substituted_intro_account_is_rejected() {
        let runtime = with_mint();
        let author = funded(&runtime, 1_000);
        let mut ix = instruction::add_student_intro(&author.address(), "n", "m").unwrap();
        ix.accounts[1].address = Address::new([42; 32]);
        assert_eq!(submit(&runtime, ix, &author).unwrap_err(), IntroError::AddressMismatch);
    }

    #[test]
    fn stranger_cannot_update_or_close() {
        let runtime = with_mint();
        let author = funded(&runtime, 1_000);
        let stranger = funded(&runtime, 1_000);
        submit(
            &runtime,
            instruction::add_student_intro(&author.address(), "name", "message").unwrap(),
            &author,
        )
        .unwrap();
        let intro = intro_of(&author);

        let update = instruction::update_student_intro(&stranger.address(), &intro, "evil", "evil");
        assert_eq!(submit(&runtime, update, &stranger).unwrap_err(), IntroError::Unauthorized);
        let close = instruction::close(&stranger.address(), &intro);
        assert_eq!(submit(&runtime, close, &stranger).unwrap_err(), IntroError::Unauthorized);

        let record: IntroductionRecord = fetch(&runtime, &intro).unwrap();
        assert_eq!(record.name, "name");
    }

    #[test]
    fn closed_author_cannot_introduce_again() {
        let runtime = with_mint();
        let author = funded(&runtime, 1_000);
        let add = instruction::add_student_intro(&author.address(), "name", "message").unwrap();
        submit(&runtime, add.clone(), &author).unwrap();
        let intro = intro_of(&author);
        submit(&runtime, instruction::close(&author.address(), &intro), &author).unwrap();
        assert!(runtime.get_account(&intro).unwrap().is_none());

        let (mint, _) = reward_mint_address().unwrap();
        let (balance, _) = associated_balance_address(&mint, &author.address()).unwrap();
        let before = runtime.get_account(&author.address()).unwrap().unwrap().lamports;
        assert_eq!(submit(&runtime, add, &author).unwrap_err(), IntroError::RecordAlreadyExists);

        assert!(runtime.get_account(&intro).unwrap().is_none());
        let (counter, _) = counter_address(&intro).unwrap();
        assert_eq!(fetch::<ReplyCounter>(&runtime, &counter).unwrap().counter, 0);
        let holding: TokenBalance = fetch(&runtime, &balance).unwrap();
        assert_eq!(holding.amount, ProgramConfig::default().intro_reward);
        let after = runtime.get_account(&author.address()).unwrap().unwrap().lamports;
        assert_eq!(after, before);
    }

    #[test]
    fn update_resizes_in_both_directions() {
        let runtime = with_mint();
        let author = funded(&runtime, 10_000);
        submit(
            &runtime,
            instruction::add_student_intro(&author.address(), "name", "message").unwrap(),
            &author,
        )
        .unwrap();
        let intro = intro_of(&author);

        for (name, message) in [("a much longer name", "and a much longer message"), ("n", "m")] {
            let ix = instruction::update_student_intro(&author.address(), &intro, name, message);
            submit(&runtime, ix, &author).unwrap();
            let account = runtime.get_account(&intro).unwrap().unwrap();
            assert_eq!(account.data_len(), IntroductionRecord::space(name.len(), message.len()));
            assert_eq!(account.lamports, account.data_len() as u64);
            let record: IntroductionRecord = fetch(&runtime, &intro).unwrap();
            assert_eq!((record.name.as_str(), record.message.as_str()), (name, message));
        }
    }

    #[test]
    fn growth_without_funds_is_resize_failed() {
        let runtime = with_mint();
        let intro_space = IntroductionRecord::space(4, 7);
        let exact = (intro_space + ReplyCounter::SPACE + TokenBalance::SPACE) as u64;
        let author = funded(&runtime, exact);
        submit(
            &runtime,
            instruction::add_student_intro(&author.address(), "name", "message").unwrap(),
            &author,
        )
        .unwrap();
        let intro = intro_of(&author);

        let longer = "a longer message";
        let ix = instruction::update_student_intro(&author.address(), &intro, "name", longer);
        assert_eq!(submit(&runtime, ix, &author).unwrap_err(), IntroError::ResizeFailed);
        let record: IntroductionRecord = fetch(&runtime, &intro).unwrap();
        assert_eq!(record.message, "message");
    }

    #[test]
    fn reply_must_target_current_counter() {
        let runtime = with_mint();
        let author = funded(&runtime, 1_000);
        let replier = funded(&runtime, 1_000);
        submit(
            &runtime,
            instruction::add_student_intro(&author.address(), "name", "message").unwrap(),
            &author,
        )
        .unwrap();
        let intro = intro_of(&author);

        let (ahead, _) = reply_address(&intro, 1).unwrap();
        let ix = instruction::add_reply(&replier.address(), &intro, &ahead, "reply").unwrap();
        assert_eq!(submit(&runtime, ix, &replier).unwrap_err(), IntroError::AddressMismatch);

        let (first, _) = reply_address(&intro, 0).unwrap();
        let ix = instruction::add_reply(&replier.address(), &intro, &first, "reply").unwrap();
        submit(&runtime, ix, &replier).unwrap();
        let stored: ReplyRecord = fetch(&runtime, &first).unwrap();
        assert_eq!(stored.reply, "reply");
        assert_eq!(stored.intro, intro);
    }

    #[test]
    fn reply_to_missing_intro_is_not_found() {
        let runtime = with_mint();
        let replier = funded(&runtime, 1_000);
        let (intro, _) = intro_address(&Address::new([8; 32])).unwrap();
        let (reply, _) = reply_address(&intro, 0).unwrap();
        let ix = instruction::add_reply(&replier.address(), &intro, &reply, "hello").unwrap();
        assert_eq!(submit(&runtime, ix, &replier).unwrap_err(), IntroError::RecordNotFound);
    }

    #[test]
    fn undecodable_instruction_is_rejected() {
        let runtime = with_mint();
        let payer = funded(&runtime, 1_000);
        let ix = Instruction::new(
            PROGRAM_ID,
            vec![0xde, 0xad],
            vec![sil_runtime::AccountMeta::new(payer.address(), true)],
        );
        assert_eq!(submit(&runtime, ix, &payer).unwrap_err(), IntroError::InvalidInstruction);
    }

    #[test]
    fn missing_accounts_abort() {
        let runtime = with_mint();
        let payer = funded(&runtime, 1_000);
        let ix = Instruction::new(
            PROGRAM_ID,
            IntroInstruction::Close.pack(),
            vec![sil_runtime::AccountMeta::new(payer.address(), true)],
        );
        assert_eq!(
            submit(&runtime, ix, &payer).unwrap_err(),
            IntroError::SubstrateAbort(ProgramError::NotEnoughAccountKeys)
        );
    }
}
