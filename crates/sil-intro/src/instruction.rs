//! Instruction encoding and builders.
//!
//! The builders list accounts in the exact order the processor reads them.

use serde::{Deserialize, Serialize};
use sil_crypto::DeriveError;
use sil_runtime::{AccountMeta, Instruction};
use sil_token::associated_balance_address;
use sil_types::Address;

use crate::address::{counter_address, intro_address, reward_mint_address, PROGRAM_ID};
use crate::error::IntroError;

/// Operations of the student intro program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroInstruction {
    /// Accounts: `[payer (w, s), reward_mint (w)]`
    InitializeTokenMint,
    /// Accounts: `[author (w, s), intro (w), counter (w), reward_mint (w), author_balance (w)]`
    AddStudentIntro { name: String, message: String },
    /// Accounts: `[author (w, s), intro (w)]`
    UpdateStudentIntro { name: String, message: String },
    /// Accounts: `[replier (w, s), intro, counter (w), reply (w), reward_mint (w),
    /// replier_balance (w)]`
    AddReply { reply: String },
    /// Accounts: `[author (w, s), intro (w)]`
    Close,
}

impl IntroInstruction {
    pub fn pack(&self) -> Vec<u8> {
        bincode::serialize(self).expect("instruction serialization")
    }

    pub fn unpack(data: &[u8]) -> Result<Self, IntroError> {
        bincode::deserialize(data).map_err(|_| IntroError::InvalidInstruction)
    }
}

fn reward_balance(owner: &Address) -> Result<(Address, Address), DeriveError> {
    let (mint, _) = reward_mint_address()?;
    let (balance, _) =
        associated_balance_address(&mint, owner).map_err(|_| DeriveError::InvalidSeeds)?;
    Ok((mint, balance))
}

pub fn initialize_token_mint(payer: &Address) -> Result<Instruction, DeriveError> {
    let (mint, _) = reward_mint_address()?;
    Ok(Instruction::new(
        PROGRAM_ID,
        IntroInstruction::InitializeTokenMint.pack(),
        vec![AccountMeta::new(*payer, true), AccountMeta::new(mint, false)],
    ))
}

pub fn add_student_intro(
    author: &Address,
    name: &str,
    message: &str,
) -> Result<Instruction, DeriveError> {
    let (intro, _) = intro_address(author)?;
    let (counter, _) = counter_address(&intro)?;
    let (mint, balance) = reward_balance(author)?;
    Ok(Instruction::new(
        PROGRAM_ID,
        IntroInstruction::AddStudentIntro {
            name: name.to_owned(),
            message: message.to_owned(),
        }
        .pack(),
        vec![
            AccountMeta::new(*author, true),
            AccountMeta::new(intro, false),
            AccountMeta::new(counter, false),
            AccountMeta::new(mint, false),
            AccountMeta::new(balance, false),
        ],
    ))
}

pub fn update_student_intro(
    author: &Address,
    intro: &Address,
    name: &str,
    message: &str,
) -> Instruction {
    Instruction::new(
        PROGRAM_ID,
        IntroInstruction::UpdateStudentIntro {
            name: name.to_owned(),
            message: message.to_owned(),
        }
        .pack(),
        vec![AccountMeta::new(*author, true), AccountMeta::new(*intro, false)],
    )
}

/// Reply to `intro`, writing the reply at `reply`.
///
/// `reply` must be the address derived from the counter value the reply will
/// be created at; see [`reply_address`](crate::address::reply_address).
pub fn add_reply(
    replier: &Address,
    intro: &Address,
    reply: &Address,
    content: &str,
) -> Result<Instruction, DeriveError> {
    let (counter, _) = counter_address(intro)?;
    let (mint, balance) = reward_balance(replier)?;
    Ok(Instruction::new(
        PROGRAM_ID,
        IntroInstruction::AddReply {
            reply: content.to_owned(),
        }
        .pack(),
        vec![
            AccountMeta::new(*replier, true),
            AccountMeta::new_readonly(*intro, false),
            AccountMeta::new(counter, false),
            AccountMeta::new(*reply, false),
            AccountMeta::new(mint, false),
            AccountMeta::new(balance, false),
        ],
    ))
}

pub fn close(author: &Address, intro: &Address) -> Instruction {
    Instruction::new(
        PROGRAM_ID,
        IntroInstruction::Close.pack(),
        vec![AccountMeta::new(*author, true), AccountMeta::new(*intro, false)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_reverses_pack() {
        let ix = IntroInstruction::AddReply {
            reply: "hello".into(),
        };
        assert_eq!(IntroInstruction::unpack(&ix.pack()).unwrap(), ix);
    }

    #[test]
    fn garbage_is_invalid_instruction() {
        assert_eq!(
            IntroInstruction::unpack(&[0xff, 0xff, 0xff, 0xff]),
            Err(IntroError::InvalidInstruction)
        );
        assert_eq!(IntroInstruction::unpack(&[]), Err(IntroError::InvalidInstruction));
    }

    #[test]
    fn add_intro_lists_derived_accounts() {
        let author = Address::new([4; 32]);
        let ix = add_student_intro(&author, "n", "m").unwrap();
        let (intro, _) = intro_address(&author).unwrap();
        let (counter, _) = counter_address(&intro).unwrap();
        let addresses: Vec<Address> = ix.accounts.iter().map(|m| m.address).collect();
        assert_eq!(addresses[..3], [author, intro, counter]);
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts.iter().all(|m| m.is_writable));
    }

    #[test]
    fn reply_reads_intro_without_locking_it_for_write() {
        let replier = Address::new([4; 32]);
        let intro = Address::new([5; 32]);
        let ix = add_reply(&replier, &intro, &Address::new([6; 32]), "r").unwrap();
        assert!(!ix.accounts[1].is_writable);
        assert!(ix.accounts[2].is_writable);
    }
}
