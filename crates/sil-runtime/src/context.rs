use std::collections::BTreeSet;

use sil_crypto::create_address;
use sil_types::{Account, Address, SYSTEM_PROGRAM_ID};
use tracing::debug;

use crate::config::RuntimeConfig;
use crate::error::{ProgramError, ProgramResult};
use crate::overlay::TransactionAccounts;
use crate::rent::RentSchedule;
use crate::transaction::AccountMeta;

/// Everything a program may see and do while executing one instruction.
///
/// Access is limited to the accounts listed in the instruction. Data may only
/// change on writable accounts owned by the executing program, and lamports
/// only move through the allocation helpers below, which keep every account
/// at its storage deposit.
pub struct InvokeContext<'a> {
    program_id: Address,
    metas: &'a [AccountMeta],
    accounts: &'a mut TransactionAccounts,
    signers: BTreeSet<Address>,
    config: &'a RuntimeConfig,
    logs: &'a mut Vec<String>,
}

impl<'a> InvokeContext<'a> {
    pub fn new(
        program_id: Address,
        metas: &'a [AccountMeta],
        accounts: &'a mut TransactionAccounts,
        signers: BTreeSet<Address>,
        config: &'a RuntimeConfig,
        logs: &'a mut Vec<String>,
    ) -> Self {
        Self {
            program_id,
            metas,
            accounts,
            signers,
            config,
            logs,
        }
    }

    /// The program currently executing.
    pub fn program_id(&self) -> Address {
        self.program_id
    }

    pub fn rent(&self) -> &RentSchedule {
        &self.config.rent
    }

    /// Accounts passed to the instruction, in order.
    pub fn account_metas(&self) -> &[AccountMeta] {
        self.metas
    }

    /// Returns `true` if `address` signed the transaction or was signed for
    /// by the calling program in an enclosing [`invoke_signed`](Self::invoke_signed).
    pub fn is_signer(&self, address: &Address) -> bool {
        self.signers.contains(address)
    }

    /// Returns `true` if the instruction lists `address` as writable.
    pub fn is_writable(&self, address: &Address) -> bool {
        self.metas
            .iter()
            .any(|meta| meta.address == *address && meta.is_writable)
    }

    /// Append a line to the transaction log.
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(program = %self.program_id.short_id(), "{message}");
        self.logs.push(message);
    }

    /// Read an account passed to the instruction.
    pub fn account(&self, address: &Address) -> ProgramResult<&Account> {
        if !self.metas.iter().any(|meta| meta.address == *address) {
            return Err(ProgramError::MissingAccount(*address));
        }
        self.accounts
            .get(address)
            .ok_or(ProgramError::MissingAccount(*address))
    }

    /// Returns `true` if anything is stored at `address`.
    pub fn is_populated(&self, address: &Address) -> ProgramResult<bool> {
        Ok(self.account(address)?.is_populated())
    }

    /// Mutable view of the data of an account owned by the executing program.
    pub fn data_mut(&mut self, address: &Address) -> ProgramResult<&mut [u8]> {
        self.check_owned_writable(address)?;
        Ok(self.account_mut(address)?.data.as_mut_slice())
    }

    /// Allocate `space` bytes at `address`, owned by `owner`, funded by `payer`.
    ///
    /// `address` must either have signed the transaction or be derived from
    /// `signer_seeds` (bump included) under the executing program. The payer
    /// is debited exactly the storage deposit for `space`.
    pub fn create_account(
        &mut self,
        payer: &Address,
        address: &Address,
        space: usize,
        owner: &Address,
        signer_seeds: &[&[u8]],
    ) -> ProgramResult {
        self.check_writable(address)?;
        if self.account(address)?.is_populated() {
            return Err(ProgramError::AccountAlreadyInUse(*address));
        }
        if !self.is_signer(address) {
            if signer_seeds.is_empty() {
                return Err(ProgramError::MissingRequiredSignature(*address));
            }
            let derived = create_address(signer_seeds, &self.program_id)
                .map_err(|_| ProgramError::InvalidSeeds)?;
            if derived != *address {
                return Err(ProgramError::InvalidSeeds);
            }
        }
        self.check_space(space)?;

        let deposit = self.config.rent.minimum_balance(space);
        self.debit_payer(payer, deposit)?;
        *self.account_mut(address)? = Account::new(deposit, space, *owner);
        debug!(address = %address.short_id(), space, deposit, "account created");
        Ok(())
    }

    /// Change the data length of an owned account, zero-filling growth.
    ///
    /// Growth charges `payer` the extra deposit; shrinking refunds the excess
    /// deposit to `payer`. On error nothing changes.
    pub fn resize(&mut self, address: &Address, new_len: usize, payer: &Address) -> ProgramResult {
        self.check_owned_writable(address)?;
        self.check_writable(payer)?;
        self.check_space(new_len)?;

        let required = self.config.rent.minimum_balance(new_len);
        let current = self.account(address)?.lamports;
        if required > current {
            self.debit_payer(payer, required - current)?;
            self.account_mut(address)?.lamports = required;
        } else if current > required {
            let refund = current - required;
            self.account_mut(address)?.lamports = required;
            self.credit(payer, refund)?;
        }
        self.account_mut(address)?.data.resize(new_len, 0);
        debug!(address = %address.short_id(), new_len, "account resized");
        Ok(())
    }

    /// Free an owned account and send its deposit to `destination`.
    pub fn close_account(&mut self, address: &Address, destination: &Address) -> ProgramResult {
        self.check_owned_writable(address)?;
        self.check_writable(destination)?;

        let account = self.account_mut(address)?;
        let lamports = account.lamports;
        *account = Account::default();
        self.credit(destination, lamports)?;
        debug!(address = %address.short_id(), lamports, "account closed");
        Ok(())
    }

    /// Run `f` as program `callee`, with the addresses derived from
    /// `signer_seeds` under the current program added to the signer set.
    ///
    /// This is how a program authorizes another program to act on records it
    /// controls without holding a private key.
    pub fn invoke_signed<T>(
        &mut self,
        callee: Address,
        signer_seeds: &[&[&[u8]]],
        f: impl FnOnce(&mut Self) -> ProgramResult<T>,
    ) -> ProgramResult<T> {
        let mut signers = self.signers.clone();
        for seeds in signer_seeds {
            let derived =
                create_address(seeds, &self.program_id).map_err(|_| ProgramError::InvalidSeeds)?;
            signers.insert(derived);
        }

        let caller = std::mem::replace(&mut self.program_id, callee);
        let caller_signers = std::mem::replace(&mut self.signers, signers);
        let result = f(self);
        self.program_id = caller;
        self.signers = caller_signers;
        result
    }

    fn account_mut(&mut self, address: &Address) -> ProgramResult<&mut Account> {
        self.accounts
            .get_mut(address)
            .ok_or(ProgramError::MissingAccount(*address))
    }

    fn check_writable(&self, address: &Address) -> ProgramResult {
        self.account(address)?;
        if !self.is_writable(address) {
            return Err(ProgramError::ReadonlyAccountModified(*address));
        }
        Ok(())
    }

    fn check_owned_writable(&self, address: &Address) -> ProgramResult {
        self.check_writable(address)?;
        if !self.account(address)?.is_owned_by(&self.program_id) {
            return Err(ProgramError::ExternalAccountModified(*address));
        }
        Ok(())
    }

    fn check_space(&self, space: usize) -> ProgramResult {
        if space > self.config.max_account_data_len {
            return Err(ProgramError::MaxAccountSize {
                requested: space,
                max: self.config.max_account_data_len,
            });
        }
        Ok(())
    }

    fn debit_payer(&mut self, payer: &Address, amount: u64) -> ProgramResult {
        self.check_writable(payer)?;
        if !self.is_signer(payer) {
            return Err(ProgramError::MissingRequiredSignature(*payer));
        }
        let account = self.account_mut(payer)?;
        if !account.is_owned_by(&SYSTEM_PROGRAM_ID) {
            return Err(ProgramError::ExternalAccountModified(*payer));
        }
        if account.lamports < amount {
            return Err(ProgramError::InsufficientFunds {
                needed: amount,
                available: account.lamports,
            });
        }
        account.lamports -= amount;
        Ok(())
    }

    fn credit(&mut self, address: &Address, amount: u64) -> ProgramResult {
        let account = self.account_mut(address)?;
        account.lamports = account
            .lamports
            .checked_add(amount)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        Ok(())
    }
}
