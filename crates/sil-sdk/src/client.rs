use std::sync::Arc;

use sil_crypto::Keypair;
use sil_intro::{
    counter_address, instruction, intro_address, reply_address, reward_mint_address,
    IntroError, IntroductionRecord, ReplyCounter, ReplyRecord,
};
use sil_runtime::{AccountRecord, TransactionReceipt};
use sil_token::{associated_balance_address, Mint, TokenBalance};
use sil_types::Address;
use tracing::info;

use crate::cluster::LocalCluster;
use crate::error::{SdkError, SdkResult};

/// Typed access to the student intro protocol on a [`LocalCluster`].
///
/// Every operation is one transaction signed by the acting keypair, which
/// also pays for any storage the operation allocates.
#[derive(Clone, Debug)]
pub struct IntroClient {
    cluster: Arc<LocalCluster>,
}

impl IntroClient {
    pub fn new(cluster: Arc<LocalCluster>) -> Self {
        Self { cluster }
    }

    pub fn cluster(&self) -> &LocalCluster {
        &self.cluster
    }

    // ---- Operations ----

    pub fn initialize_token_mint(&self, payer: &Keypair) -> SdkResult<TransactionReceipt> {
        let ix = instruction::initialize_token_mint(&payer.address())?;
        self.cluster.submit(vec![ix], &[payer])
    }

    /// Publish `author`'s introduction. Returns its address.
    pub fn add_student_intro(
        &self,
        author: &Keypair,
        name: &str,
        message: &str,
    ) -> SdkResult<Address> {
        let ix = instruction::add_student_intro(&author.address(), name, message)?;
        self.cluster.submit(vec![ix], &[author])?;
        let intro = self.intro_address(&author.address())?;
        info!(intro = %intro.short_id(), "introduction published");
        Ok(intro)
    }

    pub fn update_student_intro(
        &self,
        author: &Keypair,
        name: &str,
        message: &str,
    ) -> SdkResult<TransactionReceipt> {
        let intro = self.intro_address(&author.address())?;
        let ix = instruction::update_student_intro(&author.address(), &intro, name, message);
        self.cluster.submit(vec![ix], &[author])
    }

    /// Reply to `intro` at the address named by its current counter value.
    /// Returns the reply's address.
    ///
    /// The counter is read before submitting. If another reply commits in
    /// between, the transaction fails with `AddressMismatch` and may be
    /// retried.
    pub fn add_reply(
        &self,
        replier: &Keypair,
        intro: &Address,
        content: &str,
    ) -> SdkResult<Address> {
        let counter = self
            .fetch_counter(intro)?
            .ok_or(SdkError::Protocol(IntroError::RecordNotFound))?;
        let (reply, _) = reply_address(intro, counter)?;
        self.add_reply_at(replier, intro, &reply, content)?;
        Ok(reply)
    }

    /// Reply to `intro`, writing the reply at the caller-chosen `reply`.
    pub fn add_reply_at(
        &self,
        replier: &Keypair,
        intro: &Address,
        reply: &Address,
        content: &str,
    ) -> SdkResult<TransactionReceipt> {
        let ix = instruction::add_reply(&replier.address(), intro, reply, content)?;
        self.cluster.submit(vec![ix], &[replier])
    }

    pub fn close(&self, author: &Keypair) -> SdkResult<TransactionReceipt> {
        let intro = self.intro_address(&author.address())?;
        self.cluster
            .submit(vec![instruction::close(&author.address(), &intro)], &[author])
    }

    // ---- Fetches ----

    pub fn fetch_intro(&self, intro: &Address) -> SdkResult<Option<IntroductionRecord>> {
        self.fetch(intro)
    }

    /// Current reply counter of `intro`.
    pub fn fetch_counter(&self, intro: &Address) -> SdkResult<Option<u64>> {
        let (counter, _) = counter_address(intro)?;
        Ok(self.fetch::<ReplyCounter>(&counter)?.map(|state| state.counter))
    }

    pub fn fetch_reply(&self, reply: &Address) -> SdkResult<Option<ReplyRecord>> {
        self.fetch(reply)
    }

    /// Every reply to `intro`, in counter order.
    pub fn replies(&self, intro: &Address) -> SdkResult<Vec<(Address, ReplyRecord)>> {
        let count = self.fetch_counter(intro)?.unwrap_or(0);
        let mut replies = Vec::new();
        for index in 0..count {
            let (address, _) = reply_address(intro, index)?;
            if let Some(record) = self.fetch_reply(&address)? {
                replies.push((address, record));
            }
        }
        Ok(replies)
    }

    pub fn fetch_mint(&self) -> SdkResult<Option<Mint>> {
        let (mint, _) = reward_mint_address()?;
        self.fetch(&mint)
    }

    /// Reward tokens held by `owner`, in base units.
    pub fn reward_balance(&self, owner: &Address) -> SdkResult<u64> {
        let (mint, _) = reward_mint_address()?;
        let (balance, _) = associated_balance_address(&mint, owner)
            .map_err(|_| SdkError::UnexpectedAccount(*owner))?;
        Ok(self
            .fetch::<TokenBalance>(&balance)?
            .map_or(0, |holding| holding.amount))
    }

    // ---- Addresses ----

    pub fn intro_address(&self, author: &Address) -> SdkResult<Address> {
        Ok(intro_address(author)?.0)
    }

    pub fn counter_address(&self, intro: &Address) -> SdkResult<Address> {
        Ok(counter_address(intro)?.0)
    }

    pub fn reply_address(&self, intro: &Address, index: u64) -> SdkResult<Address> {
        Ok(reply_address(intro, index)?.0)
    }

    fn fetch<T: AccountRecord>(&self, address: &Address) -> SdkResult<Option<T>> {
        let Some(account) = self.cluster.get_account(address)? else {
            return Ok(None);
        };
        T::try_from_bytes(&account.data)
            .map(Some)
            .map_err(|_| SdkError::UnexpectedAccount(*address))
    }
}
