use serde::{Deserialize, Serialize};
use sil_runtime::record::{AccountRecord, ADDRESS_LEN, DISCRIMINATOR_LEN, STRING_PREFIX_LEN};
use sil_types::Address;

/// A student's introduction. One per author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroductionRecord {
    pub author: Address,
    pub name: String,
    pub message: String,
    /// Bump of the record's own derived address.
    pub bump: u8,
}

impl IntroductionRecord {
    /// Account space for a record holding `name_len` + `message_len` bytes.
    pub fn space(name_len: usize, message_len: usize) -> usize {
        DISCRIMINATOR_LEN
            + ADDRESS_LEN
            + STRING_PREFIX_LEN
            + name_len
            + STRING_PREFIX_LEN
            + message_len
            + 1
    }

    /// Space this record needs as currently filled.
    pub fn current_space(&self) -> usize {
        Self::space(self.name.len(), self.message.len())
    }
}

impl AccountRecord for IntroductionRecord {
    const NAME: &'static str = "intro::IntroductionRecord";
}

/// Number of replies an introduction has received.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyCounter {
    pub counter: u64,
    pub bump: u8,
}

impl ReplyCounter {
    pub const SPACE: usize = DISCRIMINATOR_LEN + 8 + 1;
}

impl AccountRecord for ReplyCounter {
    const NAME: &'static str = "intro::ReplyCounter";
}

/// One reply. Immutable once written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRecord {
    /// Introduction this reply answers.
    pub intro: Address,
    pub reply: String,
    pub bump: u8,
}

impl ReplyRecord {
    pub fn space(reply_len: usize) -> usize {
        DISCRIMINATOR_LEN + ADDRESS_LEN + STRING_PREFIX_LEN + reply_len + 1
    }
}

impl AccountRecord for ReplyRecord {
    const NAME: &'static str = "intro::ReplyRecord";
}
