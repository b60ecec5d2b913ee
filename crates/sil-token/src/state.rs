use serde::{Deserialize, Serialize};
use sil_runtime::record::{AccountRecord, ADDRESS_LEN, DISCRIMINATOR_LEN};
use sil_types::Address;

/// A reward mint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    pub is_initialized: bool,
    pub decimals: u8,
    /// Only this identity may mint new supply.
    pub mint_authority: Address,
    pub supply: u64,
}

impl Mint {
    /// Account space for a mint.
    pub const SPACE: usize = DISCRIMINATOR_LEN + 1 + 1 + ADDRESS_LEN + 8;
}

impl AccountRecord for Mint {
    const NAME: &'static str = "token::Mint";
}

/// Balance of one mint held by one owner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub mint: Address,
    pub owner: Address,
    pub amount: u64,
}

impl TokenBalance {
    /// Account space for a balance.
    pub const SPACE: usize = DISCRIMINATOR_LEN + ADDRESS_LEN + ADDRESS_LEN + 8;
}

impl AccountRecord for TokenBalance {
    const NAME: &'static str = "token::TokenBalance";
}
