use sil_runtime::InvokeContext;
use sil_token::{
    associated_balance_address, create_associated_balance, mint_to, read_mint, TOKEN_LEDGER_ID,
};
use sil_types::Address;

use super::require_address;
use crate::address::{reward_mint_address, MINT_SEED};
use crate::error::IntroResult;

/// Mint `amount` reward tokens to `recipient`.
///
/// The recipient's balance is created on demand and paid for by the
/// recipient, who is always the signer of the rewarded action. Minting is
/// signed by the protocol through the mint's seeds; nothing else can mint.
pub(super) fn credit(
    ctx: &mut InvokeContext<'_>,
    recipient: &Address,
    mint: &Address,
    balance: &Address,
    amount: u64,
) -> IntroResult {
    let (expected_mint, mint_bump) = reward_mint_address()?;
    require_address(mint, &expected_mint)?;
    read_mint(ctx, mint)?;
    let (expected_balance, _) = associated_balance_address(mint, recipient)?;
    require_address(balance, &expected_balance)?;

    let (mint, balance, recipient) = (*mint, *balance, *recipient);
    ctx.invoke_signed(TOKEN_LEDGER_ID, &[&[MINT_SEED, &[mint_bump]]], |ctx| {
        create_associated_balance(ctx, &recipient, &mint, &recipient)?;
        mint_to(ctx, &mint, &balance, &mint, amount)?;
        Ok(())
    })?;
    Ok(())
}
