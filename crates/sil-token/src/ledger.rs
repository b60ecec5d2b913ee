//! Token ledger operations.
//!
//! Each function runs with the ledger as the executing program, that is
//! inside `invoke_signed(TOKEN_LEDGER_ID, ..)` when called from another
//! program. Data writes rely on the substrate's ownership check, so a
//! caller that forgets the invocation fails with `ExternalAccountModified`.

use sil_crypto::derive_address;
use sil_runtime::{AccountRecord, InvokeContext, ProgramError};
use sil_types::{Address, TOKEN_LEDGER_ID};
use tracing::debug;

use crate::error::{TokenError, TokenResult};
use crate::state::{Mint, TokenBalance};

/// First seed of every associated balance address.
pub const BALANCE_SEED: &[u8] = b"balance";

/// Address of the balance holding `mint` for `owner`.
pub fn associated_balance_address(mint: &Address, owner: &Address) -> TokenResult<(Address, u8)> {
    derive_address(
        &[BALANCE_SEED, mint.as_bytes(), owner.as_bytes()],
        &TOKEN_LEDGER_ID,
    )
    .map_err(|_| TokenError::Program(ProgramError::InvalidSeeds))
}

/// Write an initialized mint into an allocated, ledger-owned account.
pub fn initialize_mint(
    ctx: &mut InvokeContext<'_>,
    mint: &Address,
    decimals: u8,
    authority: &Address,
) -> TokenResult<()> {
    let account = ctx.account(mint)?;
    if account.is_owned_by(&TOKEN_LEDGER_ID)
        && Mint::try_from_bytes(&account.data).is_ok_and(|m| m.is_initialized)
    {
        return Err(TokenError::AccountAlreadyInitialized);
    }

    let record = Mint {
        is_initialized: true,
        decimals,
        mint_authority: *authority,
        supply: 0,
    };
    record.write_into(ctx.data_mut(mint)?)?;
    debug!(mint = %mint.short_id(), decimals, "mint initialized");
    ctx.log(format!(
        "token: initialized mint {} with {decimals} decimals",
        mint.short_id()
    ));
    Ok(())
}

/// Create the associated balance of `owner` for `mint` unless it exists.
///
/// Returns the balance address either way. An existing account at that
/// address must already be the matching balance.
pub fn create_associated_balance(
    ctx: &mut InvokeContext<'_>,
    payer: &Address,
    mint: &Address,
    owner: &Address,
) -> TokenResult<Address> {
    read_mint(ctx, mint)?;
    let (address, bump) = associated_balance_address(mint, owner)?;

    if ctx.is_populated(&address)? {
        let existing = read_balance(ctx, &address)?;
        if existing.mint != *mint {
            return Err(TokenError::MintMismatch);
        }
        if existing.owner != *owner {
            return Err(TokenError::OwnerMismatch);
        }
        return Ok(address);
    }

    ctx.create_account(
        payer,
        &address,
        TokenBalance::SPACE,
        &TOKEN_LEDGER_ID,
        &[BALANCE_SEED, mint.as_bytes(), owner.as_bytes(), &[bump]],
    )?;
    let record = TokenBalance {
        mint: *mint,
        owner: *owner,
        amount: 0,
    };
    record.write_into(ctx.data_mut(&address)?)?;
    debug!(balance = %address.short_id(), owner = %owner.short_id(), "associated balance created");
    Ok(address)
}

/// Mint `amount` new tokens into `balance`.
///
/// `authority` must be the mint's authority and must have signed the
/// current invocation, directly or through program signing.
pub fn mint_to(
    ctx: &mut InvokeContext<'_>,
    mint: &Address,
    balance: &Address,
    authority: &Address,
    amount: u64,
) -> TokenResult<()> {
    let mut mint_state = read_mint(ctx, mint)?;
    if mint_state.mint_authority != *authority {
        return Err(TokenError::AuthorityMismatch);
    }
    if !ctx.is_signer(authority) {
        return Err(TokenError::MissingAuthoritySignature);
    }

    let mut holding = read_balance(ctx, balance)?;
    if holding.mint != *mint {
        return Err(TokenError::MintMismatch);
    }
    let (expected, _) = associated_balance_address(mint, &holding.owner)?;
    if expected != *balance {
        return Err(TokenError::InvalidBalanceAddress);
    }

    mint_state.supply = mint_state
        .supply
        .checked_add(amount)
        .ok_or(TokenError::Overflow)?;
    holding.amount = holding
        .amount
        .checked_add(amount)
        .ok_or(TokenError::Overflow)?;

    mint_state.write_into(ctx.data_mut(mint)?)?;
    holding.write_into(ctx.data_mut(balance)?)?;
    debug!(mint = %mint.short_id(), owner = %holding.owner.short_id(), amount, "minted");
    ctx.log(format!(
        "token: minted {amount} to {}",
        holding.owner.short_id()
    ));
    Ok(())
}

/// Decode an initialized mint passed to the instruction.
pub fn read_mint(ctx: &InvokeContext<'_>, mint: &Address) -> TokenResult<Mint> {
    let account = ctx.account(mint)?;
    if !account.is_owned_by(&TOKEN_LEDGER_ID) {
        return Err(TokenError::UninitializedMint);
    }
    match Mint::try_from_bytes(&account.data) {
        Ok(state) if state.is_initialized => Ok(state),
        _ => Err(TokenError::UninitializedMint),
    }
}

/// Decode a balance passed to the instruction.
pub fn read_balance(ctx: &InvokeContext<'_>, balance: &Address) -> TokenResult<TokenBalance> {
    let account = ctx.account(balance)?;
    if !account.is_owned_by(&TOKEN_LEDGER_ID) {
        return Err(ProgramError::InvalidAccountData.into());
    }
    Ok(TokenBalance::try_from_bytes(&account.data)?)
}
