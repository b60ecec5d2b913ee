use sil_runtime::{InvokeContext, ProgramError};
use sil_token::{initialize_mint, Mint, TOKEN_LEDGER_ID};
use tracing::info;

use super::{account_key, require_address, require_signer};
use crate::address::{reward_mint_address, MINT_SEED};
use crate::config::ProgramConfig;
use crate::error::{IntroError, IntroResult};

/// Create the reward mint with the mint's own derived address as authority.
pub(super) fn initialize_token_mint(
    ctx: &mut InvokeContext<'_>,
    config: &ProgramConfig,
) -> IntroResult {
    let payer = account_key(ctx, 0)?;
    let mint = account_key(ctx, 1)?;
    require_signer(ctx, &payer)?;

    let (expected, bump) = reward_mint_address()?;
    require_address(&mint, &expected)?;
    if ctx.is_populated(&mint)? {
        return Err(IntroError::AlreadyInitialized);
    }

    ctx.create_account(&payer, &mint, Mint::SPACE, &TOKEN_LEDGER_ID, &[MINT_SEED, &[bump]])?;
    let decimals = config.mint_decimals;
    ctx.invoke_signed(TOKEN_LEDGER_ID, &[], |ctx| {
        initialize_mint(ctx, &mint, decimals, &mint).map_err(ProgramError::from)
    })?;

    info!(mint = %mint.short_id(), decimals, "reward mint initialized");
    ctx.log(format!("intro: reward mint {} initialized", mint.short_id()));
    Ok(())
}
