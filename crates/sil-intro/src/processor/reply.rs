use sil_runtime::{AccountRecord, InvokeContext};
use tracing::info;

use super::{
    account_key, check_len, load_intro, require_address, require_signer, reward, verify_intro,
};
use crate::address::{counter_address, reply_address, PROGRAM_ID};
use crate::config::ProgramConfig;
use crate::error::{IntroError, IntroResult};
use crate::state::{ReplyCounter, ReplyRecord};

/// Write a reply at the address derived from the current counter value and
/// advance the counter by one.
///
/// The counter account is writable in every reply instruction, so the
/// runtime serializes concurrent replies to one introduction and no two can
/// observe the same counter value.
pub(super) fn add_reply(
    ctx: &mut InvokeContext<'_>,
    config: &ProgramConfig,
    content: &str,
) -> IntroResult {
    let replier = account_key(ctx, 0)?;
    let intro = account_key(ctx, 1)?;
    let counter = account_key(ctx, 2)?;
    let reply = account_key(ctx, 3)?;
    let mint = account_key(ctx, 4)?;
    let balance = account_key(ctx, 5)?;
    require_signer(ctx, &replier)?;
    check_len(content, config.max_reply_len)?;

    let record = load_intro(ctx, &intro)?;
    verify_intro(&intro, &record)?;
    let (expected_counter, _) = counter_address(&intro)?;
    require_address(&counter, &expected_counter)?;

    let account = ctx.account(&counter)?;
    if !account.is_populated() {
        return Err(IntroError::RecordNotFound);
    }
    if !account.is_owned_by(&PROGRAM_ID) {
        return Err(IntroError::AddressMismatch);
    }
    let mut state =
        ReplyCounter::try_from_bytes(&account.data).map_err(|_| IntroError::AddressMismatch)?;
    let current = state.counter;
    let next = current.checked_add(1).ok_or(IntroError::CounterOverflow)?;

    let (expected_reply, reply_bump) = reply_address(&intro, current)?;
    require_address(&reply, &expected_reply)?;

    let entry = ReplyRecord {
        intro,
        reply: content.to_owned(),
        bump: reply_bump,
    };
    ctx.create_account(
        &replier,
        &reply,
        ReplyRecord::space(content.len()),
        &PROGRAM_ID,
        &[intro.as_bytes(), &current.to_le_bytes(), &[reply_bump]],
    )?;
    entry.write_into(ctx.data_mut(&reply)?)?;
    state.counter = next;
    state.write_into(ctx.data_mut(&counter)?)?;

    reward::credit(ctx, &replier, &mint, &balance, config.reply_reward)?;
    info!(intro = %intro.short_id(), index = current, "reply added");
    ctx.log(format!(
        "intro: reply {current} to {} by {}, counter now {next}",
        intro.short_id(),
        replier.short_id()
    ));
    Ok(())
}
