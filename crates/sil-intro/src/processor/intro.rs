use sil_runtime::{AccountRecord, InvokeContext, ProgramError};
use tracing::info;

use super::{
    account_key, check_len, load_intro, require_address, require_signer, reward, verify_intro,
};
use crate::address::{counter_address, intro_address, COUNTER_SEED, PROGRAM_ID};
use crate::config::ProgramConfig;
use crate::error::{IntroError, IntroResult};
use crate::state::{IntroductionRecord, ReplyCounter};

pub(super) fn add_student_intro(
    ctx: &mut InvokeContext<'_>,
    config: &ProgramConfig,
    name: &str,
    message: &str,
) -> IntroResult {
    let author = account_key(ctx, 0)?;
    let intro = account_key(ctx, 1)?;
    let counter = account_key(ctx, 2)?;
    let mint = account_key(ctx, 3)?;
    let balance = account_key(ctx, 4)?;
    require_signer(ctx, &author)?;
    check_len(name, config.max_name_len)?;
    check_len(message, config.max_message_len)?;

    let (expected_intro, intro_bump) = intro_address(&author)?;
    require_address(&intro, &expected_intro)?;
    let (expected_counter, counter_bump) = counter_address(&intro)?;
    require_address(&counter, &expected_counter)?;
    if ctx.is_populated(&intro)? || ctx.is_populated(&counter)? {
        return Err(IntroError::RecordAlreadyExists);
    }

    let record = IntroductionRecord {
        author,
        name: name.to_owned(),
        message: message.to_owned(),
        bump: intro_bump,
    };
    ctx.create_account(
        &author,
        &intro,
        record.current_space(),
        &PROGRAM_ID,
        &[author.as_bytes(), &[intro_bump]],
    )?;
    record.write_into(ctx.data_mut(&intro)?)?;
    ctx.create_account(
        &author,
        &counter,
        ReplyCounter::SPACE,
        &PROGRAM_ID,
        &[COUNTER_SEED, intro.as_bytes(), &[counter_bump]],
    )?;
    ReplyCounter {
        counter: 0,
        bump: counter_bump,
    }
    .write_into(ctx.data_mut(&counter)?)?;

    reward::credit(ctx, &author, &mint, &balance, config.intro_reward)?;
    info!(author = %author.short_id(), intro = %intro.short_id(), "introduction created");
    ctx.log(format!(
        "intro: {} introduced as {:?}",
        author.short_id(),
        record.name
    ));
    Ok(())
}

pub(super) fn update_student_intro(
    ctx: &mut InvokeContext<'_>,
    config: &ProgramConfig,
    name: &str,
    message: &str,
) -> IntroResult {
    let author = account_key(ctx, 0)?;
    let intro = account_key(ctx, 1)?;
    require_signer(ctx, &author)?;
    check_len(name, config.max_name_len)?;
    check_len(message, config.max_message_len)?;

    let mut record = load_intro(ctx, &intro)?;
    if record.author != author {
        return Err(IntroError::Unauthorized);
    }
    verify_intro(&intro, &record)?;

    record.name = name.to_owned();
    record.message = message.to_owned();
    let space = record.current_space();
    let allocated = ctx.account(&intro)?.data_len();
    if space != allocated {
        ctx.resize(&intro, space, &author).map_err(resize_error)?;
    }
    record.write_into(ctx.data_mut(&intro)?)?;

    info!(intro = %intro.short_id(), from = allocated, to = space, "introduction updated");
    ctx.log(format!(
        "intro: {} updated ({allocated} -> {space} bytes)",
        author.short_id()
    ));
    Ok(())
}

fn resize_error(error: ProgramError) -> IntroError {
    match error {
        ProgramError::InsufficientFunds { .. } | ProgramError::MaxAccountSize { .. } => {
            IntroError::ResizeFailed
        }
        other => IntroError::SubstrateAbort(other),
    }
}

/// Free the introduction and refund its deposit. The reply counter and
/// replies stay where they are, which keeps the author from introducing
/// themselves a second time.
pub(super) fn close(ctx: &mut InvokeContext<'_>) -> IntroResult {
    let author = account_key(ctx, 0)?;
    let intro = account_key(ctx, 1)?;
    require_signer(ctx, &author)?;

    let record = load_intro(ctx, &intro)?;
    if record.author != author {
        return Err(IntroError::Unauthorized);
    }
    verify_intro(&intro, &record)?;
    ctx.close_account(&intro, &author)?;

    info!(intro = %intro.short_id(), "introduction closed");
    ctx.log(format!("intro: {} closed", author.short_id()));
    Ok(())
}
