use anchor_lang::prelude::*;

use crate::constants::CALL_QUEUE_SEED;
use crate::events::CallQueueOpened;
use crate::state::CallQueue;

/// Creates the queue shard for `bucket`. Permissionless; the payer funds
/// the rent. Calls can only be booked into periods whose shard is open.
pub fn open_call_queue(ctx: Context<OpenCallQueue>, bucket: u64) -> Result<()> {
    let shard = &mut ctx.accounts.call_queue;
    shard.bucket = bucket;
    shard.sequence = 0;
    shard.calls = Vec::new();
    shard.bump = ctx.bumps.call_queue;

    emit!(CallQueueOpened {
        bucket,
        payer: ctx.accounts.payer.key(),
    });
    Ok(())
}

#[derive(Accounts)]
#[instruction(bucket: u64)]
pub struct OpenCallQueue<'info> {
    #[account(
        init,
        payer = payer,
        space = 8 + CallQueue::SIZE,
        seeds = [CALL_QUEUE_SEED, bucket.to_le_bytes().as_ref()],
        bump
    )]
    pub call_queue: Box<Account<'info, CallQueue>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}
