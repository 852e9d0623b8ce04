use anchor_lang::prelude::*;

pub mod adapters;
pub mod constants;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod events;
#[cfg(not(target_os = "solana"))]
pub mod host;
pub mod instructions;
pub mod state;

pub use instructions::*;

use state::{CallId, ExecutionStatus, StoreMode};

declare_id!("7emhNd5c52h3xPLABcVfnDSDicQziXtfHDPprct71v1");

#[program]
pub mod autovest {
    use super::*;

    pub fn initialize<'info>(
        ctx: Context<'_, '_, 'info, 'info, Initialize<'info>>,
        housekeeping_period: u64,
        store_mode: StoreMode,
        fee_deposit: u64,
    ) -> Result<()> {
        instructions::initialize(ctx, housekeeping_period, store_mode, fee_deposit)
    }

    pub fn open_call_queue(ctx: Context<OpenCallQueue>, bucket: u64) -> Result<()> {
        instructions::open_call_queue(ctx, bucket)
    }

    pub fn create_vesting_schedule<'info>(
        ctx: Context<'_, '_, 'info, 'info, CreateVestingSchedule<'info>>,
        schedule_id: u64,
        beneficiary: Pubkey,
        total_amount: u64,
        lock_period: u64,
        release_interval: u64,
        release_percentage: u8,
    ) -> Result<()> {
        instructions::create_vesting_schedule(
            ctx,
            schedule_id,
            beneficiary,
            total_amount,
            lock_period,
            release_interval,
            release_percentage,
        )
    }

    pub fn release_vested_tokens<'info>(
        ctx: Context<'_, '_, 'info, 'info, ReleaseVestedTokens<'info>>,
        schedule_id: u64,
        beneficiary: Pubkey,
    ) -> Result<()> {
        instructions::release_vested_tokens(ctx, schedule_id, beneficiary)
    }

    pub fn execute_deferred_call<'info>(
        ctx: Context<'_, '_, 'info, 'info, ExecuteDeferredCall<'info>>,
        call_id: CallId,
    ) -> Result<()> {
        instructions::execute_deferred_call(ctx, call_id)
    }

    pub fn stop<'info>(ctx: Context<'_, '_, 'info, 'info, Stop<'info>>, schedule_id: u64) -> Result<()> {
        instructions::stop(ctx, schedule_id)
    }

    pub fn get_next_call_id<'info>(
        ctx: Context<'_, '_, 'info, 'info, GetNextCallId<'info>>,
        schedule_id: u64,
    ) -> Result<String> {
        instructions::get_next_call_id(ctx, schedule_id)
    }

    pub fn pause(ctx: Context<Pause>) -> Result<()> {
        instructions::pause(ctx)
    }

    pub fn unpause(ctx: Context<Unpause>) -> Result<()> {
        instructions::unpause(ctx)
    }

    pub fn report_execution_status(
        ctx: Context<ReportExecutionStatus>,
        schedule_id: u64,
        status: ExecutionStatus,
        period: u64,
    ) -> Result<()> {
        instructions::report_execution_status(ctx, schedule_id, status, period)
    }

    pub fn clear_failure(ctx: Context<ClearFailure>, schedule_id: u64) -> Result<()> {
        instructions::clear_failure(ctx, schedule_id)
    }

    pub fn nudge<'info>(ctx: Context<'_, '_, 'info, 'info, Nudge<'info>>, schedule_id: u64) -> Result<()> {
        instructions::nudge(ctx, schedule_id)
    }

    pub fn fund_fees(ctx: Context<FundFees>, amount: u64) -> Result<()> {
        instructions::fund_fees(ctx, amount)
    }
}
