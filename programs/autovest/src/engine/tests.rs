use anchor_lang::prelude::*;

use crate::constants::MAX_PENDING_CALLS;
use crate::dispatch::{Operation, ReleaseArgs, Response};
use crate::engine::{NudgeOutcome, ReleaseOutcome, SkipReason};
use crate::error::VestingError;
use crate::host::MemoryHost;
use crate::state::{CreateParams, ExecutionStatus, Lookup, ScheduleId, StoreMode, VestingSchedule};

const FEES: u64 = 1_000_000_000;
const FUNDS: u64 = 1_000_000;

struct Fixture {
    host: MemoryHost,
    owner: Pubkey,
    funder: Pubkey,
    beneficiary: Pubkey,
    token: Pubkey,
}

impl Fixture {
    fn new(mode: StoreMode) -> Self {
        Self::with(mode, 0, FEES)
    }

    fn with(mode: StoreMode, housekeeping_period: u64, fees: u64) -> Self {
        let owner = Pubkey::new_unique();
        let funder = Pubkey::new_unique();
        let token = Pubkey::new_unique();
        let mut host = MemoryHost::new(owner, mode, housekeeping_period, fees).unwrap();
        let contract = host.contract();
        let ledger = &mut host.world_mut().ledger;
        ledger.mint(token, funder, FUNDS);
        ledger.approve(token, funder, contract, FUNDS);
        Self {
            host,
            owner,
            funder,
            beneficiary: Pubkey::new_unique(),
            token,
        }
    }

    fn params(&self, total_amount: u64, lock_period: u64, release_interval: u64, pct: u8) -> CreateParams {
        CreateParams {
            beneficiary: self.beneficiary,
            token: self.token,
            total_amount,
            lock_period,
            release_interval,
            release_percentage: pct,
        }
    }

    fn create(&mut self, params: CreateParams) -> Result<Response> {
        let funder = self.funder;
        self.host.execute(&funder, Operation::CreateVestingSchedule(params))
    }

    fn create_ok(&mut self, params: CreateParams) -> ScheduleId {
        match self.create(params).unwrap() {
            Response::Created(Some(id)) => id,
            other => panic!("unexpected response {other:?}"),
        }
    }

    fn release(&mut self, schedule_id: ScheduleId, beneficiary: Pubkey) -> Result<Response> {
        let caller = Pubkey::new_unique();
        self.host.execute(
            &caller,
            Operation::ReleaseVestedTokens(ReleaseArgs {
                schedule_id,
                beneficiary,
            }),
        )
    }

    fn as_owner(&mut self, op: Operation) -> Result<Response> {
        let owner = self.owner;
        self.host.execute(&owner, op)
    }

    fn schedule(&self, id: ScheduleId) -> VestingSchedule {
        match self.host.schedule(id) {
            Lookup::Found(schedule) => schedule,
            other => panic!("schedule {id} not found: {other:?}"),
        }
    }

    fn balance(&self, holder: &Pubkey) -> u64 {
        self.host.world().ledger.balance(&self.token, holder)
    }
}

fn assert_aborts<T: std::fmt::Debug>(result: Result<T>, expected: VestingError) {
    let expected: anchor_lang::error::Error = expected.into();
    assert_eq!(result.unwrap_err(), expected);
}

fn skipped(response: &Result<Response>) -> Option<SkipReason> {
    match response {
        Ok(Response::Release(ReleaseOutcome::Skipped(reason))) => Some(*reason),
        _ => None,
    }
}

#[test]
fn twenty_percent_schedule_releases_five_times() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    assert_eq!(f.balance(&f.host.contract()), 1000);
    assert_eq!(f.schedule(id).next_release_period, 10);

    let mut claimed = Vec::new();
    for period in [10, 15, 20, 25, 30] {
        let runs = f.host.advance_to(period);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].slot.period, period);
        assert!(runs[0].result.is_ok());
        claimed.push(f.schedule(id).amount_claimed);
    }
    assert_eq!(claimed, vec![200, 400, 600, 800, 1000]);
    assert_eq!(f.balance(&f.beneficiary), 1000);
    assert_eq!(f.balance(&f.host.contract()), 0);

    assert_eq!(f.host.pending_calls(), 0);
    assert!(f.host.flags(id).next_call_id.is_none());
    assert!(f.host.advance_to(1_000).is_empty());
    assert_eq!(f.schedule(id).next_release_period, 30);
}

#[test]
fn releases_keep_claim_and_period_invariants() {
    for (total, pct, interval) in [(1000, 33, 3), (7, 50, 1), (999_999, 1, 2), (100, 100, 9), (10, 30, 4)] {
        let mut f = Fixture::new(StoreMode::Keyed);
        let id = f.create_ok(f.params(total, 2, interval, pct));

        let mut last = f.schedule(id);
        for _ in 0..200 {
            if last.is_completed() {
                break;
            }
            f.host.advance_to(last.next_release_period);
            let now = f.schedule(id);
            assert!(now.amount_claimed > last.amount_claimed);
            assert!(now.amount_claimed <= total);
            if !now.is_completed() {
                assert!(now.next_release_period > last.next_release_period);
            } else {
                assert_eq!(now.next_release_period, last.next_release_period);
            }
            last = now;
        }

        assert!(last.is_completed(), "{total}/{pct}% never completed");
        assert_eq!(last.amount_claimed, total);
        assert_eq!(f.balance(&f.beneficiary), total);
        assert_eq!(f.host.pending_calls(), 0);
    }
}

#[test]
fn release_before_due_is_a_no_op() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    let beneficiary = f.beneficiary;

    let response = f.release(id, beneficiary);
    assert_eq!(skipped(&response), Some(SkipReason::NotDue));
    assert_eq!(f.schedule(id).amount_claimed, 0);
    assert_eq!(f.balance(&beneficiary), 0);
    assert!(!f.host.flags(id).release_lock);
}

#[test]
fn mismatched_beneficiary_is_a_no_op() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 0, 5, 20));
    let stranger = Pubkey::new_unique();

    let response = f.release(id, stranger);
    assert_eq!(skipped(&response), Some(SkipReason::BeneficiaryMismatch));
    assert_eq!(f.schedule(id).amount_claimed, 0);
    assert_eq!(f.balance(&stranger), 0);
}

#[test]
fn locked_schedule_is_a_no_op() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    if let Some(flags) = f.host.world_mut().store.flags.get_mut(&id) {
        flags.release_lock = true;
    }

    let runs = f.host.advance_to(10);
    assert_eq!(runs.len(), 1);
    assert_eq!(skipped(&runs[0].result), Some(SkipReason::Locked));
    assert_eq!(f.schedule(id).amount_claimed, 0);
    assert!(f.host.flags(id).release_lock);
}

#[test]
fn missing_schedule_is_a_no_op() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let beneficiary = f.beneficiary;
    let response = f.release(42, beneficiary);
    assert_eq!(skipped(&response), Some(SkipReason::NoSchedule));
}

#[test]
fn invalid_creation_aborts_and_persists_nothing() {
    let cases = [
        (1000, 5, 0, VestingError::InvalidReleasePercentage),
        (1000, 5, 101, VestingError::InvalidReleasePercentage),
        (0, 5, 20, VestingError::InvalidTotalAmount),
        (1000, 0, 20, VestingError::InvalidReleaseInterval),
        (4, 5, 20, VestingError::ReleaseAmountTooSmall),
    ];
    for (total, interval, pct, expected) in cases {
        let mut f = Fixture::new(StoreMode::Keyed);
        let params = f.params(total, 10, interval, pct);
        assert_aborts(f.create(params), expected);

        assert!(matches!(f.host.schedule(0), Lookup::Empty));
        assert_eq!(f.host.world().store.schedule_count, 0);
        assert_eq!(f.host.pending_calls(), 0);
        assert_eq!(f.balance(&f.funder), FUNDS);
    }
}

#[test]
fn creation_requires_allowance_and_a_full_deposit() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let (token, funder, contract) = (f.token, f.funder, f.host.contract());
    f.host.world_mut().ledger.approve(token, funder, contract, 999);
    let params = f.params(1000, 10, 5, 20);
    assert_aborts(f.create(params), VestingError::InsufficientAllowance);

    f.host.world_mut().ledger.approve(token, funder, contract, FUNDS);
    f.host.world_mut().ledger.withhold_credits_to(contract);
    assert_aborts(f.create(params), VestingError::DepositShortfall);
    assert_eq!(f.balance(&funder), FUNDS);
    assert_eq!(f.host.pending_calls(), 0);

    f.host.world_mut().ledger.restore_credits_to(&contract);
    assert_eq!(f.create(params).unwrap(), Response::Created(Some(0)));
}

#[test]
fn stop_is_owner_only() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    let pending = f.host.flags(id).next_call_id;

    let stranger = Pubkey::new_unique();
    assert_aborts(
        f.host.execute(&stranger, Operation::Stop { schedule_id: id }),
        VestingError::Unauthorized,
    );
    assert_eq!(f.host.pending_calls(), 1);
    assert_eq!(f.host.flags(id).next_call_id, pending);

    let stopped = f.as_owner(Operation::Stop { schedule_id: id }).unwrap();
    assert_eq!(Some(stopped), pending.map(Response::Stopped));
    assert_eq!(f.host.pending_calls(), 0);
    assert!(f.host.advance_to(100).is_empty());
    assert_eq!(f.schedule(id).amount_claimed, 0);

    assert_aborts(
        f.as_owner(Operation::Stop { schedule_id: id }),
        VestingError::NoPendingCall,
    );
}

#[test]
fn stop_after_the_call_fired_reports_no_pending_call() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    f.as_owner(Operation::Pause).unwrap();

    let runs = f.host.advance_to(10);
    assert_eq!(skipped(&runs[0].result), Some(SkipReason::Paused));
    assert!(f.host.flags(id).next_call_id.is_some());
    assert_eq!(f.host.pending_calls(), 0);

    assert_aborts(
        f.as_owner(Operation::Stop { schedule_id: id }),
        VestingError::NoPendingCall,
    );
    assert_aborts(
        f.as_owner(Operation::GetNextCallId { schedule_id: id }),
        VestingError::NoPendingCall,
    );
}

#[test]
fn nudge_restarts_a_stopped_schedule() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    f.as_owner(Operation::Stop { schedule_id: id }).unwrap();
    f.host.advance_to(100);

    let response = f.as_owner(Operation::Nudge { schedule_id: id }).unwrap();
    let Response::Nudge(NudgeOutcome::Rescheduled(call_id)) = response else {
        panic!("expected a reschedule");
    };
    assert_eq!(f.host.flags(id).next_call_id, Some(call_id));
    assert_eq!(f.schedule(id).next_release_period, 100);

    let runs = f.host.advance_to(100);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].call_id, call_id);
    assert_eq!(f.schedule(id).amount_claimed, 200);
    assert_eq!(f.schedule(id).next_release_period, 105);

    // A healthy pending call is left alone.
    let pending = f.host.flags(id).next_call_id;
    let response = f.as_owner(Operation::Nudge { schedule_id: id }).unwrap();
    assert_eq!(Some(response), pending.map(|c| Response::Nudge(NudgeOutcome::Alive(c))));
    assert_eq!(f.host.pending_calls(), 1);
}

#[test]
fn nudge_replaces_a_stalled_call() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    let stale = f.host.flags(id).next_call_id;

    // Time moves on without the queue being cranked.
    f.host.world_mut().now = 500;
    let response = f.as_owner(Operation::Nudge { schedule_id: id }).unwrap();
    let Response::Nudge(NudgeOutcome::Rescheduled(call_id)) = response else {
        panic!("expected a reschedule");
    };
    assert_ne!(Some(call_id), stale);
    assert_eq!(f.host.pending_calls(), 1);
    assert_eq!(f.schedule(id).next_release_period, 500);
}

#[test]
fn untransferred_release_aborts_without_leaving_a_lock() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    let beneficiary = f.beneficiary;
    f.host.world_mut().ledger.withhold_credits_to(beneficiary);
    f.host.world_mut().now = 10;

    assert_aborts(f.release(id, beneficiary), VestingError::TransferNotCredited);
    let flags = f.host.flags(id);
    assert!(!flags.release_lock);
    assert!(!flags.is_failed());
    assert_eq!(f.schedule(id).amount_claimed, 0);
    assert_eq!(f.balance(&f.host.contract()), 1000);
}

#[test]
fn failed_deferred_release_halts_until_cleared() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    let beneficiary = f.beneficiary;
    f.host.world_mut().ledger.withhold_credits_to(beneficiary);

    let runs = f.host.advance_to(10);
    assert_eq!(runs.len(), 1);
    assert!(runs[0].result.is_err());
    let flags = f.host.flags(id);
    assert!(flags.is_failed());
    assert_eq!(flags.last_failed_period, Some(10));
    assert!(!flags.release_lock);
    assert_eq!(f.host.pending_calls(), 0);

    f.host.world_mut().ledger.restore_credits_to(&beneficiary);
    assert_eq!(skipped(&f.release(id, beneficiary)), Some(SkipReason::ExecutionFailed));
    assert_eq!(
        f.as_owner(Operation::Nudge { schedule_id: id }).unwrap(),
        Response::Nudge(NudgeOutcome::Skipped(SkipReason::ExecutionFailed))
    );

    let stranger = Pubkey::new_unique();
    assert_aborts(
        f.host.execute(&stranger, Operation::ClearFailure { schedule_id: id }),
        VestingError::Unauthorized,
    );
    f.as_owner(Operation::ClearFailure { schedule_id: id }).unwrap();
    assert!(matches!(
        f.as_owner(Operation::Nudge { schedule_id: id }).unwrap(),
        Response::Nudge(NudgeOutcome::Rescheduled(_))
    ));

    f.host.advance_to(10);
    assert_eq!(f.schedule(id).amount_claimed, 200);
    assert_eq!(f.balance(&beneficiary), 200);
}

#[test]
fn reported_failure_blocks_releases() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    let report = Operation::ReportExecutionStatus {
        schedule_id: id,
        status: ExecutionStatus::Failed,
        period: 3,
    };

    let stranger = Pubkey::new_unique();
    assert_aborts(f.host.execute(&stranger, report.clone()), VestingError::Unauthorized);
    f.as_owner(report).unwrap();
    assert_eq!(f.host.flags(id).last_failed_period, Some(3));

    let runs = f.host.advance_to(10);
    assert_eq!(skipped(&runs[0].result), Some(SkipReason::ExecutionFailed));
    assert_eq!(f.schedule(id).amount_claimed, 0);
}

#[test]
fn single_slot_refuses_to_overwrite_a_running_schedule() {
    let mut f = Fixture::new(StoreMode::SingleSlot);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    let pending = f.host.flags(id).next_call_id;

    let (intruder, junk) = (Pubkey::new_unique(), Pubkey::new_unique());
    let contract = f.host.contract();
    let ledger = &mut f.host.world_mut().ledger;
    ledger.mint(junk, intruder, 1);
    ledger.approve(junk, intruder, contract, 1);
    let params = CreateParams {
        beneficiary: intruder,
        token: junk,
        total_amount: 1,
        lock_period: 0,
        release_interval: 1,
        release_percentage: 100,
    };
    assert_aborts(
        f.host.execute(&intruder, Operation::CreateVestingSchedule(params)),
        VestingError::ScheduleActive,
    );
    assert_eq!(f.host.world().ledger.balance(&junk, &intruder), 1);
    assert_eq!(f.schedule(id).total_amount, 1000);
    assert_eq!(f.host.flags(id).next_call_id, pending);
    assert_eq!(f.host.pending_calls(), 1);

    f.host.advance_to(30);
    assert_eq!(f.balance(&f.beneficiary), 1000);

    // Once completed, the slot can be reused.
    f.beneficiary = Pubkey::new_unique();
    let again = f.create_ok(f.params(500, 0, 5, 50));
    assert_eq!(again, id);
    assert_eq!(f.schedule(again).total_amount, 500);
    assert_eq!(f.host.pending_calls(), 1);
    f.host.advance_to(100);
    assert_eq!(f.balance(&f.beneficiary), 500);
}

#[test]
fn unreadable_single_slot_is_reused_and_its_call_cancelled() {
    let mut f = Fixture::new(StoreMode::SingleSlot);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    let stale = f.host.flags(id).next_call_id;
    f.host.world_mut().store.records.insert(id, vec![7; 12]);

    let again = f.create_ok(f.params(500, 10, 5, 50));
    assert_eq!(again, id);
    assert_eq!(f.host.pending_calls(), 1);
    assert_ne!(f.host.flags(id).next_call_id, stale);
    assert_eq!(f.schedule(id).total_amount, 500);
}

#[test]
fn keyed_creation_keeps_schedules_apart() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let first_beneficiary = f.beneficiary;
    let first = f.create_ok(f.params(1000, 10, 5, 20));
    f.beneficiary = Pubkey::new_unique();
    let second = f.create_ok(f.params(500, 10, 5, 50));
    assert_eq!((first, second), (0, 1));
    assert_eq!(f.host.pending_calls(), 2);

    let runs = f.host.advance_to(10);
    assert_eq!(runs.len(), 2);
    assert_eq!(f.balance(&first_beneficiary), 200);
    assert_eq!(f.balance(&f.beneficiary), 250);
}

#[test]
fn paused_engine_ignores_create_and_release() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));

    let stranger = Pubkey::new_unique();
    assert_aborts(f.host.execute(&stranger, Operation::Pause), VestingError::Unauthorized);
    f.as_owner(Operation::Pause).unwrap();
    assert_aborts(f.as_owner(Operation::Pause), VestingError::AlreadyPaused);

    let params = f.params(300, 0, 1, 10);
    assert_eq!(f.create(params).unwrap(), Response::Created(None));
    assert!(matches!(f.host.schedule(1), Lookup::Empty));

    let runs = f.host.advance_to(10);
    assert_eq!(skipped(&runs[0].result), Some(SkipReason::Paused));
    assert_eq!(f.schedule(id).amount_claimed, 0);

    f.as_owner(Operation::Unpause).unwrap();
    assert_aborts(f.as_owner(Operation::Unpause), VestingError::NotPaused);
    f.as_owner(Operation::Nudge { schedule_id: id }).unwrap();
    f.host.advance_to(10);
    assert_eq!(f.schedule(id).amount_claimed, 200);
}

#[test]
fn corrupt_record_releases_the_lock() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    let store = &mut f.host.world_mut().store;
    store.records.insert(id, vec![7; 12]);
    if let Some(flags) = store.flags.get_mut(&id) {
        flags.release_lock = true;
    }

    let runs = f.host.advance_to(10);
    assert_eq!(skipped(&runs[0].result), Some(SkipReason::CorruptRecord));
    assert!(!f.host.flags(id).release_lock);
}

#[test]
fn next_call_id_tracks_the_pending_release() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let query = |id| Operation::GetNextCallId { schedule_id: id };
    assert_aborts(f.as_owner(query(0)), VestingError::NoPendingCall);

    let id = f.create_ok(f.params(100, 0, 1, 50));
    let Some(pending) = f.host.flags(id).next_call_id else {
        panic!("no call recorded");
    };
    let response = f.host.execute(&Pubkey::new_unique(), query(id)).unwrap();
    assert_eq!(response, Response::CallId(pending.to_string()));
    if let Response::CallId(s) = response {
        assert!(s.starts_with('D'));
    }

    f.host.advance_to(10);
    assert!(f.schedule(id).is_completed());
    assert_aborts(f.as_owner(query(id)), VestingError::NoPendingCall);
}

#[test]
fn housekeeping_records_a_heartbeat() {
    let mut f = Fixture::with(StoreMode::Keyed, 50, FEES);
    assert!(f.host.world().store.housekeeping_call.is_some());
    assert_eq!(f.host.pending_calls(), 1);

    let stranger = Pubkey::new_unique();
    assert_aborts(
        f.host.execute(&stranger, Operation::Housekeeping),
        VestingError::Unauthorized,
    );

    let runs = f.host.advance_to(60);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].result.as_ref().ok(), Some(&Response::Done));
    let store = &f.host.world().store;
    assert_eq!(store.last_heartbeat, 50);
    assert!(store.housekeeping_call.is_none());
    assert_eq!(f.host.now(), 60);
}

#[test]
fn creation_fails_without_fee_budget() {
    let mut f = Fixture::with(StoreMode::Keyed, 0, 0);
    let params = f.params(1000, 10, 5, 20);
    assert_aborts(f.create(params), VestingError::InsufficientFeeBalance);
    assert_eq!(f.balance(&f.funder), FUNDS);
    assert_eq!(f.host.pending_calls(), 0);
}

#[test]
fn fired_calls_pay_their_fee_to_the_executor() {
    let mut f = Fixture::new(StoreMode::Keyed);
    f.create_ok(f.params(1000, 10, 5, 20));
    let escrowed: u64 = f.host.world().calls.calls().map(|c| c.fee).sum();
    assert_eq!(f.host.world().calls.fee_balance, FEES - escrowed);

    f.host.advance_to(10);
    assert_eq!(f.host.world().calls.fees_paid, escrowed);
}

#[test]
fn direct_release_replaces_the_pending_call() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    let queued = f.host.flags(id).next_call_id;
    let beneficiary = f.beneficiary;

    f.host.world_mut().now = 10;
    let response = f.release(id, beneficiary).unwrap();
    assert!(matches!(
        response,
        Response::Release(ReleaseOutcome::Released { amount: 200, .. })
    ));
    let replacement = f.host.flags(id).next_call_id;
    assert_ne!(replacement, queued);
    assert_eq!(f.host.pending_calls(), 1);
    assert_eq!(f.schedule(id).next_release_period, 15);

    // The superseded call was refunded, not just dropped.
    let escrowed: u64 = f.host.world().calls.calls().map(|c| c.fee).sum();
    assert_eq!(f.host.world().calls.fee_balance, FEES - escrowed);

    assert!(f.host.advance_to(14).is_empty());
    assert_eq!(f.balance(&beneficiary), 200);
    let runs = f.host.advance_to(15);
    assert_eq!(runs.len(), 1);
    assert_eq!(Some(runs[0].call_id), replacement);
    assert_eq!(f.balance(&beneficiary), 400);
}

#[test]
fn release_after_completion_is_a_no_op() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let id = f.create_ok(f.params(1000, 10, 5, 20));
    f.host.advance_to(30);
    assert!(f.schedule(id).is_completed());

    f.host.world_mut().now = 1_000;
    let beneficiary = f.beneficiary;
    assert_eq!(skipped(&f.release(id, beneficiary)), Some(SkipReason::Completed));
    assert_eq!(f.balance(&beneficiary), 1000);
    assert_eq!(f.balance(&f.host.contract()), 0);
    assert_eq!(f.host.pending_calls(), 0);
}

#[test]
fn keyed_mode_outgrows_a_single_queue_shard() {
    let mut f = Fixture::new(StoreMode::Keyed);
    let schedules = MAX_PENDING_CALLS as u64 + 8;
    for expected in 0..schedules {
        assert_eq!(f.create_ok(f.params(1000, 10, 5, 20)), expected);
    }
    assert_eq!(f.host.pending_calls() as u64, schedules);
    let shards = &f.host.world().calls.shards;
    assert!(shards.len() > 1);
    assert!(shards.values().all(|s| s.calls.len() <= MAX_PENDING_CALLS));

    f.host.advance_to(200);
    assert_eq!(f.balance(&f.beneficiary), 1000 * schedules);
    assert_eq!(f.host.pending_calls(), 0);
}
