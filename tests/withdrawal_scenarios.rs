//! Fixture scenarios replayed end to end: plan with the service, execute on
//! the paper avatar, check balances afterwards.
//!
//! Quotes come from a fee-free curve while the avatar's pool charges one
//! basis point, so every execution lands slightly worse than forecast.

use alloy_primitives::{Address, B256, U256};
use std::sync::Arc;

use liquidity_planner::application::PlannedWithdrawal;
use liquidity_planner::domain::debt::StaticVault;
use liquidity_planner::domain::pool::ExitCurve;
use liquidity_planner::domain::slippage::{bounds, slippage_slice};
use liquidity_planner::infrastructure::simulation::PaperLedger;
use liquidity_planner::report::{PlanReport, SimulationReport};
use liquidity_planner::{
    BoostedExitEncoder, BoostedPoolContracts, LinearExitCurve, PaperAvatar, Position, RatioSettings,
    SiphonService, SlippageTolerance, VaultState, Withdrawal, WithdrawalService, RAY,
};

const RATE: u64 = 1_011_875_089_336_468_555;
const POOL_FEE_BPS: u32 = 1;

fn amount(raw: &str) -> U256 {
    raw.replace('_', "").parse().unwrap()
}

fn e24(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(24))
}

fn pct(value: U256, n: u64) -> U256 {
    value / U256::from(100u64) * U256::from(n)
}

fn contracts() -> BoostedPoolContracts {
    BoostedPoolContracts {
        avatar: Address::with_last_byte(0xa1),
        gauge: Address::with_last_byte(0x61),
        vault: Address::with_last_byte(0x7a),
        bpt: Address::with_last_byte(0xb1),
        linear_bpt: Address::with_last_byte(0xb2),
        asset: Address::with_last_byte(0xda),
        pool_id: B256::with_last_byte(0x01),
        linear_pool_id: B256::with_last_byte(0x02),
    }
}

fn tolerance() -> SlippageTolerance {
    SlippageTolerance::from_bips(50).unwrap()
}

struct Fixture {
    avatar: Arc<PaperAvatar>,
    service: WithdrawalService,
}

/// 1e24 BPT unstaked and 1e24 staked
fn fixture() -> Fixture {
    let pool: Arc<dyn ExitCurve> = Arc::new(LinearExitCurve::new(U256::from(RATE), POOL_FEE_BPS).unwrap());
    let avatar = Arc::new(PaperAvatar::new(contracts(), pool, Position::new(e24(1), e24(1))));
    let service = service_for(avatar.clone());
    Fixture { avatar, service }
}

fn service_for(avatar: Arc<PaperAvatar>) -> WithdrawalService {
    let quotes: Arc<dyn ExitCurve> = Arc::new(LinearExitCurve::new(U256::from(RATE), 0).unwrap());
    WithdrawalService::new(
        avatar,
        quotes,
        Arc::new(BoostedExitEncoder::new(contracts())),
        tolerance(),
    )
}

async fn run(fixture: &Fixture, requested: U256) -> (PlannedWithdrawal, PaperLedger) {
    let planned = fixture.service.plan_detailed(requested).await.unwrap();
    fixture.avatar.exec_all(&planned.instructions).await.unwrap();
    let ledger = fixture.avatar.ledger().await;
    (planned, ledger)
}

#[tokio::test]
async fn test_position_value() {
    let fixture = fixture();
    let liquidity = fixture.service.current_position_value().await.unwrap();
    assert_eq!(liquidity, amount("2_023_750_178_672_937_110_000_000"));
}

#[tokio::test]
async fn test_oversized_request_drains_position() {
    let fixture = fixture();
    let liquidity = fixture.service.current_position_value().await.unwrap();

    let (planned, ledger) = run(&fixture, liquidity * U256::from(10u64)).await;

    assert_eq!(planned.withdrawal.name(), "full_exit");
    assert_eq!(planned.withdrawal.unstake_amount(), e24(1));
    assert_eq!(planned.instructions.len(), 2);
    assert_eq!(ledger.unstaked, U256::ZERO);
    assert_eq!(ledger.staked, U256::ZERO);

    // one bip under the forecast
    assert_eq!(ledger.asset, amount("2_023_547_803_655_069_816_289_000"));
    assert!(bounds(liquidity, tolerance()).strictly_contains(ledger.asset));
}

#[tokio::test]
async fn test_drain_report_is_within_bounds() {
    let fixture = fixture();
    let liquidity = fixture.service.current_position_value().await.unwrap();
    let before = fixture.avatar.ledger().await;

    let (planned, after) = run(&fixture, liquidity * U256::from(10u64)).await;
    let report = SimulationReport::new(PlanReport::new(&planned, tolerance().bips()), before, after);

    assert_eq!(report.plan.expected_out, bounds(liquidity, tolerance()));
    assert_eq!(report.received, after.asset);
    assert!(report.within_bounds);
}

#[tokio::test]
async fn test_value_minus_slice_is_full_exit() {
    let fixture = fixture();
    let liquidity = fixture.service.current_position_value().await.unwrap();
    let requested = liquidity - slippage_slice(liquidity, tolerance());

    let (planned, ledger) = run(&fixture, requested).await;

    assert_eq!(
        planned.withdrawal,
        Withdrawal::FullExit {
            unstake: e24(1),
            bpt_in: e24(2),
            min_amount_out: requested,
        }
    );
    assert_eq!(planned.instructions.len(), 2);
    assert_eq!(ledger.position(), Position::default());
    assert!(bounds(liquidity, tolerance()).strictly_contains(ledger.asset));
}

#[tokio::test]
async fn test_just_below_ceiling_keeps_some_stake() {
    let fixture = fixture();
    let liquidity = fixture.service.current_position_value().await.unwrap();
    let requested = liquidity - slippage_slice(liquidity, tolerance()) - U256::from(1u64);

    let (planned, ledger) = run(&fixture, requested).await;

    // quoted need 1.99e24, padded by half a percent
    assert_eq!(planned.withdrawal.name(), "partial_unstake");
    assert_eq!(planned.withdrawal.unstake_amount(), amount("999_950_000_000_000_000_000_000"));
    assert_eq!(planned.instructions.len(), 2);
    assert_eq!(ledger.asset, requested);
    assert_eq!(ledger.staked, amount("50_000_000_000_000_000_000"));
    assert!(!ledger.unstaked.is_zero());
    assert!(ledger.unstaked < slippage_slice(amount("1_990_000_000_000_000_000_000_000"), tolerance()));
}

#[tokio::test]
async fn test_three_quarters_unstakes_half_the_stake() {
    let fixture = fixture();
    let liquidity = fixture.service.current_position_value().await.unwrap();
    let requested = pct(liquidity, 75);

    let (planned, ledger) = run(&fixture, requested).await;

    assert_eq!(
        planned.withdrawal,
        Withdrawal::PartialUnstake {
            unstake: amount("507_500_000_000_000_000_000_000"),
            amount_out: requested,
            bpt_in: amount("1_507_500_000_000_000_000_000_000"),
        }
    );
    assert_eq!(planned.instructions.len(), 2);
    assert_eq!(ledger.asset, requested);

    // roughly half of the stake remains
    assert_eq!(ledger.staked, amount("492_500_000_000_000_000_000_000"));
    assert!(ledger.staked > pct(e24(1), 49));
    assert!(ledger.staked < pct(e24(1), 51));

    // only slippage crumbs of BPT stay behind
    let swapped = amount("1_500_000_000_000_000_000_000_000");
    assert!(ledger.unstaked < slippage_slice(swapped, tolerance()));
}

#[tokio::test]
async fn test_ten_percent_exits_without_unstaking() {
    let fixture = fixture();
    let liquidity = fixture.service.current_position_value().await.unwrap();
    let requested = pct(liquidity, 10);

    let (planned, ledger) = run(&fixture, requested).await;

    assert_eq!(
        planned.withdrawal,
        Withdrawal::ExitOnly {
            amount_out: requested,
            bpt_in: amount("201_000_000_000_000_000_000_000"),
        }
    );
    assert_eq!(planned.instructions.len(), 1);
    assert_eq!(ledger.staked, e24(1));
    assert_eq!(ledger.asset, requested);

    // 10% of the value is roughly 20% of the unstaked BPT
    let bpt_used = pct(e24(1), 20);
    let slice = slippage_slice(bpt_used, tolerance());
    let unused_lower = e24(1) - (bpt_used + slice);
    let unused_upper = e24(1) - (bpt_used - slice);
    assert!(ledger.unstaked > unused_lower);
    assert!(ledger.unstaked < unused_upper);
}

#[tokio::test]
async fn test_repeated_withdrawals_use_fresh_balances() {
    let fixture = fixture();
    let liquidity = fixture.service.current_position_value().await.unwrap();
    let tenth = pct(liquidity, 10);

    let (first, _) = run(&fixture, tenth).await;
    let (second, ledger) = run(&fixture, tenth).await;

    assert_eq!(first.position, Position::new(e24(1), e24(1)));
    assert_eq!(second.withdrawal.name(), "exit_only");
    assert!(second.position.unstaked < e24(1));
    assert_eq!(ledger.asset, tenth * U256::from(2u64));
    assert!(ledger.unstaked < amount("600_000_000_000_000_000_000_000"));
    assert!(ledger.unstaked > amount("598_000_000_000_000_000_000_000"));
}

#[tokio::test]
async fn test_siphon_covers_vault_shortfall() {
    let fixture = fixture();
    // 1 collateral worth 3000 against 1100 of debt: ratio ~2.73
    let vault = VaultState {
        ink: amount("1_000_000_000_000_000_000"),
        art: amount("1_000_000_000_000_000_000_000"),
        rate: RAY * U256::from(11u64) / U256::from(10u64),
        spot: RAY * U256::from(2_000u64),
        mat: RAY * U256::from(3u64) / U256::from(2u64),
    };
    let settings = RatioSettings::new(
        RAY * U256::from(3u64),
        RAY * U256::from(2_994u64) / U256::from(1_000u64),
    )
    .unwrap();
    let siphon = SiphonService::new(Arc::new(StaticVault(vault)), settings, service_for(fixture.avatar.clone()));

    let check = siphon.check().await.unwrap();
    let delta = amount("100_000_000_000_000_000_000");
    assert_eq!(check.delta, delta);

    let planned = check.plan.unwrap();
    assert_eq!(planned.withdrawal.name(), "exit_only");
    fixture.avatar.exec_all(&planned.instructions).await.unwrap();

    let ledger = fixture.avatar.ledger().await;
    assert_eq!(ledger.asset, delta);
    assert_eq!(ledger.staked, e24(1));
}
