// Dataset registry tests: registration, stake custody, deactivation

use datamarket::account::AccountId;
use datamarket::ledger::{InMemoryLedger, ManualClock};
use datamarket::market::{MarketConfig, MarketError, MarketEvent, Marketplace};

const STAKE: u64 = 1_000_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

struct Fixture {
    market: Marketplace<InMemoryLedger, ManualClock>,
    custody: AccountId,
    provider: AccountId,
    other: AccountId,
}

fn setup() -> Fixture {
    let custody = AccountId::from_label("custody");
    let owner = AccountId::from_label("owner");
    let provider = AccountId::from_label("provider");
    let other = AccountId::from_label("other-provider");

    let ledger = InMemoryLedger::new()
        .with_balance(provider, 10 * STAKE)
        .with_balance(other, 10 * STAKE);
    let market = Marketplace::new(
        MarketConfig::default(),
        custody,
        owner,
        ledger,
        ManualClock::new(100),
    )
    .unwrap();

    Fixture {
        market,
        custody,
        provider,
        other,
    }
}

// ============================================================================
// REGISTRATION
// ============================================================================

#[test]
fn test_register_moves_stake_into_custody() {
    let mut f = setup();

    let id = f
        .market
        .register_dataset(&f.provider, "weather", "hourly observations", 500, STAKE)
        .unwrap();

    assert_eq!(id, 1);
    assert_eq!(f.market.ledger().balance_of(&f.custody), STAKE);
    assert_eq!(f.market.ledger().balance_of(&f.provider), 9 * STAKE);

    let dataset = f.market.get_dataset(id).unwrap();
    assert!(dataset.is_active());
    assert_eq!(dataset.quality_score(), 50);
    assert_eq!(dataset.price(), 500);
    assert_eq!(dataset.stake(), STAKE);
    assert_eq!(dataset.provider(), &f.provider);
    assert_eq!(dataset.name(), "weather");
    assert_eq!(dataset.description(), "hourly observations");
}

#[test]
fn test_register_larger_stake_is_held_in_full() {
    let mut f = setup();

    f.market
        .register_dataset(&f.provider, "traffic", "", 10, 3 * STAKE)
        .unwrap();

    assert_eq!(f.market.ledger().balance_of(&f.custody), 3 * STAKE);
    assert_eq!(f.market.stats().stake_in_custody, 3 * STAKE);
}

#[test]
fn test_ids_are_sequential_across_providers() {
    let mut f = setup();

    let a = f.market.register_dataset(&f.provider, "a", "", 1, STAKE).unwrap();
    let b = f.market.register_dataset(&f.other, "b", "", 1, STAKE).unwrap();
    let c = f.market.register_dataset(&f.provider, "c", "", 1, STAKE).unwrap();

    assert_eq!((a, b, c), (1, 2, 3));
    assert_eq!(f.market.next_dataset_id(), 4);
    assert_eq!(f.market.datasets_by_provider(&f.provider).len(), 2);
}

#[test]
fn test_register_below_minimum_stake_fails() {
    let mut f = setup();

    let result = f.market.register_dataset(&f.provider, "weather", "", 500, STAKE - 1);

    assert_eq!(
        result,
        Err(MarketError::InsufficientStake {
            stake: STAKE - 1,
            minimum: STAKE
        })
    );
    assert_eq!(f.market.ledger().balance_of(&f.custody), 0);
    assert_eq!(f.market.ledger().balance_of(&f.provider), 10 * STAKE);
    assert_eq!(f.market.next_dataset_id(), 1);
    assert!(f.market.poll_events().is_empty());
}

#[test]
fn test_register_without_funds_creates_nothing() {
    let mut f = setup();
    let broke = AccountId::from_label("broke");

    let result = f.market.register_dataset(&broke, "weather", "", 500, STAKE);

    assert!(matches!(result, Err(MarketError::TransferFailed(_))));
    assert!(f.market.get_dataset(1).is_none());
    assert_eq!(f.market.next_dataset_id(), 1);
    assert_eq!(f.market.stats().datasets_registered, 0);
}

#[test]
fn test_register_rejects_oversized_name() {
    let mut f = setup();
    let name = "x".repeat(65);

    let result = f.market.register_dataset(&f.provider, &name, "", 500, STAKE);

    assert!(matches!(result, Err(MarketError::InvalidInput(_))));
    assert_eq!(f.market.ledger().balance_of(&f.custody), 0);
}

#[test]
fn test_register_emits_event() {
    let mut f = setup();

    f.market.register_dataset(&f.provider, "weather", "", 500, STAKE).unwrap();

    assert_eq!(
        f.market.poll_events(),
        vec![MarketEvent::DatasetRegistered {
            dataset_id: 1,
            provider: f.provider,
            stake: STAKE
        }]
    );
    assert!(f.market.poll_events().is_empty());
}

// ============================================================================
// DEACTIVATION
// ============================================================================

#[test]
fn test_deactivate_by_non_provider_is_unauthorized() {
    let mut f = setup();
    let id = f.market.register_dataset(&f.provider, "weather", "", 500, STAKE).unwrap();

    let result = f.market.deactivate_dataset(&f.other, id);

    assert_eq!(result, Err(MarketError::Unauthorized));
    assert!(f.market.get_dataset(id).unwrap().is_active());
    assert_eq!(f.market.ledger().balance_of(&f.custody), STAKE);
    assert_eq!(f.market.ledger().balance_of(&f.other), 10 * STAKE);
}

#[test]
fn test_deactivate_refunds_full_stake_once() {
    let mut f = setup();
    let id = f.market.register_dataset(&f.provider, "weather", "", 500, 2 * STAKE).unwrap();

    f.market.deactivate_dataset(&f.provider, id).unwrap();

    assert_eq!(f.market.ledger().balance_of(&f.provider), 10 * STAKE);
    assert_eq!(f.market.ledger().balance_of(&f.custody), 0);
    assert!(!f.market.get_dataset(id).unwrap().is_active());

    let again = f.market.deactivate_dataset(&f.provider, id);
    assert_eq!(again, Err(MarketError::NotFound));
    assert_eq!(f.market.ledger().balance_of(&f.provider), 10 * STAKE);
    assert_eq!(f.market.stats().datasets_deactivated, 1);
}

#[test]
fn test_deactivate_unknown_dataset_not_found() {
    let mut f = setup();

    assert_eq!(f.market.deactivate_dataset(&f.provider, 42), Err(MarketError::NotFound));
}

#[test]
fn test_deactivated_record_is_retained() {
    let mut f = setup();
    let id = f.market.register_dataset(&f.provider, "weather", "desc", 500, STAKE).unwrap();
    f.market.deactivate_dataset(&f.provider, id).unwrap();

    let dataset = f.market.get_dataset(id).unwrap();
    assert_eq!(dataset.name(), "weather");
    assert_eq!(dataset.stake(), STAKE);
    assert!(f.market.active_datasets().is_empty());
}

#[test]
fn test_deactivate_only_touches_own_stake() {
    let mut f = setup();
    let mine = f.market.register_dataset(&f.provider, "mine", "", 1, STAKE).unwrap();
    f.market.register_dataset(&f.other, "theirs", "", 1, 2 * STAKE).unwrap();

    f.market.deactivate_dataset(&f.provider, mine).unwrap();

    assert_eq!(f.market.ledger().balance_of(&f.custody), 2 * STAKE);
    assert_eq!(f.market.active_datasets().len(), 1);
}

// ============================================================================
// STATE EXPORT/IMPORT
// ============================================================================

#[test]
fn test_imported_state_continues_ids() {
    let mut f = setup();
    f.market.register_dataset(&f.provider, "a", "", 1, STAKE).unwrap();
    f.market.register_dataset(&f.provider, "b", "", 1, STAKE).unwrap();
    let snapshot = f.market.export_state();

    let ledger = InMemoryLedger::new().with_balance(f.provider, STAKE);
    let mut restored = Marketplace::new(
        MarketConfig::default(),
        f.custody,
        AccountId::from_label("owner"),
        ledger,
        ManualClock::new(100),
    )
    .unwrap();
    restored.import_state(snapshot);

    assert_eq!(restored.get_dataset(2).unwrap().name(), "b");
    let id = restored.register_dataset(&f.provider, "c", "", 1, STAKE).unwrap();
    assert_eq!(id, 3);
}
