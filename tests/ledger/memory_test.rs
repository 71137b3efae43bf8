// In-memory ledger and ledger trait tests

use datamarket::account::AccountId;
use datamarket::ledger::{Clock, InMemoryLedger, Ledger, ManualClock, Transfer, TransferError};

fn accounts() -> (AccountId, AccountId, AccountId) {
    (
        AccountId::from_label("alice"),
        AccountId::from_label("bob"),
        AccountId::from_label("carol"),
    )
}

// ============================================================================
// SINGLE TRANSFERS
// ============================================================================

#[test]
fn test_transfer_debits_and_credits_exactly() {
    let (alice, bob, _) = accounts();
    let mut ledger = InMemoryLedger::new().with_balance(alice, 1_000);

    ledger.transfer(250, &alice, &bob).unwrap();

    assert_eq!(ledger.balance_of(&alice), 750);
    assert_eq!(ledger.balance_of(&bob), 250);
    assert_eq!(ledger.total_supply(), 1_000);
    assert_eq!(ledger.history(), &[Transfer::new(250, alice, bob)]);
}

#[test]
fn test_transfer_insufficient_balance_changes_nothing() {
    let (alice, bob, _) = accounts();
    let mut ledger = InMemoryLedger::new().with_balance(alice, 100);

    let result = ledger.transfer(101, &alice, &bob);

    assert_eq!(
        result,
        Err(TransferError::InsufficientBalance {
            available: 100,
            required: 101
        })
    );
    assert_eq!(ledger.balance_of(&alice), 100);
    assert!(!ledger.has_account(&bob));
}

#[test]
fn test_transfer_from_unknown_account_fails() {
    let (alice, bob, _) = accounts();
    let mut ledger = InMemoryLedger::new();

    assert_eq!(
        ledger.transfer(1, &alice, &bob),
        Err(TransferError::UnknownAccount(alice))
    );
}

#[test]
fn test_transfer_to_self_fails() {
    let (alice, _, _) = accounts();
    let mut ledger = InMemoryLedger::new().with_balance(alice, 10);

    assert_eq!(ledger.transfer(5, &alice, &alice), Err(TransferError::SameAccount));
    assert_eq!(ledger.balance_of(&alice), 10);
}

#[test]
fn test_zero_transfer_rejected() {
    let (alice, bob, _) = accounts();
    let mut ledger = InMemoryLedger::new().with_balance(alice, 10);

    assert_eq!(ledger.transfer(0, &alice, &bob), Err(TransferError::InvalidAmount));
}

#[test]
fn test_credit_overflow_rejected() {
    let (alice, bob, _) = accounts();
    let mut ledger = InMemoryLedger::new()
        .with_balance(alice, 10)
        .with_balance(bob, u64::MAX);

    assert_eq!(ledger.transfer(1, &alice, &bob), Err(TransferError::Overflow));
    assert_eq!(ledger.balance_of(&alice), 10);
}

#[test]
fn test_mint_opens_account() {
    let (alice, _, _) = accounts();
    let mut ledger = InMemoryLedger::new();

    assert_eq!(ledger.mint(&alice, 42).unwrap(), 42);
    assert_eq!(ledger.mint(&alice, 8).unwrap(), 50);
    assert!(ledger.has_account(&alice));
}

// ============================================================================
// BATCHED TRANSFERS
// ============================================================================

#[test]
fn test_batch_applies_all_legs() {
    let (alice, bob, carol) = accounts();
    let mut ledger = InMemoryLedger::new().with_balance(alice, 100).with_balance(bob, 10);

    ledger
        .transfer_batch(&[Transfer::new(60, alice, bob), Transfer::new(70, bob, carol)])
        .unwrap();

    assert_eq!(ledger.balance_of(&alice), 40);
    assert_eq!(ledger.balance_of(&bob), 0);
    assert_eq!(ledger.balance_of(&carol), 70);
    assert_eq!(ledger.transfer_count(), 2);
}

#[test]
fn test_batch_failure_leaves_balances_untouched() {
    let (alice, bob, carol) = accounts();
    let mut ledger = InMemoryLedger::new().with_balance(alice, 100).with_balance(carol, 5);

    let result = ledger.transfer_batch(&[Transfer::new(60, alice, bob), Transfer::new(50, carol, bob)]);

    assert!(matches!(result, Err(TransferError::InsufficientBalance { .. })));
    assert_eq!(ledger.balance_of(&alice), 100);
    assert_eq!(ledger.balance_of(&bob), 0);
    assert_eq!(ledger.balance_of(&carol), 5);
    assert_eq!(ledger.transfer_count(), 0);
}

/// Ledger that only implements `transfer`, so batches use the trait's
/// apply-then-reverse default
struct SingleLegLedger {
    inner: InMemoryLedger,
}

impl Ledger for SingleLegLedger {
    fn transfer(&mut self, amount: u64, from: &AccountId, to: &AccountId) -> Result<(), TransferError> {
        self.inner.transfer(amount, from, to)
    }
}

#[test]
fn test_default_batch_reverses_applied_legs() {
    let (alice, bob, carol) = accounts();
    let mut ledger = SingleLegLedger {
        inner: InMemoryLedger::new().with_balance(alice, 100).with_balance(carol, 5),
    };

    let result = ledger.transfer_batch(&[
        Transfer::new(30, alice, bob),
        Transfer::new(20, alice, carol),
        Transfer::new(50, carol, bob),
    ]);

    assert!(matches!(result, Err(TransferError::InsufficientBalance { .. })));
    assert_eq!(ledger.inner.balance_of(&alice), 100);
    assert_eq!(ledger.inner.balance_of(&bob), 0);
    assert_eq!(ledger.inner.balance_of(&carol), 5);
    // two legs applied, two reversals
    assert_eq!(ledger.inner.transfer_count(), 4);
}

// ============================================================================
// CLOCK
// ============================================================================

#[test]
fn test_manual_clock_advances() {
    let clock = ManualClock::new(0);
    assert_eq!(clock.current_height(), 0);
    assert_eq!(clock.advance(1440), 1440);
    assert_eq!(clock.current_height(), 1440);
}
