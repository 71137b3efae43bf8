// Account identifier tests

use datamarket::account::{AccountId, AccountIdError};

#[test]
fn test_display_uses_account_prefix() {
    let id = AccountId::from_label("alice");
    assert!(id.to_string().starts_with("acct:"));
}

#[test]
fn test_parse_roundtrip() {
    let id = AccountId::generate();
    let parsed: AccountId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn test_parse_rejects_missing_prefix() {
    let result = "did:mesh:abc".parse::<AccountId>();
    assert!(matches!(result, Err(AccountIdError::InvalidFormat(_))));
}

#[test]
fn test_parse_rejects_empty_key() {
    let result = "acct:".parse::<AccountId>();
    assert!(matches!(result, Err(AccountIdError::InvalidFormat(_))));
}

#[test]
fn test_parse_rejects_bad_base58() {
    // '0' is not in the base58 alphabet
    let result = "acct:0000".parse::<AccountId>();
    assert!(matches!(result, Err(AccountIdError::InvalidBase58(_))));
}

#[test]
fn test_parse_rejects_wrong_length() {
    let short = format!("acct:{}", bs58::encode([1u8; 8]).into_string());
    let result = short.parse::<AccountId>();
    assert_eq!(result, Err(AccountIdError::InvalidLength(8)));
}

#[test]
fn test_generated_ids_differ() {
    assert_ne!(AccountId::generate(), AccountId::generate());
}

#[test]
fn test_from_bytes_roundtrip() {
    let bytes = [7u8; 32];
    let id = AccountId::from_bytes(bytes);
    assert_eq!(id.as_bytes(), &bytes);
    assert_eq!(id.short(), "07070707");
}
