//! Ledger-backed dataset marketplace.
//!
//! Providers register priced datasets behind a refundable stake; subscribers
//! buy time-boxed access, rate and review, renew at loyalty discounts, and
//! buy bundles. Value moves only through the [`ledger::Ledger`] trait and
//! time only comes from [`ledger::Clock`].

pub mod account;
pub mod ledger;
pub mod market;
pub mod storage;
