// Ledger module - THE VALUE RAILS
// Seams to the external ledger and block clock, plus in-memory implementations

mod clock;
mod memory;
mod traits;

pub use clock::ManualClock;
pub use memory::InMemoryLedger;
pub use traits::{Clock, Ledger, Transfer, TransferError};
