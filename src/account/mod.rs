// Account module - Opaque account identifiers supplied by the host

mod id;

pub use id::{AccountId, AccountIdError};
