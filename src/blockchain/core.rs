// core.rs splits the pure chain algorithms into block construction and
// chain validation. Nothing here locks or logs; see `crate::ledger` for the
// shared owner.
pub mod chain;
pub mod validation;

pub use chain::*;
pub use validation::*;
