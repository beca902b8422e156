// Thin re-export module: implementation is in `blockchain/core.rs` so the
// pure algorithms stay separate from the lock-guarded ledger.

pub mod core;
pub use core::*;
