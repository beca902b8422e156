//! votechain - A tamper-evident, hash-linked ledger of votes
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Block structure, hashing and chain validation (pure functions)
//! - [`ledger`] - Lock-guarded owner of the chain; append and validate
//! - [`clock`] - Injectable timestamp source
//!
//! ## Voting
//! - [`election`] - Voter and candidate registry that gates appends
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Interactive menu and audit helpers

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod clock;
pub mod ledger;

// ============================================================================
// Voting
// ============================================================================
pub mod election;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;

pub use blockchain::{validate_chain, Block, ChainValidation, ValidationFailure};
pub use election::{Candidate, Election, TallyEntry, Voter};
pub use error::VoteError;
pub use ledger::Ledger;
