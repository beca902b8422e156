use super::chain::{Block, GENESIS_PREVIOUS_HASH};
use crate::error::VoteError;
use std::fmt;

/// First defect found while walking a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    EmptyChain,
    InvalidGenesis,
    InvalidHash { index: u64 },
    InvalidPreviousHash { index: u64 },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationFailure::EmptyChain => write!(f, "chain is empty"),
            ValidationFailure::InvalidGenesis => write!(f, "genesis block is invalid"),
            ValidationFailure::InvalidHash { index } => {
                write!(f, "block {} has invalid hash", index)
            }
            ValidationFailure::InvalidPreviousHash { index } => {
                write!(f, "block {} has invalid previous hash", index)
            }
        }
    }
}

/// Outcome of a full-chain integrity check.
///
/// A failed check is an expected result for an auditor to read, not a program
/// fault, so this is a value rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainValidation {
    Valid,
    Invalid(ValidationFailure),
}

impl ChainValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, ChainValidation::Valid)
    }

    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            ChainValidation::Valid => None,
            ChainValidation::Invalid(failure) => Some(failure),
        }
    }

    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// `(valid, reason)` pair for callers that only want the verdict and message.
    pub fn into_parts(self) -> (bool, String) {
        (self.is_valid(), self.reason())
    }

    /// Turn a failed check into `VoteError::ChainInvalid`.
    pub fn ensure_valid(&self) -> Result<(), VoteError> {
        match self {
            ChainValidation::Valid => Ok(()),
            ChainValidation::Invalid(failure) => Err(VoteError::ChainInvalid(failure.to_string())),
        }
    }
}

impl fmt::Display for ChainValidation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainValidation::Valid => write!(f, "valid"),
            ChainValidation::Invalid(failure) => fmt::Display::fmt(failure, f),
        }
    }
}

/// Single linear pass over `chain`, stopping at the first defect.
///
/// Genesis is only checked for its position and sentinel linkage; every later
/// block has its hash recomputed and compared, then its `previous_hash`
/// compared against its predecessor's cached hash.
pub fn validate_chain(chain: &[Block]) -> ChainValidation {
    let genesis = match chain.first() {
        Some(genesis) => genesis,
        None => return ChainValidation::Invalid(ValidationFailure::EmptyChain),
    };

    if genesis.index() != 0 || genesis.previous_hash() != GENESIS_PREVIOUS_HASH {
        return ChainValidation::Invalid(ValidationFailure::InvalidGenesis);
    }

    for pair in chain.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        if current.calculate_hash() != current.hash() {
            return ChainValidation::Invalid(ValidationFailure::InvalidHash {
                index: current.index(),
            });
        }

        if current.previous_hash() != previous.hash() {
            return ChainValidation::Invalid(ValidationFailure::InvalidPreviousHash {
                index: current.index(),
            });
        }
    }

    ChainValidation::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::core::chain::next_block;

    const TS: &str = "2024-03-05 09:15:00";

    fn chain_with_votes(votes: &[(&str, &str)]) -> Vec<Block> {
        let mut chain = vec![Block::genesis(TS)];
        for (voter, candidate) in votes {
            let block = next_block(&chain, *voter, *candidate, TS).unwrap();
            chain.push(block);
        }
        chain
    }

    #[test]
    fn test_empty_chain_is_invalid() {
        let result = validate_chain(&[]);
        assert_eq!(result.failure(), Some(&ValidationFailure::EmptyChain));
        assert_eq!(result.into_parts(), (false, "chain is empty".to_string()));
    }

    #[test]
    fn test_genesis_only_is_valid() {
        let chain = chain_with_votes(&[]);
        assert_eq!(validate_chain(&chain).into_parts(), (true, "valid".to_string()));
    }

    #[test]
    fn test_well_formed_chain_is_valid() {
        let chain = chain_with_votes(&[("v1", "c1"), ("v2", "c2"), ("v3", "c1")]);
        assert!(validate_chain(&chain).is_valid());
    }

    #[test]
    fn test_genesis_with_wrong_previous_hash() {
        let chain = vec![Block::new(0, "GENESIS", "GENESIS", "1", TS)];
        assert_eq!(
            validate_chain(&chain).reason(),
            "genesis block is invalid"
        );
    }

    #[test]
    fn test_genesis_with_wrong_index() {
        let mut chain = chain_with_votes(&[("v1", "c1")]);
        chain[0].set_index(7);
        assert_eq!(
            validate_chain(&chain).failure(),
            Some(&ValidationFailure::InvalidGenesis)
        );
    }

    #[test]
    fn test_tampered_candidate_reports_invalid_hash() {
        let mut chain = chain_with_votes(&[("v1", "c1"), ("v2", "c2")]);
        chain[1].set_candidate_id("c9");
        assert_eq!(
            validate_chain(&chain).into_parts(),
            (false, "block 1 has invalid hash".to_string())
        );
    }

    #[test]
    fn test_tampered_voter_reports_invalid_hash() {
        let mut chain = chain_with_votes(&[("v1", "c1"), ("v2", "c2")]);
        chain[2].set_voter_id("mallory");
        assert_eq!(
            validate_chain(&chain).failure(),
            Some(&ValidationFailure::InvalidHash { index: 2 })
        );
    }

    #[test]
    fn test_substituted_block_reports_invalid_previous_hash() {
        let mut chain = chain_with_votes(&[("v1", "c1"), ("v2", "c2"), ("v3", "c3")]);
        chain[2].set_previous_hash("deadbeef");
        chain[2].rehash();
        assert_eq!(
            validate_chain(&chain).into_parts(),
            (false, "block 2 has invalid previous hash".to_string())
        );
    }

    #[test]
    fn test_deleted_block_is_detected() {
        let mut chain = chain_with_votes(&[("v1", "c1"), ("v2", "c2"), ("v3", "c3")]);
        chain.remove(1);
        assert_eq!(
            validate_chain(&chain).failure(),
            Some(&ValidationFailure::InvalidPreviousHash { index: 2 })
        );
    }

    #[test]
    fn test_reordered_blocks_are_detected() {
        let mut chain = chain_with_votes(&[("v1", "c1"), ("v2", "c2")]);
        chain.swap(1, 2);
        assert!(matches!(
            validate_chain(&chain).failure(),
            Some(ValidationFailure::InvalidPreviousHash { .. })
        ));
    }

    #[test]
    fn test_first_defect_wins() {
        let mut chain = chain_with_votes(&[("v1", "c1"), ("v2", "c2"), ("v3", "c3")]);
        chain[3].set_candidate_id("c9");
        chain[1].set_candidate_id("c9");
        assert_eq!(validate_chain(&chain).reason(), "block 1 has invalid hash");
    }

    #[test]
    fn test_ensure_valid_maps_to_error() {
        let mut chain = chain_with_votes(&[("v1", "c1")]);
        assert!(validate_chain(&chain).ensure_valid().is_ok());
        chain[1].set_candidate_id("c9");
        let err = validate_chain(&chain).ensure_valid().unwrap_err();
        assert_eq!(err.to_string(), "Chain is invalid: block 1 has invalid hash");
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let chain = chain_with_votes(&[("v1", "c1")]);
        let hashes: Vec<String> = chain.iter().map(|b| b.hash().to_string()).collect();
        for _ in 0..3 {
            assert!(validate_chain(&chain).is_valid());
        }
        let after: Vec<String> = chain.iter().map(|b| b.hash().to_string()).collect();
        assert_eq!(hashes, after);
    }
}
