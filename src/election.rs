//! Voter and candidate registry that enforces voting rules in front of the ledger.
//!
//! The ledger records whatever it is handed. This module is the collaborator
//! that decides whether a vote may be recorded at all: the voter must be
//! registered and must not have voted, and the candidate must be registered.

use crate::blockchain::{Block, ChainValidation};
use crate::error::VoteError;
use crate::ledger::Ledger;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Voter {
    pub voter_id: String,
    pub name: String,
    pub has_voted: bool,
}

impl fmt::Display for Voter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Voter ID: {}, Name: {}, Has Voted: {}",
            self.voter_id, self.name, self.has_voted
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub candidate_id: String,
    pub name: String,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Candidate ID: {}, Name: {}", self.candidate_id, self.name)
    }
}

/// Votes counted for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyEntry {
    pub candidate: Candidate,
    pub votes: usize,
}

#[derive(Debug, Default)]
struct Registry {
    /// Registration order is kept for display.
    voters: Vec<Voter>,
    voter_index: HashMap<String, usize>,
    candidates: Vec<Candidate>,
    candidate_index: HashMap<String, usize>,
}

impl Registry {
    /// Position of a voter who may still vote while candidates exist.
    fn check_voter(&self, voter_id: &str) -> Result<usize, VoteError> {
        let pos = *self
            .voter_index
            .get(voter_id)
            .ok_or_else(|| VoteError::VoterNotFound(voter_id.to_string()))?;

        let voter = &self.voters[pos];
        if voter.has_voted {
            debug!("Rejected second vote from {}", voter_id);
            return Err(VoteError::AlreadyVoted {
                voter_id: voter.voter_id.clone(),
                name: voter.name.clone(),
            });
        }

        if self.candidates.is_empty() {
            return Err(VoteError::NoCandidates);
        }
        Ok(pos)
    }
}

/// Thread-safe election: registry plus the vote ledger.
#[derive(Debug, Clone)]
pub struct Election {
    name: String,
    registry: Arc<RwLock<Registry>>,
    ledger: Ledger,
}

fn require_non_empty(value: &str, what: &str) -> Result<String, VoteError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VoteError::InvalidInput(format!("{} cannot be empty", what)));
    }
    Ok(trimmed.to_string())
}

impl Election {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_ledger(name, Ledger::new())
    }

    pub fn with_ledger(name: impl Into<String>, ledger: Ledger) -> Self {
        Election {
            name: name.into(),
            registry: Arc::new(RwLock::new(Registry::default())),
            ledger,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Register a candidate. Id and name are trimmed and must be non-empty.
    pub fn add_candidate(&self, candidate_id: &str, name: &str) -> Result<Candidate, VoteError> {
        let candidate_id = require_non_empty(candidate_id, "Candidate ID")?;
        let mut registry = self.registry.write();

        if registry.candidate_index.contains_key(&candidate_id) {
            debug!("Rejected duplicate candidate {}", candidate_id);
            return Err(VoteError::DuplicateCandidate(candidate_id));
        }

        let name = require_non_empty(name, "Candidate name")?;
        let candidate = Candidate { candidate_id, name };

        let position = registry.candidates.len();
        registry
            .candidate_index
            .insert(candidate.candidate_id.clone(), position);
        registry.candidates.push(candidate.clone());

        info!("Registered candidate {}", candidate.candidate_id);
        Ok(candidate)
    }

    /// Register a voter. Id and name are trimmed and must be non-empty.
    pub fn add_voter(&self, voter_id: &str, name: &str) -> Result<Voter, VoteError> {
        let voter_id = require_non_empty(voter_id, "Voter ID")?;
        let mut registry = self.registry.write();

        if registry.voter_index.contains_key(&voter_id) {
            debug!("Rejected duplicate voter {}", voter_id);
            return Err(VoteError::DuplicateVoter(voter_id));
        }

        let name = require_non_empty(name, "Voter name")?;
        let voter = Voter {
            voter_id,
            name,
            has_voted: false,
        };

        let position = registry.voters.len();
        registry.voter_index.insert(voter.voter_id.clone(), position);
        registry.voters.push(voter.clone());

        info!("Registered voter {}", voter.voter_id);
        Ok(voter)
    }

    /// Voter-side rules checked before a ballot is offered: the voter exists,
    /// has not voted, and there is someone to vote for.
    ///
    /// `cast_vote` repeats these checks under the write lock.
    pub fn check_voter(&self, voter_id: &str) -> Result<Voter, VoteError> {
        let registry = self.registry.read();
        let pos = registry.check_voter(voter_id.trim())?;
        Ok(registry.voters[pos].clone())
    }

    /// Check the voting rules, then record the vote on the ledger.
    ///
    /// The registry write lock is held until the voter is marked, so the same
    /// voter can't pass the check twice.
    pub fn cast_vote(&self, voter_id: &str, candidate_id: &str) -> Result<Block, VoteError> {
        let voter_id = voter_id.trim();
        let candidate_id = candidate_id.trim();
        let mut registry = self.registry.write();

        let voter_pos = registry.check_voter(voter_id)?;

        if !registry.candidate_index.contains_key(candidate_id) {
            debug!("Rejected vote for unknown candidate {}", candidate_id);
            return Err(VoteError::CandidateNotFound(candidate_id.to_string()));
        }

        let block = self.ledger.append_vote(voter_id, candidate_id);
        registry.voters[voter_pos].has_voted = true;
        Ok(block)
    }

    pub fn voter(&self, voter_id: &str) -> Option<Voter> {
        let registry = self.registry.read();
        registry
            .voter_index
            .get(voter_id)
            .map(|&pos| registry.voters[pos].clone())
    }

    pub fn candidate(&self, candidate_id: &str) -> Option<Candidate> {
        let registry = self.registry.read();
        registry
            .candidate_index
            .get(candidate_id)
            .map(|&pos| registry.candidates[pos].clone())
    }

    pub fn voters(&self) -> Vec<Voter> {
        self.registry.read().voters.clone()
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.registry.read().candidates.clone()
    }

    pub fn validate(&self) -> ChainValidation {
        self.ledger.validate()
    }

    /// Votes per registered candidate, counted from the chain itself.
    pub fn tally(&self) -> Vec<TallyEntry> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        self.ledger.with_blocks(|chain| {
            for block in chain.iter().filter(|b| !b.is_genesis()) {
                *counts.entry(block.candidate_id().to_string()).or_insert(0) += 1;
            }
        });

        self.candidates()
            .into_iter()
            .map(|candidate| TallyEntry {
                votes: counts.get(&candidate.candidate_id).copied().unwrap_or(0),
                candidate,
            })
            .collect()
    }
}
