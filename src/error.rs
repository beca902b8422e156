//! Error types for votechain

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteError {
    InvalidInput(String),
    DuplicateVoter(String),
    DuplicateCandidate(String),
    VoterNotFound(String),
    CandidateNotFound(String),
    AlreadyVoted { voter_id: String, name: String },
    NoCandidates,
    ConfigError(String),
    IoError(String),
    SerializationError(String),
    ChainInvalid(String),
}

impl fmt::Display for VoteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VoteError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            VoteError::DuplicateVoter(id) => write!(f, "Voter ID '{}' already exists", id),
            VoteError::DuplicateCandidate(id) => write!(f, "Candidate ID '{}' already exists", id),
            VoteError::VoterNotFound(id) => write!(f, "Voter ID '{}' not found", id),
            VoteError::CandidateNotFound(id) => write!(f, "Candidate ID '{}' not found", id),
            VoteError::AlreadyVoted { voter_id, name } => {
                write!(f, "Voter '{}' (ID: {}) has already voted", name, voter_id)
            }
            VoteError::NoCandidates => write!(f, "No candidates available"),
            VoteError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            VoteError::IoError(msg) => write!(f, "IO error: {}", msg),
            VoteError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            VoteError::ChainInvalid(msg) => write!(f, "Chain is invalid: {}", msg),
        }
    }
}

impl std::error::Error for VoteError {}

impl From<std::io::Error> for VoteError {
    fn from(err: std::io::Error) -> Self {
        VoteError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for VoteError {
    fn from(err: toml::de::Error) -> Self {
        VoteError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for VoteError {
    fn from(err: serde_json::Error) -> Self {
        VoteError::SerializationError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, VoteError>;
