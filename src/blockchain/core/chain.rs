use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Sentinel used for both identifiers of the genesis block.
pub const GENESIS_SENTINEL: &str = "GENESIS";

/// `previous_hash` carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// One recorded vote plus the linkage to its predecessor.
///
/// Fields are private: a block is sealed at construction and its `hash` is
/// cached, never re-derived on read. Deserialized blocks (for example an
/// exported chain under audit) are taken as-is, so validation must recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    voter_id: String,
    candidate_id: String,
    timestamp: String,
    previous_hash: String,
    hash: String,
}

impl Block {
    pub fn new(
        index: u64,
        voter_id: impl Into<String>,
        candidate_id: impl Into<String>,
        previous_hash: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        let mut block = Block {
            index,
            voter_id: voter_id.into(),
            candidate_id: candidate_id.into(),
            timestamp: timestamp.into(),
            previous_hash: previous_hash.into(),
            hash: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    pub fn genesis(timestamp: impl Into<String>) -> Self {
        Block::new(
            0,
            GENESIS_SENTINEL,
            GENESIS_SENTINEL,
            GENESIS_PREVIOUS_HASH,
            timestamp,
        )
    }

    /// SHA-256 over `index || voter_id || candidate_id || timestamp || previous_hash`,
    /// no separators, index in decimal, lowercase hex output.
    pub fn calculate_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.index.to_string().as_bytes());
        hasher.update(self.voter_id.as_bytes());
        hasher.update(self.candidate_id.as_bytes());
        hasher.update(self.timestamp.as_bytes());
        hasher.update(self.previous_hash.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn voter_id(&self) -> &str {
        &self.voter_id
    }

    pub fn candidate_id(&self) -> &str {
        &self.candidate_id
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Block {}", self.index)?;
        writeln!(f, "  Voter ID: {}", self.voter_id)?;
        writeln!(f, "  Candidate ID: {}", self.candidate_id)?;
        writeln!(f, "  Timestamp: {}", self.timestamp)?;
        writeln!(f, "  Previous Hash: {}", self.previous_hash)?;
        write!(f, "  Hash: {}", self.hash)
    }
}

/// Builds the block that would follow `chain`'s tail. Returns `None` only for
/// an empty chain, which a ledger never holds.
pub fn next_block(
    chain: &[Block],
    voter_id: impl Into<String>,
    candidate_id: impl Into<String>,
    timestamp: impl Into<String>,
) -> Option<Block> {
    let tail = chain.last()?;
    Some(Block::new(
        chain.len() as u64,
        voter_id,
        candidate_id,
        tail.hash.clone(),
        timestamp,
    ))
}

#[cfg(test)]
impl Block {
    pub(crate) fn set_candidate_id(&mut self, candidate_id: &str) {
        self.candidate_id = candidate_id.to_string();
    }

    pub(crate) fn set_voter_id(&mut self, voter_id: &str) {
        self.voter_id = voter_id.to_string();
    }

    pub(crate) fn set_index(&mut self, index: u64) {
        self.index = index;
    }

    pub(crate) fn set_previous_hash(&mut self, previous_hash: &str) {
        self.previous_hash = previous_hash.to_string();
    }

    pub(crate) fn rehash(&mut self) {
        self.hash = self.calculate_hash();
    }
}
