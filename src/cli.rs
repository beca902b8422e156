//! Interactive election menu and chain audit helpers.

use crate::blockchain::{validate_chain, Block, ChainValidation};
use crate::config::DisplayConfig;
use crate::election::Election;
use crate::error::VoteError;
use crate::ledger::Ledger;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

const MENU: &str = "
=== Voting System Menu ===
1. Add Candidate
2. Add Voter
3. Cast Vote
4. View Blockchain
5. Validate Blockchain
6. View Candidates
7. View Voters
8. Exit
9. Tally Results
10. Export Chain (JSON)";

/// Serialize the whole chain as pretty JSON.
pub fn export_chain(ledger: &Ledger) -> Result<String, VoteError> {
    let json = ledger.with_blocks(|chain| serde_json::to_string_pretty(chain))?;
    Ok(json)
}

/// Load an exported chain and check it with the same pass the ledger uses.
pub fn audit_file(path: impl AsRef<Path>) -> Result<ChainValidation, VoteError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let chain: Vec<Block> = serde_json::from_str(&content)?;
    debug!("Auditing {} blocks from {}", chain.len(), path.display());
    Ok(validate_chain(&chain))
}

/// Shorten a hash for table display; `0` keeps it whole.
pub fn hash_preview(hash: &str, chars: usize) -> String {
    if chars == 0 || hash.chars().count() <= chars {
        hash.to_string()
    } else {
        format!("{}...", hash.chars().take(chars).collect::<String>())
    }
}

/// Render the chain as a table.
pub fn chain_table(chain: &[Block], display: &DisplayConfig) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Index").add_attribute(Attribute::Bold),
            Cell::new("Voter ID").add_attribute(Attribute::Bold),
            Cell::new("Candidate ID").add_attribute(Attribute::Bold),
            Cell::new("Timestamp").add_attribute(Attribute::Bold),
            Cell::new("Previous Hash").add_attribute(Attribute::Bold),
            Cell::new("Hash").add_attribute(Attribute::Bold),
        ]);

    for block in chain {
        let color = if block.is_genesis() {
            TableColor::Magenta
        } else {
            TableColor::Cyan
        };
        table.add_row(vec![
            Cell::new(block.index()).fg(color),
            Cell::new(block.voter_id()),
            Cell::new(block.candidate_id()),
            Cell::new(block.timestamp()),
            Cell::new(hash_preview(block.previous_hash(), display.hash_preview)),
            Cell::new(hash_preview(block.hash(), display.hash_preview)).fg(TableColor::Green),
        ]);
    }
    table
}

/// One interactive session over an election, reading commands from `input`.
pub struct MenuSession<R, W> {
    election: Election,
    display: DisplayConfig,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> MenuSession<R, W> {
    pub fn new(election: Election, display: DisplayConfig, input: R, output: W) -> Self {
        MenuSession {
            election,
            display,
            input,
            output,
        }
    }

    pub fn election(&self) -> &Election {
        &self.election
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user picks Exit or input ends.
    pub fn run(&mut self) -> Result<(), VoteError> {
        writeln!(
            self.output,
            "{}",
            format!("Election: {}", self.election.name()).bright_cyan().bold()
        )?;

        loop {
            writeln!(self.output, "{}", MENU)?;
            let choice = match self.prompt("Enter your choice: ")? {
                Some(choice) => choice,
                None => break,
            };

            match choice.as_str() {
                "1" => self.add_candidate()?,
                "2" => self.add_voter()?,
                "3" => self.cast_vote()?,
                "4" => self.view_blockchain()?,
                "5" => self.validate()?,
                "6" => self.view_candidates()?,
                "7" => self.view_voters()?,
                "8" => {
                    writeln!(self.output, "{}", "Exiting...".bright_yellow())?;
                    break;
                }
                "9" => self.tally()?,
                "10" => self.export()?,
                other => {
                    debug!("Unknown menu choice {:?}", other);
                    writeln!(
                        self.output,
                        "{}",
                        "Invalid choice. Please try again.".red()
                    )?;
                }
            }
        }
        Ok(())
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>, VoteError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn error(&mut self, e: &VoteError) -> Result<(), VoteError> {
        writeln!(self.output, "{}", format!("Error: {}", e).red())?;
        Ok(())
    }

    fn success(&mut self, message: &str) -> Result<(), VoteError> {
        writeln!(self.output, "{}", format!("Success: {}", message).green())?;
        Ok(())
    }

    fn add_candidate(&mut self) -> Result<(), VoteError> {
        let Some(id) = self.prompt("Enter Candidate ID: ")? else {
            return Ok(());
        };
        let Some(name) = self.prompt("Enter Candidate Name: ")? else {
            return Ok(());
        };
        match self.election.add_candidate(&id, &name) {
            Ok(c) => self.success(&format!(
                "Candidate '{}' (ID: {}) added successfully!",
                c.name, c.candidate_id
            )),
            Err(e) => self.error(&e),
        }
    }

    fn add_voter(&mut self) -> Result<(), VoteError> {
        let Some(id) = self.prompt("Enter Voter ID: ")? else {
            return Ok(());
        };
        let Some(name) = self.prompt("Enter Voter Name: ")? else {
            return Ok(());
        };
        match self.election.add_voter(&id, &name) {
            Ok(v) => self.success(&format!(
                "Voter '{}' (ID: {}) added successfully!",
                v.name, v.voter_id
            )),
            Err(e) => self.error(&e),
        }
    }

    /// Voter is checked before the ballot is shown; a rejected voter is never
    /// asked for a candidate.
    fn cast_vote(&mut self) -> Result<(), VoteError> {
        let Some(voter_id) = self.prompt("Enter Voter ID: ")? else {
            return Ok(());
        };
        let voter = match self.election.check_voter(&voter_id) {
            Ok(voter) => voter,
            Err(e) => return self.error(&e),
        };

        writeln!(self.output, "{}", "Available Candidates:".bright_cyan())?;
        for candidate in self.election.candidates() {
            writeln!(self.output, "  {}: {}", candidate.candidate_id, candidate.name)?;
        }

        let Some(candidate_id) = self.prompt("Enter Candidate ID to vote for: ")? else {
            return Ok(());
        };
        match self.election.cast_vote(&voter.voter_id, &candidate_id) {
            Ok(block) => {
                let candidate = self
                    .election
                    .candidate(block.candidate_id())
                    .map(|c| c.name)
                    .unwrap_or_else(|| block.candidate_id().to_string());
                self.success(&format!(
                    "Vote cast by '{}' for '{}' has been recorded!",
                    voter.name, candidate
                ))
            }
            Err(e) => self.error(&e),
        }
    }

    fn view_blockchain(&mut self) -> Result<(), VoteError> {
        let table = self
            .election
            .ledger()
            .with_blocks(|chain| chain_table(chain, &self.display));
        writeln!(self.output, "{}", "Blockchain:".bright_cyan().bold())?;
        writeln!(self.output, "{}", table)?;
        Ok(())
    }

    fn validate(&mut self) -> Result<(), VoteError> {
        let result = self.election.validate();
        if result.is_valid() {
            writeln!(self.output, "{}", "Blockchain is valid.".green().bold())?;
        } else {
            writeln!(
                self.output,
                "{}",
                format!("Blockchain is invalid: {}", result).red().bold()
            )?;
        }
        Ok(())
    }

    fn view_candidates(&mut self) -> Result<(), VoteError> {
        writeln!(self.output, "{}", "Candidates:".bright_cyan().bold())?;
        let candidates = self.election.candidates();
        if candidates.is_empty() {
            writeln!(self.output, "No candidates registered yet.")?;
        }
        for candidate in candidates {
            writeln!(self.output, "  {}", candidate)?;
        }
        Ok(())
    }

    fn view_voters(&mut self) -> Result<(), VoteError> {
        writeln!(self.output, "{}", "Voters:".bright_cyan().bold())?;
        let voters = self.election.voters();
        if voters.is_empty() {
            writeln!(self.output, "No voters registered yet.")?;
        }
        for voter in voters {
            writeln!(self.output, "  {}", voter)?;
        }
        Ok(())
    }

    fn tally(&mut self) -> Result<(), VoteError> {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Candidate ID").add_attribute(Attribute::Bold),
                Cell::new("Name").add_attribute(Attribute::Bold),
                Cell::new("Votes").add_attribute(Attribute::Bold),
            ]);
        for entry in self.election.tally() {
            table.add_row(vec![
                Cell::new(&entry.candidate.candidate_id),
                Cell::new(&entry.candidate.name),
                Cell::new(entry.votes).fg(TableColor::Green),
            ]);
        }
        writeln!(self.output, "{}", "Results:".bright_cyan().bold())?;
        writeln!(self.output, "{}", table)?;
        Ok(())
    }

    fn export(&mut self) -> Result<(), VoteError> {
        let json = export_chain(self.election.ledger())?;
        writeln!(self.output, "{}", json)?;
        Ok(())
    }
}
