//! Integration tests for the election registry, menu session and chain audit

use std::fs;
use std::io::Cursor;
use tempfile::TempDir;
use votechain::cli::{audit_file, export_chain, MenuSession};
use votechain::config::load_config_from;
use votechain::election::Election;
use votechain::error::VoteError;

/// Helper to get test directory
fn get_test_dir() -> Result<TempDir, Box<dyn std::error::Error>> {
    Ok(TempDir::new()?)
}

#[test]
fn test_election_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let election = Election::new("Integration");
    election.add_candidate("c1", "Alice")?;
    election.add_candidate("c2", "Bob")?;
    for (id, name) in [("v1", "Carol"), ("v2", "Dave"), ("v3", "Erin")] {
        election.add_voter(id, name)?;
    }

    election.cast_vote("v1", "c1")?;
    election.cast_vote("v2", "c2")?;
    election.cast_vote("v3", "c1")?;
    assert_eq!(
        election.cast_vote("v3", "c2").unwrap_err(),
        VoteError::AlreadyVoted {
            voter_id: "v3".to_string(),
            name: "Erin".to_string(),
        }
    );

    let tally = election.tally();
    assert_eq!(tally[0].votes, 2);
    assert_eq!(tally[1].votes, 1);
    assert_eq!(election.ledger().len(), 4);
    assert!(election.validate().is_valid());
    Ok(())
}

#[test]
fn test_config_drives_session() -> Result<(), Box<dyn std::error::Error>> {
    let dir = get_test_dir()?;
    let path = dir.path().join("votechain.toml");
    fs::write(
        &path,
        "[election]\nname = \"Board Vote\"\n\n[display]\nhash_preview = 6\n",
    )?;
    let config = load_config_from(&path)?;

    let election = Election::new(config.election.name.clone());
    let script = "1\nc1\nAlice\n2\nv1\nCarol\n3\nv1\nc1\n4\n8\n";
    let mut session = MenuSession::new(
        election.clone(),
        config.display.clone(),
        Cursor::new(script.as_bytes().to_vec()),
        Vec::new(),
    );
    session.run()?;
    let out = String::from_utf8(session.into_output())?;

    assert!(out.contains("Board Vote"));
    let tail_hash = election.ledger().tail().expect("tail").hash().to_string();
    assert!(out.contains(&format!("{}...", &tail_hash[..6])));
    assert!(!out.contains(&tail_hash));
    Ok(())
}

#[test]
fn test_audit_exported_chain() -> Result<(), Box<dyn std::error::Error>> {
    let election = Election::new("Audit");
    election.add_candidate("c1", "Alice")?;
    election.add_voter("v1", "Carol")?;
    election.add_voter("v2", "Dave")?;
    election.cast_vote("v1", "c1")?;
    election.cast_vote("v2", "c1")?;

    let dir = get_test_dir()?;
    let path = dir.path().join("chain.json");
    fs::write(&path, export_chain(election.ledger())?)?;
    assert!(audit_file(&path)?.is_valid());

    let mut json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    json[2]["voter_id"] = "mallory".into();
    fs::write(&path, serde_json::to_string(&json)?)?;
    assert_eq!(audit_file(&path)?.reason(), "block 2 has invalid hash");
    Ok(())
}
