use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, Command};
use tracing::{error, info};

use biorisk_guard::ledger::{merkle_root, read_jsonl, Block, VerificationReport};

fn main() -> Result<()> {
    let matches = Command::new("verify-ledger")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Verify an exported BioRisk Guard ledger")
        .arg(
            Arg::new("ledger-path")
                .short('l')
                .long("ledger-path")
                .value_name("PATH")
                .help("Path to the exported JSON Lines ledger")
                .required(true),
        )
        .arg(
            Arg::new("merkle-root")
                .short('m')
                .long("merkle-root")
                .value_name("HASH")
                .help("Expected Merkle root hash"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppress output except errors"),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    let quiet = matches.get_flag("quiet");

    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let ledger_path = matches
        .get_one::<String>("ledger-path")
        .ok_or_else(|| anyhow!("--ledger-path is required"))?;
    let expected_root = matches.get_one::<String>("merkle-root");

    if let Err(e) = verify_ledger_file(ledger_path, expected_root, verbose) {
        error!("Ledger verification failed: {}", e);
        std::process::exit(1);
    }

    if !quiet {
        println!("Ledger verification completed successfully");
    }

    Ok(())
}

fn verify_ledger_file(path: &str, expected_root: Option<&String>, verbose: bool) -> Result<()> {
    info!("Verifying ledger export: {}", path);

    if !Path::new(path).exists() {
        return Err(anyhow!("Ledger export not found: {}", path));
    }

    let blocks = read_jsonl(Path::new(path))?;
    if blocks.is_empty() {
        return Err(anyhow!("Ledger export is empty"));
    }

    let report = VerificationReport::new(&blocks);
    if verbose {
        println!("{}", report.detailed_status());
    }
    if !report.is_valid() {
        return Err(anyhow!(report.summary()));
    }

    let root = merkle_root(&blocks)?;
    if verbose {
        println!("Merkle root: {}", root);
    }

    if let Some(expected) = expected_root {
        if &root != expected {
            return Err(anyhow!(
                "Merkle root mismatch. Expected: {}, Got: {}",
                expected,
                root
            ));
        }
        if verbose {
            println!("Merkle root matches expected value");
        }
    }

    if verbose {
        print_summary(&blocks);
    }

    Ok(())
}

fn print_summary(blocks: &[Block]) {
    let first = &blocks[0];
    let last = &blocks[blocks.len() - 1];

    println!("\nLedger Summary:");
    println!("  Total blocks: {}", blocks.len());
    println!("  First block: {}", first.timestamp);
    println!("  Last block: {}", last.timestamp);
    println!("  Head hash: {}", last.hash);

    let mut per_subject: HashMap<&str, (usize, f64)> = HashMap::new();
    for block in blocks.iter().filter(|block| !block.is_genesis()) {
        let entry = per_subject.entry(&block.subject_id).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 = entry.1.max(block.risk_score);
    }

    if !per_subject.is_empty() {
        println!("\nSubjects (blocks, highest score):");
        let mut subjects: Vec<_> = per_subject.into_iter().collect();
        subjects.sort_by(|a, b| a.0.cmp(b.0));
        for (subject, (count, max_score)) in subjects {
            println!("  {}: {} ({:.1})", subject, count, max_score);
        }
    }
}
