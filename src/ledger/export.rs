//! JSON Lines export of ledger snapshots
//!
//! One block per line, chain order. Used to hand a copy of the chain to
//! offline verification; the running ledger is never reloaded from it.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{GuardError, Result};
use crate::ledger::block::Block;

/// Render blocks as JSON Lines
pub fn to_jsonl(blocks: &[Block]) -> Result<String> {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&serde_json::to_string(block)?);
        out.push('\n');
    }
    Ok(out)
}

/// Write blocks to `path`, replacing any existing file
pub fn write_jsonl(path: &Path, blocks: &[Block]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                GuardError::ExportError(format!("Failed to create export directory: {}", e))
            })?;
        }
    }

    let file = File::create(path)
        .map_err(|e| GuardError::ExportError(format!("Failed to create {:?}: {}", path, e)))?;
    let mut writer = BufWriter::new(file);

    for block in blocks {
        let json = serde_json::to_string(block)?;
        writeln!(writer, "{}", json)
            .map_err(|e| GuardError::ExportError(format!("Failed to write block: {}", e)))?;
    }
    writer
        .flush()
        .map_err(|e| GuardError::ExportError(format!("Failed to flush export: {}", e)))?;

    info!("Exported {} blocks to {:?}", blocks.len(), path);
    Ok(())
}

/// Read blocks from a JSON Lines file, skipping blank lines
pub fn read_jsonl(path: &Path) -> Result<Vec<Block>> {
    let file = File::open(path)
        .map_err(|e| GuardError::ExportError(format!("Failed to open {:?}: {}", path, e)))?;

    let reader = BufReader::new(file);
    let mut blocks = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            GuardError::ExportError(format!("Failed to read line {}: {}", line_num + 1, e))
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let block: Block =
            serde_json::from_str(&line).map_err(|e| GuardError::export_line(line_num + 1, e))?;
        blocks.push(block);
    }

    debug!("Loaded {} blocks from {:?}", blocks.len(), path);
    Ok(blocks)
}
