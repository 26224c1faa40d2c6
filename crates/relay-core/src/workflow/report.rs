//! Console summary and the persisted results file.
//!
//! The results file is written once, after all phases succeeded:
//!
//! ```text
//! ================================================================================
//! AUTOGEN INTERVIEW PLATFORM WORKFLOW - FULL RESULTS
//! ================================================================================
//! Generated: 2026-10-18 14:03:27
//! Model: gpt-4o-mini
//!
//!
//! --------------------------------------------------------------------------------
//! PHASE 1: MARKET RESEARCH
//! --------------------------------------------------------------------------------
//! <research output>
//! ...
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::workflow::specialist::Roster;
use crate::workflow::store::PhaseResults;

pub const HEAVY_RULE: char = '=';
pub const LIGHT_RULE: char = '-';
pub const RULE_WIDTH: usize = 80;

pub const ARTIFACT_TITLE: &str = "AUTOGEN INTERVIEW PLATFORM WORKFLOW - FULL RESULTS";

pub fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// Closing summary: every phase with the agent that ran it.
pub fn write_summary<W: Write>(console: &mut W, roster: &Roster) -> io::Result<()> {
    writeln!(console, "\n{}", rule(HEAVY_RULE))?;
    writeln!(console, "FINAL SUMMARY")?;
    writeln!(console, "{}", rule(HEAVY_RULE))?;
    writeln!(console)?;
    writeln!(console, "This workflow demonstrated a 5-agent collaboration:")?;
    for (phase, agent) in roster.iter() {
        writeln!(
            console,
            "{}. {} ({}) - {}",
            phase.number(),
            agent.name,
            agent.role,
            phase.accomplishment()
        )?;
    }
    writeln!(console)?;
    writeln!(console, "Each agent received context from the previous agent's output,")?;
    writeln!(console, "demonstrating the sequential workflow pattern.")?;
    Ok(())
}

/// Every phase output, in order.
pub fn write_full_results<W: Write>(console: &mut W, results: &PhaseResults) -> io::Result<()> {
    writeln!(console, "\n{}", rule(HEAVY_RULE))?;
    writeln!(console, "FULL RESULTS - ALL PHASES")?;
    writeln!(console, "{}", rule(HEAVY_RULE))?;
    for (phase, text) in results.iter() {
        writeln!(console, "\n{}", rule(LIGHT_RULE))?;
        writeln!(console, "PHASE {}: {} (Full Output)", phase.number(), phase.title())?;
        writeln!(console, "{}", rule(LIGHT_RULE))?;
        writeln!(console, "{text}")?;
    }
    Ok(())
}

/// `workflow_outputs_<YYYYMMDD_HHMMSS>.txt`
pub fn artifact_file_name<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("workflow_outputs_{}.txt", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Render the results file contents.
pub fn render_artifact<Tz: TimeZone>(
    results: &PhaseResults,
    model: &str,
    generated_at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let heavy = rule(HEAVY_RULE);
    let light = rule(LIGHT_RULE);

    let mut out = String::new();
    out.push_str(&format!("{heavy}\n{ARTIFACT_TITLE}\n{heavy}\n"));
    out.push_str(&format!(
        "Generated: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("Model: {model}\n\n"));

    for (phase, text) in results.iter() {
        out.push_str(&format!("\n{light}\n"));
        out.push_str(&format!("PHASE {}: {}\n", phase.number(), phase.title()));
        out.push_str(&format!("{light}\n"));
        out.push_str(text);
        out.push('\n');
    }
    out
}

/// Write the results file into `dir` and return its path.
///
/// The file is created fresh; if another file with the same timestamp already
/// exists a numeric suffix (`_1`, `_2`, ...) is added.
pub fn persist<Tz: TimeZone>(
    dir: &Path,
    results: &PhaseResults,
    model: &str,
    now: &DateTime<Tz>,
) -> io::Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    let contents = render_artifact(results, model, now);
    let base = artifact_file_name(now);
    let stem = base.trim_end_matches(".txt");

    for attempt in 0u32.. {
        let name = if attempt == 0 {
            base.clone()
        } else {
            format!("{stem}_{attempt}.txt")
        };
        let path = dir.join(name);
        match write_new_file(&path, |file| file.write_all(contents.as_bytes())) {
            Ok(()) => {
                tracing::info!("[Report] Results saved to '{}'", path.display());
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no free results file name",
    ))
}

/// Create `path` (which must not exist) and fill it with `write`.
///
/// A file whose contents could not be fully written is removed again.
fn write_new_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let written = write(&mut file).and_then(|()| file.sync_all());
    if let Err(e) = written {
        drop(file);
        if let Err(rm) = fs::remove_file(path) {
            tracing::warn!("[Report] Failed to remove partial '{}': {}", path.display(), rm);
        }
        return Err(e);
    }
    Ok(())
}
