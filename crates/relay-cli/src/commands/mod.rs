//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command and reuses
//! the relay-core workflow engine.

pub mod workflow;

use std::io::Write;

use relay_core::error::RelayError;

/// Process exit code for a failed command.
///
/// Configuration problems exit with 2 so scripts can tell them apart from a
/// run that started and then failed.
pub fn exit_code(err: &RelayError) -> i32 {
    if err.is_config() {
        2
    } else {
        1
    }
}

/// Print a failed command's error and troubleshooting hints.
pub fn print_failure<W: Write>(err: &RelayError, out: &mut W) -> std::io::Result<()> {
    if let RelayError::Config(cause) = err {
        writeln!(out, "ERROR: Configuration validation failed!")?;
        writeln!(out, "  {cause}")?;
        write_causes(out, cause)?;
        writeln!(out)?;
        writeln!(
            out,
            "Set OPENAI_API_KEY in the environment or in a .env file (./.env or ../.env)."
        )?;
        return Ok(());
    }

    writeln!(out, "\n❌ Error during workflow execution: {err}")?;
    writeln!(out, "\nTroubleshooting:")?;
    writeln!(
        out,
        "1. Verify OPENAI_API_KEY is set correctly (environment, ./.env or ../.env)"
    )?;
    writeln!(out, "2. Check that your account has available credits")?;
    writeln!(out, "3. Ensure you have an internet connection")?;
    writeln!(
        out,
        "4. Check that OPENAI_API_BASE points at a reachable OpenAI-compatible endpoint"
    )?;
    writeln!(out, "5. Check service status: https://status.openai.com")?;
    write_causes(out, err)
}

// Every source below `err`, one per line.
fn write_causes<W: Write>(
    out: &mut W,
    err: &(dyn std::error::Error + 'static),
) -> std::io::Result<()> {
    let mut causes = anyhow::Chain::new(err).skip(1).peekable();
    if causes.peek().is_some() {
        writeln!(out, "\nCaused by:")?;
        for cause in causes {
            writeln!(out, "    {cause}")?;
        }
    }
    Ok(())
}
