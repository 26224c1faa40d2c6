//! `relay run` / `relay validate` / `relay agents` — the prompt-chain workflow.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use console::style;
use relay_core::config::Settings;
use relay_core::error::RelayError;
use relay_core::workflow::report::{self, rule, HEAVY_RULE};
use relay_core::workflow::{CompletionClient, HttpCompletionClient, Roster, WorkflowExecutor};

/// Options for `relay run`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory the results file is written to
    pub output_dir: PathBuf,
    /// Agent roster overrides (YAML)
    pub agents_file: Option<PathBuf>,
    /// Show prompt sizes and token usage per phase
    pub verbose: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            agents_file: None,
            verbose: false,
        }
    }
}

/// Run the workflow against the configured endpoint.
///
/// Configuration is validated before any completion call is made.
pub async fn run(opts: &RunOptions) -> Result<PathBuf, RelayError> {
    let settings = Settings::from_env()?;
    let roster = Roster::load(opts.agents_file.as_deref())?;
    let client = HttpCompletionClient::new(settings.base_url.clone(), settings.api_key.clone());

    let mut stdout = std::io::stdout();
    run_with_client(&settings, &roster, &client, opts, &mut stdout).await
}

/// Run all phases with `client`, then print the summary and persist results.
///
/// Nothing is written to disk unless every phase succeeded.
pub async fn run_with_client<W: Write>(
    settings: &Settings,
    roster: &Roster,
    client: &dyn CompletionClient,
    opts: &RunOptions,
    console: &mut W,
) -> Result<PathBuf, RelayError> {
    let mut executor = WorkflowExecutor::new(settings, roster, client);
    executor.set_verbose(opts.verbose);

    let results = executor.execute(console).await?;

    report::write_summary(console, roster).map_err(RelayError::Console)?;
    report::write_full_results(console, &results).map_err(RelayError::Console)?;

    let path = report::persist(&opts.output_dir, &results, &settings.model, &Local::now())
        .map_err(RelayError::Persist)?;

    finish(console, &path).map_err(RelayError::Console)?;
    Ok(path)
}

fn finish<W: Write>(console: &mut W, path: &Path) -> std::io::Result<()> {
    writeln!(console, "\n💾 Full results saved to: {}", path.display())?;
    writeln!(console, "\nEnd Time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(console, "{}", rule(HEAVY_RULE))?;
    writeln!(
        console,
        "\n{}",
        style("✅ Workflow completed successfully!").green()
    )?;
    console.flush()
}

/// Validate configuration and roster without calling the model.
pub fn validate<W: Write>(agents_file: Option<&Path>, console: &mut W) -> Result<(), RelayError> {
    let settings = Settings::from_env()?;
    let roster = Roster::load(agents_file)?;
    write_validation(console, &settings, &roster).map_err(RelayError::Console)
}

fn write_validation<W: Write>(
    console: &mut W,
    settings: &Settings,
    roster: &Roster,
) -> std::io::Result<()> {
    writeln!(console, "✅ Configuration is valid")?;
    writeln!(console, "   Endpoint   : {}", settings.base_url)?;
    writeln!(console, "   Model      : {}", settings.model)?;
    writeln!(console, "   Temperature: {}", settings.temperature)?;
    writeln!(console, "   Max tokens : {}", settings.max_tokens)?;
    writeln!(console, "   Phases:")?;
    for (phase, agent) in roster.iter() {
        writeln!(
            console,
            "   {}. {} → {} ({})",
            phase.number(),
            phase.key(),
            agent.name,
            agent.role
        )?;
    }
    Ok(())
}

/// List the agent roster.
pub fn list_agents<W: Write>(agents_file: Option<&Path>, console: &mut W) -> Result<(), RelayError> {
    let roster = Roster::load(agents_file)?;
    write_agents_table(console, &roster).map_err(RelayError::Console)
}

fn write_agents_table<W: Write>(console: &mut W, roster: &Roster) -> std::io::Result<()> {
    writeln!(console, "┌────────────┬──────────────────────┬────────────────────────────────┬──────────┐")?;
    writeln!(console, "│ ID         │ Name                 │ Role                           │ Source   │")?;
    writeln!(console, "├────────────┼──────────────────────┼────────────────────────────────┼──────────┤")?;
    for (_, agent) in roster.iter() {
        writeln!(
            console,
            "│ {:<10} │ {:<20} │ {:<30} │ {:<8} │",
            truncate(&agent.id, 10),
            truncate(&agent.name, 20),
            truncate(&agent.role, 30),
            if agent.from_file { "file" } else { "builtin" }
        )?;
    }
    writeln!(console, "└────────────┴──────────────────────┴────────────────────────────────┴──────────┘")?;
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Go-To-Market Strategist", 10), "Go-To-Mar…");
    }

    #[test]
    fn test_agents_table_marks_source() {
        let roster = Roster::from_yaml("agents:\n  marketing:\n    name: Hype\n").unwrap();
        let mut out: Vec<u8> = Vec::new();
        write_agents_table(&mut out, &roster).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("reviewer"));
        assert_eq!(text.matches("builtin").count(), 4);
        assert_eq!(text.matches("file").count(), 1);
    }
}
