//! Roster CLI
//!
//! Non-interactive front end for the registration core: inspect the roster,
//! submit a batch from a JSON file, or export the table as admin.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use karate_registration::{AdminPanel, Registry, RegistryConfig, SubmitOutcome};

#[derive(Parser)]
#[command(name = "roster", about = "Championship roster registration")]
struct Cli {
    /// Roster CSV file (defaults to ROSTER_DATA_FILE or athletes_data.csv)
    #[arg(long)]
    data_file: Option<std::path::PathBuf>,

    /// Spreadsheet webhook URL (defaults to ROSTER_SHEET_ENDPOINT)
    #[arg(long)]
    sheet_endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the roster summary
    Show,
    /// Validate and submit a batch of records from a JSON file
    Register {
        /// JSON array of athlete records
        #[arg(long)]
        file: std::path::PathBuf,
    },
    /// Export the full roster (admin)
    Export {
        /// Admin secret
        #[arg(long)]
        password: String,
        /// Event name used in the artifact filename
        #[arg(long)]
        event: Option<String>,
        /// Directory to write the artifact into
        #[arg(long, default_value = ".")]
        out_dir: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = RegistryConfig::from_env();
    if let Some(path) = cli.data_file {
        config.data_file = path;
    }
    if let Some(url) = cli.sheet_endpoint {
        config.sheet_endpoint = url;
    }

    match cli.command {
        Command::Show => {
            let registry = Registry::new(&config);
            let table = registry.store().load()?;
            println!("Roster: {} players", table.len());
            println!("Championships: {}", table.championship_count());
        }
        Command::Register { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read batch file {file:?}"))?;
            let batch: Vec<karate_registration::AthleteRecord> =
                serde_json::from_str(&json).context("Failed to parse batch file")?;
            if batch.is_empty() {
                bail!("Batch file contains no records");
            }

            let registry = Registry::new(&config);
            match registry.submit(&batch).await? {
                SubmitOutcome::Accepted {
                    saved,
                    replicated,
                    total_rows,
                } => {
                    println!("{saved} players registered, roster now has {total_rows} rows");
                    if config.sheet_endpoint.is_empty() {
                        println!("Sheet replication disabled");
                    } else if replicated == saved {
                        println!("All {replicated} rows mirrored to the sheet");
                    } else {
                        println!(
                            "Mirrored {replicated}/{saved} rows, local file saved as backup"
                        );
                    }
                }
                SubmitOutcome::Rejected(errors) => {
                    eprintln!("Fix these errors:");
                    for error in &errors {
                        eprintln!("  - {error}");
                    }
                    bail!("Batch rejected with {} errors", errors.len());
                }
            }
        }
        Command::Export {
            password,
            event,
            out_dir,
        } => {
            let panel = AdminPanel::new(config.admin_digest.clone());
            let Some(access) = panel.unlock(&password) else {
                bail!("Invalid admin password");
            };

            let registry = Registry::new(&config);
            let table = registry.store().load()?;
            let artifact = access.export(
                &table,
                event.as_deref(),
                chrono::Utc::now().date_naive(),
            )?;

            let path = out_dir.join(&artifact.filename);
            std::fs::write(&path, &artifact.bytes)
                .with_context(|| format!("Failed to write export to {path:?}"))?;
            println!("Exported {} rows to {}", table.len(), path.display());
        }
    }

    Ok(())
}
