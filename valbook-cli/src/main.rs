use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod prompt;
mod state;
mod table;

#[derive(Parser, Debug)]
#[command(
    name = "valbook",
    version,
    about = "Valuation record keeping: add, query, import and export billing entries"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a record to the active sheet
    Add(commands::AddArgs),

    /// Replace an existing record; unset flags keep their current values
    Update(commands::UpdateArgs),

    /// Delete a record by reference (no error if absent)
    Delete { ref_no: String },

    /// Select the record being edited, or clear the selection
    Select {
        ref_no: Option<String>,
        #[arg(long)]
        clear: bool,
    },

    /// Print one record (the selection when REF is omitted)
    Show {
        ref_no: Option<String>,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List records of the active sheet with filters, sorting and totals
    List(commands::ListArgs),

    /// Totals of the filtered view
    Summary(commands::FilterArgs),

    /// List sheet names (active sheet marked with *)
    Sheets,

    /// Switch the active sheet
    Use { sheet: String },

    /// Import records from a .json array or an xlsx/xls/xlsm workbook
    Import(commands::ImportArgs),

    /// Export to a workbook, or the active sheet as CSV
    Export(commands::ExportArgs),

    /// Print config and state file locations
    Paths,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let store_path = state::records_path(&cfg)?;
    let mut store = valbook_io::store_file::load_store(&store_path);
    tracing::debug!(
        path = %store_path.display(),
        sheets = store.sheet_names().len(),
        records = store.total_len(),
        "store loaded"
    );
    let now = Utc::now();

    let mutated = match cli.command {
        Command::Add(args) => {
            commands::cmd_add(&mut store, args, now)?;
            true
        }
        Command::Update(args) => {
            commands::cmd_update(&mut store, args, now)?;
            true
        }
        Command::Delete { ref_no } => {
            commands::cmd_delete(&mut store, &ref_no)?;
            true
        }
        Command::Select { ref_no, clear } => {
            commands::cmd_select(&mut store, ref_no.as_deref(), clear)?;
            true
        }
        Command::Show { ref_no, json } => {
            commands::cmd_show(&store, ref_no.as_deref(), json)?;
            false
        }
        Command::List(args) => {
            commands::cmd_list(&store, args)?;
            false
        }
        Command::Summary(args) => {
            commands::cmd_summary(&store, args)?;
            false
        }
        Command::Sheets => {
            commands::cmd_sheets(&store);
            false
        }
        Command::Use { sheet } => {
            commands::cmd_use(&mut store, &sheet)?;
            true
        }
        Command::Import(args) => {
            commands::cmd_import(&mut store, args, now)?;
            true
        }
        Command::Export(args) => {
            commands::cmd_export(&store, args, &cfg, now)?;
            false
        }
        Command::Paths => {
            commands::cmd_paths(&cfg)?;
            false
        }
    };

    if mutated {
        valbook_io::store_file::save_store(&store_path, &store)
            .with_context(|| format!("write {}", store_path.display()))?;
    }
    Ok(())
}
