//! Subcommand handlers. Each one loads nothing and saves nothing itself;
//! main owns the store file.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use valbook_core::amount::{format_amount, parse_amount};
use valbook_core::dates;
use valbook_core::{
    Filters, PaymentStatus, Record, RecordDraft, RecordStore, ReportType, Sort, SortDir, SortKey,
    Totals, apply_query,
};
use valbook_io::error::{ExportError, ImportError};
use valbook_io::export::{default_file_name, write_csv, write_workbook};
use valbook_io::merge::{Resolution, merge_records};
use valbook_io::{json, workbook};

use crate::config::Config;
use crate::prompt::{self, PromptResolver};
use crate::state;
use crate::table;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Unique reference number
    #[arg(long = "ref")]
    pub ref_no: String,
    #[arg(long)]
    pub client: String,
    /// Valuation date as dd/MM/yyyy (defaults to today)
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub contact: String,
    /// One of the report type labels; unknown values fall back to "Final Report"
    #[arg(long = "report-type")]
    pub report_type: Option<String>,
    #[arg(long, default_value = "")]
    pub bank: String,
    #[arg(long, default_value = "")]
    pub branch: String,
    /// Amounts accept grouped text like "1,200.50"
    #[arg(long, default_value = "0")]
    pub fmv: String,
    #[arg(long, default_value = "0")]
    pub dv: String,
    #[arg(long, default_value = "0")]
    pub bill: String,
    #[arg(long, default_value = "0")]
    pub advance: String,
    #[arg(long = "paid-amount", default_value = "0")]
    pub paid_amount: String,
    /// "Paid" or anything else for Not Paid
    #[arg(long)]
    pub status: Option<String>,
}

pub fn cmd_add(store: &mut RecordStore, args: AddArgs, now: DateTime<Utc>) -> Result<()> {
    let record = RecordDraft {
        hec_ref_no: args.ref_no.trim().to_string(),
        date_text: args.date.unwrap_or_default(),
        client_name: args.client.trim().to_string(),
        address: args.address,
        contact_no: args.contact,
        type_of_report: args
            .report_type
            .as_deref()
            .and_then(ReportType::from_label)
            .unwrap_or_default(),
        bank_name: args.bank,
        branch: args.branch,
        fmv_amount: parse_amount(&args.fmv),
        dv_amount: parse_amount(&args.dv),
        bill_amount: parse_amount(&args.bill),
        advance_payment: parse_amount(&args.advance),
        paid_amount: parse_amount(&args.paid_amount),
        payment_status: args
            .status
            .as_deref()
            .map(PaymentStatus::from_label)
            .unwrap_or_default(),
    }
    .build(now, None);

    let ref_no = record.hec_ref_no.clone();
    store.add(record)?;
    println!("Added {ref_no} to sheet {:?}.", store.active_sheet());
    Ok(())
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Record to update (defaults to the current selection)
    pub ref_no: Option<String>,
    /// New reference number
    #[arg(long = "ref")]
    pub new_ref: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
    /// New date as dd/MM/yyyy
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long = "report-type")]
    pub report_type: Option<String>,
    #[arg(long)]
    pub bank: Option<String>,
    #[arg(long)]
    pub branch: Option<String>,
    #[arg(long)]
    pub fmv: Option<String>,
    #[arg(long)]
    pub dv: Option<String>,
    #[arg(long)]
    pub bill: Option<String>,
    #[arg(long)]
    pub advance: Option<String>,
    #[arg(long = "paid-amount")]
    pub paid_amount: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

/// Assemble the complete replacement entity from the existing record plus
/// changed flags, then hand it to the store's full-replace update.
pub fn cmd_update(store: &mut RecordStore, args: UpdateArgs, now: DateTime<Utc>) -> Result<()> {
    let original_ref = match args.ref_no {
        Some(r) => r,
        None => store
            .selected()
            .map(str::to_string)
            .context("no record selected; pass REF or run `valbook select REF`")?,
    };
    let mut rec: Record = store
        .get(&original_ref)
        .with_context(|| format!("no record with reference {original_ref:?}"))?
        .clone();

    if let Some(v) = args.new_ref {
        rec.hec_ref_no = v.trim().to_string();
    }
    if let Some(v) = args.client {
        rec.client_name = v.trim().to_string();
    }
    if let Some(v) = args.date {
        rec.date = dates::normalize_date(&v, now);
    }
    if let Some(v) = args.address {
        rec.address = v;
    }
    if let Some(v) = args.contact {
        rec.contact_no = v;
    }
    if let Some(v) = args.report_type {
        rec.type_of_report = ReportType::from_label(&v).unwrap_or_default();
    }
    if let Some(v) = args.bank {
        rec.bank_name = v;
    }
    if let Some(v) = args.branch {
        rec.branch = v;
    }
    if let Some(v) = args.fmv {
        rec.fmv_amount = parse_amount(&v);
    }
    if let Some(v) = args.dv {
        rec.dv_amount = parse_amount(&v);
    }
    if let Some(v) = args.bill {
        rec.bill_amount = parse_amount(&v);
    }
    if let Some(v) = args.advance {
        rec.advance_payment = parse_amount(&v);
    }
    if let Some(v) = args.paid_amount {
        rec.paid_amount = parse_amount(&v);
    }
    if let Some(v) = args.status {
        rec.payment_status = PaymentStatus::from_label(&v);
    }

    let new_ref = rec.hec_ref_no.clone();
    store.update(&original_ref, rec, now)?;
    if new_ref != original_ref {
        println!("Updated {original_ref} (now {new_ref}).");
    } else {
        println!("Updated {original_ref}.");
    }
    Ok(())
}

pub fn cmd_delete(store: &mut RecordStore, ref_no: &str) -> Result<()> {
    if store.delete(ref_no) {
        println!("Deleted {ref_no}.");
    } else {
        println!("No record with reference {ref_no:?}; nothing to do.");
    }
    Ok(())
}

pub fn cmd_select(store: &mut RecordStore, ref_no: Option<&str>, clear: bool) -> Result<()> {
    if clear {
        store.clear_selection();
        println!("Selection cleared.");
        return Ok(());
    }
    let ref_no = ref_no.context("pass REF, or --clear to drop the selection")?;
    store.select(ref_no)?;
    println!("Selected {ref_no}.");
    Ok(())
}

pub fn cmd_show(store: &RecordStore, ref_no: Option<&str>, as_json: bool) -> Result<()> {
    let ref_no = match ref_no {
        Some(r) => r,
        None => store
            .selected()
            .context("no record selected; pass REF or run `valbook select REF`")?,
    };
    let rec = store
        .get(ref_no)
        .with_context(|| format!("no record with reference {ref_no:?}"))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(rec)?);
        return Ok(());
    }
    println!("Reference:      {}", rec.hec_ref_no);
    println!("Date:           {}", dates::format_fixed(&rec.date));
    println!("Client:         {}", rec.client_name);
    println!("Address:        {}", rec.address);
    println!("Contact:        {}", rec.contact_no);
    println!("Report type:    {}", rec.type_of_report.label());
    println!("Bank:           {}", rec.bank_name);
    println!("Branch:         {}", rec.branch);
    println!("FMV:            {}", format_amount(rec.fmv_amount));
    println!("DV:             {}", format_amount(rec.dv_amount));
    println!("Bill:           {}", format_amount(rec.bill_amount));
    println!("Advance:        {}", format_amount(rec.advance_payment));
    println!("Paid amount:    {}", format_amount(rec.paid_amount));
    println!("Payment status: {}", rec.payment_status.label());
    println!("Created:        {}", rec.created_at.to_rfc3339());
    println!("Updated:        {}", rec.updated_at.to_rfc3339());
    Ok(())
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring of the client name
    #[arg(long)]
    pub client: Option<String>,
    /// Case-insensitive substring of the bank name
    #[arg(long)]
    pub bank: Option<String>,
    /// Inclusive lower date bound, dd/MM/yyyy
    #[arg(long)]
    pub from: Option<String>,
    /// Inclusive upper date bound, dd/MM/yyyy
    #[arg(long)]
    pub to: Option<String>,
}

impl FilterArgs {
    fn to_filters(&self) -> Filters {
        Filters {
            client_name: self.client.clone().unwrap_or_default(),
            bank_name: self.bank.clone().unwrap_or_default(),
            from: self.from.clone().unwrap_or_default(),
            to: self.to.clone().unwrap_or_default(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Sort key: any serialized field name, e.g. billAmount or createdAt
    #[arg(long, default_value = "createdAt")]
    pub sort: SortKey,
    #[arg(long, default_value = "desc")]
    pub dir: SortDir,
}

pub fn cmd_list(store: &RecordStore, args: ListArgs) -> Result<()> {
    let filters = args.filter.to_filters();
    let sort = Sort {
        key: args.sort,
        dir: args.dir,
    };
    let view = apply_query(store.records(), &filters, &sort);

    if view.is_empty() {
        println!("No records match.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = view
        .iter()
        .map(|r| {
            vec![
                r.hec_ref_no.clone(),
                dates::format_fixed(&r.date),
                r.client_name.clone(),
                r.bank_name.clone(),
                r.type_of_report.label().to_string(),
                format_amount(r.bill_amount),
                format_amount(r.paid_amount),
                r.payment_status.label().to_string(),
            ]
        })
        .collect();
    print!(
        "{}",
        table::render(
            &["Ref", "Date", "Client", "Bank", "Type", "Bill", "Paid", "Status"],
            &rows,
        )
    );

    let totals = Totals::of(view.iter().copied());
    println!(
        "\n{} of {} records | FMV {} | DV {} | Bill {}",
        view.len(),
        store.len(),
        format_amount(totals.fmv),
        format_amount(totals.dv),
        format_amount(totals.bill),
    );
    Ok(())
}

pub fn cmd_summary(store: &RecordStore, args: FilterArgs) -> Result<()> {
    let filters = args.to_filters();
    let view = apply_query(store.records(), &filters, &Sort::default());
    let totals = Totals::of(view.iter().copied());
    println!("Records: {}", view.len());
    println!("FMV:     {}", format_amount(totals.fmv));
    println!("DV:      {}", format_amount(totals.dv));
    println!("Bill:    {}", format_amount(totals.bill));
    Ok(())
}

pub fn cmd_sheets(store: &RecordStore) {
    for name in store.sheet_names() {
        let marker = if name == store.active_sheet() { "*" } else { " " };
        println!("{marker} {name}");
    }
}

pub fn cmd_use(store: &mut RecordStore, sheet: &str) -> Result<()> {
    store.set_active_sheet(sheet)?;
    println!("Active sheet is now {sheet:?}.");
    Ok(())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ImportMode {
    #[default]
    Replace,
    Merge,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ResolveChoice {
    Skip,
    Overwrite,
    KeepBoth,
}

impl From<ResolveChoice> for Resolution {
    fn from(choice: ResolveChoice) -> Self {
        match choice {
            ResolveChoice::Skip => Resolution::Skip,
            ResolveChoice::Overwrite => Resolution::Overwrite,
            ResolveChoice::KeepBoth => Resolution::KeepBoth,
        }
    }
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// .json array or .xlsx/.xls/.xlsm workbook
    pub file: PathBuf,
    /// replace swaps the active sheet wholesale; merge folds into it
    #[arg(long, value_enum, default_value = "replace")]
    pub mode: ImportMode,
    /// Workbook sheet to import
    #[arg(long)]
    pub sheet: Option<String>,
    /// Import every workbook sheet that has valid rows, replacing the store
    #[arg(long = "all-sheets")]
    pub all_sheets: bool,
    /// Fixed answer for merge collisions instead of prompting per record
    #[arg(long, value_enum)]
    pub resolve: Option<ResolveChoice>,
}

pub fn cmd_import(store: &mut RecordStore, args: ImportArgs, now: DateTime<Utc>) -> Result<()> {
    let ext = args
        .file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "json" => {
            let records = json::read_json_file(&args.file, now)
                .with_context(|| format!("import {}", args.file.display()))?;
            apply_import(store, records, args.mode, args.resolve)
        }
        "xlsx" | "xls" | "xlsm" => {
            if args.all_sheets {
                if args.mode == ImportMode::Merge {
                    bail!("--all-sheets replaces the whole store; merge works on a single sheet");
                }
                let sheets = workbook::read_workbook_all(&args.file, now)?;
                let records: usize = sheets.values().map(Vec::len).sum();
                let count = sheets.len();
                store.replace_all_sheets(sheets);
                println!("Imported {records} records across {count} sheets.");
                Ok(())
            } else {
                let records =
                    match workbook::read_workbook_sheet(&args.file, args.sheet.as_deref(), now) {
                        Ok(records) => records,
                        Err(ImportError::SheetChoiceRequired(names)) => {
                            let name = prompt::choose_sheet(&names)?;
                            workbook::read_workbook_sheet(&args.file, Some(&name), now)?
                        }
                        Err(e) => return Err(e.into()),
                    };
                apply_import(store, records, args.mode, args.resolve)
            }
        }
        other => {
            bail!("unsupported import file type {other:?} (expected .json, .xlsx, .xls or .xlsm)")
        }
    }
}

fn apply_import(
    store: &mut RecordStore,
    records: Vec<Record>,
    mode: ImportMode,
    resolve: Option<ResolveChoice>,
) -> Result<()> {
    match mode {
        ImportMode::Replace => {
            let count = records.len();
            store.replace_records(records);
            println!(
                "Imported {count} records into sheet {:?}.",
                store.active_sheet()
            );
        }
        ImportMode::Merge => {
            let existing = store.records().to_vec();
            let (merged, summary) = match resolve {
                Some(choice) => {
                    let fixed: Resolution = choice.into();
                    let mut resolver = move |_: &Record, _: &Record| fixed;
                    merge_records(existing, records, &mut resolver)
                }
                None => merge_records(existing, records, &mut PromptResolver),
            };
            store.replace_records(merged);
            println!(
                "Merged: {} added, {} overwritten, {} skipped, {} kept as copies.",
                summary.added, summary.overwritten, summary.skipped, summary.renamed
            );
        }
    }
    Ok(())
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination file (prompted for when omitted)
    pub path: Option<PathBuf>,
    /// Export the active sheet as CSV instead of a workbook
    #[arg(long)]
    pub csv: bool,
}

pub fn cmd_export(
    store: &RecordStore,
    args: ExportArgs,
    cfg: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    if store.total_len() == 0 {
        bail!("no records to export");
    }

    let default_dir = match &cfg.export.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let default_name = if args.csv {
        format!("{}_{}.csv", cfg.export.filename_prefix, now.format("%Y-%m-%d"))
    } else {
        default_file_name(&cfg.export.filename_prefix, now)
    };
    let default_path = default_dir.join(&default_name);

    let path = match args.path {
        Some(path) => path,
        None => {
            let answer =
                prompt::prompt_line(&format!("Export to [{}]:", default_path.display()))?;
            if answer.is_empty() {
                default_path.clone()
            } else {
                PathBuf::from(answer)
            }
        }
    };

    if path.exists() && !prompt::confirm(&format!("{} exists, overwrite?", path.display()))? {
        // User cancellation aborts outright, no fallback.
        println!("Export cancelled.");
        return Ok(());
    }

    match export_to(&path, store, args.csv) {
        Ok(()) => {
            println!("Exported to {}", path.display());
            Ok(())
        }
        Err(e) if path != default_path => {
            let question = format!(
                "Writing {} failed ({e}); write {} instead?",
                path.display(),
                default_path.display()
            );
            if prompt::confirm(&question)? {
                export_to(&default_path, store, args.csv)?;
                println!("Exported to {}", default_path.display());
                Ok(())
            } else {
                Err(e.into())
            }
        }
        Err(e) => Err(e.into()),
    }
}

fn export_to(path: &std::path::Path, store: &RecordStore, csv: bool) -> Result<(), ExportError> {
    if csv {
        write_csv(path, store.records())
    } else {
        write_workbook(path, store.sheets())
    }
}

pub fn cmd_paths(cfg: &Config) -> Result<()> {
    println!("config:  {}", crate::config::config_path()?.display());
    println!("records: {}", state::records_path(cfg)?.display());
    match &cfg.export.dir {
        Some(dir) => println!("exports: {}", dir.display()),
        None => println!("exports: (current directory)"),
    }
    Ok(())
}
