//! Interactive stdin prompts: sheet choice for multi-sheet workbooks and
//! the per-collision merge resolver.

use anyhow::{Context, Result};
use std::io::{self, Write};

use valbook_core::{Record, amount::format_amount};
use valbook_io::merge::{Resolution, ResolveConflict};

pub fn prompt_line(question: &str) -> Result<String> {
    print!("{question} ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).context("read stdin")?;
    Ok(line.trim().to_string())
}

pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt_line(&format!("{question} [y/N]"))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Numbered sheet picker for workbooks with several sheets.
pub fn choose_sheet(names: &[String]) -> Result<String> {
    println!("The workbook has several sheets:");
    for (i, name) in names.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    loop {
        let answer = prompt_line("Sheet to import (number or name):")?;
        if let Ok(n) = answer.parse::<usize>() {
            if (1..=names.len()).contains(&n) {
                return Ok(names[n - 1].clone());
            }
        }
        if let Some(name) = names.iter().find(|s| **s == answer) {
            return Ok(name.clone());
        }
        println!("Pick one of the listed sheets.");
    }
}

/// Asks the user once per merge collision. An empty answer skips.
pub struct PromptResolver;

impl ResolveConflict for PromptResolver {
    fn resolve(&mut self, existing: &Record, incoming: &Record) -> Resolution {
        println!(
            "Reference {:?} already exists: {} (bill {})",
            existing.hec_ref_no,
            existing.client_name,
            format_amount(existing.bill_amount),
        );
        println!(
            "  incoming: {} (bill {})",
            incoming.client_name,
            format_amount(incoming.bill_amount),
        );
        loop {
            let Ok(answer) = prompt_line("  [s]kip / [o]verwrite / [k]eep both (default skip):")
            else {
                return Resolution::Skip;
            };
            match answer.to_lowercase().as_str() {
                "" | "s" | "skip" => return Resolution::Skip,
                "o" | "overwrite" => return Resolution::Overwrite,
                "k" | "keep-both" | "keep both" => return Resolution::KeepBoth,
                _ => println!("  answer s, o or k"),
            }
        }
    }
}
