use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::models::{RecordDraft, Reimbursed};
use crate::store::RecordStore;
use crate::ui::util::format_amount;

pub(crate) fn as_cli(args: &[String], store: &mut RecordStore) -> Result<()> {
    match args[1].as_str() {
        "list" | "ls" => cli_list(store),
        "add" => cli_add(&args[2..], store),
        "summary" | "s" => cli_summary(store),
        "export" => cli_export(&args[2..], store),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("prepaid-ledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Prepaid Ledger — record prepaid cash expenses and their reimbursement");
    println!();
    println!("Usage: prepaid-ledger [--file <path>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                             Launch interactive TUI");
    println!("  list                               Print all records and the total");
    println!("  add <date> <item...> <amount> [Yes|No]");
    println!("                                     Append a record (reimbursed defaults to No)");
    println!("  summary                            Print totals");
    println!("  export [path]                      Export records to CSV");
    println!("  --file <path>                      Use a specific records file");
    println!("  --help, -h                         Show this help");
    println!("  --version, -V                      Show version");
}

/// Pull `--file <path>` (or `--file=<path>`) out of the argument list.
pub(crate) fn extract_file_flag(args: Vec<String>) -> Result<(Option<PathBuf>, Vec<String>)> {
    let mut file = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        if arg == "--file" {
            let path = iter
                .next()
                .ok_or_else(|| anyhow::anyhow!("--file requires a path"))?;
            file = Some(PathBuf::from(expand_home(&path)));
        } else if let Some(path) = arg.strip_prefix("--file=") {
            if path.is_empty() {
                anyhow::bail!("--file requires a path");
            }
            file = Some(PathBuf::from(expand_home(path)));
        } else {
            rest.push(arg);
        }
    }

    Ok((file, rest))
}

fn load(store: &mut RecordStore) -> Result<()> {
    store.load().context("Failed to load records")?;
    let skipped = store.skipped();
    if !skipped.is_empty() {
        eprintln!(
            "Warning: skipped {} malformed line(s) in {}",
            skipped.len(),
            store.path().display()
        );
        for line in skipped {
            eprintln!("  line {}: {} ({})", line.line_number, line.content, line.reason);
        }
    }
    Ok(())
}

fn cli_list(store: &mut RecordStore) -> Result<()> {
    load(store)?;
    let records = store.records();
    if records.is_empty() {
        println!("No records");
        return Ok(());
    }

    println!("{:<12} {:<32} {:>12}  Reimbursed", "Date", "Item", "Amount");
    println!("{}", "─".repeat(70));
    for record in records {
        println!(
            "{:<12} {:<32} {:>12}  {}",
            record.date,
            record.item,
            format!("{:.2}", record.amount),
            record.reimbursed
        );
    }
    println!("{}", "─".repeat(70));
    println!("Total: {}", format_amount(store.total()));
    Ok(())
}

fn cli_add(args: &[String], store: &mut RecordStore) -> Result<()> {
    let draft = parse_add_args(args).ok_or_else(|| {
        anyhow::anyhow!("Usage: prepaid-ledger add <date> <item...> <amount> [Yes|No]")
    })?;

    let record = store
        .append(&draft)
        .map_err(|e| anyhow::anyhow!("Could not add record: {e}"))?;
    println!(
        "Added {} {} {} ({})",
        record.date,
        record.item,
        format_amount(record.amount),
        record.reimbursed
    );
    Ok(())
}

/// Split `<date> <item...> <amount> [Yes|No]` into a draft. The last word is
/// the reimbursed flag only when it is `Yes` or `No`; otherwise it is the amount.
fn parse_add_args(args: &[String]) -> Option<RecordDraft> {
    let (reimbursed, rest) = match args {
        [rest @ .., last] if rest.len() >= 3 && Reimbursed::parse(last).is_ok() => {
            (last.as_str(), rest)
        }
        _ => (Reimbursed::No.as_str(), args),
    };
    let [date, item @ .., amount] = rest else {
        return None;
    };
    if item.is_empty() {
        return None;
    }
    Some(RecordDraft::new(
        date.as_str(),
        item.join(" "),
        amount.as_str(),
        reimbursed,
    ))
}

fn cli_summary(store: &mut RecordStore) -> Result<()> {
    load(store)?;
    let total = store.total();
    let outstanding = store.outstanding();
    let count = store.records().len();
    let paid_back = store
        .records()
        .iter()
        .filter(|r| r.reimbursed == Reimbursed::Yes)
        .count();

    println!("Prepaid Ledger — {}", store.path().display());
    println!("{}", "─".repeat(40));
    println!("  Records:      {count} ({paid_back} reimbursed)");
    println!("  Reimbursed:   {}", format_amount(total - outstanding));
    println!("  Outstanding:  {}", format_amount(outstanding));
    println!("  Total spent:  {}", format_amount(total));
    if !store.skipped().is_empty() {
        println!("  Skipped:      {} line(s)", store.skipped().len());
    }
    Ok(())
}

fn cli_export(args: &[String], store: &mut RecordStore) -> Result<()> {
    load(store)?;
    let output_path = match args.first() {
        Some(path) => PathBuf::from(expand_home(path)),
        None => directories::UserDirs::new()
            .map(|d| d.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prepaid-export.csv"),
    };

    let count = crate::export::export_to_csv(store.records(), &output_path)?;
    println!("Exported {count} records to {}", output_path.display());
    Ok(())
}

pub(crate) fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), directories::UserDirs::new()) {
        (Some(rest), Some(dirs)) => dirs.home_dir().join(rest).display().to_string(),
        _ => path.to_string(),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
