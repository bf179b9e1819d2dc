//! Cache command - inspect and manage the artifact cache

use crate::cache::{
    fingerprint, format_bytes, hash_file_contents, CacheKind, HostCacheEntry, HostFileStore,
};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::KilnResult;
use chrono::Utc;
use console::style;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> KilnResult<()> {
    let store = HostFileStore::new(&config.cache.host_dir);
    debug!("Host cache at {}", store.root().display());

    match args.action {
        CacheAction::Key {
            inputs,
            kind,
            format,
        } => show_key(&inputs, kind.into(), format),
        CacheAction::List { format } => list_entries(&store, format).await,
        CacheAction::Clear { yes } => clear_entries(&store, yes).await,
    }
}

#[derive(Serialize)]
struct InputJson {
    path: String,
    sha256: Option<String>,
}

#[derive(Serialize)]
struct KeyJson {
    kind: CacheKind,
    key: Option<String>,
    inputs: Vec<InputJson>,
}

fn key_report(inputs: &[PathBuf], kind: CacheKind) -> KeyJson {
    KeyJson {
        kind,
        key: fingerprint(kind, inputs).map(|k| k.to_string()),
        inputs: inputs
            .iter()
            .map(|p| InputJson {
                path: p.display().to_string(),
                sha256: hash_file_contents(p).ok(),
            })
            .collect(),
    }
}

/// Print the cache key the inputs would be stored under
fn show_key(inputs: &[PathBuf], kind: CacheKind, format: OutputFormat) -> KilnResult<()> {
    let report = key_report(inputs, kind);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table | OutputFormat::Plain => match report.key {
            Some(key) => println!("{}", key),
            None => {
                let unreadable: Vec<&str> = report
                    .inputs
                    .iter()
                    .filter(|i| i.sha256.is_none())
                    .map(|i| i.path.as_str())
                    .collect();
                eprintln!(
                    "{} not cacheable, unreadable or non-file inputs: {}",
                    style("!").yellow(),
                    unreadable.join(", ")
                );
            }
        },
    }

    Ok(())
}

/// List host cache entries
async fn list_entries(store: &HostFileStore, format: OutputFormat) -> KilnResult<()> {
    let entries = store.entries().await?;

    if entries.is_empty() && !matches!(format, OutputFormat::Json) {
        println!("No cache entries found.");
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_entry_table(&entries),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry.key);
            }
        }
    }

    Ok(())
}

fn format_age(entry: &HostCacheEntry) -> String {
    let age = Utc::now().signed_duration_since(entry.modified_at);
    if age.num_days() > 0 {
        format!("{}d ago", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{}h ago", age.num_hours())
    } else {
        format!("{}m ago", age.num_minutes().max(0))
    }
}

fn print_entry_table(entries: &[HostCacheEntry]) {
    println!("{:<72} {:>10} {:<10}", "KEY", "SIZE", "MODIFIED");
    println!("{}", "-".repeat(94));

    let mut total = 0;
    for entry in entries {
        total += entry.size_bytes;
        println!(
            "{:<72} {:>10} {:<10}",
            entry.key,
            format_bytes(entry.size_bytes),
            format_age(entry)
        );
    }

    println!();
    println!(
        "Total: {} entr{} ({})",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
        format_bytes(total)
    );
}

/// Remove all host cache entries
async fn clear_entries(store: &HostFileStore, skip_confirm: bool) -> KilnResult<()> {
    let entries = store.entries().await?;

    if entries.is_empty() {
        println!("No cache entries to clear.");
        return Ok(());
    }

    let total: u64 = entries.iter().map(|e| e.size_bytes).sum();
    println!(
        "This will remove {} cache entr{} ({}) from {}",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
        format_bytes(total),
        store.root().display()
    );

    if !skip_confirm {
        print!("Are you sure? [y/N] ");
        let _ = io::stdout().flush();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Failed to read input, aborting.");
            return Ok(());
        }

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let removed = store.clear().await?;
    println!(
        "{} cleared {} cache entr{}",
        style("✓").green(),
        removed,
        if removed == 1 { "y" } else { "ies" }
    );

    Ok(())
}
