use std::env;

use anyhow::{anyhow, Context, Result};
use complaintdesk::config::{config_file_path, ensure_workspace_structure, load_or_default, save};
use complaintdesk::ComplaintStore;

fn main() -> Result<()> {
    let paths = ensure_workspace_structure()?;
    let args = CliArgs::parse()?;
    let config_path = config_file_path()?;
    let mut config = load_or_default()?;
    let mut changed = !config_path.exists();

    if let Some(prefix) = args.task_key_prefix {
        if config.store.task_key_prefix != prefix {
            config.store.task_key_prefix = prefix;
            changed = true;
        }
    }
    if let Some(strict) = args.strict_transitions {
        if config.store.strict_transitions != strict {
            config.store.strict_transitions = strict;
            changed = true;
        }
    }
    if let Some(enabled) = args.enrichment {
        if config.enrichment.enabled != enabled {
            config.enrichment.enabled = enabled;
            changed = true;
        }
    }

    if changed {
        save(&config)?;
        println!("Settings recorded at {}", config_path.display());
    } else {
        println!("Settings already configured.");
    }

    let store = ComplaintStore::open_workspace()?;
    println!(
        "Workspace {} holds {} users and {} complaints (next task key {}-{}).",
        paths.root.display(),
        store.users().len(),
        store.complaints().len(),
        store.config().store.task_key_prefix,
        store.next_task_seq()
    );
    Ok(())
}

struct CliArgs {
    task_key_prefix: Option<String>,
    strict_transitions: Option<bool>,
    enrichment: Option<bool>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut parsed = CliArgs {
            task_key_prefix: None,
            strict_transitions: None,
            enrichment: None,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--task-prefix" => {
                    let value = args
                        .next()
                        .context("Expected a prefix after --task-prefix")?;
                    parsed.task_key_prefix = Some(value);
                }
                "--strict" => parsed.strict_transitions = Some(true),
                "--permissive" => parsed.strict_transitions = Some(false),
                "--no-enrichment" => parsed.enrichment = Some(false),
                "--enrichment" => parsed.enrichment = Some(true),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Run with --help for usage instructions."
                    ));
                }
            }
        }
        Ok(parsed)
    }
}

fn print_usage() {
    println!("ComplaintDesk setup");
    println!("Creates the workspace and records store settings in config.toml.");
    println!("Usage: cargo run --bin setup -- [options]");
    println!("Options:");
    println!("  --task-prefix <prefix>   Prefix for task keys (default: TASK)");
    println!("  --strict | --permissive  Enforce or relax the status transition table");
    println!("  --enrichment | --no-enrichment  Toggle sentiment/translation enrichment");
}
