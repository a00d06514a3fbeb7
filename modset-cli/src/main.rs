/*!
ModSet CLI - Command-line interface for the ModSet preset system.

This CLI provides utilities for inspecting, managing, and verifying modifier
presets stored in JSON preset files.
*/

use clap::{Parser, Subcommand};
use modset_core::{
    config::{DEFAULT_PREFS_FILE, DEFAULT_SLOT, MAX_SLOTS},
    create_default_store, extract_modifier, restore_modifier, CodecOptions, EntityRegistry,
    LocalFileStorage, Modifier, PresetEntry, PresetSet, PresetStore, SchemaRegistry, StoreConfig,
};
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "modset")]
#[command(about = "CLI for the ModSet modifier preset system")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Preset file to operate on
    #[arg(
        short,
        long,
        global = true,
        env = "MODSET_PREFS_FILE",
        default_value = DEFAULT_PREFS_FILE
    )]
    file: PathBuf,

    /// Preset slot to operate on
    #[arg(short, long, global = true, default_value = DEFAULT_SLOT)]
    slot: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the slots present in the preset file
    Slots,
    /// List the entries of the selected slot
    List {
        /// Show additional details
        #[arg(short, long)]
        detailed: bool,
    },
    /// Show details of a specific entry
    Show {
        /// Entry position in the slot, starting at 0
        index: usize,
    },
    /// Move an entry within the slot
    Move {
        /// Entry position in the slot, starting at 0
        index: usize,
        /// Offset to move by, negative moves toward the front
        #[arg(short, long, allow_hyphen_values = true)]
        by: isize,
    },
    /// Delete an entry from the slot
    Delete {
        /// Entry position in the slot, starting at 0
        index: usize,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Round-trip every entry of the slot through a freshly built modifier
    Verify,
    /// Create the preset file with empty slots
    Init {
        /// Overwrite an existing preset file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Entries")]
    entries: usize,
    #[tabled(rename = "Columns")]
    columns: u32,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Origin")]
    origin: String,
    #[tabled(rename = "Fields")]
    fields: usize,
}

#[derive(Tabled)]
struct DetailedEntryRow {
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Library")]
    library: String,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Size")]
    size: String,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = StoreConfig::new(cli.file.clone(), cli.slot.clone());
    config.validate()?;
    let store = create_default_store(&config);

    // Execute command
    match cli.command {
        Commands::Slots => list_slots(&store)?,
        Commands::List { detailed } => list_entries(&store, &config.slot, detailed)?,
        Commands::Show { index } => show_entry(&store, &config.slot, index)?,
        Commands::Move { index, by } => move_entry(&store, &config.slot, index, by)?,
        Commands::Delete { index, force } => delete_entry(&store, &config.slot, index, force)?,
        Commands::Verify => verify_slot(&store, &config.slot)?,
        Commands::Init { force } => init_file(&store, force)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"))
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn list_slots(store: &PresetStore<LocalFileStorage>) -> Result<(), anyhow::Error> {
    info!("Listing slots from {}", store.path());

    if !store.exists() {
        println!("No preset file found at: {}", store.path());
        return Ok(());
    }

    let slots = store.slots()?;
    if slots.is_empty() {
        println!("No slots found");
        return Ok(());
    }

    let mut rows = Vec::new();
    for slot in slots {
        let set = store.load_or_default(&slot)?;
        rows.push(SlotRow {
            entries: set.len(),
            columns: set.preference.column_number,
            slot,
        });
    }
    let table = Table::new(rows);
    println!("{table}");

    Ok(())
}

fn origin_of(entry: &PresetEntry) -> String {
    if entry.is_node_preset() {
        "node group".to_string()
    } else {
        "modifier".to_string()
    }
}

fn list_entries(
    store: &PresetStore<LocalFileStorage>,
    slot: &str,
    detailed: bool,
) -> Result<(), anyhow::Error> {
    let set = store.load(slot)?;
    if set.is_empty() {
        println!("Slot '{slot}' has no entries");
        return Ok(());
    }

    if detailed {
        let rows: Vec<DetailedEntryRow> = set
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| DetailedEntryRow {
                index,
                name: entry.name.clone(),
                kind: entry.kind.clone(),
                path: entry.path.clone(),
                library: entry.asset_library.clone(),
                fields: entry.snapshot().len(),
                size: format_size(entry.parameters.len() as u64),
            })
            .collect();
        println!("{}", Table::new(rows));
    } else {
        let rows: Vec<EntryRow> = set
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| EntryRow {
                index,
                name: entry.name.clone(),
                kind: entry.kind.clone(),
                icon: entry.icon.clone(),
                origin: origin_of(entry),
                fields: entry.snapshot().len(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    Ok(())
}

fn show_entry(
    store: &PresetStore<LocalFileStorage>,
    slot: &str,
    index: usize,
) -> Result<(), anyhow::Error> {
    let set = store.load(slot)?;
    let entry = set
        .entries
        .get(index)
        .ok_or_else(|| anyhow::anyhow!("no entry at index {index} in slot '{slot}'"))?;

    println!("Entry Details:");
    println!("  Index: {index}");
    println!("  Name: {}", entry.name);
    println!("  Type: {}", entry.kind);
    println!("  Icon: {}", entry.icon);
    if entry.is_node_preset() {
        println!("  Node Path: {}", entry.path);
        if !entry.asset_library.is_empty() {
            println!("  Asset Library: {}", entry.asset_library);
        }
    }

    let snapshot = entry.snapshot();
    if snapshot.is_empty() {
        println!("  Parameters: (none)");
    } else {
        println!("  Parameters: {}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}

fn move_entry(
    store: &PresetStore<LocalFileStorage>,
    slot: &str,
    index: usize,
    by: isize,
) -> Result<(), anyhow::Error> {
    let mut set = store.load(slot)?;
    if !set.swap_with_offset(index, by) {
        return Err(anyhow::anyhow!(
            "cannot move entry {index} by {by}, slot '{slot}' has {} entries",
            set.len()
        ));
    }
    store.save(slot, &set)?;
    println!("✓ Entry {index} moved by {by}");

    Ok(())
}

fn delete_entry(
    store: &PresetStore<LocalFileStorage>,
    slot: &str,
    index: usize,
    force: bool,
) -> Result<(), anyhow::Error> {
    let mut set = store.load(slot)?;
    let name = match set.entries.get(index) {
        Some(entry) => entry.name.clone(),
        None => {
            return Err(anyhow::anyhow!("no entry at index {index} in slot '{slot}'"));
        }
    };

    if !force {
        print!("Are you sure you want to delete preset '{name}'? (y/N): ");
        use std::io::{self, Write};
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().to_lowercase().starts_with('y') {
            println!("Deletion cancelled");
            return Ok(());
        }
    }

    set.remove(index);
    store.save(slot, &set)?;
    println!("✓ Preset '{name}' deleted successfully");

    Ok(())
}

fn verify_slot(store: &PresetStore<LocalFileStorage>, slot: &str) -> Result<(), anyhow::Error> {
    info!("Verifying slot: {}", slot);

    let set = store.load(slot)?;
    if set.is_empty() {
        println!("Slot '{slot}' has no entries");
        return Ok(());
    }

    let registry = SchemaRegistry::builtin();
    let options = CodecOptions::default();
    let entities = EntityRegistry::new();
    let mut failures = 0;

    for (index, entry) in set.entries.iter().enumerate() {
        if entry.is_node_preset() {
            // Node groups need a live host to instantiate, only the stored
            // parameters can be checked here
            let fields = entry.snapshot().len();
            println!("- [{index}] {}: node preset with {fields} stored fields", entry.name);
            continue;
        }
        match verify_entry(entry, registry, &options, &entities) {
            Ok(applied) => {
                println!("✓ [{index}] {}: {applied} fields round-tripped", entry.name);
            }
            Err(e) => {
                error!("✗ [{index}] {}: {}", entry.name, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow::anyhow!("{failures} entries failed verification"));
    }
    println!("✓ All entries verified");

    Ok(())
}

fn verify_entry(
    entry: &PresetEntry,
    registry: &SchemaRegistry,
    options: &CodecOptions,
    entities: &EntityRegistry,
) -> Result<usize, anyhow::Error> {
    entry.validate()?;

    let snapshot = entry.snapshot();
    let mut target = Modifier::with_defaults(entry.name.as_str(), entry.kind.as_str(), registry)?;
    let report = restore_modifier(&mut target, &snapshot, registry, entities)?;
    for skipped in &report.skipped {
        warn!("field skipped during restore: {}", skipped);
    }

    // References cannot resolve outside a live scene, so compare only the
    // fields that actually landed
    let recaptured = extract_modifier(&target, registry, options)?;
    let mut mismatches = 0;
    for key in &report.applied {
        if recaptured.snapshot.get(key) != snapshot.get(key) {
            warn!("value for {key} changed during the round trip");
            mismatches += 1;
        }
    }
    if mismatches > 0 {
        return Err(anyhow::anyhow!("{mismatches} fields changed during round trip"));
    }

    Ok(report.applied.len())
}

fn init_file(store: &PresetStore<LocalFileStorage>, force: bool) -> Result<(), anyhow::Error> {
    if store.exists() {
        if !force {
            return Err(anyhow::anyhow!(
                "preset file {} already exists (use --force to overwrite)",
                store.path()
            ));
        }
        std::fs::remove_file(store.path())?;
    }

    for index in 0..MAX_SLOTS {
        let slot = StoreConfig::slot_name(index)?;
        store.save(&slot, &PresetSet::default())?;
    }
    println!(
        "✓ Preset file {} initialized with {MAX_SLOTS} empty slots",
        store.path()
    );

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
