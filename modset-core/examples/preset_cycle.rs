/*!
Simple preset round-trip example for hyperfine performance testing.
*/

use modset_core::{
    create_default_store, restore_modifier, CodecOptions, EntityRegistry, HostValue, Modifier,
    PresetEntry, PresetSet, PropertyStore, SchemaRegistry, StoreConfig,
};
use std::time::Instant;

fn main() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let registry = SchemaRegistry::builtin();
    let options = CodecOptions::default();

    // Build a small modifier stack worth capturing
    let mut bevel = Modifier::with_defaults("Bevel", "BEVEL", registry).unwrap();
    bevel.set("width", HostValue::Float(0.03)).unwrap();
    bevel.set("segments", HostValue::Int(3)).unwrap();
    bevel.set("limit_method", HostValue::Str("ANGLE".into())).unwrap();

    let mut array = Modifier::with_defaults("Array", "ARRAY", registry).unwrap();
    array.set("count", HostValue::Int(8)).unwrap();
    array
        .set(
            "relative_offset_displace",
            HostValue::FloatArray(vec![1.1, 0.0, 0.0]),
        )
        .unwrap();

    let mut boolean = Modifier::with_defaults("Cut", "BOOLEAN", registry).unwrap();
    boolean.set("operation", HostValue::Str("DIFFERENCE".into())).unwrap();
    boolean
        .set("collection", HostValue::CollectionRef("Cutters".into()))
        .unwrap();

    let config = StoreConfig::new(temp_dir.path().join("prefs.json"), "Preset1");
    let store = create_default_store(&config);

    let start = Instant::now();

    // Capture and persist the stack
    let mut set = PresetSet::default();
    for modifier in [&bevel, &array, &boolean] {
        set.push(PresetEntry::capture(modifier, registry, &options).unwrap());
    }
    store.save(&config.slot, &set).unwrap();

    // Reload and restore onto freshly created modifiers
    let loaded = store.load(&config.slot).unwrap();
    let mut entities = EntityRegistry::new();
    entities.add_collection("Cutters");
    let mut applied = 0;
    let mut skipped = 0;
    for entry in &loaded.entries {
        let mut target =
            Modifier::with_defaults(entry.name.as_str(), entry.kind.as_str(), registry).unwrap();
        let report =
            restore_modifier(&mut target, &entry.snapshot(), registry, &entities).unwrap();
        applied += report.applied_count();
        skipped += report.skipped.len();
    }

    let duration = start.elapsed();

    println!("Preset cycle completed in: {:?}", duration);
    println!("Entries: {}", loaded.len());
    println!("Fields applied: {applied}, skipped: {skipped}");
    println!(
        "Preset file size: {} bytes",
        std::fs::metadata(&config.prefs_path).unwrap().len()
    );
}
