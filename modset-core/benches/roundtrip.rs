/*!
Performance benchmarks for the ModSet preset system.
These benchmarks help identify bottlenecks and measure performance improvements.
*/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use modset_core::{
    extract_modifier, extract_node_sockets, restore_modifier, restore_node_sockets, CodecOptions,
    EntityRegistry, HostValue, LocalFileStorage, Modifier, NodeGroupRef, NodesModifier,
    ParameterSnapshot, PresetEntry, PresetSet, PresetStore, PropertyStore, SchemaRegistry,
};
use tempfile::TempDir;

// Helper to build a populated modifier of one of the registered kinds
fn populated_modifier(index: usize) -> Modifier {
    let registry = SchemaRegistry::builtin();
    let kinds = ["BEVEL", "ARRAY", "SUBSURF", "WELD"];
    let kind = kinds[index % kinds.len()];
    let mut modifier =
        Modifier::with_defaults(format!("Bench {index}"), kind, registry).unwrap();
    match kind {
        "BEVEL" => {
            modifier.set("width", HostValue::Float(0.01 * index as f64)).unwrap();
            modifier.set("segments", HostValue::Int(index as i64 % 8 + 1)).unwrap();
            modifier.set("limit_method", HostValue::Str("ANGLE".into())).unwrap();
        }
        "ARRAY" => {
            modifier.set("count", HostValue::Int(index as i64 % 12 + 2)).unwrap();
            modifier
                .set(
                    "relative_offset_displace",
                    HostValue::FloatArray(vec![1.0 + index as f64 * 0.1, 0.0, 0.0]),
                )
                .unwrap();
        }
        "SUBSURF" => {
            modifier.set("levels", HostValue::Int(index as i64 % 4)).unwrap();
            modifier.set("render_levels", HostValue::Int(3)).unwrap();
        }
        _ => {
            modifier
                .set("merge_threshold", HostValue::Float(0.0001 * index as f64))
                .unwrap();
        }
    }
    modifier
}

fn scatter_modifier(socket_count: usize) -> NodesModifier {
    let mut gn = NodesModifier::new("Scatter");
    gn.node_group = Some(NodeGroupRef::asset(
        "Rock Scatter",
        "assets/scatter.blend",
        None,
    ));
    for i in 0..socket_count {
        match i % 4 {
            0 => gn.insert_socket(format!("Input_{i}"), HostValue::Float(i as f64 * 0.25)),
            1 => gn.insert_socket(format!("Input_{i}"), HostValue::Int(i as i64)),
            2 => gn.insert_socket(
                format!("Input_{i}"),
                HostValue::Vector(vec![0.0, 0.5, i as f64]),
            ),
            _ => gn.insert_socket(format!("Input_{i}"), HostValue::Str(format!("attr_{i}"))),
        }
    }
    gn
}

fn preset_set(entries: usize) -> PresetSet {
    let registry = SchemaRegistry::builtin();
    let options = CodecOptions::default();
    let mut set = PresetSet::default();
    for index in 0..entries {
        let modifier = populated_modifier(index);
        set.push(PresetEntry::capture(&modifier, registry, &options).unwrap());
    }
    set
}

fn benchmark_extract_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let registry = SchemaRegistry::builtin();
    let options = CodecOptions::default();

    let modifier = populated_modifier(0);
    group.bench_function("modifier", |b| {
        b.iter(|| black_box(extract_modifier(black_box(&modifier), registry, &options).unwrap()));
    });

    for socket_count in [8, 32, 128].iter() {
        let gn = scatter_modifier(*socket_count);
        group.throughput(Throughput::Elements(*socket_count as u64));
        group.bench_with_input(
            BenchmarkId::new("sockets", socket_count),
            &gn,
            |b, gn| {
                b.iter(|| black_box(extract_node_sockets(black_box(gn), &options)));
            },
        );
    }

    group.finish();
}

fn benchmark_restore_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("restore");
    let registry = SchemaRegistry::builtin();
    let options = CodecOptions::default();
    let entities = EntityRegistry::new();

    let source = populated_modifier(0);
    let snapshot = extract_modifier(&source, registry, &options).unwrap().snapshot;
    let mut target = Modifier::with_defaults("Target", source.kind(), registry).unwrap();
    group.bench_function("modifier", |b| {
        b.iter(|| {
            black_box(
                restore_modifier(black_box(&mut target), &snapshot, registry, &entities).unwrap(),
            );
        });
    });

    for socket_count in [8, 32, 128].iter() {
        let snapshot = extract_node_sockets(&scatter_modifier(*socket_count), &options).snapshot;
        let mut gn = scatter_modifier(*socket_count);
        group.throughput(Throughput::Elements(*socket_count as u64));
        group.bench_with_input(
            BenchmarkId::new("sockets", socket_count),
            &snapshot,
            |b, snapshot| {
                b.iter(|| {
                    black_box(restore_node_sockets(
                        black_box(&mut gn),
                        snapshot,
                        &entities,
                    ));
                });
            },
        );
    }

    group.finish();
}

fn benchmark_snapshot_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_codec");

    let snapshot = extract_node_sockets(&scatter_modifier(64), &CodecOptions::default()).snapshot;
    let encoded = snapshot.to_json();
    group.throughput(Throughput::Bytes(encoded.len() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| black_box(black_box(&snapshot).to_json()));
    });
    group.bench_function("decode", |b| {
        b.iter(|| black_box(ParameterSnapshot::from_json(black_box(&encoded)).unwrap()));
    });

    group.finish();
}

fn benchmark_store_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_roundtrip");

    let temp_dir = TempDir::new().unwrap();
    for entries in [1, 8, 32].iter() {
        let set = preset_set(*entries);
        let path = temp_dir.path().join(format!("bench_{entries}.json"));
        let store = PresetStore::new(
            LocalFileStorage::new(),
            path.to_string_lossy().into_owned(),
        );
        group.throughput(Throughput::Elements(*entries as u64));

        group.bench_with_input(
            BenchmarkId::new("save_load", entries),
            &set,
            |b, set| {
                b.iter(|| {
                    store.save("Preset1", black_box(set)).unwrap();
                    let loaded = store.load("Preset1").unwrap();
                    assert_eq!(loaded.len(), set.len());
                    black_box(loaded);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_extract_operations,
    benchmark_restore_operations,
    benchmark_snapshot_codec,
    benchmark_store_roundtrip
);
criterion_main!(benches);
