/*!
# ModSet Core Engine

Modifier preset snapshot and restore engine core library.

This crate captures modifier parameters from host objects into JSON-safe
snapshots and restores them later, with support for:

- A closed value taxonomy backed by a static per-kind schema registry
- Per-property failure tolerance with extraction and restore reports
- Geometry-node socket capture under the host's socket naming convention
- Preset slots persisted as JSON documents over pluggable storage adapters

## Architecture

The core follows hexagonal architecture principles:
- Codec logic talks to host objects through the [`PropertyStore`] contract
- Persistence goes through the [`StorageAdapter`] port
- Easy to extend with new host bindings or storage backends

## Usage

```rust
use modset_core::{
    create_default_store, CodecOptions, Modifier, PresetEntry, SchemaRegistry, StoreConfig,
};

fn save_current(modifier: &Modifier) -> modset_core::Result<()> {
    // Capture the modifier's parameters into a preset entry
    let entry =
        PresetEntry::capture(modifier, SchemaRegistry::builtin(), &CodecOptions::default())?;

    // Append it to the first preset slot
    let store = create_default_store(&StoreConfig::default());
    let mut set = store.load_or_default("Preset1")?;
    set.push(entry);
    store.save("Preset1", &set)
}
```
*/

pub mod config;
pub mod error;
pub mod extract;
pub mod host;
pub mod icons;
pub mod normalize;
pub mod preset;
pub mod restore;
pub mod schema;
pub mod snapshot;
pub mod store;
pub mod value;

pub use error::{FieldError, FieldErrorKind, ModsetError, Result};
pub use value::{ArrayElem, HostValue, ValueKind};
pub use schema::{KindSchema, PropertyDescriptor, SchemaRegistry};
pub use host::{EntityRegistry, Modifier, NodeGroupRef, NodesModifier, PropertyStore};
pub use snapshot::ParameterSnapshot;
pub use extract::{
    extract_modifier, extract_node_sockets, CodecOptions, ExtractReport, FloatPrecision,
    ObjectRefPolicy,
};
pub use restore::{restore_modifier, restore_node_sockets, RestoreReport};
pub use preset::{PresetEntry, PresetPrefs, PresetSet};
pub use store::{create_default_store, LocalFileStorage, PresetStore, StorageAdapter};
pub use config::StoreConfig;
pub use icons::icon_for;
