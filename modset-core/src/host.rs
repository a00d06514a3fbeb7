/*!
Host object boundary.

The codec talks to modifier-like objects through a narrow contract and never
assumes it can reach the host application's full object model. This module
defines that contract plus in-memory reference implementations used by the
CLI verifier, the tests, the benches and the demos.

Host objects own shape enforcement: a write that does not fit the property
is rejected with a reason string, and the codec records the rejection
instead of panicking.
*/

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ModsetError, Result};
use crate::schema::SchemaRegistry;
use crate::value::HostValue;

/// Read/write access to a modifier's properties.
pub trait PropertyStore {
    /// Display name, including any duplicate suffix the host appended.
    fn name(&self) -> &str;

    /// Modifier kind identifier (e.g. `SUBSURF`).
    fn kind(&self) -> &str;

    /// Current value of a property, if the object has it.
    fn get(&self, name: &str) -> Option<HostValue>;

    /// Assign a property. The host rejects writes that do not fit and
    /// returns the reason.
    fn set(&mut self, name: &str, value: HostValue) -> std::result::Result<(), String>;
}

fn len_check(expected: usize, got: usize) -> std::result::Result<(), String> {
    if expected == got {
        Ok(())
    } else {
        Err(format!("expected {expected} elements, got {got}"))
    }
}

fn check_assignable(current: &HostValue, incoming: &HostValue) -> std::result::Result<(), String> {
    match (current, incoming) {
        (HostValue::Bool(_), HostValue::Bool(_))
        | (HostValue::Int(_), HostValue::Int(_))
        | (HostValue::Float(_), HostValue::Float(_))
        | (HostValue::Str(_), HostValue::Str(_))
        | (HostValue::EnumSet(_), HostValue::EnumSet(_))
        | (HostValue::Items(_), HostValue::Items(_))
        | (HostValue::List(_), HostValue::List(_))
        | (HostValue::Map(_), HostValue::Map(_)) => Ok(()),
        (HostValue::BoolArray(a), HostValue::BoolArray(b)) => len_check(a.len(), b.len()),
        (HostValue::IntArray(a), HostValue::IntArray(b)) => len_check(a.len(), b.len()),
        (HostValue::FloatArray(a), HostValue::FloatArray(b)) => len_check(a.len(), b.len()),
        (HostValue::Vector(a), HostValue::Vector(b))
        | (HostValue::Vector(a), HostValue::FloatArray(b)) => len_check(a.len(), b.len()),
        (HostValue::None, HostValue::ObjectRef(_))
        | (HostValue::None, HostValue::CollectionRef(_))
        | (HostValue::None, HostValue::None)
        | (HostValue::ObjectRef(_), HostValue::ObjectRef(_))
        | (HostValue::ObjectRef(_), HostValue::None)
        | (HostValue::CollectionRef(_), HostValue::CollectionRef(_))
        | (HostValue::CollectionRef(_), HostValue::None) => Ok(()),
        (cur, new) => Err(format!(
            "cannot assign {} over {}",
            new.type_name(),
            cur.type_name()
        )),
    }
}

/// In-memory standard modifier.
#[derive(Debug, Clone)]
pub struct Modifier {
    name: String,
    kind: String,
    pub show_viewport: bool,
    pub show_render: bool,
    values: BTreeMap<String, HostValue>,
    read_only: BTreeSet<String>,
}

impl Modifier {
    /// Create an empty modifier carrying only identity.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            show_viewport: true,
            show_render: true,
            values: BTreeMap::new(),
            read_only: BTreeSet::new(),
        }
    }

    /// Materialize a modifier of a registered kind with every schema
    /// property at its zero value, as the host would on creation.
    pub fn with_defaults(
        name: impl Into<String>,
        kind: &str,
        registry: &SchemaRegistry,
    ) -> Result<Self> {
        let schema = registry
            .schema(kind)
            .ok_or_else(|| ModsetError::UnknownKind(kind.to_string()))?;
        let mut modifier = Modifier::new(name, kind);
        for descriptor in schema.properties() {
            modifier
                .values
                .insert(descriptor.name.clone(), HostValue::default_for(&descriptor.kind));
            if descriptor.read_only {
                modifier.read_only.insert(descriptor.name.clone());
            }
        }
        Ok(modifier)
    }

    /// Insert a property value directly, bypassing host checks. Intended
    /// for building fixtures and demos.
    pub fn insert(&mut self, name: impl Into<String>, value: HostValue) {
        self.values.insert(name.into(), value);
    }

    /// Mark a property as read-only on this instance.
    pub fn mark_read_only(&mut self, name: impl Into<String>) {
        self.read_only.insert(name.into());
    }
}

impl PropertyStore for Modifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn get(&self, name: &str) -> Option<HostValue> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: HostValue) -> std::result::Result<(), String> {
        if self.read_only.contains(name) {
            return Err("property is read-only".to_string());
        }
        let current = self
            .values
            .get(name)
            .ok_or_else(|| "no such property".to_string())?;
        check_assignable(current, &value)?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }
}

/// Where a node group was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeGroupRef {
    pub name: String,
    /// Asset file the group is linked from; `None` for file-local groups
    pub asset_path: Option<String>,
    /// Asset library holding the file; `None` for bundled essentials
    pub library: Option<String>,
}

impl NodeGroupRef {
    /// A group defined locally in the working file.
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset_path: None,
            library: None,
        }
    }

    /// A group linked from an asset file.
    pub fn asset(
        name: impl Into<String>,
        asset_path: impl Into<String>,
        library: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            asset_path: Some(asset_path.into()),
            library,
        }
    }
}

/// In-memory geometry-node modifier with a dynamic socket map.
///
/// Socket keys follow the host interface convention (`Input_*` or
/// `Socket_*`, with `*_use_attribute` / `*_attribute_name` companions).
/// Flipping viewport visibility makes the host recompute the modifier's
/// output; the instance counts those recomputations.
#[derive(Debug, Clone)]
pub struct NodesModifier {
    pub name: String,
    pub node_group: Option<NodeGroupRef>,
    sockets: BTreeMap<String, HostValue>,
    show_viewport: bool,
    refresh_count: u32,
}

impl NodesModifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_group: None,
            sockets: BTreeMap::new(),
            show_viewport: true,
            refresh_count: 0,
        }
    }

    /// Populate a socket directly, as the host does when instantiating the
    /// group's interface. Bypasses the write checks.
    pub fn insert_socket(&mut self, key: impl Into<String>, value: HostValue) {
        self.sockets.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.sockets.contains_key(key)
    }

    pub fn socket(&self, key: &str) -> Option<&HostValue> {
        self.sockets.get(key)
    }

    pub fn sockets(&self) -> impl Iterator<Item = (&String, &HostValue)> {
        self.sockets.iter()
    }

    /// Assign a socket value. Numeric sockets accept either numeric type;
    /// reference sockets accept a reference or the absence value; a string
    /// socket only accepts strings.
    pub fn set_socket(
        &mut self,
        key: &str,
        value: HostValue,
    ) -> std::result::Result<(), String> {
        let current = self
            .sockets
            .get(key)
            .ok_or_else(|| "no such socket".to_string())?;
        let stored = match (current, &value) {
            (HostValue::Float(_), HostValue::Int(i)) => HostValue::Float(*i as f64),
            (HostValue::Int(_), HostValue::Float(f)) => HostValue::Int(*f as i64),
            _ => {
                check_assignable(current, &value)?;
                value
            }
        };
        self.sockets.insert(key.to_string(), stored);
        Ok(())
    }

    pub fn show_viewport(&self) -> bool {
        self.show_viewport
    }

    /// Flip viewport visibility. Each transition recomputes the output.
    pub fn set_show_viewport(&mut self, on: bool) {
        if self.show_viewport != on {
            self.show_viewport = on;
            self.refresh_count += 1;
        }
    }

    /// How many times the host recomputed this modifier's output.
    pub fn refresh_count(&self) -> u32 {
        self.refresh_count
    }
}

/// Named entities known to the host scene.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    objects: BTreeSet<String>,
    collections: BTreeSet<String>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, name: impl Into<String>) {
        self.objects.insert(name.into());
    }

    pub fn add_collection(&mut self, name: impl Into<String>) {
        self.collections.insert(name.into());
    }

    pub fn has_object(&self, name: &str) -> bool {
        self.objects.contains(name)
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    #[test]
    fn test_with_defaults_materializes_schema() {
        let modifier =
            Modifier::with_defaults("Subdivision", "SUBSURF", SchemaRegistry::builtin()).unwrap();
        assert_eq!(modifier.kind(), "SUBSURF");
        assert_eq!(modifier.get("levels"), Some(HostValue::Int(0)));
        assert_eq!(modifier.get("use_creases"), Some(HostValue::Bool(false)));
        assert_eq!(modifier.get("no_such_prop"), None);
    }

    #[test]
    fn test_with_defaults_unknown_kind() {
        let err = Modifier::with_defaults("X", "WARP", SchemaRegistry::builtin()).unwrap_err();
        assert!(matches!(err, ModsetError::UnknownKind(_)));
    }

    #[test]
    fn test_set_rejects_unknown_and_read_only() {
        let mut modifier =
            Modifier::with_defaults("Decimate", "DECIMATE", SchemaRegistry::builtin()).unwrap();
        assert!(modifier.set("ghost_prop", HostValue::Int(1)).is_err());
        assert!(modifier.set("face_count", HostValue::Int(9)).is_err());
        assert!(modifier.set("iterations", HostValue::Int(3)).is_ok());
    }

    #[test]
    fn test_set_rejects_wrong_shape() {
        let mut modifier =
            Modifier::with_defaults("Array", "ARRAY", SchemaRegistry::builtin()).unwrap();
        let err = modifier
            .set("relative_offset_displace", HostValue::FloatArray(vec![1.0, 2.0]))
            .unwrap_err();
        assert_eq!(err, "expected 3 elements, got 2");
        assert!(modifier
            .set("relative_offset_displace", HostValue::FloatArray(vec![1.0, 2.0, 0.5]))
            .is_ok());
        assert!(modifier.set("count", HostValue::Str("five".into())).is_err());
    }

    #[test]
    fn test_set_reference_over_absence() {
        let mut modifier =
            Modifier::with_defaults("Cut", "BOOLEAN", SchemaRegistry::builtin()).unwrap();
        assert_eq!(modifier.get("collection"), Some(HostValue::None));
        assert!(modifier
            .set("collection", HostValue::CollectionRef("Cutters".into()))
            .is_ok());
        assert!(modifier.set("collection", HostValue::None).is_ok());
        assert!(modifier
            .set("collection", HostValue::Str("Cutters".into()))
            .is_err());
    }

    #[test]
    fn test_socket_write_rules() {
        let mut gn = NodesModifier::new("Scatter");
        gn.insert_socket("Input_2", HostValue::Float(1.0));
        gn.insert_socket("Input_3", HostValue::Int(4));
        gn.insert_socket("Input_4", HostValue::Str("".into()));
        gn.insert_socket("Input_5", HostValue::None);

        assert!(gn.set_socket("Input_2", HostValue::Int(3)).is_ok());
        assert_eq!(gn.socket("Input_2"), Some(&HostValue::Float(3.0)));

        assert!(gn.set_socket("Input_3", HostValue::Float(2.7)).is_ok());
        assert_eq!(gn.socket("Input_3"), Some(&HostValue::Int(2)));

        assert!(gn
            .set_socket("Input_4", HostValue::CollectionRef("Rocks".into()))
            .is_err());
        assert!(gn.set_socket("Input_4", HostValue::Str("Rocks".into())).is_ok());

        assert!(gn
            .set_socket("Input_5", HostValue::CollectionRef("Rocks".into()))
            .is_ok());
        assert!(gn.set_socket("Missing", HostValue::Int(1)).is_err());
    }

    #[test]
    fn test_viewport_toggle_counts_refreshes() {
        let mut gn = NodesModifier::new("Scatter");
        assert_eq!(gn.refresh_count(), 0);
        gn.set_show_viewport(true);
        assert_eq!(gn.refresh_count(), 0);
        gn.set_show_viewport(false);
        gn.set_show_viewport(true);
        assert_eq!(gn.refresh_count(), 2);
        assert!(gn.show_viewport());
    }

    #[test]
    fn test_entity_registry() {
        let mut entities = EntityRegistry::new();
        entities.add_object("Cube");
        entities.add_collection("Cutters");
        assert!(entities.has_object("Cube"));
        assert!(!entities.has_object("Cutters"));
        assert!(entities.has_collection("Cutters"));
    }
}
