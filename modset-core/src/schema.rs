/*!
Property schemas for the supported modifier kinds.

The registry is populated once at startup from static tables; nothing is
discovered reflectively at capture time. Each descriptor carries the
property kind plus the flags the codec consults: `read_only` values are
never written, `transient` values are live-session state that is never
captured, and `options` lists the valid identifiers for enum-flag sets.
*/

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::value::{ArrayElem, ValueKind};

/// Identity and metadata keys that never round-trip.
pub const IDENTITY_KEYS: &[&str] = &["name", "type", "rna_type"];

/// Display and presentation toggles excluded from snapshots.
pub const EXCLUDED_FLAGS: &[&str] = &[
    "show_viewport",
    "show_render",
    "show_in_editmode",
    "show_on_cage",
    "is_active",
    "show_expanded",
    "use_pin_to_last",
    "use_apply_on_spline",
];

/// Whether a property name is excluded from capture and restore entirely.
pub fn is_excluded(name: &str) -> bool {
    IDENTITY_KEYS.contains(&name) || EXCLUDED_FLAGS.contains(&name)
}

/// Schema entry for a single modifier property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: ValueKind,
    pub read_only: bool,
    pub transient: bool,
    /// Valid option identifiers, populated for enum-flag properties
    pub options: Vec<String>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            read_only: false,
            transient: false,
            options: Vec::new(),
        }
    }

    /// Mark the property as read-only on the host object.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Mark the property as live-session state that must not be captured.
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Set the valid option identifiers for an enum-flag property.
    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// All property descriptors for one modifier kind.
#[derive(Debug, Clone, PartialEq)]
pub struct KindSchema {
    pub kind: String,
    properties: Vec<PropertyDescriptor>,
}

impl KindSchema {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            properties: Vec::new(),
        }
    }

    pub fn prop(mut self, descriptor: PropertyDescriptor) -> Self {
        self.properties.push(descriptor);
        self
    }

    pub fn descriptor(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|d| d.name == name)
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// The kind's designated collection-reference property, if it has one.
    pub fn collection_property(&self) -> Option<&PropertyDescriptor> {
        self.properties
            .iter()
            .find(|d| d.kind == ValueKind::Collection)
    }
}

/// Registry of kind schemas, keyed by the modifier kind identifier.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    kinds: HashMap<String, KindSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: KindSchema) {
        self.kinds.insert(schema.kind.clone(), schema);
    }

    pub fn schema(&self, kind: &str) -> Option<&KindSchema> {
        self.kinds.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    pub fn kind_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The registry of standard modifier kinds, built once.
    pub fn builtin() -> &'static SchemaRegistry {
        static BUILTIN: Lazy<SchemaRegistry> = Lazy::new(build_builtin);
        &BUILTIN
    }
}

fn float3() -> ValueKind {
    ValueKind::Array {
        elem: ArrayElem::Float,
        len: 3,
    }
}

fn bool3() -> ValueKind {
    ValueKind::Array {
        elem: ArrayElem::Bool,
        len: 3,
    }
}

fn float16() -> ValueKind {
    ValueKind::Array {
        elem: ArrayElem::Float,
        len: 16,
    }
}

fn build_builtin() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    registry.register(
        KindSchema::new("ARRAY")
            .prop(PropertyDescriptor::new("count", ValueKind::Int))
            .prop(PropertyDescriptor::new("fit_type", ValueKind::Str))
            .prop(PropertyDescriptor::new("fit_length", ValueKind::Float))
            .prop(PropertyDescriptor::new("use_relative_offset", ValueKind::Bool))
            .prop(PropertyDescriptor::new("relative_offset_displace", float3()))
            .prop(PropertyDescriptor::new("use_constant_offset", ValueKind::Bool))
            .prop(PropertyDescriptor::new("constant_offset_displace", float3()))
            .prop(PropertyDescriptor::new("use_object_offset", ValueKind::Bool))
            .prop(PropertyDescriptor::new("offset_object", ValueKind::Object))
            .prop(PropertyDescriptor::new("use_merge_vertices", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_merge_vertices_cap", ValueKind::Bool))
            .prop(PropertyDescriptor::new("merge_threshold", ValueKind::Float))
            .prop(PropertyDescriptor::new("start_cap", ValueKind::Object))
            .prop(PropertyDescriptor::new("end_cap", ValueKind::Object)),
    );

    registry.register(
        KindSchema::new("BEVEL")
            .prop(PropertyDescriptor::new("width", ValueKind::Float))
            .prop(PropertyDescriptor::new("segments", ValueKind::Int))
            .prop(PropertyDescriptor::new("affect", ValueKind::Str))
            .prop(PropertyDescriptor::new("offset_type", ValueKind::Str))
            .prop(PropertyDescriptor::new("limit_method", ValueKind::Str))
            .prop(PropertyDescriptor::new("angle_limit", ValueKind::Float))
            .prop(PropertyDescriptor::new("profile", ValueKind::Float))
            .prop(PropertyDescriptor::new("use_clamp_overlap", ValueKind::Bool))
            .prop(PropertyDescriptor::new("loop_slide", ValueKind::Bool))
            .prop(PropertyDescriptor::new("mark_seam", ValueKind::Bool))
            .prop(PropertyDescriptor::new("mark_sharp", ValueKind::Bool))
            .prop(PropertyDescriptor::new("harden_normals", ValueKind::Bool))
            .prop(PropertyDescriptor::new("miter_outer", ValueKind::Str))
            .prop(PropertyDescriptor::new("miter_inner", ValueKind::Str))
            .prop(PropertyDescriptor::new("material", ValueKind::Int)),
    );

    registry.register(
        KindSchema::new("BOOLEAN")
            .prop(PropertyDescriptor::new("operation", ValueKind::Str))
            .prop(PropertyDescriptor::new("operand_type", ValueKind::Str))
            .prop(PropertyDescriptor::new("object", ValueKind::Object))
            .prop(PropertyDescriptor::new("collection", ValueKind::Collection))
            .prop(PropertyDescriptor::new("solver", ValueKind::Str))
            .prop(PropertyDescriptor::new("double_threshold", ValueKind::Float))
            .prop(PropertyDescriptor::new("use_self", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_hole_tolerant", ValueKind::Bool)),
    );

    registry.register(
        KindSchema::new("DATA_TRANSFER")
            .prop(PropertyDescriptor::new("object", ValueKind::Object))
            .prop(PropertyDescriptor::new("use_vert_data", ValueKind::Bool))
            .prop(
                PropertyDescriptor::new("data_types_verts", ValueKind::EnumFlags)
                    .with_options(&["VGROUP_WEIGHTS", "BEVEL_WEIGHT_VERT", "COLOR_VERTEX"]),
            )
            .prop(PropertyDescriptor::new("use_loop_data", ValueKind::Bool))
            .prop(
                PropertyDescriptor::new("data_types_loops", ValueKind::EnumFlags)
                    .with_options(&["CUSTOM_NORMAL", "COLOR_CORNER", "UV"]),
            )
            .prop(PropertyDescriptor::new("mix_mode", ValueKind::Str))
            .prop(PropertyDescriptor::new("mix_factor", ValueKind::Float))
            .prop(PropertyDescriptor::new("use_object_transform", ValueKind::Bool)),
    );

    registry.register(
        KindSchema::new("DECIMATE")
            .prop(PropertyDescriptor::new("decimate_type", ValueKind::Str))
            .prop(PropertyDescriptor::new("ratio", ValueKind::Float))
            .prop(PropertyDescriptor::new("iterations", ValueKind::Int))
            .prop(PropertyDescriptor::new("angle_limit", ValueKind::Float))
            .prop(PropertyDescriptor::new("use_collapse_triangulate", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_symmetry", ValueKind::Bool))
            .prop(PropertyDescriptor::new("symmetry_axis", ValueKind::Str))
            .prop(PropertyDescriptor::new("face_count", ValueKind::Int).read_only()),
    );

    registry.register(
        KindSchema::new("HOOK")
            .prop(PropertyDescriptor::new("object", ValueKind::Object))
            .prop(PropertyDescriptor::new("subtarget", ValueKind::Str))
            .prop(PropertyDescriptor::new("strength", ValueKind::Float))
            .prop(PropertyDescriptor::new("falloff_type", ValueKind::Str))
            .prop(PropertyDescriptor::new("falloff_radius", ValueKind::Float))
            .prop(PropertyDescriptor::new("use_falloff_uniform", ValueKind::Bool))
            .prop(PropertyDescriptor::new("matrix_inverse", float16()).transient())
            .prop(PropertyDescriptor::new("matrix", float16()).transient())
            .prop(PropertyDescriptor::new("center", float3()).transient()),
    );

    registry.register(
        KindSchema::new("MESH_SEQUENCE_CACHE")
            .prop(PropertyDescriptor::new("cache_file", ValueKind::Object))
            .prop(PropertyDescriptor::new("object_path", ValueKind::Str))
            .prop(PropertyDescriptor::new("object_paths", ValueKind::ItemList))
            .prop(
                PropertyDescriptor::new("read_data", ValueKind::EnumFlags)
                    .with_options(&["VERT", "POLY", "UV", "COLOR"]),
            )
            .prop(PropertyDescriptor::new("use_vertex_interpolation", ValueKind::Bool))
            .prop(PropertyDescriptor::new("velocity_scale", ValueKind::Float)),
    );

    registry.register(
        KindSchema::new("MIRROR")
            .prop(PropertyDescriptor::new("use_axis", bool3()))
            .prop(PropertyDescriptor::new("use_bisect_axis", bool3()))
            .prop(PropertyDescriptor::new("use_bisect_flip_axis", bool3()))
            .prop(PropertyDescriptor::new("mirror_object", ValueKind::Object))
            .prop(PropertyDescriptor::new("use_clip", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_mirror_merge", ValueKind::Bool))
            .prop(PropertyDescriptor::new("merge_threshold", ValueKind::Float))
            .prop(PropertyDescriptor::new("use_mirror_u", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_mirror_v", ValueKind::Bool))
            .prop(PropertyDescriptor::new("mirror_offset_u", ValueKind::Float))
            .prop(PropertyDescriptor::new("mirror_offset_v", ValueKind::Float)),
    );

    registry.register(
        KindSchema::new("SCREW")
            .prop(PropertyDescriptor::new("angle", ValueKind::Float))
            .prop(PropertyDescriptor::new("screw_offset", ValueKind::Float))
            .prop(PropertyDescriptor::new("iterations", ValueKind::Int))
            .prop(PropertyDescriptor::new("axis", ValueKind::Str))
            .prop(PropertyDescriptor::new("object", ValueKind::Object))
            .prop(PropertyDescriptor::new("steps", ValueKind::Int))
            .prop(PropertyDescriptor::new("render_steps", ValueKind::Int))
            .prop(PropertyDescriptor::new("use_smooth_shade", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_merge_vertices", ValueKind::Bool))
            .prop(PropertyDescriptor::new("merge_threshold", ValueKind::Float))
            .prop(PropertyDescriptor::new("use_normal_calculate", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_normal_flip", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_object_screw_offset", ValueKind::Bool)),
    );

    registry.register(
        KindSchema::new("SOLIDIFY")
            .prop(PropertyDescriptor::new("solidify_mode", ValueKind::Str))
            .prop(PropertyDescriptor::new("thickness", ValueKind::Float))
            .prop(PropertyDescriptor::new("offset", ValueKind::Float))
            .prop(PropertyDescriptor::new("use_even_offset", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_rim", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_rim_only", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_quality_normals", ValueKind::Bool))
            .prop(PropertyDescriptor::new("material_offset", ValueKind::Int))
            .prop(PropertyDescriptor::new("material_offset_rim", ValueKind::Int))
            .prop(PropertyDescriptor::new("edge_crease_inner", ValueKind::Float))
            .prop(PropertyDescriptor::new("edge_crease_outer", ValueKind::Float))
            .prop(PropertyDescriptor::new("edge_crease_rim", ValueKind::Float))
            .prop(PropertyDescriptor::new("thickness_clamp", ValueKind::Float))
            .prop(PropertyDescriptor::new("shell_vertex_group", ValueKind::Str))
            .prop(PropertyDescriptor::new("rim_vertex_group", ValueKind::Str)),
    );

    registry.register(
        KindSchema::new("SUBSURF")
            .prop(PropertyDescriptor::new("levels", ValueKind::Int))
            .prop(PropertyDescriptor::new("render_levels", ValueKind::Int))
            .prop(PropertyDescriptor::new("subdivision_type", ValueKind::Str))
            .prop(PropertyDescriptor::new("quality", ValueKind::Int))
            .prop(PropertyDescriptor::new("use_limit_surface", ValueKind::Bool))
            .prop(PropertyDescriptor::new("use_creases", ValueKind::Bool))
            .prop(PropertyDescriptor::new("show_only_control_edges", ValueKind::Bool))
            .prop(PropertyDescriptor::new("uv_smooth", ValueKind::Str))
            .prop(PropertyDescriptor::new("boundary_smooth", ValueKind::Str)),
    );

    registry.register(
        KindSchema::new("TRIANGULATE")
            .prop(PropertyDescriptor::new("quad_method", ValueKind::Str))
            .prop(PropertyDescriptor::new("ngon_method", ValueKind::Str))
            .prop(PropertyDescriptor::new("min_vertices", ValueKind::Int))
            .prop(PropertyDescriptor::new("keep_custom_normals", ValueKind::Bool)),
    );

    registry.register(
        KindSchema::new("WELD")
            .prop(PropertyDescriptor::new("mode", ValueKind::Str))
            .prop(PropertyDescriptor::new("merge_threshold", ValueKind::Float))
            .prop(PropertyDescriptor::new("loose_edges", ValueKind::Bool))
            .prop(PropertyDescriptor::new("vertex_group", ValueKind::Str))
            .prop(PropertyDescriptor::new("invert_vertex_group", ValueKind::Bool)),
    );

    registry
}
