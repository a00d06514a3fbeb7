/*!
Modifier-kind to UI icon mapping.
*/

/// Icon identifier for node-group presets.
pub const GEOMETRY_NODES_ICON: &str = "GEOMETRY_NODES";

/// UI icon identifier for a modifier kind. Unknown kinds map to the empty
/// string and the UI falls back to its generic icon.
pub fn icon_for(kind: &str) -> &'static str {
    match kind {
        "DATA_TRANSFER" => "MOD_DATA_TRANSFER",
        "MESH_CACHE" => "MOD_MESHDEFORM",
        "MESH_SEQUENCE_CACHE" => "MOD_MESHDEFORM",
        "NORMAL_EDIT" => "MOD_NORMALEDIT",
        "WEIGHTED_NORMAL" => "MOD_NORMALEDIT",
        "UV_PROJECT" => "MOD_UVPROJECT",
        "UV_WARP" => "MOD_UVPROJECT",
        "VERTEX_WEIGHT_EDIT" => "MOD_VERTEX_WEIGHT",
        "VERTEX_WEIGHT_MIX" => "MOD_VERTEX_WEIGHT",
        "VERTEX_WEIGHT_PROXIMITY" => "MOD_VERTEX_WEIGHT",
        "ARRAY" => "MOD_ARRAY",
        "BEVEL" => "MOD_BEVEL",
        "BOOLEAN" => "MOD_BOOLEAN",
        "BUILD" => "MOD_BUILD",
        "DECIMATE" => "MOD_DECIM",
        "EDGE_SPLIT" => "MOD_EDGESPLIT",
        "NODES" => GEOMETRY_NODES_ICON,
        "MASK" => "MOD_MASK",
        "MIRROR" => "MOD_MIRROR",
        "MESH_TO_VOLUME" => "VOLUME_DATA",
        "MULTIRES" => "MOD_MULTIRES",
        "REMESH" => "MOD_REMESH",
        "SCREW" => "MOD_SCREW",
        "SKIN" => "MOD_SKIN",
        "SOLIDIFY" => "MOD_SOLIDIFY",
        "SUBSURF" => "MOD_SUBSURF",
        "TRIANGULATE" => "MOD_TRIANGULATE",
        "VOLUME_TO_MESH" => "VOLUME_DATA",
        "WELD" => "AUTOMERGE_OFF",
        "WIREFRAME" => "MOD_WIREFRAME",
        "ARMATURE" => "MOD_ARMATURE",
        "CAST" => "MOD_CAST",
        "CURVE" => "MOD_CURVE",
        "DISPLACE" => "MOD_DISPLACE",
        "HOOK" => "HOOK",
        "LAPLACIANDEFORM" => "MOD_MESHDEFORM",
        "LATTICE" => "MOD_LATTICE",
        "MESH_DEFORM" => "MOD_MESHDEFORM",
        "SHRINKWRAP" => "MOD_SHRINKWRAP",
        "SIMPLE_DEFORM" => "MOD_SIMPLEDEFORM",
        "SMOOTH" => "MOD_SMOOTH",
        "CORRECTIVE_SMOOTH" => "MOD_SMOOTH",
        "LAPLACIANSMOOTH" => "MOD_SMOOTH",
        "SURFACE_DEFORM" => "MOD_MESHDEFORM",
        "WARP" => "MOD_WARP",
        "WAVE" => "MOD_WAVE",
        "VOLUME_DISPLACE" => "VOLUME_DATA",
        "CLOTH" => "MOD_CLOTH",
        "COLLISION" => "MOD_PHYSICS",
        "DYNAMIC_PAINT" => "MOD_DYNAMICPAINT",
        "EXPLODE" => "MOD_EXPLODE",
        "FLUID" => "MOD_FLUIDSIM",
        "OCEAN" => "MOD_OCEAN",
        "PARTICLE_INSTANCE" => "MOD_PARTICLE_INSTANCE",
        "PARTICLE_SYSTEM" => "MOD_PARTICLES",
        "SOFT_BODY" => "MOD_SOFT",
        "SURFACE" => "OUTLINER_OB_SURFACE",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds() {
        assert_eq!(icon_for("SUBSURF"), "MOD_SUBSURF");
        assert_eq!(icon_for("WELD"), "AUTOMERGE_OFF");
        assert_eq!(icon_for("NODES"), GEOMETRY_NODES_ICON);
    }

    #[test]
    fn test_unknown_kind_is_empty() {
        assert_eq!(icon_for("NOT_A_MODIFIER"), "");
    }
}
