//! Prefab & Library Integration Tests
//!
//! Tests for:
//! - Prefab instantiation: fresh graphs, local vs shared textures, multi-root wrapping
//! - Prefab validation errors
//! - PrefabLibrary: insert/replace/remove, Loader implementation
//! - Release listeners wired through instantiation

use glam::Vec4;
use myth_tracker::assets::{
    Loader, Prefab, PrefabGeometry, PrefabLibrary, PrefabMaterial, PrefabNode, PrefabTexture,
    PrefabValue, TextureSource,
};
use myth_tracker::errors::Error;
use myth_tracker::resources::{MaterialValue, ResourceKind, Texture, TextureRef, release_channel};
use myth_tracker::scene::{Composite, NodeKind};
use myth_tracker::tracker::{ResourceTracker, enumerate};

/// Two meshes whose materials both sample the same local texture.
fn twin_prefab() -> Prefab {
    let mut prefab = Prefab::new("Twins");
    let skin = prefab.add_texture(PrefabTexture::new("Skin", 4, 4, [200, 150, 120, 255]));
    let left = prefab.add_material(
        PrefabMaterial::basic("Left", Vec4::ONE).with_property("map", PrefabValue::Texture(skin)),
    );
    let right = prefab.add_material(
        PrefabMaterial::basic("Right", Vec4::ONE).with_property("map", PrefabValue::Texture(skin)),
    );
    let a = prefab.add_node(PrefabNode::mesh("A", PrefabGeometry::Cube { size: 1.0 }, vec![left]));
    let b = prefab.add_node(PrefabNode::mesh("B", PrefabGeometry::Cube { size: 1.0 }, vec![right]));
    let root = prefab.add_node(PrefabNode::group("Twins").with_children([a, b]));
    prefab.add_root(root);
    prefab
}

fn single_node_prefab(name: &str) -> Prefab {
    let mut prefab = Prefab::new(name);
    let root = prefab.add_node(PrefabNode::group(name));
    prefab.add_root(root);
    prefab
}

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn instantiate_builds_fresh_graphs() {
    let prefab = twin_prefab();
    let first = prefab.instantiate().unwrap();
    let second = prefab.instantiate().unwrap();

    assert!(!first.ptr_eq(&second));
    assert_eq!(first.name, "Twins");
    assert_eq!(first.child_count(), 2);

    let first_ids: Vec<_> = enumerate(&first).iter().map(|r| r.id()).collect();
    let second_ids: Vec<_> = enumerate(&second).iter().map(|r| r.id()).collect();
    assert!(first_ids.iter().all(|id| !second_ids.contains(id)));
}

#[test]
fn local_texture_is_shared_within_one_instance() {
    let root = twin_prefab().instantiate().unwrap();
    let found = enumerate(&root);

    let textures = found
        .iter()
        .filter(|r| r.kind() == ResourceKind::Texture)
        .count();
    assert_eq!(textures, 1);
    // Root, A, B, two geometries, two materials, one texture
    assert_eq!(found.len(), 8);
}

#[test]
fn shared_textures_are_reused_across_instances() {
    let atlas = TextureRef::new(Texture::solid("Atlas", 8, 8, [255; 4]));
    let mut prefab = Prefab::new("Shared");
    let source = prefab.share_texture(atlas.clone());
    assert_eq!(source, TextureSource::Shared(0));
    let material = prefab.add_material(
        PrefabMaterial::basic("M", Vec4::ONE).with_property("map", PrefabValue::Texture(source)),
    );
    let mesh = prefab.add_node(PrefabNode::mesh(
        "Mesh",
        PrefabGeometry::Plane {
            width: 1.0,
            height: 1.0,
        },
        vec![material],
    ));
    prefab.add_root(mesh);

    for _ in 0..2 {
        let root = prefab.instantiate().unwrap();
        let material = root.materials().as_slice()[0].clone();
        let map = material.property("map").unwrap();
        assert!(matches!(map, MaterialValue::Texture(t) if t.ptr_eq(&atlas)));
    }

    let library = PrefabLibrary::new();
    library.insert("shared.prefab", prefab);
    let asset = pollster::block_on(library.load("shared.prefab")).unwrap();
    assert_eq!(asset.retained.len(), 1);
    assert!(asset.retained[0].ptr_eq(&atlas));
}

#[test]
fn shader_material_gets_uniform_textures() {
    let mut prefab = Prefab::new("Atlas");
    let layers: Vec<_> = (0..3)
        .map(|i| prefab.add_texture(PrefabTexture::new(&format!("L{i}"), 2, 2, [0; 4])))
        .collect();
    let material = prefab.add_material(
        PrefabMaterial::shader("AtlasShader")
            .with_uniform("layers", PrefabValue::TextureArray(layers))
            .with_uniform("opacity", PrefabValue::Float(0.5)),
    );
    let mesh = prefab.add_node(PrefabNode::mesh(
        "Quad",
        PrefabGeometry::Plane {
            width: 1.0,
            height: 1.0,
        },
        vec![material],
    ));
    prefab.add_root(mesh);

    let root = prefab.instantiate().unwrap();
    let material = root.materials().as_slice()[0].clone();
    assert!(material.has_uniforms());
    assert_eq!(material.uniform("layers").unwrap().value.textures().len(), 3);
    // Quad, geometry, material, three layers
    assert_eq!(enumerate(&root).len(), 6);
}

#[test]
fn multiple_roots_are_wrapped_in_a_group() {
    let mut prefab = Prefab::new("Pair");
    let a = prefab.add_node(PrefabNode::group("A"));
    let b = prefab.add_node(PrefabNode::helper("B"));
    prefab.add_root(a);
    prefab.add_root(b);

    let root = prefab.instantiate().unwrap();
    assert_eq!(root.name, "Pair");
    assert_eq!(root.kind, NodeKind::Group);
    assert_eq!(root.child_count(), 2);
    assert_eq!(root.find_by_name("B").unwrap().kind, NodeKind::Helper);
}

#[test]
fn unnamed_nodes_get_index_names() {
    let mut prefab = Prefab::new("Anon");
    let root = prefab.add_node(PrefabNode::default());
    prefab.add_root(root);
    assert_eq!(prefab.instantiate().unwrap().name, "Node0");
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn prefab_without_roots_is_invalid() {
    let mut prefab = Prefab::new("Empty");
    prefab.add_node(PrefabNode::group("Lonely"));
    assert!(matches!(prefab.instantiate(), Err(Error::InvalidPrefab { .. })));
}

#[test]
fn child_index_out_of_bounds() {
    let mut prefab = Prefab::new("Broken");
    let root = prefab.add_node(PrefabNode::group("Root").with_children([7]));
    prefab.add_root(root);
    assert!(matches!(
        prefab.instantiate(),
        Err(Error::AssetIndexOutOfBounds { index: 7, .. })
    ));
}

#[test]
fn material_index_out_of_bounds() {
    let mut prefab = Prefab::new("Broken");
    let root = prefab.add_node(PrefabNode::mesh("Mesh", PrefabGeometry::Cube { size: 1.0 }, vec![3]));
    prefab.add_root(root);
    assert!(matches!(
        prefab.instantiate(),
        Err(Error::AssetIndexOutOfBounds { index: 3, .. })
    ));
}

#[test]
fn node_with_two_parents_is_invalid() {
    let mut prefab = Prefab::new("Diamond");
    let shared = prefab.add_node(PrefabNode::group("Shared"));
    let a = prefab.add_node(PrefabNode::group("A").with_children([shared]));
    let b = prefab.add_node(PrefabNode::group("B").with_children([shared]));
    let root = prefab.add_node(PrefabNode::group("Root").with_children([a, b]));
    prefab.add_root(root);
    assert!(matches!(prefab.instantiate(), Err(Error::InvalidPrefab { .. })));
}

#[test]
fn cyclic_hierarchy_is_invalid() {
    let mut prefab = Prefab::new("Loop");
    prefab.add_node(PrefabNode::group("A").with_children([1]));
    prefab.add_node(PrefabNode::group("B").with_children([0]));
    prefab.add_root(0);
    assert!(matches!(prefab.instantiate(), Err(Error::InvalidPrefab { .. })));
}

#[test]
fn root_that_is_also_a_child_is_invalid() {
    let mut prefab = Prefab::new("Tangled");
    let child = prefab.add_node(PrefabNode::group("Child"));
    let root = prefab.add_node(PrefabNode::group("Root").with_children([child]));
    prefab.add_root(root);
    prefab.add_root(child);
    assert!(matches!(prefab.instantiate(), Err(Error::InvalidPrefab { .. })));
}

#[test]
fn texture_array_property_is_invalid() {
    let mut prefab = Prefab::new("BadMaterial");
    let t = prefab.add_texture(PrefabTexture::new("T", 1, 1, [0; 4]));
    let material = prefab.add_material(
        PrefabMaterial::basic("M", Vec4::ONE).with_property("maps", PrefabValue::TextureArray(vec![t])),
    );
    let root = prefab.add_node(PrefabNode::mesh("Mesh", PrefabGeometry::Cube { size: 1.0 }, vec![material]));
    prefab.add_root(root);
    assert!(matches!(prefab.instantiate(), Err(Error::InvalidPrefab { .. })));
}

// ============================================================================
// Library
// ============================================================================

#[test]
fn library_insert_get_remove() {
    let library = PrefabLibrary::new();
    assert!(library.is_empty());

    let handle = library.insert("a.prefab", single_node_prefab("A"));
    assert_eq!(library.handle("a.prefab"), Some(handle));
    assert_eq!(library.get(handle).unwrap().name, "A");
    assert_eq!(library.len(), 1);

    library.insert("a.prefab", single_node_prefab("A2"));
    assert_eq!(library.len(), 1);
    assert!(library.get(handle).is_none());
    assert_eq!(library.get_by_url("a.prefab").unwrap().name, "A2");

    assert!(library.remove("a.prefab").is_some());
    assert!(library.remove("a.prefab").is_none());
    assert!(library.is_empty());
}

#[test]
fn library_loads_fresh_instances() {
    let library = PrefabLibrary::new();
    let mut prefab = twin_prefab();
    prefab.animations.push("Wave".to_string());
    library.insert("twins.prefab", prefab);

    let first = pollster::block_on(library.load("twins.prefab")).unwrap();
    let second = pollster::block_on(library.load("twins.prefab")).unwrap();

    assert_eq!(first.url, "twins.prefab");
    assert_eq!(first.animations, ["Wave"]);
    assert!(!first.scene.ptr_eq(&second.scene));
}

#[test]
fn library_reports_missing_assets() {
    let library = PrefabLibrary::new();
    let result = pollster::block_on(library.load("missing.prefab"));
    assert!(matches!(result, Err(Error::AssetNotFound(url)) if url == "missing.prefab"));
}

#[test]
fn library_propagates_prefab_errors() {
    let library = PrefabLibrary::new();
    library.insert("empty.prefab", Prefab::new("Empty"));
    let result = pollster::block_on(library.load("empty.prefab"));
    assert!(matches!(result, Err(Error::InvalidPrefab { .. })));
}

#[test]
fn library_listener_sees_every_release() {
    let (tx, rx) = release_channel();
    let library = PrefabLibrary::new().with_release_listener(tx);
    library.insert("twins.prefab", twin_prefab());

    let asset = pollster::block_on(library.load("twins.prefab")).unwrap();
    let mut tracker = ResourceTracker::new();
    tracker.track(&asset.scene);
    tracker.dispose_all();

    // One texture, two materials, two geometries; group and meshes are not releasable
    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(events.len(), 5);
    assert_eq!(
        events.iter().filter(|e| e.kind == ResourceKind::Texture).count(),
        1
    );
}
