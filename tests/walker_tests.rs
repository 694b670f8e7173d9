//! Resource Walker Integration Tests
//!
//! Tests for:
//! - enumerate: reachability, deduplication, visiting order of the root
//! - Capabilities: classification of nodes, materials and leaves
//! - Custom visitors: pruning by returning `false`

use glam::Vec4;
use myth_tracker::resources::{
    Geometry, GeometryRef, Material, MaterialRef, ResourceKind, Texture, TextureRef,
};
use myth_tracker::scene::{NodeRef, Scene};
use myth_tracker::tracker::{Capabilities, Resource, ResourceVisitor, Walk, enumerate};

fn texture(name: &str) -> TextureRef {
    TextureRef::new(Texture::solid(name, 1, 1, [0, 0, 0, 255]))
}

fn count_kind(resources: &[Resource], kind: ResourceKind) -> usize {
    resources.iter().filter(|r| r.kind() == kind).count()
}

/// Records labels; reports materials as already known.
#[derive(Default)]
struct SkipMaterials {
    labels: Vec<String>,
}

impl ResourceVisitor for SkipMaterials {
    fn visit(&mut self, resource: &Resource) -> bool {
        self.labels.push(resource.label().to_string());
        resource.kind() != ResourceKind::Material
    }
}

// ============================================================================
// Enumerate
// ============================================================================

#[test]
fn enumerate_visits_root_first() {
    let root = NodeRef::group("Root");
    root.add(&NodeRef::group("Child"));

    let found = enumerate(&root);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id(), root.id());
}

#[test]
fn enumerate_includes_non_disposable_groups() {
    let root = NodeRef::group("Root");
    let inner = NodeRef::group("Inner");
    root.add(&inner);

    let found = enumerate(&root);
    assert_eq!(count_kind(&found, ResourceKind::Node), 2);
    assert!(found.iter().all(|r| r.as_disposable().is_none()));
}

#[test]
fn enumerate_deduplicates_shared_material() {
    let t = texture("Shared");
    let material = MaterialRef::new(Material::basic("Shared", Vec4::ONE).with_map("map", t));
    let root = NodeRef::group("Root");
    for i in 0..5 {
        root.add(&NodeRef::mesh(
            &format!("Mesh{i}"),
            GeometryRef::new(Geometry::plane(1.0, 1.0)),
            material.clone(),
        ));
    }

    let found = enumerate(&root);
    assert_eq!(count_kind(&found, ResourceKind::Node), 6);
    assert_eq!(count_kind(&found, ResourceKind::Geometry), 5);
    assert_eq!(count_kind(&found, ResourceKind::Material), 1);
    assert_eq!(count_kind(&found, ResourceKind::Texture), 1);
}

#[test]
fn enumerate_shared_geometry_once() {
    let geometry = GeometryRef::new(Geometry::cube(1.0));
    let material = MaterialRef::new(Material::basic("M", Vec4::ONE));
    let meshes = vec![
        NodeRef::mesh("A", geometry.clone(), material.clone()),
        NodeRef::mesh("B", geometry.clone(), material.clone()),
    ];

    let found = enumerate(&meshes);
    assert_eq!(count_kind(&found, ResourceKind::Geometry), 1);
    assert_eq!(found.len(), 4);
}

#[test]
fn enumerate_scene_includes_attached_assets() {
    let scene = Scene::new();
    let asset = NodeRef::mesh(
        "Asset",
        GeometryRef::new(Geometry::plane(2.0, 2.0)),
        MaterialRef::new(Material::basic("M", Vec4::ONE)),
    );
    scene.add(&asset);

    let found = enumerate(&scene);
    // Scene root, asset, geometry, material
    assert_eq!(found.len(), 4);
    assert_eq!(found[0].id(), scene.root().id());
}

#[test]
fn enumerate_does_not_mutate_anything() {
    let t = texture("Untouched");
    let _ = enumerate(&t);
    assert!(t.has_data());
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn capabilities_classify_resources() {
    let group = Resource::from(NodeRef::group("Group"));
    let helper = Resource::from(NodeRef::helper("Helper"));
    let material = Resource::from(MaterialRef::new(Material::new("Material")));
    let leaf = Resource::from(texture("Leaf"));

    assert_eq!(group.capabilities(), Capabilities::COMPOSITE);
    assert_eq!(
        helper.capabilities(),
        Capabilities::COMPOSITE | Capabilities::DISPOSABLE
    );
    assert_eq!(
        material.capabilities(),
        Capabilities::DISPOSABLE | Capabilities::MATERIAL
    );
    assert_eq!(leaf.capabilities(), Capabilities::DISPOSABLE);

    assert!(group.as_composite().is_some());
    assert!(group.as_disposable().is_none());
    assert!(helper.as_disposable().is_some());
    assert!(material.as_material().is_some());
    assert!(leaf.as_composite().is_none());
}

#[test]
fn resource_ids_follow_identity() {
    let a = texture("Same");
    let b = texture("Same");
    assert_eq!(Resource::from(a.clone()).id(), a.id());
    assert_ne!(a.id(), b.id());
}

// ============================================================================
// Custom Visitors
// ============================================================================

#[test]
fn visitor_returning_false_prunes_descent() {
    let hidden = texture("Hidden");
    let material = MaterialRef::new(Material::basic("Opaque", Vec4::ONE).with_map("map", hidden));
    let node = NodeRef::mesh("Mesh", GeometryRef::new(Geometry::cube(1.0)), material);

    let mut visitor = SkipMaterials::default();
    node.walk(&mut visitor);

    assert!(visitor.labels.contains(&"Opaque".to_string()));
    assert!(!visitor.labels.contains(&"Hidden".to_string()));
}
