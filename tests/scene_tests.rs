//! Scene Integration Tests
//!
//! Tests for:
//! - Hierarchy: add/remove, reparenting, refused cycles
//! - Weak parent edges
//! - Scene container: attach/detach, shared root, stats
//! - Node queries: traverse, find_by_name

use glam::Vec4;
use myth_tracker::resources::{Geometry, GeometryRef, Material, MaterialRef};
use myth_tracker::scene::{Composite, MaterialSlot, NodeKind, NodeRef, Scene, SceneStats};

fn mesh(name: &str) -> NodeRef {
    NodeRef::mesh(
        name,
        GeometryRef::new(Geometry::plane(1.0, 1.0)),
        MaterialRef::new(Material::basic(name, Vec4::ONE)),
    )
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn add_sets_parent_and_child() {
    let parent = NodeRef::group("Parent");
    let child = NodeRef::group("Child");

    assert!(parent.add(&child));
    assert_eq!(parent.child_count(), 1);
    assert!(child.parent().unwrap().ptr_eq(&parent));
}

#[test]
fn add_reparents_child() {
    let first = NodeRef::group("First");
    let second = NodeRef::group("Second");
    let child = NodeRef::group("Child");

    first.add(&child);
    second.add(&child);

    assert_eq!(first.child_count(), 0);
    assert_eq!(second.child_count(), 1);
    assert!(child.parent().unwrap().ptr_eq(&second));
}

#[test]
fn add_refuses_self_and_ancestors() {
    let root = NodeRef::group("Root");
    let child = NodeRef::group("Child");
    let grandchild = NodeRef::group("Grandchild");
    root.add(&child);
    child.add(&grandchild);

    assert!(!root.add(&root));
    assert!(!grandchild.add(&root));
    assert!(!child.add(&root));
    assert!(root.parent().is_none());
    assert!(root.is_ancestor_of(&grandchild));
    assert!(!grandchild.is_ancestor_of(&root));
}

#[test]
fn remove_only_affects_direct_children() {
    let root = NodeRef::group("Root");
    let child = NodeRef::group("Child");
    let stranger = NodeRef::group("Stranger");
    root.add(&child);

    assert!(!root.remove(&stranger));
    assert!(root.remove(&child));
    assert!(!root.remove(&child));
    assert!(child.parent().is_none());
}

#[test]
fn detach_without_parent_is_noop() {
    let orphan = NodeRef::group("Orphan");
    assert!(!orphan.detach());
    assert!(!orphan.remove_from_parent());
}

#[test]
fn parent_edge_is_weak() {
    let child = NodeRef::group("Child");
    {
        let parent = NodeRef::group("Parent");
        parent.add(&child);
        assert!(child.has_parent());
    }
    assert!(!child.has_parent());
    assert!(child.parent().is_none());
    assert!(!child.detach());
}

// ============================================================================
// Resource Slots
// ============================================================================

#[test]
fn material_slot_variants() {
    let m1 = MaterialRef::new(Material::new("M1"));
    let m2 = MaterialRef::new(Material::new("M2"));

    assert!(MaterialSlot::default().is_empty());
    assert_eq!(MaterialSlot::from(m1.clone()).len(), 1);
    assert_eq!(MaterialSlot::from(vec![m1.clone(), m2]).len(), 2);
    assert!(MaterialSlot::from(None::<MaterialRef>).is_empty());
    assert!(MaterialSlot::from(Some(m1.clone())).as_slice()[0].ptr_eq(&m1));
}

#[test]
fn node_slots_can_be_replaced() {
    let node = mesh("Mesh");
    node.set_geometry(None);
    node.set_material(MaterialSlot::Empty);

    assert!(node.geometry().is_none());
    assert!(node.materials().is_empty());
    assert_eq!(node.kind, NodeKind::Mesh);
}

// ============================================================================
// Scene Container
// ============================================================================

#[test]
fn scene_add_and_remove() {
    let scene = Scene::new();
    let asset = mesh("Asset");

    assert!(scene.is_empty());
    scene.add(&asset);
    assert_eq!(scene.len(), 1);
    assert!(scene.contains(&asset));

    assert!(scene.remove(&asset));
    assert!(scene.is_empty());
    assert!(!scene.contains(&asset));
}

#[test]
fn scene_contains_only_top_level_nodes() {
    let scene = Scene::new();
    let asset = NodeRef::group("Asset");
    let part = mesh("Part");
    asset.add(&part);
    scene.add(&asset);

    assert!(scene.contains(&asset));
    assert!(!scene.contains(&part));
}

#[test]
fn scene_clones_share_the_root() {
    let scene = Scene::new();
    let view = scene.clone();
    scene.add(&mesh("Asset"));

    assert_eq!(view.len(), 1);
    assert!(view.root().ptr_eq(scene.root()));
    assert_ne!(Scene::new().id, scene.id);
}

#[test]
fn scene_stats_count_nodes_by_kind() {
    let scene = Scene::new();
    let rig = NodeRef::group("Rig");
    let body = mesh("Body");
    let hidden = mesh("Hidden");
    hidden.set_visible(false);
    rig.add(&body);
    rig.add(&hidden);
    rig.add(&NodeRef::helper("Axes"));
    scene.add(&rig);

    assert_eq!(
        scene.stats(),
        SceneStats {
            nodes: 4,
            meshes: 2,
            visible_meshes: 1,
            helpers: 1,
        }
    );
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn traverse_is_pre_order() {
    let root = NodeRef::group("Root");
    let a = NodeRef::group("A");
    let b = NodeRef::group("B");
    root.add(&a);
    a.add(&NodeRef::group("A1"));
    root.add(&b);

    let mut names = Vec::new();
    root.traverse(&mut |node| names.push(node.name.clone()));
    assert_eq!(names, ["Root", "A", "A1", "B"]);
}

#[test]
fn find_by_name_searches_descendants() {
    let root = NodeRef::group("Root");
    let arm = NodeRef::group("Arm");
    let hand = mesh("Hand");
    root.add(&arm);
    arm.add(&hand);

    assert!(root.find_by_name("Hand").unwrap().ptr_eq(&hand));
    assert!(root.find_by_name("Foot").is_none());
}
