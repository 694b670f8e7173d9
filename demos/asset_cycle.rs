//! Asset Cycle Demo
//!
//! Loads three in-memory prefabs in turn, keeps each on display for a
//! while, then disposes it. A second task stands in for the renderer: it
//! samples the live scene every frame and drains release notifications.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example asset_cycle
//! cargo run --example asset_cycle -- '{"assets":["atlas.prefab"],"hold_ms":300,"max_cycles":2}'
//! ```

use std::time::Duration;

use glam::Vec4;
use myth_tracker::assets::{PrefabGeometry, PrefabMaterial, PrefabNode, PrefabTexture, PrefabValue};
use myth_tracker::resources::{ReleaseReceiver, release_channel};
use myth_tracker::{AssetCycle, CycleSettings, Prefab, PrefabLibrary, Scene, cancel_pair};

/// A textured cube.
fn crate_prefab() -> Prefab {
    let mut prefab = Prefab::new("Crate");
    let diffuse = prefab.add_texture(PrefabTexture::new("CrateDiffuse", 64, 64, [160, 110, 60, 255]));
    let normal = prefab.add_texture(PrefabTexture::new("CrateNormal", 64, 64, [128, 128, 255, 255]));
    let material = prefab.add_material(
        PrefabMaterial::basic("CrateMaterial", Vec4::ONE)
            .with_property("map", PrefabValue::Texture(diffuse))
            .with_property("normalMap", PrefabValue::Texture(normal)),
    );
    let mesh = prefab.add_node(PrefabNode::mesh(
        "CrateMesh",
        PrefabGeometry::Cube { size: 1.0 },
        vec![material],
    ));
    prefab.add_root(mesh);
    prefab
}

/// Two quads sharing a shader material that samples a texture array.
fn atlas_prefab() -> Prefab {
    let mut prefab = Prefab::new("Atlas");
    let layers: Vec<_> = (0..4u8)
        .map(|i| {
            prefab.add_texture(PrefabTexture::new(
                &format!("AtlasLayer{i}"),
                32,
                32,
                [i * 60, 0, 255 - i * 60, 255],
            ))
        })
        .collect();
    let material = prefab.add_material(
        PrefabMaterial::shader("AtlasShader")
            .with_uniform("layers", PrefabValue::TextureArray(layers.clone()))
            .with_uniform("cover", PrefabValue::Texture(layers[0]))
            .with_uniform("opacity", PrefabValue::Float(0.8)),
    );

    let quad = PrefabGeometry::Plane {
        width: 1.0,
        height: 1.0,
    };
    let left = prefab.add_node(PrefabNode::mesh("Left", quad.clone(), vec![material]));
    let right = prefab.add_node(PrefabNode::mesh("Right", quad, vec![material]));
    prefab.add_root(left);
    prefab.add_root(right);
    prefab
}

/// A multi-material body with two debug helpers.
fn rig_prefab() -> Prefab {
    let mut prefab = Prefab::new("Rig");
    prefab.animations.push("Idle".to_string());

    let skin = prefab.add_texture(PrefabTexture::new("Skin", 128, 128, [230, 190, 160, 255]));
    let body = prefab.add_material(
        PrefabMaterial::basic("Body", Vec4::new(0.8, 0.8, 0.8, 1.0))
            .with_property("map", PrefabValue::Texture(skin)),
    );
    let trim = prefab.add_material(
        PrefabMaterial::basic("Trim", Vec4::new(0.2, 0.2, 0.2, 1.0))
            .with_property("emissiveMap", PrefabValue::Texture(skin)),
    );

    let torso = prefab.add_node(PrefabNode::mesh(
        "Torso",
        PrefabGeometry::Cube { size: 0.5 },
        vec![body, trim],
    ));
    let bones = prefab.add_node(PrefabNode::helper("SkeletonHelper"));
    let axes = prefab.add_node(PrefabNode::helper("AxesHelper"));
    let root = prefab.add_node(PrefabNode::group("Rig").with_children([torso, bones, axes]));
    prefab.add_root(root);
    prefab
}

async fn render_loop(scene: Scene, releases: ReleaseReceiver) {
    let mut frame = tokio::time::interval(Duration::from_millis(250));
    let mut freed = 0usize;

    loop {
        tokio::select! {
            _ = frame.tick() => {
                let stats = scene.stats();
                log::info!(
                    "Frame: {} nodes, {} meshes ({} visible), {} helpers",
                    stats.nodes,
                    stats.meshes,
                    stats.visible_meshes,
                    stats.helpers
                );
            }
            event = releases.recv_async() => match event {
                Ok(event) => {
                    freed += event.bytes;
                    log::info!("Released {:?} '{}' ({} bytes)", event.kind, event.label, event.bytes);
                }
                Err(_) => break,
            },
        }
    }

    log::info!("Renderer stopped, {freed} bytes released in total");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (release_tx, release_rx) = release_channel();
    let library = PrefabLibrary::new()
        .with_latency(Duration::from_millis(120))
        .with_release_listener(release_tx);
    library.insert("crate.prefab", crate_prefab());
    library.insert("atlas.prefab", atlas_prefab());
    library.insert("rig.prefab", rig_prefab());

    let settings = match std::env::args().nth(1) {
        Some(json) => CycleSettings::from_json_str(&json)?,
        None => CycleSettings {
            assets: vec![
                "crate.prefab".to_string(),
                "atlas.prefab".to_string(),
                "rig.prefab".to_string(),
            ],
            hold_ms: 800,
            load_timeout_ms: Some(1000),
            max_cycles: Some(6),
        },
    };

    let scene = Scene::new();
    let renderer = tokio::spawn(render_loop(scene.clone(), release_rx));

    let mut cycle = AssetCycle::new(library, scene, settings)?;
    let (cancel, token) = cancel_pair();
    if cycle.settings().max_cycles.is_none() {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            log::info!("Stopping asset cycle");
            cancel.cancel();
        });
    }

    let completed = cycle.run(token).await?;
    log::info!("Completed {completed} cycle(s)");

    // Dropping the library closes the release channel
    drop(cycle);
    renderer.await?;
    Ok(())
}
