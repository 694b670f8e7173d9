use std::sync::Arc;

use glam::Vec4;

use crate::errors::{Error, Result};
use crate::resources::{
    Attribute, Geometry, GeometryRef, Material, MaterialRef, MaterialValue, ReleaseSender,
    Texture, TextureRef, UniformValue,
};
use crate::scene::{MaterialSlot, Node, NodeKind, NodeRef};

/// Texture description; instantiated as a solid-colour RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefabTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: [u8; 4],
}

impl PrefabTexture {
    #[must_use]
    pub fn new(name: &str, width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            rgba,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrefabGeometry {
    Plane { width: f32, height: f32 },
    Cube { size: f32 },
    Custom {
        name: String,
        positions: Vec<f32>,
        index: Option<Vec<u32>>,
    },
}

/// Where a material finds a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSource {
    /// Index into [`Prefab::textures`]; a fresh texture per instantiation
    Local(usize),
    /// Index into [`Prefab::shared_textures`]; the same texture every time
    Shared(usize),
}

/// Material property or uniform value.
#[derive(Debug, Clone, PartialEq)]
pub enum PrefabValue {
    Float(f32),
    Color(Vec4),
    Texture(TextureSource),
    /// Only valid as a uniform value
    TextureArray(Vec<TextureSource>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefabMaterial {
    pub name: String,
    pub properties: Vec<(String, PrefabValue)>,
    /// `Some` builds a material with a uniform map
    pub uniforms: Option<Vec<(String, PrefabValue)>>,
}

impl PrefabMaterial {
    #[must_use]
    pub fn basic(name: &str, color: Vec4) -> Self {
        Self {
            name: name.to_string(),
            properties: vec![("color".to_string(), PrefabValue::Color(color))],
            uniforms: None,
        }
    }

    #[must_use]
    pub fn shader(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: Vec::new(),
            uniforms: Some(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: &str, value: PrefabValue) -> Self {
        self.properties.push((name.to_string(), value));
        self
    }

    #[must_use]
    pub fn with_uniform(mut self, name: &str, value: PrefabValue) -> Self {
        self.uniforms
            .get_or_insert_with(Vec::new)
            .push((name.to_string(), value));
        self
    }
}

/// Prefab node: data only, children referenced by index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrefabNode {
    pub name: Option<String>,
    pub kind: NodeKind,
    pub geometry: Option<PrefabGeometry>,
    /// Indices into [`Prefab::materials`]
    pub materials: Vec<usize>,
    /// Indices of child nodes in [`Prefab::nodes`]
    pub children_indices: Vec<usize>,
}

impl PrefabNode {
    #[must_use]
    pub fn group(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn mesh(name: &str, geometry: PrefabGeometry, materials: Vec<usize>) -> Self {
        Self {
            name: Some(name.to_string()),
            kind: NodeKind::Mesh,
            geometry: Some(geometry),
            materials,
            children_indices: Vec::new(),
        }
    }

    #[must_use]
    pub fn helper(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            kind: NodeKind::Helper,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = usize>) -> Self {
        self.children_indices.extend(children);
        self
    }
}

/// In-memory asset description.
///
/// A prefab is plain data: every [`instantiate`](Self::instantiate) builds a
/// brand-new node graph with its own geometries, materials and textures,
/// except for `shared_textures`, which are handed out as-is.
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    pub name: String,
    /// All nodes, flattened
    pub nodes: Vec<PrefabNode>,
    /// Indices of the root nodes in `nodes`
    pub root_indices: Vec<usize>,
    pub textures: Vec<PrefabTexture>,
    pub shared_textures: Vec<TextureRef>,
    pub materials: Vec<PrefabMaterial>,
    pub animations: Vec<String>,
}

/// Thread-safe prefab reference
pub type SharedPrefab = Arc<Prefab>;

impl Prefab {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn add_texture(&mut self, texture: PrefabTexture) -> TextureSource {
        self.textures.push(texture);
        TextureSource::Local(self.textures.len() - 1)
    }

    pub fn share_texture(&mut self, texture: TextureRef) -> TextureSource {
        self.shared_textures.push(texture);
        TextureSource::Shared(self.shared_textures.len() - 1)
    }

    pub fn add_material(&mut self, material: PrefabMaterial) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_node(&mut self, node: PrefabNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_root(&mut self, index: usize) {
        self.root_indices.push(index);
    }

    /// Builds a fresh node graph.
    pub fn instantiate(&self) -> Result<NodeRef> {
        self.build(None)
    }

    /// Builds a fresh node graph and subscribes `listener` to every resource
    /// it creates. Shared textures are left alone.
    pub fn instantiate_with_listener(&self, listener: &ReleaseSender) -> Result<NodeRef> {
        self.build(Some(listener))
    }

    fn build(&self, listener: Option<&ReleaseSender>) -> Result<NodeRef> {
        let textures: Vec<TextureRef> = self
            .textures
            .iter()
            .map(|desc| {
                let texture = TextureRef::new(Texture::solid(
                    &desc.name,
                    desc.width,
                    desc.height,
                    desc.rgba,
                ));
                if let Some(listener) = listener {
                    texture.on_release(listener.clone());
                }
                texture
            })
            .collect();

        let materials = self
            .materials
            .iter()
            .map(|desc| self.build_material(desc, &textures, listener))
            .collect::<Result<Vec<_>>>()?;

        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, desc)| Self::build_node(index, desc, &materials, listener))
            .collect::<Result<Vec<_>>>()?;

        // Link the hierarchy
        for (index, desc) in self.nodes.iter().enumerate() {
            for &child_index in &desc.children_indices {
                let child = nodes.get(child_index).ok_or_else(|| Error::AssetIndexOutOfBounds {
                    context: format!("children of node {index} in prefab '{}'", self.name),
                    index: child_index,
                })?;
                if child.has_parent() {
                    return Err(self.invalid(format!("node {child_index} has more than one parent")));
                }
                if !nodes[index].add(child) {
                    return Err(self.invalid(format!("node {child_index} would form a cycle")));
                }
            }
        }

        if self.root_indices.is_empty() {
            return Err(self.invalid("no root nodes".to_string()));
        }

        let mut roots = Vec::with_capacity(self.root_indices.len());
        for &root_index in &self.root_indices {
            let root = nodes.get(root_index).ok_or_else(|| Error::AssetIndexOutOfBounds {
                context: format!("roots of prefab '{}'", self.name),
                index: root_index,
            })?;
            if root.has_parent() {
                return Err(self.invalid(format!("root node {root_index} is also a child")));
            }
            roots.push(root.clone());
        }

        if roots.len() == 1 {
            return Ok(roots.swap_remove(0));
        }

        let group = NodeRef::group(&self.name);
        for root in &roots {
            group.add(root);
        }
        Ok(group)
    }

    fn build_material(
        &self,
        desc: &PrefabMaterial,
        textures: &[TextureRef],
        listener: Option<&ReleaseSender>,
    ) -> Result<MaterialRef> {
        let mut material = match desc.uniforms {
            Some(_) => Material::shader(&desc.name),
            None => Material::new(&desc.name),
        };

        for (name, value) in &desc.properties {
            let value = match value {
                PrefabValue::Float(v) => MaterialValue::Float(*v),
                PrefabValue::Color(c) => MaterialValue::Color(*c),
                PrefabValue::Texture(source) => {
                    MaterialValue::Texture(self.resolve_texture(*source, textures)?)
                }
                PrefabValue::TextureArray(_) => {
                    return Err(self.invalid(format!(
                        "material '{}' property '{name}' cannot hold a texture array",
                        desc.name
                    )));
                }
            };
            material = material.with_property(name, value);
        }

        for (name, value) in desc.uniforms.iter().flatten() {
            let value = match value {
                PrefabValue::Float(v) => UniformValue::Float(*v),
                PrefabValue::Color(c) => UniformValue::Vec4(*c),
                PrefabValue::Texture(source) => {
                    UniformValue::Texture(self.resolve_texture(*source, textures)?)
                }
                PrefabValue::TextureArray(sources) => UniformValue::TextureArray(
                    sources
                        .iter()
                        .map(|source| self.resolve_texture(*source, textures))
                        .collect::<Result<_>>()?,
                ),
            };
            material = material.with_uniform(name, value);
        }

        if let Some(listener) = listener {
            material.on_release(listener.clone());
        }
        Ok(MaterialRef::new(material))
    }

    fn build_node(
        index: usize,
        desc: &PrefabNode,
        materials: &[MaterialRef],
        listener: Option<&ReleaseSender>,
    ) -> Result<NodeRef> {
        let name = desc
            .name
            .clone()
            .unwrap_or_else(|| format!("Node{index}"));
        let mut node = Node::new(&name, desc.kind);

        if let Some(geometry) = &desc.geometry {
            let geometry = GeometryRef::new(build_geometry(geometry));
            if let Some(listener) = listener {
                geometry.on_release(listener.clone());
            }
            node = node.with_geometry(geometry);
        }

        let slot = desc
            .materials
            .iter()
            .map(|&i| {
                materials.get(i).cloned().ok_or_else(|| Error::AssetIndexOutOfBounds {
                    context: format!("materials of node '{name}'"),
                    index: i,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        node = node.with_material(match slot.len() {
            0 => MaterialSlot::Empty,
            1 => MaterialSlot::from(slot[0].clone()),
            _ => MaterialSlot::from(slot),
        });

        if let Some(listener) = listener {
            node.on_release(listener.clone());
        }
        Ok(NodeRef::new(node))
    }

    fn resolve_texture(&self, source: TextureSource, textures: &[TextureRef]) -> Result<TextureRef> {
        let (pool, context, index) = match source {
            TextureSource::Local(i) => (textures, "textures", i),
            TextureSource::Shared(i) => (self.shared_textures.as_slice(), "shared textures", i),
        };
        pool.get(index).cloned().ok_or_else(|| Error::AssetIndexOutOfBounds {
            context: format!("{context} of prefab '{}'", self.name),
            index,
        })
    }

    fn invalid(&self, reason: String) -> Error {
        Error::InvalidPrefab {
            name: self.name.clone(),
            reason,
        }
    }
}

fn build_geometry(desc: &PrefabGeometry) -> Geometry {
    match desc {
        PrefabGeometry::Plane { width, height } => Geometry::plane(*width, *height),
        PrefabGeometry::Cube { size } => Geometry::cube(*size),
        PrefabGeometry::Custom {
            name,
            positions,
            index,
        } => {
            let geometry =
                Geometry::new(name).with_attribute("position", Attribute::new(positions.clone(), 3));
            match index {
                Some(index) => geometry.with_index(index.clone()),
                None => geometry,
            }
        }
    }
}
