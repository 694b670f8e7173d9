use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::resources::texture::TextureRef;

/// Value carried by a material uniform.
#[derive(Debug, Clone)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Texture(TextureRef),
    /// Indexed textures, e.g. an atlas sampled by layer
    TextureArray(Vec<TextureRef>),
}

impl UniformValue {
    /// Textures referenced by this value, empty for plain data.
    #[must_use]
    pub fn textures(&self) -> &[TextureRef] {
        match self {
            Self::Texture(texture) => std::slice::from_ref(texture),
            Self::TextureArray(textures) => textures,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_texture(&self) -> bool {
        matches!(self, Self::Texture(_) | Self::TextureArray(_))
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

impl From<TextureRef> for UniformValue {
    fn from(v: TextureRef) -> Self {
        Self::Texture(v)
    }
}

impl From<Vec<TextureRef>> for UniformValue {
    fn from(v: Vec<TextureRef>) -> Self {
        Self::TextureArray(v)
    }
}

/// A uniform entry; the payload lives in `.value`.
#[derive(Debug, Clone)]
pub struct Uniform {
    pub value: UniformValue,
}

impl Uniform {
    #[must_use]
    pub fn new(value: impl Into<UniformValue>) -> Self {
        Self {
            value: value.into(),
        }
    }
}
