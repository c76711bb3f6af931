//! Interleaved vertex-attribute layout description
//!
//! Raw mesh data arrives as one flat `f32` array with several attributes
//! interleaved per vertex (position, normal, uv, ...). `VertexLayout` records
//! which attributes are present and how many floats each one occupies, then
//! splits the flat array into proper vertices.

use macroquad::models::Vertex;
use macroquad::prelude::*;

/// Hard cap on attributes per layout, mirroring GL's minimum guaranteed
/// vertex attribute count.
pub const MAX_ATTRIBUTES: usize = 16;

/// What an attribute means when vertices are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantic {
    Position,
    Normal,
    TexCoord,
}

#[derive(Debug, Clone, Copy)]
struct Attribute {
    semantic: Semantic,
    /// Number of f32 components
    size: usize,
    /// Float offset from the start of a vertex
    offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    TooManyAttributes,
    DuplicateSemantic(&'static str),
    /// Data length is not a multiple of the layout stride
    Misaligned { len: usize, stride: usize },
    MissingPosition,
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::TooManyAttributes => write!(f, "too many vertex attributes"),
            LayoutError::DuplicateSemantic(name) => {
                write!(f, "attribute '{}' declared twice", name)
            }
            LayoutError::Misaligned { len, stride } => write!(
                f,
                "data length {} is not a multiple of vertex stride {}",
                len, stride
            ),
            LayoutError::MissingPosition => write!(f, "layout has no position attribute"),
        }
    }
}

impl std::error::Error for LayoutError {}

fn semantic_name(s: Semantic) -> &'static str {
    match s {
        Semantic::Position => "position",
        Semantic::Normal => "normal",
        Semantic::TexCoord => "texcoord",
    }
}

/// Describes one interleaved vertex: attribute order, sizes and the total
/// stride. Offsets are computed as attributes are added, the same way a GL
/// attrib-pointer setup would walk the buffer.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    attributes: Vec<Attribute>,
    stride: usize,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self {
            attributes: Vec::new(),
            stride: 0,
        }
    }

    /// Append an attribute of `size` floats. Order of calls defines the
    /// interleaving order.
    pub fn attribute(mut self, semantic: Semantic, size: usize) -> Result<Self, LayoutError> {
        if self.attributes.len() >= MAX_ATTRIBUTES {
            return Err(LayoutError::TooManyAttributes);
        }
        if self.attributes.iter().any(|a| a.semantic == semantic) {
            return Err(LayoutError::DuplicateSemantic(semantic_name(semantic)));
        }
        self.attributes.push(Attribute {
            semantic,
            size,
            offset: self.stride,
        });
        self.stride += size;
        Ok(self)
    }

    /// Floats per vertex
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Float offset of a semantic within one vertex, if present
    pub fn offset_of(&self, semantic: Semantic) -> Option<usize> {
        self.attributes
            .iter()
            .find(|a| a.semantic == semantic)
            .map(|a| a.offset)
    }

    /// The standard layout used by all mesh data in this program:
    /// vec3 position, vec3 normal, vec2 uv.
    pub fn position_normal_uv() -> Self {
        Self::new()
            .attribute(Semantic::Position, 3)
            .and_then(|l| l.attribute(Semantic::Normal, 3))
            .and_then(|l| l.attribute(Semantic::TexCoord, 2))
            .expect("static layout is valid")
    }

    /// Split a flat interleaved array into vertices. Attributes the layout
    /// does not carry default to zero; vertex color defaults to opaque white
    /// so lighting alone shapes the final color.
    pub fn build_vertices(&self, data: &[f32]) -> Result<Vec<Vertex>, LayoutError> {
        if self.stride == 0 || data.len() % self.stride != 0 {
            return Err(LayoutError::Misaligned {
                len: data.len(),
                stride: self.stride,
            });
        }
        let pos_off = self
            .offset_of(Semantic::Position)
            .ok_or(LayoutError::MissingPosition)?;
        let norm_off = self.offset_of(Semantic::Normal);
        let uv_off = self.offset_of(Semantic::TexCoord);

        let mut vertices = Vec::with_capacity(data.len() / self.stride);
        for v in data.chunks_exact(self.stride) {
            let normal = match norm_off {
                Some(o) => vec4(v[o], v[o + 1], v[o + 2], 0.0),
                None => Vec4::ZERO,
            };
            let uv = match uv_off {
                Some(o) => vec2(v[o], v[o + 1]),
                None => Vec2::ZERO,
            };
            vertices.push(Vertex {
                position: vec3(v[pos_off], v[pos_off + 1], v[pos_off + 2]),
                uv,
                color: [255, 255, 255, 255],
                normal,
            });
        }
        Ok(vertices)
    }
}

impl Default for VertexLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_and_offsets() {
        let layout = VertexLayout::position_normal_uv();
        assert_eq!(layout.stride(), 8);
        assert_eq!(layout.offset_of(Semantic::Position), Some(0));
        assert_eq!(layout.offset_of(Semantic::Normal), Some(3));
        assert_eq!(layout.offset_of(Semantic::TexCoord), Some(6));
    }

    #[test]
    fn test_build_vertices() {
        let layout = VertexLayout::position_normal_uv();
        let data = [
            1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.25, 0.75, //
            -1.0, 0.0, 0.5, 0.0, 0.0, -1.0, 1.0, 0.0,
        ];
        let verts = layout.build_vertices(&data).unwrap();
        assert_eq!(verts.len(), 2);
        assert_eq!(verts[0].position, vec3(1.0, 2.0, 3.0));
        assert_eq!(verts[0].normal, vec4(0.0, 1.0, 0.0, 0.0));
        assert_eq!(verts[1].uv, vec2(1.0, 0.0));
        assert_eq!(verts[1].color, [255, 255, 255, 255]);
    }

    #[test]
    fn test_misaligned_data_rejected() {
        let layout = VertexLayout::position_normal_uv();
        let err = layout.build_vertices(&[0.0; 9]).unwrap_err();
        assert_eq!(err, LayoutError::Misaligned { len: 9, stride: 8 });
    }

    #[test]
    fn test_duplicate_semantic_rejected() {
        let err = VertexLayout::new()
            .attribute(Semantic::Position, 3)
            .unwrap()
            .attribute(Semantic::Position, 3)
            .unwrap_err();
        assert_eq!(err, LayoutError::DuplicateSemantic("position"));
    }

    #[test]
    fn test_position_only_layout() {
        let layout = VertexLayout::new().attribute(Semantic::Position, 3).unwrap();
        let verts = layout.build_vertices(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(verts[0].uv, Vec2::ZERO);
        assert_eq!(verts[0].normal, Vec4::ZERO);
    }
}
