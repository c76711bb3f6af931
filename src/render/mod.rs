//! Rendering building blocks: camera, meshes, materials, textures

mod camera;
mod layout;
mod material;
mod mesh;
mod texture;

pub use camera::{FlyCamera, MoveDir};
pub use layout::{Semantic, VertexLayout};
pub use material::{load_scene_materials, upload_lighting, SceneMaterials};
pub use mesh::{dedupe_edges, draw_edges, unique_edges, unit_cube};
pub use texture::{load_texture_or_placeholder, placeholder_texture, solid_texture, texture_from_bytes};
