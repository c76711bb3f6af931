//! OBJ/MTL model loading
//!
//! A model is parsed into flat per-vertex buffers grouped by material, split
//! to fit 16-bit index buffers, and paired with its diffuse and specular
//! textures. Each referenced texture file is loaded once.

mod mtl;
mod obj;

pub use mtl::{parse_mtl, MtlMaterial};
pub use obj::{MeshChunk, ObjFile, ObjGroup, VERTEX_STRIDE};

use std::collections::HashMap;

use macroquad::material::Material;
use macroquad::models::{draw_mesh, Mesh};
use macroquad::prelude::*;

use crate::render::{
    dedupe_edges, load_texture_or_placeholder, placeholder_texture, solid_texture, unique_edges,
    VertexLayout,
};

#[derive(Debug)]
pub enum ModelError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Io(e) => write!(f, "IO error: {}", e),
            ModelError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ModelError {}

/// One drawable chunk: mesh with its diffuse texture attached, plus the
/// specular map applied before each draw.
struct ModelPart {
    mesh: Mesh,
    specular: Texture2D,
}

/// A loaded model, ready to draw under the lighting material.
pub struct Model {
    parts: Vec<ModelPart>,
    /// Loaded models carry no emissive maps; a black pixel mutes the term.
    no_emissive: Texture2D,
    edges: Vec<(Vec3, Vec3)>,
}

impl Model {
    /// Load an OBJ file and its material library. Missing textures fall
    /// back to the placeholder; a missing MTL file only costs the textures.
    pub async fn load(path: &str) -> Result<Self, ModelError> {
        let contents = load_string(path)
            .await
            .map_err(|e| ModelError::Io(format!("failed to read {}: {}", path, e)))?;
        let parsed = ObjFile::parse(&contents)?;
        let dir = parent_dir(path);

        let materials = match &parsed.mtllib {
            Some(lib) => {
                let lib_path = join_path(dir, lib);
                match load_string(&lib_path).await {
                    Ok(text) => parse_mtl(&text)?,
                    Err(e) => {
                        eprintln!("Failed to read material library {}: {}", lib_path, e);
                        HashMap::new()
                    }
                }
            }
            None => HashMap::new(),
        };

        // Each texture file is loaded once, keyed by its resolved path
        let mut texture_cache: HashMap<String, Texture2D> = HashMap::new();
        let black = solid_texture([0, 0, 0, 255]);

        let layout = VertexLayout::position_normal_uv();
        let mut parts = Vec::new();
        let mut edges = Vec::new();

        for group in parsed.groups {
            // A named material that cannot be resolved (missing library or
            // missing entry) gets the visible placeholder instead of nothing.
            let (diffuse, specular) = match &group.material {
                Some(name) => match materials.get(name) {
                    Some(material) => {
                        let diffuse = match &material.diffuse_map {
                            Some(map) => Some(cached_texture(&mut texture_cache, dir, map).await),
                            None => None,
                        };
                        let specular = match &material.specular_map {
                            Some(map) => cached_texture(&mut texture_cache, dir, map).await,
                            None => black.clone(),
                        };
                        (diffuse, specular)
                    }
                    None => {
                        eprintln!("Material '{}' not found, using placeholder", name);
                        (Some(placeholder_texture()), black.clone())
                    }
                },
                None => (None, black.clone()),
            };

            for chunk in group.into_chunks() {
                let vertices = layout
                    .build_vertices(&chunk.data)
                    .map_err(|e| ModelError::Parse(e.to_string()))?;
                edges.extend(unique_edges(&vertices, &chunk.indices));
                parts.push(ModelPart {
                    mesh: Mesh {
                        vertices,
                        indices: chunk.indices,
                        texture: diffuse.clone(),
                    },
                    specular: specular.clone(),
                });
            }
        }

        // Chunks of one group can split a shared edge across mesh parts
        let edges = dedupe_edges(edges);

        println!(
            "Loaded model {} ({} mesh part(s), {} edge(s))",
            path,
            parts.len(),
            edges.len()
        );

        Ok(Self {
            parts,
            no_emissive: black,
            edges,
        })
    }

    /// Draw all parts under the lighting material. The material must be
    /// active (`gl_use_material`) when this is called.
    pub fn draw(&self, lit: &Material) {
        for part in &self.parts {
            lit.set_texture("SpecularMap", part.specular.clone());
            lit.set_texture("EmissiveMap", self.no_emissive.clone());
            draw_mesh(&part.mesh);
        }
    }

    /// Unique edges of all parts, for wireframe drawing
    pub fn edges(&self) -> &[(Vec3, Vec3)] {
        &self.edges
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

async fn cached_texture(
    cache: &mut HashMap<String, Texture2D>,
    dir: &str,
    file: &str,
) -> Texture2D {
    let path = join_path(dir, file);
    if let Some(texture) = cache.get(&path) {
        return texture.clone();
    }
    let texture = load_texture_or_placeholder(&path).await;
    cache.insert(path, texture.clone());
    texture
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

fn join_path(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", dir, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("assets/models/scene.obj"), "assets/models");
        assert_eq!(parent_dir("scene.obj"), "");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("assets/models", "tex.png"), "assets/models/tex.png");
        assert_eq!(join_path("", "tex.png"), "tex.png");
    }
}
