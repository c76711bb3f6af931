//! OBJ parsing into flat per-vertex buffers
//!
//! Supports vertices (v), texture coords (vt), normals (vn), faces (f),
//! material assignment (usemtl) and material libraries (mtllib). Faces are
//! fan-triangulated and grouped by their active material; each unique
//! (position, uv, normal) triple becomes one interleaved vertex.

use std::collections::HashMap;

use super::ModelError;

/// Floats per interleaved vertex: vec3 position, vec3 normal, vec2 uv
pub const VERTEX_STRIDE: usize = 8;

/// All faces sharing one material, as a flat interleaved vertex buffer plus
/// triangle indices into it.
#[derive(Debug, Default)]
pub struct ObjGroup {
    pub material: Option<String>,
    /// Interleaved position/normal/uv floats, `VERTEX_STRIDE` per vertex
    pub data: Vec<f32>,
    pub indices: Vec<u32>,
}

impl ObjGroup {
    pub fn vertex_count(&self) -> usize {
        self.data.len() / VERTEX_STRIDE
    }
}

/// A group split to fit 16-bit indices
#[derive(Debug)]
pub struct MeshChunk {
    pub data: Vec<f32>,
    pub indices: Vec<u16>,
}

#[derive(Debug, Default)]
pub struct ObjFile {
    pub mtllib: Option<String>,
    pub groups: Vec<ObjGroup>,
}

impl ObjFile {
    pub fn parse(contents: &str) -> Result<Self, ModelError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();

        let mut obj = ObjFile::default();
        // material name -> group index, so scattered usemtl blocks merge
        let mut group_by_material: HashMap<Option<String>, usize> = HashMap::new();
        let mut current_group: Option<usize> = None;
        // (pos, uv, norm) -> vertex index, per group
        let mut vertex_caches: Vec<HashMap<(usize, usize, usize), u32>> = Vec::new();

        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => {
                    if parts.len() < 4 {
                        return Err(parse_err(line_num, "vertex position needs 3 values"));
                    }
                    positions.push([
                        parse_float(parts[1], line_num)?,
                        parse_float(parts[2], line_num)?,
                        parse_float(parts[3], line_num)?,
                    ]);
                }

                "vt" => {
                    if parts.len() < 3 {
                        return Err(parse_err(line_num, "texture coordinate needs 2 values"));
                    }
                    tex_coords.push([
                        parse_float(parts[1], line_num)?,
                        parse_float(parts[2], line_num)?,
                    ]);
                }

                "vn" => {
                    if parts.len() < 4 {
                        return Err(parse_err(line_num, "normal needs 3 values"));
                    }
                    normals.push([
                        parse_float(parts[1], line_num)?,
                        parse_float(parts[2], line_num)?,
                        parse_float(parts[3], line_num)?,
                    ]);
                }

                "f" => {
                    if parts.len() < 4 {
                        return Err(parse_err(line_num, "face needs at least 3 vertices"));
                    }

                    // Faces before any usemtl land in an unnamed group
                    let group_idx = match current_group {
                        Some(idx) => idx,
                        None => {
                            let idx = ensure_group(
                                &mut obj,
                                &mut group_by_material,
                                &mut vertex_caches,
                                None,
                            );
                            current_group = Some(idx);
                            idx
                        }
                    };

                    let mut face_verts = Vec::with_capacity(parts.len() - 1);
                    for spec in &parts[1..] {
                        let idx = push_face_vertex(
                            spec,
                            line_num,
                            &positions,
                            &tex_coords,
                            &normals,
                            &mut obj.groups[group_idx],
                            &mut vertex_caches[group_idx],
                        )?;
                        face_verts.push(idx);
                    }

                    // Fan triangulation, winding preserved
                    for i in 1..(face_verts.len() - 1) {
                        obj.groups[group_idx].indices.extend([
                            face_verts[0],
                            face_verts[i],
                            face_verts[i + 1],
                        ]);
                    }
                }

                "usemtl" => {
                    if parts.len() < 2 {
                        return Err(parse_err(line_num, "usemtl needs a material name"));
                    }
                    let name = Some(parts[1].to_string());
                    let idx = ensure_group(
                        &mut obj,
                        &mut group_by_material,
                        &mut vertex_caches,
                        name,
                    );
                    current_group = Some(idx);
                }

                "mtllib" => {
                    if parts.len() < 2 {
                        return Err(parse_err(line_num, "mtllib needs a file name"));
                    }
                    obj.mtllib = Some(parts[1..].join(" "));
                }

                // Ignore other OBJ commands (o, g, s, etc.)
                _ => {}
            }
        }

        if positions.is_empty() {
            return Err(ModelError::Parse("no vertices found in OBJ file".to_string()));
        }
        if obj.groups.iter().all(|g| g.indices.is_empty()) {
            return Err(ModelError::Parse("no faces found in OBJ file".to_string()));
        }

        Ok(obj)
    }
}

impl ObjGroup {
    /// Split into chunks whose vertices fit a `u16` index buffer. Vertices
    /// are remapped per chunk; a chunk closes when the next triangle cannot
    /// fit three more vertices.
    pub fn into_chunks(self) -> Vec<MeshChunk> {
        const LIMIT: usize = u16::MAX as usize + 1;

        if self.vertex_count() <= LIMIT {
            return vec![MeshChunk {
                data: self.data,
                indices: self.indices.iter().map(|&i| i as u16).collect(),
            }];
        }

        let mut chunks = Vec::new();
        let mut remap: HashMap<u32, u16> = HashMap::new();
        let mut chunk = MeshChunk {
            data: Vec::new(),
            indices: Vec::new(),
        };

        for tri in self.indices.chunks_exact(3) {
            let new_in_tri = tri.iter().filter(|i| !remap.contains_key(i)).count();
            if remap.len() + new_in_tri > LIMIT {
                chunks.push(std::mem::replace(
                    &mut chunk,
                    MeshChunk {
                        data: Vec::new(),
                        indices: Vec::new(),
                    },
                ));
                remap.clear();
            }
            for &src in tri {
                let next = remap.len() as u16;
                let dst = *remap.entry(src).or_insert_with(|| {
                    let start = src as usize * VERTEX_STRIDE;
                    chunk.data.extend_from_slice(&self.data[start..start + VERTEX_STRIDE]);
                    next
                });
                chunk.indices.push(dst);
            }
        }
        if !chunk.indices.is_empty() {
            chunks.push(chunk);
        }
        chunks
    }
}

fn ensure_group(
    obj: &mut ObjFile,
    by_material: &mut HashMap<Option<String>, usize>,
    caches: &mut Vec<HashMap<(usize, usize, usize), u32>>,
    material: Option<String>,
) -> usize {
    if let Some(&idx) = by_material.get(&material) {
        return idx;
    }
    let idx = obj.groups.len();
    obj.groups.push(ObjGroup {
        material: material.clone(),
        ..Default::default()
    });
    caches.push(HashMap::new());
    by_material.insert(material, idx);
    idx
}

/// Resolve a face vertex spec like "1/2/3", "1//3" or "1" into a group
/// vertex index, deduplicating identical triples.
fn push_face_vertex(
    spec: &str,
    line_num: usize,
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    normals: &[[f32; 3]],
    group: &mut ObjGroup,
    cache: &mut HashMap<(usize, usize, usize), u32>,
) -> Result<u32, ModelError> {
    let parts: Vec<&str> = spec.split('/').collect();

    if parts[0].is_empty() {
        return Err(parse_err(line_num, "missing position index in face"));
    }
    let pos_idx = parse_index(parts[0], positions.len(), line_num)?;

    let uv_idx = if parts.len() > 1 && !parts[1].is_empty() {
        parse_index(parts[1], tex_coords.len(), line_num)?
    } else {
        usize::MAX // sentinel for missing
    };
    let norm_idx = if parts.len() > 2 && !parts[2].is_empty() {
        parse_index(parts[2], normals.len(), line_num)?
    } else {
        usize::MAX
    };

    let cache_key = (pos_idx, uv_idx, norm_idx);
    if let Some(&idx) = cache.get(&cache_key) {
        return Ok(idx);
    }

    let pos = positions[pos_idx];
    let normal = if norm_idx != usize::MAX {
        normals[norm_idx]
    } else {
        [0.0; 3]
    };
    let uv = if uv_idx != usize::MAX {
        tex_coords[uv_idx]
    } else {
        [0.0; 2]
    };

    let idx = group.vertex_count() as u32;
    group.data.extend_from_slice(&pos);
    group.data.extend_from_slice(&normal);
    group.data.extend_from_slice(&uv);
    cache.insert(cache_key, idx);
    Ok(idx)
}

fn parse_float(s: &str, line_num: usize) -> Result<f32, ModelError> {
    s.parse()
        .map_err(|_| parse_err(line_num, &format!("invalid float value '{}'", s)))
}

/// Parse a face index: 1-based, negative values are relative to the end.
fn parse_index(s: &str, count: usize, line_num: usize) -> Result<usize, ModelError> {
    let idx: i32 = s
        .parse()
        .map_err(|_| parse_err(line_num, &format!("invalid index '{}'", s)))?;

    let result = if idx > 0 {
        (idx - 1) as usize
    } else if idx < 0 {
        let rel = count as i32 + idx;
        if rel < 0 {
            return Err(parse_err(line_num, &format!("index {} out of range", idx)));
        }
        rel as usize
    } else {
        return Err(parse_err(line_num, "index cannot be 0"));
    };

    if result >= count {
        return Err(parse_err(
            line_num,
            &format!("index {} out of range (have {} elements)", idx, count),
        ));
    }
    Ok(result)
}

fn parse_err(line_num: usize, msg: &str) -> ModelError {
    ModelError::Parse(format!("line {}: {}", line_num + 1, msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 0 1
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn test_parse_triangle() {
        let obj = ObjFile::parse(TRIANGLE).unwrap();
        assert_eq!(obj.groups.len(), 1);
        let group = &obj.groups[0];
        assert_eq!(group.vertex_count(), 3);
        assert_eq!(group.indices, vec![0, 1, 2]);
        // First vertex: pos (0,0,0), normal (0,0,1), uv (0,0)
        assert_eq!(&group.data[0..8], &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_quad_fan_triangulated() {
        let obj = ObjFile::parse(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();
        let group = &obj.groups[0];
        assert_eq!(group.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_vertex_dedup() {
        // Two triangles sharing an edge reuse the shared vertices
        let obj = ObjFile::parse(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n",
        )
        .unwrap();
        assert_eq!(obj.groups[0].vertex_count(), 4);
    }

    #[test]
    fn test_same_position_different_uv_not_deduped() {
        let obj = ObjFile::parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 1\nf 1/1 2/1 3/1\nf 1/2 2/2 3/2\n",
        )
        .unwrap();
        assert_eq!(obj.groups[0].vertex_count(), 6);
    }

    #[test]
    fn test_negative_indices() {
        let obj = ObjFile::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(obj.groups[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_uv_and_normal_default_to_zero() {
        let obj = ObjFile::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let data = &obj.groups[0].data;
        assert_eq!(&data[3..8], &[0.0; 5]);
    }

    #[test]
    fn test_usemtl_groups_merge() {
        let obj = ObjFile::parse(
            "mtllib scene.mtl\n\
             v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             usemtl a\nf 1 2 3\n\
             usemtl b\nf 1 2 3\n\
             usemtl a\nf 3 2 1\n",
        )
        .unwrap();
        assert_eq!(obj.mtllib.as_deref(), Some("scene.mtl"));
        assert_eq!(obj.groups.len(), 2);
        let a = obj.groups.iter().find(|g| g.material.as_deref() == Some("a")).unwrap();
        assert_eq!(a.indices.len(), 6);
    }

    #[test]
    fn test_empty_obj_rejected() {
        assert!(ObjFile::parse("# nothing\n").is_err());
        assert!(ObjFile::parse("v 0 0 0\n").is_err());
    }

    #[test]
    fn test_index_out_of_range() {
        assert!(ObjFile::parse("v 0 0 0\nf 1 2 3\n").is_err());
        assert!(ObjFile::parse("v 0 0 0\nf 0 0 0\n").is_err());
    }

    #[test]
    fn test_small_group_single_chunk() {
        let obj = ObjFile::parse(TRIANGLE).unwrap();
        let chunks = obj.groups.into_iter().next().unwrap().into_chunks();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_oversized_group_splits() {
        // Disconnected triangles with unique vertices, enough to overflow
        // a u16 index buffer.
        let tri_count = 22_000; // 66_000 vertices
        let mut group = ObjGroup::default();
        for t in 0..tri_count as u32 {
            for v in 0..3u32 {
                group.data.extend_from_slice(&[t as f32, v as f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
            }
            group.indices.extend([t * 3, t * 3 + 1, t * 3 + 2]);
        }
        let chunks = group.into_chunks();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.data.len() / VERTEX_STRIDE <= u16::MAX as usize + 1);
            assert_eq!(chunk.indices.len() % 3, 0);
            // Indices stay in range
            let max = *chunk.indices.iter().max().unwrap() as usize;
            assert!(max < chunk.data.len() / VERTEX_STRIDE);
        }
        let total: usize = chunks.iter().map(|c| c.indices.len()).sum();
        assert_eq!(total, tri_count * 3);
    }
}
