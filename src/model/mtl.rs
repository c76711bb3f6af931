//! Minimal MTL material library parsing
//!
//! Only the statements the renderer consumes: newmtl, map_Kd, map_Ks and Ns.
//! Everything else in the file is ignored.

use std::collections::HashMap;

use super::ModelError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MtlMaterial {
    pub diffuse_map: Option<String>,
    pub specular_map: Option<String>,
    pub shininess: Option<f32>,
}

/// Parse an MTL file into a name -> material map.
pub fn parse_mtl(contents: &str) -> Result<HashMap<String, MtlMaterial>, ModelError> {
    let mut materials = HashMap::new();
    let mut current: Option<String> = None;

    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let keyword = parts.next().unwrap_or_default();
        // Texture paths may contain spaces; take the whole remainder
        let rest = line[keyword.len()..].trim();

        match keyword {
            "newmtl" => {
                if rest.is_empty() {
                    return Err(ModelError::Parse(format!(
                        "line {}: newmtl needs a material name",
                        line_num + 1
                    )));
                }
                materials.insert(rest.to_string(), MtlMaterial::default());
                current = Some(rest.to_string());
            }
            "map_Kd" | "map_Ks" | "Ns" => {
                let name = current.as_ref().ok_or_else(|| {
                    ModelError::Parse(format!(
                        "line {}: '{}' before any newmtl",
                        line_num + 1,
                        keyword
                    ))
                })?;
                let material = materials.get_mut(name).expect("current material exists");
                match keyword {
                    "map_Kd" => material.diffuse_map = Some(rest.to_string()),
                    "map_Ks" => material.specular_map = Some(rest.to_string()),
                    "Ns" => {
                        material.shininess = Some(rest.parse().map_err(|_| {
                            ModelError::Parse(format!(
                                "line {}: invalid shininess '{}'",
                                line_num + 1,
                                rest
                            ))
                        })?)
                    }
                    _ => unreachable!(),
                }
            }
            // Ka/Kd/Ks colors, d, illum, bump maps, ...
            _ => {}
        }
    }

    Ok(materials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_mtl() {
        let materials = parse_mtl(
            "# comment\n\
             newmtl crate\n\
             Ns 32.0\n\
             map_Kd textures/crate diffuse.png\n\
             map_Ks crate_spec.png\n\
             newmtl plain\n\
             Kd 0.5 0.5 0.5\n",
        )
        .unwrap();

        assert_eq!(materials.len(), 2);
        let crate_mat = &materials["crate"];
        assert_eq!(crate_mat.diffuse_map.as_deref(), Some("textures/crate diffuse.png"));
        assert_eq!(crate_mat.specular_map.as_deref(), Some("crate_spec.png"));
        assert_eq!(crate_mat.shininess, Some(32.0));
        assert_eq!(materials["plain"], MtlMaterial::default());
    }

    #[test]
    fn test_statement_before_newmtl_rejected() {
        assert!(parse_mtl("map_Kd tex.png\n").is_err());
    }

    #[test]
    fn test_invalid_shininess_rejected() {
        assert!(parse_mtl("newmtl m\nNs soft\n").is_err());
    }
}
