//! Shaders and per-frame uniform upload
//!
//! Two materials drive the whole scene: `lit` runs the full
//! directional + point + spot lighting model with diffuse/specular/emissive
//! maps, `flat` paints light markers in plain light color. Light colors are
//! split into ambient/diffuse/specular contributions at 0.1/0.5/1.0 inside
//! the shader.

use macroquad::material::{load_material, Material, MaterialParams};
use macroquad::miniquad::{Comparison, PipelineParams, ShaderSource, UniformDesc, UniformType};
use macroquad::prelude::*;

use crate::scene::{SceneSettings, SpotLight, POINT_LIGHT_COUNT};

use super::camera::FlyCamera;

const LIT_VERTEX: &str = r#"#version 100
attribute vec3 position;
attribute vec2 texcoord;
attribute vec4 normal;

varying vec2 uv;
varying vec3 worldPos;
varying vec3 worldNormal;

uniform mat4 Model;
uniform mat4 Projection;

void main() {
    vec4 world = Model * vec4(position, 1.0);
    worldPos = world.xyz;
    // GLSL ES 100 has no mat3(mat4) constructor
    mat3 normalMat = mat3(Model[0].xyz, Model[1].xyz, Model[2].xyz);
    worldNormal = normalMat * normal.xyz;
    uv = texcoord;
    gl_Position = Projection * world;
}
"#;

const LIT_FRAGMENT: &str = r#"#version 100
precision mediump float;

varying vec2 uv;
varying vec3 worldPos;
varying vec3 worldNormal;

uniform sampler2D Texture;
uniform sampler2D SpecularMap;
uniform sampler2D EmissiveMap;

uniform vec3 viewPos;
uniform float materialShininess;
uniform float materialEmissive;

uniform vec3 dirLightDirection;
uniform vec3 dirLightColor;

uniform vec3 pointLightPos[4];
uniform vec3 pointLightColor[4];
uniform vec3 pointLightFalloff[4];

uniform vec3 spotPos;
uniform vec3 spotDir;
uniform vec3 spotColor;
uniform vec2 spotCone;
uniform vec3 spotFalloff;

vec3 phong(vec3 lightDir, vec3 lightColor, vec3 normal, vec3 viewDir,
           vec3 diffuseTex, vec3 specularTex) {
    float diff = max(dot(normal, lightDir), 0.0);
    vec3 reflectDir = reflect(-lightDir, normal);
    float spec = pow(max(dot(viewDir, reflectDir), 0.0), materialShininess);
    vec3 ambient = lightColor * 0.1 * diffuseTex;
    vec3 diffuse = lightColor * 0.5 * diff * diffuseTex;
    vec3 specular = lightColor * spec * specularTex;
    return ambient + diffuse + specular;
}

void main() {
    vec3 normal = normalize(worldNormal);
    vec3 viewDir = normalize(viewPos - worldPos);
    vec3 diffuseTex = texture2D(Texture, uv).rgb;
    vec3 specularTex = texture2D(SpecularMap, uv).rgb;

    vec3 result = phong(normalize(-dirLightDirection), dirLightColor,
                        normal, viewDir, diffuseTex, specularTex);

    for (int i = 0; i < 4; i++) {
        vec3 toLight = pointLightPos[i] - worldPos;
        float dist = length(toLight);
        float atten = 1.0 / (pointLightFalloff[i].x
            + pointLightFalloff[i].y * dist
            + pointLightFalloff[i].z * dist * dist);
        result += atten * phong(normalize(toLight), pointLightColor[i],
                                normal, viewDir, diffuseTex, specularTex);
    }

    // Flashlight with a soft cone edge
    vec3 toSpot = spotPos - worldPos;
    float spotDist = length(toSpot);
    vec3 spotLightDir = normalize(toSpot);
    float theta = dot(spotLightDir, normalize(-spotDir));
    float intensity = clamp((theta - spotCone.y) / (spotCone.x - spotCone.y), 0.0, 1.0);
    float spotAtten = 1.0 / (spotFalloff.x
        + spotFalloff.y * spotDist
        + spotFalloff.z * spotDist * spotDist);
    result += intensity * spotAtten * phong(spotLightDir, spotColor,
                                            normal, viewDir, diffuseTex, specularTex);

    result += texture2D(EmissiveMap, uv).rgb * materialEmissive;

    gl_FragColor = vec4(result, 1.0);
}
"#;

const FLAT_VERTEX: &str = r#"#version 100
attribute vec3 position;

uniform mat4 Model;
uniform mat4 Projection;

void main() {
    gl_Position = Projection * Model * vec4(position, 1.0);
}
"#;

const FLAT_FRAGMENT: &str = r#"#version 100
precision mediump float;

uniform vec3 flatColor;

void main() {
    gl_FragColor = vec4(flatColor, 1.0);
}
"#;

/// The two materials used to draw the scene
pub struct SceneMaterials {
    pub lit: Material,
    pub flat: Material,
}

fn depth_pipeline() -> PipelineParams {
    PipelineParams {
        depth_write: true,
        depth_test: Comparison::LessOrEqual,
        ..Default::default()
    }
}

pub fn load_scene_materials() -> Result<SceneMaterials, macroquad::Error> {
    let lit = load_material(
        ShaderSource::Glsl {
            vertex: LIT_VERTEX,
            fragment: LIT_FRAGMENT,
        },
        MaterialParams {
            pipeline_params: depth_pipeline(),
            uniforms: vec![
                UniformDesc::new("viewPos", UniformType::Float3),
                UniformDesc::new("materialShininess", UniformType::Float1),
                UniformDesc::new("materialEmissive", UniformType::Float1),
                UniformDesc::new("dirLightDirection", UniformType::Float3),
                UniformDesc::new("dirLightColor", UniformType::Float3),
                UniformDesc::new("pointLightPos", UniformType::Float3).array(POINT_LIGHT_COUNT),
                UniformDesc::new("pointLightColor", UniformType::Float3).array(POINT_LIGHT_COUNT),
                UniformDesc::new("pointLightFalloff", UniformType::Float3)
                    .array(POINT_LIGHT_COUNT),
                UniformDesc::new("spotPos", UniformType::Float3),
                UniformDesc::new("spotDir", UniformType::Float3),
                UniformDesc::new("spotColor", UniformType::Float3),
                UniformDesc::new("spotCone", UniformType::Float2),
                UniformDesc::new("spotFalloff", UniformType::Float3),
            ],
            textures: vec!["SpecularMap".to_string(), "EmissiveMap".to_string()],
        },
    )?;

    let flat = load_material(
        ShaderSource::Glsl {
            vertex: FLAT_VERTEX,
            fragment: FLAT_FRAGMENT,
        },
        MaterialParams {
            pipeline_params: depth_pipeline(),
            uniforms: vec![UniformDesc::new("flatColor", UniformType::Float3)],
            textures: vec![],
        },
    )?;

    Ok(SceneMaterials { lit, flat })
}

/// Cosines of the spot light's inner and outer cone angles. The shader
/// compares against cosines so the conversion happens once per frame here.
pub fn spot_cone(spot: &SpotLight) -> Vec2 {
    vec2(
        spot.cutoff_deg.to_radians().cos(),
        spot.outer_cutoff_deg.to_radians().cos(),
    )
}

/// Constant/linear/quadratic falloff packed for the shader
pub fn falloff(constant: f32, linear: f32, quadratic: f32) -> Vec3 {
    vec3(constant, linear, quadratic)
}

/// Push the current scene settings and camera state into the lighting
/// material. The spot light rides on the camera.
pub fn upload_lighting(material: &Material, scene: &SceneSettings, camera: &FlyCamera) {
    material.set_uniform("viewPos", camera.position);
    material.set_uniform("materialShininess", scene.material.shininess);
    material.set_uniform("materialEmissive", scene.material.emissive_strength);

    material.set_uniform("dirLightDirection", Vec3::from(scene.directional.direction));
    material.set_uniform("dirLightColor", Vec3::from(scene.directional.color));

    let mut positions = [Vec3::ZERO; POINT_LIGHT_COUNT];
    let mut colors = [Vec3::ZERO; POINT_LIGHT_COUNT];
    let mut falloffs = [Vec3::ZERO; POINT_LIGHT_COUNT];
    for (i, light) in scene.point_lights.iter().enumerate() {
        positions[i] = Vec3::from(light.position);
        colors[i] = Vec3::from(light.color);
        falloffs[i] = falloff(light.constant, light.linear, light.quadratic);
    }
    material.set_uniform_array("pointLightPos", &positions);
    material.set_uniform_array("pointLightColor", &colors);
    material.set_uniform_array("pointLightFalloff", &falloffs);

    material.set_uniform("spotPos", camera.position);
    material.set_uniform("spotDir", camera.front);
    material.set_uniform("spotColor", Vec3::from(scene.spot.color));
    material.set_uniform("spotCone", spot_cone(&scene.spot));
    material.set_uniform(
        "spotFalloff",
        falloff(scene.spot.constant, scene.spot.linear, scene.spot.quadratic),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_cone_cosines() {
        let spot = SpotLight::default();
        let cone = spot_cone(&spot);
        assert!((cone.x - 12.5f32.to_radians().cos()).abs() < 1e-6);
        assert!((cone.y - 17.5f32.to_radians().cos()).abs() < 1e-6);
        // Inner cone cosine is larger than the outer one
        assert!(cone.x > cone.y);
    }

    #[test]
    fn test_shader_array_sizes_match_light_count() {
        for name in ["pointLightPos", "pointLightColor", "pointLightFalloff"] {
            let decl = format!("{}[{}]", name, POINT_LIGHT_COUNT);
            assert!(
                LIT_FRAGMENT.contains(&decl),
                "fragment shader does not declare {}",
                decl
            );
        }
    }
}
