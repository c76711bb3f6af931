//! Shadebox: an interactive lighting sandbox
//!
//! A field of textured cubes and a loaded OBJ model, lit by a directional
//! light, four point lights and a camera-mounted flashlight. Every lighting
//! parameter is editable live from the settings panel; fly around with
//! WASD + mouse.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod model;
mod render;
mod scene;
mod ui;

use macroquad::prelude::*;

use model::Model;
use render::{
    draw_edges, load_scene_materials, load_texture_or_placeholder, unique_edges, unit_cube,
    upload_lighting, FlyCamera, MoveDir, SceneMaterials,
};
use scene::{SceneSettings, CUBE_POSITIONS, SETTINGS_FILE};
use ui::{settings_panel, MouseState, PanelAction, PanelState, UiContext, PANEL_WIDTH};

const MODEL_PATH: &str = "assets/models/crate_stack.obj";
const EDGE_COLOR: Color = Color::new(0.9, 0.9, 0.9, 1.0);

/// Marker cubes at point light positions are drawn at this scale
const LIGHT_MARKER_SCALE: f32 = 0.2;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Shadebox v{}", VERSION),
        window_width: 1600,
        window_height: 900,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Rotation of cube `i`: a fixed axis, spinning at a per-cube rate
fn cube_rotation(i: usize, time: f32) -> Mat4 {
    let axis = vec3(1.0, 0.3, 0.5).normalize();
    let angle = time * (20.0 * i as f32).to_radians();
    Mat4::from_axis_angle(axis, angle)
}

/// Per-object transforms go through macroquad's model matrix stack
fn push_model_matrix(matrix: Mat4) {
    unsafe { get_internal_gl().quad_gl.push_model_matrix(matrix) };
}

fn pop_model_matrix() {
    unsafe { get_internal_gl().quad_gl.pop_model_matrix() };
}

fn apply_movement(camera: &mut FlyCamera, dt: f32) {
    if is_key_down(KeyCode::W) {
        camera.process_keyboard(MoveDir::Forward, dt);
    }
    if is_key_down(KeyCode::S) {
        camera.process_keyboard(MoveDir::Backward, dt);
    }
    if is_key_down(KeyCode::A) {
        camera.process_keyboard(MoveDir::Left, dt);
    }
    if is_key_down(KeyCode::D) {
        camera.process_keyboard(MoveDir::Right, dt);
    }
    if is_key_down(KeyCode::E) {
        camera.process_keyboard(MoveDir::Up, dt);
    }
    if is_key_down(KeyCode::Q) {
        camera.process_keyboard(MoveDir::Down, dt);
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let mut scene = SceneSettings::load_or_default(SETTINGS_FILE);

    let materials: SceneMaterials = match load_scene_materials() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to compile scene shaders: {}", e);
            return;
        }
    };

    let cube_diffuse = load_texture_or_placeholder("assets/textures/container2.png").await;
    let cube_specular = load_texture_or_placeholder("assets/textures/container2_specular.png").await;
    let cube_emissive = load_texture_or_placeholder("assets/textures/matrix.png").await;

    let cube = unit_cube(Some(cube_diffuse));
    let cube_edges = unique_edges(&cube.vertices, &cube.indices);
    let marker = unit_cube(None);

    let model = match Model::load(MODEL_PATH).await {
        Ok(model) => Some(model),
        Err(e) => {
            eprintln!("Failed to load {}: {}", MODEL_PATH, e);
            None
        }
    };

    let mut camera = FlyCamera::new(vec3(0.0, 0.0, 3.0));
    let mut ui_ctx = UiContext::new();
    let mut panel_state = PanelState::default();

    // Mouse look is off until the cursor is grabbed with R
    let mut mouse_grabbed = false;
    let mut last_mouse: Option<Vec2> = None;

    println!("=== Shadebox ===");
    println!("WASD move, QE up/down, R grab mouse, scroll zoom, Esc quit");

    loop {
        let dt = get_frame_time();

        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::R) {
            mouse_grabbed = !mouse_grabbed;
            set_cursor_grab(mouse_grabbed);
            show_mouse(!mouse_grabbed);
            // Skip the first delta after grabbing so the view doesn't jump
            last_mouse = None;
        }

        ui_ctx.begin_frame(MouseState::poll());

        if !ui_ctx.mouse_captured() {
            apply_movement(&mut camera, dt);
            camera.process_scroll(mouse_wheel().1 * 0.05);
        }

        if mouse_grabbed {
            let mouse = vec2(mouse_position().0, mouse_position().1);
            if let Some(last) = last_mouse {
                let delta = mouse - last;
                // Inverted Y so pushing the mouse forward looks up
                camera.process_mouse(delta.x, -delta.y);
            }
            last_mouse = Some(mouse);
        }

        let bg = scene.background;
        clear_background(Color::new(bg[0], bg[1], bg[2], bg[3]));

        set_camera(&camera.to_camera3d());
        upload_lighting(&materials.lit, &scene, &camera);

        let time = get_time() as f32;

        if scene.wireframe {
            for (i, pos) in CUBE_POSITIONS.iter().enumerate() {
                push_model_matrix(Mat4::from_translation(*pos) * cube_rotation(i, time));
                draw_edges(&cube_edges, EDGE_COLOR);
                pop_model_matrix();
            }
            if let Some(model) = &model {
                draw_edges(model.edges(), EDGE_COLOR);
            }
        } else {
            gl_use_material(&materials.lit);
            materials.lit.set_texture("SpecularMap", cube_specular.clone());
            materials.lit.set_texture("EmissiveMap", cube_emissive.clone());
            for (i, pos) in CUBE_POSITIONS.iter().enumerate() {
                push_model_matrix(Mat4::from_translation(*pos) * cube_rotation(i, time));
                draw_mesh(&cube);
                pop_model_matrix();
            }
            if let Some(model) = &model {
                model.draw(&materials.lit);
            }
            gl_use_default_material();
        }

        // Light markers are always flat-shaded in the light's color
        gl_use_material(&materials.flat);
        for light in &scene.point_lights {
            materials.flat.set_uniform("flatColor", Vec3::from(light.color));
            push_model_matrix(
                Mat4::from_translation(Vec3::from(light.position))
                    * Mat4::from_scale(Vec3::splat(LIGHT_MARKER_SCALE)),
            );
            draw_mesh(&marker);
            pop_model_matrix();
        }
        gl_use_default_material();

        set_default_camera();

        // The panel eats mouse input while the cursor is free
        if !mouse_grabbed {
            match settings_panel(&mut ui_ctx, &mut panel_state, &mut scene) {
                PanelAction::Save => match scene.save(SETTINGS_FILE) {
                    Ok(()) => println!("Saved settings to {}", SETTINGS_FILE),
                    Err(e) => eprintln!("Failed to save {}: {}", SETTINGS_FILE, e),
                },
                PanelAction::Load => {
                    scene = SceneSettings::load_or_default(SETTINGS_FILE);
                }
                PanelAction::None => {}
            }
        } else {
            draw_text(
                "R releases the mouse",
                PANEL_WIDTH * 0.5,
                24.0,
                16.0,
                Color::new(0.7, 0.7, 0.7, 0.8),
            );
        }

        next_frame().await
    }
}
