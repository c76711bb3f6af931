//! Settings panel
//!
//! One fixed panel on the left edge with collapsible sections for the
//! material, each light, and the background. The panel only mutates
//! `SceneSettings`; saving and loading are reported back to the caller.

use macroquad::prelude::*;

use crate::scene::{SceneSettings, POINT_LIGHT_COUNT};

use super::widgets::{
    self, FONT_SIZE, PANEL_BG, TEXT_DIM,
};
use super::{Rect, UiContext};

pub const PANEL_WIDTH: f32 = 300.0;
const ROW_H: f32 = 20.0;
const HEADER_H: f32 = 22.0;
const PAD: f32 = 8.0;

// Slider ranges, as (min, max)
const SHININESS_RANGE: (f32, f32) = (0.1, 64.0);
const EMISSIVE_RANGE: (f32, f32) = (0.0, 1.0);
const POSITION_RANGE: (f32, f32) = (-20.0, 20.0);
const POINT_FALLOFF_RANGE: (f32, f32) = (0.0, 0.5);
const CONE_RANGE: (f32, f32) = (1.0, 89.0);
const SPOT_FALLOFF_RANGE: (f32, f32) = (0.0, 1.0);

/// Panel action the caller must handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Save,
    Load,
}

/// Which sections are expanded
pub struct PanelState {
    pub material_open: bool,
    pub directional_open: bool,
    pub point_open: [bool; POINT_LIGHT_COUNT],
    pub spot_open: bool,
    pub background_open: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            material_open: true,
            directional_open: false,
            point_open: [false; POINT_LIGHT_COUNT],
            spot_open: true,
            background_open: false,
        }
    }
}

/// Walks the panel top to bottom, one row at a time
struct Rows {
    x: f32,
    y: f32,
    w: f32,
}

impl Rows {
    fn next(&mut self, height: f32) -> Rect {
        let rect = Rect::new(self.x, self.y, self.w, height);
        self.y += height + 2.0;
        rect
    }

    fn row(&mut self) -> Rect {
        self.next(ROW_H)
    }

    fn gap(&mut self, height: f32) {
        self.y += height;
    }
}

fn vec3_rows(ctx: &mut UiContext, rows: &mut Rows, labels: [&str; 3], value: &mut [f32; 3], min: f32, max: f32) {
    for (label, component) in labels.iter().zip(value.iter_mut()) {
        widgets::slider(ctx, rows.row(), label, min, max, component);
    }
}

/// Three channel sliders plus a swatch on the last row
fn color_rows(ctx: &mut UiContext, rows: &mut Rows, value: &mut [f32; 3]) {
    for (label, component) in ["Red", "Green", "Blue"].iter().zip(value.iter_mut()) {
        widgets::slider(ctx, rows.row(), label, 0.0, 1.0, component);
    }
    let rect = rows.row();
    widgets::color_swatch(Rect::new(rect.x + rect.w * 0.36, rect.y + 2.0, 60.0, rect.h - 4.0), *value);
}

/// Draw the panel and apply edits to `scene`. Returns the action the user
/// requested this frame, if any.
pub fn settings_panel(
    ctx: &mut UiContext,
    state: &mut PanelState,
    scene: &mut SceneSettings,
) -> PanelAction {
    let panel = Rect::new(0.0, 0.0, PANEL_WIDTH, screen_height());
    draw_rectangle(panel.x, panel.y, panel.w, panel.h, PANEL_BG);

    let inner = panel.pad(PAD);
    let mut rows = Rows {
        x: inner.x,
        y: inner.y,
        w: inner.w,
    };

    draw_text(
        "Shadebox",
        rows.x,
        rows.y + FONT_SIZE,
        FONT_SIZE + 4.0,
        widgets::TEXT_COLOR,
    );
    let fps_rect = rows.next(ROW_H + 4.0);
    let frame_ms = get_frame_time() * 1000.0;
    widgets::label(
        &Rect::new(fps_rect.x + inner.w - 110.0, fps_rect.y, 110.0, fps_rect.h),
        &format!("{:.1} FPS / {:.2} ms", get_fps() as f32, frame_ms),
        TEXT_DIM,
    );
    rows.gap(4.0);

    widgets::section_header(ctx, rows.next(HEADER_H), "Material", &mut state.material_open);
    if state.material_open {
        let (lo, hi) = SHININESS_RANGE;
        widgets::slider(ctx, rows.row(), "Shininess", lo, hi, &mut scene.material.shininess);
        let (lo, hi) = EMISSIVE_RANGE;
        widgets::slider(ctx, rows.row(), "Emissive", lo, hi, &mut scene.material.emissive_strength);
    }

    widgets::section_header(ctx, rows.next(HEADER_H), "Directional light", &mut state.directional_open);
    if state.directional_open {
        vec3_rows(
            ctx,
            &mut rows,
            ["Dir X", "Dir Y", "Dir Z"],
            &mut scene.directional.direction,
            -1.0,
            1.0,
        );
        color_rows(ctx, &mut rows, &mut scene.directional.color);
    }

    for i in 0..POINT_LIGHT_COUNT {
        let title = format!("Point light {}", i + 1);
        widgets::section_header(ctx, rows.next(HEADER_H), &title, &mut state.point_open[i]);
        if state.point_open[i] {
            let light = &mut scene.point_lights[i];
            vec3_rows(
                ctx,
                &mut rows,
                ["Pos X", "Pos Y", "Pos Z"],
                &mut light.position,
                POSITION_RANGE.0,
                POSITION_RANGE.1,
            );
            color_rows(ctx, &mut rows, &mut light.color);
            let (lo, hi) = POINT_FALLOFF_RANGE;
            widgets::slider(ctx, rows.row(), "Linear", lo, hi, &mut light.linear);
            widgets::slider(ctx, rows.row(), "Quadratic", lo, hi, &mut light.quadratic);
        }
    }

    widgets::section_header(ctx, rows.next(HEADER_H), "Flashlight", &mut state.spot_open);
    if state.spot_open {
        color_rows(ctx, &mut rows, &mut scene.spot.color);
        let (lo, hi) = CONE_RANGE;
        widgets::slider(ctx, rows.row(), "Inner cone", lo, hi, &mut scene.spot.cutoff_deg);
        widgets::slider(ctx, rows.row(), "Outer cone", lo, hi, &mut scene.spot.outer_cutoff_deg);
        // The soft edge needs the outer cone to stay outside the inner one
        if scene.spot.outer_cutoff_deg < scene.spot.cutoff_deg {
            scene.spot.outer_cutoff_deg = scene.spot.cutoff_deg;
        }
        let (lo, hi) = SPOT_FALLOFF_RANGE;
        widgets::slider(ctx, rows.row(), "Linear", lo, hi, &mut scene.spot.linear);
        widgets::slider(ctx, rows.row(), "Quadratic", lo, hi, &mut scene.spot.quadratic);
    }

    widgets::section_header(ctx, rows.next(HEADER_H), "Background", &mut state.background_open);
    if state.background_open {
        // Alpha stays fixed, only rgb is editable
        for (label, channel) in ["Red", "Green", "Blue"].iter().zip(scene.background.iter_mut()) {
            widgets::slider(ctx, rows.row(), label, 0.0, 1.0, channel);
        }
    }

    rows.gap(6.0);
    widgets::checkbox(ctx, rows.row(), "Wireframe", &mut scene.wireframe);

    rows.gap(6.0);
    let buttons = rows.next(ROW_H + 2.0);
    let (save_rect, rest) = buttons.split_h_px(buttons.w * 0.5 - 2.0);
    let (_, load_rect) = rest.split_h_px(4.0);

    let mut action = PanelAction::None;
    if widgets::button(ctx, save_rect, "Save scene") {
        action = PanelAction::Save;
    }
    if widgets::button(ctx, load_rect, "Load scene") {
        action = PanelAction::Load;
    }

    rows.gap(8.0);
    widgets::label(
        &rows.row(),
        "R grabs the mouse, Esc quits",
        TEXT_DIM,
    );

    // Clicks on the panel must not leak into camera controls. A widget that
    // already owns the mouse keeps it.
    if ctx.mouse.inside(&panel) && ctx.mouse.left_down && ctx.dragging.is_none() {
        ctx.start_drag(u64::MAX);
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_advance_downward() {
        let mut rows = Rows {
            x: 0.0,
            y: 10.0,
            w: 100.0,
        };
        let first = rows.row();
        let second = rows.row();
        assert_eq!(first.y, 10.0);
        assert!(second.y > first.bottom());
        assert_eq!(second.w, 100.0);
    }

    #[test]
    fn test_slider_ranges_cover_scene_defaults() {
        let scene = SceneSettings::default();
        let within = |(lo, hi): (f32, f32), v: f32| lo <= v && v <= hi;

        assert!(within(SHININESS_RANGE, scene.material.shininess));
        assert!(within(EMISSIVE_RANGE, scene.material.emissive_strength));
        for light in &scene.point_lights {
            for p in light.position {
                assert!(within(POSITION_RANGE, p));
            }
            assert!(within(POINT_FALLOFF_RANGE, light.linear));
            assert!(within(POINT_FALLOFF_RANGE, light.quadratic));
        }
        assert!(within(CONE_RANGE, scene.spot.cutoff_deg));
        assert!(within(CONE_RANGE, scene.spot.outer_cutoff_deg));
        // Flashlight falloff is editable over the same span as its defaults
        assert!(within(SPOT_FALLOFF_RANGE, scene.spot.linear));
        assert!(within(SPOT_FALLOFF_RANGE, scene.spot.quadratic));
    }

    #[test]
    fn test_default_state_opens_material_and_spot() {
        let state = PanelState::default();
        assert!(state.material_open);
        assert!(state.spot_open);
        assert!(!state.directional_open);
    }
}
