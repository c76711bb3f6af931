//! Basic UI widgets
//!
//! Flat immediate-mode widgets drawn with macroquad primitives. Every
//! widget takes the frame's `UiContext` plus the rect it should fill and
//! returns whether it changed something this frame.

use macroquad::prelude::*;

use super::{Rect, UiContext};

/// Accent color (cyan)
pub const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

/// Dark panel background
pub const PANEL_BG: Color = Color::new(0.11, 0.11, 0.13, 0.92);

/// Section header background
pub const HEADER_COLOR: Color = Color::new(0.15, 0.15, 0.18, 1.0);

/// Primary text color
pub const TEXT_COLOR: Color = Color::new(0.8, 0.8, 0.85, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.5, 0.5, 0.55, 1.0);

const TRACK_COLOR: Color = Color::new(0.22, 0.22, 0.25, 1.0);
const HOVER_COLOR: Color = Color::new(0.35, 0.35, 0.38, 1.0);

pub const FONT_SIZE: f32 = 13.0;

/// Baseline that vertically centers `FONT_SIZE` text in a rect
fn text_baseline(rect: &Rect) -> f32 {
    (rect.y + (rect.h + FONT_SIZE * 0.6) * 0.5).round()
}

pub fn label(rect: &Rect, text: &str, color: Color) {
    draw_text(text, rect.x.round(), text_baseline(rect), FONT_SIZE, color);
}

/// Text button, returns true when clicked
pub fn button(ctx: &mut UiContext, rect: Rect, text: &str) -> bool {
    let hovered = ctx.mouse.inside(&rect);
    let bg = if hovered { HOVER_COLOR } else { TRACK_COLOR };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg);

    let dims = measure_text(text, None, FONT_SIZE as u16, 1.0);
    draw_text(
        text,
        (rect.x + (rect.w - dims.width) * 0.5).round(),
        text_baseline(&rect),
        FONT_SIZE,
        TEXT_COLOR,
    );
    ctx.mouse.clicked(&rect)
}

/// Checkbox with trailing label, returns true when toggled
pub fn checkbox(ctx: &mut UiContext, rect: Rect, text: &str, value: &mut bool) -> bool {
    let box_size = (rect.h - 4.0).min(14.0);
    let box_rect = Rect::new(
        rect.x,
        (rect.y + (rect.h - box_size) * 0.5).round(),
        box_size,
        box_size,
    );

    let hovered = ctx.mouse.inside(&rect);
    draw_rectangle(
        box_rect.x,
        box_rect.y,
        box_rect.w,
        box_rect.h,
        if hovered { HOVER_COLOR } else { TRACK_COLOR },
    );
    if *value {
        let inner = box_rect.pad(3.0);
        draw_rectangle(inner.x, inner.y, inner.w, inner.h, ACCENT_COLOR);
    }
    label(
        &Rect::new(box_rect.right() + 6.0, rect.y, rect.w, rect.h),
        text,
        TEXT_COLOR,
    );

    if ctx.mouse.clicked(&rect) {
        *value = !*value;
        true
    } else {
        false
    }
}

/// Horizontal slider with a leading label and trailing value readout.
/// Returns true while the value is changing.
pub fn slider(
    ctx: &mut UiContext,
    rect: Rect,
    text: &str,
    min: f32,
    max: f32,
    value: &mut f32,
) -> bool {
    let id = ctx.next_id();

    let (label_rect, rest) = rect.split_h_px((rect.w * 0.36).round());
    let (track_area, value_rect) = rest.split_h_px(rest.w - 46.0);
    label(&label_rect, text, TEXT_COLOR);

    let track = Rect::new(
        track_area.x,
        (track_area.y + track_area.h * 0.5 - 2.0).round(),
        (track_area.w - 10.0).max(1.0),
        4.0,
    );
    // Grab zone is taller than the visible track
    let grab = Rect::new(track.x, track_area.y, track.w, track_area.h);

    if ctx.mouse.left_pressed && ctx.mouse.inside(&grab) && ctx.dragging.is_none() {
        ctx.start_drag(id);
    }

    let mut changed = false;
    if ctx.is_dragging(id) {
        let t = ((ctx.mouse.x - track.x) / track.w).clamp(0.0, 1.0);
        let new_value = min + t * (max - min);
        changed = new_value != *value;
        *value = new_value;
    }

    let ratio = ((*value - min) / (max - min)).clamp(0.0, 1.0);
    draw_rectangle(track.x, track.y, track.w, track.h, TRACK_COLOR);
    draw_rectangle(track.x, track.y, track.w * ratio, track.h, ACCENT_COLOR);
    let knob_x = track.x + track.w * ratio;
    draw_circle(
        knob_x,
        track.y + track.h * 0.5,
        5.0,
        if ctx.is_dragging(id) { WHITE } else { TEXT_COLOR },
    );

    label(
        &Rect::new(value_rect.x + 6.0, value_rect.y, value_rect.w, value_rect.h),
        &format!("{:.2}", value),
        TEXT_DIM,
    );

    changed
}

/// Collapsible section header. Returns true when the open state toggled.
pub fn section_header(ctx: &mut UiContext, rect: Rect, title: &str, open: &mut bool) -> bool {
    let hovered = ctx.mouse.inside(&rect);
    draw_rectangle(
        rect.x,
        rect.y,
        rect.w,
        rect.h,
        if hovered { HOVER_COLOR } else { HEADER_COLOR },
    );
    let marker = if *open { "-" } else { "+" };
    label(&Rect::new(rect.x + 6.0, rect.y, 12.0, rect.h), marker, ACCENT_COLOR);
    label(
        &Rect::new(rect.x + 20.0, rect.y, rect.w - 20.0, rect.h),
        title,
        TEXT_COLOR,
    );

    if ctx.mouse.clicked(&rect) {
        *open = !*open;
        true
    } else {
        false
    }
}

/// Small solid swatch previewing an rgb color
pub fn color_swatch(rect: Rect, rgb: [f32; 3]) {
    draw_rectangle(
        rect.x,
        rect.y,
        rect.w,
        rect.h,
        Color::new(rgb[0], rgb[1], rgb[2], 1.0),
    );
}
