//! Input state for UI interaction

use macroquad::prelude::*;

use super::Rect;

/// Mouse button state
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool, // Just pressed this frame
}

impl MouseState {
    /// Sample the current frame's mouse state from macroquad
    pub fn poll() -> Self {
        let (x, y) = mouse_position();
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
        }
    }

    /// Check if mouse is inside a rect
    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }

    /// Check if mouse just clicked inside a rect
    pub fn clicked(&self, rect: &Rect) -> bool {
        self.left_pressed && rect.contains(self.x, self.y)
    }
}

/// UI context passed through the frame
pub struct UiContext {
    pub mouse: MouseState,
    /// ID of the widget currently being dragged (if any)
    pub dragging: Option<u64>,
    /// Counter for generating unique IDs
    id_counter: u64,
}

impl UiContext {
    pub fn new() -> Self {
        Self {
            mouse: MouseState::default(),
            dragging: None,
            id_counter: 0,
        }
    }

    /// Generate a unique ID for a widget
    pub fn next_id(&mut self) -> u64 {
        self.id_counter += 1;
        self.id_counter
    }

    /// Reset at start of frame (call before UI code)
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
        self.id_counter = 0;

        // Clear dragging if mouse released
        if !self.mouse.left_down {
            self.dragging = None;
        }
    }

    /// Check if this widget is being dragged
    pub fn is_dragging(&self, id: u64) -> bool {
        self.dragging == Some(id)
    }

    /// Start dragging a widget
    pub fn start_drag(&mut self, id: u64) {
        self.dragging = Some(id);
    }

    /// True while any widget owns the mouse
    pub fn mouse_captured(&self) -> bool {
        self.dragging.is_some()
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_released_on_mouse_up() {
        let mut ctx = UiContext::new();
        ctx.begin_frame(MouseState {
            left_down: true,
            ..Default::default()
        });
        ctx.start_drag(7);
        assert!(ctx.is_dragging(7));

        ctx.begin_frame(MouseState::default());
        assert!(!ctx.is_dragging(7));
        assert!(!ctx.mouse_captured());
    }

    #[test]
    fn test_held_drag_survives_a_guarded_claim() {
        // A slider grabs the mouse on the press frame; a later claimant that
        // checks ownership first (like the panel's click catch-all) must not
        // take it, and the slider still owns the drag on the next held frame.
        let mut ctx = UiContext::new();
        let pressed = MouseState {
            left_down: true,
            left_pressed: true,
            ..Default::default()
        };
        ctx.begin_frame(pressed);
        let slider_id = ctx.next_id();
        ctx.start_drag(slider_id);
        if ctx.dragging.is_none() {
            ctx.start_drag(u64::MAX);
        }
        assert!(ctx.is_dragging(slider_id));

        let held = MouseState {
            left_down: true,
            ..Default::default()
        };
        ctx.begin_frame(held);
        assert_eq!(ctx.next_id(), slider_id);
        assert!(ctx.is_dragging(slider_id));
        assert!(!ctx.is_dragging(u64::MAX));
    }

    #[test]
    fn test_ids_restart_each_frame() {
        let mut ctx = UiContext::new();
        let first = ctx.next_id();
        ctx.begin_frame(MouseState::default());
        assert_eq!(ctx.next_id(), first);
    }
}
