//! First-person fly camera
//!
//! Yaw/pitch orientation with derived basis vectors, WASD-style movement and
//! scroll zoom. Pitch is clamped just short of straight up/down so the basis
//! never degenerates.

use macroquad::camera::Camera3D;
use macroquad::prelude::*;

const WORLD_UP: Vec3 = Vec3::Y;
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

const DEFAULT_SPEED: f32 = 2.5;
const DEFAULT_SENSITIVITY: f32 = 0.0025;
const MIN_FOV_DEG: f32 = 1.0;
const MAX_FOV_DEG: f32 = 45.0;

/// Direction of camera movement relative to its current orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDir {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Debug)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Yaw around the world up axis, radians. -PI/2 looks down -Z.
    pub yaw: f32,
    /// Pitch, radians, clamped to (-PI/2, PI/2)
    pub pitch: f32,
    /// Vertical field of view in degrees, adjusted by scroll zoom
    pub fov_deg: f32,

    pub speed: f32,
    pub sensitivity: f32,

    // Computed basis vectors
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl FlyCamera {
    pub fn new(position: Vec3) -> Self {
        let mut cam = Self {
            position,
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            fov_deg: MAX_FOV_DEG,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        cam.update_basis();
        cam
    }

    fn update_basis(&mut self) {
        self.front = vec3(
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.sin(),
        )
        .normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front);
    }

    /// Move in a camera-relative direction. Vertical movement is along the
    /// world up axis so Q/E stay predictable while looking up or down.
    pub fn process_keyboard(&mut self, dir: MoveDir, dt: f32) {
        let velocity = self.speed * dt;
        let step = match dir {
            MoveDir::Forward => self.front,
            MoveDir::Backward => -self.front,
            MoveDir::Left => -self.right,
            MoveDir::Right => self.right,
            MoveDir::Up => WORLD_UP,
            MoveDir::Down => -WORLD_UP,
        };
        self.position += step * velocity;
    }

    /// Apply a mouse delta (pixels) to yaw and pitch.
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_basis();
    }

    /// Scroll zoom: narrows or widens the field of view.
    pub fn process_scroll(&mut self, delta: f32) {
        self.fov_deg = (self.fov_deg - delta).clamp(MIN_FOV_DEG, MAX_FOV_DEG);
    }

    /// Macroquad camera for the current state. fovy is in radians.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position,
            target: self.position + self.front,
            up: self.up,
            fovy: self.fov_deg.to_radians(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_orientation_looks_down_negative_z() {
        let cam = FlyCamera::new(vec3(0.0, 0.0, 3.0));
        assert!((cam.front - Vec3::NEG_Z).length() < 1e-5);
        assert!((cam.right - Vec3::X).length() < 1e-5);
        assert!((cam.up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut cam = FlyCamera::new(Vec3::ZERO);
        cam.process_mouse(0.0, 100000.0);
        assert!(cam.pitch <= PITCH_LIMIT);
        cam.process_mouse(0.0, -200000.0);
        assert!(cam.pitch >= -PITCH_LIMIT);
        // Basis stays orthonormal at the extremes
        assert!((cam.front.length() - 1.0).abs() < 1e-5);
        assert!(cam.front.dot(cam.right).abs() < 1e-5);
        assert!(cam.front.dot(cam.up).abs() < 1e-5);
    }

    #[test]
    fn test_forward_movement_follows_front() {
        let mut cam = FlyCamera::new(Vec3::ZERO);
        cam.process_keyboard(MoveDir::Forward, 1.0);
        assert!((cam.position - Vec3::NEG_Z * cam.speed).length() < 1e-5);
    }

    #[test]
    fn test_vertical_movement_is_world_aligned() {
        let mut cam = FlyCamera::new(Vec3::ZERO);
        cam.process_mouse(0.0, 400.0); // pitch up
        cam.process_keyboard(MoveDir::Up, 1.0);
        assert!((cam.position.x.abs()) < 1e-5);
        assert!((cam.position.z.abs()) < 1e-5);
        assert!(cam.position.y > 0.0);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut cam = FlyCamera::new(Vec3::ZERO);
        cam.process_scroll(1000.0);
        assert_eq!(cam.fov_deg, MIN_FOV_DEG);
        cam.process_scroll(-1000.0);
        assert_eq!(cam.fov_deg, MAX_FOV_DEG);
    }
}
