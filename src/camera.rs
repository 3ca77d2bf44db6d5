use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCamera>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, (orbit_input, apply_orbit).chain());
    }
}

/// Orbit state around a focus point; the camera transform is derived from it
#[derive(Resource, Debug, Clone)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Radians per pixel of drag
    pub rotate_speed: f32,
    /// Fraction of the radius per scroll line
    pub zoom_speed: f32,
}

const MIN_RADIUS: f32 = 1.0;
const MAX_RADIUS: f32 = 200.0;
const PITCH_LIMIT: f32 = 1.54;

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            radius: 10.0,
            yaw: 0.0,
            pitch: 0.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        self.focus + rotation * Vec3::new(0.0, 0.0, self.radius)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.focus, Vec3::Y)
    }

    /// Drag delta in pixels; pitch stops short of the poles
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.rotate_speed;
        self.pitch = (self.pitch - delta.y * self.rotate_speed).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Positive lines zoom in
    pub fn zoom(&mut self, lines: f32) {
        self.radius = (self.radius * (1.0 - lines * self.zoom_speed)).clamp(MIN_RADIUS, MAX_RADIUS);
    }
}

#[derive(Component)]
pub struct MainCamera;

/// Perspective camera 10 units down +Z looking at the origin
fn setup_camera(mut commands: Commands, orbit: Res<OrbitCamera>) {
    // Unlit flat colours; no LUT-based tonemapping
    commands.spawn((
        Camera3d::default(),
        Tonemapping::None,
        orbit.transform(),
        MainCamera,
    ));
}

fn orbit_input(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    mut orbit: ResMut<OrbitCamera>,
) {
    if mouse_buttons.pressed(MouseButton::Left) && motion.delta != Vec2::ZERO {
        orbit.rotate(motion.delta);
    }

    if scroll.delta.y != 0.0 {
        let lines = match scroll.unit {
            MouseScrollUnit::Line => scroll.delta.y,
            MouseScrollUnit::Pixel => scroll.delta.y / 100.0,
        };
        orbit.zoom(lines);
    }
}

fn apply_orbit(orbit: Res<OrbitCamera>, mut cameras: Query<&mut Transform, With<MainCamera>>) {
    if !orbit.is_changed() {
        return;
    }
    for mut transform in &mut cameras {
        *transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eye_on_positive_z() {
        let eye = OrbitCamera::default().eye();
        assert!((eye - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5, "eye at {:?}", eye);
    }

    #[test]
    fn test_rotation_keeps_radius() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(120.0, -80.0));
        assert!((orbit.eye().length() - orbit.radius).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(0.0, 1.0e6));
        assert_eq!(orbit.pitch, -PITCH_LIMIT);
        orbit.rotate(Vec2::new(0.0, -1.0e6));
        assert_eq!(orbit.pitch, PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.zoom(1.0);
        assert!((orbit.radius - 9.0).abs() < 1e-5);
        orbit.zoom(100.0);
        assert_eq!(orbit.radius, MIN_RADIUS);
        for _ in 0..200 {
            orbit.zoom(-5.0);
        }
        assert_eq!(orbit.radius, MAX_RADIUS);
    }
}
