// ============================================================================
// COLOUR AND SIZE MAPPING shared by both renderers
// ============================================================================

use bevy::color::Color;

/// Light yellow used for every point
pub const POINT_COLOR: Color = Color::srgb(1.0, 1.0, 0.7);

/// Blend factor between red (0.0) and green (1.0) for a spring tension
///
/// Peaks at rest length and falls off on both sides. Mirrors the ramp in
/// `shaders/tension_line.wgsl` with the default scale 3 and offset 2.
pub fn tension_mix(tension: f32) -> f32 {
    let k = tension * 3.0 - 2.0;
    let t = if k < 1.0 { k } else { 2.0 - k };
    t.clamp(0.0, 1.0)
}

/// Line colour for a spring tension (linear space, same as the shader output)
pub fn tension_color(tension: f32) -> Color {
    let t = tension_mix(tension);
    Color::linear_rgb(1.0 - t, t, 0.0)
}

/// Point radius grows with the cube root of mass
pub fn point_radius(mass: f32, point_size: f32) -> f32 {
    point_size * mass.cbrt()
}
