use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use glam::{Quat, Vec3};
use steer_graph::graph::Rgba;

const NEAR_PLANE: f32 = 0.5;

/// Perspective camera circling `target`. Yaw and pitch are ignored while the
/// layout is planar so the plane is always seen face on.
#[derive(Clone, Copy, Debug)]
pub(super) struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: Vec3,
    pub pan: Vec2,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.4,
            pitch: 0.3,
            distance: 45.0,
            target: Vec3::ZERO,
            pan: Vec2::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Projected {
    pub pos: Pos2,
    /// Pixels per world unit at this depth.
    pub scale: f32,
    pub depth: f32,
}

impl OrbitCamera {
    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw += delta.x * 0.008;
        self.pitch = (self.pitch + delta.y * 0.008).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(2.0, 800.0);
    }

    fn rotation(&self, planar: bool) -> Quat {
        if planar {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(-self.yaw)
        }
    }

    pub fn project(&self, rect: Rect, planar: bool, world: Vec3) -> Option<Projected> {
        let view = self.rotation(planar) * (world - self.target);
        let depth = self.distance - view.z;
        if depth <= NEAR_PLANE {
            return None;
        }

        let scale = rect.height() * 0.9 / depth;
        Some(Projected {
            pos: rect.center() + self.pan + vec2(view.x, -view.y) * scale,
            scale,
            depth,
        })
    }
}

pub(super) fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), color.a())
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Fades far objects toward the background.
pub(super) fn depth_fade(color: Color32, depth: f32, distance: f32) -> Color32 {
    let fade = ((depth / distance.max(1.0)) - 1.0).clamp(0.0, 1.0) * 0.6;
    blend_color(color, BACKGROUND, fade)
}

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = 56.0;
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

/// Corners of a flat arrow head pointing from `base` to `tip`.
pub(super) fn arrow_triangle(base: Pos2, tip: Pos2, half_width: f32) -> Option<[Pos2; 3]> {
    let along = tip - base;
    if along.length_sq() <= f32::EPSILON {
        return None;
    }
    let side = along.normalized().rot90() * half_width;
    Some([tip, base + side, base - side])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(200.0, 100.0))
    }

    #[test]
    fn target_projects_to_center() {
        let camera = OrbitCamera::default();
        let projected = camera
            .project(viewport(), false, Vec3::ZERO)
            .expect("in front of the camera");
        assert!((projected.pos - pos2(100.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn planar_view_keeps_axes() {
        let camera = OrbitCamera::default();
        let right = camera
            .project(viewport(), true, Vec3::X)
            .expect("in front of the camera");
        let up = camera
            .project(viewport(), true, Vec3::Y)
            .expect("in front of the camera");
        assert!(right.pos.x > 100.0);
        assert!(up.pos.y < 50.0);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let camera = OrbitCamera::default();
        assert!(
            camera
                .project(viewport(), true, Vec3::new(0.0, 0.0, 100.0))
                .is_none()
        );
    }
}
