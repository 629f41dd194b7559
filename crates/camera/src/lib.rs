#![warn(missing_docs)]
//! Orthographic orbit camera for the layer stack view.
//!
//! The eye sits on a sphere around a target point (radius, azimuth `theta`,
//! polar angle `phi` measured from +Y). Mouse input accumulates pending
//! rotation and pan which [`OrbitCamera::update`] applies once per frame,
//! optionally with damping.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Vertical extent of the view volume at zoom 1.
pub const FRUSTUM_SIZE: f32 = 100.0;
/// Zoom multiplier per wheel step.
pub const ZOOM_STEP: f32 = 0.95;
/// Smallest allowed zoom.
pub const MIN_ZOOM: f32 = 0.05;
/// Largest allowed zoom.
pub const MAX_ZOOM: f32 = 50.0;

/// Offset of the eye from the target after recentering.
const HOME_OFFSET: Vec3 = Vec3::new(40.0, 40.0, 40.0);
const MIN_PHI: f32 = 1e-3;
const MAX_PHI: f32 = PI - 1e-3;
/// Pending motion below this is dropped.
const SETTLE_EPSILON: f32 = 1e-6;

/// Tunables for the orbit controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    /// Smooth out motion over several frames.
    pub damping: bool,
    /// Fraction of pending motion applied per frame when damping.
    pub damping_factor: f32,
    /// Rotation speed multiplier.
    pub rotate_speed: f32,
    /// Wheel zoom speed multiplier.
    pub zoom_speed: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

/// Orthographic camera orbiting a target point.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera looks at and orbits around.
    pub target: Vec3,
    /// Distance from eye to target.
    pub radius: f32,
    /// Azimuth around +Y.
    pub theta: f32,
    /// Polar angle from +Y.
    pub phi: f32,
    /// Orthographic zoom; larger shows less of the scene.
    pub zoom: f32,
    /// Viewport width over height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    settings: OrbitSettings,
    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}

impl OrbitCamera {
    /// Camera looking at the origin from the home offset.
    pub fn new(settings: OrbitSettings) -> Self {
        let mut camera = Self {
            target: Vec3::ZERO,
            radius: 1.0,
            theta: 0.0,
            phi: 0.0,
            zoom: 1.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
            settings,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
        };
        camera.look_at_network(0.0);
        camera
    }

    /// Current control settings.
    pub fn settings(&self) -> OrbitSettings {
        self.settings
    }

    /// Aim at the middle of a stack whose center lies at `center_z`.
    ///
    /// The eye moves to `(40, 40, 40 + center_z)`. Pending motion is dropped;
    /// zoom is left alone.
    pub fn look_at_network(&mut self, center_z: f32) {
        self.target = Vec3::new(0.0, 0.0, center_z);
        self.radius = HOME_OFFSET.length();
        self.theta = HOME_OFFSET.x.atan2(HOME_OFFSET.z);
        self.phi = (HOME_OFFSET.y / self.radius).acos();
        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
        self.pending_pan = Vec3::ZERO;
        tracing::debug!(center_z, "camera recentered");
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.target
            + self.radius * Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }

    /// Unit vector along the view's horizontal axis.
    pub fn right(&self) -> Vec3 {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(cos_theta, 0.0, -sin_theta)
    }

    /// Unit vector along the view's vertical axis.
    pub fn up(&self) -> Vec3 {
        let forward = (self.target - self.eye()).normalize_or_zero();
        self.right().cross(forward).normalize_or_zero()
    }

    /// Half extents of the view volume as `(half_width, half_height)`.
    pub fn half_extents(&self) -> Vec2 {
        let half_height = FRUSTUM_SIZE / 2.0 / self.zoom;
        Vec2::new(half_height * self.aspect, half_height)
    }

    /// World to view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// View to clip transform (depth in `[0, 1]`).
    pub fn projection_matrix(&self) -> Mat4 {
        let half = self.half_extents();
        Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, self.near, self.far)
    }

    /// Combined world to clip transform.
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Track a new viewport size. A zero height is ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Queue a rotation for a mouse drag of `delta` pixels.
    ///
    /// A drag the full height of the viewport turns the view once around.
    pub fn rotate(&mut self, delta: Vec2, viewport: Vec2) {
        if viewport.y <= 0.0 {
            return;
        }
        let scale = TAU / viewport.y * self.settings.rotate_speed;
        self.pending_theta -= delta.x * scale;
        self.pending_phi -= delta.y * scale;
    }

    /// Queue a pan so the scene follows a drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2, viewport: Vec2) {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        let half = self.half_extents();
        let world_per_pixel = Vec2::new(2.0 * half.x / viewport.x, 2.0 * half.y / viewport.y);
        self.pending_pan += -self.right() * delta.x * world_per_pixel.x
            + self.up() * delta.y * world_per_pixel.y;
    }

    /// Zoom by wheel `steps`; positive steps zoom in.
    pub fn zoom_by(&mut self, steps: f32) {
        let scale = ZOOM_STEP.powf(steps * self.settings.zoom_speed);
        self.zoom = (self.zoom / scale).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Whether queued motion is still being applied.
    pub fn is_moving(&self) -> bool {
        self.pending_theta.abs() > SETTLE_EPSILON
            || self.pending_phi.abs() > SETTLE_EPSILON
            || self.pending_pan.length_squared() > SETTLE_EPSILON * SETTLE_EPSILON
    }

    /// Apply queued motion for one frame.
    pub fn update(&mut self) {
        let step = if self.settings.damping {
            self.settings.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.theta = (self.theta + self.pending_theta * step).rem_euclid(TAU);
        self.phi = (self.phi + self.pending_phi * step).clamp(MIN_PHI, MAX_PHI);
        self.target += self.pending_pan * step;

        let keep = 1.0 - step;
        self.pending_theta *= keep;
        self.pending_phi *= keep;
        self.pending_pan *= keep;

        if !self.is_moving() {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_pan = Vec3::ZERO;
        }
    }

    /// Project a world point to viewport pixels (origin top-left).
    ///
    /// Returns `None` when the point is outside the view volume.
    pub fn project_to_screen(&self, world: Vec3, viewport: Vec2) -> Option<Vec2> {
        let clip = self.view_proj() * world.extend(1.0);
        if clip.w.abs() <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.x)
            || !(-1.0..=1.0).contains(&ndc.y)
            || !(0.0..=1.0).contains(&ndc.z)
        {
            return None;
        }
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undamped() -> OrbitCamera {
        OrbitCamera::new(OrbitSettings {
            damping: false,
            ..OrbitSettings::default()
        })
    }

    #[test]
    fn recenter_places_eye_at_home_offset() {
        let mut camera = OrbitCamera::default();
        camera.look_at_network(12.5);
        assert_eq!(camera.target, Vec3::new(0.0, 0.0, 12.5));
        let eye = camera.eye();
        assert!(eye.abs_diff_eq(Vec3::new(40.0, 40.0, 52.5), 1e-3), "{eye:?}");
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let mut camera = OrbitCamera::default();
        camera.look_at_network(30.0);
        camera.set_aspect(800, 600);
        let viewport = Vec2::new(800.0, 600.0);
        let screen = camera
            .project_to_screen(camera.target, viewport)
            .expect("target visible");
        assert!(screen.abs_diff_eq(viewport / 2.0, 1e-2), "{screen:?}");
    }

    #[test]
    fn points_outside_the_volume_are_hidden() {
        let camera = OrbitCamera::default();
        let viewport = Vec2::new(800.0, 600.0);
        let far_right = camera.target + camera.right() * 10_000.0;
        assert!(camera.project_to_screen(far_right, viewport).is_none());
        let behind = camera.eye() + (camera.eye() - camera.target);
        assert!(camera.project_to_screen(behind, viewport).is_none());
    }

    #[test]
    fn rotation_clamps_at_the_poles() {
        let mut camera = undamped();
        camera.rotate(Vec2::new(0.0, 100_000.0), Vec2::new(800.0, 600.0));
        camera.update();
        assert!(camera.phi >= MIN_PHI);
        camera.rotate(Vec2::new(0.0, -100_000.0), Vec2::new(800.0, 600.0));
        camera.update();
        assert!(camera.phi <= MAX_PHI);
        assert!(camera.eye().is_finite());
    }

    #[test]
    fn full_height_drag_turns_once_around() {
        let mut camera = undamped();
        let before = camera.theta;
        camera.rotate(Vec2::new(600.0, 0.0), Vec2::new(800.0, 600.0));
        camera.update();
        let diff = (camera.theta - before).rem_euclid(TAU);
        assert!(diff < 1e-4 || (TAU - diff) < 1e-4, "diff {diff}");
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom_by(1.0);
        assert!((camera.zoom - 1.0 / ZOOM_STEP).abs() < 1e-5);
        camera.zoom_by(10_000.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
        camera.zoom_by(-10_000.0);
        assert_eq!(camera.zoom, MIN_ZOOM);
    }

    #[test]
    fn damping_converges_to_the_full_motion() {
        let mut camera = OrbitCamera::default();
        let start = camera.theta;
        camera.rotate(Vec2::new(-60.0, 0.0), Vec2::new(800.0, 600.0));
        let expected = TAU * 60.0 / 600.0;

        camera.update();
        assert!(camera.is_moving());
        assert!((camera.theta - start - expected * 0.05).abs() < 1e-4);

        for _ in 0..1000 {
            camera.update();
        }
        assert!(!camera.is_moving());
        assert!((camera.theta - start - expected).abs() < 1e-3);
    }

    #[test]
    fn pan_moves_target_in_view_plane() {
        let mut camera = undamped();
        camera.set_aspect(800, 600);
        let forward = (camera.target - camera.eye()).normalize();
        let before = camera.target;
        camera.pan(Vec2::new(80.0, 0.0), Vec2::new(800.0, 600.0));
        camera.update();
        let moved = camera.target - before;
        assert!(moved.dot(forward).abs() < 1e-3);
        // A tenth of the viewport width is a tenth of the view width.
        let expected = camera.half_extents().x * 2.0 / 10.0;
        assert!((moved.length() - expected).abs() < 1e-3);
        assert!(moved.dot(camera.right()) < 0.0);
    }

    #[test]
    fn zero_height_resize_is_ignored() {
        let mut camera = OrbitCamera::default();
        camera.set_aspect(800, 400);
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect, 2.0);
    }
}
