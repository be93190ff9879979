use std::f32::consts::PI;

use glam::DVec3;

use crate::error::{CoreError, CoreResult};
use crate::ray::Ray;
use crate::transform::{Basis, RigidTransform, rodrigues};
use crate::{Mat4, Vec3, Vec4};

/// Basis drift beyond this is reported before re-orthonormalising.
pub const DRIFT_TOLERANCE: f32 = 1e-3;

/// Lens and screen parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view, radians.
    pub fov_y_rad: f32,
    pub width: u32,
    pub height: u32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_rad: 90f32.to_radians(),
            width: 1920,
            height: 1080,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

impl CameraConfig {
    fn validate(&self) -> CoreResult<()> {
        validate_fov(self.fov_y_rad)?;
        validate_clip(self.z_near, self.z_far)?;
        validate_screen(self.width, self.height)
    }
}

fn validate_fov(fov_y_rad: f32) -> CoreResult<()> {
    if fov_y_rad > 0.0 && fov_y_rad < PI {
        Ok(())
    } else {
        Err(CoreError::InvalidFov(fov_y_rad))
    }
}

fn validate_clip(near: f32, far: f32) -> CoreResult<()> {
    if near > 0.0 && near < far && far.is_finite() {
        Ok(())
    } else {
        Err(CoreError::InvalidClipPlanes { near, far })
    }
}

fn validate_screen(width: u32, height: u32) -> CoreResult<()> {
    if width > 0 && height > 0 {
        Ok(())
    } else {
        Err(CoreError::InvalidScreenSize { width, height })
    }
}

/// Free-flight perspective camera (right-handed, OpenGL clip space).
///
/// Matrices are recomputed eagerly by every mutating call, so the cached
/// `projection`/`view` always reflect the current pose.
#[derive(Clone, Debug)]
pub struct Camera {
    position: Vec3,
    basis: Basis,
    config: CameraConfig,
    aspect: f32,
    projection: Mat4,
    view: Mat4,
}

impl Camera {
    /// Build from an explicit `(forward, left, up)` triad.
    ///
    /// The vectors are normalised; zero-length, non-orthogonal or
    /// left-handed triads are rejected.
    pub fn new(
        config: CameraConfig,
        position: Vec3,
        forward: Vec3,
        left: Vec3,
        up: Vec3,
    ) -> CoreResult<Self> {
        let forward = forward
            .try_normalize()
            .ok_or(CoreError::DegenerateBasis("forward"))?;
        let left = left
            .try_normalize()
            .ok_or(CoreError::DegenerateBasis("left"))?;
        let up = up.try_normalize().ok_or(CoreError::DegenerateBasis("up"))?;

        let basis = Basis { forward, left, up };
        let error = basis.orthonormal_error();
        if error > DRIFT_TOLERANCE {
            return Err(CoreError::NonOrthonormalBasis(error));
        }
        if forward.cross(left).dot(up) <= 0.0 {
            return Err(CoreError::LeftHandedBasis);
        }

        Self::with_basis(config, position, basis.reorthonormalized())
    }

    /// Build from Euler angles (radians) applied to the canonical basis:
    /// yaw about up, then pitch about left, then roll about forward.
    pub fn from_euler(
        config: CameraConfig,
        position: Vec3,
        yaw: f32,
        pitch: f32,
        roll: f32,
    ) -> CoreResult<Self> {
        Self::with_basis(config, position, Basis::from_euler(yaw, pitch, roll))
    }

    fn with_basis(config: CameraConfig, position: Vec3, basis: Basis) -> CoreResult<Self> {
        config.validate()?;
        let mut cam = Self {
            position,
            basis,
            config,
            aspect: config.width as f32 / config.height as f32,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        };
        cam.recalc_projection();
        cam.recalc_view();
        log::debug!(
            "Camera created at {:?}, forward={:?}, fov={:.3} rad, {}x{}",
            cam.position,
            cam.basis.forward,
            config.fov_y_rad,
            config.width,
            config.height
        );
        Ok(cam)
    }

    // ---- accessors

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.basis.forward
    }

    #[inline]
    pub fn left(&self) -> Vec3 {
        self.basis.left
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.basis.up
    }

    #[inline]
    pub fn basis(&self) -> Basis {
        self.basis
    }

    #[inline]
    pub fn config(&self) -> CameraConfig {
        self.config
    }

    #[inline]
    pub fn fov_y_rad(&self) -> f32 {
        self.config.fov_y_rad
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn z_near(&self) -> f32 {
        self.config.z_near
    }

    #[inline]
    pub fn z_far(&self) -> f32 {
        self.config.z_far
    }

    #[inline]
    pub fn screen_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Column-major (glam); upload without transposing.
    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// World-to-camera transform. Column-major, like `projection`.
    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.projection * self.view
    }

    #[inline]
    pub fn camera_to_world(&self) -> RigidTransform {
        RigidTransform::new(self.position, self.basis)
    }

    // ---- setters

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recalc_view();
    }

    /// Window resize.
    pub fn set_screen_size(&mut self, width: u32, height: u32) -> CoreResult<()> {
        validate_screen(width, height)?;
        self.config.width = width;
        self.config.height = height;
        self.aspect = width as f32 / height as f32;
        self.recalc_projection();
        Ok(())
    }

    pub fn set_fov(&mut self, fov_y_rad: f32) -> CoreResult<()> {
        validate_fov(fov_y_rad)?;
        self.config.fov_y_rad = fov_y_rad;
        self.recalc_projection();
        Ok(())
    }

    pub fn set_clip_planes(&mut self, z_near: f32, z_far: f32) -> CoreResult<()> {
        validate_clip(z_near, z_far)?;
        self.config.z_near = z_near;
        self.config.z_far = z_far;
        self.recalc_projection();
        Ok(())
    }

    // ---- matrices

    /// Reciprocal-tangent perspective, NDC z in [-1, 1].
    pub fn recalc_projection(&mut self) {
        let CameraConfig {
            fov_y_rad,
            z_near: near,
            z_far: far,
            ..
        } = self.config;
        let f = 1.0 / (0.5 * fov_y_rad).tan();
        let a = (far + near) / (near - far);
        let b = (2.0 * far * near) / (near - far);
        self.projection = Mat4::from_cols(
            Vec4::new(f / self.aspect, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, a, -1.0),
            Vec4::new(0.0, 0.0, b, 0.0),
        );
    }

    /// Rigid inverse of the camera-to-world transform.
    pub fn recalc_view(&mut self) {
        let error = self.basis.orthonormal_error();
        if error > DRIFT_TOLERANCE {
            log::warn!("View matrix built from non-orthonormal basis (deviation {error:.2e})");
        }
        self.view = self.camera_to_world().inverse_matrix();
    }

    // ---- navigation

    pub fn translate_forward(&mut self, distance: f32) {
        self.set_position(self.position + distance * self.basis.forward);
    }

    pub fn translate_left(&mut self, distance: f32) {
        self.set_position(self.position + distance * self.basis.left);
    }

    pub fn translate_up(&mut self, distance: f32) {
        self.set_position(self.position + distance * self.basis.up);
    }

    /// Radians about `forward`.
    pub fn rotate_roll(&mut self, angle: f32) {
        self.rotate_about(self.basis.forward, angle);
    }

    /// Radians about `left`.
    pub fn rotate_pitch(&mut self, angle: f32) {
        self.rotate_about(self.basis.left, angle);
    }

    /// Radians about `up`.
    pub fn rotate_yaw(&mut self, angle: f32) {
        self.rotate_about(self.basis.up, angle);
    }

    fn rotate_about(&mut self, axis: Vec3, angle: f32) {
        let rotated = self.basis.rotated(axis, angle);
        let drift = rotated.orthonormal_error();
        if drift > DRIFT_TOLERANCE {
            log::warn!("Camera basis drifted by {drift:.2e}, re-orthonormalising");
        }
        self.basis = rotated.reorthonormalized();
        self.recalc_view();
    }

    // ---- rays

    /// Boresight ray.
    #[inline]
    pub fn ray(&self) -> Ray {
        Ray::new(self.position, self.basis.forward)
    }

    /// Pixel (row 0 at the top) to NDC x/y in [-1, 1], +y up.
    #[inline]
    pub fn pixel_to_ndc(&self, pixel_x: f32, pixel_y: f32) -> (f32, f32) {
        let (w, h) = (self.config.width as f32, self.config.height as f32);
        (2.0 * pixel_x / w - 1.0, 1.0 - 2.0 * pixel_y / h)
    }

    /// World ray through a pixel, unprojecting the near and far NDC points
    /// through the inverse projection and then the camera-to-world transform.
    pub fn ray_through_screen_position(&self, pixel_x: f32, pixel_y: f32) -> Ray {
        let (ndc_x, ndc_y) = self.pixel_to_ndc(pixel_x, pixel_y);
        // f64: the far point sits close to the singular end of the depth range.
        let inv_proj = self.projection.as_dmat4().inverse();
        let near = inv_proj.project_point3(DVec3::new(ndc_x as f64, ndc_y as f64, -1.0));
        let far = inv_proj.project_point3(DVec3::new(ndc_x as f64, ndc_y as f64, 1.0));
        let dir_view = (far - near).as_vec3();
        let dir_world = self.camera_to_world().matrix().transform_vector3(dir_view);
        Ray::new(self.position, dir_world)
    }

    /// Same ray built by turning the boresight: yaw about `up`, then pitch
    /// about the yawed `left`. Only valid for the symmetric projection built
    /// by `recalc_projection`.
    ///
    /// The pitch is measured inside the yawed vertical plane, where the
    /// image-plane offset `ndc_y * tan(fov/2)` sits at distance
    /// `sqrt(1 + x^2)` instead of 1, hence `atan(y / sqrt(1 + x^2))`.
    pub fn ray_through_screen_position_angular(&self, pixel_x: f32, pixel_y: f32) -> Ray {
        let (ndc_x, ndc_y) = self.pixel_to_ndc(pixel_x, pixel_y);
        let tan_half = (0.5 * self.config.fov_y_rad).tan();
        let x = ndc_x * tan_half * self.aspect;
        let y = ndc_y * tan_half;
        let yaw = x.atan();
        let pitch = (y / (1.0 + x * x).sqrt()).atan();

        // Positive yaw about `up` turns toward `left`, positive pitch about
        // `left` tips toward `-up`: screen right/up need the negated angles.
        let yawed = self.basis.rotated(self.basis.up, -yaw);
        let dir = rodrigues(yawed.left, -pitch) * yawed.forward;
        Ray::new(self.position, dir)
    }

    /// World-space corners of the near-plane rectangle:
    /// top-left, top-right, bottom-right, bottom-left.
    pub fn screen_corners(&self) -> [Vec3; 4] {
        let near = self.config.z_near;
        let half_h = near * (0.5 * self.config.fov_y_rad).tan();
        let half_w = half_h * self.aspect;
        let center = self.position + self.basis.forward * near;
        let right = self.basis.right() * half_w;
        let up = self.basis.up * half_h;
        [
            center - right + up,
            center + right + up,
            center + right - up,
            center - right - up,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn approx(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).abs().max_element() < eps
    }

    fn top_down() -> Camera {
        Camera::new(
            CameraConfig::default(),
            Vec3::new(5.0, 5.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .unwrap()
    }

    fn tilted() -> Camera {
        let config = CameraConfig {
            fov_y_rad: 60f32.to_radians(),
            width: 1280,
            height: 720,
            z_near: 0.1,
            z_far: 100.0,
        };
        Camera::from_euler(config, Vec3::new(1.0, -3.0, 4.0), 0.4, -0.6, 0.25).unwrap()
    }

    #[test]
    fn rejects_bad_config() {
        let pose = (Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z);
        let build = |config: CameraConfig| Camera::new(config, pose.0, pose.1, pose.2, pose.3);

        let mut c = CameraConfig::default();
        c.fov_y_rad = 0.0;
        assert_eq!(build(c).unwrap_err(), CoreError::InvalidFov(0.0));
        c.fov_y_rad = PI;
        assert!(matches!(build(c), Err(CoreError::InvalidFov(_))));

        let mut c = CameraConfig::default();
        c.z_near = 10.0;
        c.z_far = 10.0;
        assert!(matches!(build(c), Err(CoreError::InvalidClipPlanes { .. })));

        let mut c = CameraConfig::default();
        c.height = 0;
        assert!(matches!(build(c), Err(CoreError::InvalidScreenSize { .. })));
    }

    #[test]
    fn rejects_bad_basis() {
        let c = CameraConfig::default();
        assert_eq!(
            Camera::new(c, Vec3::ZERO, Vec3::ZERO, Vec3::Y, Vec3::Z).unwrap_err(),
            CoreError::DegenerateBasis("forward")
        );
        assert!(matches!(
            Camera::new(c, Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Z),
            Err(CoreError::NonOrthonormalBasis(_))
        ));
        assert_eq!(
            Camera::new(c, Vec3::ZERO, Vec3::X, Vec3::Y, -Vec3::Z).unwrap_err(),
            CoreError::LeftHandedBasis
        );
    }

    #[test]
    fn explicit_basis_is_normalised() {
        let cam = Camera::new(
            CameraConfig::default(),
            Vec3::ZERO,
            Vec3::X * 3.0,
            Vec3::Y * 0.5,
            Vec3::Z * 2.0,
        )
        .unwrap();
        assert!(approx(cam.forward(), Vec3::X, 1e-6));
        assert!(cam.basis().is_orthonormal(1e-6));
    }

    #[test]
    fn projection_matches_glam_gl_perspective() {
        let cam = tilted();
        let reference =
            Mat4::perspective_rh_gl(cam.fov_y_rad(), cam.aspect(), cam.z_near(), cam.z_far());
        let a = cam.projection().to_cols_array();
        let b = reference.to_cols_array();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn near_and_far_map_to_ndc_bounds() {
        for (fov_deg, w, h, near, far) in [
            (90.0, 1920, 1080, 0.1, 100.0),
            (45.0, 800, 600, 1.0, 50.0),
            (120.0, 500, 1000, 0.5, 10.0),
        ] {
            let config = CameraConfig {
                fov_y_rad: f32::to_radians(fov_deg),
                width: w,
                height: h,
                z_near: near,
                z_far: far,
            };
            let cam = Camera::from_euler(config, Vec3::ZERO, 0.0, 0.0, 0.0).unwrap();
            let p = cam.projection();
            let z_near = p.project_point3(Vec3::new(0.0, 0.0, -near)).z;
            let z_far = p.project_point3(Vec3::new(0.0, 0.0, -far)).z;
            assert!((z_near + 1.0).abs() < 1e-4, "near -> {z_near}");
            assert!((z_far - 1.0).abs() < 1e-4, "far -> {z_far}");
            // clip w is -z_view
            let clip = p * Vec4::new(0.3, 0.2, -7.0, 1.0);
            assert!((clip.w - 7.0).abs() < 1e-6);
        }
    }

    #[test]
    fn view_maps_camera_to_origin_looking_down_neg_z() {
        let cam = top_down();
        assert!(approx(cam.view().transform_point3(cam.position()), Vec3::ZERO, 1e-6));
        let ahead = cam.position() + cam.forward() * 2.0;
        assert!(approx(
            cam.view().transform_point3(ahead),
            Vec3::new(0.0, 0.0, -2.0),
            1e-6
        ));
        let right = cam.position() - cam.left();
        assert!(approx(cam.view().transform_point3(right), Vec3::X, 1e-6));
    }

    #[test]
    fn view_agrees_with_full_inverse() {
        let cam = tilted();
        let full = cam.camera_to_world().matrix().inverse().to_cols_array();
        for (x, y) in cam.view().to_cols_array().iter().zip(full.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn view_stays_rigid_after_navigation() {
        let mut cam = tilted();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            cam.translate_forward(rng.gen_range(-0.5..0.5));
            cam.translate_left(rng.gen_range(-0.5..0.5));
            cam.translate_up(rng.gen_range(-0.5..0.5));
            cam.rotate_yaw(rng.gen_range(-1.0..1.0));
            cam.rotate_pitch(rng.gen_range(-1.0..1.0));
        }
        let product = cam.view() * cam.view().inverse();
        let id = Mat4::IDENTITY.to_cols_array();
        for (x, y) in product.to_cols_array().iter().zip(id.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn basis_survives_many_random_rotations() {
        let mut cam = tilted();
        let mut rng = StdRng::seed_from_u64(1000);
        for _ in 0..1000 {
            let angle = rng.gen_range(-PI..PI);
            match rng.gen_range(0..3) {
                0 => cam.rotate_roll(angle),
                1 => cam.rotate_pitch(angle),
                _ => cam.rotate_yaw(angle),
            }
        }
        for v in [cam.forward(), cam.left(), cam.up()] {
            assert!((0.999..=1.001).contains(&v.length()));
        }
        assert!(cam.forward().dot(cam.left()).abs() <= 1e-3);
        assert!(cam.forward().dot(cam.up()).abs() <= 1e-3);
        assert!(cam.left().dot(cam.up()).abs() <= 1e-3);
        assert!(approx(cam.forward().cross(cam.left()), cam.up(), 1e-3));
    }

    #[test]
    fn translations_follow_basis() {
        let mut cam = top_down();
        cam.translate_forward(2.0);
        cam.translate_left(1.0);
        cam.translate_up(-0.5);
        assert!(approx(cam.position(), Vec3::new(4.0, 4.5, 3.0), 1e-6));
        // view is refreshed eagerly
        assert!(approx(cam.view().transform_point3(cam.position()), Vec3::ZERO, 1e-6));
    }

    #[test]
    fn roll_keeps_forward_and_turns_left_toward_up() {
        let mut cam = Camera::from_euler(CameraConfig::default(), Vec3::ZERO, 0.0, 0.0, 0.0)
            .unwrap();
        cam.rotate_roll(std::f32::consts::FRAC_PI_2);
        assert!(approx(cam.forward(), Vec3::X, 1e-6));
        assert!(approx(cam.left(), Vec3::Z, 1e-6));
        assert!(approx(cam.up(), -Vec3::Y, 1e-6));
    }

    #[test]
    fn screen_center_ray_is_boresight() {
        for cam in [top_down(), tilted()] {
            let (w, h) = cam.screen_size();
            let ray = cam.ray_through_screen_position(w as f32 / 2.0, h as f32 / 2.0);
            assert!(approx(ray.direction, cam.ray().direction, 1e-3));
            assert_eq!(ray.origin, cam.position());
        }
    }

    #[test]
    fn unprojection_methods_agree() {
        let mut rng = StdRng::seed_from_u64(42);
        for cam in [top_down(), tilted()] {
            let (w, h) = cam.screen_size();
            for _ in 0..100 {
                let x = rng.gen_range(0.0..w as f32);
                let y = rng.gen_range(0.0..h as f32);
                let m = cam.ray_through_screen_position(x, y).direction;
                let a = cam.ray_through_screen_position_angular(x, y).direction;
                assert!(approx(m, a, 1e-4), "pixel ({x}, {y}): {m:?} vs {a:?}");
                assert!((m.length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn angular_ray_turns_boresight() {
        let cam = top_down();
        // Right edge, vertical centre: a pure yaw of atan(aspect) toward +x.
        let ray = cam.ray_through_screen_position_angular(1920.0, 540.0);
        let yaw = cam.aspect().atan();
        let expected = cam.forward() * yaw.cos() + (-cam.left()) * yaw.sin();
        assert!(approx(ray.direction, expected, 1e-5));
        // Top edge, horizontal centre: a pure pitch of 45 deg toward up.
        let ray = cam.ray_through_screen_position_angular(960.0, 0.0);
        let expected = (cam.forward() + cam.up()).normalize();
        assert!(approx(ray.direction, expected, 1e-5));
    }

    #[test]
    fn pixel_ray_projects_back_onto_pixel() {
        let cam = tilted();
        let ray = cam.ray_through_screen_position(100.0, 650.0);
        let ndc = cam.proj_view().project_point3(ray.at(10.0));
        let (nx, ny) = cam.pixel_to_ndc(100.0, 650.0);
        assert!((ndc.x - nx).abs() < 1e-4 && (ndc.y - ny).abs() < 1e-4);
    }

    #[test]
    fn top_left_pixel_ray_hits_top_left_corner() {
        let cam = tilted();
        let corner = cam.screen_corners()[0];
        let expected = (corner - cam.position()).normalize();
        let ray = cam.ray_through_screen_position(0.0, 0.0);
        assert!(approx(ray.direction, expected, 1e-4));
    }

    #[test]
    fn resize_updates_aspect_and_projection() {
        let mut cam = top_down();
        cam.set_screen_size(1000, 1000).unwrap();
        assert_eq!(cam.aspect(), 1.0);
        let cols = cam.projection().to_cols_array_2d();
        assert!((cols[0][0] - cols[1][1]).abs() < 1e-6);
        assert!(cam.set_screen_size(0, 10).is_err());
        assert_eq!(cam.screen_size(), (1000, 1000));
        assert!(cam.set_fov(-1.0).is_err());
        assert!(cam.set_clip_planes(5.0, 1.0).is_err());
    }
}
