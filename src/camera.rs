use glam::{Mat4, Vec3};

#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect_ratio, 0.1, 100.0)
    }

    pub fn get_vp_matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect_ratio = width.max(1) as f32 / height.max(1) as f32;
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 9.0, 22.0),
            target: Vec3::new(1.0, 4.0, 0.0),
            up: Vec3::Y,
            fov_y_degrees: 45.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4Swizzles;

    use super::*;

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::default();
        let clip = camera.get_vp_matrix(800, 600) * camera.target.extend(1.0);
        let ndc = clip.xyz() / clip.w;

        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4, "got {ndc}");
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn zero_sized_window_does_not_produce_nan() {
        let matrix = Camera::default().get_vp_matrix(0, 0);
        assert!(!matrix.is_nan());
    }
}
