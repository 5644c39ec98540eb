use glam::{Mat4, Vec3};

/// Scale, per-axis rotation in degrees and translation for one draw.
///
/// The rotations are three independent axis rotations, not an Euler-angle
/// convention. [`TransformSpec::model_matrix`] always composes them as
/// `translation * rot_z * rot_y * rot_x * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSpec {
    pub scale: Vec3,
    pub rotation_degrees: Vec3,
    pub translation: Vec3,
}

impl TransformSpec {
    pub const IDENTITY: Self = Self {
        scale: Vec3::ONE,
        rotation_degrees: Vec3::ZERO,
        translation: Vec3::ZERO,
    };

    pub const fn new(scale: Vec3, rotation_degrees: Vec3, translation: Vec3) -> Self {
        Self {
            scale,
            rotation_degrees,
            translation,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        compose(
            self.scale,
            self.rotation_degrees.x,
            self.rotation_degrees.y,
            self.rotation_degrees.z,
            self.translation,
        )
    }
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self::IDENTITY
    }
}

pub fn compose(
    scale: Vec3,
    x_rotation_degrees: f32,
    y_rotation_degrees: f32,
    z_rotation_degrees: f32,
    translation: Vec3,
) -> Mat4 {
    let scale = Mat4::from_scale(scale);
    let rotation_x = Mat4::from_rotation_x(x_rotation_degrees.to_radians());
    let rotation_y = Mat4::from_rotation_y(y_rotation_degrees.to_radians());
    let rotation_z = Mat4::from_rotation_z(z_rotation_degrees.to_radians());
    let translation = Mat4::from_translation(translation);

    translation * rotation_z * rotation_y * rotation_x * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn identity_spec_is_identity_matrix() {
        assert!(TransformSpec::IDENTITY
            .model_matrix()
            .abs_diff_eq(Mat4::IDENTITY, EPSILON));
    }

    #[test]
    fn scale_then_rotate_y_then_translate() {
        let spec = TransformSpec::new(
            Vec3::new(2.0, 1.0, 1.0),
            Vec3::new(0.0, 90.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        );

        // (1,0,0) -> scale -> (2,0,0) -> rotate 90° about Y -> (0,0,-2) -> translate -> (1,0,-2)
        let point = spec.model_matrix().transform_point3(Vec3::X);
        assert!(
            point.abs_diff_eq(Vec3::new(1.0, 0.0, -2.0), EPSILON),
            "got {point}"
        );

        let expected = Mat4::from_translation(Vec3::X)
            * Mat4::from_rotation_y(90f32.to_radians())
            * Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        assert!(spec.model_matrix().abs_diff_eq(expected, EPSILON));
    }

    #[test]
    fn rotations_apply_x_before_y_before_z() {
        let matrix = compose(Vec3::ONE, 90.0, 90.0, 0.0, Vec3::ZERO);

        // Rx(90) takes +Y to +Z, then Ry(90) takes +Z to +X.
        let point = matrix.transform_point3(Vec3::Y);
        assert!(point.abs_diff_eq(Vec3::X, EPSILON), "got {point}");

        // The opposite order would have sent +Y to +Z instead.
        let reversed = Mat4::from_rotation_x(90f32.to_radians())
            * Mat4::from_rotation_y(90f32.to_radians());
        assert!(!reversed.abs_diff_eq(matrix, EPSILON));
    }

    #[test]
    fn translation_is_not_scaled_or_rotated() {
        let spec = TransformSpec::new(
            Vec3::splat(10.0),
            Vec3::new(45.0, 30.0, 60.0),
            Vec3::new(3.0, -2.0, 7.0),
        );

        let origin = spec.model_matrix().transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(spec.translation, EPSILON));
    }
}
