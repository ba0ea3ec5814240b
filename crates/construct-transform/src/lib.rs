use glam::{Affine3A, Mat3, Quat, Vec3};

/// World axes. The world is Z-up: the floor spans X/Y and the eye sits above it.
pub const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);
pub const FORWARD: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const UP: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Local-to-world placement of an object.
///
/// Every setter marks the transform as changed; consumers that cache derived
/// data (such as world-space triangles) poll `take_changed`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
    changed: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            changed: true,
        }
    }
}

impl From<Affine3A> for Transform {
    fn from(value: Affine3A) -> Self {
        let (scale, rotation, translation) = value.to_scale_rotation_translation();
        Self::new(translation, rotation, scale)
    }
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            changed: true,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY, Vec3::ONE)
    }

    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self::new(translation, rotation, Vec3::ONE)
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * RIGHT
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * UP
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.changed = true;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.changed = true;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.changed = true;
    }

    pub fn translate(&mut self, translation: Vec3) {
        self.translation += translation;
        self.changed = true;
    }

    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation *= rotation;
        self.changed = true;
    }

    /// Orients the local +Y axis (the facing direction of generated quads) along `direction`.
    pub fn face_towards(&mut self, direction: Vec3) {
        let direction = direction.normalize_or_zero();
        if direction != Vec3::ZERO {
            self.set_rotation(Quat::from_rotation_arc(FORWARD, direction));
        }
    }

    pub fn local_to_world(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Linear part of `local_to_world`, for transforming directions.
    pub fn linear(&self) -> Mat3 {
        Mat3::from_quat(self.rotation) * Mat3::from_diagonal(self.scale)
    }

    pub fn set_local_to_world(&mut self, matrix: Affine3A) {
        (self.scale, self.rotation, self.translation) = matrix.to_scale_rotation_translation();
        self.changed = true;
    }

    /// Reports whether the transform changed since the previous call and clears the flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }
}
