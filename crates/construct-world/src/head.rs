use construct_transform::{RIGHT, UP};
use glam::Vec3;

/// Where the viewer is and where they look, supplied by the display layer.
pub trait HeadPose {
    fn eye_position(&self) -> Vec3;

    /// Unit view direction.
    fn view_direction(&self) -> Vec3;

    fn view_right(&self) -> Vec3 {
        self.view_direction()
            .cross(UP)
            .try_normalize()
            .unwrap_or(RIGHT)
    }

    fn view_up(&self) -> Vec3 {
        self.view_right().cross(self.view_direction()).normalize()
    }
}

/// Head that never moves, for headless runs and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedHead {
    pub eye_position: Vec3,
    pub view_direction: Vec3,
}

impl FixedHead {
    pub fn new(eye_position: Vec3, view_direction: Vec3) -> Self {
        Self {
            eye_position,
            view_direction: view_direction.normalize(),
        }
    }
}

impl HeadPose for FixedHead {
    fn eye_position(&self) -> Vec3 {
        self.eye_position
    }

    fn view_direction(&self) -> Vec3 {
        self.view_direction
    }
}
