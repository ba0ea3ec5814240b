use std::fmt;

use serde::{Deserialize, Serialize};

pub mod geometry;
pub use geometry::*;
pub mod shapes;

/// Identifies an object in the scene. Ids are handed out monotonically and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an object takes part in lighting and picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Lit, immovable geometry in `PosColor` layout. Occludes and receives light.
    #[default]
    Static,
    /// Textured, freely movable panel in `PosUv` layout. Pickable, never lit.
    Ui,
    /// Like `Ui`, but excluded from picking so it never hits itself.
    UiCursor,
    /// Background dome showing the baked environment.
    Sky,
}
