//! Incremental Lambertian lighting over a triangle soup.
//!
//! Scene objects are flattened into a [`TriangleSoup`], which answers nearest-hit
//! ray queries and stores per-vertex outgoing radiance. The [`IrradianceCache`]
//! refines a bounded number of triangles per tick, gathering light from the soup
//! itself and from an [`Environment`] such as the analytic [`Sky`].

pub mod config;
pub use config::*;
pub mod irradiance;
pub use irradiance::*;
pub mod math;
pub mod query;
pub use query::*;
pub mod radiometry;
pub use radiometry::*;
pub mod ray;
pub use ray::*;
pub mod sky;
pub use sky::*;
pub mod soup;
pub use soup::*;
pub mod triangle;
pub use triangle::*;
