#![doc(html_no_source)]

mod construct;
pub use construct::Construct;

// Reexport all crates
pub use construct_lighting;
pub use construct_model;
pub use construct_profiling;
pub use construct_texture;
pub use construct_time;
pub use construct_transform;
pub use construct_world;
