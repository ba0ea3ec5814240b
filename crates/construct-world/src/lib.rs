pub use construct_lighting as lighting;
pub use construct_model as model;

pub mod behavior;
pub use behavior::*;
pub mod exposure;
pub use exposure::*;
pub mod head;
pub use head::*;
pub mod object;
pub use object::*;
mod publish;
pub use publish::PublishStats;
pub mod scene;
pub use scene::*;
