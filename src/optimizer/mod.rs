pub mod builder;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod solver;

pub use builder::*;
pub use extract::*;
pub use model::*;
pub use pipeline::*;
pub use solver::*;
