pub mod params;
pub mod result;
pub mod series;

pub use params::*;
pub use result::*;
pub use series::*;
