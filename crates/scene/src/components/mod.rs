pub mod camera;
pub mod transform;

pub use camera::*;
pub use transform::*;
