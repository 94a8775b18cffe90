pub mod mat4;
pub mod orient;
pub mod quat;
pub mod sphere;
pub mod vec;

pub use mat4::*;
pub use orient::*;
pub use quat::*;
pub use sphere::*;
pub use vec::*;
