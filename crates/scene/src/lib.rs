pub mod components;
pub mod markers;
pub mod picking;
pub mod world;

pub use components::*;
pub use markers::*;
pub use picking::*;
pub use world::*;
