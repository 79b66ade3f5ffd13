pub mod components;
pub mod picking;
pub mod view;
pub mod world;

pub use components::{ClipPlaneCollection, Transform};
pub use view::{Camera, Ray, Viewport};
pub use world::*;
