pub mod clipping;
pub mod transform;

pub use clipping::ClipPlaneCollection;
pub use transform::Transform;
