pub mod geodesy;
pub mod local;
pub mod plane;
pub mod precision;
pub mod vec;

pub use geodesy::Geodetic;
pub use local::EnuFrame;
pub use plane::Plane;
pub use vec::{Vec2, Vec3};
