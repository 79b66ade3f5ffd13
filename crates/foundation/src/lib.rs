//! Shared math and geometry primitives: vectors, WGS84 geodesy, local
//! East-North-Up frames, oriented planes, bounding volumes, and a
//! deterministic float ordering.

pub mod bounds;
pub mod math;

pub use bounds::{BoundingSphere, GeoRect};
pub use math::{EnuFrame, Geodetic, Plane, Vec2, Vec3};
