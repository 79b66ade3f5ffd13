use super::geodesy::{surface_normal, world_to_geodetic};
use super::vec::Vec3;

/// Right-handed East-North-Up frame anchored at a world point.
///
/// The axes are unit vectors expressed in world coordinates. `east` points
/// along increasing longitude, `north` along increasing latitude, `up` along
/// the outward ellipsoid normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnuFrame {
    pub origin: Vec3,
    pub east: Vec3,
    pub north: Vec3,
    pub up: Vec3,
}

impl EnuFrame {
    /// Frame anchored at `origin` (world coordinates).
    pub fn at(origin: Vec3) -> Self {
        let geo = world_to_geodetic(origin);
        let sin_lon = geo.lon_rad.sin();
        let cos_lon = geo.lon_rad.cos();

        let east = Vec3::new(-sin_lon, cos_lon, 0.0);
        let up = surface_normal(origin);
        let north = up.cross(east);

        Self {
            origin,
            east,
            north,
            up,
        }
    }

    /// World offset for a local (east, north, up) displacement.
    pub fn to_world_offset(&self, local: Vec3) -> Vec3 {
        self.east.scale(local.x) + self.north.scale(local.y) + self.up.scale(local.z)
    }

    /// Local (east, north, up) coordinates of a world point.
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        let rel = world - self.origin;
        Vec3::new(rel.dot(self.east), rel.dot(self.north), rel.dot(self.up))
    }

    /// World coordinates of a local (east, north, up) point.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.origin + self.to_world_offset(local)
    }
}
