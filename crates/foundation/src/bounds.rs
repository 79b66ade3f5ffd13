use crate::math::geodesy::Geodetic;
use crate::math::vec::Vec3;

/// Bounding sphere in world coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        BoundingSphere { center, radius }
    }
}

/// Geodetic rectangle in radians, `west <= east`, `south <= north`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoRect {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoRect {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        GeoRect {
            west,
            south,
            east,
            north,
        }
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn center(&self) -> Geodetic {
        Geodetic::new(
            0.5 * (self.south + self.north),
            0.5 * (self.west + self.east),
            0.0,
        )
    }

    /// Rectangle with the same south-west corner, scaled by `ratio` in both
    /// directions.
    pub fn scaled_from_south_west(&self, ratio: f64) -> Self {
        GeoRect {
            west: self.west,
            south: self.south,
            east: self.west + self.width() * ratio,
            north: self.south + self.height() * ratio,
        }
    }
}
