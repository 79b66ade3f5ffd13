use super::geodesy::surface_normal;
use super::vec::Vec3;

/// Oriented plane `normal . p + distance = 0` with a unit normal.
///
/// `signed_distance` is positive on the side the normal points into.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f64,
}

impl Plane {
    /// Plane through `point` with the given normal. Returns `None` when the
    /// normal has zero length.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Option<Self> {
        let normal = normal.normalized()?;
        Some(Self {
            normal,
            distance: -normal.dot(point),
        })
    }

    pub fn signed_distance(&self, point: Vec3) -> f64 {
        self.normal.dot(point) + self.distance
    }

    /// Same plane with the opposite orientation.
    pub fn negated(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    /// Plane translated by `offset` along its own normal.
    pub fn offset_along_normal(&self, offset: f64) -> Self {
        Self {
            normal: self.normal,
            distance: self.distance - offset,
        }
    }

    /// Vertical plane through two world points.
    ///
    /// The normal is perpendicular to the segment and to the geodetic up at
    /// `p1`, pointing to the right of the direction of travel. Returns `None`
    /// when the points coincide or the segment is parallel to up.
    pub fn vertical_through(p1: Vec3, p2: Vec3) -> Option<Self> {
        let along = p2 - p1;
        let normal = along.cross(surface_normal(p1));
        Self::from_point_normal(p1, normal)
    }
}
