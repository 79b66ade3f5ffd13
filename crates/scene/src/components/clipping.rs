use foundation::math::{Plane, Vec3};

/// A set of clip planes attached to the globe or to one scene object.
///
/// With `union = false` every plane must discard a point for the point to be
/// cut away; with `union = true` a single discarding plane suffices. A plane
/// discards the points its normal faces, i.e. positive signed distance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClipPlaneCollection {
    planes: Vec<Plane>,
    pub union: bool,
}

impl ClipPlaneCollection {
    pub fn new(union: bool) -> Self {
        Self {
            planes: Vec::new(),
            union,
        }
    }

    pub fn replace(&mut self, planes: Vec<Plane>, union: bool) {
        self.planes = planes;
        self.union = union;
    }

    pub fn clear(&mut self) {
        self.planes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Whether the collection cuts away the given point. Points are expressed
    /// in the same frame as the planes. An empty collection keeps everything.
    pub fn discards(&self, point: Vec3) -> bool {
        if self.planes.is_empty() {
            return false;
        }
        if self.union {
            self.planes.iter().any(|p| p.signed_distance(point) > 0.0)
        } else {
            self.planes.iter().all(|p| p.signed_distance(point) > 0.0)
        }
    }
}
