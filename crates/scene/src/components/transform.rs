use foundation::math::{EnuFrame, Plane, Vec3};

/// Rigid local-to-world transform: an orthonormal basis (the local axes
/// expressed in world coordinates) plus a translation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub basis: [Vec3; 3],
    pub translation: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            basis: [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            translation: Vec3::ZERO,
        }
    }

    /// Translation-only transform with world-aligned axes.
    pub fn translate(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Transform whose axes are the frame's east/north/up and whose origin is
    /// the frame's anchor.
    pub fn from_frame(frame: EnuFrame) -> Self {
        Self {
            basis: [frame.east, frame.north, frame.up],
            translation: frame.origin,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.translation
            + self.basis[0].scale(local.x)
            + self.basis[1].scale(local.y)
            + self.basis[2].scale(local.z)
    }

    pub fn to_local(&self, world: Vec3) -> Vec3 {
        let rel = world - self.translation;
        Vec3::new(
            rel.dot(self.basis[0]),
            rel.dot(self.basis[1]),
            rel.dot(self.basis[2]),
        )
    }

    /// World-space plane re-expressed in this transform's local frame.
    pub fn plane_to_local(&self, plane: Plane) -> Plane {
        let normal = Vec3::new(
            plane.normal.dot(self.basis[0]),
            plane.normal.dot(self.basis[1]),
            plane.normal.dot(self.basis[2]),
        );
        Plane {
            normal,
            distance: plane.distance + plane.normal.dot(self.translation),
        }
    }
}
