use foundation::math::geodesy::{ray_ellipsoid_intersection, surface_point};
use foundation::math::{EnuFrame, Plane, Vec2, Vec3};
use scene::view::Camera;
use scene::world::{ObjectId, World};

use crate::tool::{SliceTool, clip_frame};

/// Half-span of a view-seeded line when the viewport edges miss the globe,
/// in meters.
const FALLBACK_LINE_HALF_SPAN_M: f64 = 5_000.0;

#[derive(Debug, Clone, Default)]
pub struct LineToolParams {
    /// Line endpoints; empty means derive them from the current view.
    pub points: Vec<Vec3>,
    pub negate: bool,
}

/// Slices the scene with a single vertical plane through two points.
pub struct LineSliceTool {
    points: Vec<Vec3>,
    negate: bool,
    plane: Option<Plane>,
}

impl LineSliceTool {
    pub fn new(params: LineToolParams) -> Self {
        Self {
            points: params.points,
            negate: params.negate,
            plane: None,
        }
    }

    pub fn current_plane(&self) -> Plane {
        match self.plane {
            Some(p) => p,
            None => panic!("slice line tool used before activation"),
        }
    }

    /// Endpoints spanning the view horizontally: the ellipsoid under the
    /// left and right viewport edge midpoints, or a fixed span around the
    /// ground center as a fallback.
    fn view_endpoints(camera: &Camera) -> (Vec3, Vec3) {
        let mid_y = 0.5 * camera.viewport.height_px;
        let edge_hit = |x: f64| {
            camera
                .pick_ray(Vec2::new(x, mid_y))
                .and_then(|ray| ray_ellipsoid_intersection(ray.origin, ray.dir))
        };

        if let (Some(left), Some(right)) = (edge_hit(0.0), edge_hit(camera.viewport.width_px)) {
            return (surface_point(left), surface_point(right));
        }

        let center = camera
            .ground_center()
            .unwrap_or_else(|| surface_point(camera.position));
        let frame = EnuFrame::at(center);
        let right = camera.right();
        let horizontal = (right - frame.up.scale(right.dot(frame.up)))
            .normalized()
            .unwrap_or(frame.east);
        (
            surface_point(center - horizontal.scale(FALLBACK_LINE_HALF_SPAN_M)),
            surface_point(center + horizontal.scale(FALLBACK_LINE_HALF_SPAN_M)),
        )
    }

    fn push_planes(&self, world: &mut World) {
        let plane = self.current_plane();
        world.globe_clip_mut().replace(vec![plane], true);
        for id in world.object_ids() {
            self.push_object_plane(world, id, plane);
        }
    }

    fn push_object_plane(&self, world: &mut World, id: ObjectId, plane: Plane) {
        let Some(object) = world.object(id) else {
            return;
        };
        let frame = clip_frame(object);
        let local = frame.plane_to_local(plane);
        if let Some(object) = world.object_mut(id) {
            object.clip.replace(vec![local], true);
        }
    }
}

impl SliceTool for LineSliceTool {
    fn activate(&mut self, world: &mut World, camera: &Camera) {
        let (p1, p2) = if self.points.len() >= 2 {
            (self.points[0], self.points[self.points.len() - 1])
        } else {
            Self::view_endpoints(camera)
        };

        let plane = match Plane::vertical_through(p1, p2) {
            Some(p) => p,
            None => panic!("slice line requires two distinct points"),
        };
        self.plane = Some(if self.negate { plane.negated() } else { plane });
        self.push_planes(world);
    }

    fn deactivate(&mut self, _world: &mut World) {
        self.plane = None;
    }

    fn attach_object(&mut self, world: &mut World, object: ObjectId) {
        let plane = self.current_plane();
        self.push_object_plane(world, object, plane);
    }
}
