use foundation::math::geodesy::altitude_of;
use foundation::math::{EnuFrame, Vec2, Vec3};
use scene::view::Camera;
use scene::world::{ObjectId, SceneObject, World};
use serde::{Deserialize, Serialize};

/// Below this bounding-sphere altitude a synthesized object frame degrades
/// to translation-only; the sphere center is too deep for a meaningful
/// east-north-up orientation.
const ENU_FRAME_MIN_ALTITUDE_M: f64 = -100_000.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SliceMode {
    Box,
    ViewBox,
    Line,
    ViewLine,
}

/// Serializable description of the current slice geometry, emitted whenever
/// the volume or its visibility changes. Corners are world-cartesian
/// `[x, y, z]` in bottom-left, bottom-right, top-left, top-right order;
/// `lower_limit` is relative to the ground altitude at the box center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometrySnapshot {
    pub mode: SliceMode,
    pub corners: [[f64; 3]; 4],
    pub lower_limit: f64,
    pub height: f64,
    pub visible: bool,
    pub negate: bool,
}

impl GeometrySnapshot {
    pub fn corner_points(&self) -> [Vec3; 4] {
        self.corners.map(|[x, y, z]| Vec3::new(x, y, z))
    }
}

pub fn corner_array(v: Vec3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

/// Operations every slicing tool implements. Pointer and render-tick hooks
/// default to no-ops for tools without interactive handles.
pub trait SliceTool {
    fn activate(&mut self, world: &mut World, camera: &Camera);
    fn deactivate(&mut self, world: &mut World);

    /// Gives a newly loaded object clip planes consistent with the current
    /// geometry.
    fn attach_object(&mut self, world: &mut World, object: ObjectId);

    /// Returns whether the pointer captured a handle.
    fn on_pointer_down(&mut self, _camera: &Camera, _pointer: Vec2) -> bool {
        false
    }
    fn on_pointer_move(
        &mut self,
        _world: &mut World,
        _camera: &Camera,
        _pointer: Vec2,
        _now_s: f64,
    ) {
    }
    fn on_pointer_up(&mut self) {}

    /// Per-frame refresh of lazily positioned visuals.
    fn on_render_tick(&mut self, _camera: &Camera) {}

    fn set_outline_visible(&mut self, _visible: bool) {}

    /// Drains the snapshot produced by the latest geometry change, if any.
    fn take_geometry_snapshot(&mut self) -> Option<GeometrySnapshot> {
        None
    }

    fn camera_navigation_suppressed(&self) -> bool {
        false
    }
}

/// Local frame used to express clip planes for an object: its own transform
/// when it has one, otherwise a frame synthesized at its bounding sphere.
pub fn clip_frame(object: &SceneObject) -> scene::Transform {
    if !object.transform.is_identity() {
        return object.transform;
    }
    let center = object.bounding_sphere.center;
    if altitude_of(center) > ENU_FRAME_MIN_ALTITUDE_M {
        scene::Transform::from_frame(EnuFrame::at(center))
    } else {
        scene::Transform::translate(center)
    }
}
