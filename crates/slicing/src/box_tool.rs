use foundation::GeoRect;
use foundation::math::geodesy::{
    WGS84_A, altitude_of, surface_point, with_altitude, world_to_geodetic,
};
use foundation::math::{Plane, Vec2, Vec3};
use scene::view::Camera;
use scene::world::{ObjectId, World};

use crate::handles::{DragEvent, DragHandleSet, HandlePlacement, HandleSpec, OppositeRef};
use crate::tool::{GeometrySnapshot, SliceMode, SliceTool, clip_frame, corner_array};
use crate::volume::{Side, SliceVolume};

/// Horizontal handles float this far above the box top (or below its base
/// when the camera is underground), in meters.
const HANDLE_LIFT_M: f64 = 20.0;

/// Edge span a horizontal handle may occupy, keeping it off the corners.
const HANDLE_EDGE_MIN_T: f64 = 0.05;
const HANDLE_EDGE_MAX_T: f64 = 0.95;

/// View-seeded fallback half-span when the camera does not face the globe.
const FALLBACK_VIEW_SPAN_M: f64 = 30_000.0;

#[derive(Debug, Clone)]
pub struct BoxToolParams {
    pub mode: SliceMode,
    /// Explicit base corners; empty means seed the box from the view.
    pub corner_points: Vec<Vec3>,
    pub negate: bool,
    /// Ground-relative, meters.
    pub lower_limit: Option<f64>,
    pub height: Option<f64>,
    pub outline_visible: bool,
}

impl Default for BoxToolParams {
    fn default() -> Self {
        Self {
            mode: SliceMode::ViewBox,
            corner_points: Vec::new(),
            negate: false,
            lower_limit: None,
            height: None,
            outline_visible: true,
        }
    }
}

impl BoxToolParams {
    /// Parameters reproducing a previously emitted geometry snapshot.
    pub fn from_snapshot(snapshot: &GeometrySnapshot) -> Self {
        Self {
            mode: snapshot.mode,
            corner_points: snapshot.corner_points().to_vec(),
            negate: snapshot.negate,
            lower_limit: Some(snapshot.lower_limit),
            height: Some(snapshot.height),
            outline_visible: snapshot.visible,
        }
    }
}

/// Owns the oriented slice box: builds its planes, keeps every object's clip
/// collection consistent, and resizes the box from handle drags.
pub struct BoxSliceTool {
    mode: SliceMode,
    corner_points: Vec<Vec3>,
    negate: bool,
    visible: bool,
    lower_limit: Option<f64>,
    height: Option<f64>,
    ground_altitude: f64,
    volume: Option<SliceVolume>,
    handles: DragHandleSet<Side>,
    pending_snapshot: Option<GeometrySnapshot>,
}

impl BoxSliceTool {
    pub fn new(params: BoxToolParams) -> Self {
        let handles = Self::build_handles(params.negate);
        Self {
            mode: params.mode,
            corner_points: params.corner_points,
            negate: params.negate,
            visible: params.outline_visible,
            lower_limit: params.lower_limit,
            height: params.height,
            ground_altitude: 0.0,
            volume: None,
            handles,
            pending_snapshot: None,
        }
    }

    fn build_handles(negate: bool) -> DragHandleSet<Side> {
        let sides: &[Side] = if negate { &Side::HORIZONTAL } else { &Side::ALL };
        DragHandleSet::new(
            sides
                .iter()
                .map(|side| HandleSpec {
                    id: *side,
                    placement: HandlePlacement::Owner,
                    opposite: OppositeRef::Handle(side.opposite()),
                })
                .collect(),
        )
    }

    fn volume(&self) -> &SliceVolume {
        match &self.volume {
            Some(v) => v,
            None => panic!("slice box tool used before activation"),
        }
    }

    pub fn current_volume(&self) -> &SliceVolume {
        self.volume()
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    fn seed_volume(&self, camera: &Camera) -> SliceVolume {
        if self.corner_points.len() >= 4 {
            let points = [
                self.corner_points[0],
                self.corner_points[1],
                self.corner_points[2],
                self.corner_points[3],
            ];
            return SliceVolume::from_corner_points(
                points,
                self.height,
                self.lower_limit,
                self.ground_altitude,
            );
        }

        let center = camera
            .ground_center()
            .unwrap_or_else(|| surface_point(camera.position));
        let extent = camera
            .view_extent()
            .unwrap_or_else(|| fallback_extent(center));
        SliceVolume::from_view_extent(
            extent,
            center,
            self.height,
            self.lower_limit,
            self.ground_altitude,
        )
    }

    /// Applies one drag step to the box and resynchronizes every clip
    /// collection.
    pub fn on_plane_move(&mut self, world: &mut World, event: DragEvent<Side>) {
        let volume = *self.volume();
        let updated = if event.handle.is_vertical() {
            volume.with_vertical_moved(event.signed_distance, event.displacement)
        } else {
            volume.with_side_moved(event.handle, event.displacement)
        };
        self.volume = Some(updated);
        self.sync_all_planes(world);
    }

    /// Flips which half-space is kept. Geometry is untouched; the handle set
    /// shrinks to the four sides when negated.
    pub fn set_negated(&mut self, world: &mut World, negate: bool) {
        if self.negate == negate {
            return;
        }
        self.negate = negate;
        self.handles = Self::build_handles(negate);
        if self.volume.is_some() {
            if self.visible {
                self.handles.show();
            }
            self.sync_all_planes(world);
        }
    }

    /// Pure handle placement for the current volume and view.
    pub fn handle_position(&self, side: Side, camera: &Camera) -> Vec3 {
        let v = self.volume();
        let center_alt = altitude_of(v.center);
        match side {
            Side::Up => with_altitude(v.corners.bottom_left, center_alt + 0.5 * v.height),
            Side::Down => with_altitude(v.corners.bottom_left, center_alt - 0.5 * v.height),
            _ => {
                let [p1, p2] = v.side_edge(side);
                let target = camera.ground_center().unwrap_or(v.center);
                let edge = p2 - p1;
                let t = ((target - p1).dot(edge) / edge.dot(edge))
                    .clamp(HANDLE_EDGE_MIN_T, HANDLE_EDGE_MAX_T);
                let alt = if camera.is_underground() {
                    center_alt - 0.5 * v.height - HANDLE_LIFT_M
                } else {
                    center_alt + 0.5 * v.height + HANDLE_LIFT_M
                };
                with_altitude(p1.lerp(p2, t), alt)
            }
        }
    }

    fn update_handles(&mut self, camera: &Camera) {
        for side in self.handles.ids() {
            let position = self.handle_position(side, camera);
            self.handles.set_position(side, position);
        }
    }

    fn world_planes(&self) -> Vec<Plane> {
        self.volume().planes(self.negate)
    }

    fn push_object_planes(&self, world: &mut World, id: ObjectId, planes: &[Plane]) {
        let Some(object) = world.object(id) else {
            return;
        };
        let frame = clip_frame(object);
        let local: Vec<Plane> = planes.iter().map(|p| frame.plane_to_local(*p)).collect();
        if let Some(object) = world.object_mut(id) {
            object.clip.replace(local, !self.negate);
        }
    }

    /// Recomputes every plane from the current corners and pushes it to the
    /// globe and to each object's local frame, then records a snapshot for
    /// the geometry-changed observer.
    fn sync_all_planes(&mut self, world: &mut World) {
        let planes = self.world_planes();
        world.globe_clip_mut().replace(planes.clone(), !self.negate);
        for id in world.object_ids() {
            self.push_object_planes(world, id, &planes);
        }
        self.pending_snapshot = Some(self.snapshot());
    }

    fn snapshot(&self) -> GeometrySnapshot {
        let v = self.volume();
        GeometrySnapshot {
            mode: self.mode,
            corners: [
                corner_array(v.corners.bottom_left),
                corner_array(v.corners.bottom_right),
                corner_array(v.corners.top_left),
                corner_array(v.corners.top_right),
            ],
            lower_limit: v.lower_limit - self.ground_altitude,
            height: v.height,
            visible: self.visible,
            negate: self.negate,
        }
    }
}

fn fallback_extent(center: Vec3) -> GeoRect {
    let geo = world_to_geodetic(center);
    // Angular half-spans for a fixed metric footprint at this latitude.
    let dlat = FALLBACK_VIEW_SPAN_M / WGS84_A;
    let dlon = FALLBACK_VIEW_SPAN_M / (WGS84_A * geo.lat_rad.cos().max(1e-6));
    GeoRect::new(
        geo.lon_rad - dlon,
        geo.lat_rad - dlat,
        geo.lon_rad + dlon,
        geo.lat_rad + dlat,
    )
}

impl SliceTool for BoxSliceTool {
    fn activate(&mut self, world: &mut World, camera: &Camera) {
        self.ground_altitude = world.ground_height().unwrap_or(0.0);
        self.volume = Some(self.seed_volume(camera));
        self.update_handles(camera);
        // A session restored hidden must not show pickable handles.
        if self.visible {
            self.handles.show();
        }
        self.sync_all_planes(world);
    }

    fn deactivate(&mut self, _world: &mut World) {
        self.handles.hide();
        self.volume = None;
        self.pending_snapshot = None;
    }

    fn attach_object(&mut self, world: &mut World, object: ObjectId) {
        let planes = self.world_planes();
        self.push_object_planes(world, object, &planes);
    }

    fn on_pointer_down(&mut self, camera: &Camera, pointer: Vec2) -> bool {
        self.handles.on_pointer_down(camera, pointer)
    }

    fn on_pointer_move(&mut self, world: &mut World, camera: &Camera, pointer: Vec2, now_s: f64) {
        if let Some(event) = self.handles.on_pointer_move(camera, pointer, now_s) {
            self.on_plane_move(world, event);
            self.update_handles(camera);
        }
    }

    fn on_pointer_up(&mut self) {
        self.handles.on_pointer_up();
    }

    fn on_render_tick(&mut self, camera: &Camera) {
        if self.volume.is_some() {
            self.update_handles(camera);
        }
    }

    /// Toggles the drawn outline and handle visuals; clip planes stay
    /// active. Observers still get a snapshot so the flag persists.
    fn set_outline_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.handles.show();
        } else {
            self.handles.hide();
        }
        if self.volume.is_some() {
            self.pending_snapshot = Some(self.snapshot());
        }
    }

    fn take_geometry_snapshot(&mut self) -> Option<GeometrySnapshot> {
        self.pending_snapshot.take()
    }

    fn camera_navigation_suppressed(&self) -> bool {
        self.handles.camera_navigation_suppressed()
    }
}

#[cfg(test)]
mod tests {
    use super::{BoxSliceTool, BoxToolParams};
    use crate::handles::DragEvent;
    use crate::tool::{SliceMode, SliceTool};
    use crate::volume::Side;
    use foundation::BoundingSphere;
    use foundation::math::geodesy::{Geodetic, geodetic_to_world};
    use foundation::math::local::EnuFrame;
    use foundation::math::Vec3;
    use scene::view::{Camera, Viewport};
    use scene::world::{SceneObject, SceneObjectKind, World};
    use scene::Transform;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn anchor() -> EnuFrame {
        EnuFrame::at(geodetic_to_world(Geodetic::new(0.0, 0.0, 0.0)))
    }

    fn top_down() -> Camera {
        let surface = geodetic_to_world(Geodetic::new(0.0, 0.0, 0.0));
        let eye = geodetic_to_world(Geodetic::new(0.0, 0.0, 50_000.0));
        Camera::look_at(
            eye,
            surface,
            anchor().north,
            60f64.to_radians(),
            Viewport::new(1600.0, 1000.0),
        )
        .expect("valid view")
    }

    fn box_params(frame: &EnuFrame, size: f64) -> BoxToolParams {
        let h = 0.5 * size;
        BoxToolParams {
            mode: SliceMode::Box,
            corner_points: vec![
                frame.to_world(Vec3::new(-h, -h, 0.0)),
                frame.to_world(Vec3::new(h, -h, 0.0)),
                frame.to_world(Vec3::new(-h, h, 0.0)),
                frame.to_world(Vec3::new(h, h, 0.0)),
            ],
            negate: false,
            lower_limit: Some(-5_000.0),
            height: Some(10_000.0),
            outline_visible: true,
        }
    }

    fn world_with_object(frame: &EnuFrame) -> (World, scene::world::ObjectId) {
        let mut world = World::new();
        let id = world.add_object(SceneObject::new(
            SceneObjectKind::TiledModel,
            Transform::from_frame(*frame),
            BoundingSphere::new(frame.origin, 5_000.0),
        ));
        (world, id)
    }

    #[test]
    fn activation_pushes_planes_to_globe_and_objects() {
        let frame = anchor();
        let (mut world, id) = world_with_object(&frame);
        let camera = top_down();

        let mut tool = BoxSliceTool::new(box_params(&frame, 1000.0));
        tool.activate(&mut world, &camera);

        assert_eq!(world.globe_clip().len(), 6);
        assert!(world.globe_clip().union);
        assert_eq!(world.object(id).expect("object").clip.len(), 6);
        assert!(tool.take_geometry_snapshot().is_some());

        // Inside the box survives, outside is discarded, in both frames.
        let inside = frame.to_world(Vec3::new(0.0, 0.0, -100.0));
        let outside = frame.to_world(Vec3::new(2_000.0, 0.0, -100.0));
        assert!(!world.globe_clip().discards(inside));
        assert!(world.globe_clip().discards(outside));

        let object = world.object(id).expect("object");
        assert!(!object.clip.discards(object.transform.to_local(inside)));
        assert!(object.clip.discards(object.transform.to_local(outside)));
    }

    #[test]
    fn negating_keeps_geometry_and_flips_planes() {
        let frame = anchor();
        let (mut world, _) = world_with_object(&frame);
        let camera = top_down();

        let mut tool = BoxSliceTool::new(box_params(&frame, 1000.0));
        tool.activate(&mut world, &camera);
        let before = *tool.current_volume();
        let back_normal = world.globe_clip().planes()[0].normal;

        tool.set_negated(&mut world, true);
        let after = tool.current_volume();
        assert_eq!(after.corners, before.corners);
        assert_eq!(after.center, before.center);
        assert_eq!(world.globe_clip().len(), 4);
        assert!(!world.globe_clip().union);
        let flipped = world.globe_clip().planes()[0].normal;
        assert_close((flipped + back_normal).length(), 0.0, 1e-12);

        // Interior is now the discarded region.
        let inside = frame.to_world(Vec3::new(0.0, 0.0, -100.0));
        assert!(world.globe_clip().discards(inside));
    }

    #[test]
    fn drag_event_resizes_and_resyncs() {
        let frame = anchor();
        let (mut world, id) = world_with_object(&frame);
        let camera = top_down();

        let mut tool = BoxSliceTool::new(box_params(&frame, 1000.0));
        tool.activate(&mut world, &camera);
        tool.take_geometry_snapshot();

        tool.on_plane_move(
            &mut world,
            DragEvent {
                handle: Side::Right,
                signed_distance: -200.0,
                displacement: frame.east.scale(200.0),
            },
        );

        let v = tool.current_volume();
        assert_close(v.length, 1_200.0, 0.1);
        assert_close(v.width, 1_000.0, 0.1);
        let snapshot = tool.take_geometry_snapshot().expect("geometry changed");
        assert_close(snapshot.height, 10_000.0, 1e-9);

        // The object's planes moved with the box.
        let object = world.object(id).expect("object");
        let newly_inside = frame.to_world(Vec3::new(650.0, 0.0, -100.0));
        assert!(!object.clip.discards(object.transform.to_local(newly_inside)));
    }

    #[test]
    fn snapshot_round_trip_reproduces_the_volume() {
        let frame = anchor();
        let (mut world, _) = world_with_object(&frame);
        let camera = top_down();

        let mut tool = BoxSliceTool::new(box_params(&frame, 1000.0));
        tool.activate(&mut world, &camera);
        let snapshot = tool.take_geometry_snapshot().expect("emitted");
        let before = *tool.current_volume();

        let mut revived = BoxSliceTool::new(BoxToolParams::from_snapshot(&snapshot));
        let mut other_world = World::new();
        revived.activate(&mut other_world, &camera);
        let after = revived.current_volume();

        for (a, b) in [
            (after.corners.bottom_left, before.corners.bottom_left),
            (after.corners.bottom_right, before.corners.bottom_right),
            (after.corners.top_left, before.corners.top_left),
            (after.corners.top_right, before.corners.top_right),
        ] {
            assert_close(a.distance(b), 0.0, 1e-6);
        }
        assert_close(after.lower_limit, before.lower_limit, 1e-6);
        assert_close(after.height, before.height, 1e-9);
    }

    #[test]
    fn view_seeded_box_starts_at_the_ground_center() {
        let frame = anchor();
        let mut world = World::new();
        let camera = top_down();

        let mut tool = BoxSliceTool::new(BoxToolParams::default());
        tool.activate(&mut world, &camera);

        let v = tool.current_volume();
        let center = camera.ground_center().expect("faces the globe");
        assert_close(v.corners.bottom_left.distance(center), 0.0, 1.0);

        let extent = camera.view_extent().expect("all corners hit");
        let local_tr = frame.to_local(v.corners.top_right) - frame.to_local(v.corners.bottom_left);
        // Roughly a third of the view in each direction.
        let span_east = extent.width() / 3.0 * foundation::math::geodesy::WGS84_A;
        assert!(local_tr.y > 0.0);
        assert_close(local_tr.x, span_east, span_east * 0.05);
    }

    #[test]
    fn handles_sit_on_their_edges_above_the_box() {
        let frame = anchor();
        let (mut world, _) = world_with_object(&frame);
        let camera = top_down();

        let mut tool = BoxSliceTool::new(box_params(&frame, 1000.0));
        tool.activate(&mut world, &camera);

        // Lower limit -5 km with height 10 km puts the box between
        // altitudes -5000 and +5000.
        let right = frame.to_local(tool.handle_position(Side::Right, &camera));
        assert_close(right.x, 500.0, 1.0);
        assert!(right.y.abs() <= 0.45 * 1000.0 + 1.0);
        assert_close(right.z, 5_020.0, 1.0);

        let up = frame.to_local(tool.handle_position(Side::Up, &camera));
        assert_close(up.z, 5_000.0, 1.0);
        let down = frame.to_local(tool.handle_position(Side::Down, &camera));
        assert_close(down.z, -5_000.0, 5.0);
    }

    #[test]
    fn hidden_activation_keeps_handles_unpickable() {
        let frame = anchor();
        let (mut world, _) = world_with_object(&frame);
        let camera = top_down();

        let mut params = box_params(&frame, 1000.0);
        params.outline_visible = false;
        let mut tool = BoxSliceTool::new(params);
        tool.activate(&mut world, &camera);

        let snapshot = tool.take_geometry_snapshot().expect("emitted");
        assert!(!snapshot.visible);

        // Clipping still applies while hidden.
        assert_eq!(world.globe_clip().len(), 6);

        let right_px = camera
            .world_to_screen(tool.handle_position(Side::Right, &camera))
            .expect("in front");
        assert!(!tool.on_pointer_down(&camera, right_px));

        // Showing the outline makes the handles pickable again.
        tool.set_outline_visible(true);
        assert!(tool.on_pointer_down(&camera, right_px));
    }

    #[test]
    fn negating_a_hidden_tool_keeps_handles_hidden() {
        let frame = anchor();
        let (mut world, _) = world_with_object(&frame);
        let camera = top_down();

        let mut params = box_params(&frame, 1000.0);
        params.outline_visible = false;
        let mut tool = BoxSliceTool::new(params);
        tool.activate(&mut world, &camera);

        tool.set_negated(&mut world, true);

        let right_px = camera
            .world_to_screen(tool.handle_position(Side::Right, &camera))
            .expect("in front");
        assert!(!tool.on_pointer_down(&camera, right_px));
    }

    #[test]
    fn lower_limit_stays_ground_relative_in_snapshots() {
        let frame = anchor();
        let (mut world, _) = world_with_object(&frame);
        world.set_ground_height(Some(1_500.0));
        let camera = top_down();

        let mut tool = BoxSliceTool::new(box_params(&frame, 1000.0));
        tool.activate(&mut world, &camera);

        // The absolute base altitude is the requested limit plus terrain.
        assert_close(tool.current_volume().lower_limit, -3_500.0, 1e-9);
        let snapshot = tool.take_geometry_snapshot().expect("emitted");
        assert_close(snapshot.lower_limit, -5_000.0, 1e-9);

        // Re-activating from the snapshot under the same terrain reproduces
        // the absolute base.
        let mut revived = BoxSliceTool::new(BoxToolParams::from_snapshot(&snapshot));
        let mut other_world = World::new();
        other_world.set_ground_height(Some(1_500.0));
        revived.activate(&mut other_world, &camera);
        assert_close(revived.current_volume().lower_limit, -3_500.0, 1e-9);
    }

    #[test]
    #[should_panic(expected = "before activation")]
    fn querying_geometry_before_activation_panics() {
        let tool = BoxSliceTool::new(BoxToolParams::default());
        let _ = tool.current_volume();
    }
}
