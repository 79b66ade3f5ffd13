use foundation::math::{Vec2, Vec3};
use scene::view::Camera;
use scene::world::{ObjectId, World};

use crate::box_tool::{BoxSliceTool, BoxToolParams};
use crate::line_tool::{LineSliceTool, LineToolParams};
use crate::tool::{GeometrySnapshot, SliceMode, SliceTool};

/// Shape of a completed point collection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Point,
    Line,
    Rectangle,
}

/// Interface to the free-hand drawing tool that collects boundary points.
/// Completion is delivered back through [`Slicer::on_points_collected`].
pub trait PointCollectionTool {
    fn arm(&mut self, shape: ShapeKind);
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
}

/// Configuration for one slicing session. `lower_limit` is relative to the
/// ground altitude at the box center, in meters.
#[derive(Debug, Clone)]
pub struct SliceOptions {
    pub mode: Option<SliceMode>,
    pub points: Vec<Vec3>,
    pub negate: bool,
    pub lower_limit: Option<f64>,
    pub height: Option<f64>,
    pub outline_visible: bool,
}

impl Default for SliceOptions {
    fn default() -> Self {
        Self {
            mode: None,
            points: Vec::new(),
            negate: false,
            lower_limit: None,
            height: None,
            outline_visible: true,
        }
    }
}

enum State {
    Inactive,
    AwaitingPoints,
    Active { tool: Box<dyn SliceTool> },
}

/// Arms and disarms the slicing tools: selects a tool for the requested
/// mode, collects boundary points through the drawing tool when the mode
/// needs them, and tears everything down on deactivation.
pub struct Slicer {
    state: State,
    options: SliceOptions,
    point_tool: Box<dyn PointCollectionTool>,
    on_activate: Option<Box<dyn FnMut()>>,
    on_deactivate: Option<Box<dyn FnMut()>>,
    on_geometry_changed: Option<Box<dyn FnMut(&GeometrySnapshot)>>,
}

impl Slicer {
    pub fn new(point_tool: Box<dyn PointCollectionTool>) -> Self {
        Self {
            state: State::Inactive,
            options: SliceOptions::default(),
            point_tool,
            on_activate: None,
            on_deactivate: None,
            on_geometry_changed: None,
        }
    }

    pub fn set_on_activate(&mut self, callback: Box<dyn FnMut()>) {
        self.on_activate = Some(callback);
    }

    pub fn set_on_deactivate(&mut self, callback: Box<dyn FnMut()>) {
        self.on_deactivate = Some(callback);
    }

    pub fn set_on_geometry_changed(&mut self, callback: Box<dyn FnMut(&GeometrySnapshot)>) {
        self.on_geometry_changed = Some(callback);
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    pub fn is_awaiting_points(&self) -> bool {
        matches!(self.state, State::AwaitingPoints)
    }

    pub fn point_tool(&self) -> &dyn PointCollectionTool {
        self.point_tool.as_ref()
    }

    fn required_mode(&self) -> SliceMode {
        match self.options.mode {
            Some(mode) => mode,
            None => panic!("slicing mode must be set before activation"),
        }
    }

    /// Starts a slicing session. Modes that need boundary points and have
    /// none arm the drawing tool first; the others activate immediately.
    /// Activating while already active restarts the session.
    pub fn activate(&mut self, world: &mut World, camera: &Camera, options: SliceOptions) {
        if !matches!(self.state, State::Inactive) {
            self.deactivate(world);
        }
        self.options = options;

        match self.required_mode() {
            SliceMode::Box if self.options.points.is_empty() => {
                self.point_tool.arm(ShapeKind::Rectangle);
                self.state = State::AwaitingPoints;
            }
            SliceMode::Line if self.options.points.is_empty() => {
                self.point_tool.arm(ShapeKind::Line);
                self.state = State::AwaitingPoints;
            }
            _ => self.activate_tool(world, camera),
        }
    }

    /// Completion callback from the drawing tool. A line keeps only its
    /// first and last point; other shapes keep every point.
    pub fn on_points_collected(
        &mut self,
        world: &mut World,
        camera: &Camera,
        points: Vec<Vec3>,
        shape: ShapeKind,
    ) {
        if !matches!(self.state, State::AwaitingPoints) {
            return;
        }
        self.point_tool.disarm();

        self.options.points = match shape {
            ShapeKind::Line if points.len() > 2 => {
                vec![points[0], points[points.len() - 1]]
            }
            _ => points,
        };
        self.activate_tool(world, camera);
    }

    fn activate_tool(&mut self, world: &mut World, camera: &Camera) {
        let mut tool: Box<dyn SliceTool> = match self.required_mode() {
            SliceMode::Box | SliceMode::ViewBox => Box::new(BoxSliceTool::new(BoxToolParams {
                mode: self.required_mode(),
                corner_points: self.options.points.clone(),
                negate: self.options.negate,
                lower_limit: self.options.lower_limit,
                height: self.options.height,
                outline_visible: self.options.outline_visible,
            })),
            SliceMode::Line | SliceMode::ViewLine => {
                Box::new(LineSliceTool::new(LineToolParams {
                    points: self.options.points.clone(),
                    negate: self.options.negate,
                }))
            }
        };
        tool.activate(world, camera);
        self.state = State::Active { tool };
        if let Some(cb) = &mut self.on_activate {
            cb();
        }
        self.drain_snapshot();
    }

    /// Ends the session: disarms point collection if pending, clears every
    /// clip collection, and resets the options to defaults.
    pub fn deactivate(&mut self, world: &mut World) {
        match std::mem::replace(&mut self.state, State::Inactive) {
            State::Inactive => return,
            State::AwaitingPoints => self.point_tool.disarm(),
            State::Active { mut tool } => tool.deactivate(world),
        }
        world.clear_all_clip_planes();
        if let Some(cb) = &mut self.on_deactivate {
            cb();
        }
        self.options = SliceOptions::default();
    }

    /// Forwards a newly loaded object to the active tool.
    pub fn attach_object(&mut self, world: &mut World, object: ObjectId) {
        if let State::Active { tool } = &mut self.state {
            tool.attach_object(world, object);
        }
    }

    pub fn set_outline_visible(&mut self, visible: bool) {
        if let State::Active { tool } = &mut self.state {
            tool.set_outline_visible(visible);
        }
        self.drain_snapshot();
    }

    pub fn on_pointer_down(&mut self, camera: &Camera, pointer: Vec2) -> bool {
        match &mut self.state {
            State::Active { tool } => tool.on_pointer_down(camera, pointer),
            _ => false,
        }
    }

    pub fn on_pointer_move(
        &mut self,
        world: &mut World,
        camera: &Camera,
        pointer: Vec2,
        now_s: f64,
    ) {
        if let State::Active { tool } = &mut self.state {
            tool.on_pointer_move(world, camera, pointer, now_s);
        }
        self.drain_snapshot();
    }

    pub fn on_pointer_up(&mut self) {
        if let State::Active { tool } = &mut self.state {
            tool.on_pointer_up();
        }
    }

    pub fn on_render_tick(&mut self, camera: &Camera) {
        if let State::Active { tool } = &mut self.state {
            tool.on_render_tick(camera);
        }
    }

    pub fn camera_navigation_suppressed(&self) -> bool {
        match &self.state {
            State::Active { tool } => tool.camera_navigation_suppressed(),
            _ => false,
        }
    }

    fn drain_snapshot(&mut self) {
        let State::Active { tool } = &mut self.state else {
            return;
        };
        if let Some(snapshot) = tool.take_geometry_snapshot()
            && let Some(cb) = &mut self.on_geometry_changed
        {
            cb(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PointCollectionTool, ShapeKind, SliceOptions, Slicer};
    use crate::tool::SliceMode;
    use foundation::BoundingSphere;
    use foundation::math::geodesy::{Geodetic, geodetic_to_world};
    use foundation::math::local::EnuFrame;
    use foundation::math::Vec3;
    use scene::view::{Camera, Viewport};
    use scene::world::{SceneObject, SceneObjectKind, World};
    use scene::Transform;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct StubCollector {
        armed: Option<ShapeKind>,
    }

    impl PointCollectionTool for StubCollector {
        fn arm(&mut self, shape: ShapeKind) {
            self.armed = Some(shape);
        }
        fn disarm(&mut self) {
            self.armed = None;
        }
        fn is_armed(&self) -> bool {
            self.armed.is_some()
        }
    }

    fn anchor() -> EnuFrame {
        EnuFrame::at(geodetic_to_world(Geodetic::new(0.0, 0.0, 0.0)))
    }

    fn top_down() -> Camera {
        let frame = anchor();
        Camera::look_at(
            frame.to_world(Vec3::new(0.0, 0.0, 50_000.0)),
            frame.origin,
            frame.north,
            60f64.to_radians(),
            Viewport::new(1600.0, 1000.0),
        )
        .expect("valid view")
    }

    fn slicer() -> Slicer {
        Slicer::new(Box::new(StubCollector::default()))
    }

    fn view_box_options() -> SliceOptions {
        SliceOptions {
            mode: Some(SliceMode::ViewBox),
            ..Default::default()
        }
    }

    #[test]
    fn view_box_activates_immediately_and_signals() {
        let mut world = World::new();
        let camera = top_down();
        let mut slicer = slicer();

        let activations = Rc::new(Cell::new(0u32));
        let geometry_events = Rc::new(Cell::new(0u32));
        {
            let activations = activations.clone();
            slicer.set_on_activate(Box::new(move || activations.set(activations.get() + 1)));
            let geometry_events = geometry_events.clone();
            slicer.set_on_geometry_changed(Box::new(move |_| {
                geometry_events.set(geometry_events.get() + 1)
            }));
        }

        slicer.activate(&mut world, &camera, view_box_options());
        assert!(slicer.is_active());
        assert_eq!(activations.get(), 1);
        assert_eq!(geometry_events.get(), 1);
        assert_eq!(world.globe_clip().len(), 6);
    }

    #[test]
    fn box_mode_without_points_waits_for_the_drawing_tool() {
        let mut world = World::new();
        let camera = top_down();
        let mut slicer = slicer();

        slicer.activate(
            &mut world,
            &camera,
            SliceOptions {
                mode: Some(SliceMode::Box),
                ..Default::default()
            },
        );
        assert!(slicer.is_awaiting_points());
        assert!(slicer.point_tool().is_armed());
        assert!(world.globe_clip().is_empty());

        let frame = anchor();
        let h = 500.0;
        slicer.on_points_collected(
            &mut world,
            &camera,
            vec![
                frame.to_world(Vec3::new(-h, -h, 0.0)),
                frame.to_world(Vec3::new(h, -h, 0.0)),
                frame.to_world(Vec3::new(-h, h, 0.0)),
                frame.to_world(Vec3::new(h, h, 0.0)),
            ],
            ShapeKind::Rectangle,
        );
        assert!(slicer.is_active());
        assert!(!slicer.point_tool().is_armed());
        assert_eq!(world.globe_clip().len(), 6);
    }

    #[test]
    fn line_collection_keeps_only_the_endpoints() {
        let mut world = World::new();
        let camera = top_down();
        let mut slicer = slicer();

        slicer.activate(
            &mut world,
            &camera,
            SliceOptions {
                mode: Some(SliceMode::Line),
                ..Default::default()
            },
        );
        assert!(slicer.is_awaiting_points());

        let frame = anchor();
        // A dog-leg of five points; only the first and last define the cut.
        let first = frame.to_world(Vec3::new(-2_000.0, 0.0, 0.0));
        let last = frame.to_world(Vec3::new(2_000.0, 0.0, 0.0));
        let detour = frame.to_world(Vec3::new(0.0, 3_000.0, 0.0));
        slicer.on_points_collected(
            &mut world,
            &camera,
            vec![
                first,
                detour,
                frame.to_world(Vec3::new(500.0, 2_000.0, 0.0)),
                frame.to_world(Vec3::new(1_000.0, 1_000.0, 0.0)),
                last,
            ],
            ShapeKind::Line,
        );
        assert!(slicer.is_active());

        let planes = world.globe_clip().planes().to_vec();
        assert_eq!(planes.len(), 1);
        let plane = planes[0];
        assert!(plane.signed_distance(first).abs() < 1.0);
        assert!(plane.signed_distance(last).abs() < 1.0);
        // The detour point is off the cut plane.
        assert!(plane.signed_distance(detour).abs() > 1_000.0);
    }

    #[test]
    fn deactivate_clears_clips_and_resets() {
        let frame = anchor();
        let mut world = World::new();
        let id = world.add_object(SceneObject::new(
            SceneObjectKind::TiledModel,
            Transform::from_frame(frame),
            BoundingSphere::new(frame.origin, 5_000.0),
        ));
        let camera = top_down();
        let mut slicer = slicer();

        let deactivations = Rc::new(Cell::new(0u32));
        {
            let deactivations = deactivations.clone();
            slicer
                .set_on_deactivate(Box::new(move || deactivations.set(deactivations.get() + 1)));
        }

        slicer.activate(&mut world, &camera, view_box_options());
        assert!(!world.object(id).expect("object").clip.is_empty());

        slicer.deactivate(&mut world);
        assert!(!slicer.is_active());
        assert_eq!(deactivations.get(), 1);
        assert!(world.globe_clip().is_empty());
        assert!(world.object(id).expect("object").clip.is_empty());

        // Idempotent: a second deactivation does not signal again.
        slicer.deactivate(&mut world);
        assert_eq!(deactivations.get(), 1);
    }

    #[test]
    fn reactivation_restarts_the_session() {
        let mut world = World::new();
        let camera = top_down();
        let mut slicer = slicer();

        let deactivations = Rc::new(Cell::new(0u32));
        {
            let deactivations = deactivations.clone();
            slicer
                .set_on_deactivate(Box::new(move || deactivations.set(deactivations.get() + 1)));
        }

        slicer.activate(&mut world, &camera, view_box_options());
        slicer.activate(
            &mut world,
            &camera,
            SliceOptions {
                mode: Some(SliceMode::ViewLine),
                ..Default::default()
            },
        );
        assert!(slicer.is_active());
        assert_eq!(deactivations.get(), 1);
        assert_eq!(world.globe_clip().len(), 1);
    }

    #[test]
    fn late_objects_receive_planes_on_attach() {
        let frame = anchor();
        let mut world = World::new();
        let camera = top_down();
        let mut slicer = slicer();

        slicer.activate(&mut world, &camera, view_box_options());

        let id = world.add_object(SceneObject::new(
            SceneObjectKind::VolumeData,
            Transform::from_frame(frame),
            BoundingSphere::new(frame.origin, 2_000.0),
        ));
        assert!(world.object(id).expect("object").clip.is_empty());

        slicer.attach_object(&mut world, id);
        assert_eq!(world.object(id).expect("object").clip.len(), 6);
    }

    #[test]
    #[should_panic(expected = "slicing mode must be set")]
    fn activation_without_a_mode_panics() {
        let mut world = World::new();
        let camera = top_down();
        let mut slicer = slicer();
        slicer.activate(&mut world, &camera, SliceOptions::default());
    }
}
