use foundation::math::{Vec2, Vec3};
use scene::picking::{PickOptions, pick_nearest};
use scene::view::Camera;

/// Idle hover picking is rate limited to this interval, in seconds. Drag
/// moves are never debounced.
pub const HOVER_DEBOUNCE_S: f64 = 0.25;

/// How a handle gets its position: a fixed point, or refreshed by the owner
/// once per render tick through [`DragHandleSet::set_position`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum HandlePlacement {
    Static(Vec3),
    Owner,
}

/// Reference point defining a handle's drag axis: either another handle or
/// an explicit world point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum OppositeRef<H> {
    Handle(H),
    Point(Vec3),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandleSpec<H> {
    pub id: H,
    pub placement: HandlePlacement,
    pub opposite: OppositeRef<H>,
}

/// One completed pointer-move step of a drag. `signed_distance` is the
/// metric drag length, positive toward the opposite reference;
/// `displacement` is the same move as a world-space vector.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragEvent<H> {
    pub handle: H,
    pub signed_distance: f64,
    pub displacement: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    Pointer,
    Grabbing,
}

#[derive(Debug, Clone)]
struct HandleState<H> {
    spec: HandleSpec<H>,
    position: Vec3,
    highlighted: bool,
}

/// Named draggable 3D affordances with screen-space picking.
///
/// The set knows nothing about what its handles represent; the owner wires
/// the returned [`DragEvent`]s to its own geometry.
#[derive(Debug)]
pub struct DragHandleSet<H> {
    handles: Vec<HandleState<H>>,
    visible: bool,
    active: Option<H>,
    hovered: Option<H>,
    next_hover_pick_s: f64,
    cursor: CursorStyle,
    pick: PickOptions,
}

impl<H: Copy + PartialEq> DragHandleSet<H> {
    pub fn new(specs: Vec<HandleSpec<H>>) -> Self {
        let handles = specs
            .into_iter()
            .map(|spec| HandleState {
                position: match spec.placement {
                    HandlePlacement::Static(p) => p,
                    HandlePlacement::Owner => Vec3::ZERO,
                },
                spec,
                highlighted: false,
            })
            .collect();
        Self {
            handles,
            visible: false,
            active: None,
            hovered: None,
            next_hover_pick_s: 0.0,
            cursor: CursorStyle::Default,
            pick: PickOptions::default(),
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.active = None;
        self.hovered = None;
        self.cursor = CursorStyle::Default;
        for h in &mut self.handles {
            h.highlighted = false;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn ids(&self) -> Vec<H> {
        self.handles.iter().map(|h| h.spec.id).collect()
    }

    pub fn set_position(&mut self, id: H, position: Vec3) {
        if let Some(h) = self.handles.iter_mut().find(|h| h.spec.id == id) {
            h.position = position;
        }
    }

    pub fn position(&self, id: H) -> Option<Vec3> {
        self.handles
            .iter()
            .find(|h| h.spec.id == id)
            .map(|h| h.position)
    }

    pub fn highlighted(&self, id: H) -> bool {
        self.handles
            .iter()
            .find(|h| h.spec.id == id)
            .is_some_and(|h| h.highlighted)
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn active(&self) -> Option<H> {
        self.active
    }

    /// Handle under the pointer from the last hover pick, if any.
    pub fn hovered(&self) -> Option<H> {
        self.hovered
    }

    /// Camera navigation stays suppressed for the duration of a drag.
    pub fn camera_navigation_suppressed(&self) -> bool {
        self.active.is_some()
    }

    fn pick_handle(&self, camera: &Camera, pointer: Vec2) -> Option<H> {
        if !self.visible {
            return None;
        }
        let candidates: Vec<(H, Vec2)> = self
            .handles
            .iter()
            .filter_map(|h| {
                camera
                    .world_to_screen(h.position)
                    .map(|screen| (h.spec.id, screen))
            })
            .collect();
        pick_nearest(&candidates, pointer, self.pick)
    }

    fn set_highlight(&mut self, id: Option<H>) {
        for h in &mut self.handles {
            h.highlighted = id == Some(h.spec.id);
        }
    }

    /// Starts a drag when the pointer is over a handle. Returns whether a
    /// handle was captured.
    pub fn on_pointer_down(&mut self, camera: &Camera, pointer: Vec2) -> bool {
        let Some(id) = self.pick_handle(camera, pointer) else {
            return false;
        };
        self.active = Some(id);
        self.hovered = None;
        self.set_highlight(Some(id));
        self.cursor = CursorStyle::Grabbing;
        true
    }

    /// Processes a pointer move. During a drag, converts the pointer offset
    /// into a metric move along the handle's live axis and reports it;
    /// degenerate axes and failed projections drop the event. While idle,
    /// runs debounced hover highlighting.
    pub fn on_pointer_move(
        &mut self,
        camera: &Camera,
        pointer: Vec2,
        now_s: f64,
    ) -> Option<DragEvent<H>> {
        match self.active {
            Some(id) => self.drag_event(camera, pointer, id),
            None => {
                self.update_hover(camera, pointer, now_s);
                None
            }
        }
    }

    /// Ends a drag and returns to debounced hover mode.
    pub fn on_pointer_up(&mut self) {
        self.active = None;
        self.set_highlight(None);
        self.cursor = CursorStyle::Default;
    }

    fn opposite_position(&self, spec: &HandleSpec<H>) -> Option<Vec3> {
        match spec.opposite {
            OppositeRef::Handle(other) => self.position(other),
            OppositeRef::Point(p) => Some(p),
        }
    }

    fn drag_event(&mut self, camera: &Camera, pointer: Vec2, id: H) -> Option<DragEvent<H>> {
        let state = self.handles.iter().find(|h| h.spec.id == id)?;
        let handle3d = state.position;
        let opposite3d = self.opposite_position(&state.spec)?;

        let handle2d = camera.world_to_screen(handle3d)?;
        let opposite2d = camera.world_to_screen(opposite3d)?;

        let axis2d = opposite2d - handle2d;
        let axis2d_len2 = axis2d.dot(axis2d);
        if axis2d_len2 <= 0.0 {
            return None;
        }

        // Unbounded scalar projection of the pointer offset onto the screen
        // axis toward the opposite reference.
        let scalar = (pointer - handle2d).dot(axis2d) / axis2d_len2;
        let distance_px = axis2d.scale(scalar).length();
        let distance_m = distance_px * camera.pixel_size_at(handle3d);
        let signed_distance = if scalar < 0.0 { -distance_m } else { distance_m };

        let axis3d = (opposite3d - handle3d).normalized()?;
        let displacement = axis3d.scale(signed_distance);

        if matches!(state.spec.placement, HandlePlacement::Static(_)) {
            self.set_position(id, handle3d + displacement);
        }

        Some(DragEvent {
            handle: id,
            signed_distance,
            displacement,
        })
    }

    fn update_hover(&mut self, camera: &Camera, pointer: Vec2, now_s: f64) {
        if now_s < self.next_hover_pick_s {
            return;
        }
        self.next_hover_pick_s = now_s + HOVER_DEBOUNCE_S;
        let hit = self.pick_handle(camera, pointer);
        self.hovered = hit;
        self.set_highlight(hit);
        self.cursor = if hit.is_some() {
            CursorStyle::Pointer
        } else {
            CursorStyle::Default
        };
    }
}
