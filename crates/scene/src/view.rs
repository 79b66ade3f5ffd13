use foundation::GeoRect;
use foundation::math::geodesy::{altitude_of, ray_ellipsoid_intersection, world_to_geodetic};
use foundation::math::{Vec2, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width_px: f64,
    pub height_px: f64,
}

impl Viewport {
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            width_px,
            height_px,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(0.5 * self.width_px, 0.5 * self.height_px)
    }
}

/// World-space ray with a unit direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// Perspective camera with a deterministic world/screen mapping.
///
/// Screen coordinates are in pixels, origin at the top-left corner, y down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    pub fov_y_rad: f64,
    pub viewport: Viewport,
}

impl Camera {
    /// Camera at `position` looking at `target`, rolled so that `up_hint`
    /// projects onto the screen's upward direction. Returns `None` when the
    /// target coincides with the position or `up_hint` is parallel to the
    /// view direction.
    pub fn look_at(
        position: Vec3,
        target: Vec3,
        up_hint: Vec3,
        fov_y_rad: f64,
        viewport: Viewport,
    ) -> Option<Self> {
        let forward = (target - position).normalized()?;
        let right = forward.cross(up_hint).normalized()?;
        let up = right.cross(forward);
        Some(Self {
            position,
            forward,
            right,
            up,
            fov_y_rad,
            viewport,
        })
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    fn half_extents(&self) -> (f64, f64) {
        let half_h = (0.5 * self.fov_y_rad).tan();
        let half_w = half_h * self.viewport.width_px / self.viewport.height_px;
        (half_w, half_h)
    }

    /// Pixel position of a world point. `None` for points at or behind the
    /// camera plane; points outside the viewport still project.
    pub fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let rel = world - self.position;
        let depth = rel.dot(self.forward);
        if depth <= 0.0 {
            return None;
        }

        let (half_w, half_h) = self.half_extents();
        let ndc_x = rel.dot(self.right) / (depth * half_w);
        let ndc_y = rel.dot(self.up) / (depth * half_h);

        Some(Vec2::new(
            0.5 * (ndc_x + 1.0) * self.viewport.width_px,
            0.5 * (1.0 - ndc_y) * self.viewport.height_px,
        ))
    }

    /// World ray through a pixel position.
    pub fn pick_ray(&self, screen: Vec2) -> Option<Ray> {
        let (half_w, half_h) = self.half_extents();
        let ndc_x = 2.0 * screen.x / self.viewport.width_px - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / self.viewport.height_px;

        let dir = (self.forward
            + self.right.scale(ndc_x * half_w)
            + self.up.scale(ndc_y * half_h))
        .normalized()?;
        Some(Ray {
            origin: self.position,
            dir,
        })
    }

    /// Metric size of one pixel at the depth of a world point. Zero for
    /// points at or behind the camera plane.
    pub fn pixel_size_at(&self, world: Vec3) -> f64 {
        let depth = (world - self.position).dot(self.forward);
        if depth <= 0.0 {
            return 0.0;
        }
        2.0 * depth * (0.5 * self.fov_y_rad).tan() / self.viewport.height_px
    }

    /// Ellipsoid point under the viewport center, when the view line hits
    /// the globe.
    pub fn ground_center(&self) -> Option<Vec3> {
        let ray = self.pick_ray(self.viewport.center())?;
        ray_ellipsoid_intersection(ray.origin, ray.dir)
    }

    pub fn is_underground(&self) -> bool {
        altitude_of(self.position) < 0.0
    }

    /// Geodetic rectangle spanned by the four viewport corners projected
    /// onto the ellipsoid. `None` when any corner misses the globe.
    pub fn view_extent(&self) -> Option<GeoRect> {
        let w = self.viewport.width_px;
        let h = self.viewport.height_px;
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(w, 0.0),
            Vec2::new(0.0, h),
            Vec2::new(w, h),
        ];

        let mut west = f64::INFINITY;
        let mut south = f64::INFINITY;
        let mut east = f64::NEG_INFINITY;
        let mut north = f64::NEG_INFINITY;
        for corner in corners {
            let ray = self.pick_ray(corner)?;
            let hit = ray_ellipsoid_intersection(ray.origin, ray.dir)?;
            let geo = world_to_geodetic(hit);
            west = west.min(geo.lon_rad);
            east = east.max(geo.lon_rad);
            south = south.min(geo.lat_rad);
            north = north.max(geo.lat_rad);
        }

        Some(GeoRect::new(west, south, east, north))
    }
}
