use foundation::GeoRect;
use foundation::math::geodesy::{
    Geodetic, altitude_of, geodetic_to_world, surface_point, with_altitude, world_to_geodetic,
};
use foundation::math::precision::stable_total_cmp_f64;
use foundation::math::{EnuFrame, Plane, Vec3};

/// Smallest box dimension the tools ever produce, in meters. Drags that
/// would shrink a dimension further translate the whole box instead.
pub const MIN_BOX_SIZE_M: f64 = 450.0;

pub const DEFAULT_BOX_HEIGHT_M: f64 = 10_000.0;
pub const DEFAULT_BOX_LOWER_LIMIT_M: f64 = -5_000.0;

// Defaults for boxes with a footprint up to this area, in square kilometers;
// between the two thresholds the defaults interpolate linearly.
const SMALL_FOOTPRINT_KM2: f64 = 0.005;
const LARGE_FOOTPRINT_KM2: f64 = 25.0;
const SMALL_BOX_HEIGHT_M: f64 = 300.0;
const SMALL_BOX_LOWER_LIMIT_M: f64 = -150.0;

/// One face of the slice box. `Left`/`Right` bound the box along its base
/// east-west axis, `Back`/`Front` along south-north, `Down`/`Up` vertically.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Front,
    Back,
    Up,
    Down,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::Back,
        Side::Front,
        Side::Left,
        Side::Right,
        Side::Up,
        Side::Down,
    ];
    pub const HORIZONTAL: [Side; 4] = [Side::Back, Side::Front, Side::Left, Side::Right];

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Front => Side::Back,
            Side::Back => Side::Front,
            Side::Up => Side::Down,
            Side::Down => Side::Up,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Up | Side::Down)
    }
}

/// Base rectangle corners, on the ellipsoid surface. "Bottom"/"top" are the
/// southern and northern edges, "left"/"right" the western and eastern ones.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SliceCorners {
    pub bottom_left: Vec3,
    pub bottom_right: Vec3,
    pub top_left: Vec3,
    pub top_right: Vec3,
}

impl SliceCorners {
    fn map(self, f: impl Fn(Vec3) -> Vec3) -> Self {
        Self {
            bottom_left: f(self.bottom_left),
            bottom_right: f(self.bottom_right),
            top_left: f(self.top_left),
            top_right: f(self.top_right),
        }
    }
}

/// Oriented slice box on the curved earth.
///
/// `lower_limit` is the absolute altitude of the box base; `center` sits at
/// `lower_limit + height / 2`. Updates are pure and return a new volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SliceVolume {
    pub corners: SliceCorners,
    pub center: Vec3,
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub lower_limit: f64,
}

/// Default box height and lower limit for a footprint area, interpolating
/// between close-up and full-depth values.
pub fn default_vertical_extent(area_km2: f64) -> (f64, f64) {
    if area_km2 <= SMALL_FOOTPRINT_KM2 {
        (SMALL_BOX_HEIGHT_M, SMALL_BOX_LOWER_LIMIT_M)
    } else if area_km2 < LARGE_FOOTPRINT_KM2 {
        let t = (area_km2 - SMALL_FOOTPRINT_KM2) / (LARGE_FOOTPRINT_KM2 - SMALL_FOOTPRINT_KM2);
        (
            SMALL_BOX_HEIGHT_M + (DEFAULT_BOX_HEIGHT_M - SMALL_BOX_HEIGHT_M) * t,
            SMALL_BOX_LOWER_LIMIT_M + (DEFAULT_BOX_LOWER_LIMIT_M - SMALL_BOX_LOWER_LIMIT_M) * t,
        )
    } else {
        (DEFAULT_BOX_HEIGHT_M, DEFAULT_BOX_LOWER_LIMIT_M)
    }
}

impl SliceVolume {
    /// Builds a volume from four base corner points in any order.
    ///
    /// The two western-most points become the left corners, latitude decides
    /// top against bottom, and all four are dropped to the ellipsoid surface.
    /// `lower_limit` is relative to `ground_altitude`; both it and `height`
    /// default by footprint area when not supplied.
    pub fn from_corner_points(
        points: [Vec3; 4],
        height: Option<f64>,
        lower_limit: Option<f64>,
        ground_altitude: f64,
    ) -> SliceVolume {
        let mut geo: Vec<(Geodetic, Vec3)> =
            points.iter().map(|p| (world_to_geodetic(*p), *p)).collect();
        geo.sort_by(|a, b| stable_total_cmp_f64(a.0.lon_rad, b.0.lon_rad));
        let (left, right) = geo.split_at(2);

        let pick = |pair: &[(Geodetic, Vec3)], top: bool| {
            let first_is_top = pair[0].0.lat_rad >= pair[1].0.lat_rad;
            if top == first_is_top { pair[0].1 } else { pair[1].1 }
        };

        let corners = SliceCorners {
            bottom_left: pick(left, false),
            bottom_right: pick(right, false),
            top_left: pick(left, true),
            top_right: pick(right, true),
        }
        .map(surface_point);

        let width = corners.top_left.distance(corners.bottom_left);
        let length = corners.bottom_right.distance(corners.bottom_left);

        let area_km2 = width * length * 1.0e-6;
        let (default_height, default_lower) = default_vertical_extent(area_km2);
        let height = height.unwrap_or(default_height).max(MIN_BOX_SIZE_M);
        let lower_limit = lower_limit.unwrap_or(default_lower) + ground_altitude;

        let base_center = corners.bottom_left.midpoint(corners.top_right);
        let center = with_altitude(base_center, lower_limit + 0.5 * height);

        SliceVolume {
            corners,
            center,
            width,
            length,
            height,
            lower_limit,
        }
    }

    /// Builds a volume occupying one third of a view extent, with the
    /// bottom-left corner at the view's ground center.
    pub fn from_view_extent(
        extent: GeoRect,
        ground_center: Vec3,
        height: Option<f64>,
        lower_limit: Option<f64>,
        ground_altitude: f64,
    ) -> SliceVolume {
        let bl = world_to_geodetic(surface_point(ground_center));
        let third = extent.scaled_from_south_west(1.0 / 3.0);
        let lon_span = third.width();
        let lat_span = third.height();

        let corner = |lat: f64, lon: f64| geodetic_to_world(Geodetic::new(lat, lon, 0.0));
        Self::from_corner_points(
            [
                corner(bl.lat_rad, bl.lon_rad),
                corner(bl.lat_rad, bl.lon_rad + lon_span),
                corner(bl.lat_rad + lat_span, bl.lon_rad),
                corner(bl.lat_rad + lat_span, bl.lon_rad + lon_span),
            ],
            height,
            lower_limit,
            ground_altitude,
        )
    }

    /// The two base corners spanning a horizontal side, ordered so that the
    /// side plane's outward normal falls to the right of travel.
    pub fn side_edge(&self, side: Side) -> [Vec3; 2] {
        let c = &self.corners;
        match side {
            Side::Back => [c.bottom_left, c.bottom_right],
            Side::Front => [c.top_right, c.top_left],
            Side::Right => [c.bottom_right, c.top_right],
            Side::Left => [c.top_left, c.bottom_left],
            Side::Up | Side::Down => panic!("vertical sides have no base edge"),
        }
    }

    /// Outward-facing plane for one side, `None` when the defining corners
    /// are degenerate.
    pub fn side_plane(&self, side: Side) -> Option<Plane> {
        match side {
            Side::Up | Side::Down => {
                let frame = EnuFrame::at(self.center);
                let normal = if side == Side::Up { frame.up } else { -frame.up };
                Plane::from_point_normal(self.center, normal)
                    .map(|p| p.offset_along_normal(0.5 * self.height))
            }
            _ => {
                let [p1, p2] = self.side_edge(side);
                Plane::vertical_through(p1, p2)
            }
        }
    }

    /// All active planes: four sides, plus the two caps unless `negate`.
    /// Deterministic order: back, front, left, right, up, down.
    pub fn planes(&self, negate: bool) -> Vec<Plane> {
        let sides: &[Side] = if negate { &Side::HORIZONTAL } else { &Side::ALL };
        sides
            .iter()
            .filter_map(|s| self.side_plane(*s))
            .map(|p| if negate { p.negated() } else { p })
            .collect()
    }

    /// Moves one horizontal side by `displacement`.
    ///
    /// When the moved face would cross the opposite one, or would shrink the
    /// box below the minimum size, both faces move together and the box
    /// translates instead of resizing.
    pub fn with_side_moved(&self, side: Side, displacement: Vec3) -> SliceVolume {
        assert!(!side.is_vertical(), "use with_vertical_moved for caps");

        let opposite_plane = self.side_plane(side.opposite());
        let mut corners = self.corners;
        let moved = |p: Vec3| p + displacement;
        match side {
            Side::Back => {
                corners.bottom_left = moved(corners.bottom_left);
                corners.bottom_right = moved(corners.bottom_right);
            }
            Side::Front => {
                corners.top_left = moved(corners.top_left);
                corners.top_right = moved(corners.top_right);
            }
            Side::Left => {
                corners.bottom_left = moved(corners.bottom_left);
                corners.top_left = moved(corners.top_left);
            }
            Side::Right => {
                corners.bottom_right = moved(corners.bottom_right);
                corners.top_right = moved(corners.top_right);
            }
            Side::Up | Side::Down => unreachable!(),
        }

        let moved_edge = match side {
            Side::Back => [corners.bottom_left, corners.bottom_right],
            Side::Front => [corners.top_left, corners.top_right],
            Side::Left => [corners.bottom_left, corners.top_left],
            Side::Right => [corners.bottom_right, corners.top_right],
            Side::Up | Side::Down => unreachable!(),
        };
        let crossed = opposite_plane
            .map(|p| moved_edge.iter().any(|c| p.signed_distance(*c) > 0.0))
            .unwrap_or(false);

        let (new_dim, old_dim) = match side {
            Side::Left | Side::Right => (
                corners.bottom_right.distance(corners.bottom_left),
                self.length,
            ),
            _ => (corners.top_left.distance(corners.bottom_left), self.width),
        };
        let both_sides = crossed || (new_dim < MIN_BOX_SIZE_M && new_dim < old_dim);

        if both_sides {
            let opposite = side.opposite();
            match opposite {
                Side::Back => {
                    corners.bottom_left = moved(self.corners.bottom_left);
                    corners.bottom_right = moved(self.corners.bottom_right);
                }
                Side::Front => {
                    corners.top_left = moved(self.corners.top_left);
                    corners.top_right = moved(self.corners.top_right);
                }
                Side::Left => {
                    corners.bottom_left = moved(self.corners.bottom_left);
                    corners.top_left = moved(self.corners.top_left);
                }
                Side::Right => {
                    corners.bottom_right = moved(self.corners.bottom_right);
                    corners.top_right = moved(self.corners.top_right);
                }
                Side::Up | Side::Down => unreachable!(),
            }
        }

        let corners = corners.map(surface_point);
        let center_shift = if both_sides {
            displacement
        } else {
            displacement.scale(0.5)
        };

        SliceVolume {
            corners,
            center: self.center + center_shift,
            width: corners.top_left.distance(corners.bottom_left),
            length: corners.bottom_right.distance(corners.bottom_left),
            height: self.height,
            lower_limit: self.lower_limit,
        }
    }

    /// Moves the up or down cap. `signed_distance` is positive toward the
    /// opposite cap, so a positive value shrinks the box. Height clamps to
    /// the minimum size; a clamped move translates the box vertically.
    pub fn with_vertical_moved(&self, signed_distance: f64, displacement: Vec3) -> SliceVolume {
        let requested = self.height - signed_distance;
        let clamped = requested < MIN_BOX_SIZE_M;
        let height = requested.max(MIN_BOX_SIZE_M);

        let center = self.center
            + if clamped {
                displacement
            } else {
                displacement.scale(0.5)
            };
        let lower_limit = altitude_of(center) - 0.5 * height;

        SliceVolume {
            corners: self.corners,
            center,
            width: self.width,
            length: self.length,
            height,
            lower_limit,
        }
    }
}
