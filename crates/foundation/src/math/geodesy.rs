use super::Vec3;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);
/// WGS84 second eccentricity squared.
pub const WGS84_EP2: f64 = (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);

/// Geodetic coordinates in radians and meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Geodetic {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub alt_m: f64,
}

impl Geodetic {
    pub fn new(lat_rad: f64, lon_rad: f64, alt_m: f64) -> Self {
        Self {
            lat_rad,
            lon_rad,
            alt_m,
        }
    }

    pub fn with_altitude(self, alt_m: f64) -> Self {
        Self { alt_m, ..self }
    }
}

/// Geodetic position to Earth-fixed Cartesian world coordinates (meters).
pub fn geodetic_to_world(geo: Geodetic) -> Vec3 {
    let sin_lat = geo.lat_rad.sin();
    let cos_lat = geo.lat_rad.cos();
    let sin_lon = geo.lon_rad.sin();
    let cos_lon = geo.lon_rad.cos();

    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let x = (n + geo.alt_m) * cos_lat * cos_lon;
    let y = (n + geo.alt_m) * cos_lat * sin_lon;
    let z = (n * (1.0 - WGS84_E2) + geo.alt_m) * sin_lat;

    Vec3::new(x, y, z)
}

/// Earth-fixed Cartesian world coordinates to geodetic (Bowring's method).
pub fn world_to_geodetic(world: Vec3) -> Geodetic {
    let p = (world.x * world.x + world.y * world.y).sqrt();
    let lon = world.y.atan2(world.x);

    let theta = (world.z * WGS84_A).atan2(p * WGS84_B);
    let sin_theta = theta.sin();
    let cos_theta = theta.cos();

    let lat = (world.z + WGS84_EP2 * WGS84_B * sin_theta * sin_theta * sin_theta)
        .atan2(p - WGS84_E2 * WGS84_A * cos_theta * cos_theta * cos_theta);

    let sin_lat = lat.sin();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let alt = p / lat.cos() - n;

    Geodetic::new(lat, lon, alt)
}

/// Altitude above the ellipsoid (meters).
pub fn altitude_of(world: Vec3) -> f64 {
    world_to_geodetic(world).alt_m
}

/// Same latitude/longitude, given altitude.
pub fn with_altitude(world: Vec3, alt_m: f64) -> Vec3 {
    geodetic_to_world(world_to_geodetic(world).with_altitude(alt_m))
}

/// Projection of a world point onto the ellipsoid surface (altitude 0).
pub fn surface_point(world: Vec3) -> Vec3 {
    with_altitude(world, 0.0)
}

/// Outward ellipsoid surface normal (geodetic up) at a world point.
pub fn surface_normal(world: Vec3) -> Vec3 {
    let geo = world_to_geodetic(world);
    let cos_lat = geo.lat_rad.cos();
    Vec3::new(
        cos_lat * geo.lon_rad.cos(),
        cos_lat * geo.lon_rad.sin(),
        geo.lat_rad.sin(),
    )
}

/// Nearest intersection of a ray with the WGS84 ellipsoid surface.
///
/// `dir` need not be unit length. Returns `None` when the ray misses the
/// ellipsoid or points away from it.
pub fn ray_ellipsoid_intersection(origin: Vec3, dir: Vec3) -> Option<Vec3> {
    // Scale to the unit sphere and solve the quadratic there.
    let o = Vec3::new(origin.x / WGS84_A, origin.y / WGS84_A, origin.z / WGS84_B);
    let d = Vec3::new(dir.x / WGS84_A, dir.y / WGS84_A, dir.z / WGS84_B);

    let a = d.dot(d);
    if a <= 0.0 {
        return None;
    }
    let b = 2.0 * o.dot(d);
    let c = o.dot(o) - 1.0;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t0 = (-b - sqrt_disc) / (2.0 * a);
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    let t = if t0 >= 0.0 {
        t0
    } else if t1 >= 0.0 {
        t1
    } else {
        return None;
    };

    Some(origin + dir.scale(t))
}
