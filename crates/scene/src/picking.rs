use foundation::math::Vec2;
use foundation::math::precision::stable_total_cmp_f64;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    /// Maximum pointer-to-candidate distance, in pixels.
    pub radius_px: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self { radius_px: 16.0 }
    }
}

/// Deterministic screen-space proximity pick.
///
/// Ordering contract:
/// - The candidate closest to the pointer wins.
/// - At equal distance, the earlier entry in `candidates` wins.
///
/// Candidates further than `radius_px` from the pointer are ignored.
pub fn pick_nearest<I: Copy>(
    candidates: &[(I, Vec2)],
    pointer: Vec2,
    opts: PickOptions,
) -> Option<I> {
    let mut best: Option<(f64, I)> = None;
    for (id, screen) in candidates {
        let d = screen.distance(pointer);
        if d > opts.radius_px {
            continue;
        }
        best = match best {
            None => Some((d, *id)),
            Some((bd, bid)) => {
                if stable_total_cmp_f64(d, bd).is_lt() {
                    Some((d, *id))
                } else {
                    Some((bd, bid))
                }
            }
        };
    }
    best.map(|(_, id)| id)
}
