use std::cmp::Ordering;

/// Canonical form of an `f64` for ordering: `-0.0` folds to `0.0` and every
/// NaN payload folds to the positive quiet NaN.
pub fn canonical_f64(v: f64) -> f64 {
    if v.is_nan() {
        f64::NAN
    } else if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Total order over `f64` that is stable across platforms: canonicalizes the
/// inputs, then applies IEEE `total_cmp`. NaN sorts last.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

#[cfg(test)]
mod tests {
    use super::{canonical_f64, stable_total_cmp_f64};
    use std::cmp::Ordering;

    #[test]
    fn zeroes_compare_equal() {
        assert_eq!(stable_total_cmp_f64(-0.0, 0.0), Ordering::Equal);
    }

    #[test]
    fn nan_sorts_last() {
        assert_eq!(stable_total_cmp_f64(f64::NAN, f64::INFINITY), Ordering::Greater);
        assert_eq!(stable_total_cmp_f64(1.0, f64::NAN), Ordering::Less);
        assert_eq!(stable_total_cmp_f64(f64::NAN, -f64::NAN), Ordering::Equal);
    }

    #[test]
    fn ordinary_values_order_numerically() {
        assert_eq!(stable_total_cmp_f64(-2.5, 1.0), Ordering::Less);
        assert_eq!(stable_total_cmp_f64(3.0, 3.0), Ordering::Equal);
        assert!(canonical_f64(-0.0).is_sign_positive());
    }
}
