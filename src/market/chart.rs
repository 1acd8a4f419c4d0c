//! Sparkline samples to chart points.
//!
//! Samples carry no timestamps, so the x value is the sample index
//! (`0..len`), oldest first.

/// Fraction of the value range added above and below the line.
const Y_PADDING: f64 = 0.05;

/// Map samples to `(index, value)` points.
pub fn sparkline_series(samples: &[f64]) -> Vec<(f64, f64)> {
    samples
        .iter()
        .enumerate()
        .map(|(i, &value)| (i as f64, value))
        .collect()
}

/// X axis bounds for a series of `len` samples.
pub fn x_bounds(len: usize) -> [f64; 2] {
    [0.0, len.saturating_sub(1).max(1) as f64]
}

/// Y axis bounds with a little padding. `None` for an empty series.
///
/// A flat series is widened around its value so the line is drawn mid-height.
pub fn y_bounds(samples: &[f64]) -> Option<[f64; 2]> {
    let mut finite = samples.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let range = max - min;
    if range == 0.0 {
        let half = (min.abs() * Y_PADDING).max(f64::EPSILON);
        return Some([min - half, max + half]);
    }

    let pad = range * Y_PADDING;
    Some([min - pad, max + pad])
}

/// Legend label for a coin's 7 day series.
pub fn series_label(name: &str) -> String {
    format!("{} (7d)", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_series_uses_synthetic_index() {
        let points = sparkline_series(&[10.0, 12.5, 11.0]);
        assert_eq!(points, vec![(0.0, 10.0), (1.0, 12.5), (2.0, 11.0)]);
    }

    #[test]
    fn test_empty_series() {
        assert!(sparkline_series(&[]).is_empty());
        assert_eq!(y_bounds(&[]), None);
        assert_eq!(x_bounds(0), [0.0, 1.0]);
    }

    #[test]
    fn test_x_bounds() {
        assert_eq!(x_bounds(168), [0.0, 167.0]);
        assert_eq!(x_bounds(1), [0.0, 1.0]);
    }

    #[test]
    fn test_y_bounds_padding() {
        let [lo, hi] = y_bounds(&[100.0, 200.0, 150.0]).unwrap();
        assert!((lo - 95.0).abs() < 1e-9);
        assert!((hi - 205.0).abs() < 1e-9);
    }

    #[test]
    fn test_y_bounds_flat_series() {
        let [lo, hi] = y_bounds(&[1.0, 1.0, 1.0]).unwrap();
        assert!(lo < 1.0 && hi > 1.0);
    }

    #[test]
    fn test_y_bounds_skips_non_finite() {
        let [lo, hi] = y_bounds(&[f64::NAN, 10.0, 20.0]).unwrap();
        assert!(lo < 10.0 && hi > 20.0);
    }

    #[test]
    fn test_label() {
        assert_eq!(series_label("Bitcoin"), "Bitcoin (7d)");
    }
}
