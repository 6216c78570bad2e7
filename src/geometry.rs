//! Pure coordinate helpers shared by every strategy. No driver calls here.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::types::{ProportionalPoint, Rect, TrajectorySample};

/// Midpoint of a rectangle.
pub fn box_center(rect: &Rect) -> (f64, f64) {
    (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

/// Convert an in-container pixel coordinate into fractions of the container's
/// dimensions. A zero-sized container yields `inf`/`NaN` components — callers
/// must guard before dividing.
pub fn to_proportional(
    x_in_container: f64,
    y_in_container: f64,
    container_width: f64,
    container_height: f64,
) -> ProportionalPoint {
    ProportionalPoint {
        proportion_x: x_in_container / container_width,
        proportion_y: y_in_container / container_height,
    }
}

/// Extract the `rotate(<deg>deg)` component from an inline style string.
/// Returns `0.0` when no rotate transform is present. Unrelated transforms
/// (translate, scale) in the same string are ignored.
pub fn rotation_from_transform(style: &str) -> f64 {
    static ROTATE_RE: OnceLock<Regex> = OnceLock::new();
    let re = ROTATE_RE.get_or_init(|| Regex::new(r"rotate\(\s*(-?[0-9]*\.?[0-9]+)deg").unwrap());
    re.captures(style)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Stopping signal for the arced-slide sweep: true iff the last two samples'
/// proportional-x values are bit-for-bit identical. Fewer than two samples is
/// never stationary.
pub fn is_stationary(samples: &[TrajectorySample]) -> bool {
    match samples {
        [.., a, b] => {
            a.piece_center.proportion_x.to_bits() == b.piece_center.proportion_x.to_bits()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(proportion_x: f64) -> TrajectorySample {
        TrajectorySample {
            pixels_from_slider_origin: 0,
            piece_rotation_angle: 0.0,
            piece_center: ProportionalPoint {
                proportion_x,
                proportion_y: 0.5,
            },
        }
    }

    #[test]
    fn box_center_is_midpoint() {
        let rect = Rect {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
        };
        assert_eq!(box_center(&rect), (60.0, 45.0));
    }

    #[test]
    fn to_proportional_round_trips() {
        for (w, h) in [(300.0, 200.0), (413.0, 127.0), (1.0, 1.0)] {
            let p = to_proportional(0.3 * w, 0.7 * h, w, h);
            let back = to_proportional(p.proportion_x * w, p.proportion_y * h, w, h);
            assert_eq!(p, back);
        }
    }

    #[test]
    fn rotation_absent_yields_zero() {
        assert_eq!(rotation_from_transform(""), 0.0);
        assert_eq!(rotation_from_transform("transform: translate(3px, 4px);"), 0.0);
        assert_eq!(rotation_from_transform("left: 42px; top: 7px;"), 0.0);
    }

    #[test]
    fn rotation_extracts_exact_value() {
        assert_eq!(rotation_from_transform("transform: rotate(37.5deg)"), 37.5);
        assert_eq!(rotation_from_transform("transform: rotate(-90deg);"), -90.0);
    }

    #[test]
    fn rotation_ignores_unrelated_transforms() {
        let style = "transform: translate(10px, 5px) rotate(12.25deg) scale(1.1);";
        assert_eq!(rotation_from_transform(style), 12.25);
    }

    #[test]
    fn stationary_requires_exact_equality() {
        assert!(is_stationary(&[sample(0.5), sample(0.5)]));
        assert!(!is_stationary(&[sample(0.5), sample(0.5000000000000001)]));
        assert!(!is_stationary(&[sample(0.5)]));
        assert!(!is_stationary(&[]));
        // Earlier samples are irrelevant, only the last two count.
        assert!(is_stationary(&[sample(0.1), sample(0.3), sample(0.3)]));
    }
}
