//! The color module maps escape-time fields onto colors: HSV to hex
//! conversion, Lagrange interpolation over small control-point sets, and
//! the [`crate::color::ColorRamp`] that combines the two into a continuous
//! ramp for the [`crate::tea::Tea`] evaluator.

/// Folds an HSV triple into normalized `[0, 1]` components. If all three
/// inputs already sit in `[0, 1]` they pass through untouched; otherwise
/// hue is taken in degrees (wrapped mod 360) and saturation/value as
/// percents clamped to `[0, 100]`. The check looks at all three components
/// at once, so `(0.5, 50, 100)` reads as degree/percent, not a mix.
fn normalize_hsv(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let normalized = (0.0..=1.0).contains(&h)
        && (0.0..=1.0).contains(&s)
        && (0.0..=1.0).contains(&v);
    if normalized {
        (h, s, v)
    } else {
        (
            h.rem_euclid(360.0) / 360.0,
            s.clamp(0.0, 100.0) / 100.0,
            v.clamp(0.0, 100.0) / 100.0,
        )
    }
}

/// # hsv_to_hex
///
/// Converts an HSV color to a `#rrggbb` hex string. Accepts either
/// normalized components (all in `[0, 1]`) or hue in degrees with
/// saturation/value in percent; see [`normalize_hsv`] for how the two are
/// told apart.
///
/// # Example
///
/// ```rust
/// use fractogen::color::hsv_to_hex;
///
/// assert_eq!(hsv_to_hex(0.0, 1.0, 1.0), "#ff0000");
/// assert_eq!(hsv_to_hex(120.0, 100.0, 100.0), "#00ff00");
/// ```
pub fn hsv_to_hex(h: f64, s: f64, v: f64) -> String {
    let (h, s, v) = normalize_hsv(h, s, v);
    // Standard six-sector HSV model.
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    format!(
        "#{:02x}{:02x}{:02x}",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8
    )
}

/// # lagrange_interpolate
///
/// Evaluates the unique polynomial through the given `(x, y)` control
/// points at `x`, using the Lagrange basis-product formula. Control x
/// coordinates must be distinct; this is meant for the handful of stops a
/// color ramp carries, not for dense data.
///
/// # Example
///
/// ```rust
/// use fractogen::color::lagrange_interpolate;
///
/// // A parabola through three of its own points.
/// let points = [(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)];
/// assert!((lagrange_interpolate(&points, 3.0) - 9.0).abs() < 1e-9);
/// ```
pub fn lagrange_interpolate(points: &[(f64, f64)], x: f64) -> f64 {
    let mut sum = 0.0;
    for (i, &(xi, yi)) in points.iter().enumerate() {
        let mut basis = 1.0;
        for (j, &(xj, _)) in points.iter().enumerate() {
            if i != j {
                basis *= (x - xj) / (xi - xj);
            }
        }
        sum += yi * basis;
    }
    sum
}

/// # ColorRamp
///
/// A continuous map from a normalized escape index `t` in `[0, 1]` to a hex
/// color, plus a distinct interior color for cells that never escape. Two
/// flavours:
///
/// * [`ColorRamp::direct`] maps `t` straight onto the hue circle at full
///   saturation and value.
/// * [`ColorRamp::from_controls`] fits Lagrange curves through a small set
///   of HSV control stops (evenly spaced over `[0, 1]`) and samples them,
///   giving smooth user-designed ramps from a handful of colors.
///
/// # Example
///
/// ```rust
/// use fractogen::color::ColorRamp;
///
/// let ramp = ColorRamp::direct();
/// assert_eq!(ramp.color_at(0.0), "#ff0000");
/// assert_eq!(ramp.interior_color(), "#000000");
/// ```
#[derive(Clone, Debug)]
pub struct ColorRamp {
    /// Normalized HSV stops, evenly spaced over the ramp. Empty means the
    /// direct hue mapping.
    controls: Vec<(f64, f64, f64)>,
    interior: String,
}

impl ColorRamp {
    /// The plain ramp: hue equals `t`, full saturation and value.
    pub fn direct() -> Self {
        ColorRamp {
            controls: vec![],
            interior: "#000000".to_string(),
        }
    }

    /// A ramp through the given HSV control stops. Stops accept the same
    /// dual ranges as [`hsv_to_hex`] and are normalized up front; they are
    /// spread evenly over `t` in `[0, 1]` in the order given.
    pub fn from_controls(controls: Vec<(f64, f64, f64)>) -> Self {
        let controls = controls
            .into_iter()
            .map(|(h, s, v)| normalize_hsv(h, s, v))
            .collect();
        ColorRamp {
            controls,
            interior: "#000000".to_string(),
        }
    }

    /// Replaces the interior color (hex string) used for cells inside the
    /// set.
    pub fn with_interior_color(mut self, color: impl Into<String>) -> Self {
        self.interior = color.into();
        self
    }

    /// The color for cells that never escape.
    pub fn interior_color(&self) -> &str {
        &self.interior
    }

    /// # color_at
    ///
    /// Samples the ramp at `t`. For control-point ramps the hue, saturation
    /// and value curves are each interpolated at `t·(stops − 1)`; the
    /// interpolated hue wraps back into `[0, 1)` (hue is circular, and the
    /// polynomial is free to overshoot) while saturation and value clamp.
    pub fn color_at(&self, t: f64) -> String {
        match self.controls.len() {
            0 => hsv_to_hex(t.clamp(0.0, 1.0).rem_euclid(1.0), 1.0, 1.0),
            1 => {
                let (h, s, v) = self.controls[0];
                hsv_to_hex(h, s, v)
            }
            stops => {
                let x = t.clamp(0.0, 1.0) * (stops - 1) as f64;
                let curve = |component: fn(&(f64, f64, f64)) -> f64| -> Vec<(f64, f64)> {
                    self.controls
                        .iter()
                        .enumerate()
                        .map(|(i, stop)| (i as f64, component(stop)))
                        .collect()
                };
                let h = lagrange_interpolate(&curve(|stop| stop.0), x).rem_euclid(1.0);
                let s = lagrange_interpolate(&curve(|stop| stop.1), x).clamp(0.0, 1.0);
                let v = lagrange_interpolate(&curve(|stop| stop.2), x).clamp(0.0, 1.0);
                hsv_to_hex(h, s, v)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hsv_primaries_normalized() {
        assert_eq!(hsv_to_hex(0.0, 1.0, 1.0), "#ff0000");
        assert_eq!(hsv_to_hex(1.0 / 3.0, 1.0, 1.0), "#00ff00");
        assert_eq!(hsv_to_hex(2.0 / 3.0, 1.0, 1.0), "#0000ff");
    }

    #[test]
    fn test_hsv_degree_percent_form() {
        assert_eq!(hsv_to_hex(120.0, 100.0, 100.0), "#00ff00");
        assert_eq!(hsv_to_hex(240.0, 100.0, 100.0), "#0000ff");
        // Hue wraps mod 360 in the degree form.
        assert_eq!(hsv_to_hex(480.0, 100.0, 100.0), "#00ff00");
    }

    #[test]
    fn test_hsv_grey_axis() {
        assert_eq!(hsv_to_hex(0.0, 0.0, 0.0), "#000000");
        assert_eq!(hsv_to_hex(0.0, 0.0, 1.0), "#ffffff");
        assert_eq!(hsv_to_hex(200.0, 0.0, 50.0), "#808080");
    }

    #[test]
    fn test_hsv_all_in_unit_range_reads_normalized() {
        // (0.5, 1, 1) is a valid normalized triple: cyan, not "0.5 degrees".
        assert_eq!(hsv_to_hex(0.5, 1.0, 1.0), "#00ffff");
    }

    #[test]
    fn test_lagrange_recovers_control_points() {
        let points = [(0.0, 2.0), (1.0, -1.0), (2.0, 0.5), (3.0, 4.0)];
        for &(x, y) in &points {
            assert!((lagrange_interpolate(&points, x) - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_lagrange_is_linear_through_two_points() {
        let points = [(0.0, 1.0), (2.0, 5.0)];
        assert!((lagrange_interpolate(&points, 1.0) - 3.0).abs() < 1e-12);
        assert!((lagrange_interpolate(&points, 4.0) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_lagrange_fits_a_parabola() {
        let points = [(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)];
        assert!((lagrange_interpolate(&points, 1.5) - 2.25).abs() < 1e-9);
        assert!((lagrange_interpolate(&points, -1.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_direct_ramp_walks_the_hue_circle() {
        let ramp = ColorRamp::direct();
        assert_eq!(ramp.color_at(0.0), "#ff0000");
        assert_eq!(ramp.color_at(1.0 / 3.0), "#00ff00");
        assert_eq!(ramp.color_at(2.0 / 3.0), "#0000ff");
    }

    #[test]
    fn test_ramp_hits_its_control_stops() {
        let ramp = ColorRamp::from_controls(vec![
            (0.0, 1.0, 1.0),
            (1.0 / 3.0, 1.0, 1.0),
            (2.0 / 3.0, 1.0, 1.0),
        ]);
        assert_eq!(ramp.color_at(0.0), "#ff0000");
        assert_eq!(ramp.color_at(0.5), "#00ff00");
        assert_eq!(ramp.color_at(1.0), "#0000ff");
    }

    #[test]
    fn test_ramp_normalizes_degree_percent_stops() {
        let ramp = ColorRamp::from_controls(vec![(0.0, 100.0, 100.0), (120.0, 100.0, 100.0)]);
        assert_eq!(ramp.color_at(0.0), "#ff0000");
        assert_eq!(ramp.color_at(1.0), "#00ff00");
    }

    #[test]
    fn test_single_stop_is_a_constant_ramp() {
        let ramp = ColorRamp::from_controls(vec![(2.0 / 3.0, 1.0, 1.0)]);
        assert_eq!(ramp.color_at(0.0), ramp.color_at(0.9));
        assert_eq!(ramp.color_at(0.5), "#0000ff");
    }

    #[test]
    fn test_interior_color_is_configurable() {
        let ramp = ColorRamp::direct().with_interior_color("#112233");
        assert_eq!(ramp.interior_color(), "#112233");
    }

    #[test]
    fn test_color_at_clamps_out_of_range_input() {
        let ramp = ColorRamp::direct();
        assert_eq!(ramp.color_at(-0.5), ramp.color_at(0.0));
    }
}
