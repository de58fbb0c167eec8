//! Color tables for probe points.
//!
//! Stateless lookup/interpolation functions — no hidden globals. The DCNN
//! palette is the nine-entry ramp the recording project published (low
//! layers blue, high layers red); the activity gradient is a diverging
//! blue-white-red ramp over signed normalized values.

/// Number of DCNN layers with an assigned palette entry.
pub const DCNN_LAYER_COUNT: usize = 9;

/// Categorical palette indexed by DCNN layer, sRGB in `[0, 1]`.
///
/// Hex source values: `#25219E #23479B #2C5BA7 #00B7EC #48C69B #A7D316
/// #FFD100 #FF5F17 #E61A26`.
pub const DCNN_PALETTE: [[f32; 3]; DCNN_LAYER_COUNT] = [
    rgb(0x25, 0x21, 0x9E),
    rgb(0x23, 0x47, 0x9B),
    rgb(0x2C, 0x5B, 0xA7),
    rgb(0x00, 0xB7, 0xEC),
    rgb(0x48, 0xC6, 0x9B),
    rgb(0xA7, 0xD3, 0x16),
    rgb(0xFF, 0xD1, 0x00),
    rgb(0xFF, 0x5F, 0x17),
    rgb(0xE6, 0x1A, 0x26),
];

const fn rgb(r: u8, g: u8, b: u8) -> [f32; 3] {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ]
}

/// Palette entry for a DCNN layer tag. Out-of-range tags (unmapped probes
/// are filtered before coloring) saturate to the nearest end.
pub fn dcnn_color(layer: i32) -> [f32; 3] {
    let idx = layer.clamp(0, DCNN_LAYER_COUNT as i32 - 1) as usize;
    DCNN_PALETTE[idx]
}

/// Diverging blue-white-red gradient over a signed normalized value.
///
/// `-1` is fully blue (activity decrease), `0` white (baseline), `+1`
/// fully red (increase). Input is clamped to `[-1, 1]`.
pub fn diverging_color(signed: f32) -> [f32; 3] {
    let s = signed.clamp(-1.0, 1.0);
    let t = s.abs();
    if s < 0.0 {
        // white → blue
        [1.0 - t, 1.0 - t, 1.0]
    } else {
        // white → red
        [1.0, 1.0 - t, 1.0 - t]
    }
}

/// Point size response to a normalized value in `[0, 1]`.
///
/// `|2v - 1|^1.5` of the maximum size: extremes render large, baseline
/// values shrink toward invisibility.
pub fn intensity_curve(value: f32, max_point_size: f32) -> f32 {
    let v = value.clamp(0.0, 1.0);
    max_point_size * (2.0 * v - 1.0).abs().powf(1.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_matches_the_published_hex_values() {
        // Entry 3 is #00B7EC.
        let [r, g, b] = DCNN_PALETTE[3];
        assert!((r - 0.0).abs() < 1e-6);
        assert!((g - 183.0 / 255.0).abs() < 1e-6);
        assert!((b - 236.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn gradient_endpoints_and_midpoint() {
        assert_eq!(diverging_color(-1.0), [0.0, 0.0, 1.0]);
        assert_eq!(diverging_color(0.0), [1.0, 1.0, 1.0]);
        assert_eq!(diverging_color(1.0), [1.0, 0.0, 0.0]);
        // Clamped outside the signed range.
        assert_eq!(diverging_color(-3.0), diverging_color(-1.0));
    }

    #[test]
    fn intensity_curve_shape() {
        assert_eq!(intensity_curve(0.5, 25.0), 0.0);
        assert_eq!(intensity_curve(0.0, 25.0), 25.0);
        assert_eq!(intensity_curve(1.0, 25.0), 25.0);
        // |2·0.45 - 1|^1.5 = 0.1^1.5
        let expected = 25.0 * 0.1_f32.powf(1.5);
        assert!((intensity_curve(0.45, 25.0) - expected).abs() < 1e-5);
    }

    #[test]
    fn out_of_range_tags_saturate() {
        assert_eq!(dcnn_color(99), DCNN_PALETTE[8]);
        assert_eq!(dcnn_color(0), DCNN_PALETTE[0]);
    }
}
