//! Pure conversions between hex text, 8-bit RGB, and HSL.
//!
//! The continuous reference representation is fractional sRGB in `[0, 1]`.
//! Every space converts to and from it:
//!
//! ```text
//!   "#RRGGBB" ⇄ [u8; 3] ⇄ [f64; 3] (fractional) ⇄ [h°, s, l]
//! ```
//!
//! # Rounding
//! - 8-bit channels round to nearest: `round(x × 255)`
//! - HSL saturation and lightness round to [`HSL_PRECISION`] decimal digits
//! - HSL hue keeps full precision and is normalized to `[0, 360)`
//! - Hex alpha is stored as one byte: `round(alpha × 255)`

use palette::{FromColor, Hsl, Srgb};

use crate::error::{CampError, Result};

/// Decimal digits kept for HSL saturation and lightness.
pub const HSL_PRECISION: i32 = 6;

type SrgbHsl = Hsl<palette::encoding::Srgb, f64>;

/// Parse strict `#RRGGBB` or `#RRGGBBAA` text.
///
/// Returns the channels and, for the 8-digit form, the alpha fraction.
pub fn parse_hex(code: &str) -> Result<([u8; 3], Option<f64>)> {
    let digits = code
        .strip_prefix('#')
        .ok_or_else(|| CampError::validation(format!("hex code {code:?} must start with '#'")))?;

    if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CampError::validation(format!(
            "invalid hex code {code:?}: expected #RRGGBB or #RRGGBBAA"
        )));
    }

    // All digits are ASCII, so byte slicing is on char boundaries.
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
    let parse_err = |e| CampError::validation(format!("invalid hex code {code:?}: {e}"));

    let rgb = [
        byte(0).map_err(parse_err)?,
        byte(2).map_err(parse_err)?,
        byte(4).map_err(parse_err)?,
    ];
    let alpha = if digits.len() == 8 {
        Some(f64::from(byte(6).map_err(parse_err)?) / 255.0)
    } else {
        None
    };
    Ok((rgb, alpha))
}

/// Format channels as uppercase `#RRGGBB`, appending an alpha byte if present.
pub fn format_hex(rgb: [u8; 3], alpha: Option<f64>) -> String {
    let mut out = format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2]);
    if let Some(alpha) = alpha {
        out.push_str(&format!("{:02X}", alpha_to_byte(alpha)));
    }
    out
}

/// Quantize an alpha fraction to one byte.
pub fn alpha_to_byte(alpha: f64) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// 8-bit channels to fractional `[0, 1]`.
pub fn rgb_to_fractional(rgb: [u8; 3]) -> [f64; 3] {
    rgb.map(|c| f64::from(c) / 255.0)
}

/// Fractional channels to 8-bit, rounding to nearest.
pub fn fractional_to_rgb(frgb: [f64; 3]) -> [u8; 3] {
    frgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Fractional RGB to `[hue°, saturation, lightness]`.
pub fn fractional_to_hsl(frgb: [f64; 3]) -> [f64; 3] {
    let hsl = SrgbHsl::from_color(Srgb::<f64>::new(frgb[0], frgb[1], frgb[2]));
    [
        normalize_hue(hsl.hue.into_positive_degrees()),
        round_to(hsl.saturation, HSL_PRECISION),
        round_to(hsl.lightness, HSL_PRECISION),
    ]
}

/// `[hue°, saturation, lightness]` to fractional RGB, unrounded.
pub fn hsl_to_fractional(hsl: [f64; 3]) -> [f64; 3] {
    let rgb = Srgb::<f64>::from_color(SrgbHsl::new(hsl[0], hsl[1], hsl[2]));
    [rgb.red, rgb.green, rgb.blue]
}

/// 8-bit RGB straight to HSL.
pub fn rgb_to_hsl(rgb: [u8; 3]) -> [f64; 3] {
    fractional_to_hsl(rgb_to_fractional(rgb))
}

/// HSL straight to 8-bit RGB.
pub fn hsl_to_rgb(hsl: [f64; 3]) -> [u8; 3] {
    fractional_to_rgb(hsl_to_fractional(hsl))
}

/// Round to a fixed number of decimal digits.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10_f64.powi(digits);
    (value * scale).round() / scale
}

/// Wrap into `[0, 360)`. Float error can land exactly on 360.
fn normalize_hue(hue: f64) -> f64 {
    let hue = hue.rem_euclid(360.0);
    if hue >= 360.0 { 0.0 } else { hue }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn assert_close3(actual: [f64; 3], expected: [f64; 3], tol: f64) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() <= tol,
                "channel {i}: got {}, expected {}",
                actual[i],
                expected[i]
            );
        }
    }

    #[test]
    fn test_parse_hex_six_digits() {
        let (rgb, alpha) = parse_hex("#FFaa15").unwrap();
        assert_eq!(rgb, [255, 170, 21]);
        assert_eq!(alpha, None);
    }

    #[test]
    fn test_parse_hex_eight_digits_reads_alpha() {
        let (rgb, alpha) = parse_hex("#FFAA1580").unwrap();
        assert_eq!(rgb, [255, 170, 21]);
        assert!((alpha.unwrap() - 128.0 / 255.0).abs() < EPSILON);
    }

    #[test]
    fn test_parse_hex_rejects_malformed() {
        for bad in ["FFAA15", "#FFF", "#FFAA1", "#FFAA15A", "#GGAA15", "#FFAA15800", ""] {
            assert!(parse_hex(bad).unwrap_err().is_validation(), "{bad:?}");
        }
    }

    #[test]
    fn test_format_hex_uppercase_with_alpha() {
        assert_eq!(format_hex([255, 170, 21], None), "#FFAA15");
        assert_eq!(format_hex([255, 170, 21], Some(0.5)), "#FFAA1580");
        assert_eq!(format_hex([0, 0, 0], Some(1.0)), "#000000FF");
    }

    #[test]
    fn test_hex_alpha_byte_roundtrip_is_stable() {
        for byte in 0..=255_u8 {
            let alpha = f64::from(byte) / 255.0;
            assert_eq!(alpha_to_byte(alpha), byte);
        }
    }

    #[test]
    fn test_primary_colors_to_hsl() {
        assert_close3(rgb_to_hsl([255, 0, 0]), [0.0, 1.0, 0.5], EPSILON);
        assert_close3(rgb_to_hsl([0, 255, 0]), [120.0, 1.0, 0.5], EPSILON);
        assert_close3(rgb_to_hsl([0, 0, 255]), [240.0, 1.0, 0.5], EPSILON);
    }

    #[test]
    fn test_gray_has_zero_saturation() {
        let [_, s, l] = rgb_to_hsl([128, 128, 128]);
        assert!(s.abs() < EPSILON);
        assert!((l - 0.501961).abs() < EPSILON);
    }

    #[test]
    fn test_saturation_and_lightness_are_rounded() {
        let [_, s, l] = rgb_to_hsl([255, 170, 21]);
        assert_eq!(s, round_to(s, HSL_PRECISION));
        assert_eq!(l, round_to(l, HSL_PRECISION));
    }

    #[test]
    fn test_hue_is_in_range() {
        for rgb in [[255, 0, 1], [255, 1, 0], [1, 0, 255], [200, 10, 100]] {
            let [h, _, _] = rgb_to_hsl(rgb);
            assert!((0.0..360.0).contains(&h), "hue {h} for {rgb:?}");
        }
    }

    #[test]
    fn test_rgb_hsl_roundtrip_every_gray_and_primary_ramp() {
        for v in 0..=255_u8 {
            for rgb in [[v, v, v], [v, 0, 0], [255, v, 0], [0, v, 255 - v]] {
                assert_eq!(hsl_to_rgb(rgb_to_hsl(rgb)), rgb, "roundtrip {rgb:?}");
            }
        }
    }

    #[test]
    fn test_round_to_digits() {
        assert_eq!(round_to(0.123_456_789, 6), 0.123_457);
        assert_eq!(round_to(0.5, 0), 1.0);
    }
}
