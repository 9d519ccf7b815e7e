//! Single color values in hex, RGB, and HSL spaces.
//!
//! A [`Color`] wraps its space-specific [`Channels`] together with an
//! optional alpha and descriptive [`ColorInfo`]. Colors are immutable:
//! every operation returns a new value.
//!
//! Two comparison relations exist:
//! - `==` compares the native primitive form (hex text or channel tuple),
//!   so a hex color never equals an RGB color.
//! - [`Color::equivalence`] compares the visible color across spaces.

pub mod convert;
pub mod info;

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CampError, Result};
use convert::{HSL_PRECISION, round_to};
pub use info::{ColorInfo, Metadata};

/// Largest channel difference (in fractional RGB) still considered the
/// same color: half of one 8-bit step, plus slack for HSL rounding.
/// Distinct 8-bit colors always differ by more than this.
pub const EQUIVALENCE_TOLERANCE: f64 = 0.5 / 255.0 + 1e-5;

/// Representation scheme of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorSpace {
    /// `#RRGGBB` text.
    Hex,
    /// 8-bit red, green, blue.
    Rgb,
    /// Hue degrees, saturation and lightness fractions.
    Hsl,
}

impl ColorSpace {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Hex => "HEX",
            Self::Rgb => "RGB",
            Self::Hsl => "HSL",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Hex, Self::Rgb, Self::Hsl]
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ColorSpace {
    type Err = CampError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "HEX" => Ok(Self::Hex),
            "RGB" => Ok(Self::Rgb),
            "HSL" => Ok(Self::Hsl),
            _ => Err(CampError::validation(format!(
                "unknown color space {s:?}, expected one of HEX, RGB, HSL"
            ))),
        }
    }
}

/// Space-tagged channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Channels {
    /// Hex text, stored as its three bytes.
    Hex([u8; 3]),
    /// 8-bit RGB.
    Rgb([u8; 3]),
    /// `[hue° in [0, 360), saturation in [0, 1], lightness in [0, 1]]`.
    Hsl([f64; 3]),
}

impl Channels {
    pub const fn space(&self) -> ColorSpace {
        match self {
            Self::Hex(_) => ColorSpace::Hex,
            Self::Rgb(_) => ColorSpace::Rgb,
            Self::Hsl(_) => ColorSpace::Hsl,
        }
    }

    /// Continuous RGB in `[0, 1]`.
    pub fn fractional_rgb(&self) -> [f64; 3] {
        match *self {
            Self::Hex(rgb) | Self::Rgb(rgb) => convert::rgb_to_fractional(rgb),
            Self::Hsl(hsl) => convert::hsl_to_fractional(hsl),
        }
    }

    /// Express these channels in another space.
    pub fn to_space(&self, space: ColorSpace) -> Self {
        if self.space() == space {
            return *self;
        }
        match (*self, space) {
            (Self::Hex(rgb), ColorSpace::Rgb) => Self::Rgb(rgb),
            (Self::Rgb(rgb), ColorSpace::Hex) => Self::Hex(rgb),
            (Self::Hex(rgb) | Self::Rgb(rgb), ColorSpace::Hsl) => {
                Self::Hsl(convert::rgb_to_hsl(rgb))
            }
            (Self::Hsl(hsl), ColorSpace::Hex) => Self::Hex(convert::hsl_to_rgb(hsl)),
            (Self::Hsl(hsl), ColorSpace::Rgb) => Self::Rgb(convert::hsl_to_rgb(hsl)),
            (same, _) => same,
        }
    }

    /// Channel values as floats, in the native space.
    pub fn values(&self) -> [f64; 3] {
        match *self {
            Self::Hex(rgb) | Self::Rgb(rgb) => rgb.map(f64::from),
            Self::Hsl(hsl) => hsl,
        }
    }

    fn validate(&self) -> Result<()> {
        if let Self::Hsl([hue, saturation, lightness]) = *self {
            if !(0.0..360.0).contains(&hue) {
                return Err(CampError::validation(format!(
                    "hue ({hue}) is outside of interval [0, 360)"
                )));
            }
            validate_fraction("saturation", saturation)?;
            validate_fraction("lightness", lightness)?;
        }
        Ok(())
    }

    /// Linear mix toward `other`, which must share this space.
    fn mix(&self, other: &Self, fraction: f64) -> Self {
        let lerp = |a: f64, b: f64| a + (b - a) * fraction;
        let lerp_byte = |a: u8, b: u8| lerp(f64::from(a), f64::from(b)).round() as u8;
        match (*self, *other) {
            (Self::Hex(a), Self::Hex(b)) => {
                Self::Hex([0, 1, 2].map(|i| lerp_byte(a[i], b[i])))
            }
            (Self::Rgb(a), Self::Rgb(b)) => {
                Self::Rgb([0, 1, 2].map(|i| lerp_byte(a[i], b[i])))
            }
            (Self::Hsl(a), Self::Hsl(b)) => Self::Hsl([
                lerp(a[0], b[0]),
                round_to(lerp(a[1], b[1]), HSL_PRECISION),
                round_to(lerp(a[2], b[2]), HSL_PRECISION),
            ]),
            (left, right) => left.mix(&right.to_space(left.space()), fraction),
        }
    }
}

/// Primitive form of a color, as a plain string or number tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeColor {
    Text(String),
    Tuple(Vec<f64>),
}

/// A color value with optional alpha and descriptive info.
#[derive(Debug, Clone)]
pub struct Color {
    channels: Channels,
    alpha: Option<f64>,
    info: ColorInfo,
}

impl Color {
    /// Validate and build a color.
    ///
    /// Fails when a channel or the alpha is outside its legal range.
    pub fn new(channels: Channels, alpha: Option<f64>, info: ColorInfo) -> Result<Self> {
        channels.validate()?;
        if let Some(alpha) = alpha {
            validate_fraction("alpha", alpha)?;
        }
        Ok(Self {
            channels,
            alpha,
            info,
        })
    }

    /// Parse strict `#RRGGBB` or `#RRGGBBAA` text.
    pub fn hex(code: &str) -> Result<Self> {
        let (rgb, alpha) = convert::parse_hex(code)?;
        Self::new(Channels::Hex(rgb), alpha, ColorInfo::default())
    }

    /// Build from integer red, green, blue channels in `[0, 255]`.
    pub fn rgb(channels: [i32; 3]) -> Result<Self> {
        let mut rgb = [0_u8; 3];
        for (i, (label, value)) in ["red", "green", "blue"].iter().zip(channels).enumerate() {
            rgb[i] = u8::try_from(value).map_err(|_| {
                CampError::validation(format!("{label} ({value}) is outside of interval [0, 255]"))
            })?;
        }
        Self::new(Channels::Rgb(rgb), None, ColorInfo::default())
    }

    /// Build from `[hue°, saturation, lightness]`.
    pub fn hsl(channels: [f64; 3]) -> Result<Self> {
        Self::new(Channels::Hsl(channels), None, ColorInfo::default())
    }

    /// Attach descriptive info.
    pub fn with_info(mut self, info: ColorInfo) -> Self {
        self.info = info;
        self
    }

    /// Set the name, validating it.
    pub fn named(mut self, name: impl Into<String>) -> Result<Self> {
        self.info = self.info.with_name(name)?;
        Ok(self)
    }

    /// Set the description, validating it.
    pub fn described(mut self, description: impl Into<String>) -> Result<Self> {
        self.info = self.info.with_description(description)?;
        Ok(self)
    }

    /// Replace the metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.info = self.info.with_metadata(metadata);
        self
    }

    pub fn space(&self) -> ColorSpace {
        self.channels.space()
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    pub fn info(&self) -> &ColorInfo {
        &self.info
    }

    pub fn name(&self) -> Option<&str> {
        self.info.name()
    }

    pub fn description(&self) -> Option<&str> {
        self.info.description()
    }

    pub fn metadata(&self) -> &Metadata {
        self.info.metadata()
    }

    /// Continuous RGB in `[0, 1]`, the reference for equivalence.
    pub fn fractional_rgb(&self) -> [f64; 3] {
        self.channels.fractional_rgb()
    }

    fn rgb_channel(&self, index: usize) -> Option<u8> {
        match self.channels {
            Channels::Hex(rgb) | Channels::Rgb(rgb) => Some(rgb[index]),
            Channels::Hsl(_) => None,
        }
    }

    fn hsl_channel(&self, index: usize) -> Option<f64> {
        match self.channels {
            Channels::Hsl(hsl) => Some(hsl[index]),
            Channels::Hex(_) | Channels::Rgb(_) => None,
        }
    }

    /// 8-bit red channel of a hex or RGB color.
    pub fn red(&self) -> Option<u8> {
        self.rgb_channel(0)
    }

    pub fn green(&self) -> Option<u8> {
        self.rgb_channel(1)
    }

    pub fn blue(&self) -> Option<u8> {
        self.rgb_channel(2)
    }

    /// Hue in degrees of an HSL color.
    pub fn hue(&self) -> Option<f64> {
        self.hsl_channel(0)
    }

    pub fn saturation(&self) -> Option<f64> {
        self.hsl_channel(1)
    }

    pub fn lightness(&self) -> Option<f64> {
        self.hsl_channel(2)
    }

    // ── Conversion ───────────────────────────────────────────────

    /// Convert to another space, keeping alpha and info.
    pub fn to_space(&self, space: ColorSpace) -> Self {
        Self {
            channels: self.channels.to_space(space),
            alpha: self.alpha,
            info: self.info.clone(),
        }
    }

    pub fn to_hex(&self) -> Self {
        self.to_space(ColorSpace::Hex)
    }

    pub fn to_rgb(&self) -> Self {
        self.to_space(ColorSpace::Rgb)
    }

    pub fn to_hsl(&self) -> Self {
        self.to_space(ColorSpace::Hsl)
    }

    // ── Primitive forms ──────────────────────────────────────────

    /// The primitive this color stands in for.
    pub fn native(&self) -> NativeColor {
        match self.channels {
            Channels::Hex(rgb) => NativeColor::Text(convert::format_hex(rgb, self.alpha)),
            Channels::Rgb(_) | Channels::Hsl(_) => NativeColor::Tuple(self.to_tuple()),
        }
    }

    /// Hex code for hex colors, CSS text otherwise.
    pub fn to_text(&self) -> String {
        match self.channels {
            Channels::Hex(rgb) => convert::format_hex(rgb, self.alpha),
            _ => self.css(),
        }
    }

    /// Channel values in the native space, alpha appended when present.
    ///
    /// Hex colors yield their RGB channels.
    pub fn to_tuple(&self) -> Vec<f64> {
        let mut out = self.channels.values().to_vec();
        out.extend(self.alpha);
        out
    }

    /// CSS color text appropriate to the space.
    ///
    /// ```text
    /// HEX → #RRGGBB[AA]
    /// RGB → rgb(r, g, b[, a])
    /// HSL → hsl(h s% l%[, a])
    /// ```
    pub fn css(&self) -> String {
        let alpha = self.alpha.map(|a| format!(", {a}")).unwrap_or_default();
        match self.channels {
            Channels::Hex(rgb) => convert::format_hex(rgb, self.alpha),
            Channels::Rgb([r, g, b]) => format!("rgb({r}, {g}, {b}{alpha})"),
            Channels::Hsl([h, s, l]) => {
                format!("hsl({h:.0} {:.0}% {:.0}%{alpha})", s * 100.0, l * 100.0)
            }
        }
    }

    // ── Derivation ───────────────────────────────────────────────

    /// Copy with a new alpha. Fails unless `alpha` is in `[0, 1]`.
    pub fn change_alpha(&self, alpha: f64) -> Result<Self> {
        validate_fraction("alpha", alpha)?;
        Ok(Self {
            alpha: Some(alpha),
            ..self.clone()
        })
    }

    /// Copy with replaced info fields. At least one must be given.
    pub fn change_info(
        &self,
        name: Option<String>,
        description: Option<String>,
        metadata: Option<Metadata>,
    ) -> Result<Self> {
        Ok(Self {
            info: self.info.changed(name, description, metadata)?,
            ..self.clone()
        })
    }

    pub fn change_red(&self, red: i32, keep_info: bool) -> Result<Self> {
        self.change_byte(0, "red", red, keep_info)
    }

    pub fn change_green(&self, green: i32, keep_info: bool) -> Result<Self> {
        self.change_byte(1, "green", green, keep_info)
    }

    pub fn change_blue(&self, blue: i32, keep_info: bool) -> Result<Self> {
        self.change_byte(2, "blue", blue, keep_info)
    }

    pub fn change_hue(&self, hue: f64, keep_info: bool) -> Result<Self> {
        self.change_hsl(0, "hue", hue, keep_info)
    }

    pub fn change_saturation(&self, saturation: f64, keep_info: bool) -> Result<Self> {
        self.change_hsl(1, "saturation", saturation, keep_info)
    }

    pub fn change_lightness(&self, lightness: f64, keep_info: bool) -> Result<Self> {
        self.change_hsl(2, "lightness", lightness, keep_info)
    }

    fn change_byte(&self, index: usize, label: &str, value: i32, keep_info: bool) -> Result<Self> {
        let byte = u8::try_from(value).map_err(|_| {
            CampError::validation(format!("{label} ({value}) is outside of interval [0, 255]"))
        })?;
        let channels = match self.channels {
            Channels::Hex(mut rgb) => {
                rgb[index] = byte;
                Channels::Hex(rgb)
            }
            Channels::Rgb(mut rgb) => {
                rgb[index] = byte;
                Channels::Rgb(rgb)
            }
            Channels::Hsl(_) => {
                return Err(CampError::validation(format!(
                    "change_{label} requires a HEX or RGB color"
                )));
            }
        };
        self.derived(channels, keep_info)
    }

    fn change_hsl(&self, index: usize, label: &str, value: f64, keep_info: bool) -> Result<Self> {
        let Channels::Hsl(mut hsl) = self.channels else {
            return Err(CampError::validation(format!(
                "change_{label} requires an HSL color"
            )));
        };
        hsl[index] = value;
        self.derived(Channels::Hsl(hsl), keep_info)
    }

    fn derived(&self, channels: Channels, keep_info: bool) -> Result<Self> {
        let info = if keep_info {
            self.info.clone()
        } else {
            ColorInfo::default()
        };
        Self::new(channels, self.alpha, info)
    }

    // ── Arithmetic ───────────────────────────────────────────────

    /// Component-wise mean of two colors, in this color's space.
    ///
    /// Alpha is kept only when both colors carry one. The result is
    /// anonymous unless `other` is this very value.
    pub fn blend(&self, other: &Color) -> Self {
        let info = if std::ptr::eq(self, other) {
            self.info.clone()
        } else {
            ColorInfo::default()
        };
        Self {
            info,
            ..self.mix(other, 0.5)
        }
    }

    /// Anonymous linear mix toward `other` in this color's space.
    ///
    /// `fraction = 0` reproduces this color's channels, `1` the other's.
    /// Fractions are clamped to `[0, 1]`, and NaN counts as 0.
    pub fn mix(&self, other: &Color, fraction: f64) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let alpha = match (self.alpha, other.alpha) {
            (Some(a), Some(b)) => Some(a + (b - a) * fraction),
            _ => None,
        };
        Self {
            channels: self.channels.mix(&other.channels, fraction),
            alpha,
            info: ColorInfo::default(),
        }
    }

    // ── Comparison ───────────────────────────────────────────────

    /// Whether both colors show the same visible color, regardless of space.
    ///
    /// Channels are compared in fractional RGB within
    /// [`EQUIVALENCE_TOLERANCE`]. A missing alpha counts as fully opaque.
    pub fn equivalence(&self, other: &Color) -> bool {
        let a = self.fractional_rgb();
        let b = other.fractional_rgb();
        let close = |x: f64, y: f64| (x - y).abs() <= EQUIVALENCE_TOLERANCE;
        (0..3).all(|i| close(a[i], b[i]))
            && close(self.alpha.unwrap_or(1.0), other.alpha.unwrap_or(1.0))
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.native() == other.native()
    }
}

impl PartialEq<str> for Color {
    fn eq(&self, other: &str) -> bool {
        matches!(self.native(), NativeColor::Text(text) if text == other)
    }
}

impl PartialEq<&str> for Color {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<[u8; 3]> for Color {
    fn eq(&self, other: &[u8; 3]) -> bool {
        matches!(self.channels, Channels::Rgb(rgb) if rgb == *other && self.alpha.is_none())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl Add for &Color {
    type Output = Color;

    fn add(self, rhs: &Color) -> Color {
        self.blend(rhs)
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        self.blend(&rhs)
    }
}

fn validate_fraction(label: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CampError::validation(format!(
            "{label} ({value}) is outside of interval [0, 1]"
        )));
    }
    Ok(())
}
