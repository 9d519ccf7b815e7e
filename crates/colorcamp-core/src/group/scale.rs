use std::ops::Index;

use super::{ColorGroup, GroupKind, css_stops};
use crate::color::{Color, ColorInfo, ColorSpace};
use crate::error::{CampError, Result};

/// Colors anchored at strictly increasing stops in `[0, 1]`.
///
/// Between two stops the scale interpolates linearly in the space of the
/// lower color. Outside the first and last stop it holds the end color.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    colors: Vec<Color>,
    stops: Vec<f64>,
    info: ColorInfo,
}

impl Scale {
    /// Pair colors with stops.
    ///
    /// Without explicit stops the colors are spread uniformly over `[0, 1]`.
    /// A single color sits at `0.0`.
    pub fn new(colors: impl IntoIterator<Item = Color>, stops: Option<Vec<f64>>) -> Result<Self> {
        let colors: Vec<Color> = colors.into_iter().collect();
        if colors.is_empty() {
            return Err(CampError::validation("a scale needs at least one color"));
        }

        let stops = match stops {
            Some(stops) => {
                validate_stops(&stops, colors.len())?;
                stops
            }
            None => uniform_stops(colors.len()),
        };

        Ok(Self {
            colors,
            stops,
            info: ColorInfo::default(),
        })
    }

    pub fn with_info(mut self, info: ColorInfo) -> Self {
        self.info = info;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Result<Self> {
        self.info = self.info.with_name(name)?;
        Ok(self)
    }

    pub fn stops(&self) -> &[f64] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.colors.iter()
    }

    /// `(color, stop)` pairs in order.
    pub fn to_pairs(&self) -> impl Iterator<Item = (&Color, f64)> {
        self.colors.iter().zip(self.stops.iter().copied())
    }

    /// Color at position `t`, clamped to `[0, 1]`.
    ///
    /// A `t` landing exactly on a stop returns that member unchanged,
    /// info included. Any other position yields an anonymous color.
    pub fn interpolate(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        // Index of the first stop strictly above t.
        let upper = self.stops.partition_point(|&s| s <= t);
        if upper == 0 {
            return self.colors[0].clone();
        }
        let lower = upper - 1;
        if self.stops[lower] == t || upper == self.stops.len() {
            return self.colors[lower].clone();
        }

        let span = self.stops[upper] - self.stops[lower];
        let fraction = (t - self.stops[lower]) / span;
        self.colors[lower].mix(&self.colors[upper], fraction)
    }

    /// Same colors in opposite order, each keeping its distance from its end.
    pub fn reverse(&self) -> Self {
        Self {
            colors: self.colors.iter().rev().cloned().collect(),
            stops: self.stops.iter().rev().map(|s| 1.0 - s).collect(),
            info: self.info.clone(),
        }
    }

    /// Smooth CSS gradient through every stop.
    pub fn css_gradient(&self) -> String {
        format!("linear-gradient(to right, {})", css_stops(self.to_pairs()))
    }
}

impl ColorGroup for Scale {
    fn colors(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }

    fn info(&self) -> &ColorInfo {
        &self.info
    }

    fn kind(&self) -> GroupKind {
        GroupKind::Scale
    }

    fn to_color_space(&self, space: ColorSpace) -> Self {
        Self {
            colors: self.colors.iter().map(|c| c.to_space(space)).collect(),
            stops: self.stops.clone(),
            info: self.info.clone(),
        }
    }
}

impl Index<usize> for Scale {
    type Output = Color;

    fn index(&self, index: usize) -> &Color {
        &self.colors[index]
    }
}

impl<'a> IntoIterator for &'a Scale {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

fn uniform_stops(count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![0.0];
    }
    let last = (count - 1) as f64;
    (0..count).map(|i| i as f64 / last).collect()
}

fn validate_stops(stops: &[f64], count: usize) -> Result<()> {
    if stops.len() != count {
        return Err(CampError::validation(format!(
            "uneven number of stops ({}) and colors ({count})",
            stops.len()
        )));
    }
    if let Some(bad) = stops.iter().find(|s| !(0.0..=1.0).contains(*s)) {
        return Err(CampError::validation(format!(
            "stop ({bad}) is outside of interval [0, 1]"
        )));
    }
    if stops.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(CampError::validation("stops must be strictly increasing"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn red_to_blue() -> Scale {
        Scale::new(
            [
                Color::rgb([255, 0, 0]).unwrap().named("red").unwrap(),
                Color::rgb([0, 0, 255]).unwrap().named("blue").unwrap(),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_uniform_stops() {
        assert_eq!(uniform_stops(1), vec![0.0]);
        assert_eq!(uniform_stops(3), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_invalid_stops_rejected() {
        let colors = || {
            [
                Color::hex("#000000").unwrap(),
                Color::hex("#FFFFFF").unwrap(),
            ]
        };
        for stops in [
            vec![0.0],
            vec![0.0, 1.5],
            vec![-0.1, 1.0],
            vec![0.7, 0.3],
            vec![0.5, 0.5],
            vec![0.0, f64::NAN],
        ] {
            let err = Scale::new(colors(), Some(stops.clone())).unwrap_err();
            assert!(err.is_validation(), "{stops:?}");
        }
        assert!(Scale::new(Vec::<Color>::new(), None).unwrap_err().is_validation());
    }

    #[test]
    fn test_interpolate_at_stops_returns_members() {
        let scale = Scale::new(
            [
                Color::hex("#000000").unwrap(),
                Color::hsl([120.0, 1.0, 0.5]).unwrap().named("green").unwrap(),
                Color::hex("#FFFFFF").unwrap(),
            ],
            Some(vec![0.0, 0.3, 1.0]),
        )
        .unwrap();
        assert_eq!(scale.interpolate(0.0), scale[0]);
        assert_eq!(scale.interpolate(1.0), scale[2]);
        let at_stop = scale.interpolate(0.3);
        assert_eq!(at_stop, scale[1]);
        assert_eq!(at_stop.name(), Some("green"));
    }

    #[test]
    fn test_interpolate_midpoint_in_lower_space() {
        let mid = red_to_blue().interpolate(0.5);
        assert_eq!(mid.space(), ColorSpace::Rgb);
        assert_eq!(mid, [128, 0, 128]);
        assert_eq!(mid.name(), None);
    }

    #[test]
    fn test_interpolate_clamps_and_holds_ends() {
        let scale = Scale::new(
            [Color::hex("#FF0000").unwrap(), Color::hex("#0000FF").unwrap()],
            Some(vec![0.2, 0.8]),
        )
        .unwrap();
        assert_eq!(scale.interpolate(-3.0), "#FF0000");
        assert_eq!(scale.interpolate(0.1), "#FF0000");
        assert_eq!(scale.interpolate(0.9), "#0000FF");
        assert_eq!(scale.interpolate(7.0), "#0000FF");
        assert_eq!(scale.interpolate(f64::NAN), "#FF0000");
    }

    #[test]
    fn test_single_color_scale() {
        let scale = Scale::new([Color::hex("#123456").unwrap()], None).unwrap();
        assert_eq!(scale.stops(), [0.0]);
        assert_eq!(scale.interpolate(0.75), "#123456");
    }

    #[test]
    fn test_reverse_mirrors_stops() {
        let scale = Scale::new(
            [
                Color::hex("#000000").unwrap(),
                Color::hex("#777777").unwrap(),
                Color::hex("#FFFFFF").unwrap(),
            ],
            Some(vec![0.0, 0.25, 1.0]),
        )
        .unwrap();
        let reversed = scale.reverse();
        assert_eq!(reversed[0], "#FFFFFF");
        assert_eq!(reversed[1], "#777777");
        let expected = [0.0, 0.75, 1.0];
        for (s, e) in reversed.stops().iter().zip(expected) {
            assert!((s - e).abs() < EPSILON);
        }
    }

    #[test]
    fn test_css_gradient() {
        assert_eq!(
            red_to_blue().css_gradient(),
            "linear-gradient(to right, rgb(255, 0, 0) 0%, rgb(0, 0, 255) 100%)"
        );
    }

    #[test]
    fn test_to_palette_drops_stops() {
        let palette = red_to_blue().to_palette();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0], [255, 0, 0]);
    }
}
