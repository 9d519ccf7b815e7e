use std::ops::Index;

use super::{ColorGroup, GroupKind, css_stops};
use crate::color::{Color, ColorInfo, ColorSpace};
use crate::error::Result;

/// Ordered, immutable sequence of colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
    info: ColorInfo,
}

/// One evenly sized segment of a rendered palette, as fractions of the
/// full width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band<'a> {
    pub color: &'a Color,
    pub start: f64,
    pub end: f64,
}

impl Palette {
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
            info: ColorInfo::default(),
        }
    }

    pub fn with_info(mut self, info: ColorInfo) -> Self {
        self.info = info;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Result<Self> {
        self.info = self.info.with_name(name)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Color> {
        self.colors.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.colors.iter()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    /// Same colors in the opposite order.
    pub fn reverse(&self) -> Self {
        Self {
            colors: self.colors.iter().rev().cloned().collect(),
            info: self.info.clone(),
        }
    }

    /// Endless iteration that wraps back to the first color.
    ///
    /// Yields nothing for an empty palette.
    pub fn cycle(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter().cycle()
    }

    /// Split `[0, 1]` into one equal band per color.
    pub fn bands(&self) -> Vec<Band<'_>> {
        let width = 1.0 / self.colors.len() as f64;
        self.colors
            .iter()
            .enumerate()
            .map(|(i, color)| Band {
                color,
                start: i as f64 * width,
                end: if i + 1 == self.colors.len() {
                    1.0
                } else {
                    (i + 1) as f64 * width
                },
            })
            .collect()
    }

    /// Hard-edged CSS gradient with one band per color.
    ///
    /// An empty palette renders as `none`.
    pub fn css_gradient(&self) -> String {
        if self.colors.is_empty() {
            return "none".to_string();
        }
        let bands = self.bands();
        let stops = bands
            .iter()
            .flat_map(|band| [(band.color, band.start), (band.color, band.end)]);
        format!("linear-gradient(to right, {})", css_stops(stops))
    }
}

impl ColorGroup for Palette {
    fn colors(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }

    fn info(&self) -> &ColorInfo {
        &self.info
    }

    fn kind(&self) -> GroupKind {
        GroupKind::Palette
    }

    fn to_color_space(&self, space: ColorSpace) -> Self {
        Self {
            colors: self.colors.iter().map(|c| c.to_space(space)).collect(),
            info: self.info.clone(),
        }
    }
}

impl Index<usize> for Palette {
    type Output = Color;

    fn index(&self, index: usize) -> &Color {
        &self.colors[index]
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

impl IntoIterator for Palette {
    type Item = Color;
    type IntoIter = std::vec::IntoIter<Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.into_iter()
    }
}

impl FromIterator<Color> for Palette {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Self::new(iter)
    }
}
