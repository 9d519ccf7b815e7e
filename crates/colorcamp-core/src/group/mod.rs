//! Color groups: palettes, scales, and maps.
//!
//! All three share the [`ColorGroup`] trait, which exposes the member colors
//! and descriptive info, and converts between group kinds.

pub mod map;
pub mod palette;
pub mod scale;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorInfo, ColorSpace};
use crate::error::{CampError, Result};

pub use map::ColorMap;
pub use palette::{Band, Palette};
pub use scale::Scale;

/// Discriminates the group variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Palette,
    Scale,
    Map,
}

/// Behaviour shared by every collection of colors.
pub trait ColorGroup {
    /// Member colors in display order.
    fn colors(&self) -> impl Iterator<Item = &Color>;

    /// Name, description, and metadata of the group itself.
    fn info(&self) -> &ColorInfo;

    fn kind(&self) -> GroupKind;

    /// Copy of this group with every member expressed in `space`.
    fn to_color_space(&self, space: ColorSpace) -> Self
    where
        Self: Sized;

    fn name(&self) -> Option<&str> {
        self.info().name()
    }

    fn len(&self) -> usize {
        self.colors().count()
    }

    fn is_empty(&self) -> bool {
        self.colors().next().is_none()
    }

    /// Whether any member equals `color` natively.
    fn contains(&self, color: &Color) -> bool {
        self.colors().any(|c| c == color)
    }

    /// Whether any member shows the same visible color as `color`.
    fn contains_equivalent(&self, color: &Color) -> bool {
        self.colors().any(|c| c.equivalence(color))
    }

    /// Members and info as a palette.
    fn to_palette(&self) -> Palette {
        Palette::new(self.colors().cloned()).with_info(self.info().clone())
    }

    /// Members and info as a scale, with explicit or uniform stops.
    fn to_scale(&self, stops: Option<Vec<f64>>) -> Result<Scale> {
        Ok(Scale::new(self.colors().cloned(), stops)?.with_info(self.info().clone()))
    }

    /// Members and info as a map.
    ///
    /// Without explicit `names`, each member's own name is used as its key;
    /// every member must then be named, and names must be unique.
    fn to_map(&self, names: Option<Vec<String>>) -> Result<ColorMap> {
        let colors: Vec<Color> = self.colors().cloned().collect();
        let names = match names {
            Some(names) => names,
            None => colors
                .iter()
                .map(|c| c.info().require_name("map member").map(str::to_string))
                .collect::<Result<Vec<_>>>()?,
        };

        check_map_names(&names, colors.len())?;
        Ok(ColorMap::new(names.into_iter().zip(colors))?.with_info(self.info().clone()))
    }
}

/// Keys for a map must pair one-to-one with the colors and be unique.
pub(crate) fn check_map_names(names: &[String], count: usize) -> Result<()> {
    if names.len() != count {
        return Err(CampError::validation(format!(
            "uneven number of names ({}) and colors ({count})",
            names.len()
        )));
    }
    let unique: HashSet<&String> = names.iter().collect();
    if unique.len() != names.len() {
        return Err(CampError::validation("map keys must be unique"));
    }
    Ok(())
}

/// Render members as CSS gradient stops, e.g. `#FF0000 0%, #0000FF 100%`.
pub(crate) fn css_stops<'a>(stops: impl Iterator<Item = (&'a Color, f64)>) -> String {
    stops
        .map(|(color, at)| format!("{} {}%", color.css(), format_percent(at)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_percent(fraction: f64) -> String {
    let percent = fraction * 100.0;
    if (percent - percent.round()).abs() < 1e-9 {
        format!("{}", percent.round())
    } else {
        format!("{percent:.2}")
    }
}
