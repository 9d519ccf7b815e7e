use std::ops::Index;

use indexmap::IndexMap;

use super::{ColorGroup, GroupKind, check_map_names};
use crate::color::info::validate_name;
use crate::color::{Color, ColorInfo, ColorSpace};
use crate::error::{CampError, Result};

/// Mutable, insertion-ordered mapping from key to color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap {
    entries: IndexMap<String, Color>,
    info: ColorInfo,
}

impl ColorMap {
    /// Build from explicit `(key, color)` pairs. Keys follow the naming
    /// rules for colors and must be unique.
    pub fn new<K: Into<String>>(entries: impl IntoIterator<Item = (K, Color)>) -> Result<Self> {
        let mut map = Self::default();
        for (key, color) in entries {
            map.insert(key, color, false)?;
        }
        Ok(map)
    }

    /// Build keyed by each color's own name.
    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Result<Self> {
        let mut map = Self::default();
        for color in colors {
            map.add(color, false)?;
        }
        Ok(map)
    }

    pub fn with_info(mut self, info: ColorInfo) -> Self {
        self.info = info;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Result<Self> {
        self.info = self.info.with_name(name)?;
        Ok(self)
    }

    /// Insert under the color's own name.
    ///
    /// Returns the replaced color when `overwrite` allowed a collision.
    pub fn add(&mut self, color: Color, overwrite: bool) -> Result<Option<Color>> {
        let key = color.info().require_name("color")?.to_string();
        self.insert(key, color, overwrite)
    }

    /// Insert under an explicit key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        color: Color,
        overwrite: bool,
    ) -> Result<Option<Color>> {
        let key = key.into();
        validate_name(&key)?;
        if !overwrite && self.entries.contains_key(&key) {
            return Err(CampError::conflict(format!(
                "key {key:?} already exists in map"
            )));
        }
        Ok(self.entries.insert(key, color))
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Result<Color> {
        self.entries
            .shift_remove(key)
            .ok_or_else(|| CampError::not_found(format!("map key {key:?}")))
    }

    pub fn get(&self, key: &str) -> Option<&Color> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Color)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ColorGroup for ColorMap {
    fn colors(&self) -> impl Iterator<Item = &Color> {
        self.entries.values()
    }

    fn info(&self) -> &ColorInfo {
        &self.info
    }

    fn kind(&self) -> GroupKind {
        GroupKind::Map
    }

    fn to_color_space(&self, space: ColorSpace) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(k, c)| (k.clone(), c.to_space(space)))
                .collect(),
            info: self.info.clone(),
        }
    }

    /// Keys carry over unless explicit names are given.
    fn to_map(&self, names: Option<Vec<String>>) -> Result<ColorMap> {
        match names {
            None => Ok(self.clone()),
            Some(names) => {
                check_map_names(&names, self.len())?;
                Ok(ColorMap::new(names.into_iter().zip(self.entries.values().cloned()))?
                    .with_info(self.info.clone()))
            }
        }
    }
}

impl Index<&str> for ColorMap {
    type Output = Color;

    fn index(&self, key: &str) -> &Color {
        &self.entries[key]
    }
}
