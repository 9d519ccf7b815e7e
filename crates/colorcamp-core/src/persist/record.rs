//! On-disk record shapes.
//!
//! Every JSON file holds one [`Record`], tagged by `kind`. Group records
//! embed their members as untagged [`ColorRecord`]s.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{Channels, Color, ColorInfo, ColorSpace, Metadata, convert};
use crate::error::{CampError, Result};
use crate::group::{ColorGroup, ColorMap, Palette, Scale};

/// Top-level content of a persisted file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Color(ColorRecord),
    Palette(PaletteRecord),
    Scale(ScaleRecord),
    Map(MapRecord),
    Camp(CampManifest),
}

impl Record {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Color(_) => "color",
            Self::Palette(_) => "palette",
            Self::Scale(_) => "scale",
            Self::Map(_) => "map",
            Self::Camp(_) => "camp",
        }
    }

    /// Name recorded for the object itself.
    pub fn name(&self) -> Option<&str> {
        let info = match self {
            Self::Color(r) => &r.info,
            Self::Palette(r) => &r.info,
            Self::Scale(r) => &r.info,
            Self::Map(r) => &r.info,
            Self::Camp(r) => &r.info,
        };
        info.name.as_deref()
    }

    pub(crate) fn unexpected(&self, expected: &str) -> CampError {
        CampError::invalid_record(format!(
            "expected a {expected} record, found {}",
            self.kind()
        ))
    }
}

/// Name, description, and metadata as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl From<&ColorInfo> for InfoRecord {
    fn from(info: &ColorInfo) -> Self {
        Self {
            name: info.name().map(str::to_string),
            description: info.description().map(str::to_string),
            metadata: Some(info.metadata().clone()),
        }
    }
}

impl InfoRecord {
    pub(crate) fn into_info(self) -> Result<ColorInfo> {
        ColorInfo::new(self.name, self.description, self.metadata).map_err(invalid)
    }
}

/// A single color. `value` is hex text or a channel array, depending on
/// `space`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRecord {
    #[serde(default)]
    pub space: Option<ColorSpace>,
    pub value: Value,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(flatten)]
    pub info: InfoRecord,
}

impl From<&Color> for ColorRecord {
    fn from(color: &Color) -> Self {
        let value = match color.channels() {
            Channels::Hex(rgb) => Value::from(convert::format_hex(rgb, None)),
            Channels::Rgb(rgb) => Value::from(rgb.to_vec()),
            Channels::Hsl(hsl) => Value::from(hsl.to_vec()),
        };
        Self {
            space: Some(color.space()),
            value,
            alpha: color.alpha(),
            info: color.info().into(),
        }
    }
}

impl ColorRecord {
    /// Rebuild the color.
    ///
    /// The value is read in the recorded space, or in `fallback` when the
    /// record has none, then converted to `space` if one is requested.
    pub fn into_color(self, space: Option<ColorSpace>, fallback: ColorSpace) -> Result<Color> {
        let recorded = self.space.unwrap_or(fallback);
        let (channels, embedded_alpha) = decode_value(&self.value, recorded)?;
        let alpha = self.alpha.or(embedded_alpha);
        let info = self.info.into_info()?;
        let color = Color::new(channels, alpha, info).map_err(invalid)?;
        Ok(match space {
            Some(space) => color.to_space(space),
            None => color,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteRecord {
    pub value: Vec<ColorRecord>,
    #[serde(flatten)]
    pub info: InfoRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleRecord {
    pub value: Vec<ColorRecord>,
    #[serde(default)]
    pub stops: Option<Vec<f64>>,
    #[serde(flatten)]
    pub info: InfoRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRecord {
    pub value: IndexMap<String, ColorRecord>,
    #[serde(flatten)]
    pub info: InfoRecord,
}

/// Root file of a saved camp, indexing its members by registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampManifest {
    #[serde(flatten)]
    pub info: InfoRecord,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub maps: Vec<String>,
    #[serde(default)]
    pub palettes: Vec<String>,
    #[serde(default)]
    pub scales: Vec<String>,
}

impl From<&Palette> for PaletteRecord {
    fn from(palette: &Palette) -> Self {
        Self {
            value: palette.iter().map(ColorRecord::from).collect(),
            info: palette.info().into(),
        }
    }
}

impl PaletteRecord {
    pub fn into_palette(self, space: Option<ColorSpace>, fallback: ColorSpace) -> Result<Palette> {
        let colors = decode_members(self.value, space, fallback)?;
        Ok(Palette::new(colors).with_info(self.info.into_info()?))
    }
}

impl From<&Scale> for ScaleRecord {
    fn from(scale: &Scale) -> Self {
        Self {
            value: scale.iter().map(ColorRecord::from).collect(),
            stops: Some(scale.stops().to_vec()),
            info: scale.info().into(),
        }
    }
}

impl ScaleRecord {
    pub fn into_scale(self, space: Option<ColorSpace>, fallback: ColorSpace) -> Result<Scale> {
        let colors = decode_members(self.value, space, fallback)?;
        let scale = Scale::new(colors, self.stops).map_err(invalid)?;
        Ok(scale.with_info(self.info.into_info()?))
    }
}

impl From<&ColorMap> for MapRecord {
    fn from(map: &ColorMap) -> Self {
        Self {
            value: map
                .iter()
                .map(|(key, color)| (key.to_string(), ColorRecord::from(color)))
                .collect(),
            info: map.info().into(),
        }
    }
}

impl MapRecord {
    pub fn into_map(self, space: Option<ColorSpace>, fallback: ColorSpace) -> Result<ColorMap> {
        let mut entries = Vec::with_capacity(self.value.len());
        for (key, record) in self.value {
            entries.push((key, record.into_color(space, fallback)?));
        }
        let map = ColorMap::new(entries).map_err(invalid)?;
        Ok(map.with_info(self.info.into_info()?))
    }
}

fn decode_members(
    records: Vec<ColorRecord>,
    space: Option<ColorSpace>,
    fallback: ColorSpace,
) -> Result<Vec<Color>> {
    records
        .into_iter()
        .map(|record| record.into_color(space, fallback))
        .collect()
}

/// Interpret a stored value in `space`. A trailing fourth number in a
/// channel array is read as alpha.
fn decode_value(value: &Value, space: ColorSpace) -> Result<(Channels, Option<f64>)> {
    match space {
        ColorSpace::Hex => {
            let Value::String(code) = value else {
                return Err(shape_mismatch(space, value));
            };
            let (rgb, alpha) = convert::parse_hex(code).map_err(invalid)?;
            Ok((Channels::Hex(rgb), alpha))
        }
        ColorSpace::Rgb => {
            let (values, alpha) = number_array(value, space)?;
            let mut rgb = [0_u8; 3];
            for (slot, v) in rgb.iter_mut().zip(values) {
                if v.fract() != 0.0 || !(0.0..=255.0).contains(&v) {
                    return Err(CampError::invalid_record(format!(
                        "RGB channel ({v}) is not an integer in [0, 255]"
                    )));
                }
                *slot = v as u8;
            }
            Ok((Channels::Rgb(rgb), alpha))
        }
        ColorSpace::Hsl => {
            let (values, alpha) = number_array(value, space)?;
            Ok((Channels::Hsl(values), alpha))
        }
    }
}

fn number_array(value: &Value, space: ColorSpace) -> Result<([f64; 3], Option<f64>)> {
    let Value::Array(items) = value else {
        return Err(shape_mismatch(space, value));
    };
    if !matches!(items.len(), 3 | 4) {
        return Err(shape_mismatch(space, value));
    }
    let numbers = items
        .iter()
        .map(|item| item.as_f64().ok_or_else(|| shape_mismatch(space, value)))
        .collect::<Result<Vec<f64>>>()?;
    Ok(([numbers[0], numbers[1], numbers[2]], numbers.get(3).copied()))
}

fn shape_mismatch(space: ColorSpace, value: &Value) -> CampError {
    CampError::invalid_record(format!("value {value} does not fit color space {space}"))
}

/// Validation failures while decoding mean the file itself is bad.
fn invalid(err: CampError) -> CampError {
    match err {
        CampError::Validation(msg) => CampError::InvalidRecord(msg),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_record_shape() {
        let color = Color::hex("#FFAA15")
            .unwrap()
            .change_alpha(0.5)
            .unwrap()
            .named("orange")
            .unwrap();
        let record = Record::Color(ColorRecord::from(&color));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "color");
        assert_eq!(json["space"], "HEX");
        assert_eq!(json["value"], "#FFAA15");
        assert_eq!(json["alpha"], 0.5);
        assert_eq!(json["name"], "orange");
        assert_eq!(json["description"], Value::Null);
    }

    #[test]
    fn test_missing_space_uses_fallback() {
        let record: ColorRecord = serde_json::from_value(json!({"value": [1, 2, 3]})).unwrap();
        let color = record.clone().into_color(None, ColorSpace::Rgb).unwrap();
        assert_eq!(color, [1, 2, 3]);

        let err = record.into_color(None, ColorSpace::Hex).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_requested_space_converts() {
        let record: ColorRecord =
            serde_json::from_value(json!({"space": "RGB", "value": [255, 0, 0]})).unwrap();
        let color = record.into_color(Some(ColorSpace::Hex), ColorSpace::Hsl).unwrap();
        assert_eq!(color, "#FF0000");
    }

    #[test]
    fn test_embedded_alpha_in_value() {
        let record: ColorRecord =
            serde_json::from_value(json!({"space": "HSL", "value": [10.0, 0.5, 0.5, 0.25]}))
                .unwrap();
        let color = record.into_color(None, ColorSpace::Hex).unwrap();
        assert_eq!(color.alpha(), Some(0.25));

        let record: ColorRecord =
            serde_json::from_value(json!({"space": "HEX", "value": "#00000080", "alpha": 0.1}))
                .unwrap();
        assert_eq!(record.into_color(None, ColorSpace::Hex).unwrap().alpha(), Some(0.1));
    }

    #[test]
    fn test_bad_values_are_invalid_records() {
        for value in [
            json!({"space": "RGB", "value": [1.5, 2, 3]}),
            json!({"space": "RGB", "value": [300, 2, 3]}),
            json!({"space": "HSL", "value": [400.0, 0.5, 0.5]}),
            json!({"space": "HSL", "value": "#FFFFFF"}),
            json!({"space": "HEX", "value": "#FFF"}),
            json!({"space": "HEX", "value": "#FFFFFF", "name": "bad name"}),
        ] {
            let record: ColorRecord = serde_json::from_value(value.clone()).unwrap();
            let err = record.into_color(None, ColorSpace::Hex).unwrap_err();
            assert!(matches!(err, CampError::InvalidRecord(_)), "{value}");
        }
    }

    #[test]
    fn test_manifest_shape() {
        let manifest = CampManifest {
            info: InfoRecord {
                name: Some("brand".into()),
                ..Default::default()
            },
            colors: vec!["orange".into()],
            ..Default::default()
        };
        let json = serde_json::to_value(Record::Camp(manifest)).unwrap();
        assert_eq!(json["kind"], "camp");
        assert_eq!(json["name"], "brand");
        assert_eq!(json["colors"], json!(["orange"]));
        assert_eq!(json["scales"], json!([]));
    }

    #[test]
    fn test_unknown_kind_fails_to_parse() {
        let result: std::result::Result<Record, _> =
            serde_json::from_value(json!({"kind": "gradient", "value": []}));
        assert!(result.is_err());
    }
}
