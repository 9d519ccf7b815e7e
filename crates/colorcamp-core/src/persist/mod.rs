//! JSON persistence for single colors and groups.
//!
//! Each object serializes to one [`Record`]. Camps build on the same
//! records, adding a manifest and a directory layout (see [`crate::camp`]).

pub mod record;

use std::fs;
use std::path::Path;

use crate::color::{Color, ColorSpace};
use crate::error::{CampError, Result};
use crate::group::{ColorMap, Palette, Scale};
use crate::settings::{self, Settings};

pub use record::{
    CampManifest, ColorRecord, InfoRecord, MapRecord, PaletteRecord, Record, ScaleRecord,
};

/// Conversion to and from persisted records and JSON files.
pub trait Persist: Sized {
    fn to_record(&self) -> Record;

    /// Rebuild from a record.
    ///
    /// `space` converts every color after loading; `fallback` reads colors
    /// whose record does not name a space.
    fn from_record(
        record: Record,
        space: Option<ColorSpace>,
        fallback: ColorSpace,
    ) -> Result<Self>;

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_record())
            .map_err(|e| CampError::invalid_record(e.to_string()))
    }

    /// Parse JSON text. Colors without a recorded space read as `fallback`.
    fn from_json(text: &str, space: Option<ColorSpace>, fallback: ColorSpace) -> Result<Self> {
        let record: Record =
            serde_json::from_str(text).map_err(|e| CampError::invalid_record(e.to_string()))?;
        Self::from_record(record, space, fallback)
    }

    /// Write to `path`, refusing to replace an existing file unless
    /// `overwrite` is set.
    fn dump_json(&self, path: impl AsRef<Path>, overwrite: bool) -> Result<()> {
        let path = path.as_ref();
        if !overwrite && path.exists() {
            return Err(CampError::conflict(format!(
                "file {} already exists",
                path.display()
            )));
        }
        write_record(path, &self.to_record())
    }

    /// Read from `path` using the global settings for the fallback space.
    fn load_json(path: impl AsRef<Path>, space: Option<ColorSpace>) -> Result<Self> {
        Self::load_json_with(path, space, &settings::settings())
    }

    fn load_json_with(
        path: impl AsRef<Path>,
        space: Option<ColorSpace>,
        settings: &Settings,
    ) -> Result<Self> {
        let record = read_record(path.as_ref())?;
        Self::from_record(record, space, settings.default_color_space)
    }
}

impl Persist for Color {
    fn to_record(&self) -> Record {
        Record::Color(self.into())
    }

    fn from_record(
        record: Record,
        space: Option<ColorSpace>,
        fallback: ColorSpace,
    ) -> Result<Self> {
        match record {
            Record::Color(color) => color.into_color(space, fallback),
            other => Err(other.unexpected("color")),
        }
    }
}

impl Persist for Palette {
    fn to_record(&self) -> Record {
        Record::Palette(self.into())
    }

    fn from_record(
        record: Record,
        space: Option<ColorSpace>,
        fallback: ColorSpace,
    ) -> Result<Self> {
        match record {
            Record::Palette(palette) => palette.into_palette(space, fallback),
            other => Err(other.unexpected("palette")),
        }
    }
}

impl Persist for Scale {
    fn to_record(&self) -> Record {
        Record::Scale(self.into())
    }

    fn from_record(
        record: Record,
        space: Option<ColorSpace>,
        fallback: ColorSpace,
    ) -> Result<Self> {
        match record {
            Record::Scale(scale) => scale.into_scale(space, fallback),
            other => Err(other.unexpected("scale")),
        }
    }
}

impl Persist for ColorMap {
    fn to_record(&self) -> Record {
        Record::Map(self.into())
    }

    fn from_record(
        record: Record,
        space: Option<ColorSpace>,
        fallback: ColorSpace,
    ) -> Result<Self> {
        match record {
            Record::Map(map) => map.into_map(space, fallback),
            other => Err(other.unexpected("map")),
        }
    }
}

/// Parse one record file.
pub(crate) fn read_record(path: &Path) -> Result<Record> {
    let text = fs::read_to_string(path).map_err(|e| CampError::io(path, e))?;
    let record = serde_json::from_str(&text).map_err(|source| CampError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("read {}", path.display());
    Ok(record)
}

/// Serialize and write one record file. Parent directories must exist.
pub(crate) fn write_record(path: &Path, record: &Record) -> Result<()> {
    let text = serde_json::to_string_pretty(record)
        .map_err(|e| CampError::invalid_record(e.to_string()))?;
    fs::write(path, text).map_err(|e| CampError::io(path, e))?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}
