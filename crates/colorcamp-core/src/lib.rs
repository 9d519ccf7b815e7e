//! ColorCamp Core: color values, color groups, and camp persistence.
//!
//! Colors in hex, RGB, or HSL, collected into palettes, scales, and maps,
//! and saved together as named camps of JSON files. No I/O happens outside
//! the explicit save and load operations.

pub mod camp;
pub mod color;
pub mod error;
pub mod group;
pub mod persist;
pub mod settings;

// Re-exports for convenience.
pub use camp::{Camp, CampObject, CampState, MemberKind, Registry};
pub use color::{Channels, Color, ColorInfo, ColorSpace, Metadata, NativeColor};
pub use error::{CampError, Result};
pub use group::{Band, ColorGroup, ColorMap, GroupKind, Palette, Scale};
pub use persist::{Persist, Record};
pub use settings::Settings;
