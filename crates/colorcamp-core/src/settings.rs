//! Process-wide settings: default color space on load and camp search paths.
//!
//! The global is initialized lazily from built-in defaults plus environment
//! overrides, and only changes through the explicit mutation functions here.
//! Consumers that need determinism (tests, embedding applications) can pass
//! their own [`Settings`] to the `*_with` / `*_in` variants instead.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::LazyLock;

use parking_lot::RwLock;

use crate::color::ColorSpace;

/// Overrides the default color space (`HEX`, `RGB`, or `HSL`).
pub const DEFAULT_SPACE_ENV: &str = "COLORCAMP_DEFAULT_SPACE";
/// Extra camp search paths, in the platform's path-list syntax.
/// They are searched before the built-in paths.
pub const CAMP_PATH_ENV: &str = "COLORCAMP_PATH";

/// Directory shipped alongside the crate for bundled camps.
const BUNDLED_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

/// Runtime configuration consulted by load and find operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Space used when a persisted color does not record its own.
    pub default_color_space: ColorSpace,
    /// Ordered directories searched for saved camps.
    pub camp_paths: Vec<PathBuf>,
}

impl Settings {
    /// Built-in defaults, ignoring the environment.
    ///
    /// Search paths are the current directory, then the bundled data directory.
    pub fn builtin() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            default_color_space: ColorSpace::Hex,
            camp_paths: vec![cwd, PathBuf::from(BUNDLED_DATA_DIR)],
        }
    }

    /// Built-in defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut settings = Self::builtin();
        let space = std::env::var(DEFAULT_SPACE_ENV).ok();
        let paths = std::env::var_os(CAMP_PATH_ENV);
        settings.apply_overrides(space.as_deref(), paths.as_deref());
        settings
    }

    /// Apply raw override values as read from [`DEFAULT_SPACE_ENV`] and
    /// [`CAMP_PATH_ENV`]. An unparsable space is ignored with a warning.
    pub(crate) fn apply_overrides(&mut self, space: Option<&str>, paths: Option<&OsStr>) {
        if let Some(raw) = space {
            match raw.parse::<ColorSpace>() {
                Ok(space) => self.default_color_space = space,
                Err(e) => tracing::warn!("ignoring {DEFAULT_SPACE_ENV}: {e}"),
            }
        }

        if let Some(raw) = paths {
            let mut paths: Vec<PathBuf> = std::env::split_paths(raw)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            paths.append(&mut self.camp_paths);
            self.set_camp_paths(paths);
        }
    }

    /// Replace the search paths, dropping duplicates but keeping first-seen order.
    pub fn set_camp_paths<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut unique: Vec<PathBuf> = Vec::new();
        for path in paths {
            let path = path.into();
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        self.camp_paths = unique;
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_env()
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

/// Snapshot of the current global settings.
pub fn settings() -> Settings {
    SETTINGS.read().clone()
}

/// Mutate the global settings in place.
pub fn update<R>(f: impl FnOnce(&mut Settings) -> R) -> R {
    f(&mut SETTINGS.write())
}

/// Swap in new global settings, returning the previous ones.
pub fn replace(new: Settings) -> Settings {
    std::mem::replace(&mut *SETTINGS.write(), new)
}

/// Restore the global settings to their initial state.
pub fn reset() {
    replace(Settings::default());
}

pub fn set_default_color_space(space: ColorSpace) {
    update(|s| s.default_color_space = space);
}

pub fn set_camp_paths<I, P>(paths: I)
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    update(|s| s.set_camp_paths(paths));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let settings = Settings::builtin();
        assert_eq!(settings.default_color_space, ColorSpace::Hex);
        assert_eq!(settings.camp_paths.len(), 2);
        assert!(settings.camp_paths[1].ends_with("data"));
    }

    #[test]
    fn test_set_camp_paths_deduplicates_in_order() {
        let mut settings = Settings::builtin();
        settings.set_camp_paths(["b", "a", "b", "c", "a"]);
        assert_eq!(
            settings.camp_paths,
            vec![PathBuf::from("b"), PathBuf::from("a"), PathBuf::from("c")]
        );
    }

    #[test]
    fn test_space_override() {
        let mut settings = Settings::builtin();
        settings.apply_overrides(Some("hsl"), None);
        assert_eq!(settings.default_color_space, ColorSpace::Hsl);
    }

    #[test]
    fn test_invalid_space_override_is_ignored() {
        let mut settings = Settings::builtin();
        settings.apply_overrides(Some("cmyk"), None);
        assert_eq!(settings.default_color_space, ColorSpace::Hex);
        assert_eq!(settings, Settings::builtin());
    }

    #[test]
    fn test_path_override_is_prepended_without_duplicates() {
        let builtin = Settings::builtin();
        let bundled = builtin.camp_paths[1].clone();
        let raw = std::env::join_paths([PathBuf::from("/opt/camps"), bundled.clone()]).unwrap();

        let mut settings = builtin.clone();
        settings.apply_overrides(None, Some(raw.as_os_str()));
        assert_eq!(
            settings.camp_paths,
            vec![PathBuf::from("/opt/camps"), bundled, builtin.camp_paths[0].clone()]
        );
    }

    #[test]
    fn test_global_update_and_restore() {
        let previous = settings();

        set_default_color_space(ColorSpace::Hsl);
        assert_eq!(settings().default_color_space, ColorSpace::Hsl);

        let swapped = replace(previous.clone());
        assert_eq!(swapped.default_color_space, ColorSpace::Hsl);
        assert_eq!(settings(), previous);
    }
}
