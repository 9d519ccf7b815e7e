//! Camps: named collections of colors and groups saved as a directory.
//!
//! ```text
//! <root>/<camp>/manifest.json
//! <root>/<camp>/colors/<name>.json
//! <root>/<camp>/maps/<name>.json
//! <root>/<camp>/palettes/<name>.json
//! <root>/<camp>/scales/<name>.json
//! ```
//!
//! The manifest lists every member, and loading reads exactly those files.

pub mod registry;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::color::info::validate_name;
use crate::color::{Color, ColorInfo, ColorSpace, Metadata};
use crate::error::{CampError, Result};
use crate::group::{ColorGroup, ColorMap, Palette, Scale};
use crate::persist::{self, CampManifest, InfoRecord, Persist, Record};
use crate::settings::{self, Settings};

pub use registry::Registry;

/// File name of the camp index inside its directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// The four member registries of a camp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Color,
    Map,
    Palette,
    Scale,
}

impl MemberKind {
    pub const ALL: [Self; 4] = [Self::Color, Self::Map, Self::Palette, Self::Scale];

    /// Subdirectory holding this kind's files.
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Self::Color => "colors",
            Self::Map => "maps",
            Self::Palette => "palettes",
            Self::Scale => "scales",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Map => "map",
            Self::Palette => "palette",
            Self::Scale => "scale",
        }
    }
}

/// Anything a camp can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum CampObject {
    Color(Color),
    Map(ColorMap),
    Palette(Palette),
    Scale(Scale),
}

impl CampObject {
    pub fn kind(&self) -> MemberKind {
        match self {
            Self::Color(_) => MemberKind::Color,
            Self::Map(_) => MemberKind::Map,
            Self::Palette(_) => MemberKind::Palette,
            Self::Scale(_) => MemberKind::Scale,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Color(c) => c.name(),
            Self::Map(m) => m.name(),
            Self::Palette(p) => p.name(),
            Self::Scale(s) => s.name(),
        }
    }
}

impl From<Color> for CampObject {
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}

impl From<ColorMap> for CampObject {
    fn from(map: ColorMap) -> Self {
        Self::Map(map)
    }
}

impl From<Palette> for CampObject {
    fn from(palette: Palette) -> Self {
        Self::Palette(palette)
    }
}

impl From<Scale> for CampObject {
    fn from(scale: Scale) -> Self {
        Self::Scale(scale)
    }
}

/// Lifecycle of a camp relative to its saved copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampState {
    /// No members.
    Empty,
    /// Has members not yet saved, or changed since the last save.
    Populated,
    /// Matches what was last saved or loaded.
    Persisted,
}

/// A named aggregate of colors, maps, palettes, and scales.
#[derive(Debug, Clone)]
pub struct Camp {
    info: ColorInfo,
    colors: Registry<Color>,
    maps: Registry<ColorMap>,
    palettes: Registry<Palette>,
    scales: Registry<Scale>,
    state: CampState,
}

impl Camp {
    /// Create an empty camp. The name becomes its directory name.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        metadata: Option<Metadata>,
    ) -> Result<Self> {
        let info = ColorInfo::new(Some(name.into()), description, metadata)?;
        Ok(Self::with_info(info))
    }

    fn with_info(info: ColorInfo) -> Self {
        Self {
            info,
            colors: Registry::default(),
            maps: Registry::default(),
            palettes: Registry::default(),
            scales: Registry::default(),
            state: CampState::Empty,
        }
    }

    pub fn name(&self) -> &str {
        self.info.name().unwrap_or_default()
    }

    pub fn info(&self) -> &ColorInfo {
        &self.info
    }

    pub fn state(&self) -> CampState {
        self.state
    }

    pub fn colors(&self) -> &Registry<Color> {
        &self.colors
    }

    pub fn maps(&self) -> &Registry<ColorMap> {
        &self.maps
    }

    pub fn palettes(&self) -> &Registry<Palette> {
        &self.palettes
    }

    pub fn scales(&self) -> &Registry<Scale> {
        &self.scales
    }

    /// Total number of members across all registries.
    pub fn len(&self) -> usize {
        self.colors.len() + self.maps.len() + self.palettes.len() + self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, kind: MemberKind, name: &str) -> bool {
        match kind {
            MemberKind::Color => self.colors.contains(name),
            MemberKind::Map => self.maps.contains(name),
            MemberKind::Palette => self.palettes.contains(name),
            MemberKind::Scale => self.scales.contains(name),
        }
    }

    /// Register a batch of objects, each under its own name.
    ///
    /// The whole batch is checked first: every item must be named, and a
    /// name already taken in its registry (or earlier in the batch) is a
    /// conflict. With `exists_ok`, taken names are skipped instead.
    /// Nothing is inserted unless the whole batch passes.
    ///
    /// Returns the number of objects added.
    pub fn add_objects<I, O>(&mut self, items: I, exists_ok: bool) -> Result<usize>
    where
        I: IntoIterator<Item = O>,
        O: Into<CampObject>,
    {
        let mut accepted: Vec<(String, CampObject)> = Vec::new();
        let mut seen: HashSet<(MemberKind, String)> = HashSet::new();

        for item in items {
            let object = item.into();
            let kind = object.kind();
            let name = object
                .name()
                .ok_or_else(|| {
                    CampError::validation(format!("{} needs a name to join a camp", kind.label()))
                })?
                .to_string();

            if self.contains(kind, &name) || seen.contains(&(kind, name.clone())) {
                if exists_ok {
                    tracing::debug!("skipping existing {} {name:?}", kind.label());
                    continue;
                }
                return Err(CampError::conflict(format!(
                    "{} {name:?} already exists in camp {:?}",
                    kind.label(),
                    self.name()
                )));
            }
            seen.insert((kind, name.clone()));
            accepted.push((name, object));
        }

        let added = accepted.len();
        for (name, object) in accepted {
            match object {
                CampObject::Color(c) => {
                    self.colors.insert(name, c);
                }
                CampObject::Map(m) => {
                    self.maps.insert(name, m);
                }
                CampObject::Palette(p) => {
                    self.palettes.insert(name, p);
                }
                CampObject::Scale(s) => {
                    self.scales.insert(name, s);
                }
            }
        }
        if added > 0 {
            self.state = CampState::Populated;
        }
        Ok(added)
    }

    /// Remove and return a member.
    pub fn remove(&mut self, kind: MemberKind, name: &str) -> Result<CampObject> {
        let removed = match kind {
            MemberKind::Color => self.colors.remove(name).map(CampObject::Color),
            MemberKind::Map => self.maps.remove(name).map(CampObject::Map),
            MemberKind::Palette => self.palettes.remove(name).map(CampObject::Palette),
            MemberKind::Scale => self.scales.remove(name).map(CampObject::Scale),
        };
        let removed = removed.ok_or_else(|| {
            CampError::not_found(format!(
                "{} {name:?} in camp {:?}",
                kind.label(),
                self.name()
            ))
        })?;
        self.state = if self.is_empty() {
            CampState::Empty
        } else {
            CampState::Populated
        };
        Ok(removed)
    }

    fn manifest(&self) -> CampManifest {
        CampManifest {
            info: InfoRecord::from(&self.info),
            colors: self.colors.names().map(str::to_string).collect(),
            maps: self.maps.names().map(str::to_string).collect(),
            palettes: self.palettes.names().map(str::to_string).collect(),
            scales: self.scales.names().map(str::to_string).collect(),
        }
    }

    fn members(&self) -> impl Iterator<Item = (MemberKind, &str, Record)> {
        let colors = self
            .colors
            .iter()
            .map(|(n, c)| (MemberKind::Color, n, c.to_record()));
        let maps = self
            .maps
            .iter()
            .map(|(n, m)| (MemberKind::Map, n, m.to_record()));
        let palettes = self
            .palettes
            .iter()
            .map(|(n, p)| (MemberKind::Palette, n, p.to_record()));
        let scales = self
            .scales
            .iter()
            .map(|(n, s)| (MemberKind::Scale, n, s.to_record()));
        colors.chain(maps).chain(palettes).chain(scales)
    }

    /// Write the camp under `directory/<name>/`.
    ///
    /// Every target path is checked before anything is written, so a
    /// conflict leaves existing files untouched. Returns the camp directory.
    pub fn save(&mut self, directory: impl AsRef<Path>, overwrite: bool) -> Result<PathBuf> {
        let root = directory.as_ref().join(self.name());

        let mut plan: Vec<(PathBuf, Record)> = vec![(
            root.join(MANIFEST_FILE),
            Record::Camp(self.manifest()),
        )];
        plan.extend(
            self.members()
                .map(|(kind, name, record)| (member_path(&root, kind, name), record)),
        );

        if !overwrite {
            if let Some((path, _)) = plan.iter().find(|(path, _)| path.exists()) {
                return Err(CampError::conflict(format!(
                    "file {} already exists",
                    path.display()
                )));
            }
        }

        for kind in MemberKind::ALL {
            let dir = root.join(kind.dir_name());
            fs::create_dir_all(&dir).map_err(|e| CampError::io(&dir, e))?;
        }
        for (path, record) in &plan {
            persist::write_record(path, record)?;
        }

        self.state = CampState::Persisted;
        tracing::info!(
            "saved camp {:?} to {} ({} colors, {} maps, {} palettes, {} scales)",
            self.name(),
            root.display(),
            self.colors.len(),
            self.maps.len(),
            self.palettes.len(),
            self.scales.len()
        );
        Ok(root)
    }

    /// Load a saved camp using the global settings.
    ///
    /// Without `directory`, each configured search path is tried in order.
    /// `space` converts every loaded color.
    pub fn load(name: &str, directory: Option<&Path>, space: Option<ColorSpace>) -> Result<Self> {
        Self::load_with(name, directory, space, &settings::settings())
    }

    pub fn load_with(
        name: &str,
        directory: Option<&Path>,
        space: Option<ColorSpace>,
        settings: &Settings,
    ) -> Result<Self> {
        let root = match directory {
            Some(dir) => {
                let root = dir.join(name);
                if !root.join(MANIFEST_FILE).is_file() {
                    return Err(CampError::not_found(format!(
                        "camp {name:?} in {}",
                        dir.display()
                    )));
                }
                root
            }
            None => settings
                .camp_paths
                .iter()
                .map(|dir| dir.join(name))
                .find(|root| root.join(MANIFEST_FILE).is_file())
                .ok_or_else(|| {
                    CampError::not_found(format!(
                        "camp {name:?} in search paths {:?}",
                        settings.camp_paths
                    ))
                })?,
        };

        let manifest = match persist::read_record(&root.join(MANIFEST_FILE))? {
            Record::Camp(manifest) => manifest,
            other => return Err(other.unexpected("camp")),
        };

        let info = manifest.info.into_info()?;
        if info.name().is_none() {
            return Err(CampError::invalid_record(format!(
                "manifest in {} has no camp name",
                root.display()
            )));
        }
        let mut camp = Self::with_info(info);
        let fallback = settings.default_color_space;

        for member in &manifest.colors {
            let color = load_member::<Color>(&root, MemberKind::Color, member, space, fallback)?;
            camp.colors.insert(member.clone(), color);
        }
        for member in &manifest.maps {
            let map = load_member::<ColorMap>(&root, MemberKind::Map, member, space, fallback)?;
            camp.maps.insert(member.clone(), map);
        }
        for member in &manifest.palettes {
            let palette =
                load_member::<Palette>(&root, MemberKind::Palette, member, space, fallback)?;
            camp.palettes.insert(member.clone(), palette);
        }
        for member in &manifest.scales {
            let scale = load_member::<Scale>(&root, MemberKind::Scale, member, space, fallback)?;
            camp.scales.insert(member.clone(), scale);
        }

        camp.state = CampState::Persisted;
        tracing::info!(
            "loaded camp {:?} from {} ({} members)",
            camp.name(),
            root.display(),
            camp.len()
        );
        Ok(camp)
    }

    /// Camps available under each search path, using the global settings
    /// when `paths` is `None`.
    pub fn find(paths: Option<&[PathBuf]>) -> IndexMap<PathBuf, Vec<String>> {
        match paths {
            Some(paths) => find_camps(paths),
            None => Self::find_in(&settings::settings()),
        }
    }

    pub fn find_in(settings: &Settings) -> IndexMap<PathBuf, Vec<String>> {
        find_camps(&settings.camp_paths)
    }
}

fn member_path(root: &Path, kind: MemberKind, name: &str) -> PathBuf {
    root.join(kind.dir_name()).join(format!("{name}.json"))
}

fn load_member<T: Persist>(
    root: &Path,
    kind: MemberKind,
    name: &str,
    space: Option<ColorSpace>,
    fallback: ColorSpace,
) -> Result<T> {
    if validate_name(name).is_err() {
        return Err(CampError::invalid_record(format!(
            "manifest in {} lists invalid member name {name:?}",
            root.display()
        )));
    }
    let path = member_path(root, kind, name);
    let record = persist::read_record(&path)?;
    if record.name() != Some(name) {
        return Err(CampError::invalid_record(format!(
            "{} is listed as {name:?} but named {:?}",
            path.display(),
            record.name()
        )));
    }
    T::from_record(record, space, fallback)
}

fn find_camps(paths: &[PathBuf]) -> IndexMap<PathBuf, Vec<String>> {
    paths
        .iter()
        .map(|path| (path.clone(), camps_in(path)))
        .collect()
}

/// Sorted names of valid camps directly under `dir`.
fn camps_in(dir: &Path) -> Vec<String> {
    tracing::debug!("scanning {} for camps", dir.display());
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("skipping search path {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.join(MANIFEST_FILE).is_file())
        .filter_map(|path| {
            let manifest = path.join(MANIFEST_FILE);
            match persist::read_record(&manifest) {
                Ok(Record::Camp(_)) => {
                    path.file_name()?.to_str().map(str::to_string)
                }
                Ok(other) => {
                    tracing::warn!(
                        "ignoring {}: expected a camp manifest, found {}",
                        manifest.display(),
                        other.kind()
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!("ignoring {}: {e}", manifest.display());
                    None
                }
            }
        })
        .collect();
    names.sort();
    names
}
