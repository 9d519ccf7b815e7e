use std::fs;
use std::path::Path;

use colorcamp_core::{
    Camp, CampObject, CampState, Color, ColorGroup, ColorMap, ColorSpace, MemberKind, Metadata,
    Palette, Scale, Settings,
};

fn settings_for(dir: &Path) -> Settings {
    Settings {
        default_color_space: ColorSpace::Hex,
        camp_paths: vec![dir.to_path_buf()],
    }
}

/// One member of every kind, with info on each.
fn brand_camp() -> Camp {
    let mut metadata = Metadata::new();
    metadata.insert("owner".into(), "design".into());

    let mut camp = Camp::new("brand", Some("house colors".into()), Some(metadata)).unwrap();

    let orange = Color::hex("#FFAA15")
        .unwrap()
        .named("orange")
        .unwrap()
        .described("primary accent")
        .unwrap();
    let ink = Color::rgb([20, 24, 31])
        .unwrap()
        .change_alpha(0.8)
        .unwrap()
        .named("ink")
        .unwrap();
    let sky = Color::hsl([205.0, 0.7, 0.55]).unwrap().named("sky").unwrap();

    let map = ColorMap::from_colors([orange.clone(), ink.clone()])
        .unwrap()
        .named("roles")
        .unwrap();
    let palette = Palette::new([orange.clone(), sky.clone(), ink])
        .named("main")
        .unwrap();
    let scale = Scale::new([sky, orange.clone()], Some(vec![0.0, 0.8]))
        .unwrap()
        .named("heat")
        .unwrap();

    camp.add_objects(
        [
            CampObject::from(orange),
            map.into(),
            palette.into(),
            scale.into(),
        ],
        false,
    )
    .unwrap();
    camp
}

#[test]
fn test_camp_roundtrip_keeps_members_and_info() {
    let dir = tempfile::tempdir().unwrap();
    let mut camp = brand_camp();
    camp.save(dir.path(), false).unwrap();

    let loaded =
        Camp::load_with("brand", Some(dir.path()), None, &settings_for(dir.path())).unwrap();
    assert_eq!(loaded.name(), "brand");
    assert_eq!(loaded.info(), camp.info());
    assert_eq!(loaded.state(), CampState::Persisted);

    let orange = &loaded.colors()["orange"];
    assert_eq!(orange, &camp.colors()["orange"]);
    assert_eq!(orange.description(), Some("primary accent"));

    let roles = &loaded.maps()["roles"];
    assert_eq!(roles, &camp.maps()["roles"]);
    assert_eq!(roles.keys().collect::<Vec<_>>(), ["orange", "ink"]);
    assert_eq!(roles["ink"].alpha(), Some(0.8));

    let main = &loaded.palettes()["main"];
    assert_eq!(main, &camp.palettes()["main"]);
    assert_eq!(main[1].space(), ColorSpace::Hsl);

    let heat = &loaded.scales()["heat"];
    assert_eq!(heat, &camp.scales()["heat"]);
    assert_eq!(heat.stops(), [0.0, 0.8]);
    assert_eq!(heat.name(), Some("heat"));
}

#[test]
fn test_second_save_conflicts_and_leaves_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut camp = brand_camp();
    let root = camp.save(dir.path(), false).unwrap();
    let orange_path = root.join("colors").join("orange.json");
    let before = fs::read_to_string(&orange_path).unwrap();

    let mut changed = Camp::new("brand", None, None).unwrap();
    changed
        .add_objects([Color::hex("#000000").unwrap().named("orange").unwrap()], false)
        .unwrap();
    let err = changed.save(dir.path(), false).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(changed.state(), CampState::Populated);
    assert_eq!(fs::read_to_string(&orange_path).unwrap(), before);

    changed.save(dir.path(), true).unwrap();
    assert_ne!(fs::read_to_string(&orange_path).unwrap(), before);
}

#[test]
fn test_load_with_requested_space_converts_members() {
    let dir = tempfile::tempdir().unwrap();
    brand_camp().save(dir.path(), false).unwrap();

    let loaded = Camp::load_with(
        "brand",
        None,
        Some(ColorSpace::Rgb),
        &settings_for(dir.path()),
    )
    .unwrap();
    assert_eq!(loaded.colors()["orange"], [255, 170, 21]);
    assert!(loaded.palettes()["main"].iter().all(|c| c.space() == ColorSpace::Rgb));
}

#[test]
fn test_load_missing_camp_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = Camp::load_with("nowhere", Some(dir.path()), None, &settings_for(dir.path()))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_find_lists_saved_camps() {
    let dir = tempfile::tempdir().unwrap();
    brand_camp().save(dir.path(), false).unwrap();
    Camp::new("empty", None, None)
        .unwrap()
        .save(dir.path(), false)
        .unwrap();

    let found = Camp::find_in(&settings_for(dir.path()));
    assert_eq!(found.len(), 1);
    assert_eq!(found[dir.path()], vec!["brand", "empty"]);
}

#[test]
fn test_camp_changes_after_load() {
    let dir = tempfile::tempdir().unwrap();
    brand_camp().save(dir.path(), false).unwrap();
    let mut camp =
        Camp::load_with("brand", Some(dir.path()), None, &settings_for(dir.path())).unwrap();

    let removed = camp.remove(MemberKind::Scale, "heat").unwrap();
    assert!(matches!(removed, CampObject::Scale(_)));
    assert_eq!(camp.state(), CampState::Populated);
    assert!(camp.scales().is_empty());

    camp.save(dir.path(), true).unwrap();
    let reloaded =
        Camp::load_with("brand", Some(dir.path()), None, &settings_for(dir.path())).unwrap();
    assert!(reloaded.scales().is_empty());
    assert_eq!(reloaded.len(), 3);
}

#[test]
fn test_bundled_camp_is_found_and_loads() {
    let builtin = Settings::builtin();
    let bundled = builtin.camp_paths[1].clone();
    let settings = Settings {
        default_color_space: ColorSpace::Hex,
        camp_paths: vec![bundled.clone()],
    };

    let found = Camp::find_in(&settings);
    assert!(found[bundled.as_path()].iter().any(|name| name == "basic"));

    let basic = Camp::load_with("basic", None, None, &settings).unwrap();
    assert_eq!(basic.colors().len(), 5);
    assert_eq!(basic.colors()["red"], "#FF0000");
    assert_eq!(basic.palettes()["primaries"].len(), 3);
    assert_eq!(basic.scales()["grayscale"].interpolate(0.5), "#808080");
}
