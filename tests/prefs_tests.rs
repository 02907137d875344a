// Integration tests for the theme preference store

use std::fs;
use std::path::PathBuf;

use termscan::model::Theme;
use termscan::prefs::ThemeStore;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("termscan-test-{}-{}", name, std::process::id()));
    fs::remove_dir_all(&dir).ok();
    dir
}

#[test]
fn set_then_initial_round_trips() {
    let dir = scratch_dir("roundtrip");
    let store = ThemeStore::at(Some(dir.clone()));

    store.set(Theme::Dark);

    // A fresh store over the same directory models a new session
    let next_session = ThemeStore::at(Some(dir.clone()));
    assert_eq!(next_session.initial(false), Theme::Dark);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn persisted_value_wins_over_system_preference() {
    let dir = scratch_dir("wins");
    let store = ThemeStore::at(Some(dir.clone()));
    store.set(Theme::Light);

    assert_eq!(store.initial(true), Theme::Light);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn without_persistence_falls_back_to_system_preference() {
    let store = ThemeStore::at(None);
    assert_eq!(store.initial(true), Theme::Dark);
    assert_eq!(store.initial(false), Theme::Light);
}

#[test]
fn set_without_persistence_is_a_silent_no_op() {
    let store = ThemeStore::at(None);
    store.set(Theme::Dark);
    // Nothing was saved, so system preference still decides
    assert_eq!(store.initial(false), Theme::Light);
}

#[test]
fn garbage_in_the_preference_file_falls_back_to_system() {
    let dir = scratch_dir("garbage");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("theme.txt"), "solarized").unwrap();

    let store = ThemeStore::at(Some(dir.clone()));
    assert_eq!(store.initial(true), Theme::Dark);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn theme_parses_and_displays_symmetrically() {
    assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
    assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
    assert_eq!(Theme::Dark.to_string(), "dark");
    assert!("blue".parse::<Theme>().is_err());
}
