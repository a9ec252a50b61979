//! Configuration loading from disk and the environment.
//!
//! These tests change the working directory or process environment, so they
//! run serially.

use reelforge::config::{load_config, load_config_or_default, Config};
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

struct CwdGuard(std::path::PathBuf);

impl CwdGuard {
    fn enter(dir: &Path) -> Self {
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self(previous)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

#[test]
#[serial]
fn picks_up_config_in_working_directory() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("reelforge.toml"),
        "[reel]\nrelative_paths = true\n",
    )
    .unwrap();

    let _cwd = CwdGuard::enter(temp.path());
    let config = load_config_or_default(None).unwrap();
    assert!(config.reel.relative_paths);
}

#[test]
#[serial]
fn explicit_path_wins_over_working_directory() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("reelforge.toml"),
        "[reel]\nrelative_paths = true\n",
    )
    .unwrap();
    let explicit = temp.path().join("other.toml");
    fs::write(&explicit, "[studio]\nname = \"aura\"\n").unwrap();

    let _cwd = CwdGuard::enter(temp.path());
    let config = load_config_or_default(Some(&explicit)).unwrap();
    assert!(!config.reel.relative_paths);
    assert_eq!(config.studio.name.as_deref(), Some("aura"));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let err = load_config(Path::new("/nonexistent/reelforge.toml")).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read config file"));
}

#[test]
fn malformed_file_is_an_error() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "[reel\nrelative_paths = ").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config file"));
}

#[test]
#[serial]
fn studio_falls_back_to_environment() {
    std::env::set_var("STUDIO", "aura");
    std::env::set_var("SHOW", "pilot");
    std::env::remove_var("SHOT");

    let resolved = Config::default().studio.resolve();

    std::env::remove_var("STUDIO");
    std::env::remove_var("SHOW");

    assert_eq!(resolved.name.as_deref(), Some("aura"));
    assert_eq!(resolved.show.as_deref(), Some("pilot"));
    assert_eq!(resolved.shot, None);
}
