use std::path::{Path, PathBuf};

use anyhow::Context;
use ornament_sim::SceneConfig;

/// File name looked up when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "ornament.toml";

/// Find `ornament.toml` starting from a directory, walking up.
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Read and validate a scene configuration file.
pub fn load_config_file(path: &Path) -> anyhow::Result<SceneConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    SceneConfig::from_toml_str(&content).with_context(|| format!("Invalid scene configuration in {}", path.display()))
}

/// Resolve the configuration: explicit path, else the nearest
/// `ornament.toml` above the current directory, else the stock scene.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<SceneConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    match find_config_from(&std::env::current_dir()?) {
        Some(path) => {
            log::info!("Using {}", path.display());
            load_config_file(&path)
        }
        None => {
            log::debug!("No {CONFIG_FILE_NAME} found, using the stock scene");
            Ok(SceneConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_config_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        std::fs::write(&path, "[world]\nbody_count = 5\nseed = 42\n\n[countdown]\nmonth = 1\nday = 1\n").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.world.body_count, 5);
        assert_eq!(config.world.seed, Some(42));
        assert_eq!((config.countdown.month, config.countdown.day), (1, 1));
        assert_eq!(config.camera, SceneConfig::default().camera);
    }

    #[test]
    fn test_load_rejects_invalid_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        std::fs::write(&path, "[countdown]\nmonth = 2\nday = 30\n").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("scene.toml"));
    }

    #[test]
    fn test_missing_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_config(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
