//! Application file locations.
//!
//! Priority: explicit override (CLI) → `ROMSHELF_CONFIG_DIR` env var →
//! platform config/data directory from dirs-next → current directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Path to a configuration file (prefs, input maps).
pub fn config_file(name: &str, override_dir: Option<&Path>) -> PathBuf {
    config_dir(override_dir).join(name)
}

/// Path to a data file (logs, caches).
pub fn data_file(name: &str, override_dir: Option<&Path>) -> PathBuf {
    data_dir(override_dir).join(name)
}

/// Create the config/data directories if missing.
pub fn ensure_dirs(override_dir: Option<&Path>) -> Result<()> {
    for dir in [config_dir(override_dir), data_dir(override_dir)] {
        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
    }
    Ok(())
}

fn env_override() -> Option<PathBuf> {
    std::env::var("ROMSHELF_CONFIG_DIR").ok().map(PathBuf::from)
}

fn config_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Some(dir) = env_override() {
        return dir;
    }
    dirs_next::config_dir()
        .map(|d| d.join("romshelf"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Some(dir) = env_override() {
        return dir;
    }
    dirs_next::data_dir()
        .map(|d| d.join("romshelf"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_dir_wins() {
        let path = config_file("prefs.json", Some(Path::new("/custom")));
        assert_eq!(path, PathBuf::from("/custom/prefs.json"));
    }

    #[test]
    fn default_paths_mention_the_app() {
        let path = data_file("browse.log", None);
        let text = path.to_string_lossy().to_string();
        // Either the platform dir (".../romshelf/...") or the "." fallback.
        assert!(text.contains("romshelf") || text.starts_with('.'));
        assert!(text.ends_with("browse.log"));
    }
}
