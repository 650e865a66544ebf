use crate::draw::settings::CanvasSettings;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

pub const CANVAS_SETTINGS_FILE_NAME: &str = "canvas_settings.json";

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(CANVAS_SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

/// Settings next to the executable, or defaults when there is no file yet.
pub fn load() -> Result<CanvasSettings> {
    let path = resolve_settings_path()?;
    Ok(load_from_path(&path)?.unwrap_or_default())
}

pub fn save(settings: &CanvasSettings) -> Result<PathBuf> {
    let path = resolve_settings_path()?;
    save_to_path(&path, settings)?;
    Ok(path)
}

/// `None` when the file does not exist; a blank file yields defaults.
pub fn load_from_path(settings_path: &Path) -> Result<Option<CanvasSettings>> {
    if !settings_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(settings_path)
        .with_context(|| format!("read canvas settings file {}", settings_path.display()))?;

    if content.trim().is_empty() {
        return Ok(Some(CanvasSettings::default()));
    }

    let mut loaded: CanvasSettings = serde_json::from_str(&content).with_context(|| {
        format!(
            "deserialize canvas settings file {}",
            settings_path.display()
        )
    })?;
    if loaded.sanitize() {
        tracing::warn!(
            path = %settings_path.display(),
            "canvas settings contained invalid values; defaults substituted"
        );
    }
    Ok(Some(loaded))
}

pub fn save_to_path(settings_path: &Path, settings: &CanvasSettings) -> Result<()> {
    if let Some(parent) = settings_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create canvas settings parent folder {}", parent.display()))?;
    }

    let mut sanitized = settings.clone();
    sanitized.sanitize();
    let json = serde_json::to_string_pretty(&sanitized).context("serialize canvas settings")?;
    std::fs::write(settings_path, json)
        .with_context(|| format!("write canvas settings file {}", settings_path.display()))
}
