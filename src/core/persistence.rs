//! Persistence of user preferences (the last selected model) in the config directory.

use std::fs;
use std::io;
use std::path::Path;

use crate::core::paths;

const LAST_MODEL_FILE: &str = "last_model";

/// Load the last used model ID from disk, if the file exists.
pub fn load_last_model() -> Option<String> {
    load_last_model_from(&paths::config_dir()?)
}

/// Save the last used model ID to disk. Creates the config directory if needed.
pub fn save_last_model(model_id: &str) -> io::Result<()> {
    let dir = paths::config_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No config directory"))?;
    save_last_model_to(&dir, model_id)
}

fn load_last_model_from(dir: &Path) -> Option<String> {
    fs::read_to_string(dir.join(LAST_MODEL_FILE))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn save_last_model_to(dir: &Path, model_id: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(LAST_MODEL_FILE), model_id)
}
