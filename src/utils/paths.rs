//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Everything lives under ~/.social-canvas/.

use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Social Canvas directory (~/.social-canvas/)
pub fn social_canvas_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".social-canvas"))
}

/// Get the config file path (~/.social-canvas/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(social_canvas_dir()?.join("config.json"))
}

/// Get the database file path (~/.social-canvas/data.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(social_canvas_dir()?.join("data.db"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &PathBuf) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Social Canvas directory, creating if it doesn't exist
pub fn ensure_social_canvas_dir() -> AppResult<PathBuf> {
    let path = social_canvas_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
