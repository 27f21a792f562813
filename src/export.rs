use crate::error::EditorError;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

const FALLBACK_NAME: &str = "coloring";

/// Download name for a picture: whitespace runs become `-`, always `.png`.
pub fn suggested_filename(display_name: &str) -> String {
    let stem = display_name.split_whitespace().collect::<Vec<_>>().join("-");
    if stem.is_empty() {
        format!("{FALLBACK_NAME}.png")
    } else {
        format!("{stem}.png")
    }
}

/// Writes the composited picture; the format follows the extension.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<(), EditorError> {
    image.save(path).map_err(|error| EditorError::Export {
        path: path.to_path_buf(),
        error,
    })?;
    log::info!("Saved {}x{} picture to {}", image.width(), image.height(), path.display());
    Ok(())
}

/// "Print" by saving the picture alone to a temp PNG and handing it to the OS.
pub fn print_image(image: &RgbaImage) -> Result<PathBuf> {
    let path = std::env::temp_dir().join("colorbook_print.png");
    save_image(image, &path).context("Failed to prepare print image")?;
    open_with_os(&path).context("Failed to hand picture to the system")?;
    Ok(path)
}

#[cfg(target_os = "windows")]
fn open_with_os(path: &Path) -> std::io::Result<()> {
    std::process::Command::new("cmd")
        .args(["/C", "start", ""])
        .arg(path)
        .spawn()
        .map(|_| ())
}

#[cfg(target_os = "macos")]
fn open_with_os(path: &Path) -> std::io::Result<()> {
    std::process::Command::new("open").arg(path).spawn().map(|_| ())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn open_with_os(path: &Path) -> std::io::Result<()> {
    std::process::Command::new("xdg-open")
        .arg(path)
        .spawn()
        .map(|_| ())
}
