use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::paths::absolute;
use crate::error::{AppError, AppResult};
use crate::profiles::store::timestamp;

/// Points `link` at `target`. An existing link is replaced, an existing real
/// directory is renamed to `<link>_backup_<ts>` first.
pub fn switch_junction(link: &Path, target: &Path) -> AppResult<()> {
    match fs::symlink_metadata(link) {
        Ok(meta) if meta.file_type().is_symlink() => remove_link(link)?,
        Ok(meta) if meta.is_dir() => {
            let backup = backup_path(link);
            fs::rename(link, &backup).map_err(|err| {
                AppError::Junction(format!("existing folder could not be moved: {err}"))
            })?;
            tracing::info!(
                from = %link.display(),
                to = %backup.display(),
                "moved existing save folder aside"
            );
        }
        Ok(_) => {
            return Err(AppError::Junction(
                "existing path is not a folder".to_string(),
            ));
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    fs::create_dir_all(target)?;
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)?;
    }
    create_link(link, &absolute(target))
}

/// Where `link` points, resolved against its parent when relative.
pub fn read_target(link: &Path) -> Option<PathBuf> {
    let meta = fs::symlink_metadata(link).ok()?;
    if !meta.file_type().is_symlink() {
        return None;
    }

    let target = strip_verbatim(fs::read_link(link).ok()?);
    if target.is_relative() {
        return Some(link.parent().unwrap_or(Path::new("")).join(target));
    }
    Some(target)
}

pub fn is_link(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
}

/// Case-insensitive check that `target` lies under `root`.
pub fn points_into(target: &Path, root: &Path) -> bool {
    let target = absolute(target).to_string_lossy().to_lowercase();
    let root = absolute(root).to_string_lossy().to_lowercase();
    target.starts_with(root.trim_end_matches(['/', '\\']))
}

fn backup_path(link: &Path) -> PathBuf {
    let mut name = link.as_os_str().to_os_string();
    name.push(format!("_backup_{}", timestamp()));
    PathBuf::from(name)
}

// Junctions come back from read_link as `\\?\C:\...`.
fn strip_verbatim(path: PathBuf) -> PathBuf {
    let raw = path.to_string_lossy();
    match raw.strip_prefix(r"\\?\") {
        Some(rest) if !rest.starts_with("UNC\\") => PathBuf::from(rest),
        _ => path,
    }
}

#[cfg(windows)]
fn remove_link(link: &Path) -> AppResult<()> {
    fs::remove_dir(link)?;
    Ok(())
}

#[cfg(not(windows))]
fn remove_link(link: &Path) -> AppResult<()> {
    fs::remove_file(link)?;
    Ok(())
}

#[cfg(windows)]
fn create_link(link: &Path, target: &Path) -> AppResult<()> {
    use std::os::windows::process::CommandExt;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;

    let output = std::process::Command::new("cmd")
        .arg("/C")
        .arg("mklink")
        .arg("/J")
        .arg(link)
        .arg(target)
        .creation_flags(CREATE_NO_WINDOW)
        .output()?;

    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(AppError::Junction(format!(
            "mklink failed: {} ({})",
            output.status,
            combined.trim()
        )));
    }

    tracing::debug!(link = %link.display(), target = %target.display(), "junction created");
    Ok(())
}

#[cfg(not(windows))]
fn create_link(link: &Path, target: &Path) -> AppResult<()> {
    std::os::unix::fs::symlink(target, link)
        .map_err(|err| AppError::Junction(format!("symlink failed: {err}")))?;
    tracing::debug!(link = %link.display(), target = %target.display(), "symlink created");
    Ok(())
}
