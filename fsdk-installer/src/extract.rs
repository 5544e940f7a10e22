//! Unpacking SDK archives into a staging directory.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use fsdk_core::file_system::has_file;
use fsdk_core::{FsdkError, Result};
use fsdk_platform::Platform;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarXz,
}

impl ArchiveFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.ends_with(".zip") {
            Ok(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.xz") {
            Ok(ArchiveFormat::TarXz)
        } else {
            Err(FsdkError::invalid_data(
                path,
                "extract",
                "unsupported archive format (expected .zip or .tar.xz)",
            ))
        }
    }
}

/// Unpack `archive` into `dest`, returning the number of entries written.
pub fn extract(archive: &Path, dest: &Path) -> Result<usize> {
    let span = tracing::info_span!("extract", archive = %archive.display());
    let _enter = span.enter();

    match ArchiveFormat::from_path(archive)? {
        ArchiveFormat::Zip => extract_zip(archive, dest),
        ArchiveFormat::TarXz => extract_tar_xz(archive, dest),
    }
}

fn extract_zip(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive).map_err(|e| FsdkError::filesystem(e, archive, "open"))?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| FsdkError::invalid_data(archive, "extract", e.to_string()))?;

    let pb = entry_progress_bar(Some(zip.len() as u64));
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| FsdkError::invalid_data(archive, "extract", e.to_string()))?;
        let relative = entry.enclosed_name().ok_or_else(|| {
            FsdkError::invalid_data(
                archive,
                "extract",
                format!("entry '{}' escapes the extraction directory", entry.name()),
            )
        })?;
        reject_symlinked_parent(archive, dest, &relative)?;
        let out_path = dest.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .map_err(|e| FsdkError::filesystem(e, &out_path, "create directory"))?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| FsdkError::filesystem(e, parent, "create directory"))?;
            }
            if entry.is_symlink() {
                let target = read_link_target(&mut entry, &out_path)?;
                if !link_stays_inside(&relative, Path::new(&target)) {
                    return Err(FsdkError::invalid_data(
                        archive,
                        "extract",
                        format!(
                            "symlink '{}' -> '{}' points outside the extraction directory",
                            relative.display(),
                            target
                        ),
                    ));
                }
                write_symlink(&target, &out_path)?;
            } else {
                let mut out = File::create(&out_path)
                    .map_err(|e| FsdkError::filesystem(e, &out_path, "create"))?;
                io::copy(&mut entry, &mut out)
                    .map_err(|e| FsdkError::filesystem(e, &out_path, "extract"))?;
            }
        }

        if !entry.is_symlink() {
            apply_mode(entry.unix_mode(), &out_path)?;
        }

        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(zip.len())
}

#[cfg(unix)]
fn apply_mode(mode: Option<u32>, path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    match mode {
        Some(mode) => fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|e| FsdkError::filesystem(e, path, "set permissions")),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn apply_mode(_mode: Option<u32>, _path: &Path) -> Result<()> {
    Ok(())
}

fn read_link_target(entry: &mut impl io::Read, link: &Path) -> Result<String> {
    let mut target = String::new();
    entry
        .read_to_string(&mut target)
        .map_err(|e| FsdkError::filesystem(e, link, "extract"))?;
    Ok(target.trim().to_string())
}

/// Whether a link at `relative` pointing at `target` resolves inside the
/// extraction root. Absolute targets never do.
fn link_stays_inside(relative: &Path, target: &Path) -> bool {
    let mut depth = relative
        .parent()
        .map(|parent| parent.components().count())
        .unwrap_or(0);
    for component in target.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    // Windows-style absolute paths parse as a single normal component on unix.
    !target.to_string_lossy().contains(':')
}

/// Refuse entries whose parent directories include a symlink already
/// extracted from the archive.
fn reject_symlinked_parent(archive: &Path, dest: &Path, relative: &Path) -> Result<()> {
    let mut current = dest.to_path_buf();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            current.push(component);
            let is_link = fs::symlink_metadata(&current)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(false);
            if is_link {
                return Err(FsdkError::invalid_data(
                    archive,
                    "extract",
                    format!(
                        "entry '{}' is written through a symlink",
                        relative.display()
                    ),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn write_symlink(target: &str, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link)
        .map_err(|e| FsdkError::filesystem(e, link, "create symlink"))
}

#[cfg(not(unix))]
fn write_symlink(target: &str, link: &Path) -> Result<()> {
    // Windows archives carry no symlinks; keep the link text as a file.
    fs::write(link, target).map_err(|e| FsdkError::filesystem(e, link, "extract"))
}

fn extract_tar_xz(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive).map_err(|e| FsdkError::filesystem(e, archive, "open"))?;
    let decoder = xz2::read::XzDecoder::new(BufReader::new(file));
    let mut tar = tar::Archive::new(decoder);
    tar.set_preserve_permissions(true);
    tar.set_overwrite(true);

    let pb = entry_progress_bar(None);
    let mut count = 0usize;
    let entries = tar
        .entries()
        .map_err(|e| FsdkError::invalid_data(archive, "extract", e.to_string()))?;
    for entry in entries {
        let mut entry =
            entry.map_err(|e| FsdkError::invalid_data(archive, "extract", e.to_string()))?;
        let unpacked = entry
            .unpack_in(dest)
            .map_err(|e| FsdkError::filesystem(e, dest, "extract"))?;
        if !unpacked {
            let name = entry
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            return Err(FsdkError::invalid_data(
                archive,
                "extract",
                format!("entry '{}' escapes the extraction directory", name),
            ));
        }
        count += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(count)
}

fn entry_progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("Extracting:  [{bar:30.cyan/blue}] {pos}/{len} files")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▉-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} Extracting: {pos} files")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    }
}

/// Find the SDK inside an extracted archive.
///
/// Official archives wrap everything in a top-level `flutter/` directory;
/// an archive that already starts at the SDK root is accepted too.
pub fn locate_sdk_root(staging: &Path, platform: &Platform) -> Result<PathBuf> {
    let marker = platform.sdk_marker();
    [staging.join("flutter"), staging.to_path_buf()]
        .into_iter()
        .find(|candidate| has_file(candidate, &marker))
        .ok_or_else(|| {
            FsdkError::invalid_data(
                staging,
                "locate SDK in",
                format!("archive does not contain {}", marker.display()),
            )
        })
}
