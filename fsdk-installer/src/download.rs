//! Archive download and checksum verification.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use fsdk_core::msg_format;
use fsdk_core::{FsdkError, Result};
use fsdk_messages::MESSAGES;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};

use crate::releases::describe;

const CHUNK_SIZE: usize = 64 * 1024;

/// Stream `url` into `dest`, returning the number of bytes written.
///
/// Read failures are network errors; write failures are filesystem errors.
pub fn download_to_file(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    let span = tracing::info_span!("download", url = %url);
    let _enter = span.enter();

    let mut response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| FsdkError::network(describe("download archive", url, &e)))?;

    // Read before the body: the length reported afterwards is what is left.
    let expected_len = response.content_length();
    let pb = byte_progress_bar(expected_len);
    let mut file = File::create(dest).map_err(|e| FsdkError::filesystem(e, dest, "create"))?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written = 0u64;

    loop {
        let n = match response.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                pb.abandon();
                return Err(FsdkError::network(format!(
                    "download of {} interrupted: {}",
                    url, e
                )));
            }
        };
        file.write_all(&buf[..n])
            .map_err(|e| FsdkError::filesystem(e, dest, "write"))?;
        written += n as u64;
        pb.inc(n as u64);
    }

    file.flush()
        .map_err(|e| FsdkError::filesystem(e, dest, "write"))?;
    pb.finish_and_clear();

    if let Some(expected) = expected_len {
        if expected != written {
            return Err(FsdkError::network(format!(
                "download of {} truncated: got {} of {} bytes",
                url, written, expected
            )));
        }
    }

    tracing::debug!(bytes = written, dest = %dest.display(), "download complete");
    Ok(written)
}

fn byte_progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("Downloading: [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▉-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} Downloading: {bytes}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    }
}

/// Lowercase hex SHA-256 of a file.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| FsdkError::filesystem(e, path, "open"))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| FsdkError::filesystem(e, path, "read"))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compare a file against the checksum published in the manifest.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let actual = sha256_file(path)?;
    if actual.eq_ignore_ascii_case(expected.trim()) {
        return Ok(());
    }
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Err(FsdkError::network(msg_format!(
        MESSAGES.install_checksum_mismatch,
        file = file,
        expected = expected.trim(),
        actual = actual
    )))
}
