#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread;

use fsdk_config::Channel;
use fsdk_core::{FsdkError, Result};
use fsdk_installer::download::sha256_file;
use fsdk_installer::{InstallSettings, Release, ReleaseSource};
use fsdk_platform::Platform;

/// Build a Flutter-shaped `.tar.xz` archive for `version`.
pub fn sdk_archive(dir: &Path, version: &str) -> PathBuf {
    let path = dir.join(format!("flutter_linux_{}-stable.tar.xz", version));
    let version_json = format!(
        "{{\"frameworkVersion\": \"{}\", \"channel\": \"stable\"}}",
        version
    );
    let files = [
        ("flutter/bin/flutter", "#!/bin/sh\necho flutter\n".to_string()),
        ("flutter/bin/flutter.bat", "@echo off\r\n".to_string()),
        ("flutter/bin/cache/flutter.version.json", version_json),
        ("flutter/version", format!("{}\n", version)),
        ("flutter/README.md", "Flutter SDK\n".to_string()),
    ];

    let file = File::create(&path).unwrap();
    let encoder = xz2::write::XzEncoder::new(file, 6);
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in &files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
    path
}

/// Lay down an installed SDK directly, without going through an archive.
pub fn install_sdk(install_dir: &Path, version: &str) {
    fs::create_dir_all(install_dir.join("bin/cache")).unwrap();
    fs::write(install_dir.join("bin/flutter"), "#!/bin/sh\n").unwrap();
    fs::write(install_dir.join("bin/flutter.bat"), "@echo off\r\n").unwrap();
    fs::write(install_dir.join("version"), version).unwrap();
}

pub fn settings(install_dir: &Path) -> InstallSettings {
    InstallSettings {
        install_dir: install_dir.to_path_buf(),
        channel: Channel::Stable,
        check_only: false,
        path_guidance: false,
    }
}

/// Release source serving a prebuilt archive from disk.
pub struct FakeSource {
    pub release: Release,
    archive: PathBuf,
    pub downloads: Cell<usize>,
}

impl FakeSource {
    pub fn new(archive: &Path, version: &str) -> Self {
        let release = Release {
            version: version.to_string(),
            hash: "4d9e56e694b656610ab87fcf2efbcd226e0ed8cf".to_string(),
            channel: Channel::Stable,
            archive_url: format!(
                "https://example.invalid/releases/stable/linux/{}",
                archive.file_name().unwrap().to_string_lossy()
            ),
            sha256: Some(sha256_file(archive).unwrap()),
        };
        Self {
            release,
            archive: archive.to_path_buf(),
            downloads: Cell::new(0),
        }
    }

    pub fn with_sha256(mut self, sha256: &str) -> Self {
        self.release.sha256 = Some(sha256.to_string());
        self
    }
}

impl ReleaseSource for FakeSource {
    fn latest(&self, _platform: &Platform, _channel: Channel) -> Result<Release> {
        Ok(self.release.clone())
    }

    fn download(&self, _release: &Release, dest: &Path) -> Result<()> {
        self.downloads.set(self.downloads.get() + 1);
        fs::copy(&self.archive, dest).map_err(|e| FsdkError::filesystem(e, dest, "copy"))?;
        Ok(())
    }
}

/// Names of everything directly inside `dir`, sorted.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Minimal HTTP/1.1 server answering GET requests from a fixed route table.
/// Runs until the test process exits.
pub fn serve(routes: HashMap<String, Vec<u8>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if line == "\r\n" => break,
                    Ok(_) => {}
                }
            }

            let path = request_line.split_whitespace().nth(1).unwrap_or("/");
            let (status, body) = match routes.get(path) {
                Some(body) => ("200 OK", body.as_slice()),
                None => ("404 Not Found", &b"not found"[..]),
            };
            let header = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(body);
            let _ = stream.flush();
        }
    });

    format!("http://{}", addr)
}

/// Manifest JSON announcing `version` as the current stable release.
pub fn manifest_json(base_url: &str, version: &str, archive_path: &str, sha256: &str) -> String {
    let hash = "4d9e56e694b656610ab87fcf2efbcd226e0ed8cf";
    format!(
        r#"{{
  "base_url": "{base_url}",
  "current_release": {{ "beta": "0000", "stable": "{hash}" }},
  "releases": [
    {{
      "hash": "{hash}",
      "channel": "stable",
      "version": "{version}",
      "dart_sdk_arch": "{arch}",
      "archive": "{archive_path}",
      "sha256": "{sha256}"
    }}
  ]
}}"#,
        arch = fsdk_platform::Arch::current().dart_sdk_arch(),
    )
}
