//! Transparent decompression of download record files.
//!
//! GISAID hands out record exports either as plain JSON lines or wrapped in
//! a gzip stream, a gzipped tarball or a zip archive.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Container format, detected from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Plain,
    Gzip,
    TarGz,
    Zip,
}

impl Container {
    /// Detect the container from the file extension.
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Self::TarGz
        } else if name.ends_with(".gz") {
            Self::Gzip
        } else if name.ends_with(".zip") {
            Self::Zip
        } else {
            Self::Plain
        }
    }
}

/// Open a record file as buffered text, unwrapping any container.
pub fn open_records(path: &Path) -> Result<Box<dyn BufRead>> {
    let container = Container::detect(path);
    debug!(path = %path.display(), container = ?container, "opening records");
    let file = File::open(path).map_err(IngestError::read(path))?;
    match container {
        Container::Plain => Ok(Box::new(BufReader::new(file))),
        Container::Gzip => Ok(Box::new(BufReader::new(MultiGzDecoder::new(file)))),
        Container::TarGz => {
            let bytes = tar_member(path, file)?;
            Ok(Box::new(Cursor::new(bytes)))
        }
        Container::Zip => {
            let bytes = zip_member(path, file)?;
            Ok(Box::new(Cursor::new(bytes)))
        }
    }
}

fn is_record_member(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    let base = lower.rsplit('/').next().unwrap_or_default();
    !base.starts_with('.')
        && !lower.starts_with("__macosx")
        && [".json", ".jsonl", ".ndjson"]
            .iter()
            .any(|ext| lower.ends_with(ext))
}

fn tar_member(path: &Path, file: File) -> Result<Vec<u8>> {
    let mut archive = tar::Archive::new(MultiGzDecoder::new(file));
    let entries = archive.entries().map_err(IngestError::archive(path))?;
    for entry in entries {
        let mut entry = entry.map_err(IngestError::archive(path))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry
            .path()
            .map_err(IngestError::archive(path))?
            .to_string_lossy()
            .into_owned();
        if is_record_member(&name) {
            debug!(member = %name, "reading tar member");
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(IngestError::archive(path))?;
            return Ok(bytes);
        }
    }
    Err(IngestError::EmptyArchive {
        path: path.to_path_buf(),
    })
}

fn zip_member(path: &Path, file: File) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(file).map_err(IngestError::archive(path))?;
    for index in 0..archive.len() {
        let mut member = archive
            .by_index(index)
            .map_err(IngestError::archive(path))?;
        if member.is_dir() {
            continue;
        }
        let name = member.name().to_string();
        if is_record_member(&name) {
            debug!(member = %name, "reading zip member");
            let mut bytes = Vec::new();
            member
                .read_to_end(&mut bytes)
                .map_err(IngestError::archive(path))?;
            return Ok(bytes);
        }
    }
    Err(IngestError::EmptyArchive {
        path: path.to_path_buf(),
    })
}
