//! Chart artifacts on disk: naming, atomic writes, listing and retrieval.

use crate::error::{VizError, VizResult};
use crate::route::ChartKind;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const ARTIFACT_EXTENSION: &str = ".png";

/// A chart image written to the result directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartArtifact {
    pub sheet: String,
    pub kind: ChartKind,
    pub file_name: String,
    pub path: PathBuf,
}

/// Accents stripped, spaces and path separators turned into `_`, anything
/// outside `[A-Za-z0-9._-]` dropped, and leading/trailing `._` trimmed.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.nfkd().filter(|c| !is_combining_mark(*c)) {
        match c {
            'đ' => out.push('d'),
            'Đ' => out.push('D'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => out.push(c),
            c if c.is_whitespace() || matches!(c, '/' | '\\' | ':') => out.push('_'),
            _ => {}
        }
    }
    out.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Filesystem-safe rendition of a sheet name. Never returns an empty string.
#[must_use]
pub fn safe_filename(name: &str) -> String {
    let safe = sanitize(name);
    if safe.is_empty() {
        "sheet".to_string()
    } else {
        safe
    }
}

/// Filesystem-safe name for an uploaded file.
///
/// Stem and extension are sanitized separately so the extension survives
/// even when nothing of the stem does. The extension is lower-cased.
#[must_use]
pub fn safe_upload_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, extension) = match base.rsplit_once('.') {
        Some((stem, extension)) => (sanitize(stem), sanitize(extension).to_ascii_lowercase()),
        None => (sanitize(base), String::new()),
    };
    let stem = if stem.is_empty() { "upload" } else { stem.as_str() };
    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{extension}")
    }
}

/// `{safe(sheet)}_{kind}.png`
#[must_use]
pub fn artifact_file_name(sheet: &str, kind: ChartKind) -> String {
    format!("{}_{}{ARTIFACT_EXTENSION}", safe_filename(sheet), kind.slug())
}

/// A bare file name: no separators, no parent references, not hidden.
fn validate_name(name: &str) -> VizResult<()> {
    let plain = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name);
    if plain {
        Ok(())
    } else {
        Err(VizError::InvalidName(name.to_string()))
    }
}

/// One mutex per key, created on first use.
#[derive(Debug, Clone, Default)]
pub struct KeyedLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl KeyedLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `key`. Hold its guard for the duration of the write.
    #[must_use]
    pub fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key.to_string()).or_default())
    }
}

/// The result directory seen as a set of named PNG artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    locks: KeyedLocks,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: KeyedLocks::new(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Write `bytes` under `file_name`, replacing any previous artifact.
    ///
    /// The data goes to a hidden temporary file first and is renamed into
    /// place, so readers see either the old file or the complete new one.
    pub fn write(&self, file_name: &str, bytes: &[u8]) -> VizResult<PathBuf> {
        validate_name(file_name)?;
        let path = self.path_for(file_name);

        let lock = self.locks.lock_for(file_name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        fs::create_dir_all(&self.dir).map_err(|e| VizError::io(&self.dir, e))?;
        let mut tmp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| VizError::io(&self.dir, e))?;
        tmp.write_all(bytes).map_err(|e| VizError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| VizError::io(tmp.path(), e))?;
        tmp.persist(&path).map_err(|e| VizError::io(&path, e.error))?;
        Ok(path)
    }

    /// Sorted names of the PNG artifacts currently present.
    pub fn list(&self) -> VizResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(VizError::io(&self.dir, e)),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| VizError::io(&self.dir, e))?;
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with('.') && name.ends_with(ARTIFACT_EXTENSION) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Bytes of one artifact.
    pub fn fetch(&self, file_name: &str) -> VizResult<Vec<u8>> {
        validate_name(file_name)?;
        let path = self.path_for(file_name);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(VizError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(VizError::io(path, e)),
        }
    }
}
