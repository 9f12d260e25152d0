//! `manifest.json` and the `index.ts` barrel in the samples directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::screens::pascal_case;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const INDEX_FILE: &str = "index.ts";
const WRAPPER_MARKER: &str = ".wrapper.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub filename: String,
    #[serde(rename = "samplesCount")]
    pub sample_count: usize,
}

/// Screen identifier → entry, ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub entries: BTreeMap<String, ManifestEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Manifest {
    pub fn insert(&mut self, screen_id: &str, sample_count: usize) {
        self.entries.insert(
            screen_id.to_string(),
            ManifestEntry {
                filename: format!("{screen_id}.tsx"),
                sample_count,
            },
        );
    }

    pub fn screen_ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `Ok(None)` when the samples directory has no manifest yet.
    pub fn load(samples_dir: &Path) -> Result<Option<Self>, ManifestError> {
        let path = samples_dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|source| ManifestError::Io {
            path: path.clone(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), screens = manifest.len(), "Loaded manifest");
        Ok(Some(manifest))
    }

    /// Writes `manifest.json` and the matching `index.ts`.
    pub fn save(&self, samples_dir: &Path) -> Result<(), ManifestError> {
        let path = samples_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|source| ManifestError::Parse {
            path: path.clone(),
            source,
        })?;
        write(&path, &json)?;
        info!(path = %path.display(), screens = self.len(), "Wrote manifest");

        let index_path = samples_dir.join(INDEX_FILE);
        write(&index_path, &self.index_module())?;
        info!(path = %index_path.display(), "Wrote sample index module");
        Ok(())
    }

    /// One `export { default as Pascal } from './screen';` line per entry.
    pub fn index_module(&self) -> String {
        let mut out = String::new();
        for screen_id in self.entries.keys() {
            out.push_str(&format!(
                "export {{ default as {} }} from './{}';\n",
                pascal_case(screen_id),
                screen_id
            ));
        }
        out
    }
}

fn write(path: &Path, contents: &str) -> Result<(), ManifestError> {
    fs::write(path, contents).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Every `.tsx` sample in the directory except generated wrappers, sorted.
pub fn scan_samples(samples_dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(samples_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(error = ?e, path = %samples_dir.display(), "Samples directory not readable");
            return Vec::new();
        }
    };
    let mut screens: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.contains(WRAPPER_MARKER))
        .filter_map(|name| name.strip_suffix(".tsx").map(str::to_string))
        .collect();
    screens.sort();
    screens
}

/// Screens downstream steps act on: manifest keys, else a directory scan.
pub fn known_screens(samples_dir: &Path) -> Result<Vec<String>, ManifestError> {
    match Manifest::load(samples_dir)? {
        Some(manifest) => Ok(manifest.screen_ids()),
        None => {
            warn!(path = %samples_dir.display(), "No manifest found, scanning samples directory");
            Ok(scan_samples(samples_dir))
        }
    }
}
