//! Local track repository.
//!
//! Layout on disk:
//!
//! <tracks_root>/
//!   5.0.0-SNAPSHOT/geonames.json
//!   5.0/geonames.json
//!   5/logging.json
//!   geonames.json          // unversioned fallback, tried last
//!
//! A lookup walks the candidates from [`crate::version::versions`] and takes
//! the first file that exists.

use crate::Result;
use crate::track::{Track, TrackReader};
use crate::version;

use anyhow::{Context, bail};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const TRACK_FILE_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct TrackRepository {
    tracks_root: PathBuf,
    reader: TrackReader,
}

impl TrackRepository {
    pub fn new(tracks_root: impl Into<PathBuf>) -> Self {
        Self {
            tracks_root: tracks_root.into(),
            reader: TrackReader::new(),
        }
    }

    /// Directories to search for `distribution_version`, most specific first.
    pub fn candidate_dirs(&self, distribution_version: &str) -> Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        for candidate in version::versions(distribution_version)? {
            dirs.push(self.tracks_root.join(path_component("version", &candidate)?));
        }
        dirs.push(self.tracks_root.clone());
        Ok(dirs)
    }

    /// Files probed for `track`, in lookup order.
    pub fn candidates(&self, track: &str, distribution_version: &str) -> Result<Vec<PathBuf>> {
        let file = format!("{}.{TRACK_FILE_EXTENSION}", path_component("track name", track)?);
        Ok(self
            .candidate_dirs(distribution_version)?
            .into_iter()
            .map(|dir| dir.join(&file))
            .collect())
    }

    /// First existing track file for `track`.
    pub fn resolve(&self, track: &str, distribution_version: &str) -> Result<PathBuf> {
        let candidates = self.candidates(track, distribution_version)?;
        for path in &candidates {
            if path.is_file() {
                info!(
                    "Using track file [{}] for track [{}] and version [{}]",
                    path.display(),
                    track,
                    distribution_version
                );
                return Ok(path.clone());
            }
            debug!("No track file at [{}]", path.display());
        }

        let probed: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        bail!(
            "no track '{}' for version {} (looked in: {})",
            track,
            distribution_version,
            probed.join(", ")
        );
    }

    /// Resolve, parse and validate `track`.
    pub fn load(
        &self,
        track: &str,
        distribution_version: &str,
        mappings_root: &str,
        data_root: &str,
    ) -> Result<Track> {
        let path = self.resolve(track, distribution_version)?;
        let spec = read_spec(&path)?;
        Ok(self.reader.read(track, &spec, mappings_root, data_root)?)
    }

    /// Track names in the most specific directory that exists for the version.
    pub fn list_tracks(&self, distribution_version: &str) -> Result<Vec<String>> {
        for dir in self.candidate_dirs(distribution_version)? {
            if !dir.is_dir() {
                continue;
            }

            let mut names = Vec::new();
            let entries =
                fs::read_dir(&dir).with_context(|| format!("read track dir {}", dir.display()))?;
            for entry in entries {
                let path = entry
                    .with_context(|| format!("read track dir {}", dir.display()))?
                    .path();
                if !path.is_file()
                    || path.extension().and_then(|e| e.to_str()) != Some(TRACK_FILE_EXTENSION)
                {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
            names.sort();
            debug!("Found {} tracks in [{}]", names.len(), dir.display());
            return Ok(names);
        }

        Ok(Vec::new())
    }
}

/// `value` if it names a single entry directly below a directory.
fn path_component<'a>(kind: &str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() || value.contains(['/', '\\']) || value.contains("..") {
        bail!("{} '{}' cannot be used as a path component", kind, value);
    }
    Ok(value)
}

/// Read and parse one track file.
pub fn read_spec(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read track file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse track file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn candidates_follow_version_fallback_then_root() {
        let repo = TrackRepository::new("/tracks");
        let got: Vec<String> = repo
            .candidates("geonames", "5.0.0-SNAPSHOT")
            .unwrap()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        assert_eq!(
            vec![
                "/tracks/5.0.0-SNAPSHOT/geonames.json",
                "/tracks/5.0.0/geonames.json",
                "/tracks/5.0/geonames.json",
                "/tracks/5/geonames.json",
                "/tracks/geonames.json",
            ],
            got
        );
    }

    #[test]
    fn rejects_names_that_escape_the_tracks_root() {
        let repo = TrackRepository::new("/tracks");

        let err = repo.candidates("geonames", "5.0.0-../../../etc").unwrap_err();
        assert_eq!(
            "version '5.0.0-../../../etc' cannot be used as a path component",
            err.to_string()
        );

        for track in ["../geonames", "nested/geonames", "a\\b", ""] {
            let err = repo.candidates(track, "5.0.0").unwrap_err();
            assert_eq!(
                format!("track name '{track}' cannot be used as a path component"),
                err.to_string()
            );
        }

        assert!(repo.list_tracks("5.0.0-x/y").is_err());
    }

    #[test]
    fn invalid_version_is_propagated() {
        let repo = TrackRepository::new("/tracks");
        let err = repo.candidates("geonames", "master").unwrap_err();
        assert!(err.downcast_ref::<crate::InvalidSyntax>().is_some());
    }
}
