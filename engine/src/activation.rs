use crate::catalog::{THEME_EXTENSION, ThemeCatalog};
use crate::error::{EngineError, EngineResult};
use crate::types::{ActivatedThemeList, ThemeId};
use crate::validation::{ThemeIdValidator, Validator};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file recording the authoritative activation order.
///
/// Theme identifiers cannot start with '.', so the manifest never collides
/// with a marker.
pub const MANIFEST_FILE: &str = ".activated.json";

const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    version: u32,
    themes: ActivatedThemeList,
}

/// On-disk activation state.
///
/// The activation directory holds one marker per activated theme
/// (`<id>.json`, a copy of the catalog asset) and a manifest with the
/// order. The markers are what the editor loads; the manifest is what the
/// reconciler diffs against.
#[derive(Debug, Clone)]
pub struct ActivationStore {
    dir: PathBuf,
    id_validator: ThemeIdValidator,
}

impl ActivationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            id_validator: ThemeIdValidator,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    pub fn marker_path(&self, id: &ThemeId) -> PathBuf {
        self.dir.join(format!("{}.{}", id.as_str(), THEME_EXTENSION))
    }

    /// Read the persisted list.
    ///
    /// Falls back to the markers present on disk (sorted) when the manifest
    /// is missing or cannot be parsed. A missing directory is an empty list.
    pub fn read(&self) -> EngineResult<ActivatedThemeList> {
        let manifest_path = self.manifest_path();
        if manifest_path.is_file() {
            let content =
                fs::read_to_string(&manifest_path).map_err(|e| EngineError::io(&manifest_path, e))?;
            match serde_json::from_str::<Manifest>(&content) {
                Ok(manifest) => return Ok(manifest.themes),
                Err(e) => log::warn!(
                    "Ignoring unreadable activation manifest '{}': {e}",
                    manifest_path.display()
                ),
            }
        }

        Ok(self.marker_ids()?.into_iter().collect())
    }

    /// Identifiers of the marker files currently on disk, sorted
    pub fn marker_ids(&self) -> EngineResult<Vec<ThemeId>> {
        if !self.dir.is_dir() {
            return Ok(vec![]);
        }

        let mut ids = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|e| EngineError::io(&self.dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| EngineError::io(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file()
                || path.extension().and_then(|s| s.to_str()) != Some(THEME_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|n| n.to_str()) {
                if self.id_validator.validate(stem).is_ok() {
                    ids.push(ThemeId::new(stem));
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Make the directory match `list` exactly: copy the catalog asset for
    /// every listed theme, delete markers for everything else, then write
    /// the manifest.
    ///
    /// Every listed theme must exist in `catalog`; nothing is touched on
    /// disk if one does not. The activation directory must not be, contain
    /// or lie inside the themes directory, however either path is spelled.
    pub fn write(&self, list: &ActivatedThemeList, catalog: &ThemeCatalog) -> EngineResult<()> {
        for id in list {
            self.id_validator.check(id.as_str())?;
            if !catalog.contains(id) {
                return Err(EngineError::UnknownTheme(id.to_string()));
            }
        }

        fs::create_dir_all(&self.dir).map_err(|e| EngineError::io(&self.dir, e))?;
        self.ensure_separate_from(catalog)?;

        for id in list {
            let source = catalog.asset_path(id);
            let target = self.marker_path(id);
            if same_file(&source, &target) {
                // Copying a file onto itself truncates it
                log::warn!(
                    "Activation marker '{}' is the catalog asset itself; leaving it as is",
                    target.display()
                );
                continue;
            }
            fs::copy(&source, &target).map_err(|e| EngineError::io(&target, e))?;
        }

        let keep: HashSet<&ThemeId> = list.iter().collect();
        for stale in self.marker_ids()? {
            if keep.contains(&stale) {
                continue;
            }
            let path = self.marker_path(&stale);
            fs::remove_file(&path).map_err(|e| EngineError::io(&path, e))?;
            log::debug!("Removed activation marker for '{stale}'");
        }

        self.write_manifest(list)
    }

    fn ensure_separate_from(&self, catalog: &ThemeCatalog) -> EngineResult<()> {
        let activation = fs::canonicalize(&self.dir).map_err(|e| EngineError::io(&self.dir, e))?;
        let Ok(themes) = fs::canonicalize(catalog.themes_dir()) else {
            // No catalog directory, no assets to clobber
            return Ok(());
        };
        if activation.starts_with(&themes) || themes.starts_with(&activation) {
            return Err(EngineError::OverlappingDirectories { activation, themes });
        }
        Ok(())
    }

    fn write_manifest(&self, list: &ActivatedThemeList) -> EngineResult<()> {
        let manifest_path = self.manifest_path();
        let manifest = Manifest {
            version: MANIFEST_VERSION,
            themes: list.clone(),
        };
        let content = serde_json::to_string_pretty(&manifest)
            .map_err(|e| EngineError::serialization(&manifest_path, e))?;

        // Write to a sibling temp file first so a failed write never leaves a
        // truncated manifest behind
        let temp_path = self.dir.join(format!("{MANIFEST_FILE}.tmp"));
        fs::write(&temp_path, content).map_err(|e| EngineError::io(&temp_path, e))?;
        fs::rename(&temp_path, &manifest_path).map_err(|e| EngineError::io(&manifest_path, e))?;
        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
