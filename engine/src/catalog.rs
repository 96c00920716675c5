use crate::error::{EngineError, EngineResult};
use crate::types::{ActivatedThemeList, PickItem, ThemeId};
use crate::validation::{ThemeIdValidator, Validator};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of bundled theme assets
pub const THEME_EXTENSION: &str = "json";

/// Read-only view over the bundled themes directory.
///
/// Every `<id>.json` file directly inside the directory is a catalog entry.
/// The listing operations never fail: an unreadable directory is logged and
/// treated as an empty catalog. [`ThemeCatalog::scan`] reports the error.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes_dir: PathBuf,
    id_validator: ThemeIdValidator,
}

impl ThemeCatalog {
    pub fn new(themes_dir: impl Into<PathBuf>) -> Self {
        Self {
            themes_dir: themes_dir.into(),
            id_validator: ThemeIdValidator,
        }
    }

    pub fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    /// Path of the asset backing `id`, whether or not it exists
    pub fn asset_path(&self, id: &ThemeId) -> PathBuf {
        self.themes_dir
            .join(format!("{}.{}", id.as_str(), THEME_EXTENSION))
    }

    pub fn contains(&self, id: &ThemeId) -> bool {
        self.id_validator.validate(id.as_str()).is_ok() && self.asset_path(id).is_file()
    }

    /// Every theme in the catalog, sorted by identifier
    pub fn read_existing_themes(&self) -> Vec<ThemeId> {
        match self.scan() {
            Ok(themes) => themes,
            Err(e) => {
                log::warn!("Treating theme catalog as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Catalog entries not present in `exclude_active`, sorted by identifier
    pub fn list_themes(&self, exclude_active: &HashSet<ThemeId>) -> Vec<ThemeId> {
        self.read_existing_themes()
            .into_iter()
            .filter(|id| !exclude_active.contains(id))
            .collect()
    }

    /// Catalog entries that are in `active`, in the list's order.
    ///
    /// This is the inverted filter used when picking themes to deactivate.
    pub fn list_active(&self, active: &ActivatedThemeList) -> Vec<ThemeId> {
        let existing: HashSet<ThemeId> = self.read_existing_themes().into_iter().collect();
        active
            .iter()
            .filter(|id| existing.contains(*id))
            .cloned()
            .collect()
    }

    /// Picker entries for `ids`, pre-selecting the ones in `picked`
    pub fn pick_items(&self, ids: &[ThemeId], picked: &HashSet<ThemeId>) -> Vec<PickItem> {
        ids.iter()
            .map(|id| PickItem::for_theme(id.clone(), picked.contains(id)))
            .collect()
    }

    /// Every theme in the catalog, sorted, or the error that stopped the
    /// directory listing. A missing directory is an empty catalog.
    pub fn scan(&self) -> EngineResult<Vec<ThemeId>> {
        if !self.themes_dir.exists() {
            log::debug!(
                "Themes directory '{}' does not exist",
                self.themes_dir.display()
            );
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&self.themes_dir)
            .map_err(|e| EngineError::io(&self.themes_dir, e))?;

        let mut themes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| EngineError::io(&self.themes_dir, e))?;
            let path = entry.path();

            if !path.is_file()
                || path.extension().and_then(|s| s.to_str()) != Some(THEME_EXTENSION)
            {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|n| n.to_str()) else {
                continue;
            };

            match self.id_validator.validate(stem) {
                Ok(()) => themes.push(ThemeId::new(stem)),
                Err(e) => log::warn!(
                    "Skipping theme asset '{}': {}",
                    path.display(),
                    e.reason()
                ),
            }
        }

        themes.sort();
        log::debug!(
            "Discovered {} themes in '{}'",
            themes.len(),
            self.themes_dir.display()
        );
        Ok(themes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog_with(names: &[&str]) -> (TempDir, ThemeCatalog) {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        let catalog = ThemeCatalog::new(dir.path());
        (dir, catalog)
    }

    #[test]
    fn test_lists_json_assets_sorted() {
        let (_dir, catalog) =
            catalog_with(&["base16-ocean.json", "base16-eighties.json", "README.md"]);
        assert_eq!(
            catalog.read_existing_themes(),
            vec![ThemeId::new("base16-eighties"), ThemeId::new("base16-ocean")]
        );
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let catalog = ThemeCatalog::new("/nonexistent/base16/themes");
        assert!(catalog.read_existing_themes().is_empty());
        assert!(catalog.list_themes(&HashSet::new()).is_empty());
    }

    #[test]
    fn test_list_themes_excludes_active() {
        let (_dir, catalog) = catalog_with(&["a.json", "b.json", "c.json"]);
        let exclude: HashSet<ThemeId> = [ThemeId::new("a")].into_iter().collect();
        let listed = catalog.list_themes(&exclude);
        assert!(!listed.contains(&ThemeId::new("a")));
        assert_eq!(listed, vec![ThemeId::new("b"), ThemeId::new("c")]);
    }

    #[test]
    fn test_list_active_keeps_list_order_and_drops_unknown() {
        let (_dir, catalog) = catalog_with(&["a.json", "b.json", "c.json"]);
        let active = ActivatedThemeList::from_strings(["c", "ghost", "a"]);
        assert_eq!(
            catalog.list_active(&active),
            vec![ThemeId::new("c"), ThemeId::new("a")]
        );
    }

    #[test]
    fn test_skips_invalid_stems_and_directories() {
        let (dir, catalog) = catalog_with(&["good.json", ".hidden.json", "with space.json"]);
        fs::create_dir(dir.path().join("nested.json")).unwrap();
        assert_eq!(catalog.read_existing_themes(), vec![ThemeId::new("good")]);
    }

    #[test]
    fn test_contains() {
        let (_dir, catalog) = catalog_with(&["a.json"]);
        assert!(catalog.contains(&ThemeId::new("a")));
        assert!(!catalog.contains(&ThemeId::new("b")));
        assert!(!catalog.contains(&ThemeId::new("../a")));
    }

    #[test]
    fn test_scan_reports_unreadable_directory() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("themes");
        fs::write(&not_a_dir, "").unwrap();
        let catalog = ThemeCatalog::new(&not_a_dir);

        let error = catalog.scan().unwrap_err();
        assert!(error.is_io());
        assert!(catalog.read_existing_themes().is_empty());
    }
}
