use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Display};

/// Name of a theme, unique within the catalog.
///
/// The identifier is the file stem of the theme asset, e.g. `base16-ocean`
/// for `themes/base16-ocean.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeId(String);

impl ThemeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human readable label: drops the `base16-` prefix and title-cases words.
    ///
    /// `base16-gruvbox-dark-hard` becomes `Gruvbox Dark Hard`.
    pub fn display_label(&self) -> String {
        let stem = self.0.strip_prefix("base16-").unwrap_or(&self.0);
        stem.split(['-', '_'])
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ThemeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ThemeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ordered list of activated themes. Order determines applied precedence.
///
/// Never contains the same identifier twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActivatedThemeList(Vec<ThemeId>);

impl ActivatedThemeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from raw configuration strings, keeping the first
    /// occurrence of each identifier.
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values.into_iter().map(ThemeId::new).collect()
    }

    pub fn ids(&self) -> &[ThemeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &ThemeId) -> bool {
        self.0.contains(id)
    }

    /// Append an identifier unless it is already present. Returns whether
    /// the list changed.
    pub fn push(&mut self, id: ThemeId) -> bool {
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Remove an identifier. Returns whether it was present.
    pub fn remove(&mut self, id: &ThemeId) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        before != self.0.len()
    }

    /// Keep only the entries matching the predicate, preserving order
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&ThemeId) -> bool,
    {
        self.0.retain(keep);
    }

    pub fn to_set(&self) -> HashSet<ThemeId> {
        self.0.iter().cloned().collect()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|id| id.as_str().to_string()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ThemeId> {
        self.0.iter()
    }
}

impl FromIterator<ThemeId> for ActivatedThemeList {
    fn from_iter<T: IntoIterator<Item = ThemeId>>(iter: T) -> Self {
        let mut list = Self::new();
        for id in iter {
            if !list.push(id.clone()) {
                log::warn!("Dropping duplicate theme '{id}' from activated list");
            }
        }
        list
    }
}

impl<'de> Deserialize<'de> for ActivatedThemeList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let ids = Vec::<ThemeId>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ActivatedThemeList {
    type Item = &'a ThemeId;
    type IntoIter = std::slice::Iter<'a, ThemeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Delta between the previously persisted list and a new one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub added: usize,
    pub removed: usize,
    /// Minimum number of entries that had to move. Only computed when
    /// nothing was added or removed.
    pub reordered: usize,
    pub equal: bool,
}

impl ReconciliationResult {
    pub fn unchanged() -> Self {
        Self {
            equal: true,
            ..Self::default()
        }
    }

    /// Short description of the change, e.g. `1 Added, 2 Removed`.
    ///
    /// Reordering is only reported when the membership is unchanged.
    /// Returns an empty string for an unchanged result.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.added > 0 {
            parts.push(format!("{} Added", self.added));
        }
        if self.removed > 0 {
            parts.push(format!("{} Removed", self.removed));
        }
        if self.added == 0 && self.removed == 0 && self.reordered > 0 {
            parts.push(format!("{} Ordered", self.reordered));
        }
        parts.join(", ")
    }
}

/// One entry of a multi-select picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub description: String,
    pub id: ThemeId,
    /// Pre-selected when the picker opens
    pub picked: bool,
}

impl PickItem {
    pub fn for_theme(id: ThemeId, picked: bool) -> Self {
        Self {
            label: id.display_label(),
            description: id.as_str().to_string(),
            id,
            picked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        assert_eq!(
            ThemeId::new("base16-gruvbox-dark-hard").display_label(),
            "Gruvbox Dark Hard"
        );
        assert_eq!(ThemeId::new("solarized_light").display_label(), "Solarized Light");
        assert_eq!(ThemeId::new("base16-3024").display_label(), "3024");
    }

    #[test]
    fn test_list_drops_duplicates_keeping_first() {
        let list = ActivatedThemeList::from_strings(["b", "a", "b", "c", "a"]);
        assert_eq!(list.to_strings(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_list_push_and_remove() {
        let mut list = ActivatedThemeList::from_strings(["a"]);
        assert!(list.push(ThemeId::new("b")));
        assert!(!list.push(ThemeId::new("a")));
        assert!(list.remove(&ThemeId::new("a")));
        assert!(!list.remove(&ThemeId::new("a")));
        assert_eq!(list.to_strings(), vec!["b"]);
    }

    #[test]
    fn test_deserialize_deduplicates() {
        let list: ActivatedThemeList = serde_json::from_str(r#"["x","y","x"]"#).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_summary_formats() {
        let added = ReconciliationResult {
            added: 1,
            ..Default::default()
        };
        assert_eq!(added.summary(), "1 Added");

        let mixed = ReconciliationResult {
            added: 1,
            removed: 2,
            ..Default::default()
        };
        assert_eq!(mixed.summary(), "1 Added, 2 Removed");

        let ordered = ReconciliationResult {
            reordered: 1,
            ..Default::default()
        };
        assert_eq!(ordered.summary(), "1 Ordered");

        assert_eq!(ReconciliationResult::unchanged().summary(), "");
    }

    #[test]
    fn test_pick_item_for_theme() {
        let item = PickItem::for_theme(ThemeId::new("base16-ocean"), true);
        assert_eq!(item.label, "Ocean");
        assert_eq!(item.description, "base16-ocean");
        assert!(item.picked);
    }
}
