//! Name search for folder listings.

use folio_entity::Folder;

/// Folders whose name contains `query`, ignoring case. Surrounding
/// whitespace in `query` is trimmed first, so a blank query matches
/// everything.
pub fn filter_by_name(folders: &[Folder], query: &str) -> Vec<Folder> {
    let needle = query.trim().to_lowercase();
    folders
        .iter()
        .filter(|f| needle.is_empty() || f.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use folio_core::types::FolderId;

    fn folders(names: &[&str]) -> Vec<Folder> {
        names
            .iter()
            .map(|name| Folder {
                id: FolderId::new(name.to_lowercase()),
                name: name.to_string(),
                created_at: Utc::now(),
                images: Vec::new(),
            })
            .collect()
    }

    fn names(folders: &[Folder]) -> Vec<&str> {
        folders.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let all = folders(&["Alpha", "beta", "Gamma"]);
        assert_eq!(names(&filter_by_name(&all, "a")), vec!["Alpha", "beta", "Gamma"]);
        assert_eq!(names(&filter_by_name(&all, "alp")), vec!["Alpha"]);
        assert_eq!(names(&filter_by_name(&all, "GAM")), vec!["Gamma"]);
        assert!(filter_by_name(&all, "zeta").is_empty());
    }

    #[test]
    fn test_blank_query_keeps_all() {
        let all = folders(&["Alpha", "beta"]);
        assert_eq!(filter_by_name(&all, "  ").len(), 2);
    }

    #[test]
    fn test_padded_query_is_trimmed() {
        let all = folders(&["Alpha", "beta"]);
        assert_eq!(names(&filter_by_name(&all, "  alp ")), vec!["Alpha"]);
    }
}
