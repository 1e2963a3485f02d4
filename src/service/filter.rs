//! Search and bucket filtering for the directory and resource library.
//!
//! Search is a permissive case-insensitive substring match ORed across the
//! text fields of a record; the type/category bucket is ANDed on top. Output
//! always preserves input order.

use crate::db::models::{DirectoryEntry, Resource};
use crate::types::directory::ResourceTab;

/// Type filter value that matches every directory entry.
pub const ALL_TYPES: &str = "all";

/// Search term and type bucket for the directory page.
#[derive(Debug, Clone)]
pub struct DirectoryFilter {
    needle: String,
    type_filter: String,
}

impl DirectoryFilter {
    pub fn new(search_term: &str, type_filter: &str) -> Self {
        Self {
            needle: search_term.to_lowercase(),
            type_filter: type_filter.to_string(),
        }
    }

    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        self.matches_search(entry) && self.matches_type(entry)
    }

    fn matches_search(&self, entry: &DirectoryEntry) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        let hit = |text: &str| text.to_lowercase().contains(&self.needle);
        hit(entry.name.as_str())
            || hit(entry.entry_type.as_str())
            || hit(entry.location.as_str())
            || entry.tags.iter().any(|tag| hit(tag.as_str()))
    }

    // exact and case-sensitive, unlike search
    fn matches_type(&self, entry: &DirectoryEntry) -> bool {
        self.type_filter == ALL_TYPES || self.type_filter == entry.entry_type.as_str()
    }
}

/// Search term and tab for the resource library.
#[derive(Debug, Clone)]
pub struct ResourceFilter {
    needle: String,
    tab: ResourceTab,
}

impl ResourceFilter {
    pub fn new(search_term: &str, tab: ResourceTab) -> Self {
        Self {
            needle: search_term.to_lowercase(),
            tab,
        }
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        let search_hit = self.needle.is_empty() || {
            let hit = |text: &str| text.to_lowercase().contains(&self.needle);
            hit(resource.title.as_str())
                || hit(resource.description.as_str())
                || hit(resource.category.as_str())
        };
        let tab_hit = match self.tab.category() {
            None => true,
            Some(category) => resource.category == category,
        };
        search_hit && tab_hit
    }
}

pub fn filter_directory_entries<'a>(
    entries: &'a [DirectoryEntry],
    search_term: &str,
    type_filter: &str,
) -> Vec<&'a DirectoryEntry> {
    let filter = DirectoryFilter::new(search_term, type_filter);
    entries.iter().filter(|e| filter.matches(e)).collect()
}

pub fn filter_resources<'a>(
    resources: &'a [Resource],
    search_term: &str,
    tab: ResourceTab,
) -> Vec<&'a Resource> {
    let filter = ResourceFilter::new(search_term, tab);
    resources.iter().filter(|r| filter.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::directory::{BgColor, EntryType};

    fn entry(id: i64, name: &str, entry_type: EntryType, location: &str, tags: &[&str]) -> DirectoryEntry {
        DirectoryEntry {
            id,
            name: name.to_string(),
            entry_type,
            location: location.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            initials: name.chars().take(2).collect(),
            bg_color: BgColor::Secondary,
        }
    }

    fn resource(id: i64, title: &str, description: &str, category: &str) -> Resource {
        Resource {
            id,
            title: title.to_string(),
            description: description.to_string(),
            image_url: "/img/r.png".to_string(),
            category: category.to_string(),
            date: "May 2024".to_string(),
            download_link: None,
            access_link: Some("https://example.com".to_string()),
        }
    }

    fn scenario() -> Vec<DirectoryEntry> {
        vec![
            entry(1, "Harmony Records", EntryType::RecordLabel, "Nashville", &["Rock"]),
            entry(2, "Sofia Rodriguez", EntryType::Artist, "Madrid", &["Pop"]),
        ]
    }

    fn names(found: &[&DirectoryEntry]) -> Vec<String> {
        found.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn search_matches_tags_case_insensitively() {
        let entries = scenario();
        let found = filter_directory_entries(&entries, "rock", ALL_TYPES);
        assert_eq!(names(&found), vec!["Harmony Records"]);
    }

    #[test]
    fn type_filter_selects_exact_bucket() {
        let entries = scenario();
        let found = filter_directory_entries(&entries, "", "Artist");
        assert_eq!(names(&found), vec!["Sofia Rodriguez"]);
        assert!(filter_directory_entries(&entries, "", "artist").is_empty());
    }

    #[test]
    fn search_and_type_are_combined() {
        let entries = scenario();
        assert!(filter_directory_entries(&entries, "madrid", "Record Label").is_empty());
    }

    #[test]
    fn empty_search_and_all_return_everything_in_order() {
        let entries = scenario();
        let found = filter_directory_entries(&entries, "", ALL_TYPES);
        assert_eq!(names(&found), vec!["Harmony Records", "Sofia Rodriguez"]);
    }

    #[test]
    fn search_covers_name_type_and_location() {
        let entries = scenario();
        assert_eq!(filter_directory_entries(&entries, "HARMONY", ALL_TYPES).len(), 1);
        assert_eq!(filter_directory_entries(&entries, "label", ALL_TYPES).len(), 1);
        assert_eq!(filter_directory_entries(&entries, "ville", ALL_TYPES).len(), 1);
        assert!(filter_directory_entries(&entries, "jazz", ALL_TYPES).is_empty());
    }

    #[test]
    fn tag_order_does_not_affect_matching() {
        let a = entry(1, "Beat Lab", EntryType::MusicDistributor, "Berlin", &["Techno", "House"]);
        let b = entry(1, "Beat Lab", EntryType::MusicDistributor, "Berlin", &["House", "Techno"]);
        for term in ["techno", "house", "hou"] {
            let filter = DirectoryFilter::new(term, ALL_TYPES);
            assert_eq!(filter.matches(&a), filter.matches(&b));
        }
    }

    #[test]
    fn single_entry_predicate_matches_definition() {
        let e = entry(7, "Northern Songs", EntryType::PublishingAgency, "London", &["Catalog", "Sync"]);
        let terms = ["", "north", "SONGS", "publishing", "agency", "lond", "sync", "cat", "xyz", " "];
        for term in terms {
            let t = term.to_lowercase();
            let expected = t.is_empty()
                || e.name.to_lowercase().contains(&t)
                || e.entry_type.as_str().to_lowercase().contains(&t)
                || e.location.to_lowercase().contains(&t)
                || e.tags.iter().any(|tag| tag.to_lowercase().contains(&t));
            let found = filter_directory_entries(std::slice::from_ref(&e), term, ALL_TYPES);
            assert_eq!(found.len() == 1, expected, "term {term:?}");
        }
        for ty in EntryType::ALL {
            let found = filter_directory_entries(std::slice::from_ref(&e), "", ty.as_str());
            assert_eq!(found.len() == 1, ty == e.entry_type);
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut entries = scenario();
        entries.push(entry(3, "Rocket Distro", EntryType::MusicDistributor, "Austin", &["Indie"]));
        entries.push(entry(4, "Rosa Vega", EntryType::Artist, "Bogotá", &["Rock", "Latin"]));

        let once: Vec<DirectoryEntry> = filter_directory_entries(&entries, "ro", ALL_TYPES)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<DirectoryEntry> = filter_directory_entries(&once, "ro", ALL_TYPES)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(once, twice);
        assert_eq!(once.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn resource_tabs_and_search() {
        let resources = vec![
            resource(1, "Royalty Guide", "How royalties flow", "Guide"),
            resource(2, "Rights Checker", "Audit your catalog", "Tool"),
            resource(3, "Split Sheet", "A royalty split template", "Template"),
        ];

        let all = filter_resources(&resources, "", ResourceTab::All);
        assert_eq!(all.len(), 3);

        let guides = filter_resources(&resources, "", ResourceTab::Guides);
        assert_eq!(guides.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);

        let royalty = filter_resources(&resources, "ROYALT", ResourceTab::All);
        assert_eq!(royalty.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);

        let by_category = filter_resources(&resources, "tool", ResourceTab::All);
        assert_eq!(by_category.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);

        assert!(filter_resources(&resources, "royalty", ResourceTab::Tools).is_empty());
    }
}
