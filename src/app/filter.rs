//! Client-side search and category filtering for the documents list. Pure
//! show/hide over already-loaded rows, no server round-trip.

use crate::api::types::{Category, DocumentItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

/// A document plus its precomputed lowercase name for substring search.
pub struct DocumentRow {
    pub doc: DocumentItem,
    name_lower: String,
}

impl DocumentRow {
    pub fn new(doc: DocumentItem) -> Self {
        let name_lower = doc.name.to_lowercase();
        Self { doc, name_lower }
    }

    pub fn visible(&self, query: &str, filter: CategoryFilter) -> bool {
        self.matches_search(query) && self.matches_category(filter)
    }

    fn matches_search(&self, query: &str) -> bool {
        query.is_empty() || self.name_lower.contains(&query.to_lowercase())
    }

    fn matches_category(&self, filter: CategoryFilter) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => self.doc.category == category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, category: Category) -> DocumentRow {
        DocumentRow::new(DocumentItem {
            id: 1,
            name: name.to_string(),
            category,
            icon: None,
            file_size: 0,
            formatted_size: None,
            uploaded_at: None,
        })
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let report = row("Report.pdf", Category::Work);
        let invoice = row("invoice.pdf", Category::Work);

        assert!(report.visible("report", CategoryFilter::All));
        assert!(!invoice.visible("report", CategoryFilter::All));
        assert!(invoice.visible("VOICE", CategoryFilter::All));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(row("anything.txt", Category::Personal).visible("", CategoryFilter::All));
    }

    #[test]
    fn category_filter_is_exact_or_all() {
        let archive = row("old.zip", Category::Archive);
        assert!(archive.visible("", CategoryFilter::All));
        assert!(archive.visible("", CategoryFilter::Only(Category::Archive)));
        assert!(!archive.visible("", CategoryFilter::Only(Category::Work)));
    }

    #[test]
    fn search_and_category_combine() {
        let report = row("Report.pdf", Category::Work);
        assert!(report.visible("report", CategoryFilter::Only(Category::Work)));
        assert!(!report.visible("report", CategoryFilter::Only(Category::Personal)));
        assert!(!report.visible("budget", CategoryFilter::Only(Category::Work)));
    }
}
