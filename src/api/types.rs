//! DTOs for the portfolio REST API and the response envelopes they arrive in.
//!
//! Server entities are opaque to the client: they are decoded once at the
//! HTTP boundary and never mutated locally.

use serde::Deserialize;

/// Document category tag. Only meaningful for documents-destination items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Archive,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Personal, Category::Work, Category::Archive];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Archive => "archive",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::Archive => "Archive",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub item_count: u32,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub formatted_size: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub name: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

/// Plain `{success, message}` acknowledgement.
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PortfolioListResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub portfolios: Vec<Portfolio>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentListResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub item: Option<ItemDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_document_list_payload() {
        let json = r#"{
            "success": true,
            "documents": [
                {"id": 7, "name": "Report.pdf", "category": "work",
                 "icon": "fas fa-file-pdf", "fileSize": 2048,
                 "formattedSize": "2.00 KB", "uploadedAt": "2025-03-01T10:00:00"}
            ]
        }"#;
        let parsed: DocumentListResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.documents.len(), 1);
        let doc = &parsed.documents[0];
        assert_eq!(doc.name, "Report.pdf");
        assert_eq!(doc.category, Category::Work);
        assert_eq!(doc.file_size, 2048);
    }

    #[test]
    fn parses_portfolio_list_with_missing_optionals() {
        let json = r#"{"success": true, "portfolios": [{"id": 1, "name": "Research"}]}"#;
        let parsed: PortfolioListResponse = serde_json::from_str(json).unwrap();
        let portfolio = &parsed.portfolios[0];
        assert_eq!(portfolio.name, "Research");
        assert_eq!(portfolio.item_count, 0);
        assert!(portfolio.description.is_none());
    }

    #[test]
    fn parses_failure_ack() {
        let json = r#"{"success": false, "message": "Portfolio not found"}"#;
        let parsed: Ack = serde_json::from_str(json).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.message.as_deref(), Some("Portfolio not found"));
    }
}
