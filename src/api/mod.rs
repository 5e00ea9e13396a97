//! Typed client for the portfolio REST API.
//!
//! Every response is decoded here, once: a non-2xx status becomes
//! [`ApiError::Server`], a 2xx body with `success == false` becomes
//! [`ApiError::Application`] carrying the server message, and everything else
//! comes back as a typed payload. Callers never see raw JSON.

mod error;
pub mod types;

pub use error::ApiError;

use reqwest::header::{HeaderName, HeaderValue, COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::ServerConfig;
use crate::upload::PendingFile;
use types::{Ack, Category, DocumentItem, DocumentListResponse, ItemDetails, ItemResponse,
    Portfolio, PortfolioListResponse};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session_cookie: Option<HeaderValue>,
    csrf: Option<(HeaderName, HeaderValue)>,
}

impl ApiClient {
    pub fn new(config: &ServerConfig) -> Self {
        let session_cookie = config
            .session_cookie
            .as_deref()
            .and_then(|cookie| HeaderValue::from_str(cookie).ok());

        // A missing CSRF token degrades to a warning, not a hard failure;
        // the server decides whether to accept unauthenticated mutations.
        let csrf = match &config.csrf_token {
            Some(token) => {
                let name = HeaderName::from_bytes(config.csrf_header.as_bytes()).ok();
                let value = HeaderValue::from_str(token).ok();
                match (name, value) {
                    (Some(name), Some(value)) => Some((name, value)),
                    _ => {
                        warn!("invalid CSRF header configuration, mutating requests will omit it");
                        None
                    }
                }
            }
            None => {
                warn!("no CSRF token configured, mutating requests will omit it");
                None
            }
        };

        Self {
            http: Client::new(),
            base_url: config.base_url.clone(),
            session_cookie,
            csrf,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mutating = method != Method::GET;
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(COOKIE, cookie.clone());
        }
        if mutating {
            if let Some((name, value)) = &self.csrf {
                builder = builder.header(name.clone(), value.clone());
            }
        }
        builder
    }

    async fn fetch_portfolios(&self, path: &str, fallback: &str) -> Result<Vec<Portfolio>, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        let envelope: PortfolioListResponse = decode(response).await?;
        if envelope.success {
            Ok(envelope.portfolios)
        } else {
            Err(reject(envelope.message, fallback))
        }
    }

    pub async fn my_portfolios(&self) -> Result<Vec<Portfolio>, ApiError> {
        self.fetch_portfolios("/portfolio/api/my-portfolios", "Failed to load portfolios")
            .await
    }

    pub async fn department_portfolios(&self) -> Result<Vec<Portfolio>, ApiError> {
        self.fetch_portfolios(
            "/portfolio/api/department-portfolios",
            "Failed to load department portfolios",
        )
        .await
    }

    pub async fn college_portfolios(&self) -> Result<Vec<Portfolio>, ApiError> {
        self.fetch_portfolios(
            "/portfolio/api/college-portfolios",
            "Failed to load college portfolios",
        )
        .await
    }

    pub async fn user_documents(&self) -> Result<Vec<DocumentItem>, ApiError> {
        let response = self
            .request(Method::GET, "/portfolio/api/user-documents")
            .send()
            .await?;
        let envelope: DocumentListResponse = decode(response).await?;
        if envelope.success {
            Ok(envelope.documents)
        } else {
            Err(reject(envelope.message, "Failed to load documents"))
        }
    }

    pub async fn item_details(&self, item_id: i64) -> Result<ItemDetails, ApiError> {
        let response = self
            .request(Method::GET, &format!("/portfolio/item/{item_id}"))
            .send()
            .await?;
        let envelope: ItemResponse = decode(response).await?;
        match envelope.item {
            Some(item) if envelope.success => Ok(item),
            _ => Err(reject(envelope.message, "Failed to load document details")),
        }
    }

    pub async fn create_portfolio(
        &self,
        name: &str,
        description: &str,
        portfolio_type: &str,
    ) -> Result<String, ApiError> {
        let response = self
            .request(Method::POST, "/portfolio/create")
            .form(&[("name", name), ("description", description), ("type", portfolio_type)])
            .send()
            .await?;
        self.ack(response, "Portfolio created successfully!", "Failed to create portfolio")
            .await
    }

    pub async fn delete_portfolio(&self, portfolio_id: i64) -> Result<String, ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/portfolio/{portfolio_id}"))
            .send()
            .await?;
        self.ack(response, "Portfolio deleted successfully!", "Failed to delete portfolio")
            .await
    }

    pub async fn delete_document(&self, document_id: i64) -> Result<String, ApiError> {
        let response = self
            .request(
                Method::DELETE,
                &format!("/portfolio/api/delete-document/{document_id}"),
            )
            .send()
            .await?;
        self.ack(response, "Document deleted successfully", "Failed to delete document")
            .await
    }

    pub async fn delete_item(&self, item_id: i64) -> Result<String, ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/portfolio/delete-item/{item_id}"))
            .send()
            .await?;
        self.ack(response, "Item deleted successfully", "Failed to delete item")
            .await
    }

    /// One multipart request carrying the whole batch plus the target
    /// portfolio and, inside a sub-folder context, the folder.
    pub async fn upload_to_portfolio(
        &self,
        files: &[PendingFile],
        portfolio_id: i64,
        folder_id: Option<i64>,
    ) -> Result<String, ApiError> {
        let mut form = Form::new();
        for file in files {
            form = form.part("file", file_part(file)?);
        }
        form = form.text("portfolioId", portfolio_id.to_string());
        if let Some(folder_id) = folder_id {
            form = form.text("folderId", folder_id.to_string());
        }

        let response = self
            .request(Method::POST, "/portfolio/upload")
            .multipart(form)
            .send()
            .await?;
        self.ack(response, "Files uploaded successfully!", "Upload failed")
            .await
    }

    /// One file per request, tagged with its category.
    pub async fn upload_to_documents(
        &self,
        file: &PendingFile,
        category: Category,
    ) -> Result<(), ApiError> {
        let form = Form::new()
            .part("file", file_part(file)?)
            .text("category", category.as_str());

        let response = self
            .request(Method::POST, "/portfolio/api/upload-to-documents")
            .multipart(form)
            .send()
            .await?;
        let envelope: Ack = decode(response).await?;
        if envelope.success {
            Ok(())
        } else {
            Err(reject(envelope.message, "Upload failed"))
        }
    }

    /// Downloads are binary and handed to the system browser, so the client
    /// only ever needs the URL.
    pub fn download_url(&self, item_id: i64) -> String {
        format!("{}/portfolio/download/{item_id}", self.base_url)
    }

    async fn ack(
        &self,
        response: Response,
        success_fallback: &str,
        failure_fallback: &str,
    ) -> Result<String, ApiError> {
        let envelope: Ack = decode(response).await?;
        if envelope.success {
            Ok(envelope
                .message
                .unwrap_or_else(|| success_fallback.to_string()))
        } else {
            Err(reject(envelope.message, failure_fallback))
        }
    }
}

fn file_part(file: &PendingFile) -> Result<Part, ApiError> {
    Ok(Part::bytes(file.bytes.to_vec())
        .file_name(file.name.clone())
        .mime_str(&file.mime_type)?)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}

fn reject(message: Option<String>, fallback: &str) -> ApiError {
    ApiError::Application(message.unwrap_or_else(|| fallback.to_string()))
}
