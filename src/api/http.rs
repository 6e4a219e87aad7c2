//! `reqwest` implementation of [`Backend`].
//!
//! # Security Note - Logging
//!
//! The session token is attached per request from the shared [`Session`] and
//! is never written to `tracing` output. Request logs carry method, path and
//! status only.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{OpsError, Result};
use crate::session::Session;
use crate::types::{Customer, Invoice, RecordId};

use super::error::ApiError;
use super::{Backend, CustomerPayload, InvoicePage, SearchFilter};

pub struct HttpBackend {
    client: Client,
    base: Url,
    session: Arc<Session>,
}

impl HttpBackend {
    /// Create a backend from configuration
    ///
    /// Configures the HTTP client with the configured total timeout and a
    /// connect timeout capped at 10s.
    pub fn from_config(config: &Config, session: Arc<Session>) -> Result<Self> {
        Self::new(config.api_url()?, config.request_timeout(), session)
    }

    pub fn new(base: Url, timeout: Duration, session: Arc<Session>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            base,
            session,
        })
    }

    /// Resolve `path` below the base URL, keeping any base path prefix.
    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{}", path.trim_start_matches('/')))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, path, "api request");

        let mut builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(auth) = self.session.authorization() {
            let value = HeaderValue::from_str(&auth)
                .map_err(|_| OpsError::Config("session token is not a valid header".to_string()))?;
            builder = builder.header(header::AUTHORIZATION, value);
        }

        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(path, status = status.as_u16(), "api response");

        if !status.is_success() {
            return Err(ApiError::from_response(response).await.into());
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let builder = self.request(Method::GET, path)?.query(query);
        let response = self.send(builder, path).await?;
        Ok(response.json().await?)
    }

    async fn send_json<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<()> {
        let builder = self.request(method, path)?.json(body);
        self.send(builder, path).await?;
        Ok(())
    }
}

fn search_query(filter: &SearchFilter) -> [(&'static str, String); 1] {
    let (key, value) = filter.query_pair();
    [(key, value.to_string())]
}

impl Backend for HttpBackend {
    async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.get_json("customers", &[]).await
    }

    async fn search_customers(&self, filter: &SearchFilter) -> Result<Vec<Customer>> {
        self.get_json("search-customers", &search_query(filter)).await
    }

    async fn create_customer(&self, payload: &CustomerPayload) -> Result<()> {
        self.send_json(Method::POST, "customers", payload).await
    }

    async fn update_customer(&self, id: &RecordId, payload: &CustomerPayload) -> Result<()> {
        let path = format!("customers/{id}");
        self.send_json(Method::PUT, &path, payload).await
    }

    async fn list_invoices(&self, page: InvoicePage) -> Result<Vec<Invoice>> {
        let query = [
            ("status", page.status.as_str().to_string()),
            ("offset", page.offset.to_string()),
            ("limit", page.limit.to_string()),
        ];
        self.get_json("invoices/all", &query).await
    }

    async fn search_invoices(&self, filter: &SearchFilter) -> Result<Vec<Invoice>> {
        self.get_json("invoices/search", &search_query(filter)).await
    }
}
