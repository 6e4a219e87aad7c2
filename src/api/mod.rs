//! Operations API client.
//!
//! [`Backend`] is the seam between screens and the network. [`HttpBackend`]
//! talks to the real REST API; tests substitute an in-memory fake.

pub mod error;
pub mod http;
#[cfg(test)]
pub(crate) mod memory;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::types::{Customer, CustomerStatus, Invoice, InvoiceStatus, RecordId, location_wire};

pub use http::HttpBackend;

static DIGITS_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("phone regex should be valid"));

/// Server-side search criterion. Exactly one query parameter is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    Phone(String),
    Name(String),
}

impl SearchFilter {
    /// Classify free text: digits only is a phone number, anything else a
    /// name. Blank input yields `None`.
    pub fn classify(query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if DIGITS_ONLY.is_match(query) {
            Some(SearchFilter::Phone(query.to_string()))
        } else {
            Some(SearchFilter::Name(query.to_string()))
        }
    }

    /// The single `(name, value)` query parameter for this filter
    pub fn query_pair(&self) -> (&'static str, &str) {
        match self {
            SearchFilter::Phone(phone) => ("phone", phone),
            SearchFilter::Name(name) => ("name", name),
        }
    }
}

/// Body of `POST /customers` and `PUT /customers/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub gender: Option<String>,
    pub county: Option<String>,
    pub town: Option<String>,
    #[serde(with = "location_wire")]
    pub location: Option<crate::types::Location>,
    pub category: Option<String>,
    pub monthly_charge: f64,
    pub status: CustomerStatus,
}

/// Query of `GET /invoices/all`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoicePage {
    pub status: InvoiceStatus,
    pub offset: usize,
    pub limit: usize,
}

/// Common interface for the operations API
pub trait Backend: Send + Sync {
    /// `GET /customers`
    fn list_customers(&self) -> impl std::future::Future<Output = Result<Vec<Customer>>> + Send;

    /// `GET /search-customers?phone=|name=`
    fn search_customers(
        &self,
        filter: &SearchFilter,
    ) -> impl std::future::Future<Output = Result<Vec<Customer>>> + Send;

    /// `POST /customers`
    fn create_customer(
        &self,
        payload: &CustomerPayload,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// `PUT /customers/{id}`
    fn update_customer(
        &self,
        id: &RecordId,
        payload: &CustomerPayload,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// `GET /invoices/all?status=&offset=&limit=`
    fn list_invoices(
        &self,
        page: InvoicePage,
    ) -> impl std::future::Future<Output = Result<Vec<Invoice>>> + Send;

    /// `GET /invoices/search?phone=|name=`
    fn search_invoices(
        &self,
        filter: &SearchFilter,
    ) -> impl std::future::Future<Output = Result<Vec<Invoice>>> + Send;
}
