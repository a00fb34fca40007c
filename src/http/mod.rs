//! HTTP session, error taxonomy, query building and response
//! normalisation.

mod client;
mod error;
mod pagination;
mod query;

pub use client::ApiClient;
pub use error::ApiError;
pub use pagination::{unwrap_entity, Page};
pub use query::Query;
pub use reqwest::multipart::{Form, Part};
pub use reqwest::Method;
