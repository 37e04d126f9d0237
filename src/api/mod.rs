//! Remote data client for the REST Countries API.
//!
//! - [`query`]: The supported query dimensions and their endpoint paths
//! - [`client`]: URL building and response decoding

pub mod client;
pub mod query;

pub use client::{CountryClient, FetchRequest, DEFAULT_BASE_URL, DEFAULT_LIST_FIELDS};
pub use query::CountryQuery;
