use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::{
    catalog::{Catalog, build_client, deezer, error::CatalogError},
    domain::track::Track,
};

/// Public relay that fetches the wrapped URL on our behalf. The full
/// Deezer search URL travels encoded inside the `url` parameter.
pub const RELAY_URL: &str = "https://api.allorigins.win/raw";

pub fn relay_search_url(query: &str, limit: u32) -> Result<Url, url::ParseError> {
    let inner = deezer::search_url(deezer::DEEZER_SEARCH_URL, query, limit)?;
    Url::parse_with_params(RELAY_URL, &[("url", inner.as_str())])
}

pub struct RelayCatalog {
    http: Client,
}

impl RelayCatalog {
    pub fn new(timeout: Duration) -> Result<Self, CatalogError> {
        Ok(Self {
            http: build_client(timeout)?,
        })
    }
}

impl Catalog for RelayCatalog {
    fn search(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let url = relay_search_url(query, limit)?;

        let response = self.http.get(url).send()?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        deezer::parse_search_body(&response.text()?, limit)
    }
}
