use std::time::Duration;

use reqwest::blocking::Client;

use crate::{
    catalog::{Catalog, build_client, deezer, error::CatalogError},
    domain::track::Track,
};

/// Deezer mirror hosted on RapidAPI; same wire format as the public
/// endpoint but authenticated per request.
pub const RAPIDAPI_SEARCH_URL: &str = "https://deezerdevs-deezer.p.rapidapi.com/search";
pub const RAPIDAPI_HOST: &str = "deezerdevs-deezer.p.rapidapi.com";

const KEY_HEADER: &str = "X-RapidAPI-Key";
const HOST_HEADER: &str = "X-RapidAPI-Host";

pub struct RapidApiCatalog {
    http: Client,
    api_key: String,
}

impl RapidApiCatalog {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, CatalogError> {
        Ok(Self {
            http: build_client(timeout)?,
            api_key,
        })
    }
}

impl Catalog for RapidApiCatalog {
    fn search(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let url = deezer::search_url(RAPIDAPI_SEARCH_URL, query, limit)?;

        let response = self
            .http
            .get(url)
            .header(KEY_HEADER, self.api_key.as_str())
            .header(HOST_HEADER, RAPIDAPI_HOST)
            .send()?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        deezer::parse_search_body(&response.text()?, limit)
    }
}
