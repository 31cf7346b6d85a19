pub mod deezer;
pub mod error;
pub mod rapidapi;
pub mod relay;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use reqwest::blocking::Client;

use crate::{
    config::{API_KEY_ENV, CatalogConfig, Strategy},
    domain::track::Track,
};

use self::{error::CatalogError, rapidapi::RapidApiCatalog, relay::RelayCatalog};

/// A searchable music catalog. Implementations own their transport;
/// the controller only sees normalized tracks. Shared as
/// `Arc<dyn Catalog>` across server threads, with requests possibly
/// in flight concurrently.
pub trait Catalog: Send + Sync {
    /// `query` is already trimmed and non-empty; at most `limit`
    /// tracks come back.
    fn search(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError>;
}

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_client(timeout: Duration) -> Result<Client, CatalogError> {
    Ok(Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

/// Builds the one strategy the config selects. There is no runtime
/// failover between strategies.
pub fn from_config(cfg: &CatalogConfig) -> anyhow::Result<Arc<dyn Catalog>> {
    match cfg.strategy {
        Strategy::Rapidapi => {
            let api_key = cfg.resolved_api_key().with_context(|| {
                format!("rapidapi strategy needs an api key (config `api_key` or ${API_KEY_ENV})")
            })?;

            Ok(Arc::new(RapidApiCatalog::new(api_key, cfg.timeout())?))
        }

        Strategy::Relay => Ok(Arc::new(RelayCatalog::new(cfg.timeout())?)),
    }
}
