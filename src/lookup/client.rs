//! reqwest-backed client for the number record API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{LookupApi, LookupRecord};
use crate::constants::LOOKUP_TIMEOUT_SECS;
use crate::error::{BotError, BotResult};

pub struct HttpLookupClient {
    http: Client,
    base_url: String,
}

impl HttpLookupClient {
    pub fn new(base_url: String) -> BotResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .build()
            .map_err(|err| BotError::ExternalService(err.to_string()))?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl LookupApi for HttpLookupClient {
    async fn lookup(&self, query: &str) -> BotResult<Vec<LookupRecord>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("number", query)])
            .send()
            .await
            .map_err(|err| BotError::ExternalService(err.to_string()))?
            .error_for_status()
            .map_err(|err| BotError::ExternalService(err.to_string()))?;
        let records = response
            .json::<Vec<LookupRecord>>()
            .await
            .map_err(|err| BotError::ExternalService(err.to_string()))?;
        Ok(records)
    }
}
