use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};

pub const EMPLOYEES_PATH: &str = "/api/dsm44/empleados";

/// Thin GET-only wrapper around `reqwest`. The base URL is read from the
/// shared [`ApiConfig`] each time a URL is built, so a change applies to
/// every request issued afterwards.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn employees_url(&self) -> String {
        format!("{}{EMPLOYEES_PATH}", self.config.base_url())
    }

    /// Dates go into the query string verbatim, slashes included.
    pub fn report_url(
        &self,
        endpoint: &str,
        employee_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> String {
        format!(
            "{}{endpoint}?id_empleado={employee_id}&fechaInicio={start_date}&fechaFin={end_date}",
            self.employees_url()
        )
    }

    /// Next-page locators are usually absolute; relative ones resolve against
    /// the listing endpoint.
    pub fn resolve_locator(&self, locator: &str) -> String {
        match Url::parse(&self.employees_url()).and_then(|base| base.join(locator)) {
            Ok(url) => url.to_string(),
            Err(_) => locator.to_string(),
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status,
                url: url.to_string(),
            });
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| AppError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
