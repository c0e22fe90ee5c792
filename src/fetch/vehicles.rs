use futures::future::BoxFuture;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{AppError, Context};

use super::decode::decode_results;
use super::request::{makes_url, models_url};
use super::FetchResult;

/// A vehicle manufacturer as listed by vPIC.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Make {
    #[serde(rename = "MakeID", alias = "MakeId", alias = "Make_ID")]
    pub id: i64,
    #[serde(rename = "MakeName", alias = "Make_Name")]
    pub name: String,
}

/// One product line returned for a `(make, year)` query.
///
/// The model year is not part of the record; screens take it from the route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VehicleModel {
    #[serde(rename = "ModelName", alias = "Model_Name")]
    pub model_name: String,
    #[serde(rename = "MakeName", alias = "Make_Name")]
    pub make_name: String,
    #[serde(rename = "Model_ID", alias = "ModelID", default)]
    pub model_id: Option<i64>,
}

/// Read-only access to the two vPIC endpoints the screens consume.
pub trait VehicleSource: Send + Sync {
    fn fetch_makes(&self) -> BoxFuture<'_, FetchResult<Vec<Make>>>;

    fn fetch_models<'a>(
        &'a self,
        make: &'a str,
        year: i32,
    ) -> BoxFuture<'a, FetchResult<Vec<VehicleModel>>>;
}

/// HTTP client for the public vPIC API.
pub struct VpicClient {
    api: ApiConfig,
    client: Client,
}

impl VpicClient {
    pub fn new(api: ApiConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(api.timeout)
            .user_agent(api.user_agent.clone())
            .build()
            .context("Failed to construct vPIC HTTP client")?;
        Ok(Self { api, client })
    }

    async fn get_text(&self, url: &str) -> FetchResult<String> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request failed for {url}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    async fn makes(&self) -> FetchResult<Vec<Make>> {
        let url = makes_url(&self.api)?;
        let body = self.get_text(&url).await?;
        let decoded = decode_results::<Make>(&body, "make")?;
        info!(
            "Fetched {} makes for vehicle type `{}` ({} rejected)",
            decoded.items.len(),
            self.api.vehicle_type,
            decoded.rejected
        );
        Ok(decoded.items)
    }

    async fn models(&self, make: &str, year: i32) -> FetchResult<Vec<VehicleModel>> {
        let url = models_url(&self.api, make, year)?;
        let body = self.get_text(&url).await?;
        let decoded = decode_results::<VehicleModel>(&body, "model")?;
        info!(
            "Fetched {} models for {make} {year} ({} rejected)",
            decoded.items.len(),
            decoded.rejected
        );
        Ok(decoded.items)
    }
}

impl VehicleSource for VpicClient {
    fn fetch_makes(&self) -> BoxFuture<'_, FetchResult<Vec<Make>>> {
        Box::pin(self.makes())
    }

    fn fetch_models<'a>(
        &'a self,
        make: &'a str,
        year: i32,
    ) -> BoxFuture<'a, FetchResult<Vec<VehicleModel>>> {
        Box::pin(self.models(make, year))
    }
}
