use crate::environment::Environment;
use anyhow::{anyhow, Context};
use seiscore::model::{EventsModel, FdsnChannel, FdsnEvent, FdsnNetwork, Station, StationEntry};
use seiscore::telemetry::{CallMetrics, LogManager};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the portal service.
///
/// Every call degrades to an empty result on failure; the failure is only
/// logged and counted.
pub struct PortalClient {
    http: reqwest::Client,
    env: Environment,
    logger: LogManager,
    metrics: CallMetrics,
}

impl PortalClient {
    pub fn new(env: Environment, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            env,
            logger: LogManager::new("portal-client"),
            metrics: CallMetrics::new(),
        })
    }

    pub fn metrics(&self) -> &CallMetrics {
        &self.metrics
    }

    /// Logs `fetched(&value)` on success; on failure logs the error and
    /// returns `fallback` instead.
    fn handle_error<T>(
        &self,
        operation: &'static str,
        result: anyhow::Result<T>,
        fallback: T,
        fetched: impl FnOnce(&T) -> String,
    ) -> T {
        match result {
            Ok(value) => {
                self.metrics.record_fetched();
                self.logger.record(&fetched(&value));
                value
            }
            Err(err) => {
                self.metrics.record_failed(operation);
                self.logger.failure(operation, &format!("{err:#}"));
                fallback
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> anyhow::Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("{}: {}", status, text));
        }
        Ok(response.json::<T>().await?)
    }

    pub async fn get_networks(&self) -> Vec<FdsnNetwork> {
        let result = self.fetch(self.http.get(&self.env.networks_url)).await;
        self.handle_error("get_networks", result, Vec::new(), |_| {
            "fetched networks data".into()
        })
    }

    pub async fn get_stations(&self) -> Vec<Station> {
        let result = self.fetch(self.http.get(&self.env.stations_url)).await;
        self.handle_error("get_stations", result, Vec::new(), |_| {
            "fetched stations data".into()
        })
    }

    pub async fn get_networks_stations(&self) -> Vec<FdsnNetwork> {
        let result = self
            .fetch(self.http.get(&self.env.networks_stations_url))
            .await;
        self.handle_error("get_networks_stations", result, Vec::new(), |_| {
            "fetched networks and stations data".into()
        })
    }

    pub async fn get_available_streams(&self, net: Option<&str>, stat: Option<&str>) -> Vec<FdsnChannel> {
        let mut query = vec![("level", "0")];
        if let Some(net) = net {
            query.push(("net", net));
        }
        if let Some(stat) = stat {
            query.push(("stat", stat));
        }
        let request = self.http.get(&self.env.channels_url).query(&query);
        let result = self.fetch(request).await;
        self.handle_error("get_available_streams", result, Vec::new(), |_| {
            format!(
                "fetched streams data: {}/{}",
                net.unwrap_or("*"),
                stat.unwrap_or("*")
            )
        })
    }

    pub async fn get_streams_for_working_set(&self, stations: &[StationEntry]) -> Vec<FdsnChannel> {
        let request = self
            .http
            .post(&self.env.channels_url)
            .query(&[("level", "0")])
            .json(stations);
        let result = self.fetch(request).await;
        self.handle_error("get_streams_for_working_set", result, Vec::new(), |_| {
            "fetched working set streams data".into()
        })
    }

    async fn fetch_events(&self, model: &EventsModel) -> anyhow::Result<Vec<FdsnEvent>> {
        let url = model
            .query_url()
            .ok_or_else(|| anyhow!("no event catalog selected"))?;
        let response = self.http.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        Ok(FdsnEvent::parse_text(&body)?)
    }

    /// Queries the model's FDSN event catalog in text format.
    pub async fn get_events(&self, model: &EventsModel) -> Vec<FdsnEvent> {
        let result = self.fetch_events(model).await;
        self.handle_error("get_events", result, Vec::new(), |events| {
            format!("fetched {} events", events.len())
        })
    }
}
