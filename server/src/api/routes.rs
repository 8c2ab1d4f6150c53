use super::catalog::Catalog;
use log::{error, info};
use seiscore::model::Station;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use warp::{filters::body::BodyDeserializeError, http::StatusCode, Filter, Rejection, Reply};

#[derive(Debug)]
struct CatalogError(String);

impl warp::reject::Reject for CatalogError {}

/// `GET /channels` query; other parameters (such as `level`) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ChannelQuery {
    pub net: Option<String>,
    pub stat: Option<String>,
}

fn reply_with<T: Serialize>(
    operation: &str,
    result: anyhow::Result<Vec<T>>,
) -> Result<warp::reply::Json, Rejection> {
    match result {
        Ok(body) => {
            info!("served {} {} records", body.len(), operation);
            Ok(warp::reply::json(&body))
        }
        Err(err) => {
            error!("{} error: {:#}", operation, err);
            Err(warp::reject::custom(CatalogError(format!(
                "{operation}: {err}"
            ))))
        }
    }
}

pub fn routes(
    catalog: Catalog,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let catalog_filter = warp::any().map(move || catalog.clone());

    let networks_route = warp::path("networks")
        .and(warp::path::end())
        .and(warp::get())
        .and(catalog_filter.clone())
        .and_then(|catalog: Catalog| async move { reply_with("networks", catalog.networks()) });

    let stations_route = warp::path("stations")
        .and(warp::path::end())
        .and(warp::get())
        .and(catalog_filter.clone())
        .and_then(|catalog: Catalog| async move { reply_with("stations", catalog.stations()) });

    let networks_stations_route = warp::path("networks-stations")
        .and(warp::path::end())
        .and(warp::get())
        .and(catalog_filter.clone())
        .and_then(|catalog: Catalog| async move {
            reply_with("networks-stations", catalog.networks_with_stations())
        });

    let channels_route = warp::path("channels")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ChannelQuery>())
        .and(catalog_filter.clone())
        .and_then(|query: ChannelQuery, catalog: Catalog| async move {
            reply_with(
                "channels",
                catalog.channels(query.net.as_deref(), query.stat.as_deref()),
            )
        });

    let working_set_channels_route = warp::path("channels")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(catalog_filter)
        .and_then(|stations: Vec<Station>, catalog: Catalog| async move {
            reply_with("working-set channels", catalog.channels_for(&stations))
        });

    networks_route
        .or(stations_route)
        .or(networks_stations_route)
        .or(channels_route)
        .or(working_set_channels_route)
        .recover(handle_rejection)
}

async fn handle_rejection(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(err) = rejection.find::<CatalogError>() {
        (StatusCode::INTERNAL_SERVER_ERROR, err.0.clone())
    } else if let Some(err) = rejection.find::<BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, err.to_string())
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", rejection))
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({"status": "error", "message": message})),
        status,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::catalog::tests::seeded_catalog;
    use seiscore::model::{FdsnChannel, FdsnNetwork};
    use seiscore::store::{DocumentStore, MemoryAdapter};
    use std::sync::{Arc, RwLock};
    use warp::test::request;

    #[tokio::test]
    async fn get_stations_lists_inventory() {
        let api = routes(seeded_catalog());
        let response = request().method("GET").path("/stations").reply(&api).await;
        assert_eq!(response.status(), StatusCode::OK);
        let stations: Vec<Station> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(stations.len(), 3);
    }

    #[tokio::test]
    async fn get_networks_stations_nests() {
        let api = routes(seeded_catalog());
        let response = request()
            .method("GET")
            .path("/networks-stations")
            .reply(&api)
            .await;
        let networks: Vec<FdsnNetwork> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(networks[1].code, "HL");
        assert_eq!(networks[1].stations.len(), 2);
    }

    #[tokio::test]
    async fn get_channels_honours_query() {
        let api = routes(seeded_catalog());
        let response = request()
            .method("GET")
            .path("/channels?level=0&net=HL&stat=ATH")
            .reply(&api)
            .await;
        let channels: Vec<FdsnChannel> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(channels.len(), 2);
    }

    #[tokio::test]
    async fn post_channels_for_working_set() {
        let api = routes(seeded_catalog());
        let body = json!([
            {"net": "HL", "stat": "KTHA", "lat": 36.26, "lon": 23.06, "selected": true}
        ]);
        let response = request()
            .method("POST")
            .path("/channels?level=0")
            .header("content-type", "application/json")
            .json(&body)
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let channels: Vec<FdsnChannel> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].stat, "KTHA");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let api = routes(seeded_catalog());
        let response = request()
            .method("POST")
            .path("/channels")
            .header("content-type", "application/json")
            .body("{not json")
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_collection_is_server_error() {
        let store = DocumentStore::new("empty.db", MemoryAdapter::new());
        let api = routes(Catalog::new(Arc::new(RwLock::new(store))));
        let response = request().method("GET").path("/stations").reply(&api).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let api = routes(seeded_catalog());
        let response = request().method("GET").path("/events").reply(&api).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
