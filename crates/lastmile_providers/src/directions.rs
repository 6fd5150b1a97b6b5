use std::future::Future;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::ProviderError,
    geo_point::GeoPoint,
    profile::ProviderKind,
    route::{Route, RouteQuery, RouteResult},
};

/// One external directions API. Implementations make at most one request per
/// call and never retry; falling back is the caller's job.
pub trait DirectionsProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn fetch(&self, query: &RouteQuery) -> impl Future<Output = RouteResult> + Send;
}

/// Response envelope shared by the Mapbox and OSRM route services.
#[derive(Deserialize, Debug)]
pub(crate) struct DirectionsResponse {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DirectionsRoute {
    pub geometry: LineGeometry,

    /// Meters
    #[serde(default)]
    pub distance: f64,

    /// Seconds
    #[serde(default)]
    pub duration: f64,
}

#[derive(Deserialize, Debug)]
pub(crate) struct LineGeometry {
    /// `[lon, lat]` pairs
    pub coordinates: Vec<[f64; 2]>,
}

impl DirectionsResponse {
    /// Turns a 200 response into a route, or the provider's own reason for not
    /// having one. OSRM additionally flags success with `code: "Ok"`.
    pub(crate) fn into_route(self, require_ok_code: bool) -> RouteResult {
        let no_route = |message: Option<String>| ProviderError::NoRoute {
            message: message.unwrap_or_else(|| "no routes".to_string()),
        };

        if require_ok_code && self.code.as_deref() != Some("Ok") {
            return Err(no_route(self.message.or(self.code)));
        }

        let Some(route) = self.routes.into_iter().next() else {
            return Err(no_route(self.message));
        };

        let geometry = route
            .geometry
            .coordinates
            .into_iter()
            .map(GeoPoint::from_lon_lat)
            .collect();

        Ok(Route::from_meters_seconds(
            geometry,
            route.distance,
            route.duration,
        ))
    }
}

/// Sends a GET and returns the body of a 200 response.
pub(crate) async fn get_ok_body(
    request: reqwest::RequestBuilder,
    provider: ProviderKind,
) -> Result<String, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    debug!("{}: HTTP {}", provider, status.as_u16());

    if status != StatusCode::OK {
        return Err(ProviderError::http(status.as_u16(), &text));
    }

    Ok(text)
}
