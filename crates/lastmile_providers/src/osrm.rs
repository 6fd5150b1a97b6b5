use std::time::Duration;

use tracing::debug;

use crate::{
    directions::{DirectionsProvider, DirectionsResponse, get_ok_body},
    profile::ProviderKind,
    route::{RouteQuery, RouteResult},
};

pub const OSRM_PUBLIC_URL: &str = "https://router.project-osrm.org";
pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/";

pub struct OsrmDirectionsParams {
    pub base_url: String,
    pub timeout: Duration,
}

/// Fallback provider, the public OSRM demo server. No credential needed.
pub struct OsrmDirections {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmDirections {
    pub fn new(params: OsrmDirectionsParams) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Ok(Self::with_client(client, params.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl DirectionsProvider for OsrmDirections {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Osrm
    }

    async fn fetch(&self, query: &RouteQuery) -> RouteResult {
        let mut url = self.base_url.clone();
        url.push_str(OSRM_ROUTE_API_PATH);
        url.push_str(self.kind().profile_id(query.profile()));
        url.push('/');
        url.push_str(&query.coordinates_path());

        debug!(
            "OSRM: requesting {} route through {} points",
            query.profile(),
            query.points().len()
        );

        let request = self
            .client
            .get(url)
            .query(&[("overview", "full"), ("geometries", "geojson")]);

        let body = get_ok_body(request, self.kind()).await?;
        let response: DirectionsResponse = serde_json::from_str(&body)?;

        response.into_route(true)
    }
}
