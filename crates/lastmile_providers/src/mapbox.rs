use std::time::Duration;

use tracing::debug;

use crate::{
    directions::{DirectionsProvider, DirectionsResponse, get_ok_body},
    error::ProviderError,
    profile::ProviderKind,
    route::{RouteQuery, RouteResult},
};

pub const MAPBOX_API_URL: &str = "https://api.mapbox.com";
pub const MAPBOX_DIRECTIONS_PATH: &str = "/directions/v5/mapbox/";

pub struct MapboxDirectionsParams {
    pub access_token: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

/// Primary provider. Requires an access token; without one every call fails
/// with [`ProviderError::MissingCredential`] before touching the network.
pub struct MapboxDirections {
    client: reqwest::Client,
    access_token: Option<String>,
    base_url: String,
}

impl MapboxDirections {
    pub fn new(params: MapboxDirectionsParams) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Ok(Self::with_client(client, params.access_token, params.base_url))
    }

    pub fn with_client(
        client: reqwest::Client,
        access_token: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            access_token: access_token.filter(|token| !token.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl DirectionsProvider for MapboxDirections {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mapbox
    }

    async fn fetch(&self, query: &RouteQuery) -> RouteResult {
        let Some(access_token) = self.access_token.as_deref() else {
            debug!("Mapbox: no access token configured, skipping request");
            return Err(ProviderError::MissingCredential);
        };

        let url = format!(
            "{}{}{}/{}",
            self.base_url,
            MAPBOX_DIRECTIONS_PATH,
            self.kind().profile_id(query.profile()),
            query.coordinates_path()
        );

        debug!(
            "Mapbox: requesting {} route through {} points",
            query.profile(),
            query.points().len()
        );

        let request = self.client.get(url).query(&[
            ("geometries", "geojson"),
            ("overview", "full"),
            ("access_token", access_token),
        ]);

        let body = get_ok_body(request, self.kind()).await?;
        let response: DirectionsResponse = serde_json::from_str(&body)?;

        response.into_route(false)
    }
}
