use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cache::{CachedProvider, Caches},
    config::LastmileConfig,
    directions::DirectionsProvider,
    error::{ProviderError, truncate_chars},
    mapbox::{MapboxDirections, MapboxDirectionsParams},
    osrm::{OsrmDirections, OsrmDirectionsParams},
    profile::ProviderKind,
    route::{Route, RouteQuery},
};

/// Length of a diagnostic message shown to the user.
pub const ATTEMPT_MESSAGE_LIMIT: usize = 180;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderFailure {
    pub provider: ProviderKind,
    pub error: ProviderError,
}

/// A usable route and the provider that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRoute {
    pub provider: ProviderKind,
    pub route: Route,

    /// Set when the primary failed and the secondary answered.
    pub primary_failure: Option<ProviderFailure>,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{} failed ({}), {} failed ({})", .primary.provider, .primary.error, .secondary.provider, .secondary.error)]
pub struct FallbackError {
    pub primary: ProviderFailure,
    pub secondary: ProviderFailure,
}

pub type LegResult = Result<ResolvedRoute, FallbackError>;

/// One row of the routing diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderAttempt {
    pub provider: ProviderKind,
    pub ok: bool,
    pub status: Option<u16>,
    pub message: Option<String>,
}

impl ProviderAttempt {
    fn succeeded(provider: ProviderKind) -> Self {
        Self {
            provider,
            ok: true,
            status: Some(200),
            message: None,
        }
    }

    fn failed(failure: &ProviderFailure) -> Self {
        let message = failure.error.to_string();

        Self {
            provider: failure.provider,
            ok: false,
            status: failure.error.status(),
            message: Some(truncate_chars(&message, ATTEMPT_MESSAGE_LIMIT).to_string()),
        }
    }
}

/// Every provider call made for a leg, in order.
pub fn attempts(result: &LegResult) -> Vec<ProviderAttempt> {
    match result {
        Ok(resolved) => {
            let mut attempts = Vec::with_capacity(2);
            if let Some(failure) = &resolved.primary_failure {
                attempts.push(ProviderAttempt::failed(failure));
            }
            attempts.push(ProviderAttempt::succeeded(resolved.provider));
            attempts
        }
        Err(error) => vec![
            ProviderAttempt::failed(&error.primary),
            ProviderAttempt::failed(&error.secondary),
        ],
    }
}

pub type DefaultRouteClient =
    RouteClient<CachedProvider<MapboxDirections>, CachedProvider<OsrmDirections>>;

/// Two-tier fallback: ask the primary, and only if it fails ask the
/// secondary with the same query. Never more than two calls per route.
pub struct RouteClient<P, S> {
    primary: P,
    secondary: S,
}

impl DefaultRouteClient {
    /// Mapbox first, public OSRM second, both behind the shared route cache.
    pub fn from_config(config: &LastmileConfig, caches: &Caches) -> Result<Self, reqwest::Error> {
        let mapbox = MapboxDirections::new(MapboxDirectionsParams {
            access_token: config.mapbox_token.clone(),
            base_url: config.mapbox_url.clone(),
            timeout: config.request_timeout,
        })?;
        let osrm = OsrmDirections::new(OsrmDirectionsParams {
            base_url: config.osrm_url.clone(),
            timeout: config.request_timeout,
        })?;

        Ok(Self::new(
            CachedProvider::new(mapbox, caches.routes.clone()),
            CachedProvider::new(osrm, caches.routes.clone()),
        ))
    }
}

impl<P, S> RouteClient<P, S>
where
    P: DirectionsProvider,
    S: DirectionsProvider,
{
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    pub async fn route(&self, query: &RouteQuery) -> LegResult {
        let primary_error = match self.primary.fetch(query).await {
            Ok(route) => {
                debug!("{} answered {} route", self.primary.kind(), query.profile());
                return Ok(ResolvedRoute {
                    provider: self.primary.kind(),
                    route,
                    primary_failure: None,
                });
            }
            Err(error) => error,
        };

        warn!(
            "{} failed for {} route ({}), falling back to {}",
            self.primary.kind(),
            query.profile(),
            primary_error,
            self.secondary.kind()
        );

        let primary = ProviderFailure {
            provider: self.primary.kind(),
            error: primary_error,
        };

        match self.secondary.fetch(query).await {
            Ok(route) => Ok(ResolvedRoute {
                provider: self.secondary.kind(),
                route,
                primary_failure: Some(primary),
            }),
            Err(error) => {
                warn!(
                    "{} failed for {} route too ({})",
                    self.secondary.kind(),
                    query.profile(),
                    error
                );

                Err(FallbackError {
                    primary,
                    secondary: ProviderFailure {
                        provider: self.secondary.kind(),
                        error,
                    },
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::TransportKind,
        geo_point::GeoPoint,
        profile::Profile,
        test_utils::{FakeProvider, MockProvider, mock_client},
    };

    const GATE: GeoPoint = GeoPoint::new(37.556844, 127.181887);
    const FRONT: GeoPoint = GeoPoint::new(37.557088, 127.183036);

    fn walking() -> RouteQuery {
        RouteQuery::between(GATE, FRONT, Profile::Walking).unwrap()
    }

    fn timeout() -> ProviderError {
        ProviderError::Transport {
            kind: TransportKind::Timeout,
            message: "operation timed out".to_string(),
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let client = RouteClient::new(
            FakeProvider::minutes(ProviderKind::Mapbox, 3.1),
            FakeProvider::minutes(ProviderKind::Osrm, 9.9),
        );

        let resolved = client.route(&walking()).await.unwrap();

        assert_eq!(resolved.provider, ProviderKind::Mapbox);
        assert_eq!(resolved.route.duration_min, 3.1);
        assert_eq!(resolved.primary_failure, None);
        assert_eq!(client.secondary().calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_fails() {
        for primary_error in [
            ProviderError::MissingCredential,
            timeout(),
            ProviderError::http(500, "boom"),
            ProviderError::NoRoute {
                message: "no routes".to_string(),
            },
        ] {
            let client = RouteClient::new(
                FakeProvider::new(ProviderKind::Mapbox, Err(primary_error.clone())),
                FakeProvider::minutes(ProviderKind::Osrm, 4.25),
            );

            let resolved = client.route(&walking()).await.unwrap();

            assert_eq!(resolved.provider, ProviderKind::Osrm);
            assert_eq!(resolved.route.duration_min, 4.25);
            assert_eq!(
                resolved.primary_failure,
                Some(ProviderFailure {
                    provider: ProviderKind::Mapbox,
                    error: primary_error,
                })
            );
            assert_eq!(client.primary().calls(), 1);
            assert_eq!(client.secondary().calls(), 1);
            assert_eq!(client.secondary().queries(), vec![walking()]);
        }
    }

    #[tokio::test]
    async fn test_both_fail_keeps_both_reasons() {
        let client = RouteClient::new(
            FakeProvider::new(ProviderKind::Mapbox, Err(ProviderError::MissingCredential)),
            FakeProvider::new(ProviderKind::Osrm, Err(timeout())),
        );

        let error = client.route(&walking()).await.unwrap_err();

        assert_eq!(error.primary.provider, ProviderKind::Mapbox);
        assert_eq!(error.primary.error, ProviderError::MissingCredential);
        assert_eq!(error.secondary.provider, ProviderKind::Osrm);
        assert_eq!(error.secondary.error, timeout());
        assert_eq!(
            error.to_string(),
            "mapbox failed (no token), osrm failed (Timeout: operation timed out)"
        );
    }

    #[test]
    fn test_attempts() {
        let failure = ProviderFailure {
            provider: ProviderKind::Mapbox,
            error: ProviderError::http(403, &"denied ".repeat(60)),
        };

        let rows = attempts(&Ok(ResolvedRoute {
            provider: ProviderKind::Osrm,
            route: Route::from_meters_seconds(vec![], 100.0, 60.0),
            primary_failure: Some(failure.clone()),
        }));

        assert_eq!(rows.len(), 2);
        assert!(!rows[0].ok);
        assert_eq!(rows[0].status, Some(403));
        assert_eq!(
            rows[0].message.as_ref().unwrap().chars().count(),
            ATTEMPT_MESSAGE_LIMIT
        );
        assert!(rows[1].ok);
        assert_eq!(rows[1].provider, ProviderKind::Osrm);

        let rows = attempts(&Err(FallbackError {
            primary: failure,
            secondary: ProviderFailure {
                provider: ProviderKind::Osrm,
                error: ProviderError::MissingCredential,
            },
        }));
        assert!(rows.iter().all(|row| !row.ok));
        assert_eq!(rows[1].message.as_deref(), Some("no token"));
    }

    #[tokio::test]
    async fn test_missing_token_falls_back_over_http() {
        let osrm_server = MockProvider::directions(744.0, 6100.0).start().await;
        let client = RouteClient::new(
            MapboxDirections::with_client(mock_client(), None, "http://127.0.0.1:9"),
            OsrmDirections::with_client(mock_client(), &osrm_server.url),
        );

        let resolved = client.route(&walking()).await.unwrap();

        assert_eq!(resolved.provider, ProviderKind::Osrm);
        assert_eq!(resolved.route.duration_min, 12.4);
        assert_eq!(
            resolved.primary_failure.map(|failure| failure.error),
            Some(ProviderError::MissingCredential)
        );
        assert!(osrm_server.last_request().unwrap().path.contains("/foot/"));
    }
}
