use futures::future::join_all;
use lastmile_providers::{
    directions::DirectionsProvider,
    geo_point::GeoPoint,
    profile::Profile,
    route::{QueryError, Route, RouteQuery},
    route_client::{FallbackError, LegResult, ProviderAttempt, ResolvedRoute, RouteClient, attempts},
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    improvement::{Improvement, compute_improvement},
    places::{ApartmentSite, Origin},
    resolver::PlaceResolver,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    AsIs,
    ToBe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegRole {
    OriginToGate,
    GateToFront,
    OriginToFront,
}

impl std::fmt::Display for LegRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LegRole::OriginToGate => "origin → gate",
                LegRole::GateToFront => "gate → front",
                LegRole::OriginToFront => "origin → front",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLeg {
    pub role: LegRole,
    pub query: RouteQuery,
}

impl PlannedLeg {
    fn new(role: LegRole, from: GeoPoint, to: GeoPoint, profile: Profile) -> Result<Self, QueryError> {
        Ok(Self {
            role,
            query: RouteQuery::between(from, to, profile)?,
        })
    }
}

/// AS-IS: drive to the gate, walk to the front.
/// TO-BE: drive to the front.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonScenario {
    pub origin_name: String,
    pub apartment_name: String,
    pub origin: GeoPoint,
    pub gate: GeoPoint,
    pub front: GeoPoint,

    /// The complex had no gate, the front stands in for it and the
    /// walking leg is left out.
    pub approximated: bool,

    pub as_is: Vec<PlannedLeg>,
    pub to_be: Vec<PlannedLeg>,
}

impl ComparisonScenario {
    pub fn new(origin: &Origin, apartment: &ApartmentSite) -> Result<Self, QueryError> {
        Self::with_gate(origin, apartment, apartment.gate)
    }

    pub fn with_gate(
        origin: &Origin,
        apartment: &ApartmentSite,
        gate: Option<GeoPoint>,
    ) -> Result<Self, QueryError> {
        let front = apartment.front;
        let approximated = gate.is_none();
        let gate = gate.unwrap_or(front);

        let mut as_is = vec![PlannedLeg::new(
            LegRole::OriginToGate,
            origin.position,
            gate,
            Profile::Driving,
        )?];
        if gate != front {
            as_is.push(PlannedLeg::new(
                LegRole::GateToFront,
                gate,
                front,
                Profile::Walking,
            )?);
        }

        let to_be = vec![PlannedLeg::new(
            LegRole::OriginToFront,
            origin.position,
            front,
            Profile::Driving,
        )?];

        Ok(Self {
            origin_name: origin.name.clone(),
            apartment_name: apartment.name.clone(),
            origin: origin.position,
            gate,
            front,
            approximated,
            as_is,
            to_be,
        })
    }

    /// Fetches every leg concurrently and compares the two plans.
    pub async fn evaluate<P, S>(&self, client: &RouteClient<P, S>) -> ComparisonReport
    where
        P: DirectionsProvider,
        S: DirectionsProvider,
    {
        info!(
            "Comparing {} → {} ({} legs)",
            self.origin_name,
            self.apartment_name,
            self.as_is.len() + self.to_be.len()
        );

        let legs = self
            .as_is
            .iter()
            .map(|leg| (Plan::AsIs, leg))
            .chain(self.to_be.iter().map(|leg| (Plan::ToBe, leg)))
            .collect::<Vec<_>>();

        let results = join_all(legs.iter().map(|(_, leg)| client.route(&leg.query))).await;

        let (as_is, to_be): (Vec<_>, Vec<_>) = legs
            .into_iter()
            .zip(results)
            .map(|((plan, leg), result)| LegOutcome::new(plan, leg, result))
            .partition(|outcome| outcome.plan == Plan::AsIs);

        let improvement = compute_improvement(
            &as_is.iter().map(LegOutcome::duration_min).collect::<Vec<_>>(),
            &to_be.iter().map(LegOutcome::duration_min).collect::<Vec<_>>(),
        );

        debug!(
            "AS-IS {:.2} min, TO-BE {:.2} min",
            improvement.as_is_total, improvement.to_be_total
        );

        ComparisonReport {
            origin: self.origin_name.clone(),
            apartment: self.apartment_name.clone(),
            gate: self.gate,
            front: self.front,
            approximated: self.approximated,
            as_is,
            to_be,
            improvement,
        }
    }
}

/// The gate from the catalog, or failing that the first geocoding match
/// for "<name> 정문" near the complex center.
pub async fn resolve_gate<R: PlaceResolver>(
    apartment: &ApartmentSite,
    resolver: &R,
) -> Option<GeoPoint> {
    if apartment.gate.is_some() {
        return apartment.gate;
    }

    let query = format!("{} 정문", apartment.name);
    match resolver.resolve(&query).await {
        Ok(gate) => {
            info!("Geocoded gate of {} at {}", apartment.name, gate);
            Some(gate)
        }
        Err(error) => {
            warn!("Could not locate gate of {}: {}", apartment.name, error);
            None
        }
    }
}

/// One fetched leg with its routing diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegOutcome {
    pub plan: Plan,
    pub role: LegRole,
    pub profile: Profile,
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub resolved: Option<ResolvedRoute>,
    pub failure: Option<FallbackError>,
    pub attempts: Vec<ProviderAttempt>,
}

impl LegOutcome {
    fn new(plan: Plan, leg: &PlannedLeg, result: LegResult) -> Self {
        let attempts = attempts(&result);
        let (resolved, failure) = match result {
            Ok(resolved) => (Some(resolved), None),
            Err(error) => (None, Some(error)),
        };

        Self {
            plan,
            role: leg.role,
            profile: leg.query.profile(),
            from: leg.query.origin(),
            to: leg.query.destination(),
            resolved,
            failure,
            attempts,
        }
    }

    pub fn route(&self) -> Option<&Route> {
        self.resolved.as_ref().map(|resolved| &resolved.route)
    }

    pub fn duration_min(&self) -> Option<f64> {
        self.route().map(|route| route.duration_min)
    }

    pub fn distance_km(&self) -> Option<f64> {
        self.route().map(|route| route.distance_km)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub origin: String,
    pub apartment: String,
    pub gate: GeoPoint,
    pub front: GeoPoint,
    pub approximated: bool,
    pub as_is: Vec<LegOutcome>,
    pub to_be: Vec<LegOutcome>,
    pub improvement: Improvement,
}

impl ComparisonReport {
    pub fn legs(&self) -> impl Iterator<Item = &LegOutcome> {
        self.as_is.iter().chain(self.to_be.iter())
    }
}
