use std::path::PathBuf;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use lastmile_comparison::{
    resolver::GeocodingResolver,
    scenario::{ComparisonReport, ComparisonScenario, LegOutcome, Plan, resolve_gate},
    synthetic::scatter_markers,
};
use tracing::info;

use crate::{
    context::AppContext,
    export::{report_to_geojson, write_geojson},
};

#[derive(Args)]
pub struct CompareArgs {
    /// Dispatch point, by catalog name
    #[arg(short, long)]
    origin: String,

    /// Apartment complex, by catalog name
    #[arg(short, long)]
    apartment: String,

    /// Print the report as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Write routes and markers to a GeoJSON file
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Number of decorative markers scattered around the complex center
    #[arg(long, default_value_t = 0)]
    decorative: usize,

    /// Scatter radius in meters
    #[arg(long, default_value_t = 150.0)]
    radius: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Look up the gate with geocoding when the catalog has none
    #[arg(long)]
    geocode_missing_gate: bool,
}

pub struct Selection<'a> {
    pub origin: &'a str,
    pub apartment: &'a str,
    pub geocode_missing_gate: bool,
}

/// Resolves the selection against the catalog and fetches every leg.
pub async fn compare(context: &AppContext, selection: Selection<'_>) -> anyhow::Result<ComparisonReport> {
    let origin = context.catalog.origin(selection.origin)?;
    let apartment = context.catalog.apartment(selection.apartment)?;

    let gate = if selection.geocode_missing_gate {
        let resolver = GeocodingResolver::new(&context.geocoder).near(apartment.center);
        resolve_gate(apartment, &resolver).await
    } else {
        apartment.gate
    };

    let scenario = ComparisonScenario::with_gate(origin, apartment, gate)?;

    Ok(scenario.evaluate(&context.routes).await)
}

pub async fn run(context: &AppContext, args: CompareArgs) -> anyhow::Result<()> {
    let report = compare(
        context,
        Selection {
            origin: &args.origin,
            apartment: &args.apartment,
            geocode_missing_gate: args.geocode_missing_gate,
        },
    )
    .await?;

    if let Some(path) = &args.geojson {
        let apartment = context.catalog.apartment(&args.apartment)?;
        let decorative = scatter_markers(apartment.center, args.decorative, args.radius, args.seed);

        write_geojson(path, &report_to_geojson(&report, apartment, &decorative))?;
        info!("Wrote {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

pub fn print_report(report: &ComparisonReport) {
    println!("{} → {}", report.origin, report.apartment);
    if report.approximated {
        println!("Gate unknown, the building front stands in for it (approximated)");
    }
    println!("{}", kpi_table(report));
    println!("{}", legs_table(report));
    println!("{}", diagnostics_table(report));
}

fn minutes(value: Option<f64>) -> String {
    value
        .map(|minutes| format!("{minutes:.2} min"))
        .unwrap_or_else(|| "unavailable".to_string())
}

fn plan_total(total: f64, missing: &[usize]) -> String {
    if missing.is_empty() {
        format!("{total:.2} min")
    } else {
        format!("{total:.2} min ({} leg(s) unavailable)", missing.len())
    }
}

pub fn kpi_table(report: &ComparisonReport) -> Table {
    let improvement = &report.improvement;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["", "Time"]);
    table.add_row(vec![
        "AS-IS (gate + walk)".to_string(),
        plan_total(improvement.as_is_total, &improvement.missing_as_is),
    ]);
    table.add_row(vec![
        "TO-BE (direct)".to_string(),
        plan_total(improvement.to_be_total, &improvement.missing_to_be),
    ]);
    table.add_row(vec![
        "Improvement".to_string(),
        format!(
            "{:.2} min ({:.1}%)",
            improvement.improvement_minutes, improvement.improvement_pct
        ),
    ]);

    table
}

fn plan_label(plan: Plan) -> &'static str {
    match plan {
        Plan::AsIs => "AS-IS",
        Plan::ToBe => "TO-BE",
    }
}

fn leg_row(leg: &LegOutcome) -> Vec<String> {
    let provider = leg
        .resolved
        .as_ref()
        .map(|resolved| resolved.provider.to_string())
        .unwrap_or_else(|| "-".to_string());
    let distance = leg
        .distance_km()
        .map(|km| format!("{km:.2} km"))
        .unwrap_or_else(|| "-".to_string());

    vec![
        plan_label(leg.plan).to_string(),
        leg.role.to_string(),
        leg.profile.to_string(),
        provider,
        distance,
        minutes(leg.duration_min()),
    ]
}

pub fn legs_table(report: &ComparisonReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Plan", "Leg", "Profile", "Provider", "Distance", "Duration",
    ]);

    for leg in report.legs() {
        table.add_row(leg_row(leg));
    }

    table
}

pub fn diagnostics_table(report: &ComparisonReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Leg", "Provider", "Ok", "Status", "Message"]);

    for leg in report.legs() {
        for attempt in &leg.attempts {
            table.add_row(vec![
                leg.role.to_string(),
                attempt.provider.to_string(),
                attempt.ok.to_string(),
                attempt
                    .status
                    .map(|status| status.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                attempt.message.clone().unwrap_or_default(),
            ]);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use lastmile_comparison::{improvement::compute_improvement, scenario::LegRole};
    use lastmile_providers::{
        error::ProviderError,
        geo_point::GeoPoint,
        profile::{Profile, ProviderKind},
        route::Route,
        route_client::{FallbackError, ProviderFailure, ResolvedRoute, attempts},
    };

    use super::*;

    const ORIGIN: GeoPoint = GeoPoint::new(37.539826, 127.220661);
    const FRONT: GeoPoint = GeoPoint::new(37.557088, 127.183036);

    fn failed_leg() -> LegOutcome {
        let failure = FallbackError {
            primary: ProviderFailure {
                provider: ProviderKind::Mapbox,
                error: ProviderError::MissingCredential,
            },
            secondary: ProviderFailure {
                provider: ProviderKind::Osrm,
                error: ProviderError::http(429, "Too Many Requests"),
            },
        };

        LegOutcome {
            plan: Plan::AsIs,
            role: LegRole::OriginToGate,
            profile: Profile::Driving,
            from: ORIGIN,
            to: FRONT,
            resolved: None,
            attempts: attempts(&Err(failure.clone())),
            failure: Some(failure),
        }
    }

    fn direct_leg() -> LegOutcome {
        let resolved = ResolvedRoute {
            provider: ProviderKind::Osrm,
            route: Route::from_meters_seconds(vec![ORIGIN, FRONT], 5200.0, 792.0),
            primary_failure: Some(ProviderFailure {
                provider: ProviderKind::Mapbox,
                error: ProviderError::MissingCredential,
            }),
        };

        LegOutcome {
            plan: Plan::ToBe,
            role: LegRole::OriginToFront,
            profile: Profile::Driving,
            from: ORIGIN,
            to: FRONT,
            attempts: attempts(&Ok(resolved.clone())),
            resolved: Some(resolved),
            failure: None,
        }
    }

    fn report() -> ComparisonReport {
        ComparisonReport {
            origin: "하남소방서".to_string(),
            apartment: "미사강변 푸르지오".to_string(),
            gate: FRONT,
            front: FRONT,
            approximated: true,
            as_is: vec![failed_leg()],
            to_be: vec![direct_leg()],
            improvement: compute_improvement(&[None], &[Some(13.2)]),
        }
    }

    #[test]
    fn test_kpi_shows_unavailable_legs() {
        let kpi = kpi_table(&report()).to_string();

        assert!(kpi.contains("0.00 min (1 leg(s) unavailable)"));
        assert!(kpi.contains("13.20 min"));
        assert!(kpi.contains("-13.20 min (0.0%)"));
    }

    #[test]
    fn test_legs_and_diagnostics() {
        let report = report();

        let legs = legs_table(&report).to_string();
        assert!(legs.contains("unavailable"));
        assert!(legs.contains("5.20 km"));
        assert!(legs.contains("osrm"));
        assert!(legs.contains("TO-BE"));

        let diagnostics = diagnostics_table(&report).to_string();
        assert!(diagnostics.contains("no token"));
        assert!(diagnostics.contains("429"));
        assert!(diagnostics.contains("HTTP 429: Too Many Requests"));
    }
}
