use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use lastmile_providers::{
    geo_point::GeoPoint,
    profile::Profile,
    route::RouteQuery,
    route_client::{LegResult, attempts},
};

use crate::{context::AppContext, parsers};

#[derive(Args)]
pub struct RouteArgs {
    /// driving or walking
    #[arg(short, long, default_value = "driving")]
    profile: Profile,

    /// Waypoint as "lat,lon", at least two in travel order
    #[arg(long = "point", value_parser = parsers::parse_point, required = true, num_args = 1)]
    points: Vec<GeoPoint>,

    #[arg(long)]
    json: bool,
}

pub fn route_table(result: &LegResult) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Provider", "Ok", "Status", "Message"]);

    for attempt in attempts(result) {
        table.add_row(vec![
            attempt.provider.to_string(),
            attempt.ok.to_string(),
            attempt
                .status
                .map(|status| status.to_string())
                .unwrap_or_else(|| "-".to_string()),
            attempt.message.unwrap_or_default(),
        ]);
    }

    table
}

pub async fn run(context: &AppContext, args: RouteArgs) -> anyhow::Result<()> {
    let query = RouteQuery::new(args.points, args.profile)?;
    let result = context.routes.route(&query).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match &result {
        Ok(resolved) => println!(
            "{} via {}: {:.2} km, {:.2} min, {} points",
            query.profile(),
            resolved.provider,
            resolved.route.distance_km,
            resolved.route.duration_min,
            resolved.route.geometry.len()
        ),
        Err(error) => println!("No route: {error}"),
    }
    println!("{}", route_table(&result));

    Ok(())
}
