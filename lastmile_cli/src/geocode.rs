use clap::Args;
use lastmile_comparison::resolver::{GeocodingResolver, PlaceResolver, ResolveError};
use lastmile_providers::geo_point::GeoPoint;

use crate::{context::AppContext, parsers};

#[derive(Args)]
pub struct GeocodeArgs {
    /// Free-text place or address
    query: String,

    /// Bias results towards "lat,lon"
    #[arg(long, value_parser = parsers::parse_point)]
    near: Option<GeoPoint>,
}

pub async fn run(context: &AppContext, args: GeocodeArgs) -> anyhow::Result<()> {
    let mut resolver = GeocodingResolver::new(&context.geocoder);
    if let Some(near) = args.near {
        resolver = resolver.near(near);
    }

    match resolver.resolve(&args.query).await {
        Ok(point) => println!("{point}"),
        Err(ResolveError::Unresolved(query)) => println!("No match for \"{query}\""),
        Err(error) => return Err(error.into()),
    }

    Ok(())
}
