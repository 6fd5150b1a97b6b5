use std::time::Duration;

use jiff::SpanRelativeTo;
use lastmile_providers::geo_point::GeoPoint;

/// Accepts "30s", "5m", "PT1H" or a bare number of seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return to_unsigned(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return to_unsigned(duration);
    }

    if let Ok(seconds) = input.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }

    Err(String::from("Invalid duration"))
}

fn to_unsigned(duration: jiff::SignedDuration) -> Result<Duration, String> {
    Duration::try_from(duration).map_err(|_| String::from("Duration must not be negative"))
}

pub fn parse_point(input: &str) -> Result<GeoPoint, String> {
    input.parse::<GeoPoint>().map_err(|error| error.to_string())
}
