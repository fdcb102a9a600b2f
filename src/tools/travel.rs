//! Cargo plane travel time estimation.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;

const EARTH_RADIUS_KM: f64 = 6371.0;
const DEFAULT_CRUISING_SPEED_KMH: f64 = 750.0;

/// Estimate cargo plane transfer time between two coordinates.
pub struct CargoTravelTime;

#[async_trait]
impl Tool for CargoTravelTime {
    fn name(&self) -> &str {
        "cargo_travel_time"
    }

    fn description(&self) -> &str {
        "Calculate the travel time for a cargo plane between two points on Earth using great-circle distance. Coordinates are (latitude, longitude) pairs in decimal degrees."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "origin_lat": {
                    "type": "number",
                    "description": "Origin latitude in decimal degrees"
                },
                "origin_lon": {
                    "type": "number",
                    "description": "Origin longitude in decimal degrees"
                },
                "destination_lat": {
                    "type": "number",
                    "description": "Destination latitude in decimal degrees"
                },
                "destination_lon": {
                    "type": "number",
                    "description": "Destination longitude in decimal degrees"
                },
                "cruising_speed_kmh": {
                    "type": "number",
                    "description": "Cruising speed in km/h (default: 750, typical for cargo planes)"
                }
            },
            "required": ["origin_lat", "origin_lon", "destination_lat", "destination_lon"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let origin_lat = number_arg(&args, "origin_lat")?;
        let origin_lon = number_arg(&args, "origin_lon")?;
        let destination_lat = number_arg(&args, "destination_lat")?;
        let destination_lon = number_arg(&args, "destination_lon")?;
        let speed = args["cruising_speed_kmh"]
            .as_f64()
            .unwrap_or(DEFAULT_CRUISING_SPEED_KMH);

        let hours = travel_time_hours(
            (origin_lat, origin_lon),
            (destination_lat, destination_lon),
            speed,
        );
        Ok(format!("{:.2} hours", hours))
    }
}

fn number_arg(args: &Value, name: &str) -> anyhow::Result<f64> {
    args[name]
        .as_f64()
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' argument", name))
}

/// Flight time in hours: great-circle distance, plus 10% for non-direct
/// routes, plus one hour for takeoff and landing, at the given cruising speed.
pub fn travel_time_hours(origin: (f64, f64), destination: (f64, f64), speed_kmh: f64) -> f64 {
    let distance = haversine_km(origin, destination);
    let actual_distance = distance * 1.1;
    let hours = actual_distance / speed_kmh + 1.0;
    (hours * 100.0).round() / 100.0
}

/// Great-circle distance between two (lat, lon) points in kilometers.
fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOTHAM: (f64, f64) = (40.7128, -74.0060);
    const LONDON: (f64, f64) = (51.5074, -0.1278);

    #[test]
    fn zero_distance_is_just_takeoff_and_landing() {
        assert_eq!(travel_time_hours(GOTHAM, GOTHAM, 750.0), 1.0);
    }

    #[test]
    fn new_york_to_london_is_about_nine_hours() {
        // Great-circle NYC-London is ~5570 km; with the 10% route factor and
        // the fixed hour that lands between 9 and 10 hours at 750 km/h.
        let hours = travel_time_hours(GOTHAM, LONDON, 750.0);
        assert!(hours > 9.0 && hours < 10.0, "got {hours}");
    }

    #[test]
    fn result_is_rounded_to_two_decimals() {
        let hours = travel_time_hours(GOTHAM, LONDON, 750.0);
        assert_eq!(hours, (hours * 100.0).round() / 100.0);
    }

    #[tokio::test]
    async fn tool_formats_hours() {
        let result = CargoTravelTime
            .execute(json!({
                "origin_lat": GOTHAM.0,
                "origin_lon": GOTHAM.1,
                "destination_lat": GOTHAM.0,
                "destination_lon": GOTHAM.1
            }))
            .await
            .unwrap();
        assert_eq!(result, "1.00 hours");
    }
}
