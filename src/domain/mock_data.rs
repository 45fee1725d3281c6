//! Randomized but schema-stable payloads for the demo endpoints. Callers pass
//! the RNG so tests can seed it.

pub mod gmaps;
pub mod trade_report;

pub use gmaps::generate_business_results;
pub use trade_report::generate_trade_report;

/// Rounds half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
