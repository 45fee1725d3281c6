pub mod db;
pub mod limiter;
pub mod relay;
pub mod telemetry;
pub mod utils;
pub mod web;
