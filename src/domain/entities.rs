pub mod contact;
pub mod demo;
pub mod project;
pub mod rate_limit;
pub mod scrape;
pub mod sms;
