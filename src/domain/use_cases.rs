pub mod contact;
pub mod demo;
pub mod scrape;
pub mod sms;
