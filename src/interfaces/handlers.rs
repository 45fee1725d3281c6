pub mod admin;
pub mod contact;
pub mod demo;
pub mod home;
pub mod projects;
pub mod responses;
pub mod sms;
pub mod system;
