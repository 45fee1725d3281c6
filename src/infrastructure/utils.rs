pub mod get_client_ip;
pub mod latency;
pub mod mock_id;
pub mod sanitize;
