pub mod config;
pub mod crm_client;
pub mod rate_limiter;
