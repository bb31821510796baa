pub mod get_client_ip;
pub mod markdown;
pub mod valid_uuid;
