// Adapters for the ports in `app::ports`.

pub mod discord;
pub mod http_client;
pub mod wayback;
pub mod zip_archive;
