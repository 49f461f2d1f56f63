pub mod app_config;
pub mod http;
pub mod memory;

pub use app_config::Config;
pub use http::HttpBackend;
pub use memory::InMemoryBackend;
