pub mod config;
pub mod helpers;
pub mod streaming;

#[path = "providers/lib.rs"]
pub mod providers;
#[path = "api/lib.rs"]
pub mod api;

pub use config::GatewayConfig;
pub use helpers::build_registry;
