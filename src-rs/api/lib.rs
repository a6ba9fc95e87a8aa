pub use handlers::AppState;
pub use server::GatewayServer;

pub mod handlers;
pub mod server;
