pub mod error;
pub mod handlers;
pub mod server;
pub mod validation;

pub use error::ApiError;
pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
