pub mod backend;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod tables;
pub mod types;

pub use routes::app;
pub use state::AppState;
