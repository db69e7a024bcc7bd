pub mod handlers;
mod services;

pub use handlers::upload_routes;
