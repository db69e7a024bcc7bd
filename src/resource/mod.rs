pub mod handlers;
pub mod pg;
pub mod repository;
pub mod service;

#[cfg(test)]
pub mod memory;

pub use handlers::{admin_routes, Section};
pub use repository::ResourceRepository;
pub use service::{ParentRef, ResourceService};
