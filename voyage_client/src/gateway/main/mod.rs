mod api;
mod core;

pub use core::ApiGateway;
