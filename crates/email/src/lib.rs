pub mod app;
pub mod handler;
pub mod middleware;
pub mod service;
pub mod state;
pub mod subscriber;
pub mod templates;
