// Server-rendered admin interface for the workforce API

pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;
