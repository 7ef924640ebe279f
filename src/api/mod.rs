//! HTTP API: routes, handlers, middleware, DTOs.

pub mod doc;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
