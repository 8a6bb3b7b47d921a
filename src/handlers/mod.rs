// handlers/mod.rs - HTTP handlers
//
// Activity routes are public for reads and create; update and delete sit
// behind bearer-token auth (see app::activity_routes).

pub mod activities; // /activities[/:id], /activities/random
pub mod health;     // GET /health
