pub mod classify;
pub mod controller;
pub mod crud;
pub mod manager;
pub mod model;
pub mod routes;
pub mod schema;
pub mod store;
