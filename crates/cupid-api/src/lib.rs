pub mod auth;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod notify;
pub mod payment;
pub mod pricing;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
pub mod valentines;
