pub mod auth_routes;
pub mod driver_routes;
pub mod realtime_routes;
pub mod ride_routes;
