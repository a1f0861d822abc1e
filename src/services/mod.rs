pub mod fare_service;
pub mod realtime_service;
