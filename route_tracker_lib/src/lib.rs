pub mod distance;
pub mod format;
pub mod geo_point;
pub mod route;
pub mod stats;
