use const_format::concatcp;

pub mod database;
pub mod location;
pub mod session;
mod error;

pub use error::*;

pub const DATA_DIR: &str = "data/";
pub const DATABASE_PATH: &str = concatcp!(DATA_DIR, "routes.db");
