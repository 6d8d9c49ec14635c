pub const ROUTES_TABLE_NAME: &str = "Routes";
pub const ROUTE_ID: &str = "route_id";
pub const CREATED_AT: &str = "created_at";
pub const COORDINATES: &str = "coordinates";

pub const CREATED_AT_INDEX_NAME: &str = "RoutesCreatedAt";

pub const METADATA_TABLE_NAME: &str = "Metadata";
pub const KEY: &str = "key";
pub const VALUE: &str = "value";
pub const VERSION_KEY: &str = "version";
