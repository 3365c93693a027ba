pub mod dbclient;
pub mod model;
pub mod schema;
pub mod store;
