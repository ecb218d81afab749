pub mod errors;
pub mod models;

pub mod schema;
pub mod modules;
