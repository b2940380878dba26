pub mod database;
pub mod models;
pub mod schema;

pub use database::{MovieStore, UserCatalog};
pub use models::{Movie, MovieFilter, NewMovie, User};
