pub mod catalog;
pub mod routes;

pub use catalog::Catalog;
pub use routes::routes;
