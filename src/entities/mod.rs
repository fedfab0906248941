pub mod actor;
pub mod movies;
