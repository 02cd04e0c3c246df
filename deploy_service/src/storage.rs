pub mod application_repository;
pub mod parameter_store;
