pub mod directory;
pub mod repository;
pub mod types;
pub mod validation;
