pub mod directories;
pub mod permissions;
pub mod roles;
pub mod users;
