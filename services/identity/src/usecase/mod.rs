pub mod account;
pub mod directory;
pub mod gate;
pub mod mail;
pub mod permission;
pub mod role;
pub mod user;
