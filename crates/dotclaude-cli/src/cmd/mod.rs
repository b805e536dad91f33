pub mod afk;
pub mod alert;
pub mod config;
pub mod hook;
pub mod install;
pub mod status;
pub mod uninstall;
