pub mod afk;
pub mod alerts;
pub mod config;
pub mod error;
pub mod hooks;
pub mod io;
pub mod link;
pub mod paths;
pub mod speech;

pub use error::{DotclaudeError, Result};
