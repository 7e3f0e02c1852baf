pub mod config;

pub use config::{Backend, Config};
