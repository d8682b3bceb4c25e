pub mod catalog;
pub mod config;
pub mod extension;
pub mod info;
pub mod package_manager;
pub mod postgres;
pub mod resolver;
pub mod tabulate;
