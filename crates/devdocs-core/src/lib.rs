pub mod catalog;
pub mod config;
pub mod error;
pub mod nav;
pub mod parse;
pub mod render;
pub mod spy;
pub mod store;
pub mod validate;
