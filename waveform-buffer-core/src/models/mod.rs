pub mod config;
pub mod error;
pub mod point;
pub mod state;
pub mod statistics;
