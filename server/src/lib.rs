pub mod config;
pub mod error;
pub mod relay;
pub mod roster;
pub mod web;
