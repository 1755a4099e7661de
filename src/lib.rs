pub mod app;
pub mod assemblers;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
