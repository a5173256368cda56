// ABOUTME: Library crate for market-chat exposing the session registry, API client and UI

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod models;
pub mod session;
