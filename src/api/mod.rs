// ABOUTME: HTTP integration with the remote market agent chat API

pub mod client;

pub use client::{ApiError, ChatClient, ChatExchange};
