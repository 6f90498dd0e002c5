//! # IO Module
//!
//! Adapters between the outside world and the domain services.
//!
//! ## Key Responsibilities
//!
//! - **REST API**: JSON endpoints and CSV upload/download under `/expenses`
//! - **Chat Bot**: command parsing, reply rendering and the Telegram webhook
//! - **Error Translation**: domain errors become status codes or chat replies
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum, with services injected through `AppState`
//! - **Serialization**: Serde for JSON bodies and Telegram updates
//! - **DTOs**: request/response types live in the `shared` crate

pub mod bot;
pub mod rest;
