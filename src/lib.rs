#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "This crate contains the core logic for a Trello-style task board: domain"]
#![doc = "models, credential verification and session resolution, owner-gated task"]
#![doc = "CRUD routes, the pure board-state helpers, and error handling. It is used"]
#![doc = "by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod board;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
