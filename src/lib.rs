//! Featureform TUI - terminal form views for attribute editing
//!
//! A Ratatui widget set that renders record-level forms owned by an
//! external form engine, with association browsing and save/discard
//! confirmation flows.

pub mod config;
pub mod container;
pub mod engine;
pub mod state;
pub mod ui;
