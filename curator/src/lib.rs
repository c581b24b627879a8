//! Curator: a self-hostable curation service for AI chat deployments.
//!
//! Two concerns live here: ranked, paginated chat-session review per
//! `(appId, userId)` with feedback-derived counts, and lifecycle management
//! of knowledge-base q/a entries with model-aware length validation.

pub mod api;
pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod models;
pub mod services;
