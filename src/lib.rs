//! Terminal client for a language-school activity backend
//!
//! Browse activities per proficiency level and create or edit them, with an
//! optional resource file uploaded before the activity is saved.

pub mod add;
pub mod api;
pub mod category;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod interactive;
pub mod list_view;
pub mod logging;
pub mod model;
pub mod query;
pub mod resource;
