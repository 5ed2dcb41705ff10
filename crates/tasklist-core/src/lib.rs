//! tasklist-core - Core library for Tasklist
//!
//! This crate contains the todo models, the Supabase client and repository,
//! and the view state shared by the Tasklist interfaces.

pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod repository;
pub mod session;
pub mod state;
pub mod util;

pub use error::{Error, Result};
pub use models::{ImageUpload, TodoId, TodoItem};
