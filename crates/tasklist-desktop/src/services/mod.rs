//! Application services
//!
//! Backend wiring shared by the desktop components.

mod backend;

pub use backend::connect_backend;
