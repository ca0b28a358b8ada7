pub mod api;
pub mod error;
pub mod gallery;
pub mod state;
pub mod ui;
