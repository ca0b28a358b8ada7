pub mod config;
pub mod form;
pub mod subtype_options;
pub mod ui;
pub mod visibility;
