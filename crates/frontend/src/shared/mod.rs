pub mod api_utils;
pub mod dom;
pub mod scroll_memory;
