pub mod bulk_delete;

pub use bulk_delete::{BulkDeleteErrorBody, BulkDeleteRequest, BulkDeleteResponse};
