// Catalog Merge - Core Library
// Copies catalog objects from a source account into a target account,
// deduplicating by what objects mean rather than by their IDs.

pub mod signature;  // Equality keys (name + discriminant / name + price)
pub mod merge;      // Matcher + Merger, generic over entity kinds
pub mod sanitize;   // Strip source-account metadata
pub mod catalog;    // Catalog object model + modifier list adapter
pub mod client;     // Authenticated HTTP JSON transport
pub mod api;        // List / batch-upsert endpoints
pub mod sync;       // Source → target sync of modifier lists
pub mod config;     // Environment configuration

#[cfg(test)]
mod test_support;  // Local HTTP server for client tests

// Re-export commonly used types
pub use signature::{
    Child, Container, DELIMITER,
    encode_child, encode_container,
};
pub use merge::{
    CatalogMerger, MergeError,
    ChildEncoder, ContainerEncoder, Sanitizer,
};
pub use sanitize::{
    SanitizeError,
    prepare_clone, strip_modifier_metadata, strip_source_metadata, temporary_id,
};
pub use catalog::{
    CatalogError, CatalogObject, CatalogObjectType,
    ModifierData, ModifierList, ModifierListData, Money, SelectionType,
    modifier_list_merger,
};
pub use client::{
    ApiError, ApiErrorDetail, CatalogClient, ErrorResponse,
    describe_http_error,
};
pub use api::{
    BatchUpsertCatalogObjectsRequest, BatchUpsertResponse, CatalogApi,
    CatalogObjectBatch, IdMapping, ListCatalogResponse,
};
pub use sync::{
    ContainerOutcome, SyncAction, SyncEngine, SyncError, SyncReport,
    load_modifier_lists,
};
pub use config::{Config, ConfigError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
