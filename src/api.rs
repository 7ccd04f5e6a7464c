// 📡 Catalog API - The two endpoints the merge needs
//
//   GET  /v2/catalog/list?types=...&cursor=...   (paged)
//   POST /v2/catalog/batch-upsert

use crate::catalog::{CatalogObject, CatalogObjectType};
use crate::client::{ApiErrorDetail, ApiError, CatalogClient};
use serde::{Deserialize, Serialize};

pub const LIST_PATH: &str = "/v2/catalog/list";
pub const BATCH_UPSERT_PATH: &str = "/v2/catalog/batch-upsert";

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCatalogResponse {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,

    /// Present while more pages remain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogObjectBatch {
    pub objects: Vec<CatalogObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUpsertCatalogObjectsRequest {
    pub idempotency_key: String,
    pub batches: Vec<CatalogObjectBatch>,
}

impl BatchUpsertCatalogObjectsRequest {
    /// Single-batch request with a fresh idempotency key
    pub fn new(objects: Vec<CatalogObject>) -> Self {
        BatchUpsertCatalogObjectsRequest {
            idempotency_key: uuid::Uuid::new_v4().to_string(),
            batches: vec![CatalogObjectBatch { objects }],
        }
    }
}

/// Maps a temporary `#` ID to the ID the server assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdMapping {
    pub client_object_id: String,
    pub object_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchUpsertResponse {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,

    #[serde(default)]
    pub id_mappings: Vec<IdMapping>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorDetail>,
}

// ============================================================================
// CATALOG API
// ============================================================================

/// One catalog account
pub trait CatalogApi {
    /// Every live object of the given types, across all pages
    fn list_objects(&self, types: &[CatalogObjectType]) -> Result<Vec<CatalogObject>, ApiError>;

    /// Create or update `objects` in one request
    fn batch_upsert(&self, objects: Vec<CatalogObject>) -> Result<BatchUpsertResponse, ApiError>;
}

/// Query string for one page of a listing
pub fn list_path(types: &[CatalogObjectType], cursor: Option<&str>) -> String {
    let types = types.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(",");
    let mut path = format!("{}?types={}", LIST_PATH, types);
    if let Some(cursor) = cursor {
        path.push_str("&cursor=");
        path.push_str(&urlencoding::encode(cursor));
    }
    path
}

impl CatalogApi for CatalogClient {
    fn list_objects(&self, types: &[CatalogObjectType]) -> Result<Vec<CatalogObject>, ApiError> {
        let mut objects = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page: ListCatalogResponse = self.get(&list_path(types, cursor.as_deref()))?;
            tracing::debug!(
                target: "catalog_merge::client",
                count = page.objects.len(),
                more = page.cursor.is_some(),
                "Fetched catalog page"
            );

            objects.extend(page.objects.into_iter().filter(|o| !o.is_deleted.unwrap_or(false)));

            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(objects)
    }

    fn batch_upsert(&self, objects: Vec<CatalogObject>) -> Result<BatchUpsertResponse, ApiError> {
        let request = BatchUpsertCatalogObjectsRequest::new(objects);
        self.post(BATCH_UPSERT_PATH, &request)
    }
}

// ============================================================================
// TESTS
// ============================================================================
