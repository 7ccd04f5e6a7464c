// 📦 Catalog Object - Wire model of the hosted catalog API
//
// Only the fields the merge touches are typed. Everything else the API sends
// lands in `extra` and is written back unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// OBJECT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogObjectType {
    Item,
    ItemVariation,
    Modifier,
    ModifierList,
    Category,
    Discount,
    Tax,
    Image,

    /// Any type this tool does not know about
    #[serde(other)]
    Unknown,
}

impl CatalogObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogObjectType::Item => "ITEM",
            CatalogObjectType::ItemVariation => "ITEM_VARIATION",
            CatalogObjectType::Modifier => "MODIFIER",
            CatalogObjectType::ModifierList => "MODIFIER_LIST",
            CatalogObjectType::Category => "CATEGORY",
            CatalogObjectType::Discount => "DISCOUNT",
            CatalogObjectType::Tax => "TAX",
            CatalogObjectType::Image => "IMAGE",
            CatalogObjectType::Unknown => "UNKNOWN",
        }
    }
}

// ============================================================================
// MONEY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the smallest denomination (e.g. cents)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Money {
    pub fn new(amount: i64, currency: &str) -> Self {
        Money {
            amount: Some(amount),
            currency: Some(currency.to_string()),
        }
    }
}

// ============================================================================
// MODIFIER LIST DATA
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionType {
    /// Exactly one modifier may be picked (API default)
    #[default]
    Single,

    /// Any number of modifiers may be picked
    Multiple,

    /// A value this tool does not know. Not written back, since the
    /// original value is lost.
    #[serde(other)]
    Unknown,
}

impl SelectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionType::Single => "SINGLE",
            SelectionType::Multiple => "MULTIPLE",
            SelectionType::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierListData {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub selection_type: SelectionType,

    /// Modifiers are full catalog objects of type MODIFIER
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<CatalogObject>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

// ============================================================================
// MODIFIER DATA
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierData {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_money: Option<Money>,

    /// Owning modifier list (account specific)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_list_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_by_default: Option<bool>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

// ============================================================================
// CATALOG OBJECT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogObject {
    #[serde(rename = "type")]
    pub object_type: CatalogObjectType,

    /// Server ID, or a `#`-prefixed temporary ID for objects not created yet
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_at_all_locations: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub present_at_location_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub absent_at_location_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog_v1_ids: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_list_data: Option<ModifierListData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_data: Option<ModifierData>,

    /// Fields of other object types, kept as-is
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl CatalogObject {
    fn empty(object_type: CatalogObjectType, id: &str) -> Self {
        CatalogObject {
            object_type,
            id: id.to_string(),
            version: None,
            updated_at: None,
            is_deleted: None,
            present_at_all_locations: None,
            present_at_location_ids: Vec::new(),
            absent_at_location_ids: Vec::new(),
            catalog_v1_ids: Vec::new(),
            modifier_list_data: None,
            modifier_data: None,
            extra: HashMap::new(),
        }
    }

    /// New MODIFIER_LIST object holding the given modifiers
    pub fn modifier_list(
        id: &str,
        name: &str,
        selection_type: SelectionType,
        modifiers: Vec<CatalogObject>,
    ) -> Self {
        let mut object = CatalogObject::empty(CatalogObjectType::ModifierList, id);
        object.modifier_list_data = Some(ModifierListData {
            name: name.to_string(),
            selection_type,
            modifiers,
            extra: HashMap::new(),
        });
        object
    }

    /// New MODIFIER object
    pub fn modifier(id: &str, name: &str, price_money: Option<Money>) -> Self {
        let mut object = CatalogObject::empty(CatalogObjectType::Modifier, id);
        object.modifier_data = Some(ModifierData {
            name: name.to_string(),
            price_money,
            ..ModifierData::default()
        });
        object
    }

    /// Display name of whatever data this object carries
    pub fn display_name(&self) -> &str {
        if let Some(data) = &self.modifier_data {
            return &data.name;
        }
        if let Some(data) = &self.modifier_list_data {
            return &data.name;
        }
        self.extra
            .values()
            .find_map(|data| data.get("name").and_then(|n| n.as_str()))
            .unwrap_or("")
    }

    /// Price of a MODIFIER object
    pub fn price_amount(&self) -> Option<i64> {
        self.modifier_data
            .as_ref()
            .and_then(|data| data.price_money.as_ref())
            .and_then(|money| money.amount)
    }

    /// IDs starting with `#` are client-side placeholders
    pub fn has_temporary_id(&self) -> bool {
        self.id.starts_with('#')
    }
}

// ============================================================================
// TESTS
// ============================================================================
