// 🧾 Modifier List - Container adapter over a MODIFIER_LIST catalog object
//
// Container = MODIFIER_LIST (name + selection type)
// Child     = MODIFIER      (name + price)

use super::object::{CatalogObject, CatalogObjectType, ModifierListData, SelectionType};
use crate::merge::CatalogMerger;
use crate::sanitize::strip_modifier_metadata;
use crate::signature::{Child, Container};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("object {id} is a {found}, expected a {expected}")]
    WrongType {
        id: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("object {id} has no {field}")]
    MissingData { id: String, field: &'static str },

    #[error("modifier list {id} has a selection type this tool does not know")]
    UnknownSelectionType { id: String },
}

// ============================================================================
// MODIFIER LIST
// ============================================================================

/// A MODIFIER_LIST object with its list data pulled out so it can be read
/// without re-checking the object type every time.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierList {
    object: CatalogObject,
    data: ModifierListData,
}

impl ModifierList {
    pub fn id(&self) -> &str {
        &self.object.id
    }

    pub fn selection_type(&self) -> SelectionType {
        self.data.selection_type
    }

    pub fn modifiers(&self) -> &[CatalogObject] {
        &self.data.modifiers
    }

    /// The list object itself, without its list data
    pub fn object(&self) -> &CatalogObject {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut CatalogObject {
        &mut self.object
    }

    pub fn modifiers_mut(&mut self) -> &mut Vec<CatalogObject> {
        &mut self.data.modifiers
    }

    /// Reassemble the full catalog object, e.g. to upsert it
    pub fn into_object(self) -> CatalogObject {
        let mut object = self.object;
        object.modifier_list_data = Some(self.data);
        object
    }
}

impl TryFrom<CatalogObject> for ModifierList {
    type Error = CatalogError;

    fn try_from(mut object: CatalogObject) -> Result<Self, Self::Error> {
        if object.object_type != CatalogObjectType::ModifierList {
            return Err(CatalogError::WrongType {
                id: object.id,
                expected: CatalogObjectType::ModifierList.as_str(),
                found: object.object_type.as_str(),
            });
        }

        let data = object.modifier_list_data.take().ok_or_else(|| CatalogError::MissingData {
            id: object.id.clone(),
            field: "modifier_list_data",
        })?;

        // Writing it back would replace the server's value with UNKNOWN
        if data.selection_type == SelectionType::Unknown {
            return Err(CatalogError::UnknownSelectionType { id: object.id });
        }

        Ok(ModifierList { object, data })
    }
}

impl Container for ModifierList {
    type Item = CatalogObject;

    fn name(&self) -> &str {
        &self.data.name
    }

    fn discriminant(&self) -> &str {
        self.data.selection_type.as_str()
    }

    fn children(&self) -> &[CatalogObject] {
        &self.data.modifiers
    }

    fn append_children(&mut self, items: Vec<CatalogObject>) {
        self.data.modifiers.extend(items);
    }

    fn into_children(self) -> Vec<CatalogObject> {
        self.data.modifiers
    }
}

impl Child for CatalogObject {
    fn name(&self) -> &str {
        self.display_name()
    }

    fn amount(&self) -> Option<i64> {
        self.price_amount()
    }
}

/// Merger for modifier lists: standard signatures, modifiers re-pointed at
/// the target list when attached.
pub fn modifier_list_merger() -> CatalogMerger<ModifierList> {
    CatalogMerger::new(strip_modifier_metadata)
}

// ============================================================================
// TESTS
// ============================================================================
