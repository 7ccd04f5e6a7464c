// 🧹 Sanitize - Remove source-account data before an object moves accounts
//
// IDs, versions, timestamps and location references only mean something in
// the account they came from. An object bound for another account gets a
// fresh temporary ID (`#...`) and loses everything else account specific.

use crate::catalog::{CatalogObject, CatalogObjectType, ModifierList};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SanitizeError {
    #[error("object {id} is a {found}, expected a {expected}")]
    UnexpectedType {
        id: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("object {id} carries no data for its type")]
    MissingData { id: String },

    #[error("parent '{name}' has no id to attach children to")]
    MissingParentId { name: String },
}

/// Fresh client-side placeholder ID
pub fn temporary_id() -> String {
    format!("#{}", uuid::Uuid::new_v4())
}

/// Clear every account-specific field of `object` and give it a temporary ID.
pub fn strip_source_metadata(object: &mut CatalogObject) {
    object.id = temporary_id();
    object.version = None;
    object.updated_at = None;
    object.is_deleted = Some(false);
    object.catalog_v1_ids.clear();

    // Location IDs do not exist in the target account
    object.present_at_location_ids.clear();
    object.absent_at_location_ids.clear();
    object.present_at_all_locations = Some(true);
}

/// Prepare a source MODIFIER for attachment under `parent`.
pub fn strip_modifier_metadata(parent: &ModifierList, child: &mut CatalogObject) -> Result<(), SanitizeError> {
    if child.object_type != CatalogObjectType::Modifier {
        return Err(SanitizeError::UnexpectedType {
            id: child.id.clone(),
            expected: CatalogObjectType::Modifier.as_str(),
            found: child.object_type.as_str(),
        });
    }
    if child.modifier_data.is_none() {
        return Err(SanitizeError::MissingData { id: child.id.clone() });
    }
    if parent.id().is_empty() {
        return Err(SanitizeError::MissingParentId {
            name: parent.object().display_name().to_string(),
        });
    }

    strip_source_metadata(child);
    if let Some(data) = child.modifier_data.as_mut() {
        data.modifier_list_id = Some(parent.id().to_string());
    }

    Ok(())
}

/// Turn a source list with no target twin into a brand-new list for the
/// target account. Nested modifiers point at the list's temporary ID, which
/// the API resolves within the same upsert batch.
pub fn prepare_clone(list: ModifierList) -> Result<ModifierList, SanitizeError> {
    let mut list = list;
    strip_source_metadata(list.object_mut());

    let mut modifiers = std::mem::take(list.modifiers_mut());
    for modifier in modifiers.iter_mut() {
        strip_modifier_metadata(&list, modifier)?;
    }
    *list.modifiers_mut() = modifiers;

    Ok(list)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Money, SelectionType};
    use crate::signature::Container;

    fn create_source_modifier(id: &str, name: &str) -> CatalogObject {
        let mut modifier = CatalogObject::modifier(id, name, Some(Money::new(100, "USD")));
        modifier.version = Some(42);
        modifier.updated_at = Some(chrono::Utc::now());
        modifier.present_at_all_locations = Some(false);
        modifier.present_at_location_ids = vec!["LOC-A".to_string()];
        if let Some(data) = modifier.modifier_data.as_mut() {
            data.modifier_list_id = Some("SRC-LIST".to_string());
        }
        modifier
    }

    fn create_list(id: &str, modifiers: Vec<CatalogObject>) -> ModifierList {
        let object = CatalogObject::modifier_list(id, "Size", SelectionType::Single, modifiers);
        ModifierList::try_from(object).unwrap()
    }

    #[test]
    fn test_strip_source_metadata() {
        let mut modifier = create_source_modifier("MOD-1", "Large");
        strip_source_metadata(&mut modifier);

        assert!(modifier.has_temporary_id());
        assert_eq!(modifier.version, None);
        assert_eq!(modifier.is_deleted, Some(false));
        assert_eq!(modifier.updated_at, None);
        assert!(modifier.present_at_location_ids.is_empty());
        assert_eq!(modifier.present_at_all_locations, Some(true));

        // Semantic fields survive
        assert_eq!(modifier.display_name(), "Large");
        assert_eq!(modifier.price_amount(), Some(100));
    }

    #[test]
    fn test_temporary_ids_are_unique() {
        assert_ne!(temporary_id(), temporary_id());
    }

    #[test]
    fn test_strip_modifier_metadata_repoints_parent() {
        let parent = create_list("TGT-LIST", vec![]);
        let mut modifier = create_source_modifier("MOD-1", "Large");

        strip_modifier_metadata(&parent, &mut modifier).unwrap();
        assert_eq!(
            modifier.modifier_data.unwrap().modifier_list_id.as_deref(),
            Some("TGT-LIST")
        );
    }

    #[test]
    fn test_strip_modifier_metadata_rejects_non_modifier() {
        let parent = create_list("TGT-LIST", vec![]);
        let mut other = CatalogObject::modifier_list("L2", "Other", SelectionType::Single, vec![]);

        let err = strip_modifier_metadata(&parent, &mut other).unwrap_err();
        assert!(matches!(err, SanitizeError::UnexpectedType { .. }));
        // Untouched on failure
        assert_eq!(other.id, "L2");
    }

    #[test]
    fn test_strip_modifier_metadata_requires_data() {
        let parent = create_list("TGT-LIST", vec![]);
        let mut modifier = create_source_modifier("MOD-1", "Large");
        modifier.modifier_data = None;

        let err = strip_modifier_metadata(&parent, &mut modifier).unwrap_err();
        assert_eq!(err, SanitizeError::MissingData { id: "MOD-1".to_string() });
    }

    #[test]
    fn test_strip_modifier_metadata_requires_parent_id() {
        let parent = create_list("", vec![]);
        let mut modifier = create_source_modifier("MOD-1", "Large");

        let err = strip_modifier_metadata(&parent, &mut modifier).unwrap_err();
        assert!(matches!(err, SanitizeError::MissingParentId { .. }));
    }

    #[test]
    fn test_prepare_clone() {
        let source = create_list(
            "SRC-LIST",
            vec![create_source_modifier("M1", "Small"), create_source_modifier("M2", "Large")],
        );

        let clone = prepare_clone(source).unwrap();
        assert!(clone.object().has_temporary_id());
        assert_eq!(clone.name(), "Size");

        for modifier in clone.modifiers() {
            assert!(modifier.has_temporary_id());
            assert_eq!(
                modifier.modifier_data.as_ref().unwrap().modifier_list_id.as_deref(),
                Some(clone.id())
            );
        }
        let names: Vec<&str> = clone.modifiers().iter().map(|m| m.display_name()).collect();
        assert_eq!(names, vec!["Small", "Large"]);
    }
}
