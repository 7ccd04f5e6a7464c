// Catalog Model - Objects as the hosted catalog API sends them
//
// - object:        serde wire types (CatalogObject, Money, list/modifier data)
// - modifier_list: Container/Child adapters used by the merge engine

pub mod modifier_list;
pub mod object;

pub use modifier_list::{modifier_list_merger, CatalogError, ModifierList};
pub use object::{CatalogObject, CatalogObjectType, ModifierData, ModifierListData, Money, SelectionType};
