// 🔑 Signature Encoding - Equality keys that ignore account identifiers
//
// Two catalog entities from different accounts never share an ID, so
// "same thing" has to be decided from the fields a human would compare:
//   Container → name + discriminant
//   Child     → name + price (absent price == 0)

// ============================================================================
// DELIMITER
// ============================================================================

/// Separator between encoded fields. Chosen so it does not show up in
/// ordinary catalog names.
pub const DELIMITER: &str = ":::";

// ============================================================================
// ENTITY SHAPES
// ============================================================================

/// A named grouping entity that owns an ordered list of children
/// (e.g. a modifier list).
pub trait Container {
    type Item: Child;

    fn name(&self) -> &str;

    /// Type-level attribute that separates containers with the same name
    /// (e.g. SINGLE vs MULTIPLE selection).
    fn discriminant(&self) -> &str;

    fn children(&self) -> &[Self::Item];

    /// Append children at the tail, keeping their order.
    fn append_children(&mut self, items: Vec<Self::Item>);

    /// Give up ownership of the children.
    fn into_children(self) -> Vec<Self::Item>
    where
        Self: Sized;
}

/// An item owned by exactly one container (e.g. a modifier).
pub trait Child {
    fn name(&self) -> &str;

    /// Monetary amount in the smallest currency unit, if any.
    fn amount(&self) -> Option<i64>;
}

// ============================================================================
// ENCODERS
// ============================================================================

/// `name:::discriminant`. Never looks at children or IDs.
pub fn encode_container<C: Container>(container: &C) -> String {
    format!("{}{}{}", container.name(), DELIMITER, container.discriminant())
}

/// `name:::amount`, with an absent amount encoded as `0`.
pub fn encode_child<K: Child>(child: &K) -> String {
    format!("{}{}{}", child.name(), DELIMITER, child.amount().unwrap_or(0))
}

// ============================================================================
// TESTS
// ============================================================================
