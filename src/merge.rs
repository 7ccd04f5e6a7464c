// 🔀 Merge Engine - Fold source containers into their target twins
//
// Matcher: source container → first target container with the same signature
// Merger:  source children not already in the target → appended to the target
//
// The algorithm knows nothing about modifier lists. Each entity kind hands in
// its own encoders and sanitizer, so a new kind is a new set of functions,
// not a new type hierarchy.

use crate::sanitize::SanitizeError;
use crate::signature::{encode_child, encode_container, Container};
use std::collections::HashSet;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("could not prepare child '{child}' for '{container}': {source}")]
    Sanitize {
        container: String,
        child: String,
        #[source]
        source: SanitizeError,
    },
}

// ============================================================================
// FUNCTION SHAPES
// ============================================================================

pub type ContainerEncoder<C> = fn(&C) -> String;
pub type ChildEncoder<C> = fn(&<C as Container>::Item) -> String;

/// Strips source-account data from a child before it is attached to the
/// given (target) parent.
pub type Sanitizer<C> = fn(&C, &mut <C as Container>::Item) -> Result<(), SanitizeError>;

// ============================================================================
// CATALOG MERGER
// ============================================================================

pub struct CatalogMerger<C: Container> {
    encode_container: ContainerEncoder<C>,
    encode_child: ChildEncoder<C>,
    sanitize: Sanitizer<C>,
}

impl<C: Container> CatalogMerger<C> {
    /// Merger using the standard signature encoders
    pub fn new(sanitize: Sanitizer<C>) -> Self {
        CatalogMerger {
            encode_container: encode_container::<C>,
            encode_child: encode_child::<C::Item>,
            sanitize,
        }
    }

    /// Merger with custom equality encodings
    pub fn with_encoders(
        encode_container: ContainerEncoder<C>,
        encode_child: ChildEncoder<C>,
        sanitize: Sanitizer<C>,
    ) -> Self {
        CatalogMerger {
            encode_container,
            encode_child,
            sanitize,
        }
    }

    pub fn container_signature(&self, container: &C) -> String {
        (self.encode_container)(container)
    }

    pub fn child_signature(&self, child: &C::Item) -> String {
        (self.encode_child)(child)
    }

    /// Position of the first target with the same signature as `source`.
    ///
    /// When the target account already holds duplicates, the earliest one in
    /// `targets` order wins. That is only as stable as the order the API
    /// lists objects in.
    pub fn find_match_index(&self, source: &C, targets: &[C]) -> Option<usize> {
        let signature = self.container_signature(source);
        targets
            .iter()
            .position(|target| self.container_signature(target) == signature)
    }

    /// The target twin of `source`, if any.
    pub fn find_match<'t>(&self, source: &C, targets: &'t [C]) -> Option<&'t C> {
        self.find_match_index(source, targets).map(|i| &targets[i])
    }

    /// Signatures of every child currently in `target`.
    pub fn child_signatures(&self, target: &C) -> HashSet<String> {
        target
            .children()
            .iter()
            .map(|child| self.child_signature(child))
            .collect()
    }

    /// Move the children of `source` that `target` does not already have
    /// onto the end of `target`.
    ///
    /// Returns `Ok(None)` when nothing was added and `Ok(Some(target))` when
    /// the target changed and should be written back. Every new child is
    /// sanitized before any of them is attached, so an error leaves `target`
    /// untouched. Equivalent children within one source are appended once,
    /// not once each.
    pub fn merge_into<'t>(&self, source: C, target: &'t mut C) -> Result<Option<&'t C>, MergeError> {
        let mut seen = self.child_signatures(target);
        let container = source.name().to_string();

        let mut staged = Vec::new();
        for mut child in source.into_children() {
            let signature = self.child_signature(&child);
            if seen.contains(&signature) {
                continue;
            }

            (self.sanitize)(target, &mut child).map_err(|source| MergeError::Sanitize {
                container: container.clone(),
                child: signature.clone(),
                source,
            })?;

            seen.insert(signature);
            staged.push(child);
        }

        if staged.is_empty() {
            return Ok(None);
        }

        target.append_children(staged);
        Ok(Some(target))
    }
}

// ============================================================================
// TESTS
// ============================================================================
