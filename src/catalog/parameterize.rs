//! Collapsing sibling leaves into a templated route.
//!
//! # Algorithm
//! ```text
//! parameterize(position, example, host)
//!     → resolve example to its registered pattern
//!       (pattern string verbatim if it contains :param, else concrete match)
//!     → collect same-arity patterns compatible everywhere but `position`
//!     → new pattern = resolved pattern with segment[position] = :param<position>
//!     → fold all collected leaves into one
//!     → remove collected patterns, register the new one
//! ```
//!
//! # Design Decisions
//! - Only patterns with identical segment count take part; a path that is a
//!   prefix or extension of the target is never touched
//! - Dynamic segments count as equal to anything during collection, so every
//!   pattern that could overlap the new one is folded into it
//! - All checks happen before the first mutation

use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::leaf::LeafData;
use crate::routing::segment::{is_pattern_string, Pattern};
use crate::routing::Router;
use crate::schema::SchemaAccumulator;

/// Result of a successful parameterize call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameterized {
    /// The pattern now holding the folded data.
    pub pattern: Pattern,
    /// Canonical strings of the patterns that were folded, in fold order.
    pub merged: Vec<String>,
}

/// Find the registered pattern `example` refers to.
pub fn resolve(router: &Router<LeafData>, example: &str) -> CatalogResult<Pattern> {
    if is_pattern_string(example) {
        let pattern = Pattern::parse(example)
            .map_err(|e| CatalogError::InvalidParameterization(e.to_string()))?;
        return router
            .get(&pattern.canonical())
            .map(|route| route.pattern.clone())
            .ok_or_else(|| {
                CatalogError::InvalidParameterization(format!("pattern `{example}` is not registered"))
            });
    }

    router
        .lookup(example)?
        .map(|route| route.pattern.clone())
        .ok_or_else(|| CatalogError::InvalidParameterization(format!("no route matches `{example}`")))
}

/// Canonical strings of every pattern that folds into `resolved` at `position`.
pub fn siblings(router: &Router<LeafData>, resolved: &Pattern, position: usize) -> Vec<String> {
    router
        .routes()
        .filter(|route| route.pattern.overlaps_except(resolved, Some(position)))
        .map(|route| route.pattern.canonical())
        .collect()
}

/// Make `position` dynamic for the family of `example` and fold their data.
pub fn parameterize(
    router: &mut Router<LeafData>,
    position: usize,
    example: &str,
    acc: &dyn SchemaAccumulator,
) -> CatalogResult<Parameterized> {
    let resolved = resolve(router, example)?;
    let target = resolved.with_param_at(position).ok_or_else(|| {
        CatalogError::InvalidParameterization(format!(
            "position {position} is out of range for `{resolved}` ({} segments)",
            resolved.arity()
        ))
    })?;

    // The resolved pattern leads so ties in the fold go its way.
    let resolved_key = resolved.canonical();
    let mut merged = vec![resolved_key.clone()];
    merged.extend(
        siblings(router, &resolved, position)
            .into_iter()
            .filter(|key| *key != resolved_key),
    );

    let mut folded = LeafData::default();
    for key in &merged {
        if let Some(route) = router.remove(key) {
            folded.absorb(route.data, acc);
        }
    }
    router.register(target.clone(), folded);

    Ok(Parameterized {
        pattern: target,
        merged,
    })
}
