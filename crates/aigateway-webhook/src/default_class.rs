//! At-most-one-default enforcement for class kinds
//!
//! A class becomes the family default through its reserved annotation (see
//! [`DefaultClass`]). Admitting a class that claims to be default lists every
//! existing class of the same kind and rejects the request if any *other*
//! class already holds the annotation.
//!
//! # Race window
//!
//! The check and the write it guards are not atomic. Two requests that both
//! mark a different class as default can each list before the other is
//! persisted, both pass, and leave two defaults behind. Nothing here locks
//! or serializes admissions, and nothing repairs the state afterwards.
//! Closing the window needs a compare-and-swap on a single record owned by
//! a coordinator, not a scan over all classes.

use std::future::Future;

use kube::ResourceExt;
use tracing::{debug, error};

use aigateway_common::crd::DefaultClass;
use aigateway_common::{Error, Result};

/// Find an existing class, other than the candidate, that is already default
///
/// Objects are matched by name, so a class keeping its own default flag on
/// update never conflicts with its stored self. Returns the first conflict in
/// listing order.
pub fn find_conflicting_default<'a, K: DefaultClass>(
    candidate: &K,
    existing: &'a [K],
) -> Option<&'a K> {
    let name = candidate.name_any();
    existing
        .iter()
        .find(|class| class.name_any() != name && class.is_default_class())
}

/// Reject `candidate` if it claims default while another class already does
///
/// `list` is only awaited when the candidate carries the default annotation;
/// non-default classes cost nothing and cannot conflict. A failed listing is
/// returned as [`Error::ListFailed`] so callers fail closed.
pub async fn ensure_single_default<K, F, Fut>(candidate: &K, list: F) -> Result<()>
where
    K: DefaultClass,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<K>>>,
{
    if !candidate.is_default_class() {
        return Ok(());
    }

    let kind = K::kind(&()).to_string();
    let name = candidate.name_any();

    let existing = list().await.map_err(|e| {
        error!(kind = %kind, name = %name, error = %e, "Failed to list existing classes");
        Error::list_failed(&kind, e)
    })?;

    debug!(
        kind = %kind,
        name = %name,
        existing = existing.len(),
        "Checking default class uniqueness"
    );

    match find_conflicting_default(candidate, &existing) {
        Some(conflict) => Err(Error::singleton_conflict(
            kind,
            conflict.name_any(),
            K::DEFAULT_ANNOTATION,
        )),
        None => Ok(()),
    }
}
