//! Collection walker
//!
//! Fetches a collection envelope and resolves every member reference into a
//! typed record. Walks are all-or-nothing: the first failing member aborts
//! the walk and no partial sequence is returned. Output order always equals
//! envelope order, including when members are resolved concurrently.

use futures::stream::{self, StreamExt, TryStreamExt};
use redfish_core::{CollectionEnvelope, Link, ResourceReference};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::Result;
use crate::resolver::ResourceResolver;

/// Predicate applied to member references before they are resolved
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MemberFilter {
    /// Resolve every member
    #[default]
    All,
    /// Resolve members whose reference contains the pattern
    Contains(String),
}

impl MemberFilter {
    pub fn contains(pattern: impl Into<String>) -> Self {
        Self::Contains(pattern.into())
    }

    /// Installed entries of a firmware inventory
    pub fn installed() -> Self {
        Self::contains("Installed")
    }

    pub fn matches(&self, reference: &ResourceReference) -> bool {
        match self {
            Self::All => true,
            Self::Contains(pattern) => reference.contains(pattern),
        }
    }
}

/// Walks collections through a [`ResourceResolver`]
#[derive(Debug, Clone, Copy)]
pub struct CollectionWalker<'a> {
    resolver: &'a ResourceResolver,
    concurrency: usize,
}

impl<'a> CollectionWalker<'a> {
    /// `concurrency` of 1 (or 0) resolves members strictly one after another
    pub fn new(resolver: &'a ResourceResolver, concurrency: usize) -> Self {
        Self {
            resolver,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch the member list of a collection
    pub async fn envelope(&self, collection: &ResourceReference) -> Result<CollectionEnvelope> {
        let envelope: CollectionEnvelope = self.resolver.resolve(collection).await?;
        if !envelope.count_is_consistent() {
            warn!(
                %collection,
                declared = ?envelope.declared_count,
                actual = envelope.len(),
                "Collection count disagrees with members, using members"
            );
        }
        Ok(envelope)
    }

    /// Resolve every member of `collection` that passes `filter`
    pub async fn walk<T>(
        &self,
        collection: &ResourceReference,
        filter: &MemberFilter,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Default,
    {
        let envelope = self.envelope(collection).await?;
        let references: Vec<ResourceReference> = envelope
            .references()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        debug!(
            %collection,
            members = envelope.len(),
            selected = references.len(),
            "Walking collection"
        );
        self.resolve_members(references).await
    }

    /// Resolve links embedded in a parent resource (e.g. storage `Drives`)
    pub async fn resolve_links<T>(&self, links: &[Link]) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Default,
    {
        self.resolve_members(links.iter().map(|l| l.odata_id.clone()).collect())
            .await
    }

    /// Resolve references in order, failing on the first error
    pub async fn resolve_members<T>(&self, references: Vec<ResourceReference>) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Default,
    {
        let resolver = self.resolver;
        stream::iter(references)
            .map(move |reference| async move { resolver.resolve::<T>(&reference).await })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
