//! Name-or-ID resolution
//!
//! Commands accept either a numeric resource ID or a resource name. Numeric
//! tokens are taken as-is; anything else is looked up by exact name in the
//! listing for the target category and must match exactly one resource.

use crate::error::ResolveError;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;

/// Resource categories that can be addressed by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Oci,
    Ovs,
    Ordb,
    Opn,
    Container,
}

impl Category {
    /// Label used in user-facing messages
    pub fn label(self) -> &'static str {
        match self {
            Category::Oci => "OCI",
            Category::Ovs => "OVS",
            Category::Ordb => "ORDB",
            Category::Opn => "OPN",
            Category::Container => "container",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An `(id, name)` pair as exposed by a listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedResource {
    pub id: i64,
    pub name: String,
}

impl NamedResource {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Something that can enumerate the resources of a category
pub trait Lister {
    fn list(
        &self,
        category: Category,
    ) -> impl Future<Output = anyhow::Result<Vec<NamedResource>>>;
}

/// Parse a token as a literal ID
pub fn parse_id(token: &str) -> Option<i64> {
    token.trim().parse().ok()
}

/// Find the single resource whose name equals `token`
pub fn find_by_name(
    category: Category,
    token: &str,
    items: &[NamedResource],
) -> Result<i64, ResolveError> {
    let ids: Vec<i64> = items
        .iter()
        .filter(|item| item.name == token)
        .map(|item| item.id)
        .collect();

    match ids.as_slice() {
        [] => Err(ResolveError::NotFound {
            category,
            token: token.to_string(),
        }),
        [id] => Ok(*id),
        _ => Err(ResolveError::Ambiguous {
            category,
            token: token.to_string(),
            matches: ids.len(),
        }),
    }
}

/// Resolve a token, calling `lister` only when the token is not numeric
pub async fn resolve_with<F, Fut>(
    category: Category,
    token: &str,
    lister: F,
) -> Result<i64, ResolveError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<Vec<NamedResource>>>,
{
    if let Some(id) = parse_id(token) {
        return Ok(id);
    }

    let items = lister().await?;
    tracing::debug!(
        "Resolving {} \"{}\" against {} entries",
        category,
        token,
        items.len()
    );
    find_by_name(category, token, &items)
}

/// Resolver bound to one listing source for the duration of a command.
///
/// Listings are cached per category, so resolving two names of the same kind
/// costs a single remote call.
pub struct Resolver<'a, L> {
    lister: &'a L,
    cache: HashMap<Category, Vec<NamedResource>>,
}

impl<'a, L: Lister> Resolver<'a, L> {
    pub fn new(lister: &'a L) -> Self {
        Self {
            lister,
            cache: HashMap::new(),
        }
    }

    pub async fn resolve(&mut self, category: Category, token: &str) -> Result<i64, ResolveError> {
        let Self { lister, cache } = self;

        resolve_with(category, token, || async move {
            if let Some(items) = cache.get(&category) {
                return Ok(items.clone());
            }
            let items = lister.list(category).await?;
            cache.insert(category, items.clone());
            Ok(items)
        })
        .await
    }

    /// Resolve an optional token
    pub async fn resolve_opt(
        &mut self,
        category: Category,
        token: Option<&str>,
    ) -> Result<Option<i64>, ResolveError> {
        match token {
            Some(token) => self.resolve(category, token).await.map(Some),
            None => Ok(None),
        }
    }
}
