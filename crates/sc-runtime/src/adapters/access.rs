//! Access-control adapter

use shared_types::{AccountAddress, CallerAuthorizer};
use std::collections::HashSet;

/// Fixed allow-list authorizer resolved at startup.
///
/// The real chain delegates this decision to its governance module; the
/// engine only ever asks "is this caller authorized".
#[derive(Debug)]
pub struct StaticAuthorizer {
    allowed: Option<HashSet<AccountAddress>>,
}

impl StaticAuthorizer {
    /// Authorize everyone (tests, single-operator deployments).
    pub fn allow_all() -> Self {
        Self { allowed: None }
    }

    /// Authorize exactly the given callers.
    pub fn allow(callers: impl IntoIterator<Item = AccountAddress>) -> Self {
        Self {
            allowed: Some(callers.into_iter().collect()),
        }
    }
}

impl CallerAuthorizer for StaticAuthorizer {
    fn is_authorized(&self, caller: &AccountAddress) -> bool {
        match &self.allowed {
            None => true,
            Some(set) => set.contains(caller),
        }
    }
}
