//! Account store seam. The gate consults this interface for the
//! watch-only veto and never writes through it.

use std::collections::HashSet;

pub trait AccountStore: Send + Sync {
    fn is_watch_only(&self, wallet_id: &str, account_id: &str) -> bool;
}

/// Any predicate closure is an account store; this supports injecting a
/// watch-only override without a persisted store behind it.
impl<F> AccountStore for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn is_watch_only(&self, wallet_id: &str, account_id: &str) -> bool {
        self(wallet_id, account_id)
    }
}

/// In-memory account store. Accounts default to signing-capable; only
/// explicitly marked accounts are watch-only.
#[derive(Default)]
pub struct MemoryAccountStore {
    watch_only: HashSet<(String, String)>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_watch_only(&mut self, wallet_id: impl Into<String>, account_id: impl Into<String>) {
        self.watch_only.insert((wallet_id.into(), account_id.into()));
    }
}

impl AccountStore for MemoryAccountStore {
    fn is_watch_only(&self, wallet_id: &str, account_id: &str) -> bool {
        self.watch_only
            .contains(&(wallet_id.to_string(), account_id.to_string()))
    }
}
