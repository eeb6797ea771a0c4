//! Tenant-scoped row storage shared by the in-memory stores

use std::collections::HashMap;

use tokio::sync::RwLock;
use tradedesk_core::TenantId;

/// Records addressable by a string id
pub(crate) trait Record: Clone + Send + Sync {
    fn id(&self) -> &str;
}

/// `Vec` of rows per tenant. All lookups are linear scans.
pub(crate) struct TenantTable<T> {
    rows: RwLock<HashMap<TenantId, Vec<T>>>,
}

impl<T: Record> TenantTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) async fn push(&self, tenant: TenantId, row: T) -> T {
        let mut rows = self.rows.write().await;
        rows.entry(tenant).or_default().push(row.clone());
        row
    }

    pub(crate) async fn filter<F>(&self, tenant: TenantId, pred: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let rows = self.rows.read().await;
        rows.get(&tenant)
            .map(|r| r.iter().filter(|row| pred(row)).cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) async fn find(&self, tenant: TenantId, id: &str) -> Option<T> {
        let rows = self.rows.read().await;
        rows.get(&tenant)?.iter().find(|row| row.id() == id).cloned()
    }

    /// Apply `f` to the row with `id`, returning its result and the updated row.
    pub(crate) async fn modify<F, R>(&self, tenant: TenantId, id: &str, f: F) -> Option<(R, T)>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&tenant)?.iter_mut().find(|row| row.id() == id)?;
        let out = f(row);
        Some((out, row.clone()))
    }

    pub(crate) async fn remove(&self, tenant: TenantId, id: &str) -> bool {
        let mut rows = self.rows.write().await;
        let Some(tenant_rows) = rows.get_mut(&tenant) else {
            return false;
        };
        let before = tenant_rows.len();
        tenant_rows.retain(|row| row.id() != id);
        tenant_rows.len() != before
    }
}
