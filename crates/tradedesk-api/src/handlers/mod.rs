//! Route handlers, one module per portal area

pub mod account;
pub mod billing;
pub mod dashboard;
pub mod logistics;
pub mod messages;
pub mod resources;
pub mod settings;
pub mod sourcing;

use tradedesk_core::TenantId;
use tradedesk_core::organization::Incoterm;

use crate::{AppState, ApiResult};

/// Incoterm applied to new sourcing requests and shipments that omit one
async fn default_incoterm(state: &AppState, tenant: TenantId) -> ApiResult<Incoterm> {
    let settings = state.stores.settings.get(tenant).await?;
    Ok(settings.organization.default_incoterm)
}
