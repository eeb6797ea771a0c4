//! In-memory shipment store

use async_trait::async_trait;
use tracing::info;

use tradedesk_core::logistics::{NewMilestone, NewShipment, Shipment, ShipmentFilter};
use tradedesk_core::organization::Incoterm;
use tradedesk_core::store::ShipmentStore;
use tradedesk_core::{Error, Result, TenantId};

use crate::Latency;
use crate::table::{Record, TenantTable};

impl Record for Shipment {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct MemoryShipmentStore {
    shipments: TenantTable<Shipment>,
    latency: Latency,
}

impl MemoryShipmentStore {
    pub fn new(latency: Latency) -> Self {
        Self {
            shipments: TenantTable::new(),
            latency,
        }
    }

    /// Insert a shipment as-is (seeding)
    pub async fn insert(&self, tenant: TenantId, shipment: Shipment) {
        self.shipments.push(tenant, shipment).await;
    }
}

#[async_trait]
impl ShipmentStore for MemoryShipmentStore {
    async fn list(&self, tenant: TenantId, filter: &ShipmentFilter) -> Result<Vec<Shipment>> {
        self.latency.wait().await;
        let mut rows = self.shipments.filter(tenant, |s| filter.matches(s)).await;
        rows.sort_by(|a, b| a.eta.cmp(&b.eta));
        Ok(rows)
    }

    async fn get(&self, tenant: TenantId, id: &str) -> Result<Shipment> {
        self.latency.wait().await;
        self.shipments
            .find(tenant, id)
            .await
            .ok_or_else(|| Error::not_found("Shipment", id))
    }

    async fn book(&self, tenant: TenantId, shipment: NewShipment) -> Result<Shipment> {
        shipment.validate()?;
        self.latency.wait().await;
        let shipment = shipment.into_shipment(Incoterm::default());
        info!(
            tenant = %tenant,
            shipment = %shipment.reference,
            mode = ?shipment.mode,
            "Booked shipment"
        );
        Ok(self.shipments.push(tenant, shipment).await)
    }

    async fn add_milestone(
        &self,
        tenant: TenantId,
        id: &str,
        milestone: NewMilestone,
    ) -> Result<Shipment> {
        self.latency.wait().await;
        let (recorded, shipment) = self
            .shipments
            .modify(tenant, id, |s| s.record(milestone).map(|_| ()))
            .await
            .ok_or_else(|| Error::not_found("Shipment", id))?;
        recorded?;
        Ok(shipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradedesk_core::logistics::{ShipmentStatus, TransportMode};

    fn new_shipment(reference: &str, mode: TransportMode) -> NewShipment {
        NewShipment {
            reference: reference.to_string(),
            sourcing_request_id: None,
            origin: "Chennai".to_string(),
            destination: "Felixstowe".to_string(),
            mode,
            incoterm: None,
            eta: None,
        }
    }

    #[tokio::test]
    async fn test_book_and_track() {
        let store = MemoryShipmentStore::new(Latency::none());
        let tenant = TenantId::new();
        let shipment = store
            .book(tenant, new_shipment("SHP-1", TransportMode::Sea))
            .await
            .unwrap();
        store
            .book(tenant, new_shipment("SHP-2", TransportMode::Air))
            .await
            .unwrap();

        let updated = store
            .add_milestone(
                tenant,
                &shipment.id,
                NewMilestone {
                    label: "Arrived at port".to_string(),
                    location: "Felixstowe".to_string(),
                    occurred_at: None,
                    status: Some(ShipmentStatus::AtCustoms),
                    eta: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ShipmentStatus::AtCustoms);
        assert_eq!(updated.milestones.len(), 1);

        let sea = ShipmentFilter {
            mode: Some(TransportMode::Sea),
            ..Default::default()
        };
        assert_eq!(store.list(tenant, &sea).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_milestone_is_rejected() {
        let store = MemoryShipmentStore::new(Latency::none());
        let tenant = TenantId::new();
        let shipment = store
            .book(tenant, new_shipment("SHP-1", TransportMode::Rail))
            .await
            .unwrap();
        let result = store
            .add_milestone(
                tenant,
                &shipment.id,
                NewMilestone {
                    label: String::new(),
                    location: String::new(),
                    occurred_at: None,
                    status: None,
                    eta: None,
                },
            )
            .await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }
}
