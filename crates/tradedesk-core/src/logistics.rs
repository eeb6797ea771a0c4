//! Shipments and tracking milestones

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::{matches_eq, matches_search};
use crate::organization::Incoterm;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Sea,
    Air,
    Road,
    Rail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Booked,
    InTransit,
    AtCustoms,
    Delivered,
    Delayed,
}

impl ShipmentStatus {
    pub fn is_active(self) -> bool {
        self != ShipmentStatus::Delivered
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub label: String,
    pub location: String,
    pub occurred_at: DateTime<Utc>,
    /// Status the shipment moved into at this milestone
    pub status: Option<ShipmentStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: String,
    /// Human-facing booking reference, e.g. "SHP-2024-0012"
    pub reference: String,
    pub sourcing_request_id: Option<String>,
    pub origin: String,
    pub destination: String,
    pub mode: TransportMode,
    pub incoterm: Incoterm,
    pub status: ShipmentStatus,
    pub eta: Option<NaiveDate>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Shipment {
    pub fn record(&mut self, milestone: NewMilestone) -> Result<&Milestone> {
        if milestone.label.trim().is_empty() {
            return Err(Error::InvalidRequest("label is required".to_string()));
        }
        if let Some(status) = milestone.status {
            self.status = status;
        }
        if let Some(eta) = milestone.eta {
            self.eta = Some(eta);
        }
        self.milestones.push(Milestone {
            label: milestone.label,
            location: milestone.location,
            occurred_at: milestone.occurred_at.unwrap_or_else(Utc::now),
            status: milestone.status,
        });
        let idx = self.milestones.len() - 1;
        Ok(&self.milestones[idx])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMilestone {
    pub label: String,
    #[serde(default)]
    pub location: String,
    pub occurred_at: Option<DateTime<Utc>>,
    pub status: Option<ShipmentStatus>,
    /// Revised arrival estimate
    pub eta: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShipment {
    pub reference: String,
    pub sourcing_request_id: Option<String>,
    pub origin: String,
    pub destination: String,
    pub mode: TransportMode,
    pub incoterm: Option<Incoterm>,
    pub eta: Option<NaiveDate>,
}

impl NewShipment {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("reference", &self.reference),
            ("origin", &self.origin),
            ("destination", &self.destination),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidRequest(format!("{} is required", field)));
            }
        }
        Ok(())
    }

    pub fn into_shipment(self, default_incoterm: Incoterm) -> Shipment {
        Shipment {
            id: crate::new_id("shp"),
            reference: self.reference,
            sourcing_request_id: self.sourcing_request_id,
            origin: self.origin,
            destination: self.destination,
            mode: self.mode,
            incoterm: self.incoterm.unwrap_or(default_incoterm),
            status: ShipmentStatus::Booked,
            eta: self.eta,
            milestones: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipmentFilter {
    pub search: Option<String>,
    pub status: Option<ShipmentStatus>,
    pub mode: Option<TransportMode>,
}

impl ShipmentFilter {
    pub fn matches(&self, shipment: &Shipment) -> bool {
        matches_eq(self.status.as_ref(), &shipment.status)
            && matches_eq(self.mode.as_ref(), &shipment.mode)
            && matches_search(
                self.search.as_deref(),
                [
                    shipment.reference.as_str(),
                    shipment.origin.as_str(),
                    shipment.destination.as_str(),
                ],
            )
    }
}
