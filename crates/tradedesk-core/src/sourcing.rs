//! Sourcing requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::{matches_eq, matches_search};
use crate::organization::Incoterm;
use crate::{Error, Result};

/// Monetary amount in minor units (cents) of an ISO 4217 currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount_minor: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcingStatus {
    Draft,
    Submitted,
    Quoting,
    Awarded,
    Closed,
    Cancelled,
}

impl SourcingStatus {
    /// Still in play on the dashboard
    pub fn is_open(self) -> bool {
        matches!(
            self,
            SourcingStatus::Draft | SourcingStatus::Submitted | SourcingStatus::Quoting
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingRequest {
    pub id: String,
    pub title: String,
    pub product_category: String,
    pub description: String,
    pub quantity: u64,
    /// e.g. "MT", "pcs", "40ft container"
    pub unit: String,
    pub target_price: Option<Money>,
    pub destination_country: String,
    pub incoterm: Incoterm,
    pub status: SourcingStatus,
    pub requested_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSourcingRequest {
    pub title: String,
    pub product_category: String,
    #[serde(default)]
    pub description: String,
    pub quantity: u64,
    pub unit: String,
    pub target_price: Option<Money>,
    pub destination_country: String,
    #[serde(default)]
    pub incoterm: Option<Incoterm>,
}

impl NewSourcingRequest {
    pub fn validate(&self) -> Result<()> {
        check_title(&self.title)?;
        check_quantity(self.quantity)?;
        check_target_price(self.target_price.as_ref())
    }

    /// Build a draft request, falling back to the organization's default
    /// incoterm when none was given.
    pub fn into_request(self, requested_by: &str, default_incoterm: Incoterm) -> SourcingRequest {
        let now = Utc::now();
        SourcingRequest {
            id: crate::new_id("src"),
            title: self.title,
            product_category: self.product_category,
            description: self.description,
            quantity: self.quantity,
            unit: self.unit,
            target_price: self.target_price,
            destination_country: self.destination_country,
            incoterm: self.incoterm.unwrap_or(default_incoterm),
            status: SourcingStatus::Draft,
            requested_by: requested_by.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcingPatch {
    pub title: Option<String>,
    pub product_category: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<u64>,
    pub unit: Option<String>,
    pub target_price: Option<Money>,
    pub destination_country: Option<String>,
    pub incoterm: Option<Incoterm>,
    pub status: Option<SourcingStatus>,
}

impl SourcingPatch {
    /// Applies the same field rules as a new request to the fields present
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(quantity) = self.quantity {
            check_quantity(quantity)?;
        }
        check_target_price(self.target_price.as_ref())
    }
}

impl SourcingRequest {
    pub fn apply(&mut self, patch: SourcingPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.product_category {
            self.product_category = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.quantity {
            self.quantity = v;
        }
        if let Some(v) = patch.unit {
            self.unit = v;
        }
        if let Some(v) = patch.target_price {
            self.target_price = Some(v);
        }
        if let Some(v) = patch.destination_country {
            self.destination_country = v;
        }
        if let Some(v) = patch.incoterm {
            self.incoterm = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcingFilter {
    pub search: Option<String>,
    pub status: Option<SourcingStatus>,
    pub category: Option<String>,
}

impl SourcingFilter {
    pub fn matches(&self, request: &SourcingRequest) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| c.is_empty() || request.product_category.eq_ignore_ascii_case(c));
        category_ok
            && matches_eq(self.status.as_ref(), &request.status)
            && matches_search(
                self.search.as_deref(),
                [
                    request.title.as_str(),
                    request.description.as_str(),
                    request.product_category.as_str(),
                ],
            )
    }
}

fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidRequest("title is required".to_string()));
    }
    Ok(())
}

fn check_quantity(quantity: u64) -> Result<()> {
    if quantity == 0 {
        return Err(Error::InvalidRequest(
            "quantity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn check_target_price(price: Option<&Money>) -> Result<()> {
    if let Some(price) = price
        && price.amount_minor < 0
    {
        return Err(Error::InvalidRequest(
            "target_price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_request() -> NewSourcingRequest {
        NewSourcingRequest {
            title: "HDPE granules, film grade".to_string(),
            product_category: "Polymers".to_string(),
            description: "Blown film grade, MFI 0.3".to_string(),
            quantity: 50,
            unit: "MT".to_string(),
            target_price: Some(Money {
                amount_minor: 115_000,
                currency: "USD".to_string(),
            }),
            destination_country: "KE".to_string(),
            incoterm: None,
        }
    }

    #[test]
    fn test_new_request_is_draft_with_default_incoterm() {
        let req = new_request().into_request("mem_1", Incoterm::Cif);
        assert_eq!(req.status, SourcingStatus::Draft);
        assert_eq!(req.incoterm, Incoterm::Cif);
        assert!(req.id.starts_with("src_"));
    }

    #[test]
    fn test_validation() {
        assert!(new_request().validate().is_ok());
        let mut bad = new_request();
        bad.quantity = 0;
        assert!(bad.validate().is_err());
        let mut bad = new_request();
        bad.target_price = Some(Money {
            amount_minor: -1,
            currency: "USD".to_string(),
        });
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_patch_validation_checks_present_fields() {
        assert!(SourcingPatch::default().validate().is_ok());
        let patch = SourcingPatch {
            quantity: Some(0),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(Error::InvalidRequest(_))));
        let patch = SourcingPatch {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        let patch = SourcingPatch {
            target_price: Some(Money {
                amount_minor: -500,
                currency: "USD".to_string(),
            }),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        let patch = SourcingPatch {
            quantity: Some(75),
            description: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_filter() {
        let req = new_request().into_request("mem_1", Incoterm::Fob);
        let filter = SourcingFilter {
            search: Some("film".to_string()),
            status: Some(SourcingStatus::Draft),
            category: Some("polymers".to_string()),
        };
        assert!(filter.matches(&req));
        let filter = SourcingFilter {
            status: Some(SourcingStatus::Awarded),
            ..Default::default()
        };
        assert!(!filter.matches(&req));
    }

    #[test]
    fn test_any_status_change_is_allowed() {
        let mut req = new_request().into_request("mem_1", Incoterm::Fob);
        req.apply(SourcingPatch {
            status: Some(SourcingStatus::Closed),
            ..Default::default()
        });
        req.apply(SourcingPatch {
            status: Some(SourcingStatus::Quoting),
            ..Default::default()
        });
        assert_eq!(req.status, SourcingStatus::Quoting);
        assert!(req.status.is_open());
    }
}
