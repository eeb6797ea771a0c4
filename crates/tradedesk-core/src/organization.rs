//! Organization record
//!
//! The organization is the tenant's legal and commercial identity. It is
//! updated wholesale by merging a patch over the stored record; required
//! fields are reported as hints rather than enforced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::billing::Tier;
use crate::tenant::TenantId;

/// International commercial terms (Incoterms 2020).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Incoterm {
    Exw,
    Fca,
    Fas,
    #[default]
    Fob,
    Cfr,
    Cif,
    Cpt,
    Cip,
    Dap,
    Dpu,
    Ddp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTerms {
    Prepaid,
    Net15,
    #[default]
    Net30,
    Net60,
    LetterOfCredit,
    CashAgainstDocuments,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDefaults {
    /// ISO 4217 currency code
    pub currency: String,
    pub incoterm: Incoterm,
    pub payment_terms: PaymentTerms,
}

impl Default for TradeDefaults {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            incoterm: Incoterm::default(),
            payment_terms: PaymentTerms::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxId {
    pub country: String,
    /// e.g. "VAT", "EIN", "GST"
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedSigner {
    pub name: String,
    pub title: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycDocument {
    pub id: String,
    pub name: String,
    /// e.g. "certificate_of_incorporation", "proof_of_address"
    pub kind: String,
    pub status: KycStatus,
    pub uploaded_at: DateTime<Utc>,
}

/// Upload metadata for a new KYC document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewKycDocument {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compliance {
    #[serde(default)]
    pub tax_ids: Vec<TaxId>,
    #[serde(default)]
    pub authorized_signers: Vec<AuthorizedSigner>,
    #[serde(default)]
    pub kyc_documents: Vec<KycDocument>,
}

/// Team member ids assigned as the organization's points of contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryContacts {
    pub commercial: Option<String>,
    pub finance: Option<String>,
    pub logistics: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: TenantId,
    pub legal_name: String,
    pub trading_name: Option<String>,
    pub registration_number: String,
    /// ISO 3166-1 alpha-2 country of incorporation
    pub country: String,
    pub address: String,
    pub website: Option<String>,
    #[serde(default)]
    pub branding: Branding,
    #[serde(default)]
    pub trade_defaults: TradeDefaults,
    #[serde(default)]
    pub compliance: Compliance,
    #[serde(default)]
    pub primary_contacts: PrimaryContacts,
    #[serde(default)]
    pub tier: Tier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// A blank organization for a freshly created tenant
    pub fn new(id: TenantId, legal_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            legal_name: legal_name.into(),
            trading_name: None,
            registration_number: String::new(),
            country: String::new(),
            address: String::new(),
            website: None,
            branding: Branding::default(),
            trade_defaults: TradeDefaults::default(),
            compliance: Compliance::default(),
            primary_contacts: PrimaryContacts::default(),
            tier: Tier::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge present patch fields over this record.
    pub fn apply(&mut self, patch: OrganizationPatch) {
        let OrganizationPatch {
            legal_name,
            trading_name,
            registration_number,
            country,
            address,
            website,
            branding,
            trade_defaults,
            tax_ids,
            authorized_signers,
            primary_contacts,
        } = patch;

        if let Some(v) = legal_name {
            self.legal_name = v;
        }
        if let Some(v) = trading_name {
            self.trading_name = Some(v);
        }
        if let Some(v) = registration_number {
            self.registration_number = v;
        }
        if let Some(v) = country {
            self.country = v;
        }
        if let Some(v) = address {
            self.address = v;
        }
        if let Some(v) = website {
            self.website = Some(v);
        }
        if let Some(v) = branding {
            self.branding = v;
        }
        if let Some(v) = trade_defaults {
            self.trade_defaults = v;
        }
        if let Some(v) = tax_ids {
            self.compliance.tax_ids = v;
        }
        if let Some(v) = authorized_signers {
            self.compliance.authorized_signers = v;
        }
        if let Some(v) = primary_contacts {
            self.primary_contacts = v;
        }
        self.updated_at = Utc::now();
    }

    /// Required fields that are still empty.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.legal_name.trim().is_empty() {
            missing.push("legal_name");
        }
        if self.registration_number.trim().is_empty() {
            missing.push("registration_number");
        }
        if self.country.trim().is_empty() {
            missing.push("country");
        }
        if self.compliance.tax_ids.is_empty() {
            missing.push("tax_ids");
        }
        if self.compliance.authorized_signers.is_empty() {
            missing.push("authorized_signers");
        }
        missing
    }

    /// Share of required fields that are filled in, 0-100.
    pub fn completeness_percent(&self) -> u8 {
        const REQUIRED: usize = 5;
        let filled = REQUIRED - self.missing_required_fields().len();
        (filled * 100 / REQUIRED) as u8
    }
}

/// Partial organization update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationPatch {
    pub legal_name: Option<String>,
    pub trading_name: Option<String>,
    pub registration_number: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub branding: Option<Branding>,
    pub trade_defaults: Option<TradeDefaults>,
    pub tax_ids: Option<Vec<TaxId>>,
    pub authorized_signers: Option<Vec<AuthorizedSigner>>,
    pub primary_contacts: Option<PrimaryContacts>,
}

/// Profile completeness summary returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completeness {
    pub percent: u8,
    pub missing: Vec<String>,
}

impl From<&Organization> for Completeness {
    fn from(org: &Organization) -> Self {
        Self {
            percent: org.completeness_percent(),
            missing: org
                .missing_required_fields()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}
