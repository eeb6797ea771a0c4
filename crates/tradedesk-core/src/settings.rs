//! Portal settings aggregate
//!
//! `SettingsState` bundles every settings section for a tenant. Sections are
//! replaced one at a time through [`SettingsUpdate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::organization::Incoterm;
use crate::team::DigestFrequency;
use crate::{Error, Result};

pub const MIN_SESSION_TIMEOUT_MINUTES: u32 = 5;
pub const MAX_SESSION_TIMEOUT_MINUTES: u32 = 1440;
pub const MIN_RETENTION_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// IANA zone name
    pub timezone: String,
    pub language: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: None,
            timezone: "UTC".to_string(),
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email_digest: DigestFrequency,
    pub shipment_updates: bool,
    pub message_alerts: bool,
    pub sourcing_updates: bool,
    pub marketing: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_digest: DigestFrequency::Daily,
            shipment_updates: true,
            message_alerts: true,
            sourcing_updates: true,
            marketing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySettings {
    pub two_factor_enabled: bool,
    pub session_timeout_minutes: u32,
    pub login_alerts: bool,
    #[serde(default)]
    pub ip_allowlist: Vec<String>,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            two_factor_enabled: false,
            session_timeout_minutes: 60,
            login_alerts: true,
            ip_allowlist: Vec::new(),
        }
    }
}

impl SecuritySettings {
    fn validate(&self) -> Result<()> {
        let range = MIN_SESSION_TIMEOUT_MINUTES..=MAX_SESSION_TIMEOUT_MINUTES;
        if !range.contains(&self.session_timeout_minutes) {
            return Err(Error::InvalidRequest(format!(
                "session_timeout_minutes must be between {} and {}",
                MIN_SESSION_TIMEOUT_MINUTES, MAX_SESSION_TIMEOUT_MINUTES
            )));
        }
        Ok(())
    }
}

/// Organization-wide defaults applied to new sourcing requests and shipments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationSettings {
    pub default_currency: String,
    pub default_incoterm: Incoterm,
    /// 1 = January
    pub fiscal_year_start_month: u8,
    pub require_po_approval: bool,
}

impl Default for OrganizationSettings {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
            default_incoterm: Incoterm::default(),
            fiscal_year_start_month: 1,
            require_po_approval: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    pub id: String,
    pub name: String,
    pub connected: bool,
    pub connected_at: Option<DateTime<Utc>>,
}

impl Integration {
    pub fn available(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            connected: false,
            connected_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Xlsx,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    pub retention_days: u32,
    pub export_format: ExportFormat,
    pub analytics_sharing: bool,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            retention_days: 365,
            export_format: ExportFormat::default(),
            analytics_sharing: false,
        }
    }
}

impl DataSettings {
    fn validate(&self) -> Result<()> {
        if self.retention_days < MIN_RETENTION_DAYS {
            return Err(Error::InvalidRequest(format!(
                "retention_days must be at least {}",
                MIN_RETENTION_DAYS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalSettings {
    pub terms_accepted_at: Option<DateTime<Utc>>,
    pub privacy_accepted_at: Option<DateTime<Utc>>,
    pub marketing_consent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalDocument {
    Terms,
    Privacy,
}

impl std::str::FromStr for LegalDocument {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "terms" => Ok(LegalDocument::Terms),
            "privacy" => Ok(LegalDocument::Privacy),
            other => Err(Error::InvalidRequest(format!(
                "unknown legal document: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsState {
    pub user: UserSettings,
    pub notifications: NotificationSettings,
    pub security: SecuritySettings,
    pub organization: OrganizationSettings,
    pub integrations: Vec<Integration>,
    pub data: DataSettings,
    pub legal: LegalSettings,
}

impl SettingsState {
    /// Fresh settings with the standard integration catalogue
    pub fn with_default_integrations() -> Self {
        Self {
            integrations: vec![
                Integration::available("quickbooks", "QuickBooks"),
                Integration::available("xero", "Xero"),
                Integration::available("slack", "Slack"),
                Integration::available("flexport", "Flexport"),
            ],
            ..Default::default()
        }
    }

    /// Replace one section after validating it.
    pub fn apply(&mut self, update: SettingsUpdate) -> Result<()> {
        match update {
            SettingsUpdate::User(user) => self.user = user,
            SettingsUpdate::Notifications(n) => self.notifications = n,
            SettingsUpdate::Security(security) => {
                security.validate()?;
                self.security = security;
            }
            SettingsUpdate::Organization(org) => {
                if !(1..=12).contains(&org.fiscal_year_start_month) {
                    return Err(Error::InvalidRequest(
                        "fiscal_year_start_month must be 1-12".to_string(),
                    ));
                }
                self.organization = org;
            }
            SettingsUpdate::Data(data) => {
                data.validate()?;
                self.data = data;
            }
            SettingsUpdate::Legal(legal) => self.legal = legal,
        }
        Ok(())
    }

    pub fn set_integration(&mut self, id: &str, connected: bool) -> Result<&Integration> {
        let integration = self
            .integrations
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::not_found("Integration", id))?;
        integration.connected = connected;
        integration.connected_at = connected.then(Utc::now);
        Ok(integration)
    }

    pub fn accept(&mut self, document: LegalDocument) {
        let now = Some(Utc::now());
        match document {
            LegalDocument::Terms => self.legal.terms_accepted_at = now,
            LegalDocument::Privacy => self.legal.privacy_accepted_at = now,
        }
    }
}

/// A single-section settings update, tagged by section name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "section", content = "value", rename_all = "snake_case")]
pub enum SettingsUpdate {
    User(UserSettings),
    Notifications(NotificationSettings),
    Security(SecuritySettings),
    Organization(OrganizationSettings),
    Data(DataSettings),
    Legal(LegalSettings),
}
