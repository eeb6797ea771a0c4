//! Team member records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::{matches_eq, matches_search};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Owner,
    Admin,
    Sourcing,
    Logistics,
    Finance,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Pending,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestFrequency {
    Never,
    #[default]
    Daily,
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub email: bool,
    pub sms: bool,
    pub in_app: bool,
    #[serde(default)]
    pub digest: DigestFrequency,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            in_app: true,
            digest: DigestFrequency::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: TeamRole,
    /// Trade regions this member covers, e.g. "EMEA", "APAC"
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    pub status: MemberStatus,
    pub invited_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteMember {
    pub name: String,
    pub email: String,
    pub role: TeamRole,
    #[serde(default)]
    pub regions: Vec<String>,
}

impl InviteMember {
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(crate::Error::InvalidRequest("name is required".to_string()));
        }
        if !self.email.contains('@') {
            return Err(crate::Error::InvalidRequest(format!(
                "invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }

    /// Build the pending member record for this invitation
    pub fn into_member(self) -> TeamMember {
        TeamMember {
            id: crate::new_id("mem"),
            name: self.name,
            email: self.email,
            role: self.role,
            regions: self.regions,
            notifications: NotificationPreferences::default(),
            status: MemberStatus::Pending,
            invited_at: Utc::now(),
            last_active_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<TeamRole>,
    pub regions: Option<Vec<String>>,
    pub notifications: Option<NotificationPreferences>,
    pub status: Option<MemberStatus>,
}

impl TeamMember {
    pub fn apply(&mut self, patch: MemberPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.role {
            self.role = v;
        }
        if let Some(v) = patch.regions {
            self.regions = v;
        }
        if let Some(v) = patch.notifications {
            self.notifications = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberFilter {
    pub search: Option<String>,
    pub role: Option<TeamRole>,
    pub status: Option<MemberStatus>,
}

impl MemberFilter {
    pub fn matches(&self, member: &TeamMember) -> bool {
        matches_eq(self.role.as_ref(), &member.role)
            && matches_eq(self.status.as_ref(), &member.status)
            && matches_search(
                self.search.as_deref(),
                [member.name.as_str(), member.email.as_str()],
            )
    }
}
