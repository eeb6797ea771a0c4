//! Demo tenant seed data
//!
//! Deterministic records for a single demo organization so a fresh server
//! has something to show. Ids are stable across restarts.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use tradedesk_core::TenantId;
use tradedesk_core::billing::Tier;
use tradedesk_core::logistics::{Milestone, Shipment, ShipmentStatus, TransportMode};
use tradedesk_core::messaging::{Conversation, Message};
use tradedesk_core::organization::{
    AuthorizedSigner, Branding, Compliance, Incoterm, Organization, PaymentTerms,
    PrimaryContacts, TaxId, TradeDefaults,
};
use tradedesk_core::resources::{AccessLevel, ResourceCategory, ResourceItem};
use tradedesk_core::settings::{SettingsState, UserSettings};
use tradedesk_core::sourcing::{Money, SourcingRequest, SourcingStatus};
use tradedesk_core::team::{MemberStatus, NotificationPreferences, TeamMember, TeamRole};

pub const DEMO_TENANT: &str = "0b7f3c1e-5a44-4d8e-9c6a-2f1d8e7b9a10";

pub fn demo_tenant() -> TenantId {
    TenantId::from_uuid(Uuid::from_u128(0x0b7f3c1e_5a44_4d8e_9c6a_2f1d8e7b9a10))
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn organization() -> Organization {
    Organization {
        id: demo_tenant(),
        legal_name: "Harbourline Trading Ltd".to_string(),
        trading_name: Some("Harbourline".to_string()),
        registration_number: "11827364".to_string(),
        country: "GB".to_string(),
        address: "4 Quayside, Felixstowe IP11 3TW".to_string(),
        website: Some("https://harbourline.example".to_string()),
        branding: Branding {
            logo_url: None,
            primary_color: Some("#0f4c81".to_string()),
        },
        trade_defaults: TradeDefaults {
            currency: "USD".to_string(),
            incoterm: Incoterm::Fob,
            payment_terms: PaymentTerms::LetterOfCredit,
        },
        compliance: Compliance {
            tax_ids: vec![TaxId {
                country: "GB".to_string(),
                kind: "VAT".to_string(),
                value: "GB284716530".to_string(),
            }],
            authorized_signers: vec![AuthorizedSigner {
                name: "Priya Shah".to_string(),
                title: "Managing Director".to_string(),
                email: "priya@harbourline.example".to_string(),
            }],
            kyc_documents: Vec::new(),
        },
        primary_contacts: PrimaryContacts {
            commercial: Some("mem_priya".to_string()),
            finance: Some("mem_tom".to_string()),
            logistics: Some("mem_lena".to_string()),
        },
        tier: Tier::Professional,
        created_at: at(2023, 3, 1),
        updated_at: at(2024, 5, 2),
    }
}

// Fixture tables stay one record per line
#[rustfmt::skip]
pub fn members() -> Vec<TeamMember> {
    let member = |id: &str, name: &str, role: TeamRole, regions: &[&str], status: MemberStatus| TeamMember {
        id: id.to_string(),
        name: name.to_string(),
        email: format!(
            "{}@harbourline.example",
            name.split_whitespace().next().unwrap_or(name).to_lowercase()
        ),
        role,
        regions: regions.iter().map(|r| r.to_string()).collect(),
        notifications: NotificationPreferences::default(),
        status,
        invited_at: at(2023, 3, 2),
        last_active_at: (status == MemberStatus::Active).then(|| at(2024, 5, 20)),
    };
    vec![
        member("mem_priya", "Priya Shah", TeamRole::Owner, &["EMEA", "APAC"], MemberStatus::Active),
        member("mem_tom", "Tom Okafor", TeamRole::Finance, &["EMEA"], MemberStatus::Active),
        member("mem_lena", "Lena Vogt", TeamRole::Logistics, &["EMEA"], MemberStatus::Active),
        member("mem_kenji", "Kenji Mori", TeamRole::Sourcing, &["APAC"], MemberStatus::Pending),
        member("mem_sara", "Sara Lind", TeamRole::Viewer, &[], MemberStatus::Inactive),
    ]
}

fn message(id: &str, sender: &str, body: &str, sent_at: DateTime<Utc>, read: bool) -> Message {
    Message {
        id: id.to_string(),
        sender: sender.to_string(),
        body: body.to_string(),
        sent_at,
        read,
    }
}

#[rustfmt::skip]
pub fn conversations() -> Vec<Conversation> {
    let t0 = at(2024, 5, 18);
    vec![
        Conversation {
            id: "conv_hdpe".to_string(),
            subject: "HDPE film grade: supplier shortlist".to_string(),
            participants: vec!["priya@harbourline.example".into(), "desk@broker.example".into()],
            related_request: Some("src_hdpe".to_string()),
            messages: vec![
                message("msg_1", "priya@harbourline.example", "Any update on the shortlist?", t0, true),
                message("msg_2", "desk@broker.example", "Three mills qualified, quotes due Friday.", t0 + Duration::hours(3), false),
                message("msg_3", "desk@broker.example", "One mill can do CIF Mombasa.", t0 + Duration::hours(4), false),
            ],
            archived: false,
            starred: true,
            updated_at: t0 + Duration::hours(4),
        },
        Conversation {
            id: "conv_customs".to_string(),
            subject: "SHP-2024-0031 customs hold".to_string(),
            participants: vec!["lena@harbourline.example".into(), "clearance@broker.example".into()],
            related_request: None,
            messages: vec![
                message("msg_4", "clearance@broker.example", "Commercial invoice is missing HS codes.", t0 - Duration::days(1), false),
            ],
            archived: false,
            starred: false,
            updated_at: t0 - Duration::days(1),
        },
        Conversation {
            id: "conv_onboarding".to_string(),
            subject: "Welcome to the brokerage portal".to_string(),
            participants: vec!["success@broker.example".into()],
            related_request: None,
            messages: vec![
                message("msg_5", "success@broker.example", "Your account is ready.", at(2023, 3, 2), true),
            ],
            archived: true,
            starred: false,
            updated_at: at(2023, 3, 2),
        },
    ]
}

#[rustfmt::skip]
pub fn resources() -> Vec<ResourceItem> {
    let item = |id: &str,
                title: &str,
                description: &str,
                category: ResourceCategory,
                tags: &[&str],
                access_level: AccessLevel,
                published_at: DateTime<Utc>| {
        ResourceItem {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            access_level,
            url: format!("https://resources.broker.example/{}", id),
            published_at,
        }
    };
    vec![
        item("res_incoterms", "Incoterms 2020 explained", "Who pays, who insures and where risk transfers for each of the eleven rules.", ResourceCategory::Guide, &["incoterms", "basics"], AccessLevel::Public, at(2023, 9, 4)),
        item("res_lc_template", "Letter of credit application template", "Editable template with the clauses banks most often query.", ResourceCategory::Template, &["finance", "letter of credit"], AccessLevel::Member, at(2024, 1, 15)),
        item("res_cbam", "EU CBAM reporting obligations", "What importers of steel, aluminium and fertiliser must report each quarter.", ResourceCategory::Regulation, &["EU", "compliance", "carbon"], AccessLevel::Member, at(2024, 2, 20)),
        item("res_polymer_outlook", "Polymer price outlook Q3", "Spot and contract price forecasts for PE, PP and PVC.", ResourceCategory::MarketReport, &["polymers", "pricing"], AccessLevel::Premium, at(2024, 6, 1)),
        item("res_freight_webinar", "Container freight contracting", "Recorded session on negotiating annual ocean freight contracts.", ResourceCategory::Webinar, &["freight", "ocean"], AccessLevel::Premium, at(2024, 4, 11)),
        item("res_sanctions", "Sanctions screening playbook", "Counterparty screening workflow used by our compliance desk.", ResourceCategory::Guide, &["compliance", "sanctions"], AccessLevel::Enterprise, at(2024, 3, 8)),
    ]
}

#[rustfmt::skip]
pub fn sourcing_requests() -> Vec<SourcingRequest> {
    let request = |id: &str,
                   title: &str,
                   category: &str,
                   quantity: u64,
                   unit: &str,
                   price: Option<i64>,
                   dest: &str,
                   incoterm: Incoterm,
                   status: SourcingStatus,
                   created_at: DateTime<Utc>| {
        SourcingRequest {
            id: id.to_string(),
            title: title.to_string(),
            product_category: category.to_string(),
            description: String::new(),
            quantity,
            unit: unit.to_string(),
            target_price: price.map(|amount_minor| Money {
                amount_minor,
                currency: "USD".to_string(),
            }),
            destination_country: dest.to_string(),
            incoterm,
            status,
            requested_by: "mem_priya".to_string(),
            created_at,
            updated_at: created_at,
        }
    };
    vec![
        request("src_hdpe", "HDPE granules, film grade", "Polymers", 50, "MT", Some(115_000), "KE", Incoterm::Cif, SourcingStatus::Quoting, at(2024, 5, 10)),
        request("src_cashew", "W320 cashew kernels", "Food", 2, "40ft container", Some(720_000), "AE", Incoterm::Fob, SourcingStatus::Submitted, at(2024, 5, 14)),
        request("src_solar", "Monocrystalline PV panels 450W", "Energy", 1200, "pcs", None, "GB", Incoterm::Dap, SourcingStatus::Draft, at(2024, 5, 21)),
        request("src_steel", "Cold-rolled steel coils", "Metals", 300, "MT", Some(68_000), "NG", Incoterm::Cfr, SourcingStatus::Awarded, at(2024, 2, 2)),
    ]
}

pub fn shipments() -> Vec<Shipment> {
    vec![
        Shipment {
            id: "shp_0031".to_string(),
            reference: "SHP-2024-0031".to_string(),
            sourcing_request_id: Some("src_steel".to_string()),
            origin: "Tianjin".to_string(),
            destination: "Lagos".to_string(),
            mode: TransportMode::Sea,
            incoterm: Incoterm::Cfr,
            status: ShipmentStatus::AtCustoms,
            eta: NaiveDate::from_ymd_opt(2024, 5, 28),
            milestones: vec![
                Milestone {
                    label: "Vessel departed".to_string(),
                    location: "Tianjin".to_string(),
                    occurred_at: at(2024, 4, 9),
                    status: Some(ShipmentStatus::InTransit),
                },
                Milestone {
                    label: "Discharged, held for inspection".to_string(),
                    location: "Lagos".to_string(),
                    occurred_at: at(2024, 5, 17),
                    status: Some(ShipmentStatus::AtCustoms),
                },
            ],
        },
        Shipment {
            id: "shp_0044".to_string(),
            reference: "SHP-2024-0044".to_string(),
            sourcing_request_id: None,
            origin: "Rotterdam".to_string(),
            destination: "Felixstowe".to_string(),
            mode: TransportMode::Road,
            incoterm: Incoterm::Dap,
            status: ShipmentStatus::Delivered,
            eta: NaiveDate::from_ymd_opt(2024, 4, 30),
            milestones: Vec::new(),
        },
    ]
}

pub fn settings() -> SettingsState {
    SettingsState {
        user: UserSettings {
            name: "Priya Shah".to_string(),
            email: "priya@harbourline.example".to_string(),
            phone: None,
            timezone: "Europe/London".to_string(),
            language: "en".to_string(),
        },
        ..SettingsState::with_default_integrations()
    }
}
