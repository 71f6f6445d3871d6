//! Seed-data loader: populates a [`MemoryStore`] from a TOML document.
//!
//! Records reference each other by symbolic keys rather than identifiers
//! so fixtures stay hand-writable; the loader generates ULIDs and resolves
//! the references. Campaigns pass the save-time validation gate before
//! they are stored.
//!
//! ```toml
//! [[admins]]
//! key = "alex"
//! name = "Alex Agent"
//! email = "alex@agency.example"
//!
//! [[properties]]
//! key = "maple"
//! name = "Maple House"
//! address = "12 Maple St"
//! admin = "alex"
//!
//! [[visitors]]
//! key = "jane"
//! name = "Jane Doe"
//! email = "jane@example.com"
//! property = "maple"
//!
//! [visitors.feedback]
//! interested = true
//! rating = 5
//!
//! [[campaigns]]
//! key = "thanks"
//! name = "Thanks for visiting"
//! admin = "alex"
//! property = "maple"
//! message_type = "email"
//! trigger_condition = "all"
//! email_subject = "Thanks for visiting {{property_name}}"
//! email_body = "Hi {{visitor_name}}!"
//! ```

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, Utc};
use doorstep_common::{
    Admin, AdminId, Campaign, CampaignId, CampaignStatus, Feedback, MessageType, Property,
    PropertyId, PropertyStatus, TriggerCondition, Unsubscribe, UnsubscribeScope, Visitor,
    VisitorId,
};
use doorstep_dispatch::validate_campaign;
use doorstep_store::{MemoryStore, Store, StoreError};
use serde::Deserialize;

/// Errors loading or applying a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A record references a key that was never defined.
    #[error("Unknown {kind} key referenced by {referrer}: {key}")]
    UnknownKey {
        kind: &'static str,
        referrer: String,
        key: String,
    },

    /// Two records of the same kind share a key.
    #[error("Duplicate {kind} key: {key}")]
    DuplicateKey { kind: &'static str, key: String },

    /// A campaign failed save-time validation.
    #[error("Invalid campaign {key}: {reason}")]
    InvalidCampaign { key: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A parsed seed document.
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub admins: Vec<SeedAdmin>,
    #[serde(default)]
    pub properties: Vec<SeedProperty>,
    #[serde(default)]
    pub visitors: Vec<SeedVisitor>,
    #[serde(default)]
    pub campaigns: Vec<SeedCampaign>,
    #[serde(default)]
    pub unsubscribes: Vec<SeedUnsubscribe>,
}

#[derive(Debug, Deserialize)]
pub struct SeedAdmin {
    pub key: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProperty {
    pub key: String,
    pub name: String,
    pub address: String,
    /// Key of the owning admin
    pub admin: String,
    #[serde(default)]
    pub status: PropertyStatus,
}

#[derive(Debug, Deserialize)]
pub struct SeedVisitor {
    pub key: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Key of the property the visitor checked in at
    pub property: Option<String>,
    /// Check-in time (RFC 3339); defaults to now
    pub visited_at: Option<DateTime<Utc>>,
    pub feedback: Option<SeedFeedback>,
}

#[derive(Debug, Deserialize)]
pub struct SeedFeedback {
    pub interested: bool,
    pub rating: u8,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCampaign {
    pub key: String,
    pub name: String,
    /// Key of the owning admin
    pub admin: String,
    /// Key of the target property; omit to target all properties
    pub property: Option<String>,
    pub message_type: MessageType,
    pub trigger_condition: TriggerCondition,
    #[serde(default)]
    pub delay_hours: u32,
    pub email_subject: Option<String>,
    pub email_body: Option<String>,
    pub from_name: Option<String>,
    pub sms_body: Option<String>,
    #[serde(default)]
    pub status: CampaignStatus,
}

#[derive(Debug, Deserialize)]
pub struct SeedUnsubscribe {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub scope: UnsubscribeScope,
    pub reason: Option<String>,
}

/// Key-to-identifier maps produced by seeding.
#[derive(Debug, Default)]
pub struct SeedIndex {
    pub admins: HashMap<String, AdminId>,
    pub properties: HashMap<String, PropertyId>,
    pub visitors: HashMap<String, VisitorId>,
    pub campaigns: HashMap<String, CampaignId>,
}

impl SeedIndex {
    fn admin(&self, referrer: &str, key: &str) -> Result<AdminId, SeedError> {
        self.admins
            .get(key)
            .copied()
            .ok_or_else(|| SeedError::UnknownKey {
                kind: "admin",
                referrer: referrer.to_string(),
                key: key.to_string(),
            })
    }

    /// Resolve a property key.
    ///
    /// # Errors
    ///
    /// [`SeedError::UnknownKey`] when the key was never defined.
    pub fn property(&self, referrer: &str, key: &str) -> Result<PropertyId, SeedError> {
        self.properties
            .get(key)
            .copied()
            .ok_or_else(|| SeedError::UnknownKey {
                kind: "property",
                referrer: referrer.to_string(),
                key: key.to_string(),
            })
    }

    /// Resolve a visitor key.
    ///
    /// # Errors
    ///
    /// [`SeedError::UnknownKey`] when the key was never defined.
    pub fn visitor(&self, referrer: &str, key: &str) -> Result<VisitorId, SeedError> {
        self.visitors
            .get(key)
            .copied()
            .ok_or_else(|| SeedError::UnknownKey {
                kind: "visitor",
                referrer: referrer.to_string(),
                key: key.to_string(),
            })
    }

    /// Resolve a campaign key.
    ///
    /// # Errors
    ///
    /// [`SeedError::UnknownKey`] when the key was never defined.
    pub fn campaign(&self, referrer: &str, key: &str) -> Result<CampaignId, SeedError> {
        self.campaigns
            .get(key)
            .copied()
            .ok_or_else(|| SeedError::UnknownKey {
                kind: "campaign",
                referrer: referrer.to_string(),
                key: key.to_string(),
            })
    }
}

fn insert_key<V>(
    map: &mut HashMap<String, V>,
    kind: &'static str,
    key: &str,
    value: V,
) -> Result<(), SeedError> {
    if map.insert(key.to_string(), value).is_some() {
        return Err(SeedError::DuplicateKey {
            kind,
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Read a seed file and populate `store`.
///
/// # Errors
///
/// Returns a [`SeedError`] when the file cannot be read or parsed, a key
/// reference cannot be resolved, a campaign fails validation, or the store
/// rejects a record.
pub async fn load(path: &Path, store: &MemoryStore) -> Result<SeedIndex, SeedError> {
    let text = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let data: SeedData = toml::from_str(&text).map_err(|source| SeedError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    apply(data, store).await
}

/// Populate `store` from parsed seed data, returning the key index.
///
/// # Errors
///
/// See [`load`].
pub async fn apply(data: SeedData, store: &MemoryStore) -> Result<SeedIndex, SeedError> {
    let mut index = SeedIndex::default();

    for seed in data.admins {
        let mut admin = Admin::new(seed.name, seed.email);
        if let Some(phone) = seed.phone {
            admin = admin.with_phone(phone);
        }
        insert_key(&mut index.admins, "admin", &seed.key, admin.id)?;
        store.insert_admin(admin).await?;
    }

    for seed in data.properties {
        let admin_id = index.admin(&seed.key, &seed.admin)?;
        let mut property = Property::new(seed.name, seed.address, admin_id);
        property.status = seed.status;
        insert_key(&mut index.properties, "property", &seed.key, property.id)?;
        store.insert_property(property).await?;
    }

    for seed in data.visitors {
        let property_id = seed
            .property
            .as_deref()
            .map(|key| index.property(&seed.key, key))
            .transpose()?;

        let mut visitor = Visitor::check_in(seed.name, property_id);
        if let Some(email) = seed.email {
            visitor = visitor.with_email(email);
        }
        if let Some(phone) = seed.phone {
            visitor = visitor.with_phone(phone);
        }
        if let Some(visited_at) = seed.visited_at {
            visitor.visited_at = visited_at;
        }

        let visitor_id = visitor.id;
        insert_key(&mut index.visitors, "visitor", &seed.key, visitor_id)?;
        store.check_in(visitor).await?;

        if let Some(seed_feedback) = seed.feedback {
            let mut feedback =
                Feedback::new(visitor_id, seed_feedback.interested, seed_feedback.rating);
            if let Some(comments) = seed_feedback.comments {
                feedback = feedback.with_comments(comments);
            }
            store.attach_feedback(feedback).await?;
        }
    }

    for seed in data.campaigns {
        let admin_id = index.admin(&seed.key, &seed.admin)?;
        let property_id = seed
            .property
            .as_deref()
            .map(|key| index.property(&seed.key, key))
            .transpose()?;

        let mut campaign = Campaign::new(
            seed.name,
            admin_id,
            seed.message_type,
            seed.trigger_condition,
        );
        campaign.property_id = property_id;
        campaign.delay_hours = seed.delay_hours;
        campaign.email_subject = seed.email_subject;
        campaign.email_body = seed.email_body;
        campaign.from_name = seed.from_name;
        campaign.sms_body = seed.sms_body;
        campaign.status = seed.status;

        validate_campaign(&campaign).map_err(|error| SeedError::InvalidCampaign {
            key: seed.key.clone(),
            reason: error.to_string(),
        })?;

        insert_key(&mut index.campaigns, "campaign", &seed.key, campaign.id)?;
        store.save_campaign(campaign).await?;
    }

    for seed in data.unsubscribes {
        let entry = Unsubscribe {
            id: doorstep_common::UnsubscribeId::generate(),
            email: seed.email,
            phone: seed.phone,
            scope: seed.scope,
            reason: seed.reason,
            created_at: Utc::now(),
        };
        store.record_unsubscribe(entry).await?;
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"
[[admins]]
key = "alex"
name = "Alex Agent"
email = "alex@agency.example"
phone = "+1 555 010 0000"

[[properties]]
key = "maple"
name = "Maple House"
address = "12 Maple St"
admin = "alex"

[[visitors]]
key = "jane"
name = "Jane Doe"
email = "jane@example.com"
property = "maple"

[visitors.feedback]
interested = true
rating = 5
comments = "Lovely kitchen"

[[visitors]]
key = "john"
name = "John Roe"
phone = "+1 555 010 0200"
property = "maple"

[[campaigns]]
key = "thanks"
name = "Thanks for visiting"
admin = "alex"
property = "maple"
message_type = "email"
trigger_condition = "all"
email_subject = "Thanks for visiting {{property_name}}"
email_body = "Hi {{visitor_name}}!"
from_name = "Alex from the agency"

[[unsubscribes]]
email = "gone@example.com"
scope = "email"
reason = "bought elsewhere"
"#;

    #[tokio::test]
    async fn applies_a_full_document() {
        let store = MemoryStore::new();
        let data: SeedData = toml::from_str(SEED).unwrap();
        let index = apply(data, &store).await.unwrap();

        assert_eq!(index.admins.len(), 1);
        assert_eq!(index.properties.len(), 1);
        assert_eq!(index.visitors.len(), 2);
        assert_eq!(index.campaigns.len(), 1);

        let jane = index.visitor("test", "jane").unwrap();
        let feedback = store.feedback_for(jane).await.unwrap().unwrap();
        assert!(feedback.interested);
        assert_eq!(feedback.rating, 5);

        let campaign_id = index.campaign("test", "thanks").unwrap();
        let campaign = store.campaign(campaign_id).await.unwrap().unwrap();
        assert_eq!(campaign.message_type, MessageType::Email);
        assert!(campaign.property_id.is_some());
    }

    #[tokio::test]
    async fn rejects_unknown_references() {
        let store = MemoryStore::new();
        let data: SeedData = toml::from_str(
            r#"
[[properties]]
key = "maple"
name = "Maple House"
address = "12 Maple St"
admin = "nobody"
"#,
        )
        .unwrap();

        let error = apply(data, &store).await.unwrap_err();
        assert!(matches!(error, SeedError::UnknownKey { kind: "admin", .. }));
    }

    #[tokio::test]
    async fn rejects_invalid_campaigns() {
        let store = MemoryStore::new();
        let data: SeedData = toml::from_str(
            r#"
[[admins]]
key = "alex"
name = "Alex"
email = "alex@agency.example"

[[campaigns]]
key = "broken"
name = "Broken"
admin = "alex"
message_type = "email"
trigger_condition = "all"
"#,
        )
        .unwrap();

        let error = apply(data, &store).await.unwrap_err();
        assert!(matches!(error, SeedError::InvalidCampaign { .. }));
    }

    #[tokio::test]
    async fn rejects_duplicate_keys() {
        let store = MemoryStore::new();
        let data: SeedData = toml::from_str(
            r#"
[[admins]]
key = "alex"
name = "Alex"
email = "alex@agency.example"

[[admins]]
key = "alex"
name = "Other Alex"
email = "other@agency.example"
"#,
        )
        .unwrap();

        let error = apply(data, &store).await.unwrap_err();
        assert!(matches!(error, SeedError::DuplicateKey { kind: "admin", .. }));
    }
}
