//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::diff::generate_diff;

/// Kind of change sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// A payment recorded against an invoice or appointment
    Payment,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Payment => write!(f, "PAYMENT"),
        }
    }
}

/// Backend record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Patient,
    Doctor,
    Receptionist,
    Service,
    Product,
    Appointment,
    Invoice,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Patient => "Patient",
            EntityType::Doctor => "Doctor",
            EntityType::Receptionist => "Receptionist",
            EntityType::Service => "Service",
            EntityType::Product => "Product",
            EntityType::Appointment => "Appointment",
            EntityType::Invoice => "Invoice",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique id of this entry
    pub id: Uuid,

    /// When the backend accepted the change (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Backend id of the record, "-" when the backend did not return one
    pub entity_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Signed-in user who made the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn base(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            user: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Create, entity_type, entity_id, entity_name)
        }
    }

    /// Update entry; the diff is computed from the two snapshots
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => generate_diff(b, a),
            _ => None,
        };
        Self {
            before,
            after,
            diff_summary,
            ..Self::base(Operation::Update, entity_type, entity_id, entity_name)
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Delete, entity_type, entity_id, entity_name)
        }
    }

    /// Payment entry carrying the request that was sent
    pub fn payment<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        request: &T,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            after: serde_json::to_value(request).ok(),
            diff_summary: Some(summary.into()),
            ..Self::base(Operation::Payment, entity_type, entity_id, entity_name)
        }
    }

    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }
        if let Some(user) = &self.user {
            output.push_str(&format!(" by {}", user));
        }
        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Payment.to_string(), "PAYMENT");
        assert_eq!(EntityType::Invoice.to_string(), "Invoice");
    }

    #[test]
    fn test_update_computes_diff() {
        let entry = AuditEntry::update(
            EntityType::Product,
            "prod-1",
            Some("Gloves".into()),
            &json!({"quantity": 10, "price": 1.5}),
            &json!({"quantity": 4, "price": 1.5}),
        );
        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.diff_summary.as_deref(), Some("quantity: 10 -> 4"));
    }

    #[test]
    fn test_entries_get_distinct_ids() {
        let a = AuditEntry::delete(EntityType::Patient, "p1", None, &json!({}));
        let b = AuditEntry::delete(EntityType::Patient, "p1", None, &json!({}));
        assert_ne!(a.id, b.id);
        assert!(a.after.is_none());
        assert!(a.before.is_some());
    }

    #[test]
    fn test_human_readable() {
        let entry = AuditEntry::payment(
            EntityType::Invoice,
            "inv-7",
            Some("Amina Alaoui".into()),
            &json!({"paymentAmount": 300.0, "paymentType": "CASH"}),
            "paid 300.00 by Cash",
        )
        .with_user(Some("desk@clinic.ma".into()));

        let text = entry.format_human_readable();
        assert!(text.contains("PAYMENT Invoice inv-7 (Amina Alaoui) by desk@clinic.ma"));
        assert!(text.contains("Changes: paid 300.00 by Cash"));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::create(EntityType::Service, "s1", None, &json!({"serviceName": "X-ray"}));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"operation\":\"create\""));
        assert!(json.contains("\"entity_type\":\"service\""));
        assert!(!json.contains("entity_name"));

        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, entry.id);
    }
}
