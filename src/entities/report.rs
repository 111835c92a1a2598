use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::ids::{DeviceId, OrderId, ReportId, UserId};
use super::user::Role;
use crate::error::ValidationError;
use crate::validation::require_non_empty;

/// Filed report about a device. Visibility is driven by `recipients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub device_id: DeviceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    pub author_id: UserId,
    #[serde(default)]
    pub title: String,
    pub description: String,
    pub recipients: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("report.id", self.id.as_str())?;
        require_non_empty("report.deviceId", self.device_id.as_str())?;
        require_non_empty("report.description", &self.description)?;
        if self.recipients.is_empty() {
            return Err(ValidationError::new("report.recipients", "at least one role required"));
        }
        Ok(())
    }

    /// Admins see every report; other roles only those addressed to them
    pub fn visible_to(&self, role: Role) -> bool {
        role == Role::Admin || self.recipients.contains(&role)
    }
}

/// Older repair-report layout written by the technician screens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRepairReport {
    pub id: ReportId,
    pub device_id: DeviceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default, alias = "authorId")]
    pub technician_id: Option<UserId>,
    pub summary: String,
    pub work_done: String,
    #[serde(default)]
    pub parts_replaced: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<LegacyRepairReport> for Report {
    fn from(legacy: LegacyRepairReport) -> Self {
        let mut description = format!("{}\n\nWork done: {}", legacy.summary, legacy.work_done);
        if !legacy.parts_replaced.is_empty() {
            description.push_str(&format!(
                "\nParts replaced: {}",
                legacy.parts_replaced.join(", ")
            ));
        }
        Report {
            id: legacy.id,
            device_id: legacy.device_id,
            order_id: legacy.order_id,
            author_id: legacy.technician_id.unwrap_or_default(),
            title: legacy.summary,
            description,
            recipients: vec![Role::Enterprise, Role::Admin],
            created_at: legacy.created_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredReport {
    Current(Report),
    Legacy(LegacyRepairReport),
}

/// Accepts both report layouts and migrates legacy entries
pub(crate) fn deserialize_reports<'de, D>(deserializer: D) -> Result<Vec<Report>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Vec::<StoredReport>::deserialize(deserializer)?;
    Ok(stored
        .into_iter()
        .map(|report| match report {
            StoredReport::Current(report) => report,
            StoredReport::Legacy(legacy) => {
                tracing::debug!(report_id = %legacy.id, "Migrating legacy repair report");
                legacy.into()
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_reports")]
        reports: Vec<Report>,
    }

    #[test]
    fn test_visibility_follows_recipients() {
        let report = Report {
            id: ReportId::new("r-1"),
            device_id: DeviceId::new("d-1"),
            order_id: None,
            author_id: UserId::new("u-2"),
            title: "Screen replaced".to_string(),
            description: "Replaced OLED panel".to_string(),
            recipients: vec![Role::Client],
            created_at: Utc::now(),
        };
        assert!(report.visible_to(Role::Client));
        assert!(report.visible_to(Role::Admin));
        assert!(!report.visible_to(Role::Enterprise));
    }

    #[test]
    fn test_legacy_reports_are_migrated() {
        let holder: Holder = serde_json::from_value(json!({
            "reports": [
                {
                    "id": "r-1",
                    "deviceId": "d-1",
                    "authorId": "u-2",
                    "title": "QC",
                    "description": "Passed",
                    "recipients": ["client"],
                    "createdAt": "2024-05-01T10:00:00Z"
                },
                {
                    "id": "r-2",
                    "deviceId": "d-2",
                    "orderId": "o-1",
                    "technicianId": "u-3",
                    "summary": "Battery swap",
                    "workDone": "Replaced battery",
                    "partsReplaced": ["battery", "adhesive"],
                    "createdAt": "2024-05-02T10:00:00Z"
                }
            ]
        }))
        .unwrap();

        assert_eq!(holder.reports.len(), 2);
        assert_eq!(holder.reports[0].description, "Passed");

        let migrated = &holder.reports[1];
        assert_eq!(migrated.title, "Battery swap");
        assert_eq!(migrated.author_id, UserId::new("u-3"));
        assert!(migrated.description.contains("Replaced battery"));
        assert!(migrated.description.contains("battery, adhesive"));
        assert_eq!(migrated.recipients, vec![Role::Enterprise, Role::Admin]);
    }
}
