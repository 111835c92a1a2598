// Review ledger - append-only audit trail of stage decisions
//
// Records are grouped into the four collections the store exposes (QC,
// technician, clearance, inventory). Each record carries an explicit stage
// tag, so repair-stage QC reviews are told apart from intake QC reviews
// without looking at note text.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{DeviceId, ReviewId, UserId};
use crate::error::{Collection, StoreError, ValidationError};
use crate::validation::require_non_empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewStage {
    Qc,
    RepairQc,
    Technician,
    Inventory,
    Clearance,
}

impl ReviewStage {
    pub const ALL: [ReviewStage; 5] = [
        ReviewStage::Qc,
        ReviewStage::RepairQc,
        ReviewStage::Technician,
        ReviewStage::Inventory,
        ReviewStage::Clearance,
    ];

    /// Collection a record of this stage is appended to
    pub fn collection(self) -> ReviewCollection {
        match self {
            ReviewStage::Qc | ReviewStage::RepairQc => ReviewCollection::Qc,
            ReviewStage::Technician => ReviewCollection::Technician,
            ReviewStage::Inventory => ReviewCollection::Inventory,
            ReviewStage::Clearance => ReviewCollection::Clearance,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStage::Qc => "qc",
            ReviewStage::RepairQc => "repair-qc",
            ReviewStage::Technician => "technician",
            ReviewStage::Inventory => "inventory",
            ReviewStage::Clearance => "clearance",
        }
    }
}

impl fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Rejected,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::Approved => f.write_str("approved"),
            ReviewStatus::Rejected => f.write_str("rejected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewCollection {
    Qc,
    Technician,
    Clearance,
    Inventory,
}

impl ReviewCollection {
    pub const ALL: [ReviewCollection; 4] = [
        ReviewCollection::Qc,
        ReviewCollection::Technician,
        ReviewCollection::Clearance,
        ReviewCollection::Inventory,
    ];

    pub fn as_collection(self) -> Collection {
        match self {
            ReviewCollection::Qc => Collection::QcReviews,
            ReviewCollection::Technician => Collection::TechnicianReviews,
            ReviewCollection::Clearance => Collection::ClearanceReviews,
            ReviewCollection::Inventory => Collection::InventoryReviews,
        }
    }
}

/// One stage decision about one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: ReviewId,
    pub device_id: DeviceId,
    /// Empty when the device is not part of an order
    #[serde(default)]
    pub order_id: String,
    pub reviewer_id: UserId,
    pub stage: ReviewStage,
    pub status: ReviewStatus,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("review.id", self.id.as_str())?;
        require_non_empty("review.deviceId", self.device_id.as_str())?;
        require_non_empty("review.reviewerId", self.reviewer_id.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLedger {
    #[serde(default)]
    qc_reviews: Vec<ReviewRecord>,
    #[serde(default)]
    technician_reviews: Vec<ReviewRecord>,
    #[serde(default)]
    clearance_reviews: Vec<ReviewRecord>,
    #[serde(default)]
    inventory_reviews: Vec<ReviewRecord>,
}

impl ReviewLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self, collection: ReviewCollection) -> &[ReviewRecord] {
        match collection {
            ReviewCollection::Qc => &self.qc_reviews,
            ReviewCollection::Technician => &self.technician_reviews,
            ReviewCollection::Clearance => &self.clearance_reviews,
            ReviewCollection::Inventory => &self.inventory_reviews,
        }
    }

    /// Appends to `collection`. The record's stage must belong there and its
    /// id must be new across the whole ledger.
    pub(crate) fn append(
        &mut self,
        collection: ReviewCollection,
        record: ReviewRecord,
    ) -> Result<(), StoreError> {
        record.validate()?;
        if record.stage.collection() != collection {
            return Err(ValidationError::new(
                "review.stage",
                format!(
                    "{} review cannot be filed under {}",
                    record.stage,
                    collection.as_collection()
                ),
            )
            .into());
        }
        if self.contains(&record.id) {
            return Err(StoreError::DuplicateId {
                collection: collection.as_collection(),
                id: record.id.to_string(),
            });
        }

        tracing::debug!(
            review_id = %record.id,
            device_id = %record.device_id,
            stage = %record.stage,
            status = %record.status,
            "Review appended to ledger"
        );

        match collection {
            ReviewCollection::Qc => self.qc_reviews.push(record),
            ReviewCollection::Technician => self.technician_reviews.push(record),
            ReviewCollection::Clearance => self.clearance_reviews.push(record),
            ReviewCollection::Inventory => self.inventory_reviews.push(record),
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReviewRecord> {
        self.qc_reviews
            .iter()
            .chain(&self.technician_reviews)
            .chain(&self.clearance_reviews)
            .chain(&self.inventory_reviews)
    }

    pub fn len(&self) -> usize {
        ReviewCollection::ALL
            .iter()
            .map(|c| self.collection(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &ReviewId) -> bool {
        self.iter().any(|record| &record.id == id)
    }

    /// Full history of one device, oldest first
    pub fn for_device(&self, device_id: &DeviceId) -> Vec<&ReviewRecord> {
        let mut records: Vec<_> = self
            .iter()
            .filter(|record| &record.device_id == device_id)
            .collect();
        records.sort_by_key(|record| record.created_at);
        records
    }

    pub fn by_stage(&self, stage: ReviewStage) -> Vec<&ReviewRecord> {
        self.collection(stage.collection())
            .iter()
            .filter(|record| record.stage == stage)
            .collect()
    }

    pub fn by_reviewer(&self, reviewer_id: &UserId) -> Vec<&ReviewRecord> {
        self.iter()
            .filter(|record| &record.reviewer_id == reviewer_id)
            .collect()
    }

    /// Number of `status` decisions filed on `day` (UTC), optionally for one stage
    pub fn count_on(&self, day: NaiveDate, status: ReviewStatus, stage: Option<ReviewStage>) -> usize {
        self.iter()
            .filter(|record| record.created_at.date_naive() == day)
            .filter(|record| record.status == status)
            .filter(|record| stage.is_none_or(|stage| record.stage == stage))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: &str, device: &str, stage: ReviewStage, status: ReviewStatus) -> ReviewRecord {
        ReviewRecord {
            id: ReviewId::new(id),
            device_id: DeviceId::new(device),
            order_id: String::new(),
            reviewer_id: UserId::new("u-qc"),
            stage,
            status,
            notes: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_append_routes_by_collection() {
        let mut ledger = ReviewLedger::new();
        ledger
            .append(ReviewCollection::Qc, record("r-1", "d-1", ReviewStage::Qc, ReviewStatus::Approved))
            .unwrap();
        ledger
            .append(ReviewCollection::Qc, record("r-2", "d-1", ReviewStage::RepairQc, ReviewStatus::Rejected))
            .unwrap();
        ledger
            .append(ReviewCollection::Clearance, record("r-3", "d-1", ReviewStage::Clearance, ReviewStatus::Approved))
            .unwrap();

        assert_eq!(ledger.collection(ReviewCollection::Qc).len(), 2);
        assert_eq!(ledger.collection(ReviewCollection::Clearance).len(), 1);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.by_stage(ReviewStage::RepairQc).len(), 1);
        assert_eq!(ledger.by_stage(ReviewStage::Qc).len(), 1);
    }

    #[test]
    fn test_append_rejects_wrong_collection() {
        let mut ledger = ReviewLedger::new();
        let err = ledger
            .append(
                ReviewCollection::Inventory,
                record("r-1", "d-1", ReviewStage::Clearance, ReviewStatus::Approved),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_append_rejects_duplicate_id_across_collections() {
        let mut ledger = ReviewLedger::new();
        ledger
            .append(ReviewCollection::Qc, record("r-1", "d-1", ReviewStage::Qc, ReviewStatus::Approved))
            .unwrap();
        let err = ledger
            .append(
                ReviewCollection::Inventory,
                record("r-1", "d-2", ReviewStage::Inventory, ReviewStatus::Rejected),
            )
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateId {
                collection: Collection::InventoryReviews,
                id: "r-1".to_string()
            }
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_count_on_day() {
        let mut ledger = ReviewLedger::new();
        ledger
            .append(ReviewCollection::Qc, record("r-1", "d-1", ReviewStage::Qc, ReviewStatus::Approved))
            .unwrap();
        let mut late = record("r-2", "d-2", ReviewStage::Qc, ReviewStatus::Approved);
        late.created_at = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        ledger.append(ReviewCollection::Qc, late).unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(ledger.count_on(day, ReviewStatus::Approved, None), 1);
        assert_eq!(ledger.count_on(day, ReviewStatus::Rejected, None), 0);
        assert_eq!(ledger.count_on(day, ReviewStatus::Approved, Some(ReviewStage::Clearance)), 0);
        assert_eq!(ledger.count_on(day, ReviewStatus::Approved, Some(ReviewStage::Qc)), 1);
    }

    #[test]
    fn test_for_device_is_chronological() {
        let mut ledger = ReviewLedger::new();
        let mut later = record("r-1", "d-1", ReviewStage::Clearance, ReviewStatus::Approved);
        later.created_at = Utc.with_ymd_and_hms(2024, 5, 3, 9, 0, 0).unwrap();
        ledger.append(ReviewCollection::Clearance, later).unwrap();
        ledger
            .append(ReviewCollection::Qc, record("r-2", "d-1", ReviewStage::Qc, ReviewStatus::Approved))
            .unwrap();
        ledger
            .append(ReviewCollection::Qc, record("r-3", "d-2", ReviewStage::Qc, ReviewStatus::Approved))
            .unwrap();

        let history = ledger.for_device(&DeviceId::new("d-1"));
        let ids: Vec<_> = history.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r-2", "r-1"]);
    }
}
