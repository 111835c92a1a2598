// Order intake: turns a client's device submissions into pending devices and
// the order that groups them

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entities::{Device, DeviceId, Order, OrderId, UserId};
use crate::error::ValidationError;
use crate::store::Action;
use crate::validation::{require_imei, require_non_empty, DEFAULT_IMEI_LENGTH};
use crate::workflow::Clock;

/// One device as entered by a client (also the CSV row shape)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSubmission {
    pub brand: String,
    pub model: String,
    pub imei: String,
    #[serde(alias = "reportedIssue")]
    pub issue: String,
}

impl DeviceSubmission {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        imei: impl Into<String>,
        issue: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            imei: imei.into(),
            issue: issue.into(),
        }
    }
}

/// Devices and order created by one submission, not yet dispatched
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: Order,
    pub devices: Vec<Device>,
}

impl PlacedOrder {
    /// Devices first so the order never references an unknown id
    pub fn into_actions(self) -> Vec<Action> {
        let mut actions: Vec<Action> = self.devices.into_iter().map(Action::AddDevice).collect();
        actions.push(Action::AddOrder(self.order));
        actions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderIntake {
    imei_length: usize,
}

impl Default for OrderIntake {
    fn default() -> Self {
        Self::new(DEFAULT_IMEI_LENGTH)
    }
}

impl OrderIntake {
    pub fn new(imei_length: usize) -> Self {
        Self { imei_length }
    }

    pub fn imei_length(&self) -> usize {
        self.imei_length
    }

    /// Checks every submission; the first problem found is reported with its
    /// position, e.g. `devices[1].imei`
    pub fn validate(&self, submissions: &[DeviceSubmission]) -> Result<(), ValidationError> {
        if submissions.is_empty() {
            return Err(ValidationError::new("devices", "at least one device is required"));
        }
        for (index, submission) in submissions.iter().enumerate() {
            let field = |name: &str| format!("devices[{index}].{name}");
            require_non_empty(&field("brand"), &submission.brand)?;
            require_non_empty(&field("model"), &submission.model)?;
            require_non_empty(&field("issue"), &submission.issue)?;
            require_imei(&field("imei"), &submission.imei, self.imei_length)?;
        }
        Ok(())
    }

    pub fn build_order<C: Clock>(
        &self,
        client_id: &UserId,
        submissions: &[DeviceSubmission],
        clock: &C,
    ) -> Result<PlacedOrder, ValidationError> {
        require_non_empty("clientId", client_id.as_str())?;
        self.validate(submissions)?;

        let now = clock.now();
        let order_id = OrderId::generate();
        let devices: Vec<Device> = submissions
            .iter()
            .map(|submission| {
                Device::new(
                    DeviceId::generate(),
                    submission.brand.trim(),
                    submission.model.trim(),
                    submission.imei.trim(),
                    submission.issue.trim(),
                    client_id.clone(),
                    now,
                )
                .with_order(order_id.clone())
            })
            .collect();
        let order = Order::new(
            order_id,
            client_id.clone(),
            devices.iter().map(|device| device.id.clone()).collect(),
            now,
        );

        info!(
            order_id = %order.id,
            client_id = %client_id,
            devices = devices.len(),
            "Order built from submissions"
        );
        Ok(PlacedOrder { order, devices })
    }
}
