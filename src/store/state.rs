use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::report::deserialize_reports;
use crate::entities::{
    AppSettings, Device, DeviceId, DeviceStatus, Order, OrderId, OrderProgress, Report, Role,
    Technician, TechnicianId, TechnicianWorkload, User, UserId,
};
use crate::ledger::ReviewLedger;

pub const LOGIN_PAGE: &str = "login";
pub const DASHBOARD_PAGE: &str = "dashboard";

/// One immutable snapshot of everything the tracker knows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub is_authenticated: bool,
    #[serde(default)]
    pub current_user: Option<User>,
    pub current_page: String,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub technicians: Vec<Technician>,
    #[serde(default, deserialize_with = "deserialize_reports")]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub reviews: ReviewLedger,
    #[serde(default)]
    pub settings: AppSettings,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            is_authenticated: false,
            current_user: None,
            current_page: LOGIN_PAGE.to_string(),
            users: Vec::new(),
            devices: Vec::new(),
            orders: Vec::new(),
            technicians: Vec::new(),
            reports: Vec::new(),
            reviews: ReviewLedger::default(),
            settings: AppSettings::default(),
        }
    }
}

impl AppState {
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| &user.id == id)
    }

    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|device| &device.id == id)
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    pub fn technician(&self, id: &TechnicianId) -> Option<&Technician> {
        self.technicians.iter().find(|tech| &tech.id == id)
    }

    pub fn devices_with_status(&self, status: DeviceStatus) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(move |device| device.status == status)
    }

    pub fn devices_for_client<'a>(&'a self, client_id: &'a UserId) -> impl Iterator<Item = &'a Device> {
        self.devices
            .iter()
            .filter(move |device| &device.client_id == client_id)
    }

    /// Device count per status; every status is present
    pub fn status_counts(&self) -> BTreeMap<DeviceStatus, usize> {
        let mut counts: BTreeMap<_, _> = DeviceStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for device in &self.devices {
            *counts.entry(device.status).or_default() += 1;
        }
        counts
    }

    /// Assignments derived from the devices' `technicianId`
    pub fn technician_workload(&self, id: &TechnicianId) -> Option<TechnicianWorkload> {
        self.technician(id)?;
        let mine = self
            .devices
            .iter()
            .filter(|device| device.technician_id.as_ref() == Some(id));

        let mut assigned = Vec::new();
        let mut completed = 0;
        for device in mine {
            match device.status {
                DeviceStatus::Completed => completed += 1,
                DeviceStatus::Failed => {}
                _ => assigned.push(device.id.clone()),
            }
        }

        Some(TechnicianWorkload {
            technician_id: id.clone(),
            assigned,
            completed,
        })
    }

    /// Live progress of an order, read from the device collection
    pub fn order_progress(&self, id: &OrderId) -> Option<OrderProgress> {
        let order = self.order(id)?;
        let mut progress = OrderProgress {
            total: order.device_ids.len(),
            ..Default::default()
        };
        for device_id in &order.device_ids {
            match self.device(device_id).map(|d| d.status) {
                Some(DeviceStatus::Completed) => progress.completed += 1,
                Some(DeviceStatus::Failed) => progress.failed += 1,
                Some(_) => progress.in_progress += 1,
                None => progress.missing += 1,
            }
        }
        Some(progress)
    }

    pub fn reports_visible_to(&self, role: Role) -> Vec<&Report> {
        self.reports
            .iter()
            .filter(|report| report.visible_to(role))
            .collect()
    }
}
