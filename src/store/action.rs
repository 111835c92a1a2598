use crate::entities::{
    Device, DeviceId, Order, Report, Role, SettingsPatch, Technician, TechnicianId, Theme, User,
    UserId, UserPatch,
};
use crate::ledger::{ReviewCollection, ReviewRecord};

/// Everything that can change the app state
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login(User),
    Logout,
    Navigate(String),

    AddDevice(Device),
    UpdateDevice(Device),
    DeleteDevice(DeviceId),

    AddOrder(Order),
    UpdateOrder(Order),

    AddTechnician(Technician),
    UpdateTechnician(Technician),
    DeleteTechnician(TechnicianId),

    AddReport(Report),
    UpdateReport(Report),

    AddQcReview(ReviewRecord),
    AddTechnicianReview(ReviewRecord),
    AddClearanceReview(ReviewRecord),
    AddInventoryReview(ReviewRecord),

    UpdateSettings(SettingsPatch),
    UpdateRoleTheme { role: Role, theme: Theme },
    UpdateUser(UserPatch),
    AddUser(User),
    DeleteUser(UserId),
}

impl Action {
    /// The `Add*Review` action matching the record's stage
    pub fn record_review(record: ReviewRecord) -> Self {
        match record.stage.collection() {
            ReviewCollection::Qc => Action::AddQcReview(record),
            ReviewCollection::Technician => Action::AddTechnicianReview(record),
            ReviewCollection::Clearance => Action::AddClearanceReview(record),
            ReviewCollection::Inventory => Action::AddInventoryReview(record),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Login(_) => "LOGIN",
            Action::Logout => "LOGOUT",
            Action::Navigate(_) => "NAVIGATE",
            Action::AddDevice(_) => "ADD_DEVICE",
            Action::UpdateDevice(_) => "UPDATE_DEVICE",
            Action::DeleteDevice(_) => "DELETE_DEVICE",
            Action::AddOrder(_) => "ADD_ORDER",
            Action::UpdateOrder(_) => "UPDATE_ORDER",
            Action::AddTechnician(_) => "ADD_TECHNICIAN",
            Action::UpdateTechnician(_) => "UPDATE_TECHNICIAN",
            Action::DeleteTechnician(_) => "DELETE_TECHNICIAN",
            Action::AddReport(_) => "ADD_REPORT",
            Action::UpdateReport(_) => "UPDATE_REPORT",
            Action::AddQcReview(_) => "ADD_QC_REVIEW",
            Action::AddTechnicianReview(_) => "ADD_TECHNICIAN_REVIEW",
            Action::AddClearanceReview(_) => "ADD_CLEARANCE_REVIEW",
            Action::AddInventoryReview(_) => "ADD_INVENTORY_REVIEW",
            Action::UpdateSettings(_) => "UPDATE_SETTINGS",
            Action::UpdateRoleTheme { .. } => "UPDATE_ROLE_THEME",
            Action::UpdateUser(_) => "UPDATE_USER",
            Action::AddUser(_) => "ADD_USER",
            Action::DeleteUser(_) => "DELETE_USER",
        }
    }
}
