// Entity model for the refurbishment tracker
//
// Plain data types shared by the workflow engine, the review ledger and the
// store. Field names serialize in camelCase so snapshots keep the same shape
// the web client wrote to local storage.

pub mod device;
pub mod ids;
pub mod order;
pub mod report;
pub mod settings;
pub mod technician;
pub mod user;

pub use device::{Device, DeviceStatus, NoteTrack};
pub use ids::{DeviceId, OrderId, ReportId, ReviewId, TechnicianId, UserId};
pub use order::{Order, OrderProgress, OrderStatus};
pub use report::{LegacyRepairReport, Report};
pub use settings::{AppSettings, RoleThemes, SettingsPatch, Theme};
pub use technician::{Technician, TechnicianWorkload};
pub use user::{Role, User, UserPatch};

use crate::error::Collection;

/// Anything stored in an id-keyed collection of the app state
pub trait Entity {
    const COLLECTION: Collection;

    fn entity_id(&self) -> &str;
}

impl Entity for User {
    const COLLECTION: Collection = Collection::Users;

    fn entity_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Entity for Device {
    const COLLECTION: Collection = Collection::Devices;

    fn entity_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Entity for Order {
    const COLLECTION: Collection = Collection::Orders;

    fn entity_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Entity for Technician {
    const COLLECTION: Collection = Collection::Technicians;

    fn entity_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Entity for Report {
    const COLLECTION: Collection = Collection::Reports;

    fn entity_id(&self) -> &str {
        self.id.as_str()
    }
}
