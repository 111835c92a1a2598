// Starter snapshot written by `refurb-tracker init`

use crate::entities::{Role, Technician, User};
use crate::store::AppState;
use crate::workflow::Clock;

pub const SEED_CLIENT_ID: &str = "client-1";
pub const SEED_ENTERPRISE_ID: &str = "enterprise-1";
pub const SEED_ADMIN_ID: &str = "admin-1";

pub fn seed_state<C: Clock>(clock: &C) -> AppState {
    let now = clock.now();
    let users = vec![
        User::new(SEED_CLIENT_ID, "client@refurb.example", "Client Account", Role::Client, now),
        User::new(
            SEED_ENTERPRISE_ID,
            "ops@refurb.example",
            "Operations Team",
            Role::Enterprise,
            now,
        ),
        User::new(SEED_ADMIN_ID, "admin@refurb.example", "Administrator", Role::Admin, now),
    ];
    let technicians = vec![
        Technician::new("tech-1", "Sam Ortega", "sam@refurb.example", "Screens and batteries", now),
        Technician::new("tech-2", "Ren Ito", "ren@refurb.example", "Board-level repair", now),
    ];

    AppState {
        users,
        technicians,
        ..AppState::default()
    }
}
