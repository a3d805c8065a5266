pub mod appointments;
pub mod availability;
pub mod users;

use shared_config::AppConfig;

use crate::appointments::AppointmentStore;
use crate::availability::AvailabilityStore;
use crate::users::UserStore;

/// Shared application state: configuration plus the three store-of-record
/// collections. Handlers receive this as `State<Arc<AppState>>`.
pub struct AppState {
    pub config: AppConfig,
    pub users: UserStore,
    pub availability: AvailabilityStore,
    pub appointments: AppointmentStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            users: UserStore::new(),
            availability: AvailabilityStore::new(),
            appointments: AppointmentStore::new(),
        }
    }
}
