use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use shared_models::availability::AvailabilitySlot;

/// Booking window declared by a provider; the service partitions it into
/// one-hour slots. The same shape is used to overwrite a single slot on
/// update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRangeQuery {
    /// Absent means "the authenticated provider's own slots".
    pub provider_id: Option<Uuid>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}
