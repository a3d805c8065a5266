use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};
use shared_models::availability::AvailabilitySlot;
use shared_models::error::AppError;
use shared_store::AppState;

/// Earliest slot boundary a provider may publish.
const BUSINESS_OPEN: NaiveTime = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
/// Latest slot boundary a provider may publish.
const BUSINESS_CLOSE: NaiveTime = NaiveTime::from_hms_opt(17, 0, 0).unwrap();

/// Turns provider-declared booking windows into discrete one-hour slots and
/// owns every slot state transition, including the atomic claim/release
/// used by the booking workflow.
pub struct AvailabilityService {
    state: Arc<AppState>,
}

impl AvailabilityService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: Arc::clone(state),
        }
    }

    /// Partition [start, end) into consecutive one-hour slots owned by the
    /// caller and persist them as a batch. Returned in chronological order.
    pub async fn create_availability(
        &self,
        caller: &AuthUser,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Vec<AvailabilitySlot>, AppError> {
        if !caller.has_role(Role::Provider) {
            return Err(AppError::Auth(
                "Only providers can publish availability".to_string(),
            ));
        }

        validate_window(start_time, end_time)?;

        // Creation only accepts full one-hour blocks.
        if start_time.minute() != 0 || end_time.minute() != 0 {
            return Err(AppError::BadRequest(
                "Availability must be in full 1-hour blocks".to_string(),
            ));
        }

        let mut time_slots = Vec::new();
        let mut slot_start = start_time;
        while slot_start < end_time {
            let slot_end = slot_start + Duration::hours(1);

            time_slots.push(AvailabilitySlot {
                id: Uuid::nil(), // store-assigned
                provider_id: caller.id,
                date,
                start_time: slot_start,
                end_time: slot_end,
                is_available: true,
            });

            slot_start = slot_end;
        }

        debug!(
            "Creating {} slots for provider {} on {}",
            time_slots.len(),
            caller.id,
            date
        );
        Ok(self.state.availability.insert_batch(time_slots).await)
    }

    /// Slots for a provider with date in [from, to], sorted by (date,
    /// start_time). No side effects.
    pub async fn get_availabilities_for_provider(
        &self,
        provider_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<AvailabilitySlot> {
        let mut availabilities = self
            .state
            .availability
            .find_by_provider_in_range(provider_id, from, to)
            .await;

        availabilities.sort_by_key(|a| (a.date, a.start_time));
        availabilities
    }

    pub async fn get_availabilities_for_current_provider(
        &self,
        caller: &AuthUser,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<AvailabilitySlot> {
        self.get_availabilities_for_provider(caller.id, from, to)
            .await
    }

    /// Overwrite one slot's date and times. The window rules apply, but the
    /// one-hour alignment of bulk creation is deliberately not re-checked
    /// here.
    pub async fn update_availability(
        &self,
        caller: &AuthUser,
        id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<AvailabilitySlot, AppError> {
        let mut availability = self
            .state
            .availability
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))?;

        if availability.provider_id != caller.id {
            return Err(AppError::Auth(
                "You can only update your own availability".to_string(),
            ));
        }

        validate_window(start_time, end_time)?;

        availability.date = date;
        availability.start_time = start_time;
        availability.end_time = end_time;

        self.state
            .availability
            .update(availability)
            .await
            .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))
    }

    /// Remove a slot. Allowed for its owning provider or an admin.
    pub async fn delete_availability(&self, caller: &AuthUser, id: Uuid) -> Result<(), AppError> {
        let availability = self
            .state
            .availability
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))?;

        let is_admin = caller.has_role(Role::Admin);
        let is_owner = availability.provider_id == caller.id;

        if !is_admin && !is_owner {
            return Err(AppError::Auth(
                "You can only delete your own availability".to_string(),
            ));
        }

        self.state.availability.delete(id).await;
        Ok(())
    }

    /// True iff an available slot for the provider fully covers
    /// [start, end). Pure query.
    pub async fn is_time_available(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> bool {
        self.state
            .availability
            .is_time_available(provider_id, date, start_time, end_time)
            .await
    }

    pub async fn get_available_slot(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<AvailabilitySlot, AppError> {
        self.state
            .availability
            .find_covering(provider_id, date, start_time, end_time, true)
            .await
            .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))
    }

    /// Symmetric lookup for an already-booked slot, used during
    /// cancellation.
    pub async fn get_booked_slot(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<AvailabilitySlot, AppError> {
        self.state
            .availability
            .find_covering(provider_id, date, start_time, end_time, false)
            .await
            .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))
    }

    /// Atomically claim the covering available slot for a booking. At most
    /// one concurrent caller can win a given slot.
    pub async fn claim_slot(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Option<AvailabilitySlot> {
        self.state
            .availability
            .claim(provider_id, date, start_time, end_time)
            .await
    }

    /// Restore a booked slot to available when its appointment is
    /// cancelled.
    pub async fn release_slot(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Option<AvailabilitySlot> {
        self.state
            .availability
            .release(provider_id, date, start_time, end_time)
            .await
    }
}

fn validate_window(start_time: NaiveTime, end_time: NaiveTime) -> Result<(), AppError> {
    if start_time >= end_time {
        return Err(AppError::BadRequest(
            "Start time must be before end time".to_string(),
        ));
    }

    if start_time < BUSINESS_OPEN {
        return Err(AppError::BadRequest(
            "Start time must be at or after 08:00".to_string(),
        ));
    }

    if end_time > BUSINESS_CLOSE {
        return Err(AppError::BadRequest(
            "End time must be at or before 17:00".to_string(),
        ));
    }

    Ok(())
}
