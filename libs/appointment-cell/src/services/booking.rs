use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use availability_cell::services::availability::AvailabilityService;
use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::AppointmentRequest;

/// Books, cancels and queries appointments. Slot lookups and state
/// transitions go through the availability service's contract; this service
/// is the sole writer of appointment records.
pub struct AppointmentService {
    state: Arc<AppState>,
    availability_service: AvailabilityService,
}

impl AppointmentService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            availability_service: AvailabilityService::new(state),
            state: Arc::clone(state),
        }
    }

    /// Book an appointment against a provider's published slot. Claiming
    /// the slot is a single atomic conditional update, so two concurrent
    /// bookings of the same slot cannot both succeed.
    pub async fn create_appointment(
        &self,
        caller: &AuthUser,
        request: AppointmentRequest,
    ) -> Result<Appointment, AppError> {
        if !caller.has_role(Role::Patient) {
            return Err(AppError::Auth(
                "Only patients can book appointments".to_string(),
            ));
        }

        let provider = self
            .state
            .users
            .get(request.provider_id)
            .await
            .ok_or_else(|| AppError::BadRequest("Provider not found".to_string()))?;

        if !provider.has_role(Role::Provider) {
            return Err(AppError::BadRequest(
                "Selected user is not a provider".to_string(),
            ));
        }

        if request.start_time >= request.end_time {
            return Err(AppError::BadRequest(
                "Start time must be before end time".to_string(),
            ));
        }

        let available = self
            .availability_service
            .is_time_available(
                request.provider_id,
                request.date,
                request.start_time,
                request.end_time,
            )
            .await;

        if !available {
            return Err(AppError::BadRequest(
                "Selected time is not available".to_string(),
            ));
        }

        // Claim the covering slot. A concurrent booking may have won it
        // since the availability check; the claim itself is the authority.
        let slot = self
            .availability_service
            .claim_slot(
                request.provider_id,
                request.date,
                request.start_time,
                request.end_time,
            )
            .await
            .ok_or_else(|| AppError::BadRequest("Selected time is not available".to_string()))?;

        let appointment = Appointment {
            id: Uuid::nil(), // store-assigned
            patient_id: caller.id,
            provider_id: request.provider_id,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            status: AppointmentStatus::Booked,
        };

        let saved = self.state.appointments.insert(appointment).await;

        info!(
            "Appointment {} booked: patient {} with provider {} (slot {})",
            saved.id, caller.id, request.provider_id, slot.id
        );
        Ok(saved)
    }

    /// Appointments where the caller is the patient (if they carry PATIENT)
    /// or the provider (if PROVIDER); empty for anyone else.
    pub async fn get_appointments_current_user(&self, caller: &AuthUser) -> Vec<Appointment> {
        if caller.has_role(Role::Patient) {
            self.state.appointments.find_by_patient(caller.id).await
        } else if caller.has_role(Role::Provider) {
            self.state.appointments.find_by_provider(caller.id).await
        } else {
            Vec::new()
        }
    }

    pub async fn get_appointment_by_id(
        &self,
        caller: &AuthUser,
        id: Uuid,
    ) -> Result<Appointment, AppError> {
        let appointment = self
            .state
            .appointments
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        self.authorize_access(caller, &appointment)?;
        Ok(appointment)
    }

    /// Cancel a booked appointment and restore its slot. The slot is
    /// released before the status flip so a failed restore leaves the
    /// appointment untouched.
    pub async fn cancel_appointment(
        &self,
        caller: &AuthUser,
        id: Uuid,
    ) -> Result<Appointment, AppError> {
        let mut appointment = self
            .state
            .appointments
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        self.authorize_access(caller, &appointment)?;

        if appointment.status == AppointmentStatus::Cancelled {
            return Err(AppError::Unsupported(
                "Appointment has already been cancelled".to_string(),
            ));
        }

        let released = self
            .availability_service
            .release_slot(
                appointment.provider_id,
                appointment.date,
                appointment.start_time,
                appointment.end_time,
            )
            .await
            .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))?;

        debug!(
            "Slot {} restored for provider {}",
            released.id, appointment.provider_id
        );

        appointment.status = AppointmentStatus::Cancelled;
        let saved = self
            .state
            .appointments
            .update(appointment)
            .await
            .ok_or_else(|| AppError::Internal("Failed to update appointment".to_string()))?;

        info!("Appointment {} cancelled by {}", saved.id, caller.id);
        Ok(saved)
    }

    /// Every appointment, for auditing. Admin only; order not guaranteed.
    pub async fn get_all_appointments(
        &self,
        caller: &AuthUser,
    ) -> Result<Vec<Appointment>, AppError> {
        if !caller.has_role(Role::Admin) {
            return Err(AppError::Auth(
                "User must be admin to see all appointments".to_string(),
            ));
        }
        Ok(self.state.appointments.all().await)
    }

    fn authorize_access(
        &self,
        caller: &AuthUser,
        appointment: &Appointment,
    ) -> Result<(), AppError> {
        if caller.id != appointment.patient_id
            && caller.id != appointment.provider_id
            && !caller.has_role(Role::Admin)
        {
            return Err(AppError::Auth(
                "User is not the patient or provider for the appointment, nor admin".to_string(),
            ));
        }
        Ok(())
    }
}
