use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::appointment::Appointment;

/// Store of record for appointments, keyed by appointment id. Appointments
/// are never hard-deleted; cancellation is a status transition.
pub struct AppointmentStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self {
            appointments: RwLock::new(HashMap::new()),
        }
    }

    /// Persist a new appointment. The id is store-assigned.
    pub async fn insert(&self, mut appointment: Appointment) -> Appointment {
        let mut appointments = self.appointments.write().await;
        appointment.id = Uuid::new_v4();
        appointments.insert(appointment.id, appointment.clone());
        debug!("Persisted appointment {}", appointment.id);
        appointment
    }

    pub async fn get(&self, id: Uuid) -> Option<Appointment> {
        self.appointments.read().await.get(&id).cloned()
    }

    /// Replace an existing appointment. Returns `None` when the id is
    /// unknown.
    pub async fn update(&self, appointment: Appointment) -> Option<Appointment> {
        let mut appointments = self.appointments.write().await;
        if !appointments.contains_key(&appointment.id) {
            return None;
        }
        appointments.insert(appointment.id, appointment.clone());
        Some(appointment)
    }

    pub async fn find_by_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        self.appointments
            .read()
            .await
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect()
    }

    pub async fn find_by_provider(&self, provider_id: Uuid) -> Vec<Appointment> {
        self.appointments
            .read()
            .await
            .values()
            .filter(|a| a.provider_id == provider_id)
            .cloned()
            .collect()
    }

    /// Every appointment, order not guaranteed.
    pub async fn all(&self) -> Vec<Appointment> {
        self.appointments.read().await.values().cloned().collect()
    }
}

impl Default for AppointmentStore {
    fn default() -> Self {
        Self::new()
    }
}
