use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::availability::AvailabilitySlot;

/// Store of record for provider availability slots, keyed by slot id.
///
/// `claim` and `release` are the only mutations the booking workflow uses;
/// both run check-and-flip inside a single write-lock section so at most
/// one concurrent caller can win a given slot.
pub struct AvailabilityStore {
    slots: RwLock<HashMap<Uuid, AvailabilitySlot>>,
}

impl AvailabilityStore {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Persist a batch of new slots. Ids are store-assigned.
    pub async fn insert_batch(&self, mut batch: Vec<AvailabilitySlot>) -> Vec<AvailabilitySlot> {
        let mut slots = self.slots.write().await;
        for slot in &mut batch {
            slot.id = Uuid::new_v4();
            slots.insert(slot.id, slot.clone());
        }
        debug!("Persisted {} availability slots", batch.len());
        batch
    }

    pub async fn get(&self, id: Uuid) -> Option<AvailabilitySlot> {
        self.slots.read().await.get(&id).cloned()
    }

    /// Replace an existing slot. Returns `None` when the id is unknown.
    pub async fn update(&self, slot: AvailabilitySlot) -> Option<AvailabilitySlot> {
        let mut slots = self.slots.write().await;
        if !slots.contains_key(&slot.id) {
            return None;
        }
        slots.insert(slot.id, slot.clone());
        Some(slot)
    }

    pub async fn delete(&self, id: Uuid) -> bool {
        self.slots.write().await.remove(&id).is_some()
    }

    /// All slots for a provider with date in [from, to], unsorted.
    pub async fn find_by_provider_in_range(
        &self,
        provider_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<AvailabilitySlot> {
        self.slots
            .read()
            .await
            .values()
            .filter(|s| s.provider_id == provider_id && s.date >= from && s.date <= to)
            .cloned()
            .collect()
    }

    /// True iff an available slot for the provider fully covers [start, end).
    pub async fn is_time_available(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> bool {
        self.find_covering(provider_id, date, start, end, true)
            .await
            .is_some()
    }

    /// Covering-slot lookup; `available` selects between open and booked
    /// slots.
    pub async fn find_covering(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        available: bool,
    ) -> Option<AvailabilitySlot> {
        self.slots
            .read()
            .await
            .values()
            .find(|s| {
                s.provider_id == provider_id
                    && s.is_available == available
                    && s.covers(date, start, end)
            })
            .cloned()
    }

    /// Atomically claim the covering available slot: find it and flip
    /// `is_available` to false without releasing the write lock in between.
    /// Returns `None` when no available slot covers the span.
    pub async fn claim(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Option<AvailabilitySlot> {
        let mut slots = self.slots.write().await;
        let slot = slots
            .values_mut()
            .find(|s| s.provider_id == provider_id && s.is_available && s.covers(date, start, end))?;
        slot.is_available = false;
        debug!("Claimed slot {} for provider {}", slot.id, provider_id);
        Some(slot.clone())
    }

    /// Atomic counterpart of `claim`: restore the covering booked slot to
    /// available. Returns `None` when no booked slot matches.
    pub async fn release(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Option<AvailabilitySlot> {
        let mut slots = self.slots.write().await;
        let slot = slots
            .values_mut()
            .find(|s| s.provider_id == provider_id && !s.is_available && s.covers(date, start, end))?;
        slot.is_available = true;
        debug!("Released slot {} for provider {}", slot.id, provider_id);
        Some(slot.clone())
    }
}

impl Default for AvailabilityStore {
    fn default() -> Self {
        Self::new()
    }
}
