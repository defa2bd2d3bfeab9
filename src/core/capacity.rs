use thiserror::Error;
use uuid::Uuid;

use crate::models::{Venue, VenueChange};

/// Reservation refused by a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[error("Venue {0} has no available slots")]
    Exhausted(Uuid),

    #[error("Venue {0} is inactive")]
    Inactive(Uuid),
}

/// Slot bookkeeping implied by a venue change on an existing match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTransition {
    Unchanged,
    Release(Uuid),
    Reserve(Uuid),
    /// Release `from` and reserve `to` as one step
    Swap { from: Uuid, to: Uuid },
}

/// Work out which slots move when `change` is applied to a match on `current`
pub fn plan_transition(current: Option<Uuid>, change: VenueChange) -> SlotTransition {
    match (current, change) {
        (_, VenueChange::Keep) => SlotTransition::Unchanged,
        (None, VenueChange::Clear) => SlotTransition::Unchanged,
        (Some(old), VenueChange::Clear) => SlotTransition::Release(old),
        (None, VenueChange::Assign(new)) => SlotTransition::Reserve(new),
        (Some(old), VenueChange::Assign(new)) if old == new => SlotTransition::Unchanged,
        (Some(old), VenueChange::Assign(new)) => SlotTransition::Swap { from: old, to: new },
    }
}

/// Take one slot. Fails without touching the venue when it is full or inactive.
pub fn reserve(venue: &mut Venue) -> Result<(), CapacityError> {
    if !venue.is_active {
        return Err(CapacityError::Inactive(venue.id));
    }
    if venue.available_slots <= 0 {
        return Err(CapacityError::Exhausted(venue.id));
    }
    venue.available_slots -= 1;
    Ok(())
}

/// Give one slot back, never beyond total capacity
pub fn release(venue: &mut Venue) {
    venue.available_slots = (venue.available_slots + 1).min(venue.total_capacity);
}

/// Move the slot counter by `delta`
///
/// Negative deltas must fit in the free slots; positive deltas saturate at
/// total capacity.
pub fn apply_delta(venue: &mut Venue, delta: i32) -> Result<(), CapacityError> {
    let next = venue.available_slots + delta;
    if next < 0 {
        return Err(CapacityError::Exhausted(venue.id));
    }
    venue.available_slots = next.min(venue.total_capacity);
    Ok(())
}

/// Free slots after a capacity change, keeping slots already in use
pub fn resized_available(total_capacity: i32, available_slots: i32, new_capacity: i32) -> i32 {
    let used = total_capacity - available_slots;
    (new_capacity - used).max(0)
}

/// Whether a participant of `age` may be seated at `venue`. Unknown ages pass.
pub fn admits_age(venue: &Venue, age: Option<i32>) -> bool {
    age.map_or(true, |age| age >= venue.min_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn venue(total: i32, available: i32) -> Venue {
        Venue {
            id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            name: "Cafe".to_string(),
            address: None,
            total_capacity: total,
            available_slots: available,
            min_age: 21,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_reserve_and_release() {
        let mut v = venue(2, 2);
        reserve(&mut v).unwrap();
        reserve(&mut v).unwrap();
        assert_eq!(reserve(&mut v), Err(CapacityError::Exhausted(v.id)));
        assert_eq!(v.available_slots, 0);

        release(&mut v);
        release(&mut v);
        release(&mut v);
        assert_eq!(v.available_slots, 2);
    }

    #[test]
    fn test_inactive_venue_refuses() {
        let mut v = venue(3, 3);
        v.is_active = false;
        assert_eq!(reserve(&mut v), Err(CapacityError::Inactive(v.id)));
        assert_eq!(v.available_slots, 3);
    }

    #[test]
    fn test_apply_delta_bounds() {
        let mut v = venue(5, 1);
        assert!(apply_delta(&mut v, -2).is_err());
        assert_eq!(v.available_slots, 1);
        apply_delta(&mut v, 10).unwrap();
        assert_eq!(v.available_slots, 5);
    }

    #[test]
    fn test_resize_keeps_used_slots() {
        // 10 seats, 4 in use
        assert_eq!(resized_available(10, 6, 12), 8);
        assert_eq!(resized_available(10, 6, 3), 0);
    }

    #[test]
    fn test_plan_transition() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        assert_eq!(plan_transition(Some(a), VenueChange::Keep), SlotTransition::Unchanged);
        assert_eq!(plan_transition(Some(a), VenueChange::Clear), SlotTransition::Release(a));
        assert_eq!(plan_transition(None, VenueChange::Clear), SlotTransition::Unchanged);
        assert_eq!(plan_transition(None, VenueChange::Assign(b)), SlotTransition::Reserve(b));
        assert_eq!(plan_transition(Some(a), VenueChange::Assign(a)), SlotTransition::Unchanged);
        assert_eq!(
            plan_transition(Some(a), VenueChange::Assign(b)),
            SlotTransition::Swap { from: a, to: b }
        );
    }

    #[test]
    fn test_age_gate() {
        let v = venue(1, 1);
        assert!(admits_age(&v, Some(21)));
        assert!(!admits_age(&v, Some(20)));
        assert!(admits_age(&v, None));
    }
}
