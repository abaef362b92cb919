//! Event payloads published on the internal bus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope carried on the bus and over the dashboard stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new reservation was committed
    BookingCreated {
        booking_id: String,
        user_id: String,
        location_id: String,
        total_price: i64,
    },
    /// An existing reservation was lengthened
    BookingExtended {
        booking_id: String,
        original_booking_id: String,
        user_id: String,
        new_end_date: DateTime<Utc>,
        added_price: i64,
    },
    /// A location's remaining capacity changed
    LocationCapacityChanged {
        location_id: String,
        capacity: i32,
    },
    /// Something went wrong that operators should see
    Error {
        message: String,
    },
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BookingCreated { .. } => "booking_created",
            Self::BookingExtended { .. } => "booking_extended",
            Self::LocationCapacityChanged { .. } => "location_capacity_changed",
            Self::Error { .. } => "error",
        }
    }

    /// User the event concerns, when it concerns one.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::BookingCreated { user_id, .. } | Self::BookingExtended { user_id, .. } => {
                Some(user_id)
            }
            _ => None,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_flattened_type_tag() {
        let msg = EventMessage::new(Event::LocationCapacityChanged {
            location_id: "loc-1".into(),
            capacity: 4,
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "location_capacity_changed");
        assert_eq!(json["location_id"], "loc-1");
        assert_eq!(json["capacity"], 4);
    }

    #[test]
    fn event_type_names() {
        let e = Event::BookingCreated {
            booking_id: "bk-1".into(),
            user_id: "user-1".into(),
            location_id: "loc-1".into(),
            total_price: 150_000,
        };
        assert_eq!(e.event_type(), "booking_created");
        assert_eq!(e.user_id(), Some("user-1"));
    }
}
