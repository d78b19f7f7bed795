use proptest::prelude::*;

use rlp_types::{Amount, EventId, Share, Timestamp};

proptest! {
    /// Every fraction in [0, 1] is a valid share and round-trips its value.
    #[test]
    fn share_accepts_unit_interval(fraction in 0.0f64..=1.0) {
        let share = Share::new(fraction).unwrap();
        prop_assert_eq!(share.fraction(), fraction);
    }

    /// Anything above one whole is rejected.
    #[test]
    fn share_rejects_above_one(fraction in 1.000_001f64..1_000.0) {
        prop_assert!(Share::new(fraction).is_err());
    }

    /// Multiplying by a share is exactly the f64 product.
    #[test]
    fn amount_mul_share_exact(amount in 0.0f64..1e9, fraction in 0.0f64..=1.0) {
        let share = Share::new(fraction).unwrap();
        prop_assert_eq!((Amount::new(amount) * share).value(), amount * fraction);
    }

    /// A payout never exceeds the amount it was cut from.
    #[test]
    fn payout_bounded_by_amount(amount in 0.0f64..1e9, fraction in 0.0f64..=1.0) {
        let share = Share::new(fraction).unwrap();
        prop_assert!(Amount::new(amount) * share <= Amount::new(amount));
    }

    /// Timestamp ordering: from_micros(a) <= from_micros(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::from_micros(a);
        let tb = Timestamp::from_micros(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Timestamps survive the chrono conversion for any instant chrono can hold.
    #[test]
    fn timestamp_datetime_roundtrip(micros in 0u64..253_402_300_799_000_000) {
        let ts = Timestamp::from_micros(micros);
        prop_assert_eq!(Timestamp::from_datetime(ts.to_datetime()), ts);
    }

    /// Event ids are strictly increasing.
    #[test]
    fn event_id_next_increases(raw in 0u64..u64::MAX) {
        let id = EventId::new(raw);
        prop_assert!(id.next().unwrap() > id);
    }
}

#[test]
fn event_id_next_overflows_to_none() {
    assert!(EventId::new(u64::MAX).next().is_none());
}
