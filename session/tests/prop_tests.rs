use proptest::prelude::*;

use rlp_nullables::NullClock;
use rlp_session::{Session, SessionConfig};
use rlp_types::Amount;

proptest! {
    /// A run of payments over a valid table grows the ledger by 1 + N records
    /// per payment, keeps timestamps ordered, and distributes everything.
    #[test]
    fn payments_accumulate_in_ledger(
        payments in prop::collection::vec((0.0f64..1e4, 0u64..5_000_000), 1..20),
    ) {
        let clock = NullClock::at_secs(1_700_000_000);
        let mut s = Session::with_clock(SessionConfig::default(), &clock);

        let mut expected_income = 0.0;
        for (amount, step) in &payments {
            clock.advance(*step);
            let receipt = s.execute_distribution(Amount::new(*amount), "p").unwrap();
            prop_assert!((receipt.distributed.value() - amount).abs() <= 1e-9 * amount.max(1.0));
            expected_income += amount;
        }

        prop_assert_eq!(s.ledger().len(), payments.len() * 5);
        prop_assert!(s.ledger().is_time_ordered());
        let summary = s.summary();
        prop_assert_eq!(summary.distributions, payments.len() as u64);
        prop_assert!((summary.income_volume.value() - expected_income).abs() <= 1e-6);
        prop_assert!((summary.payout_volume.value() - expected_income).abs() <= 1e-6);
    }
}
