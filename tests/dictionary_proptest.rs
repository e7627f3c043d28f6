//! Property-based round-trip and invariant tests for both dictionary
//! variants.

use dictcore::{ByteString, VdctDictionary, VpfstDictionary};
use proptest::collection::vec as pvec;
use proptest::prelude::*;

fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    pvec(any::<u8>(), 0..12)
}

proptest! {
    #[test]
    fn vdct_round_trips_every_inserted_key(pairs in pvec((arb_bytes(), arb_bytes()), 1..20)) {
        let mut dict = VdctDictionary::new();
        let mut expected = std::collections::HashMap::new();
        for (k, v) in &pairs {
            let key = ByteString::new(k.clone());
            let value = ByteString::new(v.clone());
            dict.put(&key, &value).unwrap();
            expected.insert(k.clone(), v.clone());
        }
        dict.compile().unwrap();

        for (k, v) in &expected {
            let got = dict.get(&ByteString::new(k.clone())).unwrap();
            prop_assert_eq!(got, Some(ByteString::new(v.clone())));
        }
    }

    #[test]
    fn vpfst_round_trips_every_inserted_key(pairs in pvec((arb_bytes(), arb_bytes()), 1..20)) {
        let mut dict = VpfstDictionary::new();
        let mut expected = std::collections::HashMap::new();
        for (k, v) in &pairs {
            let key = ByteString::new(k.clone());
            let value = ByteString::new(v.clone());
            dict.put(&key, &value).unwrap();
            expected.insert(k.clone(), v.clone());
        }
        dict.compile().unwrap();

        for (k, v) in &expected {
            let got = dict.get(&ByteString::new(k.clone())).unwrap();
            prop_assert_eq!(got, Some(ByteString::new(v.clone())));
        }
    }

    #[test]
    fn vdct_longest_declared_prefix_wins_when_no_exact_match(
        prefix in arb_bytes(),
        suffix in pvec(any::<u8>(), 1..6),
        prefix_value in arb_bytes(),
    ) {
        let mut dict = VdctDictionary::new();
        let prefix_key = ByteString::new(prefix.clone());
        let prefix_val = ByteString::new(prefix_value.clone());
        dict.put_as_prefix(&prefix_key, &prefix_val, true).unwrap();
        dict.compile().unwrap();

        let mut extended = prefix.clone();
        extended.extend_from_slice(&suffix);
        let got = dict.get(&ByteString::new(extended)).unwrap();
        prop_assert_eq!(got, Some(prefix_val));
    }
}
