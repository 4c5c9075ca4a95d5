//! Property-based tests for core components using proptest.

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use arbiter_core::args::{quote_strings, split_quoted_string};
use arbiter_core::properties::{parse_property_string, properties_to_string};
use arbiter_core::{AlgorithmCategory, AllowList, Catalog};

fn write_partition(ids: &BTreeSet<String>) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base");
    std::fs::create_dir_all(&base).unwrap();
    for id in ids {
        std::fs::write(base.join(format!("{}.params", id)), b"").unwrap();
    }
    dir
}

// --- Property string codec ---

proptest! {
    #[test]
    fn property_codec_round_trips(
        props in prop::collection::btree_map("[a-z][a-z0-9.]{0,10}", "[a-zA-Z0-9 ./:=-]{0,20}", 0..8)
    ) {
        let encoded = properties_to_string(&props);
        let decoded = parse_property_string(&encoded).unwrap();
        prop_assert_eq!(decoded, props);
    }

    #[test]
    fn property_encoding_has_no_bare_colons(
        value in "[a-z:]{0,20}"
    ) {
        let props: BTreeMap<String, String> = [("k".to_string(), value.clone())].into();
        let encoded = properties_to_string(&props);
        prop_assert_eq!(
            encoded.matches(':').count(),
            encoded.matches("__COLONESCAPE__:").count()
        );
        prop_assert_eq!(encoded.matches("__COLONESCAPE__:").count(), value.matches(':').count());
    }

    #[test]
    fn quoted_atoms_survive_split(
        atoms in prop::collection::vec("[a-z0-9.-]{1,8}( [a-z0-9.-]{1,8}){0,2}", 0..6)
    ) {
        let joined = quote_strings(&atoms).join(" ");
        prop_assert_eq!(split_quoted_string(&joined), atoms);
    }
}

// --- Catalog enumeration ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn catalog_lists_sorted_unique(
        ids in prop::collection::btree_set("[a-z]{1,6}(\\.[A-Za-z0-9]{1,6}){0,3}", 0..12)
    ) {
        let dir = write_partition(&ids);
        let listed: Vec<String> = Catalog::new(dir.path())
            .list_candidates(AlgorithmCategory::BaseClassifier, None)
            .unwrap()
            .into_iter()
            .map(|d| d.identifier)
            .collect();

        prop_assert!(listed.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(listed, ids.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn allow_list_is_membership_filter(
        ids in prop::collection::btree_set("[A-F]{1,3}", 0..10),
        allowed in prop::collection::btree_set("[A-F]{1,3}", 0..10),
    ) {
        let dir = write_partition(&ids);
        let allow: AllowList = allowed.iter().cloned().collect();
        let listed: BTreeSet<String> = Catalog::new(dir.path())
            .list_candidates(AlgorithmCategory::BaseClassifier, Some(&allow))
            .unwrap()
            .into_iter()
            .map(|d| d.identifier)
            .collect();

        let expected: BTreeSet<String> = ids.intersection(&allowed).cloned().collect();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn listing_is_idempotent(
        ids in prop::collection::btree_set("[a-z]{1,8}", 0..8)
    ) {
        let dir = write_partition(&ids);
        let catalog = Catalog::new(dir.path());
        let first = catalog.list_candidates(AlgorithmCategory::BaseClassifier, None).unwrap();
        let second = catalog.list_candidates(AlgorithmCategory::BaseClassifier, None).unwrap();
        prop_assert_eq!(first, second);
    }
}
