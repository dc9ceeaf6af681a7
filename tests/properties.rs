//! Property-based tests for naming and type merging.

use std::collections::HashSet;

use proptest::prelude::*;
use wsdlschema::names::snake_case;
use wsdlschema::{NamespacedMap, TypeDefinition};

fn definition_with_order(order: &[String]) -> TypeDefinition {
    let mut definition = TypeDefinition::new(Some("urn:props"));
    for name in order {
        definition.push_ordered(name.clone());
    }
    definition
}

fn distinct_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-e]{1,2}", 0..8).prop_map(|set| set.into_iter().collect())
}

// =============================================================================
// Operation keys
// =============================================================================

proptest! {
    #[test]
    fn prop_snake_case_is_lowercase(name in "[A-Za-z][A-Za-z0-9.-]{0,24}") {
        let key = snake_case(&name);
        prop_assert!(!key.chars().any(|c| c.is_ascii_uppercase()), "{} -> {}", name, key);
        prop_assert!(!key.contains('.') && !key.contains('-'));
    }

    #[test]
    fn prop_snake_case_is_idempotent(name in "[A-Za-z][A-Za-z0-9_]{0,24}") {
        let once = snake_case(&name);
        prop_assert_eq!(snake_case(&once), once);
    }

    /// Only underscores are ever inserted
    #[test]
    fn prop_snake_case_keeps_letters(name in "[A-Za-z0-9]{1,24}") {
        prop_assert_eq!(snake_case(&name).replace('_', ""), name.to_lowercase());
    }
}

// =============================================================================
// Extension merges
// =============================================================================

proptest! {
    #[test]
    fn prop_inherit_puts_base_first(base in distinct_names(), own in distinct_names()) {
        let mut derived = definition_with_order(&own);
        derived.inherit(&definition_with_order(&base), "Base");

        let order = derived.order.clone().unwrap_or_default();
        prop_assert_eq!(&order[..base.len()], &base[..]);

        let unique: HashSet<&String> = order.iter().collect();
        prop_assert_eq!(unique.len(), order.len(), "duplicate in {:?}", order);

        for name in &own {
            prop_assert!(order.contains(name));
        }
    }

    #[test]
    fn prop_namespaced_map_get_after_insert(
        namespace in prop::option::of("urn:[a-z]{1,6}"),
        name in "[A-Za-z]{1,10}",
    ) {
        let mut map = NamespacedMap::new();
        map.insert(namespace.as_deref(), name.as_str(), 1u32);
        prop_assert_eq!(map.get(namespace.as_deref(), &name), Some(&1));
        prop_assert_eq!(map.len(), 1);
    }
}
