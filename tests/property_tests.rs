//! Property-based tests using proptest
//!
//! These tests verify invariants across randomized inputs, helping catch
//! edge cases that might be missed by example-based testing.

use drinks_api::{
    Drink, DrinkFields, DrinkRepository, SqliteDrinkStore,
    serializer::{self, DESCRIPTION_MAX_LENGTH, NAME_MAX_LENGTH},
};
use proptest::prelude::*;
use serde_json::json;

// =============================================================================
// Strategies
// =============================================================================

/// Text with no surrounding whitespace, so it survives trimming unchanged
fn arb_text(max_inner: usize) -> impl Strategy<Value = String> {
    let pattern = format!("[A-Za-z0-9][A-Za-z0-9 ,.'-]{{0,{max_inner}}}[A-Za-z0-9.]");
    proptest::string::string_regex(&pattern).expect("valid regex")
}

fn arb_fields() -> impl Strategy<Value = DrinkFields> {
    (arb_text(40), arb_text(120))
        .prop_map(|(name, description)| DrinkFields { name, description })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

async fn memory_store() -> SqliteDrinkStore {
    SqliteDrinkStore::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory store")
}

// =============================================================================
// Serializer Properties
// =============================================================================

proptest! {
    /// Valid payloads decode to exactly the submitted fields
    #[test]
    fn prop_valid_payload_decodes_unchanged(fields in arb_fields()) {
        let body = json!({"name": fields.name, "description": fields.description});
        prop_assert_eq!(serializer::decode(&body).unwrap(), fields);
    }

    /// Dropping a required field always reports exactly that field
    #[test]
    fn prop_missing_field_is_named(fields in arb_fields(), drop_name in any::<bool>()) {
        let (body, missing) = if drop_name {
            (json!({"description": fields.description}), "name")
        } else {
            (json!({"name": fields.name}), "description")
        };

        let errors = serializer::decode(&body).unwrap_err();
        prop_assert_eq!(errors.fields(), vec![missing]);
        prop_assert_eq!(errors.get(missing).unwrap(), [serializer::REQUIRED]);
    }

    /// Whitespace around a value never changes what is stored
    #[test]
    fn prop_surrounding_whitespace_trimmed(
        fields in arb_fields(),
        pad in "[ \t\n]{1,4}",
    ) {
        let body = json!({
            "name": format!("{pad}{}{pad}", fields.name),
            "description": format!("{pad}{}", fields.description),
        });
        prop_assert_eq!(serializer::decode(&body).unwrap(), fields);
    }

    /// Length limits are enforced on character count
    #[test]
    fn prop_length_limits(extra in 1usize..50) {
        let name = "x".repeat(NAME_MAX_LENGTH + extra);
        let body = json!({"name": name, "description": "ok"});
        prop_assert!(serializer::decode(&body).unwrap_err().get("name").is_some());

        let description = "y".repeat(DESCRIPTION_MAX_LENGTH + extra);
        let body = json!({"name": "ok", "description": description});
        prop_assert!(serializer::decode(&body).unwrap_err().get("description").is_some());
    }
}

// =============================================================================
// Store Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Insert then get returns the payload plus an assigned id
    #[test]
    fn prop_insert_then_get(fields in arb_fields()) {
        let rt = runtime();
        let (created, fetched) = rt.block_on(async {
            let store = memory_store().await;
            let created = store.insert(fields.clone()).await.unwrap();
            let fetched = store.get(created.id).await.unwrap();
            (created, fetched)
        });

        prop_assert_eq!(created.fields(), fields);
        prop_assert_eq!(fetched, Some(created));
    }

    /// Listing after N inserts yields N records that survive a JSON round trip
    #[test]
    fn prop_list_returns_every_insert(all in prop::collection::vec(arb_fields(), 0..8)) {
        let rt = runtime();
        let listed = rt.block_on(async {
            let store = memory_store().await;
            for fields in &all {
                store.insert(fields.clone()).await.unwrap();
            }
            store.list().await.unwrap()
        });

        prop_assert_eq!(listed.len(), all.len());
        for (drink, fields) in listed.iter().zip(&all) {
            prop_assert_eq!(&drink.fields(), fields);

            let encoded = serde_json::to_value(drink).unwrap();
            let decoded: Drink = serde_json::from_value(encoded.clone()).unwrap();
            prop_assert_eq!(&decoded, drink);
            prop_assert_eq!(serializer::decode(&encoded).unwrap(), drink.fields());
        }
    }

    /// Deleted ids never resolve again
    #[test]
    fn prop_delete_then_get_is_absent(all in prop::collection::vec(arb_fields(), 1..6)) {
        let rt = runtime();
        let (remaining, victim) = rt.block_on(async {
            let store = memory_store().await;
            let mut ids = Vec::new();
            for fields in &all {
                ids.push(store.insert(fields.clone()).await.unwrap().id);
            }
            let victim = ids[ids.len() / 2];
            assert!(store.delete(victim).await.unwrap());
            (store.get(victim).await.unwrap(), victim)
        });

        prop_assert!(remaining.is_none(), "drink {} still present", victim);
    }
}
