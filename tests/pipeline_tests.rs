//! End-to-end tests for the query pipeline over catalog resources
//!
//! These tests verify that:
//! - Sorting is stable, case-insensitive and follows the property mappings
//! - Paging reports full counts, including past the last page
//! - Free-text search and specifications narrow the candidates
//! - Field shaping returns exactly the requested fields, in request order

use chrono::TimeZone;
use shelf::prelude::*;
use std::sync::Arc;

fn born(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap()
}

fn pipeline() -> QueryPipeline {
    QueryPipeline::new(
        Arc::new(catalog_mappings().unwrap()),
        Arc::new(QueryConfig::default()),
    )
}

fn collections(names: &[&str]) -> Vec<Collection> {
    names
        .iter()
        .map(|name| Collection::new(*name, "Ana", "Ruiz", born(1980)))
        .collect()
}

fn names(outcome: &QueryOutcome<Collection>) -> Vec<&str> {
    outcome
        .page
        .items()
        .iter()
        .map(|c| c.name.as_str())
        .collect()
}

// =============================================================================
// Sorting and paging
// =============================================================================

mod sorting_and_paging {
    use super::*;

    #[test]
    fn test_second_page_of_case_insensitive_sort() {
        let params = ResourceQueryParameters::default()
            .with_order_by("Name")
            .with_page(2, 2);

        let outcome = pipeline()
            .run::<Collection, CollectionDto>(&params, collections(&["B", "a", "C", "A", "b"]))
            .unwrap();

        assert_eq!(names(&outcome), vec!["B", "b"]);

        let meta = outcome.metadata();
        assert_eq!(meta.total_count, 5);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.current_page, 2);
        assert!(meta.has_next);
        assert!(meta.has_previous);
        assert_eq!(meta.previous_page, Some(1));
        assert_eq!(meta.next_page, Some(3));
    }

    #[test]
    fn test_full_sort_is_stable() {
        let params = ResourceQueryParameters::default().with_order_by("Name");
        let outcome = pipeline()
            .run::<Collection, CollectionDto>(&params, collections(&["B", "a", "C", "A", "b"]))
            .unwrap();

        assert_eq!(names(&outcome), vec!["a", "A", "B", "b", "C"]);
    }

    #[test]
    fn test_descending_sort() {
        let params = ResourceQueryParameters::default().with_order_by("name DESC");
        let outcome = pipeline()
            .run::<Collection, CollectionDto>(&params, collections(&["B", "C", "A"]))
            .unwrap();

        assert_eq!(names(&outcome), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_page_past_the_end_is_empty_with_counts() {
        let params = ResourceQueryParameters::default()
            .with_order_by("Name")
            .with_page(9, 2);

        let outcome = pipeline()
            .run::<Collection, CollectionDto>(&params, collections(&["B", "a", "C"]))
            .unwrap();

        assert!(outcome.records.is_empty());
        let meta = outcome.metadata();
        assert_eq!(meta.total_count, 3);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.current_page, 9);
        assert!(!meta.has_next);
        assert!(meta.has_previous);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let names: Vec<String> = (0..30).map(|i| format!("C{:02}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let params = ResourceQueryParameters::default()
            .with_order_by("Name")
            .with_page(1, 500);

        let outcome = pipeline()
            .run::<Collection, CollectionDto>(&params, collections(&refs))
            .unwrap();

        assert_eq!(outcome.records.len(), 20);
        assert_eq!(outcome.metadata().page_size, 20);
        assert_eq!(outcome.metadata().total_pages, 2);
    }

    #[test]
    fn test_absent_page_size_takes_configured_default() {
        let config = QueryConfig {
            default_page_size: 3,
            ..QueryConfig::default()
        };
        let pipeline = QueryPipeline::new(Arc::new(catalog_mappings().unwrap()), Arc::new(config));
        let params: ResourceQueryParameters = serde_json::from_str("{}").unwrap();
        let names: Vec<String> = (0..12).map(|i| format!("C{:02}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let outcome = pipeline
            .run::<Collection, CollectionDto>(&params, collections(&refs))
            .unwrap();

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.metadata().page_size, 3);
        assert_eq!(outcome.metadata().total_pages, 4);
    }

    #[test]
    fn test_blank_order_by_falls_back_to_id() {
        let items = collections(&["B", "a", "C"]);
        let mut expected: Vec<Uuid> = items.iter().map(|c| c.id).collect();
        expected.sort();

        let params = ResourceQueryParameters::default().with_order_by("  ");
        let outcome = pipeline()
            .run::<Collection, CollectionDto>(&params, items)
            .unwrap();

        let ids: Vec<Uuid> = outcome.page.items().iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_multi_field_key_breaks_ties_on_first_name() {
        let items = vec![
            Collection::new("One", "Zoe", "Berg", born(1980)),
            Collection::new("Two", "Ana", "Ruiz", born(1980)),
            Collection::new("Three", "Ana", "Berg", born(1980)),
        ];
        let params = ResourceQueryParameters::default().with_order_by("Owner");

        let outcome = pipeline()
            .run::<Collection, CollectionDto>(&params, items)
            .unwrap();

        assert_eq!(names(&outcome), vec!["Three", "One", "Two"]);
    }

    #[test]
    fn test_reverted_key_sorts_youngest_first() {
        let items = vec![
            Collection::new("Old", "Ana", "Ruiz", born(1950)),
            Collection::new("Young", "Ana", "Ruiz", born(2000)),
            Collection::new("Middle", "Ana", "Ruiz", born(1975)),
        ];
        let params = ResourceQueryParameters::default().with_order_by("OwnerAge");

        let outcome = pipeline()
            .run::<Collection, CollectionDto>(&params, items)
            .unwrap();

        assert_eq!(names(&outcome), vec!["Young", "Middle", "Old"]);
    }

    #[test]
    fn test_secondary_key_orders_within_primary() {
        let collection = Uuid::new_v4();
        let coins = vec![
            Coin::new(collection, "Pesos", "Mexico", 1.0).with_year(1950),
            Coin::new(collection, "Dollars", "Canada", 1.0).with_year(1990),
            Coin::new(collection, "Centavos", "Mexico", 5.0).with_year(1921),
        ];
        let params = ResourceQueryParameters::default().with_order_by("Country, Year desc");

        let outcome = pipeline().run::<Coin, CoinDto>(&params, coins).unwrap();
        let types: Vec<&str> = outcome
            .page
            .items()
            .iter()
            .map(|c| c.coin_type.as_str())
            .collect();
        assert_eq!(types, vec!["Dollars", "Pesos", "Centavos"]);
    }

    #[test]
    fn test_missing_year_sorts_first() {
        let collection = Uuid::new_v4();
        let coins = vec![
            Coin::new(collection, "Pesos", "Mexico", 1.0).with_year(1950),
            Coin::new(collection, "Reales", "Spain", 8.0),
        ];
        let params = ResourceQueryParameters::default().with_order_by("Year");

        let outcome = pipeline().run::<Coin, CoinDto>(&params, coins).unwrap();
        assert_eq!(outcome.page.items()[0].coin_type, "Reales");
    }
}

// =============================================================================
// Searching and filtering
// =============================================================================

mod searching {
    use super::*;

    #[test]
    fn test_search_is_case_insensitive() {
        let collection = Uuid::new_v4();
        let coins = vec![
            Coin::new(collection, "Pesos", "Mexico", 1.0),
            Coin::new(collection, "Dollars", "Canada", 1.0),
        ];
        let params = ResourceQueryParameters::default().with_search("pesos");

        let outcome = pipeline().run::<Coin, CoinDto>(&params, coins).unwrap();

        assert_eq!(outcome.metadata().total_count, 1);
        assert_eq!(outcome.page.items()[0].coin_type, "Pesos");
    }

    #[test]
    fn test_search_without_match_is_empty() {
        let coins = vec![Coin::new(Uuid::new_v4(), "Pesos", "Mexico", 1.0)];
        let params = ResourceQueryParameters::default().with_search("yen");

        let outcome = pipeline().run::<Coin, CoinDto>(&params, coins).unwrap();

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.metadata().total_count, 0);
        assert_eq!(outcome.metadata().total_pages, 0);
        assert!(!outcome.metadata().has_next);
    }

    #[test]
    fn test_blank_search_keeps_everything() {
        let coins = vec![
            Coin::new(Uuid::new_v4(), "Pesos", "Mexico", 1.0),
            Coin::new(Uuid::new_v4(), "Dollars", "Canada", 1.0),
        ];
        let params = ResourceQueryParameters::default().with_search("   ");

        let outcome = pipeline().run::<Coin, CoinDto>(&params, coins).unwrap();
        assert_eq!(outcome.metadata().total_count, 2);
    }

    #[test]
    fn test_explicit_specification_scopes_to_collection() {
        let mine = Uuid::new_v4();
        let coins = vec![
            Coin::new(mine, "Pesos", "Mexico", 1.0),
            Coin::new(Uuid::new_v4(), "Pesos", "Mexico", 1.0),
            Coin::new(mine, "Dollars", "Canada", 1.0),
        ];
        let spec = CoinSpecs::in_collection(mine) & Coin::search_specification("PESO");

        let outcome = pipeline()
            .run_filtered::<Coin, CoinDto>(&ResourceQueryParameters::default(), coins, Some(&spec))
            .unwrap();

        assert_eq!(outcome.metadata().total_count, 1);
        assert_eq!(outcome.page.items()[0].collection_id, mine);
    }
}

// =============================================================================
// Field shaping
// =============================================================================

mod shaping {
    use super::*;

    #[test]
    fn test_selected_fields_in_request_order() {
        let coins = vec![Coin::new(Uuid::new_v4(), "Pesos", "Mexico", 1.0).with_year(1921)];
        let params = ResourceQueryParameters::default().with_fields("Type, id");

        let outcome = pipeline().run::<Coin, CoinDto>(&params, coins).unwrap();
        let keys: Vec<&str> = outcome.records[0].keys().collect();

        assert_eq!(keys, vec!["Type", "Id"]);
        assert_eq!(
            outcome.records[0].get("Type"),
            Some(&FieldValue::String("Pesos".to_string()))
        );
    }

    #[test]
    fn test_no_selection_returns_every_public_field() {
        let coins = vec![Coin::new(Uuid::new_v4(), "Pesos", "Mexico", 1.0).with_metal("Silver")];

        let outcome = pipeline()
            .run::<Coin, CoinDto>(&ResourceQueryParameters::default(), coins)
            .unwrap();
        let keys: Vec<&str> = outcome.records[0].keys().collect();

        assert_eq!(keys, vec!["Id", "Type", "Country", "Value", "Year"]);
        assert!(outcome.records[0].get("Metal").is_none());
    }

    #[test]
    fn test_shaped_json_uses_public_names() {
        let coins = vec![Coin::new(Uuid::new_v4(), "Pesos", "Mexico", 1.0)];
        let params = ResourceQueryParameters::default().with_fields("Id,Year");

        let outcome = pipeline().run::<Coin, CoinDto>(&params, coins).unwrap();
        let json = serde_json::to_value(&outcome.records[0]).unwrap();

        assert!(json["Id"].is_string());
        assert!(json["Year"].is_null());
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}

// =============================================================================
// Rejections
// =============================================================================

mod rejections {
    use super::*;

    #[test]
    fn test_unknown_sort_key_is_rejected() {
        let params = ResourceQueryParameters::default().with_order_by("Metal");
        let err = pipeline()
            .run::<Coin, CoinDto>(&params, Vec::new())
            .unwrap_err();

        assert!(matches!(
            err,
            ShelfError::Query(QueryError::InvalidSortKey { .. })
        ));
    }

    #[test]
    fn test_bad_direction_is_rejected() {
        let params = ResourceQueryParameters::default().with_order_by("Year sideways");
        let err = pipeline()
            .run::<Coin, CoinDto>(&params, Vec::new())
            .unwrap_err();

        assert!(err.is_client_error());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let params = ResourceQueryParameters::default().with_fields("Id,Metal");
        let err = pipeline()
            .run::<Coin, CoinDto>(&params, Vec::new())
            .unwrap_err();

        assert!(matches!(
            err,
            ShelfError::Query(QueryError::InvalidFieldSelection { .. })
        ));
    }

    #[test]
    fn test_unregistered_pair_is_a_config_error() {
        let pipeline = QueryPipeline::new(
            Arc::new(PropertyMappingTable::default()),
            Arc::new(QueryConfig::default()),
        );
        let err = pipeline
            .run::<Coin, CoinDto>(&ResourceQueryParameters::default(), Vec::new())
            .unwrap_err();

        assert!(matches!(
            err,
            ShelfError::Config(ConfigError::MissingMapping { .. })
        ));
        assert!(!err.is_client_error());
    }
}
