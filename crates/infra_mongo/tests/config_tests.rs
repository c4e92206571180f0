//! Tests for settings loading and client construction
//!
//! None of these reach a server; the driver connects lazily.

use std::collections::HashMap;
use std::time::Duration;

use infra_mongo::{create_client, DatabaseConfig, DatabaseError, MongoDbContext, MongoSettings};
use proptest::prelude::*;
use test_utils::{sample_registry, CUSTOMERS};

fn environment(vars: HashMap<String, String>) -> config::Environment {
    config::Environment::with_prefix("MONGO")
        .try_parsing(true)
        .source(Some(vars))
}

#[tokio::test]
async fn test_connect_builds_context_from_settings() {
    let settings = MongoSettings {
        database: "shop".to_string(),
        app_name: Some("repo-tests".to_string()),
        ..MongoSettings::default()
    };

    let context = MongoDbContext::connect(&settings.database_config(), sample_registry())
        .await
        .unwrap();

    assert_eq!(context.database_name(), "shop");
    assert_eq!(context.registry().len(), 2);
    assert_eq!(context.registered_collection::<test_utils::Customer>().unwrap().1, CUSTOMERS);
}

#[tokio::test]
async fn test_connect_rejects_invalid_database_name() {
    let config = DatabaseConfig::new("mongodb://localhost:27017", "bad/name");

    let error = MongoDbContext::connect(&config, sample_registry()).await.unwrap_err();

    assert!(matches!(error, DatabaseError::Registry(_)));
}

#[test]
fn test_unparseable_number_is_a_config_error() {
    let vars = HashMap::from([("MONGO_MAX_POOL_SIZE".to_string(), "plenty".to_string())]);

    assert!(MongoSettings::from_source(environment(vars)).is_err());
}

proptest! {
    #[test]
    fn settings_survive_environment_round_trip(
        database in "db_[a-z0-9_]{0,18}",
        max in 1u32..200,
        min in 0u32..200,
        connect in 1u64..600,
    ) {
        let vars = HashMap::from([
            ("MONGO_DATABASE".to_string(), database.clone()),
            ("MONGO_MAX_POOL_SIZE".to_string(), max.to_string()),
            ("MONGO_MIN_POOL_SIZE".to_string(), min.to_string()),
            ("MONGO_CONNECT_TIMEOUT_SECS".to_string(), connect.to_string()),
        ]);

        let settings = MongoSettings::from_source(environment(vars)).unwrap();
        let config = settings.database_config();

        prop_assert_eq!(config.database, database);
        prop_assert_eq!(config.max_pool_size, max);
        prop_assert_eq!(config.min_pool_size, min);
        prop_assert_eq!(config.connect_timeout, Duration::from_secs(connect));
    }

    #[test]
    fn inverted_pool_bounds_never_build_a_client(max in 0u32..50, extra in 1u32..50) {
        let config = DatabaseConfig::default()
            .max_pool_size(max)
            .min_pool_size(max + extra);

        let result = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(create_client(&config));

        prop_assert!(matches!(result, Err(DatabaseError::InvalidConfiguration(_))));
    }
}
