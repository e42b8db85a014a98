//! Property tests for the facade, run against every backend

use proptest::prelude::*;
use shardcache::{BackendKind, Cache, Config, Error};

fn backend_strategy() -> impl Strategy<Value = BackendKind> {
    prop_oneof![
        Just(BackendKind::Map),
        Just(BackendKind::Lru),
        Just(BackendKind::Arena),
    ]
}

fn small_cache(backend: BackendKind) -> Cache {
    Cache::with_config(Config {
        shard_count: 8,
        default_capacity: 0,
        default_value_buffer_len: 32,
        backend,
        max_arena_bytes: 0,
    })
    .unwrap()
}

proptest! {
    #[test]
    fn prop_set_then_get_round_trips(
        backend in backend_strategy(),
        key in ".{0,32}",
        value in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let cache = small_cache(backend);
        cache.set(&key, value.clone()).unwrap();
        prop_assert_eq!(cache.get(&key), Ok(value));
    }

    #[test]
    fn prop_last_write_wins(
        backend in backend_strategy(),
        key in "[a-z]{1,16}",
        first in prop::collection::vec(any::<u8>(), 0..128),
        second in prop::collection::vec(any::<u8>(), 0..128),
    ) {
        let cache = small_cache(backend);
        cache.set(&key, first).unwrap();
        cache.set(&key, second.clone()).unwrap();
        prop_assert_eq!(cache.get(&key), Ok(second));
        prop_assert_eq!(cache.len(), 1);
    }

    #[test]
    fn prop_del_reports_presence(
        backend in backend_strategy(),
        key in "[a-z]{1,16}",
        present in any::<bool>(),
    ) {
        let cache = small_cache(backend);
        if present {
            cache.set(&key, b"v".to_vec()).unwrap();
        }
        prop_assert_eq!(cache.del(&key), present);
        prop_assert_eq!(cache.get(&key), Err(Error::NotFound));
        prop_assert!(!cache.del(&key));
    }

    #[test]
    fn prop_many_keys_survive(
        backend in backend_strategy(),
        entries in prop::collection::hash_map("[a-z0-9]{1,12}", prop::collection::vec(any::<u8>(), 0..64), 1..64),
    ) {
        let cache = small_cache(backend);
        for (key, value) in &entries {
            cache.set(key, value.clone()).unwrap();
        }
        for (key, value) in &entries {
            prop_assert_eq!(&cache.get(key).unwrap(), value);
        }
        prop_assert_eq!(cache.len(), entries.len());
    }

    #[test]
    fn prop_routing_is_pure(key in ".{0,64}") {
        let a = small_cache(BackendKind::Map);
        let b = small_cache(BackendKind::Arena);
        prop_assert_eq!(a.shard_for(&key), b.shard_for(&key));
        prop_assert!(a.shard_for(&key) < 8);
    }
}
