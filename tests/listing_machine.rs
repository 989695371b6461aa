mod common;

use std::sync::Arc;

use cinefeed::catalog::CatalogError;
use cinefeed::listing::{
    CachedListing, ListingCache, ListingKind, ListingMachine, ListingStatus, LoadOutcome,
};
use cinefeed::storage::{KeyValueStore, MemoryStore, SnapshotWriter, CACHED_POPULAR_KEY};

use common::{popular_page, search_page, Call, FakeCatalog};

fn scripted_popular(total: u32) -> Arc<FakeCatalog> {
    let fake = Arc::new(FakeCatalog::new());
    for n in 1..=total {
        fake.script(Call::Popular(n), Ok(popular_page(n, total)));
    }
    fake
}

#[tokio::test]
async fn popular_first_page_of_three() {
    let fake = scripted_popular(3);
    let machine = ListingMachine::new(fake.clone());

    let outcome = machine.load_first_page(ListingKind::Browse, None).await;

    assert_eq!(outcome, LoadOutcome::Applied);
    let state = machine.snapshot(ListingKind::Browse);
    assert_eq!(state.items.len(), 20);
    assert_eq!(state.current_page, 1);
    assert_eq!(state.total_pages, 3);
    assert_eq!(state.status, ListingStatus::Idle);
}

#[tokio::test]
async fn load_more_appends_second_page() {
    let fake = scripted_popular(3);
    let machine = ListingMachine::new(fake.clone());
    machine.load_first_page(ListingKind::Browse, None).await;

    assert_eq!(machine.load_more(ListingKind::Browse).await, LoadOutcome::Applied);

    let state = machine.snapshot(ListingKind::Browse);
    assert_eq!(state.items.len(), 40);
    assert_eq!(state.current_page, 2);
    assert_eq!(state.status, ListingStatus::Idle);
    assert_eq!(state.items[20].id, 21);
}

#[tokio::test]
async fn exhausted_only_after_last_page_then_load_more_is_noop() {
    let fake = scripted_popular(3);
    let machine = ListingMachine::new(fake.clone());
    machine.load_first_page(ListingKind::Browse, None).await;
    machine.load_more(ListingKind::Browse).await;
    assert_eq!(machine.snapshot(ListingKind::Browse).status, ListingStatus::Idle);

    machine.load_more(ListingKind::Browse).await;
    let state = machine.snapshot(ListingKind::Browse);
    assert_eq!(state.status, ListingStatus::Exhausted);
    assert_eq!(state.current_page, 3);

    let calls_before = fake.call_count();
    assert_eq!(machine.load_more(ListingKind::Browse).await, LoadOutcome::Skipped);
    assert_eq!(fake.call_count(), calls_before);
    assert_eq!(machine.snapshot(ListingKind::Browse), state);
}

#[tokio::test]
async fn load_more_is_monotonic() {
    let fake = scripted_popular(5);
    let machine = ListingMachine::new(fake.clone());
    machine.load_first_page(ListingKind::Browse, None).await;

    let mut last_len = 0;
    let mut last_page = 0;
    for _ in 0..6 {
        machine.load_more(ListingKind::Browse).await;
        let state = machine.snapshot(ListingKind::Browse);
        assert!(state.items.len() >= last_len);
        assert!(state.current_page >= last_page);
        last_len = state.items.len();
        last_page = state.current_page;
    }
    assert_eq!(last_page, 5);
    assert_eq!(last_len, 100);
}

#[tokio::test]
async fn load_more_before_first_page_is_noop() {
    let fake = Arc::new(FakeCatalog::new());
    let machine = ListingMachine::new(fake.clone());
    assert_eq!(machine.load_more(ListingKind::Browse).await, LoadOutcome::Skipped);
    assert_eq!(fake.call_count(), 0);
}

#[tokio::test]
async fn concurrent_load_more_is_coalesced() {
    let fake = Arc::new(FakeCatalog::gated());
    let machine = Arc::new(ListingMachine::new(fake.clone()));

    let first = tokio::spawn({
        let machine = machine.clone();
        async move { machine.load_first_page(ListingKind::Browse, None).await }
    });
    fake.next_call().await.respond(Ok(popular_page(1, 3)));
    assert_eq!(first.await.unwrap(), LoadOutcome::Applied);

    let a = tokio::spawn({
        let machine = machine.clone();
        async move { machine.load_more(ListingKind::Browse).await }
    });
    let b = tokio::spawn({
        let machine = machine.clone();
        async move { machine.load_more(ListingKind::Browse).await }
    });

    let pending = fake.next_call().await;
    assert_eq!(pending.call, Call::Popular(2));
    pending.respond(Ok(popular_page(2, 3)));

    let mut outcomes = vec![a.await.unwrap(), b.await.unwrap()];
    outcomes.sort_by_key(|o| matches!(o, LoadOutcome::Applied));
    assert_eq!(outcomes, vec![LoadOutcome::Skipped, LoadOutcome::Applied]);
    assert_eq!(fake.call_count(), 2);
    assert_eq!(machine.snapshot(ListingKind::Browse).current_page, 2);
}

async fn race_bat_batman(batman_first: bool) {
    let fake = Arc::new(FakeCatalog::gated());
    let machine = Arc::new(ListingMachine::new(fake.clone()));

    let bat = tokio::spawn({
        let machine = machine.clone();
        async move { machine.load_first_page(ListingKind::Search, Some("bat")).await }
    });
    let bat_call = fake.next_call().await;
    assert_eq!(bat_call.call, Call::Search("bat".into(), 1));

    let batman = tokio::spawn({
        let machine = machine.clone();
        async move {
            machine
                .load_first_page(ListingKind::Search, Some("batman"))
                .await
        }
    });
    let batman_call = fake.next_call().await;
    assert_eq!(batman_call.call, Call::Search("batman".into(), 1));

    let (bat_outcome, batman_outcome) = if batman_first {
        batman_call.respond(Ok(search_page("batman", 100, 3)));
        let batman_outcome = batman.await.unwrap();
        bat_call.respond(Ok(search_page("bat", 1, 5)));
        (bat.await.unwrap(), batman_outcome)
    } else {
        bat_call.respond(Ok(search_page("bat", 1, 5)));
        let bat_outcome = bat.await.unwrap();
        batman_call.respond(Ok(search_page("batman", 100, 3)));
        (bat_outcome, batman.await.unwrap())
    };

    assert_eq!(bat_outcome, LoadOutcome::Superseded);
    assert_eq!(batman_outcome, LoadOutcome::Applied);

    let state = machine.snapshot(ListingKind::Search);
    assert_eq!(state.last_query.as_deref(), Some("batman"));
    assert_eq!(state.items.len(), 3);
    assert!(state.items.iter().all(|m| m.title.starts_with("batman")));
}

#[tokio::test]
async fn stale_search_discarded_when_newer_arrives_first() {
    race_bat_batman(true).await;
}

#[tokio::test]
async fn stale_search_discarded_when_older_arrives_first() {
    race_bat_batman(false).await;
}

#[tokio::test]
async fn refresh_failure_keeps_prior_items() {
    let fake = scripted_popular(3);
    let machine = ListingMachine::new(fake.clone());
    machine.load_first_page(ListingKind::Browse, None).await;
    machine.load_more(ListingKind::Browse).await;
    let before = machine.snapshot(ListingKind::Browse);

    fake.script(Call::Popular(1), Err(CatalogError::network("offline")));
    let outcome = machine.refresh(ListingKind::Browse, None).await;

    assert!(matches!(outcome, LoadOutcome::Failed(CatalogError::Network { .. })));
    let state = machine.snapshot(ListingKind::Browse);
    assert_eq!(state.status, ListingStatus::Error);
    assert_eq!(state.items, before.items);
    assert_eq!(state.current_page, 2);
    assert_eq!(state.total_pages, 3);
    assert!(state.last_error.is_some());
}

#[tokio::test]
async fn refresh_success_replaces_items() {
    let fake = scripted_popular(3);
    let machine = ListingMachine::new(fake.clone());
    machine.load_first_page(ListingKind::Browse, None).await;
    machine.load_more(ListingKind::Browse).await;

    assert_eq!(machine.refresh(ListingKind::Browse, None).await, LoadOutcome::Applied);
    let state = machine.snapshot(ListingKind::Browse);
    assert_eq!(state.items.len(), 20);
    assert_eq!(state.current_page, 1);
}

#[tokio::test]
async fn first_page_failure_restores_prior_success() {
    let fake = scripted_popular(3);
    let machine = ListingMachine::new(fake.clone());
    machine.load_first_page(ListingKind::Browse, None).await;

    fake.script(Call::Popular(1), Err(CatalogError::upstream(503, "down")));
    let outcome = machine.load_first_page(ListingKind::Browse, None).await;

    assert!(matches!(outcome, LoadOutcome::Failed(CatalogError::Upstream { status: 503, .. })));
    let state = machine.snapshot(ListingKind::Browse);
    assert_eq!(state.status, ListingStatus::Error);
    assert_eq!(state.items.len(), 20);
}

#[tokio::test]
async fn first_page_failure_without_prior_data_is_empty() {
    let fake = Arc::new(FakeCatalog::new());
    fake.script(Call::Popular(1), Err(CatalogError::network("offline")));
    let machine = ListingMachine::new(fake.clone());

    machine.load_first_page(ListingKind::Browse, None).await;
    let state = machine.snapshot(ListingKind::Browse);
    assert_eq!(state.status, ListingStatus::Error);
    assert!(state.items.is_empty());
}

#[tokio::test]
async fn failed_load_more_can_be_retried() {
    let fake = scripted_popular(3);
    let machine = ListingMachine::new(fake.clone());
    machine.load_first_page(ListingKind::Browse, None).await;

    fake.script(Call::Popular(2), Err(CatalogError::network("offline")));
    assert!(matches!(
        machine.load_more(ListingKind::Browse).await,
        LoadOutcome::Failed(_)
    ));
    let state = machine.snapshot(ListingKind::Browse);
    assert_eq!(state.current_page, 1);
    assert_eq!(state.items.len(), 20);

    fake.script(Call::Popular(2), Ok(popular_page(2, 3)));
    assert_eq!(machine.load_more(ListingKind::Browse).await, LoadOutcome::Applied);
    assert_eq!(machine.snapshot(ListingKind::Browse).current_page, 2);
}

#[tokio::test]
async fn reset_discards_in_flight_response() {
    let fake = Arc::new(FakeCatalog::gated());
    let machine = Arc::new(ListingMachine::new(fake.clone()));

    let load = tokio::spawn({
        let machine = machine.clone();
        async move { machine.load_first_page(ListingKind::Search, Some("dune")).await }
    });
    let pending = fake.next_call().await;
    machine.reset(ListingKind::Search);
    pending.respond(Ok(search_page("dune", 1, 4)));

    assert_eq!(load.await.unwrap(), LoadOutcome::Superseded);
    let state = machine.snapshot(ListingKind::Search);
    assert!(state.items.is_empty());
    assert_eq!(state.status, ListingStatus::Idle);
}

#[tokio::test]
async fn search_without_query_is_skipped() {
    let fake = Arc::new(FakeCatalog::new());
    let machine = ListingMachine::new(fake.clone());
    assert_eq!(
        machine.load_first_page(ListingKind::Search, None).await,
        LoadOutcome::Skipped
    );
    assert_eq!(fake.call_count(), 0);
}

#[tokio::test]
async fn search_refresh_reuses_last_query() {
    let fake = Arc::new(FakeCatalog::new());
    fake.script(Call::Search("alien".into(), 1), Ok(search_page("alien", 1, 2)));
    let machine = ListingMachine::new(fake.clone());
    machine.load_first_page(ListingKind::Search, Some("alien")).await;

    assert_eq!(machine.refresh(ListingKind::Search, None).await, LoadOutcome::Applied);
    assert_eq!(
        fake.calls(),
        vec![Call::Search("alien".into(), 1), Call::Search("alien".into(), 1)]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cache_matches_final_state_after_concurrent_loads() {
    let fake = scripted_popular(5);
    let store = Arc::new(MemoryStore::new());
    let writer = SnapshotWriter::spawn(store.clone());
    let machine = Arc::new(
        ListingMachine::new(fake.clone())
            .with_cache(ListingCache::new(store.clone(), writer.clone())),
    );

    for _ in 0..20 {
        machine.load_first_page(ListingKind::Browse, None).await;
        let tasks: Vec<_> = (0..4)
            .map(|i| {
                let machine = machine.clone();
                tokio::spawn(async move {
                    if i == 0 {
                        machine.refresh(ListingKind::Browse, None).await
                    } else {
                        machine.load_more(ListingKind::Browse).await
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        writer.flush().await;

        let cached: CachedListing =
            serde_json::from_str(&store.read(CACHED_POPULAR_KEY).expect("cache written")).unwrap();
        let state = machine.snapshot(ListingKind::Browse);
        assert_eq!(cached, CachedListing::from_state(ListingKind::Browse, &state));
    }
}
