use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use reelmark_core::domain::clock::FixedClock;
use reelmark_core::domain::ids::{TmdbId, UserId};
use reelmark_core::domain::keys::{DeleteRequest, KeySlot};
use reelmark_core::domain::progress::{
    ProgressUpdate, ProgressUpdateRequest, ProgressWrite,
};
use reelmark_core::{AppUnitOfWork, ProgressOutcome, ProgressService};
use serde_json::json;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 10, 18, 0, 0).unwrap()
}

fn service(uow: &AppUnitOfWork) -> ProgressService {
    ProgressService::new(uow.progress.clone(), Arc::new(FixedClock(now())))
}

fn movie(watched: u32) -> ProgressUpdate {
    serde_json::from_value::<ProgressUpdateRequest>(json!({
        "meta": {"title": "The Matrix", "year": 1999, "type": "movie"},
        "duration": 3000,
        "watched": watched,
    }))
    .unwrap()
    .validate()
    .unwrap()
}

fn episode(season: &str, episode: &str, watched: u32) -> ProgressUpdate {
    serde_json::from_value::<ProgressUpdateRequest>(json!({
        "meta": {"title": "The Expanse", "type": "tv"},
        "duration": 3000,
        "watched": watched,
        "seasonId": season,
        "episodeId": episode,
        "seasonNumber": 1,
        "episodeNumber": 1,
    }))
    .unwrap()
    .validate()
    .unwrap()
}

fn user() -> UserId {
    UserId::new("user-1")
}

#[tokio::test]
async fn not_started_movie_leaves_store_empty() {
    let uow = AppUnitOfWork::in_memory();
    let outcome = service(&uow)
        .update(user(), TmdbId::new("603"), movie(15))
        .await
        .unwrap();

    assert!(matches!(outcome, ProgressOutcome::Skipped(_)));
    assert!(uow.progress.list_for_user(&user()).await.unwrap().is_empty());
}

#[tokio::test]
async fn repeated_in_progress_update_is_idempotent() {
    let uow = AppUnitOfWork::in_memory();
    let service = service(&uow);

    let first = service
        .update(user(), TmdbId::new("603"), movie(1500))
        .await
        .unwrap();
    let second = service
        .update(user(), TmdbId::new("603"), movie(1500))
        .await
        .unwrap();

    let (ProgressOutcome::Persisted(a), ProgressOutcome::Persisted(b)) =
        (first, second)
    else {
        panic!("both updates should persist");
    };
    assert_eq!(a, b);
    assert_eq!(uow.progress.list_for_user(&user()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn sibling_in_progress_keeps_boundary_episode() {
    let uow = AppUnitOfWork::in_memory();
    let service = service(&uow);
    let show = TmdbId::new("63639");

    service
        .update(user(), show.clone(), episode("s1", "e1", 1500))
        .await
        .unwrap();
    let outcome = service
        .update(user(), show.clone(), episode("s1", "e2", 5))
        .await
        .unwrap();
    assert!(matches!(outcome, ProgressOutcome::Persisted(_)));

    // A different season has no live sibling.
    let outcome = service
        .update(user(), show, episode("s2", "e1", 5))
        .await
        .unwrap();
    assert!(matches!(outcome, ProgressOutcome::Skipped(_)));
    assert_eq!(uow.progress.list_for_user(&user()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn cleanup_prunes_records_the_gate_admitted_via_siblings() {
    let uow = AppUnitOfWork::in_memory();
    let service = service(&uow);
    let show = TmdbId::new("63639");

    service
        .update(user(), show.clone(), episode("s1", "e1", 1500))
        .await
        .unwrap();
    service
        .update(user(), show.clone(), episode("s1", "e2", 2990))
        .await
        .unwrap();

    assert_eq!(service.cleanup(&user()).await.unwrap(), 1);

    let remaining = uow.progress.list_for_user(&user()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].key.episode, KeySlot::id("e1"));
}

/// Writes straight to the store, bypassing the gate.
async fn seed(uow: &AppUnitOfWork, tmdb: &str, update: ProgressUpdate) {
    let playback = update.playback;
    uow.progress
        .upsert(ProgressWrite {
            key: playback.identity(user(), TmdbId::new(tmdb)),
            season_number: playback.season_number,
            episode_number: playback.episode_number,
            duration: playback.duration,
            watched: playback.watched,
            meta: playback.meta,
            updated_at: now(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn gate_never_finishes_the_last_live_episode() {
    let uow = AppUnitOfWork::in_memory();
    let service = service(&uow);
    let show = TmdbId::new("1396");

    service
        .update(user(), show.clone(), episode("s5", "e1", 1500))
        .await
        .unwrap();
    let outcome = service
        .update(user(), show, episode("s5", "e1", 2950))
        .await
        .unwrap();

    assert!(matches!(outcome, ProgressOutcome::Skipped(_)));
    let stored = uow.progress.list_for_user(&user()).await.unwrap();
    assert_eq!(stored[0].watched, 1500);
}

#[tokio::test]
async fn cleanup_removes_season_with_nothing_in_progress() {
    let uow = AppUnitOfWork::in_memory();
    seed(&uow, "1396", episode("s5", "e1", 2950)).await;
    seed(&uow, "1396", episode("s5", "e2", 3000)).await;
    seed(&uow, "1396", episode("s4", "e9", 1200)).await;
    seed(&uow, "1396", episode("s4", "e10", 2999)).await;

    assert_eq!(service(&uow).cleanup(&user()).await.unwrap(), 3);

    let remaining = uow.progress.list_for_user(&user()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].key.episode, KeySlot::id("e9"));
}

#[tokio::test]
async fn cleanup_only_touches_the_requesting_user() {
    let uow = AppUnitOfWork::in_memory();
    let service = service(&uow);

    service
        .update(UserId::new("other"), TmdbId::new("603"), movie(1500))
        .await
        .unwrap();
    service
        .update(UserId::new("other"), TmdbId::new("603"), movie(2990))
        .await
        .unwrap();

    assert_eq!(service.cleanup(&user()).await.unwrap(), 0);
    assert_eq!(
        uow.progress
            .list_for_user(&UserId::new("other"))
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn delete_reports_count_and_is_idempotent() {
    let uow = AppUnitOfWork::in_memory();
    let service = service(&uow);
    let show = TmdbId::new("63639");

    for ep in ["e1", "e2"] {
        service
            .update(user(), show.clone(), episode("s1", ep, 1500))
            .await
            .unwrap();
    }

    let filter = DeleteRequest {
        season_id: Some("s1".into()),
        ..DeleteRequest::default()
    }
    .filter(user(), show.clone());

    assert_eq!(service.delete(&filter).await.unwrap(), 2);
    assert_eq!(service.delete(&filter).await.unwrap(), 0);
}

#[tokio::test]
async fn movie_typed_delete_spares_show_level_records() {
    let uow = AppUnitOfWork::in_memory();
    let service = service(&uow);
    let title = TmdbId::new("1399");

    service
        .update(user(), title.clone(), movie(1500))
        .await
        .unwrap();
    let show_level = serde_json::from_value::<ProgressUpdateRequest>(json!({
        "meta": {"title": "Ambiguous", "type": "show"},
        "duration": 3000,
        "watched": 1500,
    }))
    .unwrap()
    .validate()
    .unwrap();
    service
        .update(user(), title.clone(), show_level)
        .await
        .unwrap();

    let filter: DeleteRequest =
        serde_json::from_value(json!({ "meta": { "type": "movie" } })).unwrap();
    assert_eq!(
        service.delete(&filter.filter(user(), title)).await.unwrap(),
        1
    );

    let remaining = uow.progress.list_for_user(&user()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].key.season, KeySlot::Unspecified);
}
