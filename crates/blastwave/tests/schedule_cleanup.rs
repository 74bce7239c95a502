//! Verified schedule deletion

mod common;

use assert_matches::assert_matches;
use async_trait::async_trait;
use blastwave::{CleanupFailure, Error, ScheduleCleanup};
use blastwave_protocol::{
    CampaignId, DispatchFault, FaultCode, Schedule, ScheduleId, ScheduleLookup, SoundId,
    SoundUpload,
};
use blastwave_transport::ResourceStore;
use chrono::Weekday;
use common::{Op, ScriptedService};
use mockall::{Sequence, mock, predicate::eq};
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl ResourceStore for Store {
        async fn create_schedule(&self, schedule: &Schedule) -> Result<ScheduleId, DispatchFault>;
        async fn delete_schedule(&self, schedule_id: ScheduleId) -> Result<(), DispatchFault>;
        async fn get_schedule(&self, schedule_id: ScheduleId) -> Result<ScheduleLookup, DispatchFault>;
        async fn create_sound(&self, sound: &SoundUpload) -> Result<SoundId, DispatchFault>;
    }
}

// Collaborator traits require Debug, which mock! does not generate
impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MockStore")
    }
}

const SCHEDULE: ScheduleId = ScheduleId(31);

fn schedule() -> Schedule {
    Schedule {
        id: Some(SCHEDULE),
        campaign_id: CampaignId(3),
        days: vec![Weekday::Mon],
        start_hour: 9,
        stop_hour: 17,
        time_zone: "America/Los_Angeles".to_string(),
        end_date: None,
    }
}

fn store_with(
    delete: Result<(), DispatchFault>,
    lookup: Result<ScheduleLookup, DispatchFault>,
) -> MockStore {
    let mut store = MockStore::new();
    let mut seq = Sequence::new();
    store
        .expect_delete_schedule()
        .with(eq(SCHEDULE))
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_| delete);
    store
        .expect_get_schedule()
        .with(eq(SCHEDULE))
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_| lookup);
    store
}

#[tokio::test]
async fn test_not_found_after_delete_succeeds() {
    let cleanup = ScheduleCleanup::new(Arc::new(store_with(Ok(()), Ok(ScheduleLookup::NotFound))));

    cleanup.delete_and_verify(SCHEDULE).await.unwrap();
}

#[tokio::test]
async fn test_schedule_still_present_is_inconsistent() {
    let cleanup = ScheduleCleanup::new(Arc::new(store_with(
        Ok(()),
        Ok(ScheduleLookup::Found(schedule())),
    )));

    let err = cleanup.delete_and_verify(SCHEDULE).await.unwrap_err();

    assert_matches!(
        err,
        Error::CleanupInconsistency { schedule_id, kind: CleanupFailure::StillPresent }
            if schedule_id == SCHEDULE
    );
}

#[tokio::test]
async fn test_unexpected_lookup_fault_is_inconsistent() {
    let fault = DispatchFault::new(FaultCode::Internal, "lookup exploded");
    let cleanup = ScheduleCleanup::new(Arc::new(store_with(Ok(()), Err(fault.clone()))));

    let err = cleanup.delete_and_verify(SCHEDULE).await.unwrap_err();

    assert_matches!(
        err,
        Error::CleanupInconsistency { kind: CleanupFailure::UnexpectedFault(seen), .. }
            if seen == fault
    );
}

#[tokio::test]
async fn test_delete_fault_is_surfaced_without_lookup() {
    let mut store = MockStore::new();
    store
        .expect_delete_schedule()
        .times(1)
        .returning(|_| Err(DispatchFault::new(FaultCode::Forbidden, "not yours")));
    store.expect_get_schedule().never();

    let err = ScheduleCleanup::new(Arc::new(store))
        .delete_and_verify(SCHEDULE)
        .await
        .unwrap_err();

    assert_matches!(err, Error::Remote(fault) if fault.code == FaultCode::Forbidden);
}

#[tokio::test]
async fn test_cleanup_without_schedule_is_a_no_op() {
    let mut store = MockStore::new();
    store.expect_delete_schedule().never();
    store.expect_get_schedule().never();

    ScheduleCleanup::new(Arc::new(store)).cleanup(None).await.unwrap();
}

#[tokio::test]
async fn test_cleanup_removes_scripted_schedule() {
    let service = Arc::new(ScriptedService::new());
    let schedule_id = service.insert_schedule(schedule());

    ScheduleCleanup::new(service.clone())
        .cleanup(Some(schedule_id))
        .await
        .unwrap();

    assert!(service.schedules().is_empty());
    assert_eq!(service.deleted_schedules(), vec![schedule_id]);
}

#[tokio::test]
async fn test_scripted_delete_that_does_not_stick() {
    let service = Arc::new(ScriptedService::new());
    let schedule_id = service.insert_schedule(schedule());
    service.keep_deleted_schedules();

    let err = ScheduleCleanup::new(service.clone())
        .delete_and_verify(schedule_id)
        .await
        .unwrap_err();

    assert_matches!(
        err,
        Error::CleanupInconsistency { kind: CleanupFailure::StillPresent, .. }
    );
}

#[tokio::test]
async fn test_scripted_lookup_fault() {
    let service = Arc::new(ScriptedService::new());
    let schedule_id = service.insert_schedule(schedule());
    service.fail_on(Op::GetSchedule, DispatchFault::new(FaultCode::RateLimited, "slow down"));

    let err = ScheduleCleanup::new(service.clone())
        .delete_and_verify(schedule_id)
        .await
        .unwrap_err();

    assert_matches!(
        err,
        Error::CleanupInconsistency { kind: CleanupFailure::UnexpectedFault(fault), .. }
            if fault.code == FaultCode::RateLimited
    );
}
