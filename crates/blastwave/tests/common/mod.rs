//! Common test utilities and helpers
//!
//! [`ScriptedService`] stands in for the remote side in engine tests. It
//! implements both collaborator traits, records every call for assertion,
//! replays queued status snapshots, and can be told to fail a given operation.

use async_trait::async_trait;
use blastwave_protocol::{
    BatchId, BatchRecipient, CampaignId, CampaignSpec, DirectSend, DispatchFault, NewBatch,
    Schedule, ScheduleId, ScheduleLookup, SoundId, SoundUpload, StatusRecord, TerminalResult,
    TextConfig,
};
use blastwave_transport::{DispatchService, ResourceStore};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Remote operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(dead_code)]
pub enum Op {
    CreateCampaign,
    CreateBatch,
    StartCampaign,
    QueryStatus,
    SendDirect,
    CreateSchedule,
    DeleteSchedule,
    GetSchedule,
    CreateSound,
}

#[derive(Debug, Default)]
struct State {
    campaigns: Vec<(CampaignId, CampaignSpec)>,
    batches: Vec<(BatchId, NewBatch)>,
    started: Vec<CampaignId>,
    direct_sends: Vec<DirectSend>,
    snapshots: VecDeque<Vec<StatusRecord>>,
    status_queries: u32,
    schedules: BTreeMap<ScheduleId, Schedule>,
    deleted_schedules: Vec<ScheduleId>,
    sounds: Vec<(SoundId, String)>,
    faults: HashMap<Op, DispatchFault>,
    keep_deleted_schedules: bool,
}

/// In-memory dispatch service and resource store.
///
/// Status queries pop queued snapshots in order; the last snapshot is repeated
/// once the queue is down to one entry. With nothing queued a query returns no
/// records.
#[derive(Debug, Default)]
pub struct ScriptedService {
    next_id: AtomicU64,
    state: Mutex<State>,
}

#[allow(dead_code)]
impl ScriptedService {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(100),
            state: Mutex::default(),
        }
    }

    /// Queue a status snapshot
    pub fn push_snapshot(&self, records: Vec<StatusRecord>) {
        self.state.lock().unwrap().snapshots.push_back(records);
    }

    /// Fail every future call of `op` with `fault`
    pub fn fail_on(&self, op: Op, fault: DispatchFault) {
        self.state.lock().unwrap().faults.insert(op, fault);
    }

    /// Accept deletes without actually removing the schedule
    pub fn keep_deleted_schedules(&self) {
        self.state.lock().unwrap().keep_deleted_schedules = true;
    }

    /// Add a schedule as if it had been created earlier
    pub fn insert_schedule(&self, schedule: Schedule) -> ScheduleId {
        let id = ScheduleId(self.allocate());
        self.state
            .lock()
            .unwrap()
            .schedules
            .insert(id, Schedule { id: Some(id), ..schedule });
        id
    }

    pub fn status_queries(&self) -> u32 {
        self.state.lock().unwrap().status_queries
    }

    pub fn campaigns(&self) -> Vec<(CampaignId, CampaignSpec)> {
        self.state.lock().unwrap().campaigns.clone()
    }

    pub fn batches(&self) -> Vec<(BatchId, NewBatch)> {
        self.state.lock().unwrap().batches.clone()
    }

    pub fn started(&self) -> Vec<CampaignId> {
        self.state.lock().unwrap().started.clone()
    }

    pub fn direct_sends(&self) -> Vec<DirectSend> {
        self.state.lock().unwrap().direct_sends.clone()
    }

    pub fn schedules(&self) -> BTreeMap<ScheduleId, Schedule> {
        self.state.lock().unwrap().schedules.clone()
    }

    pub fn deleted_schedules(&self) -> Vec<ScheduleId> {
        self.state.lock().unwrap().deleted_schedules.clone()
    }

    pub fn sounds(&self) -> Vec<(SoundId, String)> {
        self.state.lock().unwrap().sounds.clone()
    }

    fn allocate(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn check(&self, op: Op) -> Result<(), DispatchFault> {
        match self.state.lock().unwrap().faults.get(&op) {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DispatchService for ScriptedService {
    async fn create_campaign(&self, spec: &CampaignSpec) -> Result<CampaignId, DispatchFault> {
        self.check(Op::CreateCampaign)?;
        let id = CampaignId(self.allocate());
        self.state.lock().unwrap().campaigns.push((id, spec.clone()));
        Ok(id)
    }

    async fn create_batch(&self, batch: &NewBatch) -> Result<BatchId, DispatchFault> {
        self.check(Op::CreateBatch)?;
        let id = BatchId(self.allocate());
        self.state.lock().unwrap().batches.push((id, batch.clone()));
        Ok(id)
    }

    async fn start_campaign(&self, campaign_id: CampaignId) -> Result<(), DispatchFault> {
        self.check(Op::StartCampaign)?;
        self.state.lock().unwrap().started.push(campaign_id);
        Ok(())
    }

    async fn query_status(&self, _campaign_id: CampaignId) -> Result<Vec<StatusRecord>, DispatchFault> {
        let mut state = self.state.lock().unwrap();
        state.status_queries += 1;
        if let Some(fault) = state.faults.get(&Op::QueryStatus) {
            return Err(fault.clone());
        }
        let records = if state.snapshots.len() > 1 {
            state.snapshots.pop_front().unwrap_or_default()
        } else {
            state.snapshots.front().cloned().unwrap_or_default()
        };
        Ok(records)
    }

    async fn send_direct(&self, request: &DirectSend) -> Result<CampaignId, DispatchFault> {
        self.check(Op::SendDirect)?;
        let id = CampaignId(self.allocate());
        let mut state = self.state.lock().unwrap();
        state.campaigns.push((id, request.campaign.clone()));
        state.direct_sends.push(request.clone());
        Ok(id)
    }
}

#[async_trait]
impl ResourceStore for ScriptedService {
    async fn create_schedule(&self, schedule: &Schedule) -> Result<ScheduleId, DispatchFault> {
        self.check(Op::CreateSchedule)?;
        Ok(self.insert_schedule(schedule.clone()))
    }

    async fn delete_schedule(&self, schedule_id: ScheduleId) -> Result<(), DispatchFault> {
        self.check(Op::DeleteSchedule)?;
        let mut state = self.state.lock().unwrap();
        if !state.schedules.contains_key(&schedule_id) {
            return Err(DispatchFault::not_found(format!("schedule {schedule_id}")));
        }
        if !state.keep_deleted_schedules {
            state.schedules.remove(&schedule_id);
        }
        state.deleted_schedules.push(schedule_id);
        Ok(())
    }

    async fn get_schedule(&self, schedule_id: ScheduleId) -> Result<ScheduleLookup, DispatchFault> {
        self.check(Op::GetSchedule)?;
        let state = self.state.lock().unwrap();
        Ok(match state.schedules.get(&schedule_id) {
            Some(schedule) => ScheduleLookup::Found(schedule.clone()),
            None => ScheduleLookup::NotFound,
        })
    }

    async fn create_sound(&self, sound: &SoundUpload) -> Result<SoundId, DispatchFault> {
        self.check(Op::CreateSound)?;
        let id = SoundId(self.allocate());
        self.state.lock().unwrap().sounds.push((id, sound.name.clone()));
        Ok(id)
    }
}

/// A delivered record
#[allow(dead_code)]
pub fn delivered(recipient: &str, batch_id: BatchId) -> StatusRecord {
    StatusRecord::finished(recipient, batch_id, TerminalResult::Delivered)
}

/// A record with no result yet
#[allow(dead_code)]
pub fn pending(recipient: &str, batch_id: BatchId) -> StatusRecord {
    StatusRecord::pending(recipient, batch_id)
}

/// A simple text campaign
#[allow(dead_code)]
pub fn text_campaign(name: &str) -> CampaignSpec {
    CampaignSpec::builder()
        .name(name)
        .delivery(TextConfig::new("Thanks for registering"))
        .build()
        .unwrap()
}

/// Recipients with no attributes
#[allow(dead_code)]
pub fn recipients(ids: &[&str]) -> Vec<BatchRecipient> {
    ids.iter().map(|id| BatchRecipient::new(*id)).collect()
}
