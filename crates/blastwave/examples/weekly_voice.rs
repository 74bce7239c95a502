//! Voice campaign walkthrough: upload a sound, schedule the campaign for
//! Mondays over the next six weeks, send one batch and remove the schedule.
//!
//! The sound file path comes from the first argument.
//!
//! ```sh
//! cargo run -p blastwave --example weekly_voice -- reminder.wav
//! ```

use anyhow::Context;
use blastwave::observability::init_tracing;
use blastwave::{Broadcaster, RunConfig};
use blastwave_protocol::{
    AnsweringMachineMode, BatchRecipient, CampaignSpec, Channel, ScheduleRequest, SoundUpload,
    VoiceConfig,
};
use chrono::Weekday;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .context("usage: weekly_voice <sound file>")?;
    let data = std::fs::read(&path).with_context(|| format!("reading {path}"))?;

    let config = RunConfig::from_env().context("loading run configuration")?;
    let contacts = config
        .contact_batches
        .first()
        .context("set BLASTWAVE_CONTACTS_BATCH_1")?;
    let broadcaster = Broadcaster::from_config(&config)?;

    let sound_id = broadcaster
        .campaigns()
        .upload_sound(SoundUpload::new("weekly-reminder", data))
        .await?;

    let spec = CampaignSpec::builder()
        .name("Weekly reminder call")
        .delivery(
            VoiceConfig::new(sound_id, sound_id)
                .with_answering_machine(AnsweringMachineMode::LiveAndMachine),
        )
        .build()?;
    let schedule = ScheduleRequest::weekly(Weekday::Mon, 9, 17, config.time_zone.clone())
        .ending_after_weeks(6);
    let scheduled = broadcaster
        .campaigns()
        .create_scheduled_campaign(&spec, &schedule)
        .await?;

    let recipients: Vec<BatchRecipient> = contacts.iter().cloned().map(BatchRecipient::new).collect();
    let outcome = broadcaster
        .dispatch_and_await(scheduled.campaign_id, Channel::Voice, "weekly batch", &recipients)
        .await;

    // Remove the schedule even when the batch failed
    broadcaster
        .cleanup()
        .cleanup(Some(scheduled.schedule_id))
        .await?;

    let run = outcome?;
    println!(
        "campaign {}: {:?}, {} recipients unanswered",
        run.campaign_id,
        run.report.outcome,
        run.report.remaining.len()
    );

    Ok(())
}
