//! Text campaign walkthrough: two batches on one campaign, then a scheduled
//! campaign with quiet hours that is torn down afterwards.
//!
//! Reads its settings from the environment (see `RunConfig::from_env`). At
//! least two `BLASTWAVE_CONTACTS_BATCH_<n>` lists are expected.
//!
//! ```sh
//! RUST_LOG=blastwave=debug cargo run -p blastwave --example registration_text
//! ```

use anyhow::{Context, bail};
use blastwave::observability::init_tracing;
use blastwave::{Broadcaster, RunConfig};
use blastwave_protocol::{BatchRecipient, CampaignSpec, Channel, QuietHours, ScheduleRequest, TextConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = RunConfig::from_env().context("loading run configuration")?;
    if config.contact_batches.len() < 2 {
        bail!("set BLASTWAVE_CONTACTS_BATCH_1 and BLASTWAVE_CONTACTS_BATCH_2");
    }
    let broadcaster = Broadcaster::from_config(&config)?;

    // One campaign, two batches; each poll only counts its own batch
    let spec = CampaignSpec::builder()
        .name("Registration confirmation")
        .delivery(TextConfig::new("Thanks for registering, ${first_name}!"))
        .build()?;
    let campaign_id = broadcaster.campaigns().create_campaign(&spec).await?;

    for (index, contacts) in config.contact_batches.iter().take(2).enumerate() {
        let recipients: Vec<BatchRecipient> = contacts
            .iter()
            .map(|id| BatchRecipient::new(id.clone()).with_attribute("first_name", "friend"))
            .collect();

        let run = broadcaster
            .dispatch_and_await(campaign_id, Channel::Text, &format!("batch {}", index + 1), &recipients)
            .await?;
        println!(
            "batch {}: {:?} after {} polls ({} outstanding)",
            index + 1,
            run.report.outcome,
            run.report.polls,
            run.report.remaining.len()
        );
    }

    // Scheduled variant restricted to business hours
    let spec = CampaignSpec::builder()
        .name("Registration reminder")
        .delivery(TextConfig::new("Reminder: your registration closes soon"))
        .quiet_hours(QuietHours::business_hours())
        .build()?;
    let schedule = ScheduleRequest::daily(8, 18, config.time_zone.clone());
    let scheduled = broadcaster
        .campaigns()
        .create_scheduled_campaign(&spec, &schedule)
        .await?;
    println!(
        "scheduled campaign {} with schedule {}",
        scheduled.campaign_id, scheduled.schedule_id
    );

    broadcaster
        .cleanup()
        .cleanup(Some(scheduled.schedule_id))
        .await?;
    println!("schedule {} removed", scheduled.schedule_id);

    Ok(())
}
