use anyhow::Result;
use log::info;
use std::time::Instant;

use crate::cdr::fetch_callers;
use crate::client::VoipClient;
use crate::config::{AppConfig, DateWindow, AUTO_WHITE_GROUP};
use crate::phonebook::{
    add_missing_callers, fetch_phonebook_numbers, GroupResolution, WriteSummary,
};

pub struct RunSummary {
    pub calls_examined: usize,
    pub candidates: usize,
    pub writes: WriteSummary,
}

pub struct AutoWhitelister {
    pub config: AppConfig,
    client: VoipClient,
}

impl AutoWhitelister {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = VoipClient::new(&config)?;
        Ok(Self { config, client })
    }

    pub async fn run(&self) -> Result<RunSummary> {
        self.run_for(&DateWindow::today()?).await
    }

    /// CDRs, then the phonebook snapshot, then one write per new caller.
    pub async fn run_for(&self, window: &DateWindow) -> Result<RunSummary> {
        let (calls_examined, callers) =
            fetch_callers(&self.client, window, &self.config.phone_number).await?;

        let known = fetch_phonebook_numbers(&self.client).await?;
        let writes = add_missing_callers(&self.client, &callers, known).await?;

        Ok(RunSummary {
            calls_examined,
            candidates: callers.len(),
            writes,
        })
    }
}

pub fn print_summary(summary: &RunSummary, start: Instant) {
    let group = match &summary.writes.group {
        None => "not needed".to_string(),
        Some(GroupResolution::Existing(id)) => format!("{AUTO_WHITE_GROUP} ({id})"),
        Some(GroupResolution::Created(id)) => format!("{AUTO_WHITE_GROUP} ({id}, created)"),
        Some(GroupResolution::Unresolvable) => "unresolvable".to_string(),
    };

    println!();
    println!("{}", "=".repeat(60));
    println!("{:>35}", "SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Call records:       {}", summary.calls_examined);
    println!("Qualifying callers: {}", summary.candidates);
    println!("Already known:      {}", summary.writes.already_known);
    println!("Added:              {}", summary.writes.added);
    println!("Group:              {group}");
    println!(
        "Runtime:            {:.2} seconds",
        start.elapsed().as_secs_f64()
    );
    println!("{}", "=".repeat(60));
    println!();

    info!("Whitelisted {} new callers", summary.writes.added);
}
