// src/pipeline/enrich.rs

//! Phase orchestration.
//!
//! Drives the three phases in dependency order (website, then email, then
//! phone), consulting the progress tracker to skip records that are already
//! done, isolating per-record failures so one bad record never halts the
//! batch, and pacing between fixed-size sub-batches. Every per-record
//! outcome is flushed durably before the next record is processed.

use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Company, Config, Phase};
use crate::pipeline::export::write_export;
use crate::services::{EmailResolver, PhoneResolver, RemoteSource, WebsiteResolver};
use crate::storage::ProgressTracker;

/// Which phases a run covers. Single-phase filters still trigger a website
/// sub-pass first when pending records lack one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseFilter {
    All,
    WebsitesOnly,
    EmailsOnly,
    PhonesOnly,
}

/// Drives resolvers across the record set with durable progress tracking.
pub struct Enricher {
    config: Config,
    companies: Vec<Company>,
    tracker: ProgressTracker,
    source: Box<dyn RemoteSource>,
}

impl Enricher {
    pub fn new(
        config: Config,
        companies: Vec<Company>,
        tracker: ProgressTracker,
        source: Box<dyn RemoteSource>,
    ) -> Self {
        Self {
            config,
            companies,
            tracker,
            source,
        }
    }

    /// Read access to the tracker, for summaries and tests.
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Run the selected phases, then write the merged export.
    pub async fn run(&mut self, filter: PhaseFilter, dry_run: bool, output: &Path) -> Result<()> {
        if dry_run {
            self.report_pending(filter);
            return Ok(());
        }

        self.tracker.start_session()?;

        match filter {
            PhaseFilter::All => {
                self.run_website_phase().await?;
                self.run_email_phase().await?;
                self.run_phone_phase().await?;
            }
            PhaseFilter::WebsitesOnly => self.run_website_phase().await?,
            PhaseFilter::EmailsOnly => {
                self.ensure_websites().await?;
                self.run_email_phase().await?;
            }
            PhaseFilter::PhonesOnly => {
                self.ensure_websites().await?;
                self.run_phone_phase().await?;
            }
        }

        write_export(&self.companies, &self.tracker, output)?;
        self.log_summary(output);
        Ok(())
    }

    /// Records still needing a given phase.
    ///
    /// Email is pending even without a website (its search stage needs
    /// none); phone has no search-only strategy and requires a website of
    /// some kind.
    fn pending(&self, phase: Phase) -> Vec<Company> {
        self.companies
            .iter()
            .filter(|c| match phase {
                Phase::Website => {
                    !c.has_website() && !self.tracker.is_processed(Phase::Website, &c.name)
                }
                Phase::Email => {
                    !c.has_email() && !self.tracker.is_processed(Phase::Email, &c.name)
                }
                Phase::Phone => {
                    self.effective_website(c).is_some()
                        && !self.tracker.is_processed(Phase::Phone, &c.name)
                }
            })
            .cloned()
            .collect()
    }

    /// Website from the input row, else the tracker's resolved value.
    fn effective_website(&self, company: &Company) -> Option<String> {
        if company.has_website() {
            return Some(company.website.trim().to_string());
        }
        self.tracker
            .found_value(Phase::Website, &company.name)
            .map(String::from)
    }

    /// Run a website sub-pass when any pending record still lacks one.
    async fn ensure_websites(&mut self) -> Result<()> {
        let needed = self.pending(Phase::Website).len();
        if needed > 0 {
            log::info!("Resolving websites first for {} companies...", needed);
            self.run_website_phase().await?;
        }
        Ok(())
    }

    async fn run_website_phase(&mut self) -> Result<()> {
        let pending = self.pending(Phase::Website);
        log::info!("Website phase: {} companies to process", pending.len());

        let total = pending.len();
        for (i, company) in pending.iter().enumerate() {
            let resolver = WebsiteResolver::new(self.source.as_ref());
            let outcome = resolver.resolve(&company.name, &company.city).await;
            self.record(Phase::Website, &company.name, outcome)?;
            self.pace(i + 1, total).await;
        }
        Ok(())
    }

    async fn run_email_phase(&mut self) -> Result<()> {
        let pending = self.pending(Phase::Email);
        log::info!("Email phase: {} companies to process", pending.len());

        let total = pending.len();
        for (i, company) in pending.iter().enumerate() {
            let website = self.effective_website(company);
            let resolver = EmailResolver::new(self.source.as_ref());
            let outcome = resolver
                .resolve(&company.name, &company.city, website.as_deref())
                .await;
            self.record(Phase::Email, &company.name, outcome)?;
            self.pace(i + 1, total).await;
        }
        Ok(())
    }

    async fn run_phone_phase(&mut self) -> Result<()> {
        let pending = self.pending(Phase::Phone);
        log::info!("Phone phase: {} companies to process", pending.len());

        let total = pending.len();
        for (i, company) in pending.iter().enumerate() {
            let Some(website) = self.effective_website(company) else {
                continue;
            };
            let resolver = PhoneResolver::new(self.source.as_ref());
            let outcome = resolver.resolve(&website).await;
            self.record(Phase::Phone, &company.name, outcome)?;
            self.pace(i + 1, total).await;
        }
        Ok(())
    }

    /// Per-record failure boundary: a resolver error is logged, appended to
    /// the failure log and recorded as not-found, and the batch continues.
    /// The outcome is flushed durably before returning.
    fn record(&mut self, phase: Phase, name: &str, outcome: Result<Option<String>>) -> Result<()> {
        match outcome {
            Ok(value) => {
                match &value {
                    Some(v) => log::info!("  {}: {}", name, v),
                    None => log::info!("  {}: not found", name),
                }
                self.tracker.mark(phase, name, value)
            }
            Err(e) => {
                log::error!("  {}: ERROR - {}", name, e);
                self.tracker.mark_failure(name, &e.to_string())?;
                self.tracker.mark(phase, name, None)
            }
        }
    }

    /// Fixed pause after every full sub-batch.
    async fn pace(&self, processed: usize, total: usize) {
        let batch = self.config.pacing.batch_size.max(1);
        if processed % batch == 0 && processed < total {
            log::info!("Progress: {}/{}", processed, total);
            tokio::time::sleep(Duration::from_secs(self.config.pacing.batch_delay_secs)).await;
        }
    }

    /// Dry run: pending counts per phase, no network calls, no writes.
    fn report_pending(&self, filter: PhaseFilter) {
        log::info!("Dry run: reporting pending work only");
        if matches!(filter, PhaseFilter::All | PhaseFilter::WebsitesOnly) {
            log::info!("  websites needed: {}", self.pending(Phase::Website).len());
        }
        if matches!(filter, PhaseFilter::All | PhaseFilter::EmailsOnly) {
            log::info!("  emails needed: {}", self.pending(Phase::Email).len());
        }
        if matches!(filter, PhaseFilter::All | PhaseFilter::PhonesOnly) {
            log::info!("  phones needed: {}", self.pending(Phase::Phone).len());
        }
    }

    fn log_summary(&self, output: &Path) {
        log::info!("Enrichment summary:");
        for phase in Phase::ALL {
            let (found, not_found) = self.tracker.counts(phase);
            log::info!("  {}: {} found, {} not found", phase, found, not_found);
        }
        log::info!("  failures logged: {}", self.tracker.failures().len());
        log::info!("  export: {}", output.display());
    }
}
