//! Per-run import counters

use super::error::SkipReason;
use super::mapper::Counter;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Counters for one worker or one whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub movies_processed: u64,
    pub persons_processed: u64,
    pub production_companies_processed: u64,
    /// Skipped records by reason, in order of first occurrence
    pub skipped: IndexMap<SkipReason, u64>,
    /// Mutations handed to the sink
    pub mutations: u64,
}

impl ImportReport {
    pub fn increment(&mut self, counter: Counter) {
        match counter {
            Counter::MoviesProcessed => self.movies_processed += 1,
            Counter::PersonsProcessed => self.persons_processed += 1,
            Counter::ProductionCompaniesProcessed => self.production_companies_processed += 1,
        }
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    pub fn skipped(&self, reason: SkipReason) -> u64 {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn skipped_total(&self) -> u64 {
        self.skipped.values().sum()
    }

    pub fn processed_total(&self) -> u64 {
        self.movies_processed + self.persons_processed + self.production_companies_processed
    }

    /// Fold another worker's counters into this one
    pub fn absorb(&mut self, other: ImportReport) {
        self.movies_processed += other.movies_processed;
        self.persons_processed += other.persons_processed;
        self.production_companies_processed += other.production_companies_processed;
        self.mutations += other.mutations;
        for (reason, count) in other.skipped {
            *self.skipped.entry(reason).or_insert(0) += count;
        }
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "movies processed:               {}", self.movies_processed)?;
        writeln!(f, "persons processed:              {}", self.persons_processed)?;
        writeln!(f, "production companies processed: {}", self.production_companies_processed)?;
        writeln!(f, "mutations emitted:              {}", self.mutations)?;
        write!(f, "records skipped:                {}", self.skipped_total())?;
        for (reason, count) in &self.skipped {
            write!(f, "\n  {}: {}", reason, count)?;
        }
        Ok(())
    }
}
