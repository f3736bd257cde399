//! Import orchestration
//!
//! A [`Worker`] processes records one at a time. Every failure is caught
//! at the record boundary, logged and counted; the worker then moves on.
//! There is no retry here. Workers share nothing but the immutable
//! pipeline, so any number of them can run side by side on disjoint
//! batches.

use super::classifier::{decode, identify, status};
use super::error::{ImportError, ImportResult, PipelineResult};
use super::mapper::{RecordMapper, RecordOutput};
use super::report::ImportReport;
use super::source::RawRecord;
use super::upsert::EntityUpsertEngine;
use crate::config::ImportConfig;
use crate::graph::{Mutation, MutationSink};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, field, info, info_span};

pub struct ImportPipeline {
    mapper: RecordMapper,
    workers: usize,
    batch_size: usize,
}

impl ImportPipeline {
    pub fn new(config: &ImportConfig) -> Self {
        let engine = EntityUpsertEngine::new(
            config.tables(),
            config.source.clone(),
            config.provenance_key.clone(),
        );
        Self {
            mapper: RecordMapper::new(engine),
            workers: config.workers.max(1),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Classify and map one record. `status` is updated to
    /// `"{recordType}:{id}"` as soon as the id is known.
    pub fn process(&self, record: &RawRecord, status_out: &mut String) -> ImportResult<RecordOutput> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let (json, id) = identify(&record.line)?;
            *status_out = status(record.record_type, id);
            let classified = decode(&record.line, record.record_type, json, id)?;
            self.mapper.map(classified)
        }));
        outcome.unwrap_or_else(|payload| Err(ImportError::UnexpectedRuntimeFailure(panic_message(payload))))
    }

    pub fn worker(&self) -> Worker<'_> {
        Worker {
            pipeline: self,
            status: String::new(),
            report: ImportReport::default(),
        }
    }

    /// Process `records` sequentially on one worker
    pub fn run<S: MutationSink>(
        &self,
        records: impl IntoIterator<Item = RawRecord>,
        sink: &mut S,
    ) -> PipelineResult<ImportReport> {
        let mut worker = self.worker();
        for record in records {
            worker.handle(&record, sink)?;
        }
        let report = worker.finish();
        info!(
            "Import finished: {} processed, {} skipped, {} mutations",
            report.processed_total(),
            report.skipped_total(),
            report.mutations
        );
        Ok(report)
    }

    /// Split `records` into disjoint batches and process them on a pool of
    /// independent workers. Outputs are concatenated in input order.
    pub fn run_parallel(&self, records: &[RawRecord]) -> PipelineResult<(ImportReport, Vec<Mutation>)> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;
        info!(
            "Importing {} records on {} workers, batch size {}",
            records.len(),
            self.workers,
            self.batch_size
        );

        let batches = pool.install(|| {
            records
                .par_chunks(self.batch_size)
                .map(|batch| {
                    let mut worker = self.worker();
                    let mut out = Vec::new();
                    for record in batch {
                        worker.handle(record, &mut out)?;
                    }
                    Ok((worker.finish(), out))
                })
                .collect::<PipelineResult<Vec<_>>>()
        })?;

        let mut report = ImportReport::default();
        let mut mutations = Vec::new();
        for (batch_report, batch_mutations) in batches {
            report.absorb(batch_report);
            mutations.extend(batch_mutations);
        }
        info!(
            "Import finished: {} processed, {} skipped, {} mutations",
            report.processed_total(),
            report.skipped_total(),
            report.mutations
        );
        Ok((report, mutations))
    }
}

/// Per-worker state: current status and counters
pub struct Worker<'p> {
    pipeline: &'p ImportPipeline,
    status: String,
    report: ImportReport,
}

impl Worker<'_> {
    /// Status of the record currently (or last) processed
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn report(&self) -> &ImportReport {
        &self.report
    }

    /// Process one record and write its mutations to `sink`.
    ///
    /// Returns whether the record was imported. Only sink failures are
    /// returned as errors.
    pub fn handle<S: MutationSink>(&mut self, record: &RawRecord, sink: &mut S) -> PipelineResult<bool> {
        self.status = format!("{}:?", record.record_type);
        let span = info_span!("record", record_type = %record.record_type, status = field::Empty);
        let _enter = span.enter();

        let outcome = self.pipeline.process(record, &mut self.status);
        span.record("status", self.status.as_str());

        match outcome {
            Ok(output) => {
                debug!("mapped {} into {} mutations", status(output.record_type, output.id), output.mutations.len());
                self.report.mutations += output.mutations.len() as u64;
                sink.write_all(output.mutations)?;
                self.report.increment(output.counter);
                Ok(true)
            }
            Err(err) => {
                error!(reason = %err.reason(), "failed mapping {}: {}", self.status, err);
                self.report.record_skip(err.reason());
                Ok(false)
            }
        }
    }

    pub fn finish(self) -> ImportReport {
        self.report
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic while mapping record".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::classifier::RecordType;
    use crate::import::error::SkipReason;

    fn pipeline() -> ImportPipeline {
        ImportPipeline::new(&ImportConfig::default())
    }

    #[test]
    fn test_status_is_set_from_id() {
        let pipeline = pipeline();
        let mut worker = pipeline.worker();
        let mut out = Vec::new();
        worker
            .handle(&RawRecord::new(RecordType::Person, r#"{"id":7,"name":"A"}"#), &mut out)
            .unwrap();
        assert_eq!(worker.status(), "PERSON:7");

        worker
            .handle(&RawRecord::new(RecordType::Movie, "garbage"), &mut out)
            .unwrap();
        assert_eq!(worker.status(), "MOVIE:?");
    }

    #[test]
    fn test_status_names_records_failing_schema_decode() {
        let pipeline = pipeline();
        let mut worker = pipeline.worker();
        let mut out = Vec::new();
        let imported = worker
            .handle(
                &RawRecord::new(RecordType::Movie, r#"{"id":5,"title":"X","runtime":"120"}"#),
                &mut out,
            )
            .unwrap();

        assert!(!imported);
        assert_eq!(worker.status(), "MOVIE:5");
        assert_eq!(worker.report().skipped(SkipReason::MalformedRecord), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let pipeline = pipeline();
        let records = vec![
            RawRecord::new(RecordType::Movie, "{"),
            RawRecord::new(RecordType::Movie, r#"{"id":1}"#),
            RawRecord::new(RecordType::Movie, r#"{"id":2,"title":"t","release_date":"x"}"#),
            RawRecord::new(RecordType::Movie, r#"{"id":3,"title":"ok"}"#),
        ];
        let mut out = Vec::new();
        let report = pipeline.run(records, &mut out).unwrap();

        assert_eq!(report.movies_processed, 1);
        assert_eq!(report.skipped(SkipReason::MalformedRecord), 1);
        assert_eq!(report.skipped(SkipReason::MissingRequiredField), 1);
        assert_eq!(report.skipped(SkipReason::UnparsableDate), 1);
        assert!(out.iter().all(|m| m.row == "MOVIEDB_MOVIE_3"));
        assert_eq!(report.mutations, out.len() as u64);
    }

    #[test]
    fn test_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload), "boom");
    }
}
