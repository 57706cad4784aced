use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tracing::{debug, info, trace, warn};

use crate::config::RetrievalConfig;
use crate::data::SourceRecord;
use crate::errors::RosterError;
use crate::retrieval::coordinator::{StopReason, TerminationCoordinator};
use crate::retrieval::cursor::GuardedCursor;
use crate::retrieval::filter::FilterCriterion;
use crate::retrieval::tickets::{TicketStream, ticket_channel};
use crate::source::RecordSource;

/// Validated parameters for one filtered retrieval.
///
/// Constructed per call; the only way to build one is through the validating
/// constructors, so an engine never sees an invalid request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetrievalRequest {
    criterion: FilterCriterion,
    total_items: usize,
    items_per_worker: usize,
}

impl RetrievalRequest {
    /// Validate `0 < items_per_worker <= total_items`.
    pub fn new(
        criterion: FilterCriterion,
        total_items: usize,
        items_per_worker: usize,
    ) -> Result<Self, RosterError> {
        if total_items == 0 {
            return Err(RosterError::InvalidRequest(
                "total_items must be greater than zero".into(),
            ));
        }
        if items_per_worker == 0 {
            return Err(RosterError::InvalidRequest(
                "items_per_worker must be greater than zero".into(),
            ));
        }
        if items_per_worker > total_items {
            return Err(RosterError::InvalidRequest(format!(
                "items_per_worker ({items_per_worker}) must be less than or equal to total_items ({total_items})"
            )));
        }
        Ok(Self {
            criterion,
            total_items,
            items_per_worker,
        })
    }

    /// Like `new`, but parses the criterion from its query-string spelling first.
    pub fn parse(
        criterion: &str,
        total_items: usize,
        items_per_worker: usize,
    ) -> Result<Self, RosterError> {
        Self::new(criterion.parse()?, total_items, items_per_worker)
    }

    /// Parity the records must satisfy.
    pub fn criterion(&self) -> FilterCriterion {
        self.criterion
    }

    /// Upper bound on returned records.
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Requested per-worker quota.
    pub fn items_per_worker(&self) -> usize {
        self.items_per_worker
    }

    /// Worker count and per-worker quota under a `max_workers` cap.
    ///
    /// Workers = `ceil(total_items / items_per_worker)` so a remainder never
    /// strands tickets. When the cap bites, the quota grows to
    /// `ceil(total_items / workers)` for the same reason.
    pub fn plan(&self, max_workers: usize) -> WorkerPlan {
        let wanted = self.total_items.div_ceil(self.items_per_worker);
        let workers = wanted.min(max_workers.max(1));
        let quota = if workers < wanted {
            self.total_items.div_ceil(workers)
        } else {
            self.items_per_worker
        };
        WorkerPlan { workers, quota }
    }
}

/// Pool sizing derived from a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerPlan {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Matches a worker collects before exiting.
    pub quota: usize,
}

/// Outcome of a successful retrieval plus the figures logged for it.
#[derive(Clone, Debug)]
pub struct RetrievalReport<R> {
    /// Matched records (sorted by identifier when configured).
    pub records: Vec<R>,
    /// Pool sizing used.
    pub plan: WorkerPlan,
    /// Rows handed out by the cursor.
    pub rows_read: u64,
    /// Tickets the issuer managed to hand out.
    pub tickets_issued: u64,
    /// Why the pool stopped.
    pub stop_reason: StopReason,
}

/// Concurrent filtered-retrieval engine.
///
/// A bounded pool of workers shares one guarded cursor over the record source.
/// Each ticket entitles its holder to one match: the worker reads rows until
/// one satisfies the criterion or the source ends. Because every row is read by
/// exactly one worker and a matching row is always kept, the result is the
/// first `min(total_items, available)` matching rows in source order, whatever
/// the worker count.
///
/// A ticket is not a read budget: one ticket can cost many reads when
/// non-matching rows come before the next match.
#[derive(Clone, Debug, Default)]
pub struct RetrievalEngine {
    config: RetrievalConfig,
}

/// State shared by the workers of one retrieval.
struct WorkerContext<S, R> {
    cursor: GuardedCursor<S, R>,
    coordinator: TerminationCoordinator,
    completed: AtomicUsize,
    criterion: FilterCriterion,
    total_items: usize,
    quota: usize,
}

impl RetrievalEngine {
    /// Engine with explicit worker and ordering settings.
    pub fn new(config: RetrievalConfig) -> Self {
        Self { config }
    }

    /// Settings this engine runs with.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Return up to `total_items` records from `source` that satisfy the criterion.
    ///
    /// Reaching the end of the source early is not an error; it yields fewer
    /// records. A malformed row aborts the call and discards partial matches.
    pub fn retrieve_filtered<S, R>(
        &self,
        source: S,
        request: &RetrievalRequest,
    ) -> Result<Vec<R>, RosterError>
    where
        S: RecordSource,
        R: SourceRecord,
    {
        self.retrieve_with_report(source, request)
            .map(|report| report.records)
    }

    /// Same as `retrieve_filtered`, returning the run figures alongside the records.
    pub fn retrieve_with_report<S, R>(
        &self,
        source: S,
        request: &RetrievalRequest,
    ) -> Result<RetrievalReport<R>, RosterError>
    where
        S: RecordSource,
        R: SourceRecord,
    {
        let plan = request.plan(self.config.max_workers);
        let source_id = source.source_id().to_string();
        let context = WorkerContext {
            cursor: GuardedCursor::new(source),
            coordinator: TerminationCoordinator::new(),
            completed: AtomicUsize::new(0),
            criterion: request.criterion(),
            total_items: request.total_items(),
            quota: plan.quota,
        };
        debug!(
            source_id = %source_id,
            criterion = %request.criterion(),
            total_items = request.total_items(),
            workers = plan.workers,
            quota = plan.quota,
            "starting filtered retrieval"
        );

        let (issuer, tickets) = ticket_channel(request.total_items() as u64, plan.workers);
        let (tickets_issued, buffers) = thread::scope(|scope| {
            let context = &context;
            let issuer_handle = scope.spawn(move || issuer.run(&context.coordinator));
            let workers: Vec<_> = (0..plan.workers)
                .map(|worker_id| {
                    let tickets = tickets.clone();
                    scope.spawn(move || run_worker(worker_id, context, tickets))
                })
                .collect();
            drop(tickets);

            let mut buffers = Vec::with_capacity(workers.len());
            for (worker_id, handle) in workers.into_iter().enumerate() {
                match handle.join() {
                    Ok(matched) => buffers.push(matched),
                    Err(_) => context.coordinator.fail(RosterError::WorkerPanicked {
                        source_id: source_id.clone(),
                        worker_id,
                    }),
                }
            }
            // Every worker is gone, so a blocked issuer sees a disconnected channel.
            let tickets_issued = issuer_handle.join().unwrap_or(0);
            (tickets_issued, buffers)
        });

        let rows_read = context.cursor.rows_read();
        let stop_reason = match context.coordinator.finish() {
            Ok(reason) => reason,
            Err(err) => {
                warn!(
                    source_id = %source_id,
                    rows_read,
                    error = %err,
                    "filtered retrieval aborted; discarding partial matches"
                );
                return Err(err);
            }
        };

        let mut records: Vec<R> = buffers.into_iter().flatten().collect();
        debug_assert!(records.len() <= request.total_items());
        if self.config.sort_by_id {
            records.sort_by_key(|record| record.record_id());
        }
        info!(
            source_id = %source_id,
            criterion = %request.criterion(),
            workers = plan.workers,
            rows_read,
            tickets_issued,
            matches = records.len(),
            stop_reason = ?stop_reason,
            "filtered retrieval completed"
        );
        Ok(RetrievalReport {
            records,
            plan,
            rows_read,
            tickets_issued,
            stop_reason,
        })
    }
}

/// Validate the parameters and run one retrieval with the default engine settings.
pub fn retrieve_filtered<S, R>(
    source: S,
    criterion: FilterCriterion,
    total_items: usize,
    items_per_worker: usize,
) -> Result<Vec<R>, RosterError>
where
    S: RecordSource,
    R: SourceRecord,
{
    let request = RetrievalRequest::new(criterion, total_items, items_per_worker)?;
    RetrievalEngine::default().retrieve_filtered(source, &request)
}

fn run_worker<S, R>(worker_id: usize, context: &WorkerContext<S, R>, tickets: TicketStream) -> Vec<R>
where
    S: RecordSource,
    R: SourceRecord,
{
    let coordinator = &context.coordinator;
    // Quota comes from the caller; let the buffer grow with actual matches.
    let mut matched = Vec::new();
    let mut tickets_used = 0usize;
    'tickets: while let Some(ticket) = tickets.next_ticket(coordinator) {
        tickets_used += 1;
        trace!(worker_id, ticket, "ticket taken");
        loop {
            if !coordinator.is_running() {
                break 'tickets;
            }
            let record = match context.cursor.read_next() {
                Ok(Some(record)) => record,
                Ok(None) => {
                    coordinator.request_stop(StopReason::EndOfStream);
                    break 'tickets;
                }
                Err(err) => {
                    coordinator.fail(err);
                    break 'tickets;
                }
            };
            if !context.criterion.matches(&record) {
                continue;
            }
            matched.push(record);
            let found = context.completed.fetch_add(1, Ordering::AcqRel) + 1;
            if found >= context.total_items {
                coordinator.request_stop(StopReason::QuotaReached);
                break 'tickets;
            }
            if matched.len() >= context.quota {
                break 'tickets;
            }
            continue 'tickets;
        }
    }
    debug!(
        worker_id,
        tickets_used,
        matches = matched.len(),
        "retrieval worker exited"
    );
    matched
}
