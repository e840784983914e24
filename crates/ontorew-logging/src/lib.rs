//! Per-query event logging
//!
//! The reformulation driver wraps each query in a [`QueryLogger`] and reports
//! the milestones of its lifecycle: reformulation finished, result set
//! unblocked, last result fetched, or an exception. Each event is one JSON
//! line carrying a timestamp, the per-query id, and milestone-specific
//! durations/counters, written to a pluggable sink.
//!
//! Logging may be globally disabled, in which case every call is a no-op that
//! still enforces the phase order. Sink write failures disable the logger for
//! the rest of the query instead of failing it.

pub mod phase;

pub use phase::{Phase, PhaseError};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use std::io::Write;
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

const MSG_REFORMULATION_FINISHED: &str = "query:reformulation-finished";
const MSG_RESULT_SET_UNBLOCKED: &str = "query:result-set-unblocked";
const MSG_LAST_RESULT_FETCHED: &str = "query:last-result-fetched";
const MSG_EXCEPTION: &str = "query:exception";

#[derive(Debug, Clone)]
pub struct QueryLogSettings {
    pub disabled: bool,
    pub application: String,
}

impl Default for QueryLogSettings {
    fn default() -> Self {
        QueryLogSettings { disabled: false, application: "ontorew".into() }
    }
}

pub struct QueryLogger {
    id: Uuid,
    created_wallclock: DateTime<Utc>,
    created: Instant,
    reformulated: Option<Instant>,
    unblocked: Option<Instant>,
    phase: Phase,
    settings: QueryLogSettings,
    sink: Box<dyn Write + Send>,
    sink_broken: bool,
}

impl QueryLogger {
    pub fn new(settings: QueryLogSettings, sink: Box<dyn Write + Send>) -> Self {
        QueryLogger {
            id: Uuid::new_v4(),
            created_wallclock: Utc::now(),
            created: Instant::now(),
            reformulated: None,
            unblocked: None,
            phase: Phase::Created,
            settings,
            sink,
            sink_broken: false,
        }
    }

    /// A logger whose events all turn into no-ops (phase order still applies).
    pub fn disabled() -> Self {
        QueryLogger::new(
            QueryLogSettings { disabled: true, ..QueryLogSettings::default() },
            Box::new(std::io::sink()),
        )
    }

    pub fn query_id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Reformulation is done (possibly served from the rewriting cache).
    pub fn reformulation_finished(&mut self, cache_hit: bool) -> Result<(), PhaseError> {
        self.phase = self.phase.advance(Phase::Reformulated)?;
        let now = Instant::now();
        self.reformulated = Some(now);
        self.emit(
            MSG_REFORMULATION_FINISHED,
            json!({
                "reformulationDuration": now.duration_since(self.created).as_millis() as u64,
                "reformulationCacheHit": cache_hit,
            }),
        );
        Ok(())
    }

    /// The first result row is available to the client.
    pub fn result_set_unblocked(&mut self) -> Result<(), PhaseError> {
        self.phase = self.phase.advance(Phase::ResultSetUnblocked)?;
        let now = Instant::now();
        self.unblocked = Some(now);
        let since_reformulation = self
            .reformulated
            .map(|t| now.duration_since(t).as_millis() as u64)
            .unwrap_or(0);
        self.emit(
            MSG_RESULT_SET_UNBLOCKED,
            json!({ "executionBeforeUnblockingDuration": since_reformulation }),
        );
        Ok(())
    }

    /// The client fetched the last result; the query is complete.
    pub fn last_result_fetched(&mut self, count: u64) -> Result<(), PhaseError> {
        self.phase = self.phase.advance(Phase::Completed)?;
        let now = Instant::now();
        let execution_and_fetching = self
            .unblocked
            .map(|t| now.duration_since(t).as_millis() as u64)
            .unwrap_or(0);
        self.emit(
            MSG_LAST_RESULT_FETCHED,
            json!({
                "resultCount": count,
                "executionAndFetchingDuration": execution_and_fetching,
                "totalDuration": now.duration_since(self.created).as_millis() as u64,
            }),
        );
        Ok(())
    }

    /// The query failed; `kind` names the failing stage (reformulation,
    /// evaluation, connection, ...).
    pub fn exception(&mut self, kind: &str) -> Result<(), PhaseError> {
        self.phase = self.phase.advance(Phase::Errored)?;
        self.emit(MSG_EXCEPTION, json!({ "exception": kind }));
        Ok(())
    }

    fn emit(&mut self, message: &str, payload: serde_json::Value) {
        if self.settings.disabled || self.sink_broken {
            return;
        }
        let event = json!({
            "@timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "queryId": self.id,
            "application": self.settings.application,
            "message": message,
            "creationTime": self.created_wallclock.to_rfc3339_opts(SecondsFormat::Millis, true),
            "payload": payload,
        });
        if writeln!(self.sink, "{event}").is_err() {
            warn!(query_id = %self.id, "query-event sink failed; disabling logger");
            self.sink_broken = true;
        }
    }
}
