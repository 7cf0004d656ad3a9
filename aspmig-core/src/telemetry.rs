//! Pipeline checkpoints reported to the telemetry sink.

use crate::ports::TelemetrySink;
use aspmig_types::tier::Tier;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryEvent {
    /// Shared by every event of one run.
    pub run_id: Uuid,
    pub kind: TelemetryEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryEventKind {
    Started {
        has_environment: bool,
    },
    TierFallback {
        tier: Tier,
        reason: String,
    },
    Succeeded {
        tier: Tier,
        plans: usize,
        sites: usize,
    },
    Failed {
        error_kind: &'static str,
        exit_code: u8,
    },
}

impl TelemetryEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            TelemetryEventKind::Started { .. } => "start",
            TelemetryEventKind::TierFallback { .. } => "tier-fallback",
            TelemetryEventKind::Succeeded { .. } => "success",
            TelemetryEventKind::Failed { .. } => "failure",
        }
    }
}

/// Stamps events with the run id and swallows sink failures.
pub struct Telemetry<'a> {
    sink: &'a dyn TelemetrySink,
    run_id: Uuid,
}

impl<'a> Telemetry<'a> {
    pub fn new(sink: &'a dyn TelemetrySink) -> Self {
        Self {
            sink,
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn emit(&self, kind: TelemetryEventKind) {
        let event = TelemetryEvent {
            run_id: self.run_id,
            kind,
        };
        if let Err(e) = self.sink.record(&event) {
            debug!(event = event.kind.name(), "telemetry dropped: {e:#}");
        }
    }
}
