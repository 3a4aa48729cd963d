//! Observer hook for tracing synthesis phases.

use std::fmt;

use log::debug;

/// The four ordered synthesis phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    OperatorTiling,
    DataflowGeneration,
    ControlCollapse,
    MemoryIntegration,
}

impl Phase {
    pub fn number(&self) -> u8 {
        match self {
            Phase::OperatorTiling => 1,
            Phase::DataflowGeneration => 2,
            Phase::ControlCollapse => 3,
            Phase::MemoryIntegration => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::OperatorTiling => "operator tiling",
            Phase::DataflowGeneration => "dataflow generation",
            Phase::ControlCollapse => "control collapse",
            Phase::MemoryIntegration => "memory integration",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {} ({})", self.number(), self.name())
    }
}

/// Emitted once a phase has produced its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseEvent {
    pub phase: Phase,
    /// One-line summary of what the phase produced.
    pub summary: String,
}

/// Receives phase events during synthesis. Observers cannot alter results.
pub trait SynthesisObserver {
    fn on_phase(&mut self, event: &PhaseEvent);
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SynthesisObserver for NoopObserver {
    fn on_phase(&mut self, _event: &PhaseEvent) {}
}

/// Forwards events to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SynthesisObserver for LogObserver {
    fn on_phase(&mut self, event: &PhaseEvent) {
        debug!("{}: {}", event.phase, event.summary);
    }
}

/// Collects events in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub events: Vec<PhaseEvent>,
}

impl SynthesisObserver for RecordingObserver {
    fn on_phase(&mut self, event: &PhaseEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(
            Phase::ControlCollapse.to_string(),
            "phase 3 (control collapse)"
        );
    }

    #[test]
    fn recording_observer_keeps_order() {
        let mut obs = RecordingObserver::default();
        for phase in [Phase::OperatorTiling, Phase::DataflowGeneration] {
            obs.on_phase(&PhaseEvent {
                phase,
                summary: String::new(),
            });
        }
        let phases: Vec<Phase> = obs.events.iter().map(|e| e.phase).collect();
        assert_eq!(phases, vec![Phase::OperatorTiling, Phase::DataflowGeneration]);
    }
}
