use serde::Serialize;
use tracing::{error, warn};

/// Non-fatal build event. Components report these through a caller-supplied
/// sink instead of logging directly, so resolution logic stays observable
/// through its return value and emitted events alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// A shape's markup failed validation; the shape was dropped.
    MarkupError {
        shape_id: Option<String>,
        message: String,
    },
    /// A feature registered an external id that was already present.
    /// Advisory only: the index keeps the most recent registration.
    DuplicateId { id: String },
    /// Anatomical resolution produced no matches. Emitted once per
    /// distinct (identifier, candidate layers) pair within a build.
    UnresolvedAnatomy {
        anatomical_id: String,
        layers: Vec<String>,
    },
}

pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::MarkupError { shape_id, message } => match shape_id {
                Some(id) => warn!("Shape {}: {}", id, message),
                None => warn!("{}", message),
            },
            Diagnostic::DuplicateId { id } => {
                warn!("Duplicate feature id: {}", id);
            }
            Diagnostic::UnresolvedAnatomy { anatomical_id, layers } => {
                if layers.is_empty() {
                    error!("Cannot find flatmap feature of type {}", anatomical_id);
                } else {
                    error!(
                        "Cannot find flatmap feature of type {} in layers: {:?}",
                        anatomical_id, layers
                    );
                }
            }
        }
    }
}

/// Accumulates diagnostics for later inspection by the caller.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    events: Vec<Diagnostic>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<Diagnostic> {
        self.events
    }
}

impl DiagnosticSink for CollectedDiagnostics {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.events.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collected_sink_preserves_order() {
        let mut sink = CollectedDiagnostics::new();
        sink.emit(Diagnostic::DuplicateId { id: "a".into() });
        sink.emit(Diagnostic::DuplicateId { id: "b".into() });

        let events = sink.into_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], Diagnostic::DuplicateId { id: "a".into() });
        assert_eq!(events[1], Diagnostic::DuplicateId { id: "b".into() });
    }
}
