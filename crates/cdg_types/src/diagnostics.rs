//! Structured event sink for the export pipeline, mirrored to `log`.

use log::{info, warn};

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
	/// Fatal: the encode is aborting.
	Critical,
	/// Recoverable: something was skipped or dropped.
	Warning,
	/// Informational progress.
	Info,
}

/// A single structured event emitted while encoding a stream.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticEvent {
	/// Packet index this event concerns, if any.
	pub packet_index: Option<i64>,
	/// Event severity.
	pub severity: Severity,
	/// Short machine-matchable kind, e.g. `"dropped"`, `"validation_failed"`.
	pub kind: &'static str,
	/// Human-readable message.
	pub message: String,
}

/// Receives [`DiagnosticEvent`]s as the exporter runs.
///
/// Implement this to capture events (e.g. for a CLI summary or a test
/// assertion); every event is also always mirrored to `log` regardless of
/// whether a sink is attached.
pub trait DiagnosticsSink {
	/// Called once per event, in emission order.
	fn on_event(&mut self, event: &DiagnosticEvent);
}

/// A [`DiagnosticsSink`] that simply collects every event it's given, useful
/// for tests and for a CLI's end-of-run summary.
#[derive(Debug, Default)]
pub struct RecordingSink {
	events: Vec<DiagnosticEvent>,
}

impl RecordingSink {
	/// Creates an empty sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// All events recorded so far, in emission order.
	pub fn events(&self) -> &[DiagnosticEvent] {
		&self.events
	}

	/// Counts events with the given `kind`.
	pub fn count(&self, kind: &str) -> usize {
		self.events.iter().filter(|e| e.kind == kind).count()
	}
}

impl DiagnosticsSink for RecordingSink {
	fn on_event(&mut self, event: &DiagnosticEvent) {
		self.events.push(event.clone());
	}
}

/// Emits a diagnostic event: forwards to `sink` if present, and always logs
/// at the level matching `severity`.
pub fn emit(sink: Option<&mut dyn DiagnosticsSink>, packet_index: Option<i64>, severity: Severity, kind: &'static str, message: impl Into<String>) {
	let event = DiagnosticEvent {
		packet_index,
		severity,
		kind,
		message: message.into(),
	};
	match event.severity {
		Severity::Critical => log::error!("{} (packet {:?}): {}", event.kind, event.packet_index, event.message),
		Severity::Warning => warn!("{} (packet {:?}): {}", event.kind, event.packet_index, event.message),
		Severity::Info => info!("{} (packet {:?}): {}", event.kind, event.packet_index, event.message),
	}
	if let Some(sink) = sink {
		sink.on_event(&event);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recording_sink_collects_events_in_order() {
		let mut sink = RecordingSink::new();
		emit(Some(&mut sink), Some(5), Severity::Warning, "dropped", "no free slot");
		emit(Some(&mut sink), Some(6), Severity::Info, "tile_encoded", "ok");
		assert_eq!(sink.events().len(), 2);
		assert_eq!(sink.events()[0].kind, "dropped");
	}

	#[test]
	fn count_filters_by_kind() {
		let mut sink = RecordingSink::new();
		emit(Some(&mut sink), None, Severity::Warning, "dropped", "a");
		emit(Some(&mut sink), None, Severity::Warning, "dropped", "b");
		emit(Some(&mut sink), None, Severity::Info, "tile_encoded", "c");
		assert_eq!(sink.count("dropped"), 2);
		assert_eq!(sink.count("tile_encoded"), 1);
	}

	#[test]
	fn emit_without_a_sink_does_not_panic() {
		emit(None, Some(1), Severity::Critical, "structural_corruption", "unfilled slot");
	}
}
