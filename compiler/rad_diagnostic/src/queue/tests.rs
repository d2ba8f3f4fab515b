use super::*;
use crate::ErrorCode;

fn diag(n: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::InvalidSyntax).with_message(format!("error {n}"))
}

#[test]
fn test_collector_keeps_up_to_limit() {
    let mut collector = DiagnosticCollector::with_config(DiagnosticConfig { error_limit: 2 });
    assert!(collector.add(diag(1)));
    assert!(collector.add(diag(2)));
    assert!(!collector.add(diag(3)));
    assert!(!collector.add(diag(4)));

    assert_eq!(collector.len(), 2);
    assert_eq!(collector.total_emitted(), 4);
    assert_eq!(collector.remaining(), 2);
    assert!(collector.at_limit());
    assert!(collector.has_errors());
}

#[test]
fn test_default_limit_is_ten() {
    let mut collector = DiagnosticCollector::new();
    for n in 0..15 {
        collector.add(diag(n));
    }
    assert_eq!(collector.len(), 10);
    assert_eq!(collector.remaining(), 5);
}

#[test]
fn test_unlimited_never_drops() {
    let mut collector = DiagnosticCollector::with_config(DiagnosticConfig::unlimited());
    for n in 0..50 {
        assert!(collector.add(diag(n)));
    }
    assert_eq!(collector.remaining(), 0);
    assert!(!collector.at_limit());
}

#[test]
fn test_empty_collector() {
    let collector = DiagnosticCollector::new();
    assert!(collector.is_empty());
    assert!(!collector.has_errors());
    assert_eq!(collector.remaining(), 0);
}

#[derive(Default)]
struct Recording {
    emitted: Vec<String>,
    truncated: Option<usize>,
    flushed: bool,
}

impl DiagnosticEmitter for Recording {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.emitted.push(diagnostic.message.clone());
    }

    fn emit_truncated(&mut self, remaining: usize) {
        self.truncated = Some(remaining);
    }

    fn flush(&mut self) {
        self.flushed = true;
    }
}

#[test]
fn test_emit_to_reports_dropped_count() {
    let mut collector = DiagnosticCollector::with_config(DiagnosticConfig { error_limit: 1 });
    collector.add(diag(1));
    collector.add(diag(2));

    let mut rec = Recording::default();
    collector.emit_to(&mut rec);
    assert_eq!(rec.emitted, ["error 1"]);
    assert_eq!(rec.truncated, Some(1));
    assert!(rec.flushed);
}
