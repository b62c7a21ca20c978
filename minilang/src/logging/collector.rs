//! Per-file event collection with cargo-style reporting

use super::events::LogEvent;
use crate::config::compile_time::logging::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// The file currently being analyzed on this thread
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub clean_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

/// Thread-safe store of error and warning events keyed by file
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    processing_start: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    /// Record an event for a file. Past `MAX_LOG_EVENTS_PER_FILE` a single
    /// overflow warning is appended and further events are dropped.
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = lock(&self.file_events);
        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn record_file_context(&self, context: FileProcessingContext) {
        lock(&self.file_contexts).insert(context.file_path.clone(), context);
    }

    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        lock(&self.file_events)
            .get(file_path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        self.get_file_events(file_path)
            .into_iter()
            .filter(|e| e.is_error())
            .collect()
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        lock(&self.file_events).clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = lock(&self.file_events);
        let contexts = lock(&self.file_contexts);

        let mut summary = ProcessingSummary {
            total_processing_time: self.processing_start.elapsed(),
            ..Default::default()
        };

        let all_paths: std::collections::BTreeSet<&PathBuf> =
            events.keys().chain(contexts.keys()).collect();
        summary.total_files = all_paths.len();

        for path in all_paths {
            let file_events = events.get(path).map(Vec::as_slice).unwrap_or(&[]);
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            summary.total_errors += errors;
            summary.total_warnings += warnings;

            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
            } else {
                summary.clean_files += 1;
            }
        }

        summary
    }

    pub fn total_event_count(&self) -> usize {
        lock(&self.file_events).values().map(Vec::len).sum()
    }

    /// (current, max, fraction) against `LOG_BUFFER_SIZE`
    pub fn get_capacity_info(&self) -> (usize, usize, f64) {
        let current = self.total_event_count();
        let max = LOG_BUFFER_SIZE;
        let fraction = if max > 0 {
            current as f64 / max as f64
        } else {
            0.0
        };
        (current, max, fraction)
    }

    pub fn clear(&self) {
        lock(&self.file_events).clear();
        lock(&self.file_contexts).clear();
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn format_event(output: &mut String, label: &str, file_path: &Path, event: &LogEvent) {
    let location = event
        .span
        .map(|s| format!("\n  --> {}:{}:{}", file_path.display(), s.start.line, s.start.column))
        .unwrap_or_default();

    output.push_str(&format!(
        "{}[{}]: {}{}\n",
        label, event.code, event.message, location
    ));
    output.push_str(&format!(
        "  = severity: {}, category: {}\n",
        event.severity(),
        event.category()
    ));

    for (key, value) in &event.context {
        if key != "file" && key != "file_id" {
            output.push_str(&format!("  = {}: {}\n", key, value));
        }
    }

    let action = event.recommended_action();
    if action != "No specific action available" {
        output.push_str(&format!("  = help: {}\n", action));
    }
}

/// Render collected events grouped by file, errors before warnings
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        let errors: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
        let warnings: Vec<_> = events.iter().filter(|e| e.is_warning()).collect();

        if errors.is_empty() && warnings.is_empty() {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", file_path.display()));
        for event in errors {
            format_event(&mut output, "error", file_path, event);
        }
        for event in warnings {
            format_event(&mut output, "warning", file_path, event);
        }
        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.has_errors() || summary.has_warnings() {
        output.push_str(&format!(
            "Total errors: {}, warnings: {}\n",
            summary.total_errors, summary.total_warnings
        ));
    } else {
        output.push_str("No errors or warnings\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_summary_counts_per_file() {
        let collector = ErrorCollector::new();
        let clean = PathBuf::from("clean.mini");
        let warned = PathBuf::from("warned.mini");
        let failed = PathBuf::from("failed.mini");

        collector.record_file_context(FileProcessingContext::new(clean.clone(), 0));
        collector.record_event(
            &warned,
            LogEvent::warning_with_code(codes::symbols::UNDECLARED_VARIABLE, "x"),
        );
        collector.record_event(
            &failed,
            LogEvent::error(codes::syntax::UNEXPECTED_TOKEN, "Expected ENDLINE"),
        );

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.clean_files, 1);
        assert_eq!(summary.files_with_warnings, 1);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(collector.get_file_errors(&failed).len(), 1);
    }

    #[test]
    fn test_per_file_limit_adds_single_overflow_event() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("noisy.mini");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 5 {
            collector.record_event(
                &path,
                LogEvent::warning_with_code(codes::lexical::INVALID_CHARACTER_SEQUENCE, "bad"),
            );
        }

        assert_eq!(
            collector.get_file_events(&path).len(),
            MAX_LOG_EVENTS_PER_FILE + 1
        );
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("src.txt");
        let span = Span::point(Position::new(14, 1, 14));

        collector.record_event(
            &path,
            LogEvent::error(codes::syntax::UNEXPECTED_TOKEN, "Expected ENDLINE, found ERROR")
                .with_span(span)
                .with_context("lexeme", ";;"),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.contains("Checking src.txt..."));
        assert!(output.contains("error[E050]: Expected ENDLINE, found ERROR"));
        assert!(output.contains("--> src.txt:1:14"));
        assert!(output.contains("= lexeme: ;;"));
        assert!(output.contains("Total errors: 1, warnings: 0"));
    }

    #[test]
    fn test_clear() {
        let collector = ErrorCollector::new();
        collector.record_event(
            Path::new("a.mini"),
            LogEvent::error(codes::system::INTERNAL_ERROR, "boom"),
        );
        collector.clear();
        assert_eq!(collector.total_event_count(), 0);
        assert_eq!(collector.get_capacity_info().0, 0);
    }
}
