use std::collections::LinkedList;
use std::future::Future;
use std::time::{Duration, SystemTime};
use tracing::info;

/// Phase name, start time and duration of one timed operation.
pub type TimedPhases = LinkedList<(&'static str, SystemTime, Duration)>;

/// Wrapper function to measure duration of an async operation
pub async fn measure_dur_async<F, Fut, T, E>(
    metric_name: &'static str,
    timed_phases: &mut TimedPhases,
    operation: F,
    trace_log_fn: Option<fn(&T) -> String>,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = SystemTime::now();
    let result = operation().await;
    let dur = start.elapsed().unwrap_or_else(|_| Duration::from_millis(0));
    timed_phases.push_back((metric_name, start, dur));
    let log_line = result
        .as_ref()
        .ok()
        .and_then(|r| trace_log_fn.map(|f| f(r)))
        .unwrap_or_default();
    info!("{} | {}, took={}", metric_name, log_line, dur.as_millis());
    result
}

/// Render timed phases as `name: <ms>ms` lines.
pub fn format_phases(timed_phases: &TimedPhases) -> String {
    timed_phases
        .iter()
        .map(|(name, _, dur)| format!("{}: {}ms", name, dur.as_millis()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_measure_dur_async_records_phase() {
        let mut phases = TimedPhases::new();

        let value = measure_dur_async(
            "answer",
            &mut phases,
            || async { Ok::<_, String>(42) },
            Some(|v: &i32| format!("value={}", v)),
        )
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(phases.len(), 1);
        assert_eq!(phases.front().map(|(name, _, _)| *name), Some("answer"));
    }

    #[tokio::test]
    async fn test_measure_dur_async_records_failures_too() {
        let mut phases = TimedPhases::new();

        let result = measure_dur_async(
            "failing",
            &mut phases,
            || async { Err::<i32, _>("boom".to_string()) },
            None,
        )
        .await;

        assert_eq!(result, Err("boom".to_string()));
        assert_eq!(phases.len(), 1);
    }

    #[test]
    fn test_format_phases() {
        let mut phases = TimedPhases::new();
        phases.push_back(("enumerate", SystemTime::now(), Duration::from_millis(12)));
        phases.push_back(("evaluate", SystemTime::now(), Duration::from_millis(340)));

        assert_eq!(format_phases(&phases), "enumerate: 12ms\nevaluate: 340ms");
    }
}
