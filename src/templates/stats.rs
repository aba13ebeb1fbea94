//! Productivity aggregation body (bridged).
//!
//! One pass over `flattenedTasks`; everything is aggregated in-process so the
//! expensive collection scan happens exactly once.

/// Bridged aggregation body: completion counts over a rolling window with
/// per-day buckets, plus open-work totals.
pub fn aggregate_body() -> &'static str {
    r#"const days = params.days || 7;
const now = new Date();
const cutoff = new Date(now.getTime() - days * 86400000);
const daily = {};
let completed = 0;
let available = 0;
let overdue = 0;
let flagged = 0;
let remaining = 0;
for (const t of flattenedTasks) {
  if (t.completed) {
    if (t.completionDate && t.completionDate >= cutoff) {
      completed += 1;
      const key = t.completionDate.toISOString().slice(0, 10);
      daily[key] = (daily[key] || 0) + 1;
    }
    continue;
  }
  remaining += 1;
  if (t.flagged) { flagged += 1; }
  if (t.dueDate && t.dueDate < now) { overdue += 1; }
  if (t.taskStatus === Task.Status.Available || t.taskStatus === Task.Status.DueSoon || t.taskStatus === Task.Status.Overdue) {
    available += 1;
  }
}
const perDay = Object.keys(daily).sort().map(function (d) {
  return { date: d, completed: daily[d] };
});
return JSON.stringify({ ok: true, data: {
  rangeDays: days,
  completed: completed,
  remaining: remaining,
  available: available,
  overdue: overdue,
  flagged: flagged,
  inboxCount: inbox.length,
  perDay: perDay,
  dailyAverage: Math.round((completed / days) * 100) / 100
} });"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_single_scan() {
        let body = aggregate_body();
        assert_eq!(body.matches("for (const t of flattenedTasks)").count(), 1);
        assert!(!body.contains(".whose("));
    }

    #[test]
    fn test_stats_window_and_buckets() {
        let body = aggregate_body();
        assert!(body.contains("params.days || 7"));
        assert!(body.contains("toISOString().slice(0, 10)"));
        assert!(body.contains("dailyAverage"));
    }

    #[test]
    fn test_stats_totals() {
        let body = aggregate_body();
        for field in ["remaining", "available", "overdue", "flagged", "inboxCount"] {
            assert!(body.contains(field), "missing {field}");
        }
    }
}
