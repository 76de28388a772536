use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    analyze_requests: AtomicU64,
    analyze_failures: AtomicU64,
    transactions_analyzed: AtomicU64,
    transactions_flagged: AtomicU64,
}

impl Metrics {
    pub fn record_analysis(&self, transactions: usize, flagged: usize) {
        self.analyze_requests.fetch_add(1, Ordering::Relaxed);
        self.transactions_analyzed
            .fetch_add(transactions as u64, Ordering::Relaxed);
        self.transactions_flagged
            .fetch_add(flagged as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.analyze_requests.fetch_add(1, Ordering::Relaxed);
        self.analyze_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let requests = self.analyze_requests.load(Ordering::Relaxed);
        let failures = self.analyze_failures.load(Ordering::Relaxed);
        let analyzed = self.transactions_analyzed.load(Ordering::Relaxed);
        let flagged = self.transactions_flagged.load(Ordering::Relaxed);

        format!(
            "# TYPE guardian_analyze_requests_total counter\n\
guardian_analyze_requests_total {}\n\
# TYPE guardian_analyze_failures_total counter\n\
guardian_analyze_failures_total {}\n\
# TYPE guardian_transactions_analyzed_total counter\n\
guardian_transactions_analyzed_total {}\n\
# TYPE guardian_transactions_flagged_total counter\n\
guardian_transactions_flagged_total {}\n",
            requests, failures, analyzed, flagged
        )
    }
}
