use std::{
    collections::HashMap,
    sync::{Mutex, OnceLock},
};

static METRICS: OnceLock<Mutex<MetricsState>> = OnceLock::new();

/// 上游时延分桶上界（毫秒），最后一个桶为 >=1000
const LATENCY_BUCKETS_MS: [u128; 5] = [50, 100, 250, 500, 1000];

struct MetricsState {
    total: u64,
    errors: u64,
    per_endpoint: HashMap<&'static str, u64>,
    per_endpoint_err: HashMap<&'static str, u64>,
    // 上游成功/失败与时延统计（毫秒）
    upstream_ok: u64,
    upstream_err: u64,
    upstream_latency_sum_ms: u128,
    upstream_hist_buckets: [u64; 6],
}

fn state() -> &'static Mutex<MetricsState> {
    METRICS.get_or_init(|| {
        Mutex::new(MetricsState {
            total: 0,
            errors: 0,
            per_endpoint: HashMap::new(),
            per_endpoint_err: HashMap::new(),
            upstream_ok: 0,
            upstream_err: 0,
            upstream_latency_sum_ms: 0,
            upstream_hist_buckets: [0; 6],
        })
    })
}

fn lock() -> std::sync::MutexGuard<'static, MetricsState> {
    match state().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(), // 避免因锁污染导致 panic
    }
}

pub fn count_ok(endpoint: &'static str) {
    let mut s = lock();
    s.total += 1;
    *s.per_endpoint.entry(endpoint).or_insert(0) += 1;
}

pub fn count_err(endpoint: &'static str) {
    let mut s = lock();
    s.total += 1;
    s.errors += 1;
    *s.per_endpoint.entry(endpoint).or_insert(0) += 1;
    *s.per_endpoint_err.entry(endpoint).or_insert(0) += 1;
}

pub fn observe_upstream_latency_ms(ms: u128, ok: bool) {
    let mut s = lock();
    if ok {
        s.upstream_ok += 1;
    } else {
        s.upstream_err += 1;
    }
    s.upstream_latency_sum_ms += ms;
    let idx = LATENCY_BUCKETS_MS
        .iter()
        .position(|&upper| ms < upper)
        .unwrap_or(LATENCY_BUCKETS_MS.len());
    s.upstream_hist_buckets[idx] += 1;
}

pub fn render_prometheus() -> String {
    let s = lock();
    let mut out = String::new();
    out.push_str("# HELP chainlens_requests_total Total query requests\n");
    out.push_str("# TYPE chainlens_requests_total counter\n");
    out.push_str(&format!("chainlens_requests_total {}\n", s.total));

    out.push_str("# HELP chainlens_errors_total Total error responses\n");
    out.push_str("# TYPE chainlens_errors_total counter\n");
    out.push_str(&format!("chainlens_errors_total {}\n", s.errors));

    out.push_str("# HELP chainlens_endpoint_requests_total Requests per endpoint\n");
    out.push_str("# TYPE chainlens_endpoint_requests_total counter\n");
    let mut endpoints: Vec<_> = s.per_endpoint.iter().collect();
    endpoints.sort();
    for (k, v) in endpoints {
        out.push_str(&format!(
            "chainlens_endpoint_requests_total{{endpoint=\"{}\"}} {}\n",
            k, v
        ));
    }

    out.push_str("# HELP chainlens_endpoint_errors_total Errors per endpoint\n");
    out.push_str("# TYPE chainlens_endpoint_errors_total counter\n");
    let mut endpoint_errors: Vec<_> = s.per_endpoint_err.iter().collect();
    endpoint_errors.sort();
    for (k, v) in endpoint_errors {
        out.push_str(&format!(
            "chainlens_endpoint_errors_total{{endpoint=\"{}\"}} {}\n",
            k, v
        ));
    }

    // 上游统计
    out.push_str("# HELP chainlens_upstream_requests_total Upstream chain calls\n");
    out.push_str("# TYPE chainlens_upstream_requests_total counter\n");
    out.push_str(&format!(
        "chainlens_upstream_requests_total{{result=\"ok\"}} {}\n",
        s.upstream_ok
    ));
    out.push_str(&format!(
        "chainlens_upstream_requests_total{{result=\"err\"}} {}\n",
        s.upstream_err
    ));

    out.push_str("# HELP chainlens_upstream_latency_ms Upstream call latency in ms\n");
    out.push_str("# TYPE chainlens_upstream_latency_ms histogram\n");
    let mut cumulative = 0u64;
    for (upper, count) in LATENCY_BUCKETS_MS.iter().zip(s.upstream_hist_buckets.iter()) {
        cumulative += count;
        out.push_str(&format!(
            "chainlens_upstream_latency_ms_bucket{{le=\"{}\"}} {}\n",
            upper, cumulative
        ));
    }
    cumulative += s.upstream_hist_buckets[LATENCY_BUCKETS_MS.len()];
    out.push_str(&format!(
        "chainlens_upstream_latency_ms_bucket{{le=\"+Inf\"}} {}\n",
        cumulative
    ));
    out.push_str(&format!(
        "chainlens_upstream_latency_ms_sum {}\n",
        s.upstream_latency_sum_ms
    ));
    out.push_str(&format!(
        "chainlens_upstream_latency_ms_count {}\n",
        s.upstream_ok + s.upstream_err
    ));

    out
}
