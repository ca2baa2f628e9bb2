//! Randomized KPI source standing in for live telemetry.

use std::time::{Duration, Instant};

use super::rng::{SimRng, Stream};
use super::ticker::Ticker;
use super::{MetricSnapshot, MetricsSource, default_snapshots};

/// Bounded offset applied to a metric on each refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Jitter {
    /// Whole-number offset in `[-spread, spread)`.
    Integer(i64),
    /// Fractional offset in `[-spread, spread)`.
    Float(f64),
}

impl Jitter {
    fn sample(&self, rng: &mut SimRng) -> f64 {
        match *self {
            Self::Integer(spread) => rng.range_i64(-spread, spread) as f64,
            Self::Float(spread) => rng.range_f64(-spread, spread),
        }
    }
}

/// Default jitter for a KPI key.
fn default_jitter(key: &str) -> Jitter {
    match key {
        "revenue" => Jitter::Integer(2_500),
        "users" => Jitter::Integer(250),
        "conversions" => Jitter::Integer(50),
        _ => Jitter::Float(0.25),
    }
}

/// KPI cards whose values drift by a seeded random offset every interval.
pub struct SimulatedSource {
    metrics: Vec<(MetricSnapshot, Jitter)>,
    ticker: Ticker,
    rng: SimRng,
    ticks: u64,
}

impl SimulatedSource {
    /// The four default KPI cards.
    pub fn new(seed: u64, interval: Duration, start: Instant) -> Self {
        let metrics = default_snapshots()
            .into_iter()
            .map(|m| {
                let jitter = default_jitter(&m.key);
                (m, jitter)
            })
            .collect();
        Self::with_metrics(metrics, seed, interval, start)
    }

    pub fn with_metrics(
        metrics: Vec<(MetricSnapshot, Jitter)>,
        seed: u64,
        interval: Duration,
        start: Instant,
    ) -> Self {
        Self {
            metrics,
            ticker: Ticker::new(interval, start),
            rng: SimRng::new(seed, Stream::Metrics),
            ticks: 0,
        }
    }

    /// Refreshes applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Apply one refresh to every metric.
    pub fn tick(&mut self) {
        for (metric, jitter) in &mut self.metrics {
            let delta = jitter.sample(&mut self.rng);
            metric.nudge(delta);
        }
        self.ticks += 1;
    }

    pub fn snapshots(&self) -> Vec<MetricSnapshot> {
        self.metrics.iter().map(|(m, _)| m.clone()).collect()
    }
}

impl MetricsSource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }

    fn poll(&mut self, now: Instant) -> Vec<MetricSnapshot> {
        for _ in 0..self.ticker.due(now) {
            self.tick();
        }
        self.snapshots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_applies_one_tick_per_interval() {
        let start = Instant::now();
        let mut source = SimulatedSource::new(9, Duration::from_secs(5), start);
        let before = source.poll(start);
        assert_eq!(source.ticks(), 0);
        assert_eq!(before[0].current, 485_000.0);

        source.poll(start + Duration::from_secs(16));
        assert_eq!(source.ticks(), 3);
    }

    #[test]
    fn long_idle_gap_applies_every_tick() {
        let start = Instant::now();
        let mut source = SimulatedSource::new(1, Duration::from_secs(5), start);
        source.poll(start + Duration::from_secs(5) * 1_500);
        assert_eq!(source.ticks(), 1_500);
    }

    #[test]
    fn deltas_stay_bounded() {
        let start = Instant::now();
        let mut source = SimulatedSource::new(3, Duration::from_secs(1), start);
        let mut last = source.snapshots();
        for i in 1..=50 {
            let next = source.poll(start + Duration::from_secs(i));
            let revenue_delta = next[0].current - last[0].current;
            assert!((-2_500.0..2_500.0).contains(&revenue_delta));
            assert_eq!(revenue_delta.fract(), 0.0);
            let growth_delta = next[3].current - last[3].current;
            assert!(growth_delta.abs() <= 0.25);
            last = next;
        }
    }

    #[test]
    fn same_seed_replays() {
        let start = Instant::now();
        let mut a = SimulatedSource::new(11, Duration::from_secs(5), start);
        let mut b = SimulatedSource::new(11, Duration::from_secs(5), start);
        let at = start + Duration::from_secs(60);
        assert_eq!(a.poll(at), b.poll(at));
    }
}
