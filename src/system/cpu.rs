use std::time::Instant;

use anyhow::{bail, Result};

/// Cumulative tick counters for one logical core, by category.
///
/// Units depend on the source (USER_HZ ticks on Linux, 100ns on Windows);
/// only deltas between two readings of the same source are meaningful.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoreTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CoreTicks {
    /// Sum of every category, idle included
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }
}

/// Per-core tick breakdown provided by the host OS.
pub trait TickSource: Send + Sync {
    fn core_ticks(&self) -> Result<Vec<CoreTicks>>;
}

/// One aggregate CPU reading: idle and total ticks averaged across logical cores
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuSample {
    pub idle: f64,
    pub total: f64,
}

impl CpuSample {
    /// Average a per-core breakdown into a single sample.
    pub fn from_cores(cores: &[CoreTicks]) -> Result<Self> {
        if cores.is_empty() {
            bail!("tick source reported no logical cores");
        }
        let n = cores.len() as f64;
        let idle: f64 = cores.iter().map(|c| c.idle as f64).sum();
        let total: f64 = cores.iter().map(|c| c.total() as f64).sum();
        Ok(Self {
            idle: idle / n,
            total: total / n,
        })
    }
}

/// Take one averaged sample from `source`
pub fn sample_cpu(source: &dyn TickSource) -> Result<CpuSample> {
    let cores = source.core_ticks()?;
    CpuSample::from_cores(&cores)
}

/// Utilization percentage between two samples, or `None` when the total
/// delta is not strictly positive (counter reset, no time elapsed).
pub fn utilization(prev: &CpuSample, next: &CpuSample) -> Option<f64> {
    let idle_delta = next.idle - prev.idle;
    let total_delta = next.total - prev.total;
    if total_delta.is_nan() || total_delta <= 0.0 {
        return None;
    }
    let pct = (1.0 - idle_delta / total_delta) * 100.0;
    Some(pct.clamp(0.0, 100.0))
}

/// Title text shown on the key: one decimal place and a percent sign
pub fn format_title(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Previous-sample bookkeeping for the CPU loop.
#[derive(Debug, Clone, Default)]
pub struct CpuTracker {
    last: Option<CpuSample>,
    last_at: Option<Instant>,
}

impl CpuTracker {
    pub fn new(initial: Option<CpuSample>) -> Self {
        Self {
            last: initial,
            last_at: initial.map(|_| Instant::now()),
        }
    }

    /// Feed a new sample. Returns the utilization over the interval since the
    /// previous sample, if it could be computed. The new sample always
    /// replaces the previous one.
    pub fn observe(&mut self, next: CpuSample) -> Option<f64> {
        let pct = self.last.as_ref().and_then(|prev| utilization(prev, &next));
        if pct.is_none() {
            if let Some(at) = self.last_at {
                tracing::debug!(
                    elapsed_ms = at.elapsed().as_millis() as u64,
                    "no usable tick delta, keeping previous value"
                );
            }
        }
        self.last = Some(next);
        self.last_at = Some(Instant::now());
        pct
    }

    #[cfg(test)]
    pub(crate) fn last(&self) -> Option<CpuSample> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(idle: f64, total: f64) -> CpuSample {
        CpuSample { idle, total }
    }

    #[test]
    fn total_sums_every_category() {
        let t = CoreTicks {
            user: 1,
            nice: 2,
            system: 3,
            idle: 4,
            iowait: 5,
            irq: 6,
            softirq: 7,
            steal: 8,
        };
        assert_eq!(t.total(), 36);
    }

    #[test]
    fn sample_averages_across_cores() {
        let cores = [
            CoreTicks { idle: 100, user: 900, ..Default::default() },
            CoreTicks { idle: 300, user: 700, system: 200, ..Default::default() },
        ];
        let s = CpuSample::from_cores(&cores).unwrap();
        assert_eq!(s.idle, 200.0);
        assert_eq!(s.total, 1100.0);
    }

    #[test]
    fn empty_core_list_is_an_error() {
        assert!(CpuSample::from_cores(&[]).is_err());
    }

    #[test]
    fn half_idle_interval_is_fifty_percent() {
        let pct = utilization(&sample(100.0, 1000.0), &sample(150.0, 1100.0)).unwrap();
        assert!((pct - 50.0).abs() < 1e-9);
        assert_eq!(format_title(pct), "50.0%");
    }

    #[test]
    fn fully_idle_interval_is_zero() {
        let pct = utilization(&sample(0.0, 0.0), &sample(400.0, 400.0)).unwrap();
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn busy_interval_approaches_hundred() {
        let pct = utilization(&sample(0.0, 0.0), &sample(1.0, 10_000.0)).unwrap();
        assert!(pct > 99.9 && pct <= 100.0);
        let pct = utilization(&sample(0.0, 0.0), &sample(0.0, 10_000.0)).unwrap();
        assert_eq!(pct, 100.0);
    }

    #[test]
    fn non_positive_total_delta_is_skipped() {
        assert_eq!(utilization(&sample(100.0, 1000.0), &sample(100.0, 1000.0)), None);
        assert_eq!(utilization(&sample(100.0, 1000.0), &sample(10.0, 500.0)), None);
    }

    #[test]
    fn result_is_clamped_when_idle_outruns_total() {
        // Averaged counters from different cores can drift slightly.
        let pct = utilization(&sample(0.0, 0.0), &sample(120.0, 100.0)).unwrap();
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn tracker_needs_a_previous_sample() {
        let mut tracker = CpuTracker::new(None);
        assert_eq!(tracker.observe(sample(100.0, 1000.0)), None);
        assert_eq!(tracker.observe(sample(150.0, 1100.0)), Some(50.0));
        assert_eq!(tracker.last(), Some(sample(150.0, 1100.0)));
    }

    #[test]
    fn tracker_replaces_sample_even_when_skipping() {
        let mut tracker = CpuTracker::new(Some(sample(100.0, 1000.0)));
        assert_eq!(tracker.observe(sample(100.0, 1000.0)), None);
        assert_eq!(tracker.observe(sample(175.0, 1100.0)), Some(25.0));
    }
}
