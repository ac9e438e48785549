use std::time::Instant;

use anyhow::Result;
use parking_lot::Mutex;
use sysinfo::System;

use crate::system::cpu::{CoreTicks, TickSource};

/// Tick source for platforms without a native counter reader.
///
/// `sysinfo` only reports per-core usage since its previous refresh, so this
/// integrates that usage over elapsed wall time (in microseconds) into
/// cumulative busy/idle counters. Deltas of the result reproduce sysinfo's
/// usage figures.
pub struct SysinfoTicks {
    state: Mutex<State>,
}

struct State {
    sys: System,
    last_refresh: Instant,
    cores: Vec<CoreTicks>,
}

impl SysinfoTicks {
    pub fn new() -> Self {
        let mut sys = System::new();
        // Need an initial CPU measurement for deltas
        sys.refresh_cpu_usage();

        Self {
            state: Mutex::new(State {
                sys,
                last_refresh: Instant::now(),
                cores: Vec::new(),
            }),
        }
    }
}

impl Default for SysinfoTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SysinfoTicks {
    fn core_ticks(&self) -> Result<Vec<CoreTicks>> {
        let mut state = self.state.lock();
        state.sys.refresh_cpu_usage();

        let now = Instant::now();
        let elapsed_us = now.duration_since(state.last_refresh).as_micros() as u64;
        state.last_refresh = now;

        let usages: Vec<f32> = state.sys.cpus().iter().map(|c| c.cpu_usage()).collect();
        state.cores.resize(usages.len(), CoreTicks::default());

        for (core, usage) in state.cores.iter_mut().zip(usages) {
            let frac = (usage as f64 / 100.0).clamp(0.0, 1.0);
            let busy = (frac * elapsed_us as f64).round() as u64;
            core.user += busy;
            core.idle += elapsed_us.saturating_sub(busy);
        }

        Ok(state.cores.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn counters_only_grow() {
        let source = SysinfoTicks::new();
        let first = source.core_ticks().unwrap();
        std::thread::sleep(Duration::from_millis(20));
        let second = source.core_ticks().unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert!(b.idle >= a.idle);
            assert!(b.user >= a.user);
            assert!(b.total() > a.total());
        }
    }
}
