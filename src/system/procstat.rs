//! Per-core tick counters from Linux `/proc/stat`.
//!
//! Each `cpuN` line holds cumulative USER_HZ ticks:
//! `user nice system idle iowait irq softirq steal guest guest_nice`.
//! Guest time is already folded into user/nice by the kernel, so the two
//! guest columns are not added to the total.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::system::cpu::{CoreTicks, TickSource};

const PROC_STAT: &str = "/proc/stat";

/// Reads `/proc/stat` (or another file in the same format) on every sample
pub struct ProcStat {
    path: PathBuf,
}

impl ProcStat {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(PROC_STAT),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcStat {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for ProcStat {
    fn core_ticks(&self) -> Result<Vec<CoreTicks>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(parse_proc_stat(&raw))
    }
}

/// Parse every per-core `cpuN` line. The aggregate `cpu` line is skipped.
pub fn parse_proc_stat(raw: &str) -> Vec<CoreTicks> {
    raw.lines().filter_map(parse_core_line).collect()
}

fn parse_core_line(line: &str) -> Option<CoreTicks> {
    let rest = line.strip_prefix("cpu")?;
    // "cpu " is the all-cores line; per-core lines continue with a digit
    if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let mut fields = rest.split_whitespace();
    fields.next()?; // core number

    // Columns are positional: a garbled one drops the line instead of
    // shifting later values into the wrong category. Kernels before 2.6
    // only report the first four.
    let mut v = [0u64; 8];
    for (i, slot) in v.iter_mut().enumerate() {
        match fields.next() {
            Some(field) => *slot = field.parse().ok()?,
            None if i >= 4 => break,
            None => return None,
        }
    }

    Some(CoreTicks {
        user: v[0],
        nice: v[1],
        system: v[2],
        idle: v[3],
        iowait: v[4],
        irq: v[5],
        softirq: v[6],
        steal: v[7],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
cpu  10132153 290696 3084719 46828483 16683 0 25195 0 175628 0
cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0
cpu1 1335 10 800 6000 40 5 6 7 100 0
intr 199292172 43 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0
ctxt 1990473
btime 1062191376
processes 2915
";

    #[test]
    fn parses_per_core_lines_only() {
        let cores = parse_proc_stat(SAMPLE);
        assert_eq!(cores.len(), 2);
        assert_eq!(cores[0].user, 1393280);
        assert_eq!(cores[0].idle, 13343292);
    }

    #[test]
    fn guest_columns_are_not_counted() {
        let cores = parse_proc_stat(SAMPLE);
        let c = cores[1];
        assert_eq!(
            c,
            CoreTicks {
                user: 1335,
                nice: 10,
                system: 800,
                idle: 6000,
                iowait: 40,
                irq: 5,
                softirq: 6,
                steal: 7,
            }
        );
        assert_eq!(c.total(), 1335 + 10 + 800 + 6000 + 40 + 5 + 6 + 7);
    }

    #[test]
    fn old_kernels_with_four_columns_are_accepted() {
        let cores = parse_proc_stat("cpu0 10 20 30 40\n");
        assert_eq!(cores.len(), 1);
        assert_eq!(cores[0].total(), 100);
        assert_eq!(cores[0].iowait, 0);
    }

    #[test]
    fn short_or_garbled_lines_are_dropped() {
        assert!(parse_proc_stat("cpu0 1 2\ncpux 1 2 3 4\n").is_empty());
    }

    #[test]
    fn garbled_column_drops_the_line() {
        let cores = parse_proc_stat("cpu0 1 x 3 4 5\ncpu1 1 2 3 4 5\ncpu2 1 2 3 4 y\n");
        assert_eq!(cores.len(), 1);
        assert_eq!(cores[0].user, 1);
        assert_eq!(cores[0].idle, 4);
        assert_eq!(cores[0].iowait, 5);
    }

    #[test]
    fn missing_file_is_reported() {
        let source = ProcStat::with_path("/definitely/not/here/stat");
        let err = source.core_ticks().unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/stat"));
    }
}
