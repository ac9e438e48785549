pub mod cpu;
pub mod portable;
pub mod procstat;
#[cfg(windows)]
pub mod winapi;

use std::sync::Arc;

use crate::system::cpu::TickSource;

/// Which tick reader to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickSourceKind {
    /// The OS counter reader for this platform, sysinfo elsewhere
    #[default]
    Native,
    Sysinfo,
}

impl TickSourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            TickSourceKind::Native => "native",
            TickSourceKind::Sysinfo => "sysinfo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "native" => Some(TickSourceKind::Native),
            "sysinfo" => Some(TickSourceKind::Sysinfo),
            _ => None,
        }
    }
}

/// Build the tick source for `kind` on the current platform
pub fn tick_source(kind: TickSourceKind) -> Arc<dyn TickSource> {
    match kind {
        TickSourceKind::Sysinfo => Arc::new(portable::SysinfoTicks::new()),
        TickSourceKind::Native => native_source(),
    }
}

#[cfg(target_os = "linux")]
fn native_source() -> Arc<dyn TickSource> {
    Arc::new(procstat::ProcStat::new())
}

#[cfg(windows)]
fn native_source() -> Arc<dyn TickSource> {
    Arc::new(winapi::NtProcessorTimes::new())
}

#[cfg(not(any(target_os = "linux", windows)))]
fn native_source() -> Arc<dyn TickSource> {
    Arc::new(portable::SysinfoTicks::new())
}
