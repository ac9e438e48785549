//! cpu-partyparrot: a CPU usage key action for macro-control decks.
//!
//! Each visible key shows the current CPU load as its title and plays a
//! ten-frame party parrot whose speed follows the load:
//!   - `system`: per-core tick counters (`/proc/stat`, NT processor times, sysinfo)
//!   - `animator`: per-key CPU and animation loops with appear/disappear hooks
//!   - `animation`: frame sequence and load-to-delay mapping
//!   - `surface`: the title/image capability a host hands to each key
//!
//! The binary hosts keys in a terminal preview (or headless, logging titles).

pub mod animation;
pub mod animator;
pub mod app;
pub mod cli;
pub mod config;
pub mod input;
pub mod logging;
pub mod surface;
pub mod system;
pub mod ui;

pub use animator::{AnimatorSettings, InstanceId, LoadAnimator};
pub use surface::ActionSurface;
pub use system::cpu::{sample_cpu, CpuSample, TickSource};
