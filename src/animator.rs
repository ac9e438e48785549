//! The CPU usage key action.
//!
//! Every visible key instance gets two tokio tasks:
//!   - a CPU loop that samples ticks once per interval and sets the title
//!   - an animation loop that pushes parrot frames, faster under more load
//!
//! Both tasks share one cancellation token and one `Shared` cell. The CPU
//! loop is the only writer of the utilization value and the animation loop
//! its only reader.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::animation::{DelayRange, FrameCursor, FrameSequence};
use crate::surface::ActionSurface;
use crate::system::cpu::{format_title, sample_cpu, CpuTracker, TickSource};

pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;

/// Opaque context key the host assigns to each visible key instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Timing knobs for both loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimatorSettings {
    pub sample_interval: Duration,
    pub frame_delay: DelayRange,
}

impl Default for AnimatorSettings {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(DEFAULT_SAMPLE_INTERVAL_MS),
            frame_delay: DelayRange::default(),
        }
    }
}

/// State shared by an instance's two loops.
struct Shared {
    /// Latest utilization percentage as `f64` bits
    utilization: AtomicU64,
    /// Host calls start only while this reads true. Never held across a
    /// callback, so stopping does not wait on the host.
    live: AtomicBool,
}

impl Shared {
    fn new() -> Self {
        Self {
            utilization: AtomicU64::new(0f64.to_bits()),
            live: AtomicBool::new(true),
        }
    }

    fn utilization(&self) -> f64 {
        f64::from_bits(self.utilization.load(Ordering::Acquire))
    }

    fn set_utilization(&self, pct: f64) {
        let pct = pct.clamp(0.0, 100.0);
        self.utilization.store(pct.to_bits(), Ordering::Release);
    }

    /// Run `f` unless the instance was stopped. Returns false if stopped.
    fn if_live(&self, f: impl FnOnce()) -> bool {
        if !self.live.load(Ordering::Acquire) {
            return false;
        }
        f();
        true
    }

    /// No host call starts after this returns. A call already running on
    /// another worker thread is left to finish on its own.
    fn close(&self) {
        self.live.store(false, Ordering::Release);
    }
}

/// Everything owned on behalf of one visible instance
struct InstanceRecord {
    token: CancellationToken,
    shared: Arc<Shared>,
    cpu_task: JoinHandle<()>,
    animation_task: JoinHandle<()>,
}

impl InstanceRecord {
    fn stop(self) {
        self.token.cancel();
        self.shared.close();
        self.cpu_task.abort();
        self.animation_task.abort();
    }
}

/// What both loops of one instance need
#[derive(Clone)]
struct LoopContext {
    id: InstanceId,
    surface: Arc<dyn ActionSurface>,
    shared: Arc<Shared>,
    token: CancellationToken,
}

/// Owns one record per visible instance and the tasks that animate it.
pub struct LoadAnimator {
    settings: AnimatorSettings,
    frames: Arc<FrameSequence>,
    source: Arc<dyn TickSource>,
    instances: HashMap<InstanceId, InstanceRecord>,
}

impl LoadAnimator {
    pub fn new(settings: AnimatorSettings, frames: FrameSequence, source: Arc<dyn TickSource>) -> Self {
        Self {
            settings,
            frames: Arc::new(frames),
            source,
            instances: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &AnimatorSettings {
        &self.settings
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    /// Start monitoring for `id`, replacing any previous run for the same id.
    ///
    /// Spawns onto the current tokio runtime, so it must be called from
    /// within one.
    pub fn on_appear(&mut self, id: InstanceId, surface: Arc<dyn ActionSurface>) {
        self.on_disappear(&id);

        let initial = match sample_cpu(&*self.source) {
            Ok(sample) => Some(sample),
            Err(e) => {
                warn!(instance = %id, "initial cpu sample failed: {:#}", e);
                None
            }
        };

        let token = CancellationToken::new();
        let shared = Arc::new(Shared::new());
        let ctx = LoopContext {
            id: id.clone(),
            surface,
            shared: shared.clone(),
            token: token.clone(),
        };

        let cpu_task = tokio::spawn(cpu_loop(
            ctx.clone(),
            self.source.clone(),
            CpuTracker::new(initial),
            self.settings.sample_interval,
        ));
        let animation_task = tokio::spawn(animation_loop(
            ctx,
            self.frames.clone(),
            self.settings.frame_delay,
        ));

        info!(instance = %id, "monitoring started");
        self.instances.insert(
            id,
            InstanceRecord {
                token,
                shared,
                cpu_task,
                animation_task,
            },
        );
    }

    /// Stop both loops for `id` and drop its state. Unknown ids are ignored.
    pub fn on_disappear(&mut self, id: &InstanceId) {
        if let Some(record) = self.instances.remove(id) {
            record.stop();
            info!(instance = %id, "monitoring stopped");
        }
    }

    pub fn is_active(&self, id: &InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    pub fn active_count(&self) -> usize {
        self.instances.len()
    }

    /// Most recent utilization for `id` (0 until the first CPU result)
    pub fn utilization(&self, id: &InstanceId) -> Option<f64> {
        self.instances.get(id).map(|r| r.shared.utilization())
    }

    /// Stop every instance
    pub fn shutdown(&mut self) {
        for (id, record) in self.instances.drain() {
            record.stop();
            debug!(instance = %id, "monitoring stopped on shutdown");
        }
    }
}

impl Drop for LoadAnimator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn cpu_loop(
    ctx: LoopContext,
    source: Arc<dyn TickSource>,
    mut tracker: CpuTracker,
    interval: Duration,
) {
    loop {
        tokio::select! {
            biased;
            _ = ctx.token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        let sample = match sample_cpu(&*source) {
            Ok(sample) => sample,
            Err(e) => {
                warn!(instance = %ctx.id, "cpu sample failed: {:#}", e);
                continue;
            }
        };

        let Some(pct) = tracker.observe(sample) else {
            continue;
        };
        let title = format_title(pct);
        let shown = ctx.shared.if_live(|| {
            ctx.surface.set_title(&title);
            ctx.shared.set_utilization(pct);
        });
        if !shown {
            break;
        }
        debug!(instance = %ctx.id, utilization = pct, "cpu sample");
    }
    debug!(instance = %ctx.id, "cpu loop finished");
}

async fn animation_loop(ctx: LoopContext, frames: Arc<FrameSequence>, range: DelayRange) {
    let mut cursor = FrameCursor::new(frames.len());
    loop {
        let index = cursor.advance();
        if !ctx.shared.if_live(|| ctx.surface.set_image(frames.get(index))) {
            break;
        }

        let delay = range.delay_for(ctx.shared.utilization());
        tokio::select! {
            biased;
            _ = ctx.token.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }
    debug!(instance = %ctx.id, "animation loop finished");
}
