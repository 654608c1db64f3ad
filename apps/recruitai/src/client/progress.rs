//! Three-step loading indicator shown while a screening request is in flight.
//!
//! The steps advance on fixed timers, not on request progress. The ticker is
//! owned by the submission and is cancelled (and the indicator reset) as soon
//! as the request completes or fails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const STAGE_LABELS: [&str; 3] = [
    "Extracting resume text",
    "Analyzing against job description",
    "Ranking candidates",
];

/// Offsets from start at which stages 2 and 3 become active.
pub const STAGE_OFFSETS: [Duration; 2] = [Duration::from_millis(2000), Duration::from_millis(4500)];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepState {
    #[default]
    Pending,
    Active,
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressView {
    pub steps: [StepState; 3],
}

impl ProgressView {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Steps before `stage` are done, `stage` is active, the rest pending.
    pub fn at_stage(stage: usize) -> Self {
        let mut steps = [StepState::Pending; 3];
        for (i, step) in steps.iter_mut().enumerate() {
            *step = match i.cmp(&stage) {
                std::cmp::Ordering::Less => StepState::Done,
                std::cmp::Ordering::Equal => StepState::Active,
                std::cmp::Ordering::Greater => StepState::Pending,
            };
        }
        Self { steps }
    }

    pub fn active_stage(&self) -> Option<usize> {
        self.steps.iter().position(|s| *s == StepState::Active)
    }
}

pub struct ProgressTicker {
    handle: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
    view: Arc<watch::Sender<ProgressView>>,
}

impl ProgressTicker {
    /// Activates stage 1 immediately and schedules the later stages.
    /// Must be called from within a tokio runtime.
    pub fn start(view: Arc<watch::Sender<ProgressView>>) -> Self {
        view.send_replace(ProgressView::at_stage(0));

        let cancelled = Arc::new(AtomicBool::new(false));
        let task_view = view.clone();
        let task_cancelled = cancelled.clone();
        let started = Instant::now();

        let handle = tokio::spawn(async move {
            for (i, offset) in STAGE_OFFSETS.into_iter().enumerate() {
                tokio::time::sleep_until(started + offset).await;
                // Checked under the channel lock so a concurrent cancel always wins.
                task_view.send_if_modified(|current| {
                    if task_cancelled.load(Ordering::SeqCst) {
                        return false;
                    }
                    *current = ProgressView::at_stage(i + 1);
                    true
                });
            }
        });

        Self {
            handle,
            cancelled,
            view,
        }
    }

    /// Stops the timers and resets every step to pending.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.handle.abort();
        self.view.send_replace(ProgressView::idle());
    }
}
