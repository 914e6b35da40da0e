use std::time::Duration;

use crate::engine::{AnimationDriver, AnimationId, FrameSource, SlideEvent, Timer, TimerHandle};

struct Tween {
    id: AnimationId,
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
}

/// Linear offset tween advanced by frame time.
#[derive(Default)]
pub struct TweenDriver {
    offset: f32,
    tween: Option<Tween>,
    next_id: u64,
}

impl TweenDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Target of the animation in flight, if any.
    pub fn target(&self) -> Option<f32> {
        self.tween.as_ref().map(|tween| tween.to)
    }
}

impl AnimationDriver for TweenDriver {
    fn animate_offset(&mut self, from: f32, to: f32, duration: Duration) -> AnimationId {
        self.next_id += 1;
        let id = AnimationId(self.next_id);
        self.offset = from;
        self.tween = Some(Tween {
            id,
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        });
        id
    }

    fn snap_offset(&mut self, offset: f32) {
        self.offset = offset;
    }

    fn cancel(&mut self) {
        self.tween = None;
    }

    fn offset(&self) -> f32 {
        self.offset
    }
}

impl FrameSource for TweenDriver {
    fn advance(&mut self, dt: Duration) -> Vec<(Duration, SlideEvent)> {
        let Some(tween) = self.tween.as_mut() else {
            return Vec::new();
        };

        let remaining = tween.duration.saturating_sub(tween.elapsed);
        if dt >= remaining {
            // The next sweep is started by whoever handles the completion.
            self.offset = tween.to;
            let id = tween.id;
            self.tween = None;
            return vec![(remaining, SlideEvent::AnimationFinished(id))];
        }

        tween.elapsed += dt;
        let t = (tween.elapsed.as_secs_f32() / tween.duration.as_secs_f32()).min(1.0);
        self.offset = tween.from + (tween.to - tween.from) * t;
        Vec::new()
    }

    fn next_due(&self) -> Option<Duration> {
        self.tween
            .as_ref()
            .map(|tween| tween.duration.saturating_sub(tween.elapsed))
    }
}

#[derive(Debug)]
struct Pending {
    handle: TimerHandle,
    due: Duration,
}

/// One-shot delayed callbacks on a frame clock.
#[derive(Debug, Default)]
pub struct DelayTimer {
    now: Duration,
    next_handle: u64,
    pending: Vec<Pending>,
}

impl DelayTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> Vec<TimerHandle> {
        self.pending.iter().map(|p| p.handle).collect()
    }
}

impl Timer for DelayTimer {
    fn post_delayed(&mut self, delay: Duration) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.pending.push(Pending {
            handle,
            due: self.now + delay,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|p| p.handle != handle);
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

impl FrameSource for DelayTimer {
    fn advance(&mut self, dt: Duration) -> Vec<(Duration, SlideEvent)> {
        let start = self.now;
        let now = start + dt;
        self.now = now;

        let (mut due, waiting): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        due.sort_by_key(|p| (p.due, p.handle));
        due.into_iter()
            .map(|p| (p.due.saturating_sub(start), SlideEvent::TimerFired(p.handle)))
            .collect()
    }

    fn next_due(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|p| p.due.saturating_sub(self.now))
            .min()
    }
}
