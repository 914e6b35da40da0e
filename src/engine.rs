use std::time::Duration;

use crate::queue::ImageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Completion posted back to the UI thread by a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideEvent {
    AnimationFinished(AnimationId),
    TimerFired(TimerHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    Default,    // Keep decoded images in memory
    SkipMemory, // Always decode from the byte cache
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest {
    pub crossfade: Duration,
    pub cache: CachePolicy,
}

/// Tweens the horizontal offset of the display surface.
///
/// Only one animation is in flight at a time; starting a new one replaces the
/// previous one, whose completion is never posted.
pub trait AnimationDriver {
    fn animate_offset(&mut self, from: f32, to: f32, duration: Duration) -> AnimationId;
    fn snap_offset(&mut self, offset: f32);
    fn cancel(&mut self);
    fn offset(&self) -> f32;
}

/// One-shot delayed callbacks.
pub trait Timer {
    fn post_delayed(&mut self, delay: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
    fn cancel_all(&mut self);
}

/// Fetches and shows images. Both calls are fire-and-forget: failures stay
/// inside the loader.
pub trait ImageLoader {
    fn prefetch(&mut self, id: &ImageId);
    fn render(&mut self, id: &ImageId, request: RenderRequest);
}

/// A collaborator driven by frame time.
pub trait FrameSource {
    /// Advances by `dt` and returns the events that fell due, each tagged with
    /// its offset into `dt`.
    fn advance(&mut self, dt: Duration) -> Vec<(Duration, SlideEvent)>;

    /// Time until the next event falls due, if one is scheduled.
    fn next_due(&self) -> Option<Duration>;
}
