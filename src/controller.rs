use std::time::Duration;

use tracing::{debug, info};

use crate::config::SlideshowConfig;
use crate::engine::{AnimationDriver, AnimationId, FrameSource, ImageLoader, RenderRequest, SlideEvent, Timer, TimerHandle};
use crate::queue::{ImageId, SlideQueue};
use crate::state::{Direction, SlidePhase};

/// Cycles through a rotation of images while sliding the surface back and forth.
///
/// Two independent loops run once a list is set: the slide animation, which
/// restarts itself on every completion, and the switch timer, which swaps the
/// image every switch delay. Both report back through [`SlideEvent`]s; events
/// that do not match the current animation or timer are stale and ignored.
pub struct SlideshowController<D, L, T>
where
    D: AnimationDriver,
    L: ImageLoader,
    T: Timer,
{
    driver: D,
    loader: L,
    timer: T,

    config: SlideshowConfig,
    queue: SlideQueue,
    current: Option<ImageId>,

    target: f32, // Signed offset of the running (or next) sweep
    phase: SlidePhase,
    animation: Option<AnimationId>,
    switch_timer: Option<TimerHandle>,
    disposed: bool,
}

impl<D, L, T> SlideshowController<D, L, T>
where
    D: AnimationDriver,
    L: ImageLoader,
    T: Timer,
{
    pub fn new(driver: D, loader: L, timer: T, config: SlideshowConfig) -> Self {
        let target = config.direction.sign() * config.translation;
        Self {
            driver,
            loader,
            timer,
            config,
            queue: SlideQueue::new(),
            current: None,
            target,
            phase: SlidePhase::Idle,
            animation: None,
            switch_timer: None,
            disposed: false,
        }
    }

    pub fn config(&self) -> &SlideshowConfig {
        &self.config
    }

    pub fn queue(&self) -> &SlideQueue {
        &self.queue
    }

    pub fn current(&self) -> Option<&ImageId> {
        self.current.as_ref()
    }

    pub fn phase(&self) -> SlidePhase {
        self.phase
    }

    pub fn target_offset(&self) -> f32 {
        self.target
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some() || self.animation.is_some() || self.switch_timer.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Replaces the rotation and starts showing its first image.
    ///
    /// A running slideshow is stopped first: its timer and animation are
    /// cancelled and the offset returns to rest. An empty list leaves the
    /// controller idle.
    pub fn set_image_list<I>(&mut self, ids: I)
    where
        I: IntoIterator,
        I::Item: Into<ImageId>,
    {
        if self.disposed {
            return;
        }
        if self.is_running() {
            debug!("restarting slideshow with a new image list");
            self.stop();
            self.driver.snap_offset(0.0);
        }
        self.queue.clear();

        for id in ids {
            let id = id.into();
            self.loader.prefetch(&id);
            self.queue.push(id);
        }

        match self.queue.pop() {
            Some(first) => {
                info!(count = self.queue.len() + 1, "starting slideshow");
                self.begin_display(first);
            }
            None => info!("empty image list, slideshow idle"),
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.disposed {
            return;
        }
        self.config.direction = direction;
        self.target = direction.sign() * self.config.translation;
        if direction.is_directional() && self.phase != SlidePhase::Idle {
            self.phase = SlidePhase::SlidingOut;
        }
        debug!(?direction, switch_delay = ?self.config.switch_delay(), "direction changed");
    }

    pub fn set_animation_duration(&mut self, duration: Duration) {
        if self.disposed {
            return;
        }
        self.config.animation_duration = duration;
    }

    pub fn set_image_switch_delay(&mut self, delay: Duration) {
        if self.disposed {
            return;
        }
        self.config.set_image_switch_delay(delay);
    }

    /// Changes the slide distance, keeping the current ping-pong side.
    pub fn set_translation(&mut self, translation: f32) {
        if self.disposed {
            return;
        }
        let translation = translation.abs();
        let sign = match self.config.direction {
            Direction::Centered if self.target < 0.0 => -1.0,
            direction => direction.sign(),
        };
        self.config.translation = translation;
        self.target = sign * translation;
    }

    pub fn set_inset(&mut self, inset: f32) {
        if self.disposed {
            return;
        }
        self.config.inset = inset.max(0.0);
    }

    pub fn set_crossfade(&mut self, crossfade: Duration) {
        if self.disposed {
            return;
        }
        self.config.crossfade = crossfade;
    }

    pub fn set_skip_memory_cache(&mut self, skip: bool) {
        if self.disposed {
            return;
        }
        self.config.skip_memory_cache = skip;
    }

    /// Stops everything for good. Later calls and late events do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stop();
        self.queue.clear();
        self.disposed = true;
        info!("slideshow disposed");
    }

    pub fn handle_event(&mut self, event: SlideEvent) {
        if self.disposed {
            return;
        }
        match event {
            SlideEvent::AnimationFinished(id) if self.animation == Some(id) => {
                self.animation = None;
                self.on_animation_finished();
            }
            SlideEvent::TimerFired(handle) if self.switch_timer == Some(handle) => {
                self.switch_timer = None;
                self.on_switch_timer();
            }
            stale => debug!(?stale, "ignoring stale event"),
        }
    }

    fn stop(&mut self) {
        self.timer.cancel_all();
        self.driver.cancel();
        self.switch_timer = None;
        self.animation = None;
        self.current = None;
        self.phase = SlidePhase::Idle;
        self.target = self.config.direction.sign() * self.config.translation;
    }

    fn begin_display(&mut self, id: ImageId) {
        debug!(%id, "displaying image");
        self.queue.push(id.clone());
        self.loader.render(
            &id,
            RenderRequest {
                crossfade: self.config.crossfade,
                cache: self.config.cache_policy(),
            },
        );
        self.current = Some(id);

        if self.animation.is_none() {
            self.phase = SlidePhase::SlidingOut;
            self.start_animation();
        }
        self.switch_timer = Some(self.timer.post_delayed(self.config.switch_delay()));
    }

    fn start_animation(&mut self) {
        let from = self.driver.offset();
        let id = self.driver.animate_offset(from, self.target, self.config.animation_duration);
        self.animation = Some(id);
    }

    fn on_animation_finished(&mut self) {
        if self.config.direction == Direction::Centered {
            // Head for the side opposite to where this sweep landed
            let landed = self.driver.offset();
            let translation = self.config.translation;
            self.target = if landed > 0.0 {
                -translation
            } else if landed < 0.0 {
                translation
            } else {
                -self.target
            };
            self.phase = SlidePhase::heading_for(self.target);
        } else {
            self.driver.snap_offset(0.0);
            self.phase = SlidePhase::SlidingOut;
        }
        self.start_animation();
    }

    fn on_switch_timer(&mut self) {
        match self.queue.pop() {
            Some(next) => self.begin_display(next),
            None => debug!("image queue is empty, slideshow stops"),
        }
    }
}

impl<D, L, T> SlideshowController<D, L, T>
where
    D: AnimationDriver + FrameSource,
    L: ImageLoader,
    T: Timer + FrameSource,
{
    /// Advances the frame-driven collaborators by `dt`, stopping at every
    /// instant something falls due so the follow-up timer or sweep is armed
    /// from that instant rather than from the end of the frame.
    pub fn advance(&mut self, dt: Duration) {
        let mut remaining = dt;
        let mut at_same_instant = false;

        while !self.disposed {
            let next = [self.timer.next_due(), self.driver.next_due()]
                .into_iter()
                .flatten()
                .min();

            // A zero-length sweep would otherwise restart forever at one instant
            let due = next.filter(|due| *due <= remaining && !(due.is_zero() && at_same_instant));
            let last = due.is_none();
            let step = due.unwrap_or(remaining);
            at_same_instant = step.is_zero();

            let mut events = self.timer.advance(step);
            events.extend(self.driver.advance(step));
            events.sort_by_key(|(at, _)| *at);
            remaining -= step;

            for (_, event) in events {
                self.handle_event(event);
            }
            if last {
                break;
            }
        }
    }
}

impl<D, L, T> Drop for SlideshowController<D, L, T>
where
    D: AnimationDriver,
    L: ImageLoader,
    T: Timer,
{
    fn drop(&mut self) {
        self.dispose();
    }
}
