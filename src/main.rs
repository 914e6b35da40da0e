use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod constants;
mod controller;
mod engine;
mod error;
mod loader;
mod queue;
mod scheduler;
mod slide;
mod state;
mod texture_loader;

use crate::config::{Cli, Settings};
use crate::constants::{CROSSFADE_MS, FPS};
use crate::controller::SlideshowController;
use crate::engine::AnimationDriver;
use crate::loader::RaylibImageLoader;
use crate::queue::ImageId;
use crate::scheduler::{DelayTimer, TweenDriver};
use crate::slide::SlideSurface;
use crate::state::Direction;

type Slideshow = SlideshowController<TweenDriver, RaylibImageLoader, DelayTimer>;

const STEP: Duration = Duration::from_millis(1000);
const OFFSET_STEP: f32 = 20.0;

// --- Keyboard Controls ---
fn handle_keys(rl: &RaylibHandle, slideshow: &mut Slideshow, surface: &mut SlideSurface, images: &[ImageId]) {
    if rl.is_key_pressed(KeyboardKey::KEY_R) {
        info!("restarting slideshow");
        slideshow.set_image_list(images.iter().cloned());
    }
    if rl.is_key_pressed(KeyboardKey::KEY_D) {
        let next = match slideshow.config().direction {
            Direction::Centered => Direction::LeftOnly,
            Direction::LeftOnly => Direction::RightOnly,
            Direction::RightOnly => Direction::Centered,
        };
        info!(direction = ?next, "direction changed");
        slideshow.set_direction(next);
    }

    let animation = slideshow.config().animation_duration;
    if rl.is_key_pressed(KeyboardKey::KEY_UP) {
        slideshow.set_animation_duration(animation + STEP);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_DOWN) {
        slideshow.set_animation_duration(animation.saturating_sub(STEP).max(STEP));
    }

    let delay = slideshow.config().configured_switch_delay();
    if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
        slideshow.set_image_switch_delay(delay + STEP);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
        slideshow.set_image_switch_delay(delay.saturating_sub(STEP).max(STEP));
    }

    let translation = slideshow.config().translation;
    if rl.is_key_pressed(KeyboardKey::KEY_EQUAL) {
        slideshow.set_translation(translation + OFFSET_STEP);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_MINUS) {
        slideshow.set_translation((translation - OFFSET_STEP).max(0.0));
    }
    let inset = slideshow.config().inset;
    if rl.is_key_pressed(KeyboardKey::KEY_PAGE_UP) {
        slideshow.set_inset(inset + OFFSET_STEP);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_PAGE_DOWN) {
        slideshow.set_inset(inset - OFFSET_STEP);
    }
    surface.set_inset(slideshow.config().inset);

    if rl.is_key_pressed(KeyboardKey::KEY_F) {
        let crossfade = if slideshow.config().crossfade.is_zero() {
            Duration::from_millis(CROSSFADE_MS)
        } else {
            Duration::ZERO
        };
        slideshow.set_crossfade(crossfade);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_C) {
        let skip = !slideshow.config().skip_memory_cache;
        slideshow.set_skip_memory_cache(skip);
    }

    if rl.is_key_pressed(KeyboardKey::KEY_S) {
        let config = slideshow.config();
        info!(
            current = slideshow.current().map(ImageId::as_str).unwrap_or("-"),
            queued = slideshow.queue().len(),
            running = slideshow.is_running(),
            phase = ?slideshow.phase(),
            target = slideshow.target_offset(),
            animation = ?config.animation_duration,
            switch_delay = ?config.switch_delay(),
            skip_memory_cache = config.skip_memory_cache,
            "status"
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sliding_image=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli).context("failed to load configuration")?;
    info!(
        images = settings.images.len(),
        direction = ?settings.config.direction,
        "configuration loaded"
    );

    let (mut rl, thread) = raylib::init()
        .size(settings.width, settings.height)
        .title("Sliding Image")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let loader = RaylibImageLoader::new().context("failed to start image loader")?;
    let mut surface = SlideSurface::new(settings.config.inset);
    let mut slideshow = SlideshowController::new(
        TweenDriver::new(),
        loader,
        DelayTimer::new(),
        settings.config.clone(),
    );
    slideshow.set_image_list(settings.images.iter().cloned());

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time().max(0.0);

        handle_keys(&rl, &mut slideshow, &mut surface, &settings.images);
        slideshow.advance(Duration::from_secs_f32(dt));
        slideshow.loader_mut().pump(&mut rl, &thread, &mut surface);
        surface.update(dt);

        let offset = slideshow.driver().offset();
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        surface.draw(&mut d, offset);
    }

    // Textures must go before the window does
    slideshow.dispose();
    drop(slideshow);
    drop(surface);
    info!("window closed");

    Ok(())
}
