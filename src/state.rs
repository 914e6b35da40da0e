use serde::Deserialize;

/// Which way the image slides.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    LeftOnly,  // Slide left, snap back, slide left again
    RightOnly, // Slide right, snap back, slide right again
    #[default]
    Centered,  // Ping-pong around the resting position
}

impl Direction {
    /// Directional modes have no dwell phase separate from the slide.
    pub fn is_directional(self) -> bool {
        self != Direction::Centered
    }

    /// Sign of the first slide target.
    pub fn sign(self) -> f32 {
        match self {
            Direction::LeftOnly => -1.0,
            Direction::RightOnly | Direction::Centered => 1.0,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlidePhase {
    Idle,        // Nothing on screen, no animation
    SlidingOut,  // Moving toward the initial target
    SlidingBack, // Centered only: moving toward the mirrored target
}

impl SlidePhase {
    /// Centered phase for a sweep heading for `target`.
    pub fn heading_for(target: f32) -> Self {
        if target < 0.0 {
            SlidePhase::SlidingBack
        } else {
            SlidePhase::SlidingOut
        }
    }
}
