pub const RENDER_WIDTH: i32 = 1280;           // Default window width
pub const RENDER_HEIGHT: i32 = 720;           // Default window height
pub const FPS: u32 = 60;                      // Frames per second

pub const ANIMATION_DURATION_MS: u64 = 9000;  // One slide sweep (milliseconds)
pub const IMAGE_SWITCH_DELAY_MS: u64 = 11000; // Time an image stays active in centered mode (milliseconds)
pub const CROSSFADE_MS: u64 = 1500;           // Fade between the outgoing and incoming image (milliseconds)

pub const TRANSLATION: f32 = 120.0;           // Magnitude of the horizontal slide offset (pixels)
pub const INSET: f32 = 200.0;                 // Overscan on each side so the slide never reveals an edge (pixels)

pub const FETCH_TIMEOUT_SECS: u64 = 30;       // Per-request timeout for remote images
