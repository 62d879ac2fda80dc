// Logical canvas geometry. All game units live on this fixed canvas; the
// renderer letterboxes it onto whatever terminal it gets.
pub const CANVAS_W: f64 = 320.0;
pub const CANVAS_H: f64 = 480.0;
pub const GROUND_H: f64 = 40.0;
pub const GROUND_Y: f64 = CANVAS_H - GROUND_H;

// Bird
pub const BIRD_X: f64 = 50.0;
pub const BIRD_W: f64 = 34.0;
pub const BIRD_H: f64 = 24.0;
pub const BIRD_START_Y: f64 = CANVAS_H / 2.0;
pub const BIRD_FRAMES: usize = 3;
pub const BIRD_ANIM_PERIOD: u64 = 20;

// Physics, units per tick at the fixed ~60Hz step
pub const GRAVITY: f64 = 0.2;
pub const FLAP_VELOCITY: f64 = -4.5;

// Pipes
pub const PIPE_W: f64 = 50.0;
pub const PIPE_GAP: f64 = 100.0;
pub const PIPE_SPEED: f64 = 2.0;
pub const PIPE_SPAWN_PERIOD: u64 = 120;
pub const PIPE_MIN_TOP: f64 = 50.0;
pub const PIPE_MAX_TOP: f64 = CANVAS_H / 2.0;

// Timing
pub const TAP_PROMPT_PERIOD: u64 = 30;
pub const FRAME_MS: u64 = 16;
