// --- Game Constants ---
pub const DEFAULT_SCREEN_WIDTH: i32 = 640;
pub const DEFAULT_SCREEN_HEIGHT: i32 = 480;
pub const DEFAULT_TICK_MS: u64 = 33;

pub const HEADING_UNITS: i32 = 6; // One full turn of the heading wheel

pub const SHIP_SIZE: i32 = 10;
pub const SHIP_THRUST_STEP: i32 = 10;
pub const SHIP_ROTATION_STEP: i32 = 1;
pub const SHIP_MUZZLE_OFFSET: i32 = 5; // Distance ahead of the centre where bullets spawn

pub const ASTEROID_SPEED: i32 = 2;
pub const LARGE_ASTEROID_RADIUS: i32 = 50;
pub const FRAGMENT_MIN_RADIUS: i32 = 10; // Children spawn only when radius / 2 exceeds this
pub const FRAGMENT_COUNT: usize = 3;

pub const BULLET_SPEED: i32 = 7;
pub const BULLET_DRAW_LENGTH: i32 = 3;

pub const SCORE_NUMERATOR: u32 = 200; // Points = SCORE_NUMERATOR / radius

pub const STARTING_LIVES: u32 = 3;
pub const STARTING_LEVEL: i32 = 1;
