//! Hardware constants
//!
//! Every value here must stay bit-compatible with the mechanical build:
//! the servo horns are calibrated against these angles and timings.

// Topology

/// Number of PCA9685 boards (one for the hours pair, one for the minutes pair)
pub const BOARD_COUNT: usize = 2;

/// PWM channels per PCA9685 board
pub const CHANNELS_PER_BOARD: usize = 16;

/// Number of digit positions
pub const DIGIT_COUNT: usize = 4;

/// Segments per digit
pub const SEGMENTS_PER_DIGIT: usize = 7;

/// Channel offset of the units-type digit bank on a board
pub const UNITS_BANK_OFFSET: u8 = 8;

/// Separator channel on the hours board
pub const SEPARATOR_CHANNEL: u8 = 15;

// PCA9685

/// I2C address of the hours board
pub const PCA9685_ADDR_HOURS: u8 = 0x40;

/// I2C address of the minutes board
pub const PCA9685_ADDR_MINUTES: u8 = 0x41;

/// PWM frequency for hobby servos
pub const PWM_FREQ_HZ: u32 = 50;

/// PCA9685 duty resolution (12 bits)
pub const PWM_RESOLUTION: u32 = 4096;

/// Default I2C clock
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Fastest I2C clock the PCA9685 accepts (Fast-mode Plus)
pub const I2C_FREQUENCY_MAX_HZ: u32 = 1_000_000;

// Servo

/// Pulse width at 0°
pub const SERVO_MIN_PULSE_US: u16 = 500;

/// Pulse width at 180°
pub const SERVO_MAX_PULSE_US: u16 = 2500;

/// Lowest commandable angle
pub const ANGLE_MIN: i16 = 0;

/// Highest commandable angle
pub const ANGLE_MAX: i16 = 180;

/// Angle increment per ramp step (same for all speed profiles)
pub const STEP_DEGREES: i16 = 5;

/// Step delay for the FAST profile
pub const SPEED_FAST_DELAY_MS: u32 = 10;

/// Step delay for the NORMAL profile
pub const SPEED_NORMAL_DELAY_MS: u32 = 50;

/// Step delay for the NIGHT profile
pub const SPEED_NIGHT_DELAY_MS: u32 = 100;

/// Gap between the starts of consecutive segment moves
pub const STAGGER_DELAY_MS: u32 = 20;

/// Time after the last command before a channel's signal is released
pub const IDLE_TIMEOUT_MS: u32 = 500;

// Segment angles

pub const ANGLE_ACTIVE_STANDARD: i16 = 70;
pub const ANGLE_REST_STANDARD: i16 = 165;
pub const ANGLE_ACTIVE_INVERTED: i16 = 100;
pub const ANGLE_REST_INVERTED: i16 = 5;

/// Collision parking angle for segment 2
pub const ANGLE_INTERMEDIATE_STANDARD: i16 = 100;

/// Collision parking angle for segment 6
pub const ANGLE_INTERMEDIATE_INVERTED: i16 = 70;

// Reset choreography

/// Pause after each segment during the reset sweep
pub const RESET_SEGMENT_PAUSE_MS: u32 = 500;

/// Pause between the rest sweep, the active sweep and the walkthrough
pub const RESET_PHASE_PAUSE_MS: u32 = 2000;

/// Pause after each walkthrough digit change
pub const WALKTHROUGH_PAUSE_MS: u32 = 500;

/// Pause between the walkthrough and settling back to 88:88
pub const WALKTHROUGH_SETTLE_MS: u32 = 1000;

// Display

/// Minimum interval between time checks
pub const DISPLAY_REFRESH_MS: u32 = 1000;
