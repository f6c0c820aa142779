//! Configuration types for the AS7421 driver

use core::ops::BitOr;

use fugit::{ExtU64, MicrosDurationU64};

/// Which channel groups an acquisition cycles through
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelCycle {
    /// Group A only (16 channels)
    A,
    /// Groups A and B (32 channels)
    Ab,
    /// Groups A, B and C (48 channels)
    Abc,
    /// All four groups (64 channels)
    #[default]
    Abcd,
}

impl ChannelCycle {
    pub(crate) fn as_symbol(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Ab => "AB",
            Self::Abc => "ABC",
            Self::Abcd => "ABCD",
        }
    }
}

/// LED drive current selection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedCurrent {
    /// 50 mA drive
    #[default]
    Ma50,
    /// 75 mA drive
    Ma75,
}

impl LedCurrent {
    pub(crate) fn as_symbol(self) -> &'static str {
        match self {
            Self::Ma50 => "50mA",
            Self::Ma75 => "75mA",
        }
    }
}

/// LED auto-fire mode during an acquisition
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedAutoMode {
    /// LEDs stay off
    #[default]
    Off,
    /// Off during the first integration pattern, on during the second
    Off1On2,
    /// On during the first integration pattern, off during the second
    On1Off2,
    /// LEDs fire on every integration
    On,
}

impl LedAutoMode {
    pub(crate) fn as_symbol(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Off1On2 => "OFF1ON2",
            Self::On1Off2 => "ON1OFF2",
            Self::On => "ON",
        }
    }
}

/// Autozero wait time between offset-calibration steps
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AutozeroWait {
    /// 32 µs
    Us32,
    /// 64 µs
    Us64,
    /// 128 µs
    #[default]
    Us128,
    /// 256 µs
    Us256,
}

impl AutozeroWait {
    pub(crate) fn as_symbol(self) -> &'static str {
        match self {
            Self::Us32 => "32us",
            Self::Us64 => "64us",
            Self::Us128 => "128us",
            Self::Us256 => "256us",
        }
    }
}

/// One of the four banks of 16 spectral channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelGroup {
    /// Channels 0–15
    A,
    /// Channels 16–31
    B,
    /// Channels 32–47
    C,
    /// Channels 48–63
    D,
}

impl ChannelGroup {
    /// All groups, in readout order
    pub const ALL: [ChannelGroup; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub(crate) fn register_name(self) -> &'static str {
        match self {
            Self::A => "CHANNEL_A",
            Self::B => "CHANNEL_B",
            Self::C => "CHANNEL_C",
            Self::D => "CHANNEL_D",
        }
    }

    pub(crate) fn temp_field(self) -> &'static str {
        match self {
            Self::A => "TEMP_A",
            Self::B => "TEMP_B",
            Self::C => "TEMP_C",
            Self::D => "TEMP_D",
        }
    }
}

/// Bitmask selecting which LEDs the multiplier applies to
///
/// Note the drive lines for LED 3 and LED 4 are swapped in the mask, an
/// artifact of the reference module's board routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Leds(u8);

impl Leds {
    /// LED 1
    pub const LED_1: Leds = Leds(0x01);
    /// LED 2
    pub const LED_2: Leds = Leds(0x02);
    /// LED 4
    pub const LED_4: Leds = Leds(0x04);
    /// LED 3
    pub const LED_3: Leds = Leds(0x08);
    /// Every LED the module carries
    pub const ALL: Leds = Leds(0x1F);

    /// The raw multiplier mask
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Leds {
    type Output = Leds;

    fn bitor(self, rhs: Leds) -> Leds {
        Leds(self.0 | rhs.0)
    }
}

/// Autozero (periodic offset calibration) parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AutozeroConfig {
    /// Run autozero cycles during acquisition
    pub enabled: bool,
    /// Autozero every integration cycle rather than once at start
    pub cycle: bool,
    /// Iteration count (3 bits)
    pub iterations: u8,
    /// Wait time between calibration steps
    pub wait: AutozeroWait,
}

impl Default for AutozeroConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cycle: true,
            iterations: 0,
            wait: AutozeroWait::Us128,
        }
    }
}

/// Baseline acquisition configuration applied by [`As7421::apply`](crate::As7421::apply)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementConfig {
    /// Integration time per channel group
    pub integration_time: MicrosDurationU64,
    /// Wait time between measurement cycles
    pub wait_time: MicrosDurationU64,
    /// Number of measurements one start command acquires
    pub measurements: u8,
    /// Channel groups to cycle through
    pub cycle: ChannelCycle,
    /// Offset calibration parameters
    pub autozero: AutozeroConfig,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            integration_time: 20u64.millis(),
            wait_time: 10u64.millis(),
            measurements: 1,
            cycle: ChannelCycle::Abcd,
            autozero: AutozeroConfig::default(),
        }
    }
}

/// Bounds and intervals for the blocking poll loops
///
/// The reset poll sleeps between status reads; the data-ready poll is a
/// tight spin with one real status read per iteration and no sleep. Both
/// are bounded: exhausting a bound surfaces
/// [`Error::Unresponsive`](crate::Error::Unresponsive) instead of hanging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Settle delay between the reset command and the first status poll
    pub reset_settle_ms: u32,
    /// Interval between reset-status polls
    pub reset_poll_interval_ms: u32,
    /// Reset-status reads before giving up
    pub max_reset_polls: u32,
    /// Data-ready status reads per sample before giving up
    pub max_ready_polls: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reset_settle_ms: 100,
            reset_poll_interval_ms: 10,
            max_reset_polls: 500,
            max_ready_polls: 1_000_000,
        }
    }
}
