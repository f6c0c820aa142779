//! High-level driver API for the AS7421
//!
//! [`As7421`] wraps a [`RegisterMap`] bound to the chip schema and sequences
//! the acquisition lifecycle: software reset handshake, SMUX/gain/LED and
//! autozero configuration, and the pull-driven measurement loop. The chip's
//! registers are the sole state — the driver keeps nothing but the map and
//! its poll bounds, so dropping and reconstructing it is always safe.

use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;
use fugit::MicrosDurationU64;

use crate::config::{
    AutozeroConfig, ChannelCycle, ChannelGroup, LedAutoMode, LedCurrent, Leds, MeasurementConfig,
    Timing,
};
use crate::regmap::{RegisterMap, Value};
use crate::registers::{ESTIMATED_WAVELENGTHS, RAM_WINDOW, REGISTERS};
use crate::Error;

/// Default SMUX routing: 8 bytes repeated into each group's bank
const DEFAULT_SMUX: [u8; 8] = [0x21, 0x21, 0x21, 0x21, 0x43, 0x43, 0x43, 0x43];

/// SMUX RAM banks with the window offset each group's pattern lands at
const SMUX_BANKS: [(&str, usize); 4] = [
    ("SMUX_A", 0),
    ("SMUX_B", 8),
    ("SMUX_C", 16),
    ("SMUX_D", 24),
];

/// Snapshot of the STATUS_7 flags accompanying a sample
///
/// Saturation, data-lost and thermal-shutdown flags are informational: the
/// acquisition loop surfaces them alongside each sample and never aborts on
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementStatus {
    /// Which channel-data buffer the chip is exposing
    pub data_pointer: u8,
    /// A sample was overwritten before the host read it
    pub data_lost: bool,
    /// An ADC count clipped at full scale
    pub digital_saturation: bool,
    /// The analog front-end saturated
    pub analog_saturation: bool,
    /// Thermal shutdown engaged
    pub temperature_shutdown: bool,
    /// An autozero cycle finished
    pub end_of_autozero: bool,
    /// Channel data is ready to read
    pub data_available: bool,
}

impl MeasurementStatus {
    /// True if any flag (including data-available) is set
    pub fn any_set(&self) -> bool {
        self.data_lost
            || self.digital_saturation
            || self.analog_saturation
            || self.temperature_shutdown
            || self.end_of_autozero
            || self.data_available
    }
}

/// One acquisition sample: 64 spectral channels, 4 die temperatures, and the
/// status flags observed when the sample became available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Channel counts in group-then-index order (A0..A15, B, C, D)
    pub channels: [u16; 64],
    /// Die temperature per group, in group order
    pub temperatures: [u16; 4],
    /// Status flags read with this sample
    pub status: MeasurementStatus,
}

/// Driver for the AS7421 spectral sensor
pub struct As7421<I> {
    map: RegisterMap<I>,
    timing: Timing,
}

impl<I> As7421<I> {
    /// Create a driver with default poll bounds
    ///
    /// No bus traffic happens here; call [`init`](Self::init) to run the
    /// reset handshake before configuring the device.
    pub fn new(interface: I) -> Self {
        Self::with_timing(interface, Timing::default())
    }

    /// Create a driver with explicit poll bounds
    pub fn with_timing(interface: I, timing: Timing) -> Self {
        Self {
            map: RegisterMap::new(interface, &REGISTERS),
            timing,
        }
    }

    /// Direct access to the underlying register map
    pub fn register_map(&mut self) -> &mut RegisterMap<I> {
        &mut self.map
    }

    /// Consume the driver and return the bus interface
    pub fn release(self) -> I {
        self.map.release()
    }

    /// Approximate center wavelength (nm) per channel, in the same order as
    /// [`read_all_channels`](Self::read_all_channels)
    pub fn wavelengths() -> &'static [u16; 64] {
        &ESTIMATED_WAVELENGTHS
    }
}

impl<I> As7421<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Run the software reset handshake
    ///
    /// Issues the reset command, waits the settle delay, then polls the
    /// reset-status bit at the configured interval until it reads clear.
    /// Each poll performs one real status read. Exhausting
    /// [`Timing::max_reset_polls`] returns [`Error::Unresponsive`].
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>> {
        self.reset()?;
        delay.delay_ms(self.timing.reset_settle_ms);

        #[cfg(feature = "defmt")]
        defmt::debug!("as7421: waiting for reset to complete");

        for _ in 0..self.timing.max_reset_polls {
            if !self.is_resetting()? {
                #[cfg(feature = "defmt")]
                defmt::debug!("as7421: reset complete");
                return Ok(());
            }
            delay.delay_ms(self.timing.reset_poll_interval_ms);
        }
        Err(Error::Unresponsive)
    }

    /// Issue the software reset command without waiting for completion
    pub fn reset(&mut self) -> Result<(), Error<I::Error>> {
        self.map.set("CFG_MISC", &[("SW_RESET", Value::Uint(1))])
    }

    /// Whether the reset-status bit still reads set
    pub fn is_resetting(&mut self) -> Result<bool, Error<I::Error>> {
        self.map.get("CFG_MISC")?.flag("SW_RESET")
    }

    /// Device identification code from STATUS_0
    pub fn device_id(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.map.get("STATUS_0")?.uint("DEV_ID")? as u8)
    }

    /// Silicon revision code from STATUS_1
    pub fn revision(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.map.get("STATUS_1")?.uint("REV_ID")? as u8)
    }

    // ==================== POWER ====================

    /// Enable the analog front-end
    ///
    /// Orthogonal to the acquisition machine; may be toggled while idle
    /// without re-running reset.
    pub fn powerup(&mut self) -> Result<(), Error<I::Error>> {
        self.map.set("ENABLE", &[("POWERON", Value::Uint(1))])
    }

    /// Switch the LEDs off and power down the analog front-end
    pub fn sleep(&mut self) -> Result<(), Error<I::Error>> {
        self.switch_off_led()?;
        self.map.set("ENABLE", &[("POWERON", Value::Uint(0))])
    }

    // ==================== TIMING ====================

    /// Set the integration time (one tick = 1 µs, 3-byte range)
    pub fn set_integration_time(
        &mut self,
        time: MicrosDurationU64,
    ) -> Result<(), Error<I::Error>> {
        self.map.set("LTF_ITIME", &[("ITIME", Value::Duration(time))])
    }

    /// Read back the integration time
    pub fn integration_time(&mut self) -> Result<MicrosDurationU64, Error<I::Error>> {
        self.map.get("LTF_ITIME")?.duration("ITIME")
    }

    /// Set the wait time between measurement cycles
    pub fn set_wait_time(&mut self, time: MicrosDurationU64) -> Result<(), Error<I::Error>> {
        self.map.set("LTF_WTIME", &[("WTIME", Value::Duration(time))])
    }

    /// Read back the wait time
    pub fn wait_time(&mut self) -> Result<MicrosDurationU64, Error<I::Error>> {
        self.map.get("LTF_WTIME")?.duration("WTIME")
    }

    /// Number of measurements one start command acquires
    pub fn set_measurement_count(&mut self, count: u8) -> Result<(), Error<I::Error>> {
        self.map
            .set("LTF_ICOUNT", &[("ICOUNT", Value::Uint(count as u64))])
    }

    /// Read back the measurement count
    pub fn measurement_count(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.map.get("LTF_ICOUNT")?.uint("ICOUNT")? as u8)
    }

    /// Integration cycle count
    pub fn set_cycle_count(&mut self, count: u16) -> Result<(), Error<I::Error>> {
        self.map
            .set("LTF_CCOUNT", &[("CCOUNT", Value::Uint(count as u64))])
    }

    // ==================== CHANNELS / LED ====================

    /// Select which channel groups an acquisition cycles through
    pub fn enable_channels(&mut self, cycle: ChannelCycle) -> Result<(), Error<I::Error>> {
        self.map
            .set("CFG_LTF", &[("LTF_CYCLE", Value::Symbol(cycle.as_symbol()))])
    }

    /// Configure LED drive: multiplier mask for all four offsets, then the
    /// drive current
    pub fn configure_led(
        &mut self,
        current: LedCurrent,
        leds: Leds,
    ) -> Result<(), Error<I::Error>> {
        for offset in 0..4u64 {
            self.map
                .set("CFG_LED", &[("LED_OFFSET", Value::Uint(offset))])?;
            self.map.set(
                "CFG_LED_MULT",
                &[("LED_MULT", Value::Uint(leds.bits() as u64))],
            )?;
        }
        self.map.set("CFG_LED", &[("LED_OFFSET", Value::Uint(0))])?;
        self.map.set(
            "CFG_LED",
            &[("LED_CURRENT", Value::Symbol(current.as_symbol()))],
        )
    }

    /// Force the LEDs on outside of auto-fire mode
    pub fn switch_on_led(&mut self) -> Result<(), Error<I::Error>> {
        self.map.set("CFG_LED", &[("SET_LED_ON", Value::Uint(1))])
    }

    /// Release the forced-on LED state
    pub fn switch_off_led(&mut self) -> Result<(), Error<I::Error>> {
        self.map.set("CFG_LED", &[("SET_LED_ON", Value::Uint(0))])
    }

    /// Insert the LED settling wait before each integration
    pub fn enable_led_wait(&mut self) -> Result<(), Error<I::Error>> {
        self.map.set("CFG_MISC", &[("LED_WAIT_OFF", Value::Uint(0))])
    }

    /// Skip the LED settling wait
    pub fn disable_led_wait(&mut self) -> Result<(), Error<I::Error>> {
        self.map.set("CFG_MISC", &[("LED_WAIT_OFF", Value::Uint(1))])
    }

    /// LED settling wait length, in cycles
    pub fn set_led_wait(&mut self, cycles: u8) -> Result<(), Error<I::Error>> {
        self.map
            .set("LED_WAIT", &[("LED_WAIT", Value::Uint(cycles as u64))])
    }

    // ==================== INDIRECT RAM (SMUX / GAIN) ====================

    /// Write bytes into the RAM window starting at `offset`
    ///
    /// The target bank must have been selected through CFG_RAM first; this
    /// is the second half of the two-step protocol and is only safe because
    /// the map is exclusively owned between the two steps.
    pub fn write_ram(&mut self, data: &[u8], offset: usize) -> Result<(), Error<I::Error>> {
        for (idx, &byte) in data.iter().enumerate() {
            let name = RAM_WINDOW
                .get(offset + idx)
                .ok_or(Error::InvalidValue)?;
            self.map.set(name, &[("VALUE", Value::Uint(byte as u64))])?;
        }
        Ok(())
    }

    /// Dump the 32-byte RAM window
    pub fn read_ram(&mut self) -> Result<[u8; 32], Error<I::Error>> {
        let mut out = [0u8; 32];
        for (idx, name) in RAM_WINDOW.iter().enumerate() {
            out[idx] = self.map.get(name)?.uint("VALUE")? as u8;
        }
        Ok(out)
    }

    fn select_ram(&mut self, bank: &'static str) -> Result<(), Error<I::Error>> {
        self.map
            .set("CFG_RAM", &[("RAM_OFFSET", Value::Symbol(bank))])
    }

    /// Broadcast one analog gain value to all 32 slots of both gain banks
    pub fn configure_gain(&mut self, gain: u8) -> Result<(), Error<I::Error>> {
        let data = [gain; 32];
        for bank in ["ASETUP_AB", "ASETUP_CD"] {
            self.map.set(
                "CFG_RAM",
                &[
                    ("RAM_OFFSET", Value::Symbol(bank)),
                    ("REG_BANK", Value::Uint(0)),
                ],
            )?;
            self.write_ram(&data, 0)?;
        }
        Ok(())
    }

    /// Clear all four SMUX routing banks
    pub fn zero_smux(&mut self) -> Result<(), Error<I::Error>> {
        for (bank, _) in SMUX_BANKS {
            self.select_ram(bank)?;
            self.write_ram(&[0; 32], 0)?;
        }
        Ok(())
    }

    /// Program the SMUX routing for all four groups
    ///
    /// Clears every bank first, then writes the 8-byte routing pattern into
    /// each group's bank at that group's window offset. `None` selects the
    /// default photodiode routing.
    pub fn configure_smux(&mut self, pattern: Option<&[u8; 8]>) -> Result<(), Error<I::Error>> {
        let pattern = pattern.copied().unwrap_or(DEFAULT_SMUX);
        self.zero_smux()?;
        for (bank, offset) in SMUX_BANKS {
            self.select_ram(bank)?;
            self.write_ram(&pattern, offset)?;
        }
        Ok(())
    }

    // ==================== AUTOZERO ====================

    /// Configure the periodic offset-calibration engine
    pub fn enable_autozero(&mut self, az: AutozeroConfig) -> Result<(), Error<I::Error>> {
        self.map.set(
            "CFG_AZ",
            &[
                ("AZ_EN", Value::from(az.enabled)),
                ("AZ_ON", Value::Uint(1)),
                ("AZ_CYCLE", Value::from(az.cycle)),
                ("AZ_ITERATION", Value::Uint(az.iterations as u64)),
                ("AZ_WTIME", Value::Symbol(az.wait.as_symbol())),
            ],
        )
    }

    // ==================== BASELINE SETUP ====================

    /// Apply a baseline acquisition configuration
    ///
    /// Sets the wait-cycle and LED-wait plumbing to known-good values, then
    /// programs integration/wait time, measurement count, channel cycle and
    /// autozero from `config`.
    pub fn apply(&mut self, config: &MeasurementConfig) -> Result<(), Error<I::Error>> {
        self.map.set(
            "CFG_MISC",
            &[
                ("LED_WAIT_OFF", Value::Uint(0)),
                ("WAIT_CYCLE_ON", Value::Uint(1)),
            ],
        )?;
        self.set_led_wait(2)?;
        self.set_cycle_count(1023)?;
        self.map
            .set("ENABLE", &[("LED_AUTO", Value::Symbol("OFF"))])?;
        self.set_integration_time(config.integration_time)?;
        self.set_wait_time(config.wait_time)?;
        self.set_measurement_count(config.measurements)?;
        self.enable_channels(config.cycle)?;
        self.enable_autozero(config.autozero)?;
        self.enable_led_wait()
    }

    // ==================== STATUS ====================

    /// Read the STATUS_7 flags (volatile; one real bus read per call)
    pub fn measurement_status(&mut self) -> Result<MeasurementStatus, Error<I::Error>> {
        let status = self.map.get("STATUS_7")?;
        Ok(MeasurementStatus {
            data_pointer: status.uint("I2C_DATA_POINTER")? as u8,
            data_lost: status.flag("DLOST")?,
            digital_saturation: status.flag("DSAT")?,
            analog_saturation: status.flag("ASAT")?,
            temperature_shutdown: status.flag("TSD")?,
            end_of_autozero: status.flag("AZ")?,
            data_available: status.flag("ADATA")?,
        })
    }

    /// Whether channel data is ready to read
    pub fn measurement_ready(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.measurement_status()?.data_available)
    }

    /// Whether an acquisition cycle is in progress
    pub fn ltf_busy(&mut self) -> Result<bool, Error<I::Error>> {
        self.map.get("STATUS_6")?.flag("LTF_BUSY")
    }

    /// The light-to-frequency engine's ready flag
    pub fn ltf_ready(&mut self) -> Result<bool, Error<I::Error>> {
        self.map.get("STATUS_6")?.flag("LTF_READY")
    }

    /// Per-channel analog saturation flags, one bit per channel of the
    /// current group
    pub fn analog_saturation(&mut self) -> Result<u16, Error<I::Error>> {
        let reading = self.map.get("STATUS_ASAT")?;
        let raw = reading.raw();
        Ok(u16::from_be_bytes([raw[0], raw[1]]))
    }

    // ==================== READOUT ====================

    /// Read one group's 16 channel counts (index order 0..15)
    pub fn read_channels(&mut self, group: ChannelGroup) -> Result<[u16; 16], Error<I::Error>> {
        let reading = self.map.get(group.register_name())?;
        let mut out = [0u16; 16];
        for (slot, field) in out.iter_mut().zip(reading.register().fields()) {
            *slot = reading.uint(field.name())? as u16;
        }
        Ok(out)
    }

    /// Read all 64 channel counts in group-then-index order (A0..A15, B, C, D)
    pub fn read_all_channels(&mut self) -> Result<[u16; 64], Error<I::Error>> {
        let mut out = [0u16; 64];
        for (idx, group) in ChannelGroup::ALL.into_iter().enumerate() {
            let values = self.read_channels(group)?;
            out[idx * 16..(idx + 1) * 16].copy_from_slice(&values);
        }
        Ok(out)
    }

    /// Read one group's die temperature
    pub fn read_temperature(&mut self, group: ChannelGroup) -> Result<u16, Error<I::Error>> {
        Ok(self.map.get("TEMP")?.uint(group.temp_field())? as u16)
    }

    /// Read all four die temperatures in group order, from one burst
    pub fn read_all_temperatures(&mut self) -> Result<[u16; 4], Error<I::Error>> {
        let reading = self.map.get("TEMP")?;
        let mut out = [0u16; 4];
        for (slot, group) in out.iter_mut().zip(ChannelGroup::ALL) {
            *slot = reading.uint(group.temp_field())? as u16;
        }
        Ok(out)
    }

    // ==================== ACQUISITION ====================

    /// Start an acquisition: power on, enable the timing engine and thermal
    /// protection, and select the LED auto-fire mode — one register write
    pub fn start_measurement(&mut self, led: LedAutoMode) -> Result<(), Error<I::Error>> {
        self.map.set(
            "ENABLE",
            &[
                ("POWERON", Value::Uint(1)),
                ("LTF_EN", Value::Uint(1)),
                ("TSD_EN", Value::Uint(1)),
                ("LED_AUTO", Value::Symbol(led.as_symbol())),
            ],
        )
    }

    /// Stop an acquisition: disable the timing engine, thermal protection
    /// and LED auto-fire
    pub fn stop_measurement(&mut self) -> Result<(), Error<I::Error>> {
        self.map.set(
            "ENABLE",
            &[
                ("LTF_EN", Value::Uint(0)),
                ("TSD_EN", Value::Uint(0)),
                ("LED_AUTO", Value::Symbol("OFF")),
            ],
        )
    }

    /// Pull-driven sequence of samples for a started acquisition
    ///
    /// Call [`start_measurement`](Self::start_measurement) first. The
    /// sequence is finite — bounded by the configured measurement count —
    /// and restartable only by re-arming.
    pub fn measure(&mut self) -> Measurements<'_, I> {
        Measurements {
            dev: self,
            finished: false,
        }
    }
}

/// Lazy, in-order, finite sequence of measurement samples
///
/// Every `next()` performs real bus traffic: one busy-status read, then one
/// STATUS_7 read per data-ready poll (a tight spin, no sleep), then the
/// channel and temperature bursts. When the busy flag clears the stop
/// command is issued exactly once and the sequence ends. If the device never
/// reports busy, the sequence ends immediately — not-busy is treated as
/// complete, matching the chip's tolerance for fast acquisitions.
///
/// The data-ready spin is bounded by [`Timing::max_ready_polls`]; exhaustion
/// yields `Err(Unresponsive)` and ends the sequence.
pub struct Measurements<'a, I> {
    dev: &'a mut As7421<I>,
    finished: bool,
}

impl<I> Measurements<'_, I>
where
    I: RegisterInterface<AddressType = u8>,
{
    fn advance(&mut self) -> Result<Option<Sample>, Error<I::Error>> {
        if !self.dev.ltf_busy()? {
            self.dev.stop_measurement()?;
            return Ok(None);
        }

        let mut polls = 1u32;
        let mut status = self.dev.measurement_status()?;
        while !status.data_available {
            if polls >= self.dev.timing.max_ready_polls {
                return Err(Error::Unresponsive);
            }
            status = self.dev.measurement_status()?;
            polls += 1;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("as7421: sample ready after {} status polls", polls);

        let channels = self.dev.read_all_channels()?;
        let temperatures = self.dev.read_all_temperatures()?;
        Ok(Some(Sample {
            channels,
            temperatures,
            status,
        }))
    }
}

impl<I> Iterator for Measurements<'_, I>
where
    I: RegisterInterface<AddressType = u8>,
{
    type Item = Result<Sample, Error<I::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(sample)) => Some(Ok(sample)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}
