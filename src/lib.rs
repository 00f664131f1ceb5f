//! # APDS-9960 Digital Proximity, Ambient Light, RGB and Gesture Sensor Driver
//!
//! This is a platform-agnostic Rust driver for the Broadcom APDS-9960,
//! built using the [`embedded-hal`] traits for bus access and delays.
//!
//! The APDS-9960 provides:
//! - Clear, Red, Green and Blue light channels (16-bit each)
//! - 8-bit proximity detection with programmable LED drive and pulse train
//! - A gesture engine buffering four directional photodiodes in a 32-entry FIFO
//! - Interrupts with thresholds and persistence filters
//! - I2C interface (address 0x39)
//!
//! ## Features
//!
//! - **Register-level API** covering every configuration field of the device
//! - **Unit conversions** between milliseconds and integration/wait register codes
//! - **Read test harness** ([`read_test`]) that brings the sensor up with a fixed,
//!   ordered configuration and samples RGBC and proximity
//! - **Interrupt dispatch** through [`Apds9960::irq_handler`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apds9960::{Apds9960, AlsColorGain, Conf, ll::I2cInterface};
//!
//! # fn main() {
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! # let delay = embedded_hal_mock::eh1::delay::NoopDelay::new();
//! let mut sensor = Apds9960::new(I2cInterface::new(i2c), delay);
//!
//! // Check the chip ID and take ownership of the bus
//! sensor.init().unwrap();
//!
//! // Configure the light engine
//! sensor.set_conf(Conf::PowerOn, true).unwrap();
//! let atime = sensor.adc_integration_time_convert_to_register(100.0).unwrap();
//! sensor.set_adc_integration_time(atime).unwrap();
//! sensor.set_als_color_gain(AlsColorGain::Gain4x).unwrap();
//! sensor.set_conf(Conf::Als, true).unwrap();
//!
//! // Read RGBC data
//! // let rgbc = sensor.read_rgbc().unwrap();
//! // println!("C: {} R: {} G: {} B: {}", rgbc.clear, rgbc.red, rgbc.green, rgbc.blue);
//!
//! sensor.deinit().unwrap();
//! # }
//! ```
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal

#![no_std]
#![deny(missing_docs)]

use embedded_hal::delay::DelayNs;

pub mod ll;
pub mod read_test;

use ll::{bits, reg, BusInterface, CHIP_ID};

/// Duration of one ADC / wait cycle in milliseconds
const CYCLE_MS: f32 = 2.78;

/// Longest integration or wait time reachable with the 8-bit timing registers
const MAX_TIME_MS: f32 = CYCLE_MS * 256.0;

/// Function enable bits in the ENABLE register
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Conf {
    /// Oscillator and internal timers
    PowerOn,
    /// ALS (RGBC) engine
    Als,
    /// Proximity detection engine
    ProximityDetect,
    /// Wait timer between engine cycles
    Wait,
    /// ALS interrupt
    AlsInterrupt,
    /// Proximity interrupt
    ProximityInterrupt,
    /// Gesture engine
    Gesture,
}

impl Conf {
    fn mask(self) -> u8 {
        match self {
            Conf::PowerOn => bits::PON,
            Conf::Als => bits::AEN,
            Conf::ProximityDetect => bits::PEN,
            Conf::Wait => bits::WEN,
            Conf::AlsInterrupt => bits::AIEN,
            Conf::ProximityInterrupt => bits::PIEN,
            Conf::Gesture => bits::GEN,
        }
    }
}

/// ALS interrupt persistence (consecutive out-of-range cycles before asserting)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum AlsInterruptCycle {
    /// Every ALS cycle
    Every = 0x0,
    /// Any value outside the thresholds
    Any = 0x1,
    /// 2 consecutive values out of range
    Cycles2 = 0x2,
    /// 3 consecutive values out of range
    Cycles3 = 0x3,
    /// 5 consecutive values out of range
    Cycles5 = 0x4,
    /// 10 consecutive values out of range
    Cycles10 = 0x5,
    /// 15 consecutive values out of range
    Cycles15 = 0x6,
    /// 20 consecutive values out of range
    Cycles20 = 0x7,
    /// 25 consecutive values out of range
    Cycles25 = 0x8,
    /// 30 consecutive values out of range
    Cycles30 = 0x9,
    /// 35 consecutive values out of range
    Cycles35 = 0xA,
    /// 40 consecutive values out of range
    Cycles40 = 0xB,
    /// 45 consecutive values out of range
    Cycles45 = 0xC,
    /// 50 consecutive values out of range
    Cycles50 = 0xD,
    /// 55 consecutive values out of range
    Cycles55 = 0xE,
    /// 60 consecutive values out of range
    Cycles60 = 0xF,
}

impl AlsInterruptCycle {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0x0 => Self::Every,
            0x1 => Self::Any,
            0x2 => Self::Cycles2,
            0x3 => Self::Cycles3,
            0x4 => Self::Cycles5,
            0x5 => Self::Cycles10,
            0x6 => Self::Cycles15,
            0x7 => Self::Cycles20,
            0x8 => Self::Cycles25,
            0x9 => Self::Cycles30,
            0xA => Self::Cycles35,
            0xB => Self::Cycles40,
            0xC => Self::Cycles45,
            0xD => Self::Cycles50,
            0xE => Self::Cycles55,
            _ => Self::Cycles60,
        }
    }
}

/// Proximity interrupt persistence (consecutive out-of-range cycles before asserting)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ProximityInterruptCycle {
    /// Every proximity cycle
    Every = 0x0,
    /// Any value outside the thresholds
    Any = 0x1,
    /// 2 consecutive values out of range
    Cycles2 = 0x2,
    /// 3 consecutive values out of range
    Cycles3 = 0x3,
    /// 4 consecutive values out of range
    Cycles4 = 0x4,
    /// 5 consecutive values out of range
    Cycles5 = 0x5,
    /// 6 consecutive values out of range
    Cycles6 = 0x6,
    /// 7 consecutive values out of range
    Cycles7 = 0x7,
    /// 8 consecutive values out of range
    Cycles8 = 0x8,
    /// 9 consecutive values out of range
    Cycles9 = 0x9,
    /// 10 consecutive values out of range
    Cycles10 = 0xA,
    /// 11 consecutive values out of range
    Cycles11 = 0xB,
    /// 12 consecutive values out of range
    Cycles12 = 0xC,
    /// 13 consecutive values out of range
    Cycles13 = 0xD,
    /// 14 consecutive values out of range
    Cycles14 = 0xE,
    /// 15 consecutive values out of range
    Cycles15 = 0xF,
}

impl ProximityInterruptCycle {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0x0 => Self::Every,
            0x1 => Self::Any,
            0x2 => Self::Cycles2,
            0x3 => Self::Cycles3,
            0x4 => Self::Cycles4,
            0x5 => Self::Cycles5,
            0x6 => Self::Cycles6,
            0x7 => Self::Cycles7,
            0x8 => Self::Cycles8,
            0x9 => Self::Cycles9,
            0xA => Self::Cycles10,
            0xB => Self::Cycles11,
            0xC => Self::Cycles12,
            0xD => Self::Cycles13,
            0xE => Self::Cycles14,
            _ => Self::Cycles15,
        }
    }
}

/// LED pulse length, shared by the proximity and gesture engines
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum PulseLength {
    /// 4us pulses
    Us4 = 0b00,
    /// 8us pulses
    Us8 = 0b01,
    /// 16us pulses
    Us16 = 0b10,
    /// 32us pulses
    Us32 = 0b11,
}

impl PulseLength {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Us4,
            0b01 => Self::Us8,
            0b10 => Self::Us16,
            _ => Self::Us32,
        }
    }
}

/// LED drive strength, shared by the proximity and gesture engines
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum LedCurrent {
    /// 100mA
    Ma100 = 0b00,
    /// 50mA
    Ma50 = 0b01,
    /// 25mA
    Ma25 = 0b10,
    /// 12.5mA
    Ma12_5 = 0b11,
}

impl LedCurrent {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Ma100,
            0b01 => Self::Ma50,
            0b10 => Self::Ma25,
            _ => Self::Ma12_5,
        }
    }
}

/// Proximity engine gain
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ProximityGain {
    /// 1x gain
    Gain1x = 0b00,
    /// 2x gain
    Gain2x = 0b01,
    /// 4x gain
    Gain4x = 0b10,
    /// 8x gain
    Gain8x = 0b11,
}

impl ProximityGain {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Gain1x,
            0b01 => Self::Gain2x,
            0b10 => Self::Gain4x,
            _ => Self::Gain8x,
        }
    }
}

/// ALS and color engine gain
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum AlsColorGain {
    /// 1x gain
    Gain1x = 0b00,
    /// 4x gain
    Gain4x = 0b01,
    /// 16x gain
    Gain16x = 0b10,
    /// 64x gain
    Gain64x = 0b11,
}

impl AlsColorGain {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Gain1x,
            0b01 => Self::Gain4x,
            0b10 => Self::Gain16x,
            _ => Self::Gain64x,
        }
    }
}

/// Gesture engine gain
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum GestureGain {
    /// 1x gain
    Gain1x = 0b00,
    /// 2x gain
    Gain2x = 0b01,
    /// 4x gain
    Gain4x = 0b10,
    /// 8x gain
    Gain8x = 0b11,
}

impl GestureGain {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Gain1x,
            0b01 => Self::Gain2x,
            0b10 => Self::Gain4x,
            _ => Self::Gain8x,
        }
    }
}

/// Saturation interrupt sources in CONFIG2
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum SaturationInterrupt {
    /// Proximity / gesture analog saturation
    Proximity,
    /// Clear photodiode saturation
    ClearPhotodiode,
}

impl SaturationInterrupt {
    fn mask(self) -> u8 {
        match self {
            SaturationInterrupt::Proximity => bits::PSIEN,
            SaturationInterrupt::ClearPhotodiode => bits::CPSIEN,
        }
    }
}

/// Additional LED current boost applied on top of [`LedCurrent`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum LedBoost {
    /// 100%
    Percent100 = 0b00,
    /// 150%
    Percent150 = 0b01,
    /// 200%
    Percent200 = 0b10,
    /// 300%
    Percent300 = 0b11,
}

impl LedBoost {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Percent100,
            0b01 => Self::Percent150,
            0b10 => Self::Percent200,
            _ => Self::Percent300,
        }
    }
}

/// Photodiodes that can be excluded from the proximity result
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ProximityMask {
    /// Up photodiode
    Up,
    /// Down photodiode
    Down,
    /// Left photodiode
    Left,
    /// Right photodiode
    Right,
}

impl ProximityMask {
    fn mask(self) -> u8 {
        match self {
            ProximityMask::Up => bits::PMASK_U,
            ProximityMask::Down => bits::PMASK_D,
            ProximityMask::Left => bits::PMASK_L,
            ProximityMask::Right => bits::PMASK_R,
        }
    }
}

/// Number of FIFO datasets that raise the gesture interrupt
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum GestureFifoThreshold {
    /// Interrupt after 1 dataset
    Dataset1 = 0b00,
    /// Interrupt after 4 datasets
    Dataset4 = 0b01,
    /// Interrupt after 8 datasets
    Dataset8 = 0b10,
    /// Interrupt after 16 datasets
    Dataset16 = 0b11,
}

impl GestureFifoThreshold {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Dataset1,
            0b01 => Self::Dataset4,
            0b10 => Self::Dataset8,
            _ => Self::Dataset16,
        }
    }
}

/// Consecutive below-exit-threshold results that end a gesture
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum GestureExitPersistence {
    /// 1st result
    First = 0b00,
    /// 2nd result
    Second = 0b01,
    /// 4th result
    Fourth = 0b10,
    /// 7th result
    Seventh = 0b11,
}

impl GestureExitPersistence {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::First,
            0b01 => Self::Second,
            0b10 => Self::Fourth,
            _ => Self::Seventh,
        }
    }
}

/// Wait time between gesture engine cycles
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum GestureWaitTime {
    /// 0ms
    Ms0 = 0,
    /// 2.8ms
    Ms2_8 = 1,
    /// 5.6ms
    Ms5_6 = 2,
    /// 8.4ms
    Ms8_4 = 3,
    /// 14ms
    Ms14 = 4,
    /// 22.4ms
    Ms22_4 = 5,
    /// 30.8ms
    Ms30_8 = 6,
    /// 39.2ms
    Ms39_2 = 7,
}

impl GestureWaitTime {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Ms0,
            1 => Self::Ms2_8,
            2 => Self::Ms5_6,
            3 => Self::Ms8_4,
            4 => Self::Ms14,
            5 => Self::Ms22_4,
            6 => Self::Ms30_8,
            _ => Self::Ms39_2,
        }
    }
}

/// Photodiode pairs that feed the gesture FIFO
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum GestureDimension {
    /// Both pairs
    All = 0b00,
    /// Up / down only
    UpDown = 0b01,
    /// Left / right only
    LeftRight = 0b10,
}

impl GestureDimension {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b01 => Self::UpDown,
            0b10 => Self::LeftRight,
            // 0b11 also selects both pairs
            _ => Self::All,
        }
    }
}

/// Interrupt sources reported through [`Apds9960::irq_handler`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Interrupt {
    /// Clear photodiode saturated
    ClearPhotodiodeSaturation,
    /// Proximity or gesture analog saturation
    ProximityGestureSaturation,
    /// Proximity interrupt asserted
    Proximity,
    /// ALS interrupt asserted
    Als,
    /// Gesture interrupt asserted
    Gesture,
    /// New proximity data available
    ProximityValid,
    /// New RGBC data available
    AlsValid,
    /// Gesture FIFO overflowed and data was lost
    GestureFifoOverflow,
    /// Gesture FIFO holds at least the threshold amount of data
    GestureFifoValid,
}

/// Snapshot of the STATUS register
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Status {
    /// Clear photodiode saturation
    pub clear_photodiode_saturation: bool,
    /// Proximity / gesture analog saturation
    pub proximity_gesture_saturation: bool,
    /// Proximity interrupt pending
    pub proximity_interrupt: bool,
    /// ALS interrupt pending
    pub als_interrupt: bool,
    /// Gesture interrupt pending
    pub gesture_interrupt: bool,
    /// Proximity data valid
    pub proximity_valid: bool,
    /// RGBC data valid
    pub als_valid: bool,
}

impl From<u8> for Status {
    fn from(status: u8) -> Self {
        Self {
            clear_photodiode_saturation: status & bits::CPSAT != 0,
            proximity_gesture_saturation: status & bits::PGSAT != 0,
            proximity_interrupt: status & bits::PINT != 0,
            als_interrupt: status & bits::AINT != 0,
            gesture_interrupt: status & bits::GINT != 0,
            proximity_valid: status & bits::PVALID != 0,
            als_valid: status & bits::AVALID != 0,
        }
    }
}

/// Snapshot of the GSTATUS register
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct GestureStatus {
    /// FIFO overflowed
    pub fifo_overflow: bool,
    /// FIFO level reached the configured threshold
    pub fifo_valid: bool,
}

/// RGBC measurement data
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Rgbc {
    /// Clear channel value
    pub clear: u16,
    /// Red channel value
    pub red: u16,
    /// Green channel value
    pub green: u16,
    /// Blue channel value
    pub blue: u16,
}

/// One gesture FIFO dataset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct GestureData {
    /// Up photodiode
    pub up: u8,
    /// Down photodiode
    pub down: u8,
    /// Left photodiode
    pub left: u8,
    /// Right photodiode
    pub right: u8,
}

/// Static chip information
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct ChipInfo {
    /// Chip name
    pub chip_name: &'static str,
    /// Manufacturer name
    pub manufacturer_name: &'static str,
    /// Bus interface
    pub interface: &'static str,
    /// Minimum supply voltage in volts
    pub supply_voltage_min_v: f32,
    /// Maximum supply voltage in volts
    pub supply_voltage_max_v: f32,
    /// Maximum supply current in milliamps
    pub max_current_ma: f32,
    /// Minimum operating temperature in degrees Celsius
    pub temperature_min: f32,
    /// Maximum operating temperature in degrees Celsius
    pub temperature_max: f32,
    /// Driver version
    pub driver_version: &'static str,
}

/// All possible errors in this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// Bus communication error
    Bus(E),
    /// Invalid chip ID detected
    InvalidChipId {
        /// Expected chip ID
        expected: u8,
        /// Found chip ID
        found: u8,
    },
    /// The handle has not been initialized, or has been deinitialized
    NotInitialized,
    /// Parameter outside the range the register can hold
    OutOfRange(&'static str),
}

fn encode_offset(offset: i8) -> Option<u8> {
    // Sign-magnitude: bit 7 is the sign, bits 6:0 the magnitude
    match offset {
        i8::MIN => None,
        o if o < 0 => Some(0x80 | o.unsigned_abs()),
        o => Some(o as u8),
    }
}

fn decode_offset(raw: u8) -> i8 {
    let magnitude = (raw & 0x7F) as i8;
    if raw & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

fn time_to_register<E>(ms: f32) -> Result<u8, Error<E>> {
    if !(CYCLE_MS..=MAX_TIME_MS).contains(&ms) {
        return Err(Error::OutOfRange("time must be within 2.78..=711.68 ms"));
    }
    Ok((256.0 - ms / CYCLE_MS) as u8)
}

fn register_to_time(reg: u8) -> f32 {
    (256.0 - reg as f32) * CYCLE_MS
}

/// High-level APDS-9960 driver
pub struct Apds9960<B, D> {
    bus: B,
    delay: D,
    inited: bool,
}

impl<B, D> Apds9960<B, D>
where
    B: BusInterface,
    D: DelayNs,
{
    /// Link a driver instance to a bus and a delay provider
    pub fn new(bus: B, delay: D) -> Self {
        Self {
            bus,
            delay,
            inited: false,
        }
    }

    /// Static chip information
    pub const fn info() -> ChipInfo {
        ChipInfo {
            chip_name: "Broadcom APDS9960",
            manufacturer_name: "Broadcom",
            interface: "IIC",
            supply_voltage_min_v: 2.4,
            supply_voltage_max_v: 3.6,
            max_current_ma: 100.0,
            temperature_min: -40.0,
            temperature_max: 85.0,
            driver_version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Acquire the bus and verify the chip ID
    pub fn init(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.init().map_err(Error::Bus)?;

        let mut id = [0u8; 1];
        self.bus
            .read_register(reg::ID, &mut id)
            .map_err(Error::Bus)?;
        if id[0] != CHIP_ID {
            return Err(Error::InvalidChipId {
                expected: CHIP_ID,
                found: id[0],
            });
        }

        self.inited = true;
        Ok(())
    }

    /// Power the device down and release the bus
    ///
    /// The bus is released even when the power-down write fails; the first
    /// error encountered is returned.
    pub fn deinit(&mut self) -> Result<(), Error<B::Error>> {
        self.ensure_inited()?;
        let power_down = self.update_bits(reg::ENABLE, bits::PON, 0);
        self.inited = false;
        let release = self.bus.deinit().map_err(Error::Bus);
        power_down.and(release)
    }

    /// True between a successful [`init`](Self::init) and [`deinit`](Self::deinit)
    pub fn is_initialized(&self) -> bool {
        self.inited
    }

    /// Block for `ms` milliseconds using the linked delay provider
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Read the chip ID register
    pub fn get_chip_id(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(reg::ID)
    }

    /// Enable or disable one function in the ENABLE register
    pub fn set_conf(&mut self, conf: Conf, enable: bool) -> Result<(), Error<B::Error>> {
        let mask = conf.mask();
        self.update_bits(reg::ENABLE, mask, if enable { mask } else { 0 })
    }

    /// Check whether a function is enabled
    pub fn get_conf(&mut self, conf: Conf) -> Result<bool, Error<B::Error>> {
        Ok(self.read_register(reg::ENABLE)? & conf.mask() != 0)
    }

    /// Set the raw ADC integration time register (ATIME)
    pub fn set_adc_integration_time(&mut self, atime: u8) -> Result<(), Error<B::Error>> {
        self.write_register(reg::ATIME, atime)
    }

    /// Get the raw ADC integration time register (ATIME)
    pub fn get_adc_integration_time(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(reg::ATIME)
    }

    /// Convert an integration time in milliseconds to an ATIME code
    pub fn adc_integration_time_convert_to_register(
        &self,
        ms: f32,
    ) -> Result<u8, Error<B::Error>> {
        time_to_register(ms)
    }

    /// Convert an ATIME code to an integration time in milliseconds
    pub fn adc_integration_time_convert_to_data(&self, atime: u8) -> f32 {
        register_to_time(atime)
    }

    /// Multiply the wait time by 12 (WLONG)
    pub fn set_wait_long(&mut self, enable: bool) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::CONFIG1, bits::WLONG, if enable { bits::WLONG } else { 0 })
    }

    /// Check whether WLONG is set
    pub fn get_wait_long(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.read_register(reg::CONFIG1)? & bits::WLONG != 0)
    }

    /// Set the raw wait time register (WTIME)
    pub fn set_wait_time(&mut self, wtime: u8) -> Result<(), Error<B::Error>> {
        self.write_register(reg::WTIME, wtime)
    }

    /// Get the raw wait time register (WTIME)
    pub fn get_wait_time(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(reg::WTIME)
    }

    /// Convert a wait time in milliseconds to a WTIME code (WLONG cleared)
    pub fn wait_time_convert_to_register(&self, ms: f32) -> Result<u8, Error<B::Error>> {
        time_to_register(ms)
    }

    /// Convert a WTIME code to a wait time in milliseconds (WLONG cleared)
    pub fn wait_time_convert_to_data(&self, wtime: u8) -> f32 {
        register_to_time(wtime)
    }

    /// Set the ALS interrupt low threshold (compared against the clear channel)
    pub fn set_als_interrupt_low_threshold(
        &mut self,
        threshold: u16,
    ) -> Result<(), Error<B::Error>> {
        self.write_registers(reg::AILTL, &threshold.to_le_bytes())
    }

    /// Get the ALS interrupt low threshold
    pub fn get_als_interrupt_low_threshold(&mut self) -> Result<u16, Error<B::Error>> {
        let mut buf = [0u8; 2];
        self.read_registers(reg::AILTL, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Set the ALS interrupt high threshold (compared against the clear channel)
    pub fn set_als_interrupt_high_threshold(
        &mut self,
        threshold: u16,
    ) -> Result<(), Error<B::Error>> {
        self.write_registers(reg::AIHTL, &threshold.to_le_bytes())
    }

    /// Get the ALS interrupt high threshold
    pub fn get_als_interrupt_high_threshold(&mut self) -> Result<u16, Error<B::Error>> {
        let mut buf = [0u8; 2];
        self.read_registers(reg::AIHTL, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Set the proximity interrupt low threshold
    pub fn set_proximity_interrupt_low_threshold(
        &mut self,
        threshold: u8,
    ) -> Result<(), Error<B::Error>> {
        self.write_register(reg::PILT, threshold)
    }

    /// Get the proximity interrupt low threshold
    pub fn get_proximity_interrupt_low_threshold(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(reg::PILT)
    }

    /// Set the proximity interrupt high threshold
    pub fn set_proximity_interrupt_high_threshold(
        &mut self,
        threshold: u8,
    ) -> Result<(), Error<B::Error>> {
        self.write_register(reg::PIHT, threshold)
    }

    /// Get the proximity interrupt high threshold
    pub fn get_proximity_interrupt_high_threshold(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(reg::PIHT)
    }

    /// Set the proximity interrupt persistence filter
    pub fn set_proximity_interrupt_cycle(
        &mut self,
        cycle: ProximityInterruptCycle,
    ) -> Result<(), Error<B::Error>> {
        self.update_bits(
            reg::PERS,
            bits::PPERS_MASK,
            (cycle as u8) << bits::PPERS_SHIFT,
        )
    }

    /// Get the proximity interrupt persistence filter
    pub fn get_proximity_interrupt_cycle(
        &mut self,
    ) -> Result<ProximityInterruptCycle, Error<B::Error>> {
        let pers = self.read_register(reg::PERS)?;
        Ok(ProximityInterruptCycle::from_bits(pers >> bits::PPERS_SHIFT))
    }

    /// Set the ALS interrupt persistence filter
    pub fn set_als_interrupt_cycle(
        &mut self,
        cycle: AlsInterruptCycle,
    ) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::PERS, bits::APERS_MASK, cycle as u8)
    }

    /// Get the ALS interrupt persistence filter
    pub fn get_als_interrupt_cycle(&mut self) -> Result<AlsInterruptCycle, Error<B::Error>> {
        Ok(AlsInterruptCycle::from_bits(self.read_register(reg::PERS)?))
    }

    /// Set the proximity LED pulse length
    pub fn set_proximity_pulse_length(&mut self, len: PulseLength) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::PPULSE, bits::PLEN_MASK, (len as u8) << bits::PLEN_SHIFT)
    }

    /// Get the proximity LED pulse length
    pub fn get_proximity_pulse_length(&mut self) -> Result<PulseLength, Error<B::Error>> {
        let ppulse = self.read_register(reg::PPULSE)?;
        Ok(PulseLength::from_bits(ppulse >> bits::PLEN_SHIFT))
    }

    /// Set the number of proximity LED pulses per cycle (1..=64)
    pub fn set_proximity_pulse_count(&mut self, count: u8) -> Result<(), Error<B::Error>> {
        if !(1..=64).contains(&count) {
            return Err(Error::OutOfRange("pulse count must be within 1..=64"));
        }
        self.update_bits(reg::PPULSE, bits::PULSE_MASK, count - 1)
    }

    /// Get the number of proximity LED pulses per cycle
    pub fn get_proximity_pulse_count(&mut self) -> Result<u8, Error<B::Error>> {
        Ok((self.read_register(reg::PPULSE)? & bits::PULSE_MASK) + 1)
    }

    /// Set the LED drive strength for proximity and ALS
    pub fn set_led_current(&mut self, current: LedCurrent) -> Result<(), Error<B::Error>> {
        self.update_bits(
            reg::CONTROL,
            bits::LDRIVE_MASK,
            (current as u8) << bits::LDRIVE_SHIFT,
        )
    }

    /// Get the LED drive strength for proximity and ALS
    pub fn get_led_current(&mut self) -> Result<LedCurrent, Error<B::Error>> {
        let control = self.read_register(reg::CONTROL)?;
        Ok(LedCurrent::from_bits(control >> bits::LDRIVE_SHIFT))
    }

    /// Set the proximity gain
    pub fn set_proximity_gain(&mut self, gain: ProximityGain) -> Result<(), Error<B::Error>> {
        self.update_bits(
            reg::CONTROL,
            bits::PGAIN_MASK,
            (gain as u8) << bits::PGAIN_SHIFT,
        )
    }

    /// Get the proximity gain
    pub fn get_proximity_gain(&mut self) -> Result<ProximityGain, Error<B::Error>> {
        let control = self.read_register(reg::CONTROL)?;
        Ok(ProximityGain::from_bits(control >> bits::PGAIN_SHIFT))
    }

    /// Set the ALS and color gain
    pub fn set_als_color_gain(&mut self, gain: AlsColorGain) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::CONTROL, bits::AGAIN_MASK, gain as u8)
    }

    /// Get the ALS and color gain
    pub fn get_als_color_gain(&mut self) -> Result<AlsColorGain, Error<B::Error>> {
        Ok(AlsColorGain::from_bits(self.read_register(reg::CONTROL)?))
    }

    /// Enable or disable a saturation interrupt
    pub fn set_saturation_interrupt(
        &mut self,
        source: SaturationInterrupt,
        enable: bool,
    ) -> Result<(), Error<B::Error>> {
        let mask = source.mask();
        self.update_bits(reg::CONFIG2, mask, if enable { mask } else { 0 })
    }

    /// Check whether a saturation interrupt is enabled
    pub fn get_saturation_interrupt(
        &mut self,
        source: SaturationInterrupt,
    ) -> Result<bool, Error<B::Error>> {
        Ok(self.read_register(reg::CONFIG2)? & source.mask() != 0)
    }

    /// Set the LED boost
    pub fn set_led_boost(&mut self, boost: LedBoost) -> Result<(), Error<B::Error>> {
        self.update_bits(
            reg::CONFIG2,
            bits::LED_BOOST_MASK,
            (boost as u8) << bits::LED_BOOST_SHIFT,
        )
    }

    /// Get the LED boost
    pub fn get_led_boost(&mut self) -> Result<LedBoost, Error<B::Error>> {
        let config2 = self.read_register(reg::CONFIG2)?;
        Ok(LedBoost::from_bits(config2 >> bits::LED_BOOST_SHIFT))
    }

    /// Set the proximity offset applied to the up and right photodiodes (-127..=127)
    pub fn set_proximity_up_right_offset(&mut self, offset: i8) -> Result<(), Error<B::Error>> {
        self.write_offset(reg::POFFSET_UR, offset)
    }

    /// Get the proximity up/right offset
    pub fn get_proximity_up_right_offset(&mut self) -> Result<i8, Error<B::Error>> {
        Ok(decode_offset(self.read_register(reg::POFFSET_UR)?))
    }

    /// Set the proximity offset applied to the down and left photodiodes (-127..=127)
    pub fn set_proximity_down_left_offset(&mut self, offset: i8) -> Result<(), Error<B::Error>> {
        self.write_offset(reg::POFFSET_DL, offset)
    }

    /// Get the proximity down/left offset
    pub fn get_proximity_down_left_offset(&mut self) -> Result<i8, Error<B::Error>> {
        Ok(decode_offset(self.read_register(reg::POFFSET_DL)?))
    }

    /// Enable or disable proximity gain compensation for masked photodiodes
    pub fn set_proximity_gain_compensation(&mut self, enable: bool) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::CONFIG3, bits::PCMP, if enable { bits::PCMP } else { 0 })
    }

    /// Check whether proximity gain compensation is enabled
    pub fn get_proximity_gain_compensation(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.read_register(reg::CONFIG3)? & bits::PCMP != 0)
    }

    /// Enter low power sleep after an interrupt is asserted
    pub fn set_sleep_after_interrupt(&mut self, enable: bool) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::CONFIG3, bits::SAI, if enable { bits::SAI } else { 0 })
    }

    /// Check whether sleep after interrupt is enabled
    pub fn get_sleep_after_interrupt(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.read_register(reg::CONFIG3)? & bits::SAI != 0)
    }

    /// Exclude (`true`) or include (`false`) a photodiode in the proximity result
    pub fn set_proximity_mask(
        &mut self,
        mask: ProximityMask,
        enable: bool,
    ) -> Result<(), Error<B::Error>> {
        let bit = mask.mask();
        self.update_bits(reg::CONFIG3, bit, if enable { bit } else { 0 })
    }

    /// Check whether a photodiode is masked
    pub fn get_proximity_mask(&mut self, mask: ProximityMask) -> Result<bool, Error<B::Error>> {
        Ok(self.read_register(reg::CONFIG3)? & mask.mask() != 0)
    }

    /// Set the proximity level that starts the gesture engine
    pub fn set_gesture_proximity_enter_threshold(
        &mut self,
        threshold: u8,
    ) -> Result<(), Error<B::Error>> {
        self.write_register(reg::GPENTH, threshold)
    }

    /// Get the gesture proximity enter threshold
    pub fn get_gesture_proximity_enter_threshold(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(reg::GPENTH)
    }

    /// Set the gesture level below which the gesture engine exits
    pub fn set_gesture_proximity_exit_threshold(
        &mut self,
        threshold: u8,
    ) -> Result<(), Error<B::Error>> {
        self.write_register(reg::GEXTH, threshold)
    }

    /// Get the gesture proximity exit threshold
    pub fn get_gesture_proximity_exit_threshold(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(reg::GEXTH)
    }

    /// Set the gesture FIFO interrupt threshold
    pub fn set_gesture_fifo_threshold(
        &mut self,
        threshold: GestureFifoThreshold,
    ) -> Result<(), Error<B::Error>> {
        self.update_bits(
            reg::GCONF1,
            bits::GFIFOTH_MASK,
            (threshold as u8) << bits::GFIFOTH_SHIFT,
        )
    }

    /// Get the gesture FIFO interrupt threshold
    pub fn get_gesture_fifo_threshold(&mut self) -> Result<GestureFifoThreshold, Error<B::Error>> {
        let gconf1 = self.read_register(reg::GCONF1)?;
        Ok(GestureFifoThreshold::from_bits(gconf1 >> bits::GFIFOTH_SHIFT))
    }

    /// Set the gesture exit persistence
    pub fn set_gesture_exit_persistence(
        &mut self,
        persistence: GestureExitPersistence,
    ) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::GCONF1, bits::GEXPERS_MASK, persistence as u8)
    }

    /// Get the gesture exit persistence
    pub fn get_gesture_exit_persistence(
        &mut self,
    ) -> Result<GestureExitPersistence, Error<B::Error>> {
        Ok(GestureExitPersistence::from_bits(self.read_register(reg::GCONF1)?))
    }

    /// Set the gesture exit mask (bit 3 up, bit 2 down, bit 1 left, bit 0 right)
    pub fn set_gesture_exit_mask(&mut self, mask: u8) -> Result<(), Error<B::Error>> {
        if mask > 0x0F {
            return Err(Error::OutOfRange("gesture exit mask is 4 bits"));
        }
        self.update_bits(reg::GCONF1, bits::GEXMSK_MASK, mask << bits::GEXMSK_SHIFT)
    }

    /// Get the gesture exit mask
    pub fn get_gesture_exit_mask(&mut self) -> Result<u8, Error<B::Error>> {
        Ok((self.read_register(reg::GCONF1)? & bits::GEXMSK_MASK) >> bits::GEXMSK_SHIFT)
    }

    /// Set the gesture gain
    pub fn set_gesture_gain(&mut self, gain: GestureGain) -> Result<(), Error<B::Error>> {
        self.update_bits(
            reg::GCONF2,
            bits::GGAIN_MASK,
            (gain as u8) << bits::GGAIN_SHIFT,
        )
    }

    /// Get the gesture gain
    pub fn get_gesture_gain(&mut self) -> Result<GestureGain, Error<B::Error>> {
        let gconf2 = self.read_register(reg::GCONF2)?;
        Ok(GestureGain::from_bits(gconf2 >> bits::GGAIN_SHIFT))
    }

    /// Set the gesture LED drive strength
    pub fn set_gesture_led_current(&mut self, current: LedCurrent) -> Result<(), Error<B::Error>> {
        self.update_bits(
            reg::GCONF2,
            bits::GLDRIVE_MASK,
            (current as u8) << bits::GLDRIVE_SHIFT,
        )
    }

    /// Get the gesture LED drive strength
    pub fn get_gesture_led_current(&mut self) -> Result<LedCurrent, Error<B::Error>> {
        let gconf2 = self.read_register(reg::GCONF2)?;
        Ok(LedCurrent::from_bits(gconf2 >> bits::GLDRIVE_SHIFT))
    }

    /// Set the gesture wait time
    pub fn set_gesture_wait_time(&mut self, time: GestureWaitTime) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::GCONF2, bits::GWTIME_MASK, time as u8)
    }

    /// Get the gesture wait time
    pub fn get_gesture_wait_time(&mut self) -> Result<GestureWaitTime, Error<B::Error>> {
        Ok(GestureWaitTime::from_bits(self.read_register(reg::GCONF2)?))
    }

    /// Set the gesture up offset (-127..=127)
    pub fn set_gesture_up_offset(&mut self, offset: i8) -> Result<(), Error<B::Error>> {
        self.write_offset(reg::GOFFSET_U, offset)
    }

    /// Get the gesture up offset
    pub fn get_gesture_up_offset(&mut self) -> Result<i8, Error<B::Error>> {
        Ok(decode_offset(self.read_register(reg::GOFFSET_U)?))
    }

    /// Set the gesture down offset (-127..=127)
    pub fn set_gesture_down_offset(&mut self, offset: i8) -> Result<(), Error<B::Error>> {
        self.write_offset(reg::GOFFSET_D, offset)
    }

    /// Get the gesture down offset
    pub fn get_gesture_down_offset(&mut self) -> Result<i8, Error<B::Error>> {
        Ok(decode_offset(self.read_register(reg::GOFFSET_D)?))
    }

    /// Set the gesture left offset (-127..=127)
    pub fn set_gesture_left_offset(&mut self, offset: i8) -> Result<(), Error<B::Error>> {
        self.write_offset(reg::GOFFSET_L, offset)
    }

    /// Get the gesture left offset
    pub fn get_gesture_left_offset(&mut self) -> Result<i8, Error<B::Error>> {
        Ok(decode_offset(self.read_register(reg::GOFFSET_L)?))
    }

    /// Set the gesture right offset (-127..=127)
    pub fn set_gesture_right_offset(&mut self, offset: i8) -> Result<(), Error<B::Error>> {
        self.write_offset(reg::GOFFSET_R, offset)
    }

    /// Get the gesture right offset
    pub fn get_gesture_right_offset(&mut self) -> Result<i8, Error<B::Error>> {
        Ok(decode_offset(self.read_register(reg::GOFFSET_R)?))
    }

    /// Set the gesture LED pulse length
    pub fn set_gesture_pulse_length(&mut self, len: PulseLength) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::GPULSE, bits::PLEN_MASK, (len as u8) << bits::PLEN_SHIFT)
    }

    /// Get the gesture LED pulse length
    pub fn get_gesture_pulse_length(&mut self) -> Result<PulseLength, Error<B::Error>> {
        let gpulse = self.read_register(reg::GPULSE)?;
        Ok(PulseLength::from_bits(gpulse >> bits::PLEN_SHIFT))
    }

    /// Set the number of gesture LED pulses per cycle (1..=64)
    pub fn set_gesture_pulse_count(&mut self, count: u8) -> Result<(), Error<B::Error>> {
        if !(1..=64).contains(&count) {
            return Err(Error::OutOfRange("pulse count must be within 1..=64"));
        }
        self.update_bits(reg::GPULSE, bits::PULSE_MASK, count - 1)
    }

    /// Get the number of gesture LED pulses per cycle
    pub fn get_gesture_pulse_count(&mut self) -> Result<u8, Error<B::Error>> {
        Ok((self.read_register(reg::GPULSE)? & bits::PULSE_MASK) + 1)
    }

    /// Select which photodiode pairs feed the gesture FIFO
    pub fn set_gesture_dimension(
        &mut self,
        dimension: GestureDimension,
    ) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::GCONF3, bits::GDIMS_MASK, dimension as u8)
    }

    /// Get the gesture dimension selection
    pub fn get_gesture_dimension(&mut self) -> Result<GestureDimension, Error<B::Error>> {
        Ok(GestureDimension::from_bits(self.read_register(reg::GCONF3)?))
    }

    /// Clear the gesture FIFO and the gesture status
    pub fn gesture_fifo_clear(&mut self) -> Result<(), Error<B::Error>> {
        // GFIFO_CLR self-clears once the FIFO has been emptied
        self.update_bits(reg::GCONF4, bits::GFIFO_CLR, bits::GFIFO_CLR)
    }

    /// Enable or disable the gesture interrupt
    pub fn set_gesture_interrupt(&mut self, enable: bool) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::GCONF4, bits::GIEN, if enable { bits::GIEN } else { 0 })
    }

    /// Check whether the gesture interrupt is enabled
    pub fn get_gesture_interrupt(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.read_register(reg::GCONF4)? & bits::GIEN != 0)
    }

    /// Force the state machine into (`true`) or out of (`false`) the gesture engine
    pub fn set_gesture_mode(&mut self, enable: bool) -> Result<(), Error<B::Error>> {
        self.update_bits(reg::GCONF4, bits::GMODE, if enable { bits::GMODE } else { 0 })
    }

    /// Check whether the gesture engine is running
    pub fn get_gesture_mode(&mut self) -> Result<bool, Error<B::Error>> {
        Ok(self.read_register(reg::GCONF4)? & bits::GMODE != 0)
    }

    /// Force an interrupt
    pub fn force_interrupt(&mut self) -> Result<(), Error<B::Error>> {
        self.command(reg::IFORCE)
    }

    /// Clear the proximity interrupt
    pub fn proximity_interrupt_clear(&mut self) -> Result<(), Error<B::Error>> {
        self.command(reg::PICLEAR)
    }

    /// Clear the ALS interrupt
    pub fn als_interrupt_clear(&mut self) -> Result<(), Error<B::Error>> {
        self.command(reg::CICLEAR)
    }

    /// Clear every interrupt except the gesture interrupt
    pub fn all_non_gesture_interrupt_clear(&mut self) -> Result<(), Error<B::Error>> {
        self.command(reg::AICLEAR)
    }

    /// Read the STATUS register
    pub fn get_status(&mut self) -> Result<Status, Error<B::Error>> {
        Ok(Status::from(self.read_register(reg::STATUS)?))
    }

    /// Read the GSTATUS register
    pub fn get_gesture_status(&mut self) -> Result<GestureStatus, Error<B::Error>> {
        let gstatus = self.read_register(reg::GSTATUS)?;
        Ok(GestureStatus {
            fifo_overflow: gstatus & bits::GFOV != 0,
            fifo_valid: gstatus & bits::GVALID != 0,
        })
    }

    /// Number of datasets waiting in the gesture FIFO
    pub fn get_gesture_fifo_level(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(reg::GFLVL)
    }

    /// Read raw RGBC data using one block read for data coherency
    pub fn read_rgbc(&mut self) -> Result<Rgbc, Error<B::Error>> {
        // CDATAL..BDATAH: clear, red, green, blue, little endian
        let mut data_buffer = [0u8; 8];
        self.read_registers(reg::CDATAL, &mut data_buffer)?;

        Ok(Rgbc {
            clear: u16::from_le_bytes([data_buffer[0], data_buffer[1]]),
            red: u16::from_le_bytes([data_buffer[2], data_buffer[3]]),
            green: u16::from_le_bytes([data_buffer[4], data_buffer[5]]),
            blue: u16::from_le_bytes([data_buffer[6], data_buffer[7]]),
        })
    }

    /// Read the proximity result
    pub fn read_proximity(&mut self) -> Result<u8, Error<B::Error>> {
        self.read_register(reg::PDATA)
    }

    /// Drain up to `buffer.len()` datasets from the gesture FIFO
    ///
    /// Returns the number of datasets written into `buffer`.
    pub fn read_gesture_fifo(
        &mut self,
        buffer: &mut [GestureData],
    ) -> Result<usize, Error<B::Error>> {
        let level = self.get_gesture_fifo_level()? as usize;
        let count = level.min(buffer.len());

        for dataset in buffer.iter_mut().take(count) {
            let mut raw = [0u8; 4];
            self.read_registers(reg::GFIFO_U, &mut raw)?;
            *dataset = GestureData {
                up: raw[0],
                down: raw[1],
                left: raw[2],
                right: raw[3],
            };
        }

        Ok(count)
    }

    /// Dispatch pending interrupt sources to `callback`, then clear them
    ///
    /// Call this from the interrupt pin handler. The callback runs once per
    /// asserted source, in STATUS bit order followed by the gesture sources.
    pub fn irq_handler<F>(&mut self, callback: &mut F) -> Result<(), Error<B::Error>>
    where
        F: FnMut(Interrupt),
    {
        let status = self.read_register(reg::STATUS)?;
        let sources = [
            (bits::CPSAT, Interrupt::ClearPhotodiodeSaturation),
            (bits::PGSAT, Interrupt::ProximityGestureSaturation),
            (bits::PINT, Interrupt::Proximity),
            (bits::AINT, Interrupt::Als),
            (bits::GINT, Interrupt::Gesture),
            (bits::PVALID, Interrupt::ProximityValid),
            (bits::AVALID, Interrupt::AlsValid),
        ];
        for (mask, source) in sources {
            if status & mask != 0 {
                callback(source);
            }
        }

        let gesture = self.get_gesture_status()?;
        if gesture.fifo_overflow {
            callback(Interrupt::GestureFifoOverflow);
        }
        if gesture.fifo_valid {
            callback(Interrupt::GestureFifoValid);
        }

        if status & (bits::CPSAT | bits::PGSAT | bits::PINT | bits::AINT) != 0 {
            self.all_non_gesture_interrupt_clear()?;
        }
        Ok(())
    }

    /// Write raw bytes starting at `address`
    ///
    /// Over [`ll::I2cInterface`], payloads wider than [`ll::MAX_WRITE_LEN`]
    /// are sent as consecutive transactions.
    pub fn set_reg(&mut self, address: u8, data: &[u8]) -> Result<(), Error<B::Error>> {
        self.write_registers(address, data)
    }

    /// Read raw bytes starting at `address`
    pub fn get_reg(&mut self, address: u8, data: &mut [u8]) -> Result<(), Error<B::Error>> {
        self.read_registers(address, data)
    }

    /// Destroy the driver and return the bus interface
    pub fn destroy(self) -> B {
        self.bus
    }

    // Helper methods for register access
    fn ensure_inited(&self) -> Result<(), Error<B::Error>> {
        if self.inited {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn read_registers(&mut self, address: u8, data: &mut [u8]) -> Result<(), Error<B::Error>> {
        self.ensure_inited()?;
        self.bus.read_register(address, data).map_err(Error::Bus)
    }

    fn write_registers(&mut self, address: u8, data: &[u8]) -> Result<(), Error<B::Error>> {
        self.ensure_inited()?;
        self.bus.write_register(address, data).map_err(Error::Bus)
    }

    fn read_register(&mut self, address: u8) -> Result<u8, Error<B::Error>> {
        let mut buffer = [0u8; 1];
        self.read_registers(address, &mut buffer)?;
        Ok(buffer[0])
    }

    fn write_register(&mut self, address: u8, value: u8) -> Result<(), Error<B::Error>> {
        self.write_registers(address, &[value])
    }

    fn write_offset(&mut self, address: u8, offset: i8) -> Result<(), Error<B::Error>> {
        let raw = encode_offset(offset)
            .ok_or(Error::OutOfRange("offset must be within -127..=127"))?;
        self.write_register(address, raw)
    }

    fn command(&mut self, address: u8) -> Result<(), Error<B::Error>> {
        self.write_registers(address, &[])
    }

    fn update_bits(&mut self, address: u8, mask: u8, value: u8) -> Result<(), Error<B::Error>> {
        let current = self.read_register(address)?;
        self.write_register(address, (current & !mask) | (value & mask))
    }
}
