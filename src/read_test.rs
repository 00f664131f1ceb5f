//! Bring-up and read test
//!
//! Brings the sensor up with a fixed, ordered configuration and then samples
//! RGBC and proximity for a requested number of iterations. Every failure is
//! fatal to the run: the remaining steps are skipped, one diagnostic names the
//! failing step, and the device is deinitialized if it had been initialized.
//!
//! ```rust,no_run
//! use apds9960::{read_test::{self, ReadTestConfig}, ll::I2cInterface, Apds9960};
//!
//! # fn main() {
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! # let delay = embedded_hal_mock::eh1::delay::NoopDelay::new();
//! let mut sensor = Apds9960::new(I2cInterface::new(i2c), delay);
//! let status = match read_test::run(&mut sensor, &ReadTestConfig::default(), 3) {
//!     Ok(()) => 0,
//!     Err(e) => e.status(),
//! };
//! # let _ = status;
//! # }
//! ```

use embedded_hal::delay::DelayNs;

use crate::ll::BusInterface;
use crate::{
    AlsColorGain, AlsInterruptCycle, Apds9960, Conf, Error, GestureDimension,
    GestureExitPersistence, GestureFifoThreshold, GestureGain, GestureWaitTime, LedBoost,
    LedCurrent, ProximityGain, ProximityInterruptCycle, ProximityMask, PulseLength,
    SaturationInterrupt,
};

/// Values written by the configuration sequence, plus loop timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadTestConfig {
    /// RGBC integration time in milliseconds
    pub adc_integration_time_ms: f32,
    /// Wait time between engine cycles in milliseconds
    pub wait_time_ms: f32,
    /// Proximity interrupt persistence
    pub proximity_interrupt_cycle: ProximityInterruptCycle,
    /// ALS interrupt persistence
    pub als_interrupt_cycle: AlsInterruptCycle,
    /// Proximity LED pulse length
    pub proximity_pulse_length: PulseLength,
    /// Proximity LED pulses per cycle (1..=64)
    pub proximity_pulse_count: u8,
    /// LED drive for proximity and ALS
    pub led_current: LedCurrent,
    /// Proximity gain
    pub proximity_gain: ProximityGain,
    /// ALS and color gain
    pub als_color_gain: AlsColorGain,
    /// LED boost
    pub led_boost: LedBoost,
    /// Proximity up/right photodiode offset
    pub proximity_up_right_offset: i8,
    /// Proximity down/left photodiode offset
    pub proximity_down_left_offset: i8,
    /// ALS interrupt low threshold
    pub als_interrupt_low_threshold: u16,
    /// ALS interrupt high threshold
    pub als_interrupt_high_threshold: u16,
    /// Proximity interrupt low threshold
    pub proximity_interrupt_low_threshold: u8,
    /// Proximity interrupt high threshold
    pub proximity_interrupt_high_threshold: u8,
    /// Gesture proximity enter threshold
    pub gesture_proximity_enter_threshold: u8,
    /// Gesture proximity exit threshold
    pub gesture_proximity_exit_threshold: u8,
    /// Gesture FIFO interrupt threshold
    pub gesture_fifo_threshold: GestureFifoThreshold,
    /// Gesture exit persistence
    pub gesture_exit_persistence: GestureExitPersistence,
    /// Gesture exit mask
    pub gesture_exit_mask: u8,
    /// Gesture gain
    pub gesture_gain: GestureGain,
    /// Gesture LED drive
    pub gesture_led_current: LedCurrent,
    /// Gesture wait time
    pub gesture_wait_time: GestureWaitTime,
    /// Gesture up offset
    pub gesture_up_offset: i8,
    /// Gesture down offset
    pub gesture_down_offset: i8,
    /// Gesture left offset
    pub gesture_left_offset: i8,
    /// Gesture right offset
    pub gesture_right_offset: i8,
    /// Gesture LED pulse length
    pub gesture_pulse_length: PulseLength,
    /// Gesture LED pulses per cycle (1..=64)
    pub gesture_pulse_count: u8,
    /// Gesture photodiode pairs
    pub gesture_dimension: GestureDimension,
    /// Delay after configuration, before the first sample, in milliseconds
    pub settle_ms: u32,
    /// Delay preceding every sample in milliseconds
    pub interval_ms: u32,
}

impl Default for ReadTestConfig {
    fn default() -> Self {
        Self {
            adc_integration_time_ms: 10.0,
            wait_time_ms: 10.0,
            proximity_interrupt_cycle: ProximityInterruptCycle::Cycles2,
            als_interrupt_cycle: AlsInterruptCycle::Cycles2,
            proximity_pulse_length: PulseLength::Us8,
            proximity_pulse_count: 8,
            led_current: LedCurrent::Ma100,
            proximity_gain: ProximityGain::Gain4x,
            als_color_gain: AlsColorGain::Gain4x,
            led_boost: LedBoost::Percent100,
            proximity_up_right_offset: 0,
            proximity_down_left_offset: 0,
            als_interrupt_low_threshold: 0x0000,
            als_interrupt_high_threshold: 0xFFFF,
            proximity_interrupt_low_threshold: 0x00,
            proximity_interrupt_high_threshold: 0xFF,
            gesture_proximity_enter_threshold: 0x40,
            gesture_proximity_exit_threshold: 0x30,
            gesture_fifo_threshold: GestureFifoThreshold::Dataset4,
            gesture_exit_persistence: GestureExitPersistence::First,
            gesture_exit_mask: 0x00,
            gesture_gain: GestureGain::Gain4x,
            gesture_led_current: LedCurrent::Ma100,
            gesture_wait_time: GestureWaitTime::Ms2_8,
            gesture_up_offset: 0,
            gesture_down_offset: 0,
            gesture_left_offset: 0,
            gesture_right_offset: 0,
            gesture_pulse_length: PulseLength::Us32,
            gesture_pulse_count: 9,
            gesture_dimension: GestureDimension::All,
            settle_ms: 1000,
            interval_ms: 1000,
        }
    }
}

/// One configuration step
///
/// Each step issues exactly one register write when applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting {
    /// Enable or disable a function in the ENABLE register
    Conf(Conf, bool),
    /// Integration time in milliseconds
    AdcIntegrationTime(f32),
    /// WLONG
    WaitLong(bool),
    /// Wait time in milliseconds
    WaitTime(f32),
    /// Proximity interrupt persistence
    ProximityInterruptCycle(ProximityInterruptCycle),
    /// ALS interrupt persistence
    AlsInterruptCycle(AlsInterruptCycle),
    /// Proximity pulse length
    ProximityPulseLength(PulseLength),
    /// Proximity pulse count
    ProximityPulseCount(u8),
    /// LED drive
    LedCurrent(LedCurrent),
    /// Proximity gain
    ProximityGain(ProximityGain),
    /// ALS and color gain
    AlsColorGain(AlsColorGain),
    /// Saturation interrupt enable
    SaturationInterrupt(SaturationInterrupt, bool),
    /// LED boost
    LedBoost(LedBoost),
    /// Proximity up/right offset
    ProximityUpRightOffset(i8),
    /// Proximity down/left offset
    ProximityDownLeftOffset(i8),
    /// Proximity gain compensation
    ProximityGainCompensation(bool),
    /// Sleep after interrupt
    SleepAfterInterrupt(bool),
    /// Proximity photodiode mask
    ProximityMask(ProximityMask, bool),
    /// ALS interrupt low threshold
    AlsInterruptLowThreshold(u16),
    /// ALS interrupt high threshold
    AlsInterruptHighThreshold(u16),
    /// Proximity interrupt low threshold
    ProximityInterruptLowThreshold(u8),
    /// Proximity interrupt high threshold
    ProximityInterruptHighThreshold(u8),
    /// Gesture proximity enter threshold
    GestureProximityEnterThreshold(u8),
    /// Gesture proximity exit threshold
    GestureProximityExitThreshold(u8),
    /// Gesture FIFO threshold
    GestureFifoThreshold(GestureFifoThreshold),
    /// Gesture exit persistence
    GestureExitPersistence(GestureExitPersistence),
    /// Gesture exit mask
    GestureExitMask(u8),
    /// Gesture gain
    GestureGain(GestureGain),
    /// Gesture LED drive
    GestureLedCurrent(LedCurrent),
    /// Gesture wait time
    GestureWaitTime(GestureWaitTime),
    /// Gesture up offset
    GestureUpOffset(i8),
    /// Gesture down offset
    GestureDownOffset(i8),
    /// Gesture left offset
    GestureLeftOffset(i8),
    /// Gesture right offset
    GestureRightOffset(i8),
    /// Gesture pulse length
    GesturePulseLength(PulseLength),
    /// Gesture pulse count
    GesturePulseCount(u8),
    /// Gesture dimension select
    GestureDimension(GestureDimension),
    /// Empty the gesture FIFO
    GestureFifoClear,
    /// Gesture interrupt enable
    GestureInterrupt(bool),
    /// Gesture mode
    GestureMode(bool),
    /// Clear all non-gesture interrupts
    AllNonGestureInterruptClear,
}

impl Setting {
    /// Name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Setting::Conf(Conf::PowerOn, _) => "power on",
            Setting::Conf(Conf::Als, _) => "als",
            Setting::Conf(Conf::ProximityDetect, _) => "proximity detect",
            Setting::Conf(Conf::Wait, _) => "wait",
            Setting::Conf(Conf::AlsInterrupt, _) => "als interrupt",
            Setting::Conf(Conf::ProximityInterrupt, _) => "proximity interrupt",
            Setting::Conf(Conf::Gesture, _) => "gesture",
            Setting::AdcIntegrationTime(_) => "adc integration time",
            Setting::WaitLong(_) => "wait long",
            Setting::WaitTime(_) => "wait time",
            Setting::ProximityInterruptCycle(_) => "proximity interrupt cycle",
            Setting::AlsInterruptCycle(_) => "als interrupt cycle",
            Setting::ProximityPulseLength(_) => "proximity pulse length",
            Setting::ProximityPulseCount(_) => "proximity pulse count",
            Setting::LedCurrent(_) => "led current",
            Setting::ProximityGain(_) => "proximity gain",
            Setting::AlsColorGain(_) => "als color gain",
            Setting::SaturationInterrupt(SaturationInterrupt::Proximity, _) => {
                "proximity saturation interrupt"
            }
            Setting::SaturationInterrupt(SaturationInterrupt::ClearPhotodiode, _) => {
                "clear photodiode saturation interrupt"
            }
            Setting::LedBoost(_) => "led boost",
            Setting::ProximityUpRightOffset(_) => "proximity up right offset",
            Setting::ProximityDownLeftOffset(_) => "proximity down left offset",
            Setting::ProximityGainCompensation(_) => "proximity gain compensation",
            Setting::SleepAfterInterrupt(_) => "sleep after interrupt",
            Setting::ProximityMask(ProximityMask::Up, _) => "proximity mask up",
            Setting::ProximityMask(ProximityMask::Down, _) => "proximity mask down",
            Setting::ProximityMask(ProximityMask::Left, _) => "proximity mask left",
            Setting::ProximityMask(ProximityMask::Right, _) => "proximity mask right",
            Setting::AlsInterruptLowThreshold(_) => "als interrupt low threshold",
            Setting::AlsInterruptHighThreshold(_) => "als interrupt high threshold",
            Setting::ProximityInterruptLowThreshold(_) => "proximity interrupt low threshold",
            Setting::ProximityInterruptHighThreshold(_) => "proximity interrupt high threshold",
            Setting::GestureProximityEnterThreshold(_) => "gesture proximity enter threshold",
            Setting::GestureProximityExitThreshold(_) => "gesture proximity exit threshold",
            Setting::GestureFifoThreshold(_) => "gesture fifo threshold",
            Setting::GestureExitPersistence(_) => "gesture exit persistence",
            Setting::GestureExitMask(_) => "gesture exit mask",
            Setting::GestureGain(_) => "gesture gain",
            Setting::GestureLedCurrent(_) => "gesture led current",
            Setting::GestureWaitTime(_) => "gesture wait time",
            Setting::GestureUpOffset(_) => "gesture up offset",
            Setting::GestureDownOffset(_) => "gesture down offset",
            Setting::GestureLeftOffset(_) => "gesture left offset",
            Setting::GestureRightOffset(_) => "gesture right offset",
            Setting::GesturePulseLength(_) => "gesture pulse length",
            Setting::GesturePulseCount(_) => "gesture pulse count",
            Setting::GestureDimension(_) => "gesture dimension",
            Setting::GestureFifoClear => "gesture fifo clear",
            Setting::GestureInterrupt(_) => "gesture interrupt",
            Setting::GestureMode(_) => "gesture mode",
            Setting::AllNonGestureInterruptClear => "all non gesture interrupt clear",
        }
    }

    /// Apply the step to an initialized device
    pub fn apply<B, D>(&self, device: &mut Apds9960<B, D>) -> Result<(), Error<B::Error>>
    where
        B: BusInterface,
        D: DelayNs,
    {
        match *self {
            Setting::Conf(conf, enable) => device.set_conf(conf, enable),
            Setting::AdcIntegrationTime(ms) => {
                let atime = device.adc_integration_time_convert_to_register(ms)?;
                device.set_adc_integration_time(atime)
            }
            Setting::WaitLong(enable) => device.set_wait_long(enable),
            Setting::WaitTime(ms) => {
                let wtime = device.wait_time_convert_to_register(ms)?;
                device.set_wait_time(wtime)
            }
            Setting::ProximityInterruptCycle(cycle) => device.set_proximity_interrupt_cycle(cycle),
            Setting::AlsInterruptCycle(cycle) => device.set_als_interrupt_cycle(cycle),
            Setting::ProximityPulseLength(len) => device.set_proximity_pulse_length(len),
            Setting::ProximityPulseCount(count) => device.set_proximity_pulse_count(count),
            Setting::LedCurrent(current) => device.set_led_current(current),
            Setting::ProximityGain(gain) => device.set_proximity_gain(gain),
            Setting::AlsColorGain(gain) => device.set_als_color_gain(gain),
            Setting::SaturationInterrupt(source, enable) => {
                device.set_saturation_interrupt(source, enable)
            }
            Setting::LedBoost(boost) => device.set_led_boost(boost),
            Setting::ProximityUpRightOffset(offset) => device.set_proximity_up_right_offset(offset),
            Setting::ProximityDownLeftOffset(offset) => {
                device.set_proximity_down_left_offset(offset)
            }
            Setting::ProximityGainCompensation(enable) => {
                device.set_proximity_gain_compensation(enable)
            }
            Setting::SleepAfterInterrupt(enable) => device.set_sleep_after_interrupt(enable),
            Setting::ProximityMask(mask, enable) => device.set_proximity_mask(mask, enable),
            Setting::AlsInterruptLowThreshold(threshold) => {
                device.set_als_interrupt_low_threshold(threshold)
            }
            Setting::AlsInterruptHighThreshold(threshold) => {
                device.set_als_interrupt_high_threshold(threshold)
            }
            Setting::ProximityInterruptLowThreshold(threshold) => {
                device.set_proximity_interrupt_low_threshold(threshold)
            }
            Setting::ProximityInterruptHighThreshold(threshold) => {
                device.set_proximity_interrupt_high_threshold(threshold)
            }
            Setting::GestureProximityEnterThreshold(threshold) => {
                device.set_gesture_proximity_enter_threshold(threshold)
            }
            Setting::GestureProximityExitThreshold(threshold) => {
                device.set_gesture_proximity_exit_threshold(threshold)
            }
            Setting::GestureFifoThreshold(threshold) => {
                device.set_gesture_fifo_threshold(threshold)
            }
            Setting::GestureExitPersistence(persistence) => {
                device.set_gesture_exit_persistence(persistence)
            }
            Setting::GestureExitMask(mask) => device.set_gesture_exit_mask(mask),
            Setting::GestureGain(gain) => device.set_gesture_gain(gain),
            Setting::GestureLedCurrent(current) => device.set_gesture_led_current(current),
            Setting::GestureWaitTime(time) => device.set_gesture_wait_time(time),
            Setting::GestureUpOffset(offset) => device.set_gesture_up_offset(offset),
            Setting::GestureDownOffset(offset) => device.set_gesture_down_offset(offset),
            Setting::GestureLeftOffset(offset) => device.set_gesture_left_offset(offset),
            Setting::GestureRightOffset(offset) => device.set_gesture_right_offset(offset),
            Setting::GesturePulseLength(len) => device.set_gesture_pulse_length(len),
            Setting::GesturePulseCount(count) => device.set_gesture_pulse_count(count),
            Setting::GestureDimension(dimension) => device.set_gesture_dimension(dimension),
            Setting::GestureFifoClear => device.gesture_fifo_clear(),
            Setting::GestureInterrupt(enable) => device.set_gesture_interrupt(enable),
            Setting::GestureMode(enable) => device.set_gesture_mode(enable),
            Setting::AllNonGestureInterruptClear => device.all_non_gesture_interrupt_clear(),
        }
    }
}

/// Number of steps in the configuration sequence
pub const SEQUENCE_LEN: usize = 54;

/// Ordered configuration sequence
///
/// Everything that can raise an interrupt or start an engine is switched off
/// first, then power is asserted, timings, gains and thresholds are written,
/// pending interrupts are cleared, and wait, proximity detect and ALS are
/// enabled last.
pub fn sequence(config: &ReadTestConfig) -> [Setting; SEQUENCE_LEN] {
    [
        Setting::Conf(Conf::Gesture, false),
        Setting::Conf(Conf::ProximityInterrupt, false),
        Setting::Conf(Conf::AlsInterrupt, false),
        Setting::Conf(Conf::Wait, false),
        Setting::Conf(Conf::ProximityDetect, false),
        Setting::Conf(Conf::Als, false),
        Setting::Conf(Conf::PowerOn, true),
        Setting::AdcIntegrationTime(config.adc_integration_time_ms),
        Setting::WaitLong(false),
        Setting::WaitTime(config.wait_time_ms),
        Setting::ProximityInterruptCycle(config.proximity_interrupt_cycle),
        Setting::AlsInterruptCycle(config.als_interrupt_cycle),
        Setting::ProximityPulseLength(config.proximity_pulse_length),
        Setting::ProximityPulseCount(config.proximity_pulse_count),
        Setting::LedCurrent(config.led_current),
        Setting::ProximityGain(config.proximity_gain),
        Setting::AlsColorGain(config.als_color_gain),
        Setting::SaturationInterrupt(SaturationInterrupt::Proximity, false),
        Setting::SaturationInterrupt(SaturationInterrupt::ClearPhotodiode, false),
        Setting::LedBoost(config.led_boost),
        Setting::ProximityUpRightOffset(config.proximity_up_right_offset),
        Setting::ProximityDownLeftOffset(config.proximity_down_left_offset),
        Setting::ProximityGainCompensation(false),
        Setting::SleepAfterInterrupt(false),
        Setting::ProximityMask(ProximityMask::Up, false),
        Setting::ProximityMask(ProximityMask::Down, false),
        Setting::ProximityMask(ProximityMask::Left, false),
        Setting::ProximityMask(ProximityMask::Right, false),
        Setting::AlsInterruptLowThreshold(config.als_interrupt_low_threshold),
        Setting::AlsInterruptHighThreshold(config.als_interrupt_high_threshold),
        Setting::ProximityInterruptLowThreshold(config.proximity_interrupt_low_threshold),
        Setting::ProximityInterruptHighThreshold(config.proximity_interrupt_high_threshold),
        Setting::GestureProximityEnterThreshold(config.gesture_proximity_enter_threshold),
        Setting::GestureProximityExitThreshold(config.gesture_proximity_exit_threshold),
        Setting::GestureFifoThreshold(config.gesture_fifo_threshold),
        Setting::GestureExitPersistence(config.gesture_exit_persistence),
        Setting::GestureExitMask(config.gesture_exit_mask),
        Setting::GestureGain(config.gesture_gain),
        Setting::GestureLedCurrent(config.gesture_led_current),
        Setting::GestureWaitTime(config.gesture_wait_time),
        Setting::GestureUpOffset(config.gesture_up_offset),
        Setting::GestureDownOffset(config.gesture_down_offset),
        Setting::GestureLeftOffset(config.gesture_left_offset),
        Setting::GestureRightOffset(config.gesture_right_offset),
        Setting::GesturePulseLength(config.gesture_pulse_length),
        Setting::GesturePulseCount(config.gesture_pulse_count),
        Setting::GestureDimension(config.gesture_dimension),
        Setting::GestureFifoClear,
        Setting::GestureInterrupt(false),
        Setting::GestureMode(false),
        Setting::AllNonGestureInterruptClear,
        Setting::Conf(Conf::Wait, true),
        Setting::Conf(Conf::ProximityDetect, true),
        Setting::Conf(Conf::Als, true),
    ]
}

/// One RGBC + proximity reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Sample {
    /// Red channel
    pub red: u16,
    /// Green channel
    pub green: u16,
    /// Blue channel
    pub blue: u16,
    /// Clear channel
    pub clear: u16,
    /// Proximity
    pub proximity: u8,
}

/// Reasons a read test run fails
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ReadTestError<E> {
    /// Bus init or chip ID check failed; nothing was torn down
    Init(Error<E>),
    /// A configuration step failed
    Configure {
        /// Name of the failing step
        step: &'static str,
        /// Underlying driver error
        source: Error<E>,
    },
    /// A read failed
    Read {
        /// Zero-based iteration that failed
        iteration: u32,
        /// Underlying driver error
        source: Error<E>,
    },
}

/// Process status reported for a failed run
pub const FAILURE_STATUS: u8 = 1;

impl<E> ReadTestError<E> {
    /// Binary status code
    ///
    /// Every variant maps to [`FAILURE_STATUS`]; the variant only feeds the
    /// diagnostic.
    pub fn status(&self) -> u8 {
        FAILURE_STATUS
    }
}

/// Apply `settings` in order, stopping at the first failure
///
/// Does not tear the device down; [`run_with`] does that.
pub fn configure<B, D>(
    device: &mut Apds9960<B, D>,
    settings: &[Setting],
) -> Result<(), ReadTestError<B::Error>>
where
    B: BusInterface,
    D: DelayNs,
{
    for setting in settings {
        log::debug!("apds9960: set {} {:?}", setting.name(), setting);
        setting
            .apply(device)
            .map_err(|source| ReadTestError::Configure {
                step: setting.name(),
                source,
            })?;
    }
    Ok(())
}

/// Run `times` iterations of {delay, read RGBC, read proximity, report}
///
/// Does not tear the device down; [`run_with`] does that.
pub fn sample<B, D, F>(
    device: &mut Apds9960<B, D>,
    interval_ms: u32,
    times: u32,
    on_sample: &mut F,
) -> Result<(), ReadTestError<B::Error>>
where
    B: BusInterface,
    D: DelayNs,
    F: FnMut(u32, &Sample),
{
    for iteration in 0..times {
        device.delay_ms(interval_ms);

        let rgbc = device
            .read_rgbc()
            .map_err(|source| ReadTestError::Read { iteration, source })?;
        let proximity = device
            .read_proximity()
            .map_err(|source| ReadTestError::Read { iteration, source })?;

        let sample = Sample {
            red: rgbc.red,
            green: rgbc.green,
            blue: rgbc.blue,
            clear: rgbc.clear,
            proximity,
        };
        log::info!(
            "apds9960: {}/{} red is {}, green is {}, blue is {}, clear is {}, proximity is {}",
            iteration + 1,
            times,
            sample.red,
            sample.green,
            sample.blue,
            sample.clear,
            sample.proximity
        );
        on_sample(iteration, &sample);
    }
    Ok(())
}

/// Run the read test, logging every sample
pub fn run<B, D>(
    device: &mut Apds9960<B, D>,
    config: &ReadTestConfig,
    times: u32,
) -> Result<(), ReadTestError<B::Error>>
where
    B: BusInterface,
    D: DelayNs,
{
    run_with(device, config, times, &mut |_: u32, _: &Sample| {})
}

/// Run the read test, passing every sample to `on_sample`
///
/// Initializes the device, applies [`sequence`], waits `config.settle_ms`,
/// samples `times` times and deinitializes. Once initialization succeeded the
/// device is deinitialized exactly once on every exit path. A teardown failure
/// is logged and never changes the outcome of the run.
pub fn run_with<B, D, F>(
    device: &mut Apds9960<B, D>,
    config: &ReadTestConfig,
    times: u32,
    on_sample: &mut F,
) -> Result<(), ReadTestError<B::Error>>
where
    B: BusInterface,
    D: DelayNs,
    F: FnMut(u32, &Sample),
{
    let info = Apds9960::<B, D>::info();
    log::info!("apds9960: chip is {}.", info.chip_name);
    log::info!("apds9960: manufacturer is {}.", info.manufacturer_name);
    log::info!("apds9960: interface is {}.", info.interface);
    log::info!("apds9960: driver version is {}.", info.driver_version);
    log::info!(
        "apds9960: min supply voltage is {:.1}V, max is {:.1}V.",
        info.supply_voltage_min_v,
        info.supply_voltage_max_v
    );
    log::info!("apds9960: max current is {:.2}mA.", info.max_current_ma);
    log::info!(
        "apds9960: min temperature is {:.1}C, max is {:.1}C.",
        info.temperature_min,
        info.temperature_max
    );
    log::info!("apds9960: start read test.");

    if let Err(source) = device.init() {
        log::error!("apds9960: init failed: {:?}", source);
        return Err(ReadTestError::Init(source));
    }

    let settings = sequence(config);
    let result = configure(device, &settings).and_then(|()| {
        device.delay_ms(config.settle_ms);
        sample(device, config.interval_ms, times, on_sample)
    });

    match result {
        Ok(()) => {
            if let Err(teardown) = device.deinit() {
                log::warn!("apds9960: deinit failed: {:?}", teardown);
            }
            log::info!("apds9960: finish read test.");
            Ok(())
        }
        Err(err) => {
            match &err {
                ReadTestError::Configure { step, source } => {
                    log::error!("apds9960: set {} failed: {:?}", step, source)
                }
                ReadTestError::Read { iteration, source } => {
                    log::error!("apds9960: read failed at iteration {}: {:?}", iteration, source)
                }
                ReadTestError::Init(source) => {
                    log::error!("apds9960: init failed: {:?}", source)
                }
            }
            if let Err(teardown) = device.deinit() {
                log::warn!("apds9960: deinit after failure also failed: {:?}", teardown);
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_disables_before_enabling() {
        let settings = sequence(&ReadTestConfig::default());

        assert_eq!(settings[0], Setting::Conf(Conf::Gesture, false));
        assert_eq!(settings[6], Setting::Conf(Conf::PowerOn, true));
        assert_eq!(
            &settings[SEQUENCE_LEN - 3..],
            &[
                Setting::Conf(Conf::Wait, true),
                Setting::Conf(Conf::ProximityDetect, true),
                Setting::Conf(Conf::Als, true),
            ]
        );

        // Nothing but the final three steps turns a sensing function on
        let enables = settings
            .iter()
            .filter(|s| matches!(s, Setting::Conf(c, true) if *c != Conf::PowerOn))
            .count();
        assert_eq!(enables, 3);
    }

    #[test]
    fn test_step_names_are_unique() {
        let settings = sequence(&ReadTestConfig::default());
        for (i, a) in settings.iter().enumerate() {
            for b in settings.iter().skip(i + 1) {
                if a.name() == b.name() {
                    // Only the enable/disable pairs share a name
                    assert!(matches!(
                        (a, b),
                        (Setting::Conf(x, false), Setting::Conf(y, true)) if x == y
                    ));
                }
            }
        }
    }
}
