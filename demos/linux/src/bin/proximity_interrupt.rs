//! Proximity interrupt example
//!
//! This example demonstrates how to:
//! - Configure proximity interrupt thresholds and persistence
//! - Dispatch pending interrupt sources with `irq_handler`
//!
//! The INT pin is not wired here; the status register is polled instead.

use apds9960::{
    ll::I2cInterface, Apds9960, Conf, Interrupt, LedCurrent, ProximityGain,
    ProximityInterruptCycle, PulseLength,
};
use clap::Parser;
use embedded_hal::delay::DelayNs;

#[cfg(target_os = "linux")]
use linux_embedded_hal::{Delay, I2cdev};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// I2C bus device
    #[arg(long, default_value = "/dev/i2c-1")]
    bus: String,

    /// Proximity level that raises the interrupt
    #[arg(long, default_value_t = 0x80)]
    high: u8,

    /// Number of polls before exiting
    #[arg(long, default_value_t = 100)]
    polls: u32,
}

#[cfg(target_os = "linux")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let i2c = I2cdev::new(&cli.bus)?;
    let mut delay = Delay;
    let mut sensor = Apds9960::new(I2cInterface::new(i2c), Delay);

    sensor.init().map_err(|e| format!("init failed: {:?}", e))?;

    let result = configure_and_poll(&mut sensor, &mut delay, &cli);
    sensor
        .deinit()
        .map_err(|e| format!("deinit failed: {:?}", e))?;
    result
}

#[cfg(target_os = "linux")]
fn configure_and_poll(
    sensor: &mut Apds9960<I2cInterface<I2cdev>, Delay>,
    delay: &mut Delay,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    sensor.set_conf(Conf::ProximityInterrupt, false).map_err(step)?;
    sensor.set_conf(Conf::ProximityDetect, false).map_err(step)?;
    sensor.set_conf(Conf::PowerOn, true).map_err(step)?;
    sensor.set_proximity_pulse_length(PulseLength::Us8).map_err(step)?;
    sensor.set_proximity_pulse_count(8).map_err(step)?;
    sensor.set_led_current(LedCurrent::Ma100).map_err(step)?;
    sensor.set_proximity_gain(ProximityGain::Gain4x).map_err(step)?;
    sensor.set_proximity_interrupt_low_threshold(0).map_err(step)?;
    sensor.set_proximity_interrupt_high_threshold(cli.high).map_err(step)?;
    sensor
        .set_proximity_interrupt_cycle(ProximityInterruptCycle::Cycles4)
        .map_err(step)?;
    sensor.all_non_gesture_interrupt_clear().map_err(step)?;
    sensor.set_conf(Conf::ProximityDetect, true).map_err(step)?;
    sensor.set_conf(Conf::ProximityInterrupt, true).map_err(step)?;

    log::info!("waiting for proximity above {}", cli.high);

    for _ in 0..cli.polls {
        delay.delay_ms(100);
        let mut triggered = false;
        sensor
            .irq_handler(&mut |source| {
                if source == Interrupt::Proximity {
                    triggered = true;
                }
            })
            .map_err(step)?;
        if triggered {
            let proximity = sensor.read_proximity().map_err(step)?;
            println!("proximity interrupt, level {}", proximity);
        }
    }

    Ok(())
}

#[cfg(target_os = "linux")]
fn step<E: core::fmt::Debug>(e: E) -> String {
    format!("{:?}", e)
}

#[cfg(not(target_os = "linux"))]
fn main() {
    println!("This example requires Linux with I2C support.");
    println!("Please adapt the I2C initialization for your platform.");
}
