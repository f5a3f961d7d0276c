//! badge - conference badge firmware
//!
//! nRF52840 + S140 SoftDevice. Touch pads, BLE writes and a periodic tick
//! feed one bounded event queue; the main task drains it through the
//! `badge` state machine, which drives the status LEDs and the buzzer.
//!
//! Task layout:
//!   softdevice  - SoftDevice event pump
//!   ble         - advertising, GATT command characteristic, link events
//!   touch[0..8] - one debounced input task per pad
//!   ticker      - `TimerTick` every `TICK_PERIOD_MS`
//!   buzzer      - PWM note sequencer
//!   main        - `StateMachine::step` loop, settings persistence

#![no_std]
#![no_main]

mod hw;

use badge::catalog::BUILTIN;
use badge::config::{TICK_PERIOD_MS, TOUCH_ZONE_COUNT};
use badge::{Event, Outputs, StateMachine, Zone};
use defmt::{error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive, Pin};
use embassy_nrf::interrupt::Priority;
use embassy_nrf::peripherals::PWM0;
use embassy_nrf::pwm::SimplePwm;
use embassy_time::{Duration, Instant, Ticker};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hw::ble::{self, Link, Server};
use hw::buzzer::{self, Buzzer};
use hw::led::StatusLeds;
use hw::storage::{load_settings, save_settings};
use hw::{touch, EVENTS, WAKE};

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    ble::ble_task(sd, server).await
}

#[embassy_executor::task(pool_size = 9)]
async fn touch_task(pin: AnyPin, zone: Zone) -> ! {
    touch::touch_task(pin, zone).await
}

#[embassy_executor::task]
async fn buzzer_task(pwm: SimplePwm<'static, PWM0>) -> ! {
    buzzer::buzzer_task(pwm).await
}

/// Posts the time actually elapsed, so a late tick still advances
/// playback by the right amount.
#[embassy_executor::task]
async fn ticker_task() -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(TICK_PERIOD_MS)));
    let mut last = Instant::now();
    loop {
        ticker.next().await;
        let now = Instant::now();
        let elapsed = (now - last).as_millis() as u32;
        last = now;
        hw::post(Event::TimerTick(elapsed));
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("badge starting");

    // SoftDevice reserves priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);

    let sd = ble::enable_softdevice();
    static SERVER: StaticCell<Server> = StaticCell::new();
    let server: &'static Server = SERVER.init(unwrap!(ble::register_server(sd)));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    let mut flash = nrf_softdevice::Flash::take(sd);
    let settings = load_settings(&mut flash).await;

    if let Err(e) = BUILTIN.validate() {
        // Lookups still fail safe into Error mode, so keep running.
        error!("built-in registry rejected: {}", e);
    }

    let pads: [AnyPin; TOUCH_ZONE_COUNT as usize] = [
        p.P0_02.degrade(),
        p.P0_03.degrade(),
        p.P0_04.degrade(),
        p.P0_05.degrade(),
        p.P0_28.degrade(),
        p.P0_29.degrade(),
        p.P0_30.degrade(),
        p.P0_31.degrade(),
        p.P1_15.degrade(),
    ];
    for (index, pin) in (0u8..).zip(pads) {
        let zone = unwrap!(Zone::new(index));
        unwrap!(spawner.spawn(touch_task(pin, zone)));
    }

    let leds = StatusLeds::new([
        Output::new(p.P0_13, Level::High, OutputDrive::Standard),
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_15, Level::High, OutputDrive::Standard),
    ]);
    let pwm = SimplePwm::new_1ch(p.PWM0, p.P0_16);

    unwrap!(spawner.spawn(buzzer_task(pwm)));
    unwrap!(spawner.spawn(ble_task(sd, server)));
    unwrap!(spawner.spawn(ticker_task()));

    let mut machine =
        StateMachine::new(BUILTIN, Outputs::new(leds, Buzzer, Link)).with_settings(settings);
    info!("badge ready in {}", machine.mode());

    loop {
        // Transitions and errors are logged inside the state machine.
        if machine.step(&EVENTS).event.is_none() {
            WAKE.wait().await;
            continue;
        }

        if let Some(settings) = machine.take_settings_update() {
            if let Err(e) = save_settings(&mut flash, &settings).await {
                warn!("settings not persisted: {}", e);
            }
        }
    }
}
