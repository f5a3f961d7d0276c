//! Capacitive touch pads with async debouncing.
//!
//! Each pad sits behind a touch controller output that pulls the GPIO low
//! while touched. One task per pad waits for an edge, debounces it and
//! posts `TouchPress`/`TouchRelease` into the event queue.

use super::post;
use badge::config::TOUCH_DEBOUNCE_MS;
use badge::{Event, Zone};
use defmt::{debug, warn};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Timer};

pub async fn touch_task(pin: AnyPin, zone: Zone) -> ! {
    let mut pad = Input::new(pin, Pull::Up);

    loop {
        pad.wait_for_falling_edge().await;
        Timer::after(Duration::from_millis(TOUCH_DEBOUNCE_MS)).await;
        if pad.is_high() {
            continue;
        }

        debug!("Touch: {} pressed", zone.index());
        if !post(Event::TouchPress(zone)) {
            warn!("Touch: press on {} dropped", zone.index());
        }

        pad.wait_for_rising_edge().await;
        Timer::after(Duration::from_millis(TOUCH_DEBOUNCE_MS)).await;
        post(Event::TouchRelease(zone));
    }
}
