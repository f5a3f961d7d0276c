//! BLE peripheral - the badge's control channel.
//!
//! The SoftDevice S140 runs in **Peripheral** role and exposes one custom
//! service with a write-only command characteristic. Each write is one
//! command: `[opcode, payload...]`.
//!
//! Connection lifecycle as seen by the state machine:
//!   1. GAP connect         → `BleCommand(Connect)`
//!   2. `begin_handshake()` → conn params requested, then `SubsystemDone(Ble)`
//!   3. GAP disconnect      → `BleCommand(Disconnect)`

use super::{post, Error};
use badge::config::{BLE_ADV_INTERVAL, BLE_DEVICE_NAME, BLE_PAYLOAD_CAPACITY};
use badge::{AdapterFault, BleCommand, BleLink, Event, Opcode, SubsystemId};
use core::mem;
use defmt::{info, warn};
use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::Vec;
use nrf_softdevice::ble::advertisement_builder::{
    Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
};
use nrf_softdevice::ble::{gatt_server, peripheral, Connection};
use nrf_softdevice::{raw, Softdevice};

/// One ATT write at the default MTU: opcode + payload.
const COMMAND_SIZE: usize = BLE_PAYLOAD_CAPACITY + 1;

/// Badge service UUID (little-endian for the advertisement).
const BADGE_SERVICE_UUID: u128 = 0x6b61_0001_b5a3_f393_e0a9_e50e_24dc_ca9e;

/// Set by the state machine when it wants the link brought up.
static HANDSHAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[nrf_softdevice::gatt_service(uuid = "6b610001-b5a3-f393-e0a9-e50e24dcca9e")]
pub struct BadgeService {
    /// Command writes from the phone app.
    #[characteristic(uuid = "6b610002-b5a3-f393-e0a9-e50e24dcca9e", write, write_without_response)]
    pub command: Vec<u8, COMMAND_SIZE>,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub badge: BadgeService,
}

/// Configure and enable the SoftDevice for a single peripheral link.
pub fn enable_softdevice() -> &'static mut Softdevice {
    let config = nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 23 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: BLE_DEVICE_NAME.as_ptr() as _,
            current_len: BLE_DEVICE_NAME.len() as u16,
            max_len: BLE_DEVICE_NAME.len() as u16,
            // SAFETY: all-zero is "no write access", a valid permission value.
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    };

    Softdevice::enable(&config)
}

/// Register the GATT table. Must run before the SoftDevice task starts.
pub fn register_server(sd: &mut Softdevice) -> Result<Server, Error> {
    Server::new(sd).map_err(|_| Error::GattRegister)
}

/// `BleLink` handed to the state machine.
pub struct Link;

impl BleLink for Link {
    fn begin_handshake(&mut self) -> Result<(), AdapterFault> {
        HANDSHAKE.signal(());
        Ok(())
    }
}

static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .full_name(BLE_DEVICE_NAME)
    .build();

static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_128(ServiceList::Complete, &[BADGE_SERVICE_UUID.to_le_bytes()])
    .build();

/// Advertise, serve one connection at a time, and translate link events.
pub async fn ble_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    loop {
        let config = peripheral::Config {
            interval: BLE_ADV_INTERVAL,
            ..Default::default()
        };
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };

        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("{}: {:?}", Error::Advertise, e);
                continue;
            }
        };

        info!("BLE connected");
        HANDSHAKE.reset();
        post(link_event(Opcode::Connect));

        select(serve(&conn, server), handshake(&conn)).await;

        info!("BLE disconnected");
        post(link_event(Opcode::Disconnect));
    }
}

/// Link transitions carry no payload.
fn link_event(opcode: Opcode) -> Event {
    Event::BleCommand(BleCommand {
        opcode: opcode as u8,
        payload: Vec::new(),
    })
}

/// Run the GATT server until the peer goes away.
async fn serve(conn: &Connection, server: &Server) {
    let reason = gatt_server::run(conn, server, |e| match e {
        ServerEvent::Badge(BadgeServiceEvent::CommandWrite(data)) => {
            match BleCommand::from_write(&data) {
                Ok(cmd) => {
                    if !post(Event::BleCommand(cmd)) {
                        warn!("command 0x{:02x} dropped", data.first().copied().unwrap_or(0));
                    }
                }
                Err(e) => warn!("rejected write: {:?}", e),
            }
        }
    })
    .await;
    info!("GATT server stopped: {:?}", reason);
}

/// Finish bringing the link up once the state machine asks for it.
/// Never completes on its own; `serve` ending cancels it.
async fn handshake(conn: &Connection) {
    HANDSHAKE.wait().await;

    let params = raw::ble_gap_conn_params_t {
        min_conn_interval: 24, // 30 ms
        max_conn_interval: 40, // 50 ms
        slave_latency: 0,
        conn_sup_timeout: 400, // 4 s
    };
    if let Err(e) = conn.set_conn_params(params) {
        warn!("conn params update refused: {:?}", e);
    }

    post(Event::SubsystemDone(SubsystemId::Ble));
    core::future::pending::<()>().await
}
