//! Boundary to the hosted control library
//!
//! Every operation the co-processor supports is one call on [`ControlLib`].
//! Calls that report a status return `Result`; informational queries have no
//! failure path and print their own output.

mod emulated;

pub use emulated::EmulatedControlLib;

use async_trait::async_trait;
use hosted_shared::{AuthMode, BandMode, Bandwidth, Event, MacAddr, MacMode, PowerSaveMode, WifiMode};
use thiserror::Error;

/// Failure reported by the control library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibError {
    #[error("control library returned failure status {0}")]
    Status(i32),

    #[error("control library is not initialised")]
    NotInitialized,
}

/// Optional co-processor features that can be switched at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Wifi,
    Bluetooth,
}

/// Station-mode connection request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationConfig {
    pub ssid: String,
    pub pwd: String,
    pub bssid: String,
    pub use_wpa3: bool,
    pub listen_interval: i64,
    pub band_mode: BandMode,
}

/// Soft-AP start request, already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftApConfig {
    pub ssid: String,
    pub pwd: String,
    pub channel: i64,
    pub auth: AuthMode,
    pub max_conn: i64,
    pub hide_ssid: bool,
    pub bandwidth: Bandwidth,
    pub band_mode: BandMode,
}

/// Synchronous request/response interface to the co-processor
#[async_trait]
pub trait ControlLib: Send + Sync {
    /// Open the control path. Must be called once before any other call.
    async fn init(&self) -> Result<(), LibError>;

    async fn deinit(&self) -> Result<(), LibError>;

    async fn get_wifi_mode(&self);

    async fn set_wifi_mode(&self, mode: WifiMode);

    async fn get_mac_addr(&self, mode: MacMode) -> Result<MacAddr, LibError>;

    async fn set_mac_addr(&self, mode: MacMode, mac: MacAddr) -> Result<(), LibError>;

    /// Scan and print the visible access points
    async fn get_available_wifi(&self);

    async fn station_connect(&self, config: &StationConfig) -> Result<(), LibError>;

    async fn station_info(&self);

    async fn station_disconnect(&self);

    async fn set_vendor_ie(&self, enable: bool, data: &str);

    async fn softap_start(&self, config: &SoftApConfig) -> Result<(), LibError>;

    async fn softap_info(&self);

    async fn softap_connected_clients(&self);

    async fn softap_stop(&self) -> Result<(), LibError>;

    async fn get_power_save(&self);

    async fn set_power_save(&self, mode: PowerSaveMode);

    async fn set_max_tx_power(&self, power: i64);

    async fn get_curr_tx_power(&self);

    async fn enable_feature(&self, feature: Feature);

    async fn disable_feature(&self, feature: Feature);

    async fn get_fw_version(&self);

    async fn get_country_code(&self);

    async fn set_country_code(&self, country: &str, ieee80211d: bool);

    /// Run a firmware update from `url`. An empty string means success,
    /// anything else describes the failure.
    async fn ota_update(&self, url: &str) -> String;

    async fn config_heartbeat(&self, enable: bool, duration_secs: i64);

    async fn subscribe_event(&self, event: Event);

    async fn unsubscribe_event(&self, event: Event);

    async fn register_all_event_callbacks(&self);

    async fn unregister_all_event_callbacks(&self);
}
