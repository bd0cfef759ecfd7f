//! In-process stand-in for the co-processor
//!
//! Keeps the state a real co-processor would hold and answers control calls
//! from it. Every call is recorded in a journal so callers can check exactly
//! what reached the library.

use super::{ControlLib, Feature, LibError, SoftApConfig, StationConfig};
use async_trait::async_trait;
use hosted_shared::{defaults, Event, MacAddr, MacMode, PowerSaveMode, WifiMode};
use std::collections::{BTreeSet, HashSet};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Status code returned for scripted failures
const FAILURE_STATUS: i32 = -1;

const FW_VERSION: &str = "FG-1.0.3.0.0";

/// Observable co-processor state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatedState {
    pub initialized: bool,
    pub wifi_enabled: bool,
    pub bt_enabled: bool,
    pub mode: WifiMode,
    pub sta_mac: MacAddr,
    pub softap_mac: MacAddr,
    pub connected_ssid: Option<String>,
    pub softap: Option<SoftApConfig>,
    pub vendor_ie: Option<String>,
    pub power_save: PowerSaveMode,
    pub max_tx_power: i64,
    pub country_code: String,
    pub ieee80211d: bool,
    pub heartbeat_secs: Option<i64>,
    pub subscriptions: BTreeSet<Event>,
}

impl Default for EmulatedState {
    fn default() -> Self {
        Self {
            initialized: false,
            wifi_enabled: true,
            bt_enabled: true,
            mode: WifiMode::None,
            sta_mac: MacAddr::new([0x24, 0x0a, 0xc4, 0x00, 0x00, 0x01]),
            softap_mac: MacAddr::new([0x24, 0x0a, 0xc4, 0x00, 0x00, 0x02]),
            connected_ssid: None,
            softap: None,
            vendor_ie: None,
            power_save: PowerSaveMode::Min,
            max_tx_power: defaults::WIFI_MAX_TX_POWER,
            country_code: defaults::COUNTRY_CODE.to_string(),
            ieee80211d: false,
            heartbeat_secs: None,
            subscriptions: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: EmulatedState,
    calls: Vec<String>,
    failing: HashSet<&'static str>,
}

/// Control library backed by [`EmulatedState`]
#[derive(Debug, Default)]
pub struct EmulatedControlLib {
    inner: RwLock<Inner>,
}

impl EmulatedControlLib {
    /// Create an emulator with factory-default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to the named method report failure
    #[cfg(test)]
    pub fn failing(mut self, method: &'static str) -> Self {
        self.inner.get_mut().failing.insert(method);
        self
    }

    /// Calls received so far, oldest first
    #[cfg(test)]
    pub async fn calls(&self) -> Vec<String> {
        self.inner.read().await.calls.clone()
    }

    /// Snapshot of the emulated co-processor
    #[cfg(test)]
    pub async fn state(&self) -> EmulatedState {
        self.inner.read().await.state.clone()
    }

    /// Record a call and return whether it was scripted to fail
    async fn record(&self, method: &'static str, call: String) -> bool {
        let mut inner = self.inner.write().await;
        debug!("[CTRL] {}", call);
        inner.calls.push(call);
        inner.failing.contains(method)
    }
}

fn status(failed: bool) -> Result<(), LibError> {
    if failed {
        Err(LibError::Status(FAILURE_STATUS))
    } else {
        Ok(())
    }
}

#[async_trait]
impl ControlLib for EmulatedControlLib {
    async fn init(&self) -> Result<(), LibError> {
        let failed = self.record("init", "init()".into()).await;
        status(failed)?;
        self.inner.write().await.state.initialized = true;
        info!("[CTRL] Control path opened");
        Ok(())
    }

    async fn deinit(&self) -> Result<(), LibError> {
        let failed = self.record("deinit", "deinit()".into()).await;
        status(failed)?;
        let mut inner = self.inner.write().await;
        if !inner.state.initialized {
            return Err(LibError::NotInitialized);
        }
        inner.state.initialized = false;
        info!("[CTRL] Control path closed");
        Ok(())
    }

    async fn get_wifi_mode(&self) {
        self.record("get_wifi_mode", "get_wifi_mode()".into()).await;
        let mode = self.inner.read().await.state.mode;
        info!("[CTRL] Wi-Fi mode: {}", mode);
    }

    async fn set_wifi_mode(&self, mode: WifiMode) {
        self.record("set_wifi_mode", format!("set_wifi_mode({})", mode))
            .await;
        self.inner.write().await.state.mode = mode;
        info!("[CTRL] Wi-Fi mode set to {}", mode);
    }

    async fn get_mac_addr(&self, mode: MacMode) -> Result<MacAddr, LibError> {
        let failed = self
            .record("get_mac_addr", format!("get_mac_addr({})", mode))
            .await;
        status(failed)?;
        let inner = self.inner.read().await;
        let state = &inner.state;
        let mac = match mode {
            MacMode::Station => state.sta_mac,
            MacMode::SoftAp => state.softap_mac,
        };
        info!("[CTRL] {} MAC address: {}", mode, mac);
        Ok(mac)
    }

    async fn set_mac_addr(&self, mode: MacMode, mac: MacAddr) -> Result<(), LibError> {
        let failed = self
            .record("set_mac_addr", format!("set_mac_addr({}, {})", mode, mac))
            .await;
        status(failed)?;
        let mut inner = self.inner.write().await;
        let state = &mut inner.state;
        match mode {
            MacMode::Station => state.sta_mac = mac,
            MacMode::SoftAp => state.softap_mac = mac,
        }
        Ok(())
    }

    async fn get_available_wifi(&self) {
        self.record("get_available_wifi", "get_available_wifi()".into())
            .await;
        info!("[CTRL] Scan complete: 0 access points");
    }

    async fn station_connect(&self, config: &StationConfig) -> Result<(), LibError> {
        let failed = self
            .record(
                "station_connect",
                format!("station_connect({}, band_mode={})", config.ssid, config.band_mode as i64),
            )
            .await;
        status(failed)?;
        debug!(
            "[CTRL] Station bssid={:?} wpa3={} listen_interval={} pwd_len={}",
            config.bssid,
            config.use_wpa3,
            config.listen_interval,
            config.pwd.len()
        );
        self.inner.write().await.state.connected_ssid = Some(config.ssid.clone());
        Ok(())
    }

    async fn station_info(&self) {
        self.record("station_info", "station_info()".into()).await;
        match &self.inner.read().await.state.connected_ssid {
            Some(ssid) => info!("[CTRL] Station connected to {}", ssid),
            None => info!("[CTRL] Station not connected"),
        }
    }

    async fn station_disconnect(&self) {
        self.record("station_disconnect", "station_disconnect()".into())
            .await;
        self.inner.write().await.state.connected_ssid = None;
    }

    async fn set_vendor_ie(&self, enable: bool, data: &str) {
        self.record("set_vendor_ie", format!("set_vendor_ie({}, {})", enable, data))
            .await;
        let mut inner = self.inner.write().await;
        inner.state.vendor_ie = enable.then(|| data.to_string());
        debug!("[CTRL] Vendor IE now {:?}", inner.state.vendor_ie);
    }

    async fn softap_start(&self, config: &SoftApConfig) -> Result<(), LibError> {
        let failed = self
            .record(
                "softap_start",
                format!("softap_start({}, max_conn={})", config.ssid, config.max_conn),
            )
            .await;
        status(failed)?;
        debug!(
            "[CTRL] SoftAP auth={:?} hidden={} band_mode={:?} pwd_len={}",
            config.auth,
            config.hide_ssid,
            config.band_mode,
            config.pwd.len()
        );
        self.inner.write().await.state.softap = Some(config.clone());
        Ok(())
    }

    async fn softap_info(&self) {
        self.record("softap_info", "softap_info()".into()).await;
        match &self.inner.read().await.state.softap {
            Some(ap) => info!(
                "[CTRL] SoftAP {} channel={} bandwidth={}MHz",
                ap.ssid,
                ap.channel,
                ap.bandwidth.mhz()
            ),
            None => info!("[CTRL] SoftAP not running"),
        }
    }

    async fn softap_connected_clients(&self) {
        self.record("softap_connected_clients", "softap_connected_clients()".into())
            .await;
        info!("[CTRL] SoftAP clients: 0");
    }

    async fn softap_stop(&self) -> Result<(), LibError> {
        let failed = self.record("softap_stop", "softap_stop()".into()).await;
        status(failed)?;
        self.inner.write().await.state.softap = None;
        Ok(())
    }

    async fn get_power_save(&self) {
        self.record("get_power_save", "get_power_save()".into()).await;
        let mode = self.inner.read().await.state.power_save;
        info!("[CTRL] Power save mode: {}", mode);
    }

    async fn set_power_save(&self, mode: PowerSaveMode) {
        self.record("set_power_save", format!("set_power_save({})", mode))
            .await;
        self.inner.write().await.state.power_save = mode;
    }

    async fn set_max_tx_power(&self, power: i64) {
        self.record("set_max_tx_power", format!("set_max_tx_power({})", power))
            .await;
        self.inner.write().await.state.max_tx_power = power;
    }

    async fn get_curr_tx_power(&self) {
        self.record("get_curr_tx_power", "get_curr_tx_power()".into())
            .await;
        let power = self.inner.read().await.state.max_tx_power;
        info!("[CTRL] Current Tx power: {}", power);
    }

    async fn enable_feature(&self, feature: Feature) {
        self.record("enable_feature", format!("enable_feature({:?})", feature))
            .await;
        let mut inner = self.inner.write().await;
        let state = &mut inner.state;
        match feature {
            Feature::Wifi => state.wifi_enabled = true,
            Feature::Bluetooth => state.bt_enabled = true,
        }
        info!("[CTRL] Features: wifi={} bt={}", state.wifi_enabled, state.bt_enabled);
    }

    async fn disable_feature(&self, feature: Feature) {
        self.record("disable_feature", format!("disable_feature({:?})", feature))
            .await;
        let mut inner = self.inner.write().await;
        let state = &mut inner.state;
        match feature {
            Feature::Wifi => state.wifi_enabled = false,
            Feature::Bluetooth => state.bt_enabled = false,
        }
        info!("[CTRL] Features: wifi={} bt={}", state.wifi_enabled, state.bt_enabled);
    }

    async fn get_fw_version(&self) {
        self.record("get_fw_version", "get_fw_version()".into()).await;
        info!("[CTRL] Firmware version: {}", FW_VERSION);
    }

    async fn get_country_code(&self) {
        self.record("get_country_code", "get_country_code()".into())
            .await;
        let inner = self.inner.read().await;
        info!(
            "[CTRL] Country code: {:?} (802.11d {})",
            inner.state.country_code, inner.state.ieee80211d
        );
    }

    async fn set_country_code(&self, country: &str, ieee80211d: bool) {
        self.record(
            "set_country_code",
            format!("set_country_code({}, {})", country, ieee80211d),
        )
        .await;
        let mut inner = self.inner.write().await;
        let state = &mut inner.state;
        state.country_code = country.to_string();
        state.ieee80211d = ieee80211d;
    }

    async fn ota_update(&self, url: &str) -> String {
        let failed = self
            .record("ota_update", format!("ota_update({})", url))
            .await;
        if failed {
            return "OTA failed".into();
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return format!("OTA failed: unsupported URL {}", url);
        }
        info!("[CTRL] OTA image from {} written", url);
        String::new()
    }

    async fn config_heartbeat(&self, enable: bool, duration_secs: i64) {
        self.record(
            "config_heartbeat",
            format!("config_heartbeat({}, {})", enable, duration_secs),
        )
        .await;
        let mut inner = self.inner.write().await;
        inner.state.heartbeat_secs = enable.then_some(duration_secs);
        match inner.state.heartbeat_secs {
            Some(secs) => info!("[CTRL] Heartbeat every {}s", secs),
            None => info!("[CTRL] Heartbeat off"),
        }
    }

    async fn subscribe_event(&self, event: Event) {
        self.record("subscribe_event", format!("subscribe_event({})", event))
            .await;
        self.inner.write().await.state.subscriptions.insert(event);
    }

    async fn unsubscribe_event(&self, event: Event) {
        self.record("unsubscribe_event", format!("unsubscribe_event({})", event))
            .await;
        self.inner.write().await.state.subscriptions.remove(&event);
    }

    async fn register_all_event_callbacks(&self) {
        self.record(
            "register_all_event_callbacks",
            "register_all_event_callbacks()".into(),
        )
        .await;
        self.inner
            .write()
            .await
            .state
            .subscriptions
            .extend(Event::ALL);
    }

    async fn unregister_all_event_callbacks(&self) {
        self.record(
            "unregister_all_event_callbacks",
            "unregister_all_event_callbacks()".into(),
        )
        .await;
        self.inner.write().await.state.subscriptions.clear();
    }
}
