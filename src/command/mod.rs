//! Command processing for the host control utility
//!
//! This module handles:
//! - Turning a parsed command line into a typed [`Command`]
//! - Validating parameters before anything reaches the co-processor
//! - Dispatching to the matching handler
//! - Reporting a typed result that still renders to the classic message text

mod executor;
pub mod handlers;
mod request;

pub use executor::{CommandExecutor, SessionState};
pub use request::{CommandRequest, ParamValue, COMMAND_NAMES};

use crate::os::OsError;
use hosted_shared::ParseError;
use thiserror::Error;

/// Why a command did not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Malformed or out-of-range input, caught before any library call
    #[error("{0}")]
    Validation(String),

    /// The control library reported failure
    #[error("{0}")]
    Library(String),

    /// A required OS command failed
    #[error("{0}")]
    OsCommand(String),
}

impl CommandError {
    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::Validation(message.into())
    }

    pub fn library(message: impl Into<String>) -> Self {
        CommandError::Library(message.into())
    }
}

impl From<ParseError> for CommandError {
    fn from(e: ParseError) -> Self {
        CommandError::Validation(e.to_string())
    }
}

impl From<OsError> for CommandError {
    fn from(e: OsError) -> Self {
        CommandError::OsCommand(e.to_string())
    }
}

/// Successful completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report beyond what the library printed
    Done,
    /// Informational message for the user
    Info(String),
}

pub type CommandResult = Result<Outcome, CommandError>;

/// Render a result as the single message line the shell prints.
/// Empty means silent success.
pub fn legacy_text(result: &CommandResult) -> String {
    match result {
        Ok(Outcome::Done) => String::new(),
        Ok(Outcome::Info(message)) => message.clone(),
        Err(e) => e.to_string(),
    }
}

/// Parameters of `connect_ap`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAp {
    pub ssid: String,
    pub pwd: String,
    pub bssid: String,
    pub use_wpa3: bool,
    pub listen_interval: i64,
    pub set_dhcp: bool,
    pub band_mode: i64,
}

/// Parameters of `start_softap`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartSoftAp {
    pub ssid: String,
    pub pwd: String,
    pub channel: i64,
    pub sec_prot: String,
    pub max_conn: i64,
    pub hide_ssid: bool,
    /// Channel width in MHz
    pub bandwidth: i64,
    pub start_dhcp_server: bool,
    pub band_mode: i64,
}

/// A command with its parameters, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GetWifiMode,
    SetWifiMode { mode: String },
    GetMacAddr { mode: String },
    SetMacAddr { mode: String, mac: String },
    GetAvailableWifi,
    ConnectAp(ConnectAp),
    GetConnectedApInfo,
    DisconnectAp { reset_dhcp: bool },
    SoftApVendorIe { enable: String, data: String },
    StartSoftAp(StartSoftAp),
    GetSoftApInfo,
    SoftApConnectedClientsInfo,
    StopSoftAp,
    GetPowerSave,
    SetPowerSave { mode: String },
    SetMaxTxPower { power: i64 },
    GetCurrTxPower,
    EnableWifi,
    DisableWifi,
    EnableBt,
    DisableBt,
    GetFwVersion,
    GetCountryCode,
    SetCountryCode { country: String, ieee80211d: bool },
    OtaUpdate { url: String },
    Heartbeat { enable: ParamValue, duration: i64 },
    SubscribeEvent { event: String },
    UnsubscribeEvent { event: String },
}

impl Command {
    /// Stable command name as typed at the prompt
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetWifiMode => "get_wifi_mode",
            Command::SetWifiMode { .. } => "set_wifi_mode",
            Command::GetMacAddr { .. } => "get_mac_addr",
            Command::SetMacAddr { .. } => "set_mac_addr",
            Command::GetAvailableWifi => "get_ap_scan_list",
            Command::ConnectAp(_) => "connect_ap",
            Command::GetConnectedApInfo => "get_connected_ap_info",
            Command::DisconnectAp { .. } => "disconnect_ap",
            Command::SoftApVendorIe { .. } => "softap_vendor_ie",
            Command::StartSoftAp(_) => "start_softap",
            Command::GetSoftApInfo => "get_softap_info",
            Command::SoftApConnectedClientsInfo => "softap_connected_clients_info",
            Command::StopSoftAp => "stop_softap",
            Command::GetPowerSave => "get_wifi_powersave_mode",
            Command::SetPowerSave { .. } => "set_wifi_powersave_mode",
            Command::SetMaxTxPower { .. } => "set_wifi_max_tx_power",
            Command::GetCurrTxPower => "get_wifi_curr_tx_power",
            Command::EnableWifi => "enable_wifi",
            Command::DisableWifi => "disable_wifi",
            Command::EnableBt => "enable_bt",
            Command::DisableBt => "disable_bt",
            Command::GetFwVersion => "get_fw_version",
            Command::GetCountryCode => "get_country_code",
            Command::SetCountryCode { .. } => "set_country_code",
            Command::OtaUpdate { .. } => "ota_update",
            Command::Heartbeat { .. } => "heartbeat",
            Command::SubscribeEvent { .. } => "subscribe_event",
            Command::UnsubscribeEvent { .. } => "unsubscribe_event",
        }
    }
}
