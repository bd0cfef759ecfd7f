//! Command handlers, one per command

mod events;
mod feature;
mod heartbeat;
mod mac;
mod mode;
mod power;
mod softap;
mod station;
mod system;

pub use events::{handle_subscribe_event, handle_unsubscribe_event};
pub use feature::{handle_disable_bt, handle_disable_wifi, handle_enable_bt, handle_enable_wifi};
pub use heartbeat::handle_heartbeat;
pub use mac::{handle_get_mac_addr, handle_set_mac_addr};
pub use mode::{handle_get_wifi_mode, handle_set_wifi_mode};
pub use power::{
    handle_get_curr_tx_power, handle_get_power_save, handle_set_max_tx_power, handle_set_power_save,
};
pub use softap::{
    handle_get_softap_info, handle_softap_connected_clients, handle_softap_vendor_ie,
    handle_start_softap, handle_stop_softap,
};
pub use station::{
    handle_connect_ap, handle_disconnect_ap, handle_get_available_wifi, handle_get_connected_ap_info,
};
pub use system::{handle_get_country_code, handle_get_fw_version, handle_ota_update, handle_set_country_code};

use crate::ctrl::ControlLib;
use crate::os::{NetConfig, OsCommandRunner};

/// Collaborators passed to command handlers
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    pub lib: &'a dyn ControlLib,
    pub os: &'a dyn OsCommandRunner,
    pub net: &'a NetConfig,
}
