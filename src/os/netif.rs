//! Host network interface and Bluetooth HCI commands

use super::{run_best_effort, run_checked, Invocation, OsCommand, OsCommandRunner};
use hosted_shared::MacAddr;
use tracing::{error, info, warn};

/// Finds HCI devices on the buses the co-processor can sit on
const HCI_DISCOVERY: &str =
    "sudo hciconfig | grep  'Bus: SDIO\\| Bus: UART\\| Bus: SPI' | awk -F: '{print $1}'";

/// Host-side names and addresses used by OS commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetConfig {
    /// Station network interface
    pub sta_interface: String,
    /// Soft-AP network interface
    pub softap_interface: String,
    /// Address assigned to the soft-AP interface when it comes up
    pub softap_address: String,
    /// Script that configures and starts the DHCP server
    pub dhcp_server_script: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            sta_interface: "ethsta0".into(),
            softap_interface: "ethap0".into(),
            softap_address: "192.168.4.5".into(),
            dhcp_server_script: "./run_dhcp_server.sh".into(),
        }
    }
}

impl NetConfig {
    pub fn dhcp_release(&self) -> OsCommand {
        OsCommand {
            label: "dhcp_release",
            invocation: Invocation::Shell(format!("sudo dhclient {} -r", self.sta_interface)),
        }
    }

    pub fn dhcp_renew(&self) -> OsCommand {
        OsCommand {
            label: "dhcp_renew",
            invocation: Invocation::Shell(format!("sudo dhclient {} -v", self.sta_interface)),
        }
    }

    pub fn dhcp_server(&self) -> OsCommand {
        OsCommand {
            label: "dhcp_server",
            invocation: Invocation::Shell(format!("sudo bash {}", self.dhcp_server_script)),
        }
    }

    pub fn softap_up(&self) -> OsCommand {
        OsCommand {
            label: "softap_up",
            invocation: Invocation::Shell(format!(
                "sudo ifconfig {} up {}",
                self.softap_interface, self.softap_address
            )),
        }
    }

    pub fn softap_down(&self) -> OsCommand {
        OsCommand {
            label: "softap_down",
            invocation: Invocation::Shell(format!("sudo ifconfig {} down", self.softap_interface)),
        }
    }

    pub fn hci_down(&self) -> OsCommand {
        OsCommand {
            label: "hci_down",
            invocation: Invocation::Shell(format!("{} | xargs -I{{}} sudo hciconfig {{}} down", HCI_DISCOVERY)),
        }
    }

    pub fn hci_reset(&self) -> OsCommand {
        OsCommand {
            label: "hci_reset",
            invocation: Invocation::Shell(format!("{} | xargs -I{{}} sudo hciconfig {{}} reset", HCI_DISCOVERY)),
        }
    }

    pub fn ifconfig_down(&self, interface: &str) -> OsCommand {
        OsCommand {
            label: "ifconfig_down",
            invocation: Invocation::argv("ifconfig", [interface, "down"]),
        }
    }

    pub fn ifconfig_hw_ether(&self, interface: &str, mac: MacAddr) -> OsCommand {
        OsCommand {
            label: "ifconfig_hw_ether",
            invocation: Invocation::argv("ifconfig", [interface.to_string(), "hw".into(), "ether".into(), mac.to_string()]),
        }
    }

    pub fn ifconfig_up(&self, interface: &str) -> OsCommand {
        OsCommand {
            label: "ifconfig_up",
            invocation: Invocation::argv("ifconfig", [interface, "up"]),
        }
    }
}

pub async fn down_net_interface(runner: &dyn OsCommandRunner, net: &NetConfig, interface: &str) {
    if let Err(e) = run_checked(runner, &net.ifconfig_down(interface)).await {
        warn!("[OS] ifconfig {} down FAILED: {}", interface, e);
    }
}

/// Take the interface down, assign `mac`, and bring it back up.
/// Each step is attempted even if an earlier one failed.
pub async fn up_net_interface(runner: &dyn OsCommandRunner, net: &NetConfig, interface: &str, mac: MacAddr) {
    let commands = [
        net.ifconfig_down(interface),
        net.ifconfig_hw_ether(interface, mac),
        net.ifconfig_up(interface),
    ];
    run_best_effort(runner, &commands).await;
}

pub async fn down_hci_instance(runner: &dyn OsCommandRunner, net: &NetConfig) {
    match run_checked(runner, &net.hci_down()).await {
        Ok(()) => info!("[BT] Bluetooth interface set down successfully"),
        Err(e) => error!("[BT] Failed to bring Bluetooth interface down: {}", e),
    }
}

pub async fn reset_hci_instance(runner: &dyn OsCommandRunner, net: &NetConfig) {
    match run_checked(runner, &net.hci_reset()).await {
        Ok(()) => info!("[BT] Bluetooth interface reset successfully"),
        Err(e) => error!("[BT] Failed to reset Bluetooth interface: {}", e),
    }
}
