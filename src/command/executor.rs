//! Command executor - validates and dispatches commands to the co-processor

use super::handlers::{self, HandlerContext};
use super::{legacy_text, Command, CommandResult, ParamValue};
use crate::ctrl::{ControlLib, LibError};
use crate::os::{NetConfig, OsCommandRunner};
use std::time::Instant;
use tracing::{debug, info, warn};

/// State that lives as long as one control-library session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Set while this session has the co-processor heartbeat enabled
    pub heartbeat_started: bool,
}

/// Executes commands against a control library
pub struct CommandExecutor<L, R> {
    lib: L,
    os: R,
    net: NetConfig,
    session: SessionState,
}

impl<L: ControlLib, R: OsCommandRunner> CommandExecutor<L, R> {
    /// Create a new command executor
    pub fn new(lib: L, os: R, net: NetConfig) -> Self {
        Self {
            lib,
            os,
            net,
            session: SessionState::default(),
        }
    }

    #[cfg(test)]
    pub fn lib(&self) -> &L {
        &self.lib
    }

    #[cfg(test)]
    pub fn os(&self) -> &R {
        &self.os
    }

    #[cfg(test)]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Open the control library. Call once before executing commands.
    pub async fn init(&self) -> Result<(), LibError> {
        self.lib.init().await
    }

    /// Close the control library, optionally switching the heartbeat off first
    pub async fn deinit(&mut self, stop_heartbeat: bool) -> Result<(), LibError> {
        if stop_heartbeat {
            let ctx = HandlerContext {
                lib: &self.lib,
                os: &self.os,
                net: &self.net,
            };
            let off = ParamValue::Bool(false);
            let result = handlers::handle_heartbeat(
                &ctx,
                &mut self.session,
                &off,
                hosted_shared::limits::DEFAULT_HEARTBEAT_DURATION_SECS,
            )
            .await;
            if let Err(e) = result {
                warn!("[CTRL] Could not stop heartbeat: {}", e);
            }
        }
        self.lib.deinit().await
    }

    /// Execute a command and return its result
    pub async fn execute(&mut self, command: &Command) -> CommandResult {
        let start = Instant::now();
        info!("Executing command: {}", command.name());

        let ctx = HandlerContext {
            lib: &self.lib,
            os: &self.os,
            net: &self.net,
        };

        let result = match command {
            Command::GetWifiMode => handlers::handle_get_wifi_mode(&ctx).await,
            Command::SetWifiMode { mode } => handlers::handle_set_wifi_mode(&ctx, mode).await,
            Command::GetMacAddr { mode } => handlers::handle_get_mac_addr(&ctx, mode).await,
            Command::SetMacAddr { mode, mac } => handlers::handle_set_mac_addr(&ctx, mode, mac).await,
            Command::GetAvailableWifi => handlers::handle_get_available_wifi(&ctx).await,
            Command::ConnectAp(params) => handlers::handle_connect_ap(&ctx, params).await,
            Command::GetConnectedApInfo => handlers::handle_get_connected_ap_info(&ctx).await,
            Command::DisconnectAp { reset_dhcp } => {
                handlers::handle_disconnect_ap(&ctx, *reset_dhcp).await
            }
            Command::SoftApVendorIe { enable, data } => {
                handlers::handle_softap_vendor_ie(&ctx, enable, data).await
            }
            Command::StartSoftAp(params) => handlers::handle_start_softap(&ctx, params).await,
            Command::GetSoftApInfo => handlers::handle_get_softap_info(&ctx).await,
            Command::SoftApConnectedClientsInfo => {
                handlers::handle_softap_connected_clients(&ctx).await
            }
            Command::StopSoftAp => handlers::handle_stop_softap(&ctx).await,
            Command::GetPowerSave => handlers::handle_get_power_save(&ctx).await,
            Command::SetPowerSave { mode } => handlers::handle_set_power_save(&ctx, mode).await,
            Command::SetMaxTxPower { power } => handlers::handle_set_max_tx_power(&ctx, *power).await,
            Command::GetCurrTxPower => handlers::handle_get_curr_tx_power(&ctx).await,
            Command::EnableWifi => handlers::handle_enable_wifi(&ctx).await,
            Command::DisableWifi => handlers::handle_disable_wifi(&ctx).await,
            Command::EnableBt => handlers::handle_enable_bt(&ctx).await,
            Command::DisableBt => handlers::handle_disable_bt(&ctx).await,
            Command::GetFwVersion => handlers::handle_get_fw_version(&ctx).await,
            Command::GetCountryCode => handlers::handle_get_country_code(&ctx).await,
            Command::SetCountryCode { country, ieee80211d } => {
                handlers::handle_set_country_code(&ctx, country, *ieee80211d).await
            }
            Command::OtaUpdate { url } => handlers::handle_ota_update(&ctx, url).await,
            Command::Heartbeat { enable, duration } => {
                handlers::handle_heartbeat(&ctx, &mut self.session, enable, *duration).await
            }
            Command::SubscribeEvent { event } => handlers::handle_subscribe_event(&ctx, event).await,
            Command::UnsubscribeEvent { event } => {
                handlers::handle_unsubscribe_event(&ctx, event).await
            }
        };

        let elapsed = start.elapsed().as_millis();
        match &result {
            Ok(_) => debug!("  Command completed in {}ms", elapsed),
            Err(e) => warn!("  Command {} failed: {}", command.name(), e),
        }
        result
    }

    /// Execute and render the result as the message line the shell prints
    pub async fn execute_to_text(&mut self, command: &Command) -> String {
        let result = self.execute(command).await;
        legacy_text(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandError, CommandRequest, Outcome};
    use crate::ctrl::EmulatedControlLib;
    use crate::os::DryRunRunner;

    fn executor() -> CommandExecutor<EmulatedControlLib, DryRunRunner> {
        CommandExecutor::new(EmulatedControlLib::new(), DryRunRunner::new(), NetConfig::default())
    }

    fn parse(line: &str) -> Command {
        Command::try_from(&CommandRequest::parse_line(line).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_set_mode_bogus_end_to_end() {
        let mut exec = executor();
        exec.init().await.unwrap();

        let text = exec.execute_to_text(&parse("set_wifi_mode mode=bogus")).await;
        assert_eq!(text, "Invalid mode");
        assert_eq!(exec.lib().calls().await, vec!["init()"]);
    }

    #[tokio::test]
    async fn test_station_session() {
        let mut exec = executor();
        exec.init().await.unwrap();

        assert_eq!(exec.execute_to_text(&parse("set_wifi_mode mode=station")).await, "");
        assert_eq!(
            exec.execute_to_text(&parse(r#"connect_ap ssid=MyWifi pwd="MyWifiPass@123" band_mode=1"#)).await,
            "Connected to MyWifi"
        );
        assert_eq!(exec.execute_to_text(&parse("disconnect_ap reset_dhcp=no")).await, "");

        assert_eq!(exec.os().labels().await, vec!["dhcp_release", "dhcp_renew"]);
        assert_eq!(exec.lib().state().await.connected_ssid, None);
    }

    #[tokio::test]
    async fn test_heartbeat_state_is_per_session() {
        let mut first = executor();
        let mut second = executor();

        first.execute(&parse("heartbeat enable=yes duration=60")).await.unwrap();
        assert!(first.session().heartbeat_started);
        assert!(!second.session().heartbeat_started);

        // Second session never enabled it, so no disable call goes out
        assert_eq!(second.execute(&parse("heartbeat enable=no")).await, Ok(Outcome::Done));
        assert!(second.lib().calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_deinit_stops_running_heartbeat() {
        let mut exec = executor();
        exec.init().await.unwrap();
        exec.execute(&parse("heartbeat enable=1 duration=10")).await.unwrap();

        exec.deinit(true).await.unwrap();

        assert!(!exec.session().heartbeat_started);
        assert_eq!(
            exec.lib().calls().await,
            vec![
                "init()",
                "config_heartbeat(true, 10)",
                "config_heartbeat(false, 30)",
                "deinit()"
            ]
        );
    }

    #[tokio::test]
    async fn test_deinit_without_heartbeat_skips_disable() {
        let mut exec = executor();
        exec.init().await.unwrap();
        exec.deinit(true).await.unwrap();
        assert_eq!(exec.lib().calls().await, vec!["init()", "deinit()"]);
    }

    #[tokio::test]
    async fn test_init_failure_is_reported() {
        let exec = CommandExecutor::new(
            EmulatedControlLib::new().failing("init"),
            DryRunRunner::new(),
            NetConfig::default(),
        );
        assert!(exec.init().await.is_err());
    }

    #[tokio::test]
    async fn test_softap_session() {
        let mut exec = executor();
        let start = parse("start_softap ssid=ESPWifi pwd=ESPWifi@123 sec_prot=wpa2_psk max_conn=10 bw=20");

        assert_eq!(exec.execute(&start).await, Ok(Outcome::Info("SoftAP started".into())));
        assert_eq!(
            exec.execute(&parse("start_softap ssid=ESPWifi pwd=x max_conn=11")).await,
            Err(CommandError::validation("max connections should be 1 to 10(hardware_max)"))
        );
        assert_eq!(exec.execute_to_text(&parse("stop_softap")).await, "SoftAP stopped");
        assert_eq!(exec.os().labels().await, vec!["dhcp_server", "softap_up", "softap_down"]);
    }
}
