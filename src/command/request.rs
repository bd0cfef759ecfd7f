//! Command line parsing into typed commands

use super::{Command, CommandError, ConnectAp, StartSoftAp};
use hosted_shared::{defaults, limits, parse_bool, BoolInput};
use std::collections::BTreeMap;
use std::fmt;

/// Every command name the processor accepts
pub const COMMAND_NAMES: &[&str] = &[
    "get_wifi_mode",
    "set_wifi_mode",
    "get_mac_addr",
    "set_mac_addr",
    "get_ap_scan_list",
    "connect_ap",
    "get_connected_ap_info",
    "disconnect_ap",
    "softap_vendor_ie",
    "start_softap",
    "get_softap_info",
    "softap_connected_clients_info",
    "stop_softap",
    "get_wifi_powersave_mode",
    "set_wifi_powersave_mode",
    "set_wifi_max_tx_power",
    "get_wifi_curr_tx_power",
    "enable_wifi",
    "disable_wifi",
    "enable_bt",
    "disable_bt",
    "get_fw_version",
    "get_country_code",
    "set_country_code",
    "ota_update",
    "heartbeat",
    "subscribe_event",
    "unsubscribe_event",
];

/// A primitive parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl ParamValue {
    /// Classify an unquoted token.
    ///
    /// Only canonical integers become `Int`, so rendering a value back to
    /// text always gives what was typed (`01234567` stays a string).
    fn infer(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            if n.to_string() == raw {
                return ParamValue::Int(n);
            }
        }
        match raw {
            "true" => ParamValue::Bool(true),
            "false" => ParamValue::Bool(false),
            _ => ParamValue::Str(raw.to_string()),
        }
    }

    /// Loose boolean view, as understood by [`parse_bool`]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => parse_bool(BoolInput::Native(*b)),
            ParamValue::Int(n) => parse_bool(BoolInput::Text(&n.to_string())),
            ParamValue::Str(s) => parse_bool(BoolInput::Text(s)),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A command name plus named parameters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandRequest {
    pub name: String,
    pub params: BTreeMap<String, ParamValue>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    pub fn with(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Parse `name key=value key="quoted value" ...`
    pub fn parse_line(line: &str) -> Result<Self, CommandError> {
        Self::from_tokens(tokenize(line)?)
    }

    /// Build from already split arguments, one `key=value` per element.
    /// Values keep any whitespace the shell left in them.
    pub fn from_args<I, S>(args: I) -> Result<Self, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = args
            .into_iter()
            .map(|arg| Token { text: arg.into(), quoted: false })
            .collect();
        Self::from_tokens(tokens)
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, CommandError> {
        let mut iter = tokens.into_iter();
        let name = match iter.next() {
            Some(Token { text, .. }) => text,
            None => return Err(CommandError::validation("Empty command")),
        };

        let mut request = CommandRequest::new(name);
        for token in iter {
            let Some((key, raw)) = token.text.split_once('=') else {
                return Err(CommandError::validation(format!("Malformed parameter {}", token.text)));
            };
            let value = if token.quoted {
                ParamValue::Str(raw.to_string())
            } else {
                ParamValue::infer(raw)
            };
            request.params.insert(key.to_string(), value);
        }
        Ok(request)
    }

    fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    fn req_str(&self, key: &str) -> Result<String, CommandError> {
        self.get(key)
            .map(ToString::to_string)
            .ok_or_else(|| missing(key))
    }

    fn opt_str(&self, key: &str, default: &str) -> String {
        self.get(key)
            .map(ToString::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    fn req_int(&self, key: &str) -> Result<i64, CommandError> {
        match self.get(key) {
            Some(ParamValue::Int(n)) => Ok(*n),
            Some(ParamValue::Str(s)) => s.parse().map_err(|_| invalid(key)),
            Some(ParamValue::Bool(_)) => Err(invalid(key)),
            None => Err(missing(key)),
        }
    }

    fn opt_int(&self, key: &str, default: i64) -> Result<i64, CommandError> {
        match self.get(key) {
            None => Ok(default),
            Some(_) => self.req_int(key),
        }
    }

    fn opt_bool(&self, key: &str, default: bool) -> Result<bool, CommandError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.as_bool().ok_or_else(|| invalid(key)),
        }
    }
}

fn missing(key: &str) -> CommandError {
    CommandError::validation(format!("Missing parameter: {}", key))
}

fn invalid(key: &str) -> CommandError {
    CommandError::validation(format!("Invalid value for {}", key))
}

struct Token {
    text: String,
    /// Whether any part of the value was quoted
    quoted: bool,
}

fn tokenize(line: &str) -> Result<Vec<Token>, CommandError> {
    let mut tokens = Vec::new();
    let mut current: Option<Token> = None;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                let token = current.get_or_insert_with(|| Token { text: String::new(), quoted: false });
                token.quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if let Some(token) = current.take() {
                    tokens.push(token);
                }
            }
            c => {
                current
                    .get_or_insert_with(|| Token { text: String::new(), quoted: false })
                    .text
                    .push(c);
            }
        }
    }

    if in_quotes {
        return Err(CommandError::validation("Unterminated quote"));
    }
    if let Some(token) = current {
        tokens.push(token);
    }
    Ok(tokens)
}

impl TryFrom<&CommandRequest> for Command {
    type Error = CommandError;

    fn try_from(req: &CommandRequest) -> Result<Self, Self::Error> {
        let cmd = match req.name.as_str() {
            "get_wifi_mode" => Command::GetWifiMode,
            "set_wifi_mode" => Command::SetWifiMode { mode: req.req_str("mode")? },
            "get_mac_addr" => Command::GetMacAddr { mode: req.req_str("mode")? },
            "set_mac_addr" => Command::SetMacAddr {
                mode: req.req_str("mode")?,
                mac: req.req_str("mac")?,
            },
            "get_ap_scan_list" => Command::GetAvailableWifi,
            "connect_ap" => Command::ConnectAp(ConnectAp {
                ssid: req.req_str("ssid")?,
                pwd: req.opt_str("pwd", ""),
                bssid: req.opt_str("bssid", ""),
                use_wpa3: req.opt_bool("use_wpa3", false)?,
                listen_interval: req.opt_int("listen_interval", defaults::STATION_LISTEN_INTERVAL)?,
                set_dhcp: req.opt_bool("set_dhcp", true)?,
                band_mode: req.opt_int("band_mode", defaults::STATION_BAND_MODE as i64)?,
            }),
            "get_connected_ap_info" => Command::GetConnectedApInfo,
            "disconnect_ap" => Command::DisconnectAp {
                reset_dhcp: req.opt_bool("reset_dhcp", true)?,
            },
            "softap_vendor_ie" => Command::SoftApVendorIe {
                enable: req.req_str("enable")?,
                data: req.opt_str("data", ""),
            },
            "start_softap" => Command::StartSoftAp(StartSoftAp {
                ssid: req.req_str("ssid")?,
                pwd: req.opt_str("pwd", ""),
                channel: req.opt_int("channel", defaults::SOFTAP_CHANNEL)?,
                sec_prot: req.opt_str("sec_prot", "wpa2_psk"),
                max_conn: req.opt_int("max_conn", defaults::SOFTAP_MAX_CONN)?,
                hide_ssid: req.opt_bool("hide_ssid", false)?,
                bandwidth: req.opt_int("bw", defaults::SOFTAP_BANDWIDTH.mhz())?,
                start_dhcp_server: req.opt_bool("start_dhcp_server", true)?,
                band_mode: req.opt_int("band_mode", defaults::SOFTAP_BAND_MODE as i64)?,
            }),
            "get_softap_info" => Command::GetSoftApInfo,
            "softap_connected_clients_info" => Command::SoftApConnectedClientsInfo,
            "stop_softap" => Command::StopSoftAp,
            "get_wifi_powersave_mode" => Command::GetPowerSave,
            "set_wifi_powersave_mode" => Command::SetPowerSave { mode: req.req_str("mode")? },
            "set_wifi_max_tx_power" => Command::SetMaxTxPower {
                power: req.opt_int("power", defaults::WIFI_MAX_TX_POWER)?,
            },
            "get_wifi_curr_tx_power" => Command::GetCurrTxPower,
            "enable_wifi" => Command::EnableWifi,
            "disable_wifi" => Command::DisableWifi,
            "enable_bt" => Command::EnableBt,
            "disable_bt" => Command::DisableBt,
            "get_fw_version" => Command::GetFwVersion,
            "get_country_code" => Command::GetCountryCode,
            "set_country_code" => Command::SetCountryCode {
                country: req.opt_str("country", defaults::COUNTRY_CODE),
                ieee80211d: req.opt_bool("ieee80211d", false)?,
            },
            "ota_update" => Command::OtaUpdate { url: req.req_str("url")? },
            "heartbeat" => Command::Heartbeat {
                enable: req.get("enable").cloned().ok_or_else(|| missing("enable"))?,
                duration: req.opt_int("duration", limits::DEFAULT_HEARTBEAT_DURATION_SECS)?,
            },
            "subscribe_event" => Command::SubscribeEvent { event: req.req_str("event")? },
            "unsubscribe_event" => Command::UnsubscribeEvent { event: req.req_str("event")? },
            other => {
                return Err(CommandError::validation(format!("Unsupported command {}", other)));
            }
        };
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_infers_types() {
        let req = CommandRequest::parse_line(
            r#"start_softap ssid="My AP" pwd=12345678 max_conn=4 hide_ssid=false sec_prot=wpa2_psk"#,
        )
        .unwrap();

        assert_eq!(req.name, "start_softap");
        assert_eq!(req.params["ssid"], ParamValue::Str("My AP".into()));
        assert_eq!(req.params["pwd"], ParamValue::Int(12345678));
        assert_eq!(req.params["max_conn"], ParamValue::Int(4));
        assert_eq!(req.params["hide_ssid"], ParamValue::Bool(false));
        assert_eq!(req.params["sec_prot"], ParamValue::Str("wpa2_psk".into()));
    }

    #[test]
    fn test_quoted_numbers_stay_strings() {
        let req = CommandRequest::parse_line(r#"connect_ap ssid="42" pwd="""#).unwrap();
        assert_eq!(req.params["ssid"], ParamValue::Str("42".into()));
        assert_eq!(req.params["pwd"], ParamValue::Str(String::new()));
    }

    #[test]
    fn test_parse_line_errors() {
        assert_eq!(
            CommandRequest::parse_line("   ").unwrap_err(),
            CommandError::validation("Empty command")
        );
        assert_eq!(
            CommandRequest::parse_line("set_wifi_mode station").unwrap_err(),
            CommandError::validation("Malformed parameter station")
        );
        assert_eq!(
            CommandRequest::parse_line(r#"connect_ap ssid="open"#).unwrap_err(),
            CommandError::validation("Unterminated quote")
        );
    }

    #[test]
    fn test_connect_defaults() {
        let req = CommandRequest::new("connect_ap").with("ssid", ParamValue::Str("MyWifi".into()));
        let cmd = Command::try_from(&req).unwrap();
        assert_eq!(
            cmd,
            Command::ConnectAp(ConnectAp {
                ssid: "MyWifi".into(),
                pwd: String::new(),
                bssid: String::new(),
                use_wpa3: false,
                listen_interval: 3,
                set_dhcp: true,
                band_mode: 3,
            })
        );
    }

    #[test]
    fn test_numeric_string_parameters_are_accepted() {
        let req = CommandRequest::parse_line("connect_ap ssid=1234 pwd=87654321").unwrap();
        match Command::try_from(&req).unwrap() {
            Command::ConnectAp(c) => {
                assert_eq!(c.ssid, "1234");
                assert_eq!(c.pwd, "87654321");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_and_invalid_parameters() {
        let missing = Command::try_from(&CommandRequest::new("set_wifi_mode")).unwrap_err();
        assert_eq!(missing, CommandError::validation("Missing parameter: mode"));

        let req = CommandRequest::parse_line("start_softap ssid=ap max_conn=many").unwrap();
        assert_eq!(
            Command::try_from(&req).unwrap_err(),
            CommandError::validation("Invalid value for max_conn")
        );

        let req = CommandRequest::parse_line("disconnect_ap reset_dhcp=perhaps").unwrap();
        assert_eq!(
            Command::try_from(&req).unwrap_err(),
            CommandError::validation("Invalid value for reset_dhcp")
        );
    }

    #[test]
    fn test_heartbeat_keeps_raw_enable_value() {
        let req = CommandRequest::parse_line("heartbeat enable=yes").unwrap();
        assert_eq!(
            Command::try_from(&req).unwrap(),
            Command::Heartbeat {
                enable: ParamValue::Str("yes".into()),
                duration: limits::DEFAULT_HEARTBEAT_DURATION_SECS,
            }
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = Command::try_from(&CommandRequest::new("reboot")).unwrap_err();
        assert_eq!(err, CommandError::validation("Unsupported command reboot"));
    }

    #[test]
    fn test_all_names_parse() {
        for name in COMMAND_NAMES {
            let req = CommandRequest::new(*name)
                .with("mode", ParamValue::Str("station".into()))
                .with("mac", ParamValue::Str("aa:bb:cc:dd:ee:ff".into()))
                .with("ssid", ParamValue::Str("x".into()))
                .with("enable", ParamValue::Str("yes".into()))
                .with("url", ParamValue::Str("http://h/fw.bin".into()))
                .with("event", ParamValue::Str("all".into()));
            let cmd = Command::try_from(&req).unwrap();
            assert_eq!(cmd.name(), *name);
        }
    }

    #[test]
    fn test_digit_strings_keep_their_text() {
        let req = CommandRequest::parse_line("connect_ap ssid=home pwd=01234567").unwrap();
        match Command::try_from(&req).unwrap() {
            Command::ConnectAp(c) => assert_eq!(c.pwd, "01234567"),
            other => panic!("unexpected {:?}", other),
        }

        let req = CommandRequest::parse_line("set_country_code country=01").unwrap();
        assert_eq!(
            Command::try_from(&req).unwrap(),
            Command::SetCountryCode { country: "01".into(), ieee80211d: false }
        );

        let req = CommandRequest::parse_line("connect_ap ssid=+42 pwd=-0").unwrap();
        assert_eq!(req.params["ssid"], ParamValue::Str("+42".into()));
        assert_eq!(req.params["pwd"], ParamValue::Str("-0".into()));
    }

    #[test]
    fn test_padded_numbers_still_count_as_integers() {
        let req = CommandRequest::parse_line("start_softap ssid=ap pwd=12345678 channel=06").unwrap();
        match Command::try_from(&req).unwrap() {
            Command::StartSoftAp(ap) => assert_eq!(ap.channel, 6),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_padded_enable_values_are_not_booleans() {
        for raw in ["01", "+1", "00"] {
            let req = CommandRequest::parse_line(&format!("heartbeat enable={}", raw)).unwrap();
            match Command::try_from(&req).unwrap() {
                Command::Heartbeat { enable, .. } => assert_eq!(enable.as_bool(), None, "{}", raw),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_from_args_keeps_spaces_inside_values() {
        let req = CommandRequest::from_args(["connect_ap", "ssid=My AP", "pwd=pass word 1"]).unwrap();
        match Command::try_from(&req).unwrap() {
            Command::ConnectAp(c) => {
                assert_eq!(c.ssid, "My AP");
                assert_eq!(c.pwd, "pass word 1");
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(
            CommandRequest::from_args(Vec::<String>::new()).unwrap_err(),
            CommandError::validation("Empty command")
        );
        assert_eq!(
            CommandRequest::from_args(["set_wifi_mode", "station"]).unwrap_err(),
            CommandError::validation("Malformed parameter station")
        );
    }

    #[test]
    fn test_as_bool() {
        assert_eq!(ParamValue::Int(1).as_bool(), Some(true));
        assert_eq!(ParamValue::Int(0).as_bool(), Some(false));
        assert_eq!(ParamValue::Int(2).as_bool(), None);
        assert_eq!(ParamValue::Str("no".into()).as_bool(), Some(false));
        assert_eq!(ParamValue::Bool(true).as_bool(), Some(true));
    }
}
