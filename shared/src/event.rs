//! Asynchronous events the co-processor can report to the host

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

/// A single subscribable event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Event {
    EspInit,
    Heartbeat,
    StaConnectedToAp,
    StaDisconnectFromAp,
    StaConnectedToSoftAp,
    StaDisconnectFromSoftAp,
}

impl Event {
    /// Every event, in the order they are registered by `all`
    pub const ALL: [Event; 6] = [
        Event::EspInit,
        Event::Heartbeat,
        Event::StaConnectedToAp,
        Event::StaDisconnectFromAp,
        Event::StaConnectedToSoftAp,
        Event::StaDisconnectFromSoftAp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Event::EspInit => "esp_init",
            Event::Heartbeat => "heartbeat",
            Event::StaConnectedToAp => "sta_connected_to_ap",
            Event::StaDisconnectFromAp => "sta_disconnect_from_ap",
            Event::StaConnectedToSoftAp => "sta_connected_to_softap",
            Event::StaDisconnectFromSoftAp => "sta_disconnect_from_softap",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target of a subscribe/unsubscribe request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSelector {
    One(Event),
    All,
}

impl FromStr for EventSelector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(EventSelector::All);
        }
        Event::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .map(EventSelector::One)
            .ok_or_else(|| ParseError::Event(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_event_name_parses_back() {
        for event in Event::ALL {
            assert_eq!(event.name().parse(), Ok(EventSelector::One(event)));
        }
        assert_eq!("all".parse(), Ok(EventSelector::All));
    }

    #[test]
    fn test_unknown_event() {
        let err = "wifi_scan_done".parse::<EventSelector>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported event wifi_scan_done");
        assert!("ALL".parse::<EventSelector>().is_err());
    }
}
