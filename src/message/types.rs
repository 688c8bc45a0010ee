//! Small domain types shared across the message catalogue.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 48-bit IEEE MAC address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const ZERO: MacAddr = MacAddr([0; 6]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for MacAddr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut oct = [0u8; 6];
        let mut parts = s.split(':');
        for slot in oct.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| format!("bad mac address `{s}`"))?;
            *slot =
                u8::from_str_radix(part, 16).map_err(|_| format!("bad mac address `{s}`"))?;
        }
        if parts.next().is_some() {
            return Err(format!("bad mac address `{s}`"));
        }
        Ok(MacAddr(oct))
    }
}

impl Serialize for MacAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MacAddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// WiFi security modes understood by the platform credential store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiSec {
    None,
    Wep64,
    Wep128,
    WpaPsk,
    Wpa2Psk,
    WpaWpa2Psk,
    Invalid,
}

impl WifiSec {
    /// Maps a platform security-type string onto the wire enum. Unknown
    /// strings map to `Invalid`; callers on the credential paths must treat
    /// that as a failure.
    pub fn from_platform_str(s: &str) -> WifiSec {
        match s {
            "None" => WifiSec::None,
            "WEP-64" => WifiSec::Wep64,
            "WEP-128" => WifiSec::Wep128,
            "WPA-Personal" => WifiSec::WpaPsk,
            "WPA2-Personal" => WifiSec::Wpa2Psk,
            "WPA-WPA2-Personal" => WifiSec::WpaWpa2Psk,
            _ => WifiSec::Invalid,
        }
    }

    pub fn to_wire(self) -> u32 {
        match self {
            WifiSec::None => 0,
            WifiSec::Wep64 => 1,
            WifiSec::Wep128 => 2,
            WifiSec::WpaPsk => 3,
            WifiSec::Wpa2Psk => 4,
            WifiSec::WpaWpa2Psk => 5,
            WifiSec::Invalid => 0xff,
        }
    }
}

/// Network interface kind tags carried in the config and on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IfaceKind {
    Unsupported,
    Wifi,
    WifiIntelDriver,
    Ethernet,
    GwBridge,
}

impl IfaceKind {
    pub fn to_wire(self) -> u8 {
        match self {
            IfaceKind::Unsupported => 0,
            IfaceKind::Wifi => 1,
            IfaceKind::WifiIntelDriver => 2,
            IfaceKind::Ethernet => 3,
            IfaceKind::GwBridge => 4,
        }
    }
}

/// Per-radio status reported to the platform adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RadioStatus {
    #[default]
    Off,
    ApOk,
    ApDfsCac,
    BhWired,
    BhScan,
    BhSignalTooLow,
    BhSignalOk,
    BhSignalTooHigh,
}

impl RadioStatus {
    pub fn to_wire(self) -> u8 {
        match self {
            RadioStatus::Off => 0,
            RadioStatus::ApOk => 1,
            RadioStatus::ApDfsCac => 2,
            RadioStatus::BhWired => 3,
            RadioStatus::BhScan => 4,
            RadioStatus::BhSignalTooLow => 5,
            RadioStatus::BhSignalOk => 6,
            RadioStatus::BhSignalTooHigh => 7,
        }
    }
}

/// Requested state transition for a network interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IfaceOperation {
    NoChange,
    Disable,
    Enable,
    Restore,
    Restart,
}

impl IfaceOperation {
    pub fn to_wire(self) -> u8 {
        match self {
            IfaceOperation::NoChange => 0,
            IfaceOperation::Disable => 1,
            IfaceOperation::Enable => 2,
            IfaceOperation::Restore => 3,
            IfaceOperation::Restart => 4,
        }
    }

    pub fn from_wire(v: u8) -> Option<IfaceOperation> {
        match v {
            0 => Some(IfaceOperation::NoChange),
            1 => Some(IfaceOperation::Disable),
            2 => Some(IfaceOperation::Enable),
            3 => Some(IfaceOperation::Restore),
            4 => Some(IfaceOperation::Restart),
            _ => None,
        }
    }
}

impl fmt::Display for IfaceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IfaceOperation::NoChange => "no_change",
            IfaceOperation::Disable => "disable",
            IfaceOperation::Enable => "enable",
            IfaceOperation::Restore => "restore",
            IfaceOperation::Restart => "restart",
        };
        f.write_str(name)
    }
}

/// Identifies which local module produced a relayed measurement.
pub mod entity {
    pub const MASTER: u8 = 0;
    pub const SLAVE: u8 = 1;
    pub const AP_MANAGER: u8 = 2;
    pub const BACKHAUL_MANAGER: u8 = 3;
    pub const MONITOR: u8 = 4;
    pub const PLATFORM_MANAGER: u8 = 5;
}

/// Logging-level change targets.
pub mod module {
    pub const ALL: u8 = 0;
    pub const SLAVE: u8 = 1;
    pub const MONITOR: u8 = 2;
    pub const PLATFORM: u8 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_round_trip() {
        let mac: MacAddr = "a0:b1:c2:00:1e:ff".parse().unwrap();
        assert_eq!(mac.0, [0xa0, 0xb1, 0xc2, 0x00, 0x1e, 0xff]);
        assert_eq!(mac.to_string(), "a0:b1:c2:00:1e:ff");
        assert!("a0:b1:c2:00:1e".parse::<MacAddr>().is_err());
        assert!("a0:b1:c2:00:1e:ff:00".parse::<MacAddr>().is_err());
    }

    #[test]
    fn unknown_security_string_is_invalid() {
        assert_eq!(WifiSec::from_platform_str("WPA2-Personal"), WifiSec::Wpa2Psk);
        assert_eq!(WifiSec::from_platform_str("WPA3-Enterprise"), WifiSec::Invalid);
    }
}
