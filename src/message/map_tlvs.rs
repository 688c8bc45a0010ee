//! Multi-AP TLVs used on the join path and for the channel preference
//! report.

use super::cmdu::{tlv_type, Tlv};
use super::types::MacAddr;
use super::wire::{Reader, WireError, Writer};

/// One operating-class entry of the radio basic capabilities.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperatingClassInfo {
    pub operating_class: u8,
    pub maximum_transmit_power_dbm: u8,
    pub statically_non_operable_channels: Vec<u8>,
}

/// AP radio basic capabilities announced in the WSC M1 CMDU.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApRadioBasicCapabilities {
    pub radio_uid: MacAddr,
    pub maximum_number_of_bsss_supported: u8,
    pub operating_classes: Vec<OperatingClassInfo>,
}

impl ApRadioBasicCapabilities {
    pub fn to_tlv(&self) -> Tlv {
        let mut w = Writer::new();
        w.mac(self.radio_uid);
        w.u8(self.maximum_number_of_bsss_supported);
        w.u8(self.operating_classes.len() as u8);
        for info in &self.operating_classes {
            w.u8(info.operating_class);
            w.u8(info.maximum_transmit_power_dbm);
            w.u8(info.statically_non_operable_channels.len() as u8);
            w.bytes(&info.statically_non_operable_channels);
        }
        Tlv::new(tlv_type::AP_RADIO_BASIC_CAPABILITIES, w.into_vec())
    }

    pub fn from_tlv_value(value: &[u8]) -> Result<Self, WireError> {
        let mut r = Reader::new(value);
        let radio_uid = r.mac()?;
        let max_bsss = r.u8()?;
        let count = r.u8()? as usize;
        let mut operating_classes = Vec::with_capacity(count);
        for _ in 0..count {
            let operating_class = r.u8()?;
            let maximum_transmit_power_dbm = r.u8()?;
            let channels = r.u8()? as usize;
            operating_classes.push(OperatingClassInfo {
                operating_class,
                maximum_transmit_power_dbm,
                statically_non_operable_channels: r.bytes(channels)?.to_vec(),
            });
        }
        Ok(ApRadioBasicCapabilities {
            radio_uid,
            maximum_number_of_bsss_supported: max_bsss,
            operating_classes,
        })
    }
}

/// AP radio identifier: the controller scopes M2 CMDUs with it.
pub fn radio_identifier_tlv(radio_uid: MacAddr) -> Tlv {
    Tlv::new(tlv_type::AP_RADIO_IDENTIFIER, radio_uid.0.to_vec())
}

pub fn parse_radio_identifier(value: &[u8]) -> Result<MacAddr, WireError> {
    Reader::new(value).mac()
}

/// One operating-class entry of a channel preference report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelPreferenceOperatingClass {
    pub operating_class: u8,
    pub channels: Vec<u8>,
    /// upper nibble preference, lower nibble reason code
    pub preference: u8,
    pub reason_code: u8,
}

/// Channel preference TLV for the CHANNEL_PREFERENCE_REPORT reply.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelPreference {
    pub radio_uid: MacAddr,
    pub operating_classes: Vec<ChannelPreferenceOperatingClass>,
}

impl ChannelPreference {
    pub fn to_tlv(&self) -> Tlv {
        let mut w = Writer::new();
        w.mac(self.radio_uid);
        w.u8(self.operating_classes.len() as u8);
        for entry in &self.operating_classes {
            w.u8(entry.operating_class);
            w.u8(entry.channels.len() as u8);
            w.bytes(&entry.channels);
            w.u8((entry.preference << 4) | (entry.reason_code & 0x0f));
        }
        Tlv::new(tlv_type::CHANNEL_PREFERENCE, w.into_vec())
    }

    pub fn from_tlv_value(value: &[u8]) -> Result<Self, WireError> {
        let mut r = Reader::new(value);
        let radio_uid = r.mac()?;
        let count = r.u8()? as usize;
        let mut operating_classes = Vec::with_capacity(count);
        for _ in 0..count {
            let operating_class = r.u8()?;
            let channels = r.u8()? as usize;
            let channels = r.bytes(channels)?.to_vec();
            let flags = r.u8()?;
            operating_classes.push(ChannelPreferenceOperatingClass {
                operating_class,
                channels,
                preference: flags >> 4,
                reason_code: flags & 0x0f,
            });
        }
        Ok(ChannelPreference {
            radio_uid,
            operating_classes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radio_basic_capabilities_round_trip() {
        let caps = ApRadioBasicCapabilities {
            radio_uid: MacAddr([0, 1, 2, 3, 4, 5]),
            maximum_number_of_bsss_supported: 4,
            operating_classes: vec![
                OperatingClassInfo {
                    operating_class: 81,
                    maximum_transmit_power_dbm: 20,
                    statically_non_operable_channels: vec![13, 14],
                },
                OperatingClassInfo {
                    operating_class: 115,
                    maximum_transmit_power_dbm: 23,
                    statically_non_operable_channels: vec![],
                },
            ],
        };
        let tlv = caps.to_tlv();
        assert_eq!(tlv.tlv_type, tlv_type::AP_RADIO_BASIC_CAPABILITIES);
        assert_eq!(
            ApRadioBasicCapabilities::from_tlv_value(&tlv.value).unwrap(),
            caps
        );
    }

    #[test]
    fn channel_preference_flags_nibbles() {
        let pref = ChannelPreference {
            radio_uid: MacAddr([9; 6]),
            operating_classes: vec![ChannelPreferenceOperatingClass {
                operating_class: 80,
                channels: vec![36, 38, 40],
                preference: 15,
                reason_code: 0,
            }],
        };
        let tlv = pref.to_tlv();
        assert_eq!(*tlv.value.last().unwrap(), 0xf0);
        assert_eq!(ChannelPreference::from_tlv_value(&tlv.value).unwrap(), pref);
    }
}
