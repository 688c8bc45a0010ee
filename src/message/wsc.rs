//! WiFi Simple Configuration attribute stream, as carried inside the WSC
//! TLV of AP-Autoconfiguration CMDUs.
//!
//! Attributes are `(id: u16, len: u16, data)` records in network byte
//! order. Only the subset the join engine touches is modelled; everything
//! else in an M2 is skipped over.

use super::types::MacAddr;
use super::wire::WireError;

pub mod attr {
    pub const AUTH_TYPE_FLAGS: u16 = 0x1004;
    pub const DEVICE_NAME: u16 = 0x1011;
    pub const ENCR_TYPE_FLAGS: u16 = 0x1010;
    pub const MAC_ADDR: u16 = 0x1020;
    pub const MANUFACTURER: u16 = 0x1021;
    pub const MESSAGE_TYPE: u16 = 0x1022;
    pub const MODEL_NAME: u16 = 0x1023;
    pub const MODEL_NUMBER: u16 = 0x1024;
    pub const PRIMARY_DEVICE_TYPE: u16 = 0x1054;
    pub const RF_BANDS: u16 = 0x103c;
    pub const SERIAL_NUMBER: u16 = 0x1042;
    pub const UUID_E: u16 = 0x1047;
    pub const VENDOR_EXTENSION: u16 = 0x1049;
    pub const VERSION: u16 = 0x104a;
}

pub const MSG_TYPE_M1: u8 = 0x04;
pub const MSG_TYPE_M2: u8 = 0x05;

pub const AUTH_OPEN: u16 = 0x0001;
pub const AUTH_WPA2: u16 = 0x0010;
pub const ENCR_NONE: u16 = 0x0001;

pub const RF_BAND_2GHZ: u8 = 0x01;
pub const RF_BAND_5GHZ: u8 = 0x02;

/// WFA vendor extension id and the Multi-AP subelement carrying the BSS
/// type bitmap.
pub const WFA_VENDOR_ID: [u8; 3] = [0x00, 0x37, 0x2a];
pub const MULTI_AP_EXTENSION_SUBELEMENT: u8 = 0x06;
pub const BSS_TYPE_FRONTHAUL: u8 = 0x20;
pub const BSS_TYPE_BACKHAUL: u8 = 0x40;

/// Primary device type: category "network infrastructure", sub-category
/// "access point".
pub const DEVICE_TYPE_NETWORK_INFRA_AP: [u8; 8] =
    [0x00, 0x06, 0x00, 0x50, 0xf2, 0x04, 0x00, 0x01];

/// Identity strings announced in the M1.
#[derive(Clone, Debug)]
pub struct M1Identity {
    pub mac: MacAddr,
    pub manufacturer: String,
    pub model_name: String,
    pub model_number: String,
    pub serial_number: String,
    pub device_name: String,
    pub rf_band: u8,
}

fn push_attr(out: &mut Vec<u8>, id: u16, data: &[u8]) {
    out.extend_from_slice(&id.to_be_bytes());
    out.extend_from_slice(&(data.len() as u16).to_be_bytes());
    out.extend_from_slice(data);
}

/// Builds the WSC M1 attribute stream. The enrolee nonce and public key
/// are left to the not-yet-wired encryption step, exactly as the
/// registration protocol tolerates for an open/unencrypted enrolee.
pub fn build_m1(identity: &M1Identity) -> Vec<u8> {
    let mut out = Vec::new();
    push_attr(&mut out, attr::VERSION, &[0x10]);
    push_attr(&mut out, attr::MESSAGE_TYPE, &[MSG_TYPE_M1]);
    push_attr(&mut out, attr::UUID_E, &[0xff; 16]);
    push_attr(&mut out, attr::MAC_ADDR, &identity.mac.0);
    push_attr(&mut out, attr::MANUFACTURER, identity.manufacturer.as_bytes());
    push_attr(&mut out, attr::MODEL_NAME, identity.model_name.as_bytes());
    push_attr(&mut out, attr::MODEL_NUMBER, identity.model_number.as_bytes());
    push_attr(&mut out, attr::SERIAL_NUMBER, identity.serial_number.as_bytes());
    push_attr(&mut out, attr::DEVICE_NAME, identity.device_name.as_bytes());
    push_attr(
        &mut out,
        attr::AUTH_TYPE_FLAGS,
        &(AUTH_OPEN | AUTH_WPA2).to_be_bytes(),
    );
    push_attr(&mut out, attr::ENCR_TYPE_FLAGS, &ENCR_NONE.to_be_bytes());
    push_attr(&mut out, attr::RF_BANDS, &[identity.rf_band]);
    push_attr(
        &mut out,
        attr::PRIMARY_DEVICE_TYPE,
        &DEVICE_TYPE_NETWORK_INFRA_AP,
    );

    let mut vendor_ext = WFA_VENDOR_ID.to_vec();
    vendor_ext.push(MULTI_AP_EXTENSION_SUBELEMENT);
    vendor_ext.push(1);
    vendor_ext.push(BSS_TYPE_FRONTHAUL | BSS_TYPE_BACKHAUL);
    push_attr(&mut out, attr::VENDOR_EXTENSION, &vendor_ext);

    out
}

/// The fields of a registrar M2 the join engine cares about.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct M2Summary {
    pub manufacturer: String,
}

/// Walks the attribute stream of a WSC TLV and extracts the M2 summary.
/// Returns an error when the stream is malformed or is not an M2.
pub fn parse_m2(value: &[u8]) -> Result<M2Summary, WireError> {
    let mut summary = M2Summary::default();
    let mut message_type = None;
    let mut pos = 0usize;
    while pos + 4 <= value.len() {
        let id = u16::from_be_bytes([value[pos], value[pos + 1]]);
        let len = u16::from_be_bytes([value[pos + 2], value[pos + 3]]) as usize;
        pos += 4;
        if value.len() < pos + len {
            return Err(WireError::Truncated {
                needed: len,
                left: value.len() - pos,
            });
        }
        let data = &value[pos..pos + len];
        pos += len;
        match id {
            attr::MESSAGE_TYPE => message_type = data.first().copied(),
            attr::MANUFACTURER => {
                summary.manufacturer = String::from_utf8(data.to_vec())
                    .map_err(|_| WireError::Invalid("manufacturer"))?;
            }
            _ => {}
        }
    }
    if pos != value.len() {
        return Err(WireError::Invalid("wsc attribute stream"));
    }
    match message_type {
        Some(MSG_TYPE_M2) => Ok(summary),
        _ => Err(WireError::Invalid("wsc message type")),
    }
}

/// Builds a minimal M2 attribute stream; used by the join-engine tests to
/// simulate the registrar.
pub fn build_m2(manufacturer: &str) -> Vec<u8> {
    let mut out = Vec::new();
    push_attr(&mut out, attr::VERSION, &[0x10]);
    push_attr(&mut out, attr::MESSAGE_TYPE, &[MSG_TYPE_M2]);
    push_attr(&mut out, attr::MANUFACTURER, manufacturer.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> M1Identity {
        M1Identity {
            mac: MacAddr([0xaa, 0, 0, 0, 0, 1]),
            manufacturer: "Intel".into(),
            model_name: "Ubuntu".into(),
            model_number: "18.04".into(),
            serial_number: "prpl12345".into(),
            device_name: "prplMesh-agent".into(),
            rf_band: RF_BAND_5GHZ,
        }
    }

    fn find_attr(stream: &[u8], wanted: u16) -> Option<Vec<u8>> {
        let mut pos = 0;
        while pos + 4 <= stream.len() {
            let id = u16::from_be_bytes([stream[pos], stream[pos + 1]]);
            let len = u16::from_be_bytes([stream[pos + 2], stream[pos + 3]]) as usize;
            pos += 4;
            if id == wanted {
                return Some(stream[pos..pos + len].to_vec());
            }
            pos += len;
        }
        None
    }

    #[test]
    fn m1_carries_the_announced_identity() {
        let m1 = build_m1(&identity());
        assert_eq!(find_attr(&m1, attr::MESSAGE_TYPE).unwrap(), [MSG_TYPE_M1]);
        assert_eq!(find_attr(&m1, attr::MANUFACTURER).unwrap(), b"Intel");
        assert_eq!(find_attr(&m1, attr::RF_BANDS).unwrap(), [RF_BAND_5GHZ]);
        assert_eq!(find_attr(&m1, attr::UUID_E).unwrap(), [0xff; 16]);
        assert_eq!(
            find_attr(&m1, attr::AUTH_TYPE_FLAGS).unwrap(),
            (AUTH_OPEN | AUTH_WPA2).to_be_bytes()
        );
        let ext = find_attr(&m1, attr::VENDOR_EXTENSION).unwrap();
        assert_eq!(&ext[..3], WFA_VENDOR_ID);
        assert_eq!(ext[5], BSS_TYPE_FRONTHAUL | BSS_TYPE_BACKHAUL);
    }

    #[test]
    fn m2_parse_extracts_manufacturer() {
        let m2 = build_m2("Intel");
        assert_eq!(parse_m2(&m2).unwrap().manufacturer, "Intel");
    }

    #[test]
    fn m1_is_not_an_m2() {
        let m1 = build_m1(&identity());
        assert_eq!(parse_m2(&m1), Err(WireError::Invalid("wsc message type")));
    }

    #[test]
    fn truncated_attribute_is_an_error() {
        let mut m2 = build_m2("Intel");
        m2.truncate(m2.len() - 2);
        assert!(parse_m2(&m2).is_err());
    }
}
