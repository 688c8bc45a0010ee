//! IEEE 1905.1 CMDU framing.
//!
//! A CMDU is an 8-byte header followed by a list of TLVs, closed by the
//! end-of-message TLV. The header is network byte order, TLV lengths too.

use packed_struct::prelude::*;

use super::wire::WireError;

pub const CMDU_HEADER_LEN: usize = 8;
pub const TLV_HEADER_LEN: usize = 3;

/// 1905.1 message types handled by the slave. Everything else is rejected
/// at the dispatch layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageType {
    VendorSpecific,
    ApAutoconfigurationWsc,
    ChannelPreferenceQuery,
    ChannelPreferenceReport,
}

impl MessageType {
    pub fn to_wire(self) -> u16 {
        match self {
            MessageType::VendorSpecific => 0x0004,
            MessageType::ApAutoconfigurationWsc => 0x0009,
            MessageType::ChannelPreferenceQuery => 0x8004,
            MessageType::ChannelPreferenceReport => 0x8005,
        }
    }

    pub fn from_wire(v: u16) -> Option<MessageType> {
        match v {
            0x0004 => Some(MessageType::VendorSpecific),
            0x0009 => Some(MessageType::ApAutoconfigurationWsc),
            0x8004 => Some(MessageType::ChannelPreferenceQuery),
            0x8005 => Some(MessageType::ChannelPreferenceReport),
            _ => None,
        }
    }
}

/// 1905.1 and Multi-AP TLV type codes used by the slave.
pub mod tlv_type {
    pub const END_OF_MESSAGE: u8 = 0x00;
    pub const VENDOR_SPECIFIC: u8 = 0x0b;
    pub const WSC: u8 = 0x11;
    pub const AP_RADIO_IDENTIFIER: u8 = 0x82;
    pub const AP_RADIO_BASIC_CAPABILITIES: u8 = 0x85;
    pub const CHANNEL_PREFERENCE: u8 = 0x8b;
}

// byte 0      message version
// byte 1      reserved
// bytes 2..3  message type
// bytes 4..5  message id (mid)
// byte 6      fragment id
// byte 7      0x80 = last fragment, 0x40 = relay indicator
#[derive(PackedStruct, Debug, Default, Clone, Copy, PartialEq)]
#[packed_struct(bit_numbering = "msb0", endian = "msb")]
pub struct CmduHeaderPack {
    #[packed_field(bytes = "0")]
    pub message_version: u8,
    #[packed_field(bits = "8..=15")]
    pub _reserved: ReservedZero<packed_bits::Bits<8>>,
    #[packed_field(bytes = "2..=3")]
    pub message_type: u16,
    #[packed_field(bytes = "4..=5")]
    pub message_id: u16,
    #[packed_field(bytes = "6")]
    pub fragment_id: u8,
    #[packed_field(bits = "56")]
    pub last_fragment: bool,
    #[packed_field(bits = "57")]
    pub relay_indicator: bool,
    #[packed_field(bits = "58..=63")]
    pub _reserved2: ReservedZero<packed_bits::Bits<6>>,
}

/// A single type-length-value record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tlv {
    pub tlv_type: u8,
    pub value: Vec<u8>,
}

impl Tlv {
    pub fn new(tlv_type: u8, value: Vec<u8>) -> Tlv {
        Tlv { tlv_type, value }
    }
}

/// A decoded CMDU: header fields plus its TLV list (end-of-message
/// excluded).
#[derive(Clone, Debug, PartialEq)]
pub struct Cmdu {
    pub message_type: MessageType,
    pub mid: u16,
    pub tlvs: Vec<Tlv>,
}

impl Cmdu {
    pub fn new(message_type: MessageType, mid: u16) -> Cmdu {
        Cmdu {
            message_type,
            mid,
            tlvs: Vec::new(),
        }
    }

    pub fn push_tlv(&mut self, tlv: Tlv) -> &mut Self {
        self.tlvs.push(tlv);
        self
    }

    pub fn first_tlv_type(&self) -> Option<u8> {
        self.tlvs.first().map(|t| t.tlv_type)
    }

    pub fn serialize(&self) -> Vec<u8> {
        let header = CmduHeaderPack {
            message_type: self.message_type.to_wire(),
            message_id: self.mid,
            last_fragment: true,
            ..Default::default()
        };
        // pack() on a fully byte-mapped struct cannot fail
        let mut out = header.pack().expect("cmdu header pack").to_vec();
        for tlv in &self.tlvs {
            out.push(tlv.tlv_type);
            out.extend_from_slice(&(tlv.value.len() as u16).to_be_bytes());
            out.extend_from_slice(&tlv.value);
        }
        out.push(tlv_type::END_OF_MESSAGE);
        out.extend_from_slice(&0u16.to_be_bytes());
        out
    }

    pub fn parse(buf: &[u8]) -> Result<Cmdu, WireError> {
        if buf.len() < CMDU_HEADER_LEN {
            return Err(WireError::Truncated {
                needed: CMDU_HEADER_LEN,
                left: buf.len(),
            });
        }
        let mut header_raw = [0u8; CMDU_HEADER_LEN];
        header_raw.copy_from_slice(&buf[..CMDU_HEADER_LEN]);
        let header =
            CmduHeaderPack::unpack(&header_raw).map_err(|_| WireError::Invalid("cmdu header"))?;
        let message_type = MessageType::from_wire(header.message_type)
            .ok_or(WireError::Invalid("message type"))?;

        let mut tlvs = Vec::new();
        let mut pos = CMDU_HEADER_LEN;
        loop {
            if buf.len() < pos + TLV_HEADER_LEN {
                return Err(WireError::Truncated {
                    needed: TLV_HEADER_LEN,
                    left: buf.len() - pos,
                });
            }
            let tlv_type = buf[pos];
            let len = u16::from_be_bytes([buf[pos + 1], buf[pos + 2]]) as usize;
            pos += TLV_HEADER_LEN;
            if buf.len() < pos + len {
                return Err(WireError::Truncated {
                    needed: len,
                    left: buf.len() - pos,
                });
            }
            if tlv_type == tlv_type::END_OF_MESSAGE {
                break;
            }
            tlvs.push(Tlv::new(tlv_type, buf[pos..pos + len].to_vec()));
            pos += len;
        }

        Ok(Cmdu {
            message_type,
            mid: header.message_id,
            tlvs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_pack_layout() {
        let header = CmduHeaderPack {
            message_type: 0x8004,
            message_id: 0x1234,
            last_fragment: true,
            ..Default::default()
        };
        assert_eq!(
            header.pack().unwrap(),
            [0x00, 0x00, 0x80, 0x04, 0x12, 0x34, 0x00, 0x80]
        );
    }

    #[test]
    fn cmdu_round_trip() {
        let mut cmdu = Cmdu::new(MessageType::VendorSpecific, 7);
        cmdu.push_tlv(Tlv::new(tlv_type::VENDOR_SPECIFIC, vec![1, 2, 3]));
        let bytes = cmdu.serialize();
        let parsed = Cmdu::parse(&bytes).unwrap();
        assert_eq!(parsed, cmdu);
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        let mut cmdu = Cmdu::new(MessageType::VendorSpecific, 0);
        cmdu.push_tlv(Tlv::new(tlv_type::VENDOR_SPECIFIC, vec![]));
        let mut bytes = cmdu.serialize();
        // message type lives at bytes 2..4 of the header
        bytes[2] = 0x7f;
        bytes[3] = 0x7f;
        assert_eq!(
            Cmdu::parse(&bytes),
            Err(WireError::Invalid("message type"))
        );
    }

    #[test]
    fn missing_end_of_message_is_truncated() {
        let cmdu = Cmdu::new(MessageType::ChannelPreferenceQuery, 1);
        let mut bytes = cmdu.serialize();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            Cmdu::parse(&bytes),
            Err(WireError::Truncated { .. })
        ));
    }
}
