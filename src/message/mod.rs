//! Wire model: CMDU framing, vendor-specific messages, Multi-AP TLVs and
//! the WSC attribute stream.

pub mod cmdu;
pub mod map_tlvs;
pub mod payloads;
pub mod types;
pub mod vendor;
pub mod wire;
pub mod wsc;

pub use cmdu::{Cmdu, MessageType, Tlv};
pub use types::MacAddr;
pub use vendor::{Action, VsHeader};
pub use wire::{Wire, WireError};
