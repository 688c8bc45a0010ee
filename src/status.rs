//! Radio status tracking: DL-RSSI hysteresis for the wireless backhaul
//! and the DFS channel table.

use crate::message::types::RadioStatus;

pub const BH_SIGNAL_RSSI_THRESHOLD_LOW: i8 = -75;
pub const BH_SIGNAL_RSSI_THRESHOLD_HIGH: i8 = -40;
pub const BH_SIGNAL_RSSI_THRESHOLD_HYSTERESIS: i8 = 5;

/// Classifies a backhaul downlink RSSI reading.
pub fn bh_status_for_rssi(rssi: i8) -> RadioStatus {
    if rssi < BH_SIGNAL_RSSI_THRESHOLD_LOW {
        RadioStatus::BhSignalTooLow
    } else if rssi < BH_SIGNAL_RSSI_THRESHOLD_HIGH {
        RadioStatus::BhSignalOk
    } else {
        RadioStatus::BhSignalTooHigh
    }
}

/// Applies the reporting hysteresis: a new reading only produces a status
/// update once it moved far enough from the last reported one.
pub fn apply_rssi_hysteresis(last_reported: Option<i8>, rssi: i8) -> Option<RadioStatus> {
    match last_reported {
        Some(last) if (last as i16 - rssi as i16).unsigned_abs() < BH_SIGNAL_RSSI_THRESHOLD_HYSTERESIS as u16 => {
            None
        }
        _ => Some(bh_status_for_rssi(rssi)),
    }
}

/// Channels subject to DFS radar avoidance in the 5 GHz band.
pub fn is_dfs_channel(channel: u8) -> bool {
    matches!(channel, 52..=64 | 100..=144)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rssi_classification() {
        assert_eq!(bh_status_for_rssi(-80), RadioStatus::BhSignalTooLow);
        assert_eq!(bh_status_for_rssi(-75), RadioStatus::BhSignalOk);
        assert_eq!(bh_status_for_rssi(-41), RadioStatus::BhSignalOk);
        assert_eq!(bh_status_for_rssi(-40), RadioStatus::BhSignalTooHigh);
    }

    #[test]
    fn hysteresis_suppresses_small_moves() {
        assert_eq!(apply_rssi_hysteresis(None, -60), Some(RadioStatus::BhSignalOk));
        assert_eq!(apply_rssi_hysteresis(Some(-60), -62), None);
        assert_eq!(
            apply_rssi_hysteresis(Some(-60), -80),
            Some(RadioStatus::BhSignalTooLow)
        );
    }

    #[test]
    fn dfs_channels() {
        assert!(is_dfs_channel(52));
        assert!(is_dfs_channel(144));
        assert!(!is_dfs_channel(36));
        assert!(!is_dfs_channel(149));
    }
}
