// [libs/domain/summary-projector/src/drift.rs]
//! Drift is set when the latest two versions of a device's Config differ
//! in the structured summary fields. Callers project both the previous
//! and current `DeviceRecord` and pass the rows here; `Drift` status is
//! sticky (it must be re-applied by the caller on every read) until a new
//! upload overwrites the record with matching fields.

use crate::types::SummaryRow;

/// Compares the subset of fields the spec treats as drift-significant:
/// interface counts, VLAN membership, STP mode, and routing protocol mix.
/// Cosmetic-only fields (description strings, serials) do not trigger it.
pub fn detect_drift(previous: &SummaryRow, current: &SummaryRow) -> bool {
    previous.ifaces != current.ifaces
        || previous.vlan_count != current.vlan_count
        || previous.access_count != current.access_count
        || previous.trunk_count != current.trunk_count
        || previous.stp_mode != current.stp_mode
        || previous.rt_proto != current.rt_proto
        || previous.trunk_allowed_summary != current.trunk_allowed_summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceStatus, InterfaceCounts};

    fn row(vlan_count: u32) -> SummaryRow {
        SummaryRow {
            device_name: "core-sw1".into(),
            model: None,
            serial: None,
            os_ver: None,
            mgmt_ip: None,
            ifaces: InterfaceCounts::default(),
            access_count: 0,
            trunk_count: 0,
            unused_port_count: 0,
            vlan_count,
            native_vlan: None,
            trunk_allowed_summary: "—".into(),
            stp_mode: None,
            stp_role: None,
            ospf_neigh_count: 0,
            bgp_asn_neigh: None,
            rt_proto: "none".into(),
            cpu: None,
            mem: None,
            status: DeviceStatus::Ok,
        }
    }

    #[test]
    fn identical_rows_are_not_drift() {
        assert!(!detect_drift(&row(2), &row(2)));
    }

    #[test]
    fn vlan_count_change_is_drift() {
        assert!(detect_drift(&row(2), &row(3)));
    }
}
