// [libs/domain/summary-projector/src/dashboard.rs]
//! Rolls project-wide summary rows up into the dashboard totals: counts by
//! role (requires the source `DeviceRecord`s for role, since `SummaryRow`
//! doesn't carry the raw enum) and counts by health status.

use crate::types::{DashboardMetrics, DeviceStatus, HealthRollup, RoleRollup, SummaryRow};
use meridian_domain_models::DeviceRole;

pub fn rollup(rows: &[SummaryRow], roles: &[DeviceRole]) -> DashboardMetrics {
    let mut by_role = RoleRollup::default();
    for role in roles {
        match role {
            DeviceRole::Core => by_role.core += 1,
            DeviceRole::Distribution => by_role.distribution += 1,
            DeviceRole::Access => by_role.access += 1,
            DeviceRole::Router => by_role.router += 1,
            DeviceRole::Unknown => by_role.unknown += 1,
        }
    }

    let mut by_health = HealthRollup::default();
    for row in rows {
        match &row.status {
            DeviceStatus::Ok => by_health.ok += 1,
            DeviceStatus::Drift => by_health.drift += 1,
            DeviceStatus::Warning(_) => by_health.warning += 1,
        }
    }

    DashboardMetrics {
        total_devices: rows.len() as u32,
        by_role,
        by_health,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InterfaceCounts;

    fn row(status: DeviceStatus) -> SummaryRow {
        SummaryRow {
            device_name: "d".into(),
            model: None,
            serial: None,
            os_ver: None,
            mgmt_ip: None,
            ifaces: InterfaceCounts::default(),
            access_count: 0,
            trunk_count: 0,
            unused_port_count: 0,
            vlan_count: 0,
            native_vlan: None,
            trunk_allowed_summary: "—".into(),
            stp_mode: None,
            stp_role: None,
            ospf_neigh_count: 0,
            bgp_asn_neigh: None,
            rt_proto: "none".into(),
            cpu: None,
            mem: None,
            status,
        }
    }

    #[test]
    fn rolls_up_health_and_role_counts() {
        let rows = vec![row(DeviceStatus::Ok), row(DeviceStatus::Drift)];
        let roles = vec![DeviceRole::Core, DeviceRole::Access];
        let metrics = rollup(&rows, &roles);
        assert_eq!(metrics.total_devices, 2);
        assert_eq!(metrics.by_health.ok, 1);
        assert_eq!(metrics.by_health.drift, 1);
        assert_eq!(metrics.by_role.core, 1);
        assert_eq!(metrics.by_role.access, 1);
    }
}
