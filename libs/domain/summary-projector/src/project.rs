// [libs/domain/summary-projector/src/project.rs]
//! Projects a single [`DeviceRecord`] into its [`SummaryRow`]. Status is
//! always `OK` at this stage; drift detection (comparing against the
//! record's prior state) is the caller's responsibility — see
//! [`crate::drift::detect_drift`] — since this crate does not retain
//! history.

use crate::types::{DeviceStatus, InterfaceCounts, SummaryRow};
use meridian_domain_models::{DeviceRecord, PortMode};
use tracing::instrument;

#[instrument(skip(record), fields(device = %record.device_name))]
pub fn project_row(record: &DeviceRecord) -> SummaryRow {
    let mut ifaces = InterfaceCounts::default();
    let mut access_count = 0u32;
    let mut trunk_count = 0u32;
    let mut unused_port_count = 0u32;
    let mut native_vlan = None;
    let mut trunk_allowed_ids: Vec<u32> = Vec::new();

    for iface in &record.interfaces {
        ifaces.total += 1;
        match (iface.admin_status.as_deref(), iface.oper_status.as_deref()) {
            (Some("down"), _) => {
                ifaces.admin_down += 1;
                if iface.oper_status.as_deref() == Some("down") {
                    unused_port_count += 1;
                }
            }
            (_, Some("up")) => ifaces.up += 1,
            (_, Some("down")) => ifaces.down += 1,
            _ => {}
        }

        match iface.port_mode {
            PortMode::Access => access_count += 1,
            PortMode::Trunk => {
                trunk_count += 1;
                if native_vlan.is_none() {
                    native_vlan = iface.native_vlan;
                }
                if let Some(allowed) = &iface.allowed_vlans {
                    trunk_allowed_ids.extend(allowed.expand());
                }
            }
            PortMode::Unknown => {}
        }
    }
    trunk_allowed_ids.sort_unstable();
    trunk_allowed_ids.dedup();

    let trunk_allowed_summary = if trunk_allowed_ids.is_empty() {
        "—".to_string()
    } else if trunk_allowed_ids.len() > 8 {
        format!("{} VLANs", trunk_allowed_ids.len())
    } else {
        trunk_allowed_ids.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
    };

    let ospf_neigh_count = record
        .routing
        .ospf
        .as_ref()
        .map(|o| o.neighbors.len() as u32)
        .unwrap_or(0);

    let bgp_asn_neigh = record.routing.bgp.as_ref().map(|bgp| {
        let asn = bgp.as_number.map(|n| n.to_string()).unwrap_or_else(|| "—".to_string());
        format!("AS{} ({} peers)", asn, bgp.peers.len())
    });

    let mut rt_protos = Vec::new();
    if !record.routing.static_routes.is_empty() {
        rt_protos.push("static");
    }
    if record.routing.ospf.is_some() {
        rt_protos.push("ospf");
    }
    if record.routing.eigrp.is_some() {
        rt_protos.push("eigrp");
    }
    if record.routing.bgp.is_some() {
        rt_protos.push("bgp");
    }
    if record.routing.rip_enabled == Some(true) {
        rt_protos.push("rip");
    }
    let rt_proto = if rt_protos.is_empty() {
        "none".to_string()
    } else {
        rt_protos.join("+")
    };

    let status = if record.device_overview.hostname.is_none() && record.interfaces.is_empty() {
        DeviceStatus::Warning("parser_partial: no recognizable device data".to_string())
    } else {
        DeviceStatus::Ok
    };

    SummaryRow {
        device_name: record.device_name.clone(),
        model: record.device_overview.model.clone(),
        serial: record.device_overview.serial_number.clone(),
        os_ver: record.device_overview.os_version.clone(),
        mgmt_ip: record.device_overview.mgmt_ip.clone(),
        ifaces,
        access_count,
        trunk_count,
        unused_port_count,
        vlan_count: record.vlans.vlan_list.len() as u32,
        native_vlan,
        trunk_allowed_summary,
        stp_mode: record.stp.mode.clone(),
        stp_role: record.device_overview.role.map(|r| format!("{r:?}")),
        ospf_neigh_count,
        bgp_asn_neigh,
        rt_proto,
        cpu: record.device_overview.cpu_utilization,
        mem: record.device_overview.memory_usage,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_domain_models::*;
    use chrono::Utc;

    fn blank_record(name: &str) -> DeviceRecord {
        DeviceRecord {
            project_id: "p1".into(),
            device_name: name.into(),
            vendor: Vendor::Cisco,
            parsed_at: Utc::now(),
            source_version: 1,
            device_overview: DeviceOverview::default(),
            interfaces: Vec::new(),
            vlans: VlanTable::default(),
            stp: StpState::default(),
            routing: RoutingTable::default(),
            neighbors: Vec::new(),
            mac_arp: MacArpTables::default(),
            security: SecurityPosture::default(),
            ha: HaState::default(),
            original_content: String::new(),
        }
    }

    #[test]
    fn empty_record_yields_non_ok_status() {
        let row = project_row(&blank_record("ghost"));
        assert_ne!(row.status.as_text(), "OK");
        assert_eq!(row.ifaces, InterfaceCounts::default());
    }

    #[test]
    fn counts_access_and_trunk_ports() {
        let mut record = blank_record("sw1");
        record.device_overview.hostname = Some("sw1".into());
        record.interfaces.push(Interface {
            name: "Gi1/0/1".into(),
            interface_type: None,
            admin_status: Some("up".into()),
            oper_status: Some("up".into()),
            ipv4_address: None,
            port_mode: PortMode::Access,
            access_vlan: Some(10),
            native_vlan: None,
            allowed_vlans: None,
            speed: None,
            duplex: None,
            poe_power: None,
            description: None,
            stp_role: None,
            stp_state: None,
            stp_edged_port: None,
            errors: InterfaceErrors::default(),
        });
        let row = project_row(&record);
        assert_eq!(row.access_count, 1);
        assert_eq!(row.ifaces.up, 1);
        assert_eq!(row.status.as_text(), "OK");
    }
}
