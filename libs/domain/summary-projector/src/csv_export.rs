// [libs/domain/summary-projector/src/csv_export.rs]
//! CSV export: summary row keys in the same order the config-summary table
//! displays them, `ifaces` serialized as `T/U/D/A`, `status` as plain text.

use crate::types::SummaryRow;
use std::io;

const HEADER: &[&str] = &[
    "device_name",
    "model",
    "serial",
    "os_ver",
    "mgmt_ip",
    "ifaces",
    "access_count",
    "trunk_count",
    "unused_port_count",
    "vlan_count",
    "native_vlan",
    "trunk_allowed_summary",
    "stp_mode",
    "stp_role",
    "ospf_neigh_count",
    "bgp_asn_neigh",
    "rt_proto",
    "cpu",
    "mem",
    "status",
];

pub fn write_csv(rows: &[SummaryRow]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for row in rows {
        writer.write_record(&[
            row.device_name.clone(),
            row.model.clone().unwrap_or_else(|| "—".into()),
            row.serial.clone().unwrap_or_else(|| "—".into()),
            row.os_ver.clone().unwrap_or_else(|| "—".into()),
            row.mgmt_ip.clone().unwrap_or_else(|| "—".into()),
            row.ifaces.as_tuda(),
            row.access_count.to_string(),
            row.trunk_count.to_string(),
            row.unused_port_count.to_string(),
            row.vlan_count.to_string(),
            row.native_vlan.map(|v| v.to_string()).unwrap_or_else(|| "—".into()),
            row.trunk_allowed_summary.clone(),
            row.stp_mode.clone().unwrap_or_else(|| "—".into()),
            row.stp_role.clone().unwrap_or_else(|| "—".into()),
            row.ospf_neigh_count.to_string(),
            row.bgp_asn_neigh.clone().unwrap_or_else(|| "—".into()),
            row.rt_proto.clone(),
            row.cpu.map(|v| format!("{v:.1}")).unwrap_or_else(|| "—".into()),
            row.mem.map(|v| format!("{v:.1}")).unwrap_or_else(|| "—".into()),
            row.status.as_text(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceStatus, InterfaceCounts};

    #[test]
    fn renders_ifaces_as_tuda_and_status_as_text() {
        let row = SummaryRow {
            device_name: "core-sw1".into(),
            model: Some("C9300".into()),
            serial: None,
            os_ver: None,
            mgmt_ip: None,
            ifaces: InterfaceCounts { total: 4, up: 2, down: 1, admin_down: 1 },
            access_count: 2,
            trunk_count: 1,
            unused_port_count: 1,
            vlan_count: 2,
            native_vlan: Some(1),
            trunk_allowed_summary: "10,20".into(),
            stp_mode: Some("rapid-pvst".into()),
            stp_role: None,
            ospf_neigh_count: 0,
            bgp_asn_neigh: None,
            rt_proto: "none".into(),
            cpu: Some(12.5),
            mem: None,
            status: DeviceStatus::Drift,
        };
        let csv = write_csv(&[row]).unwrap();
        assert!(csv.contains("4/2/1/1"));
        assert!(csv.contains("Drift"));
    }
}
