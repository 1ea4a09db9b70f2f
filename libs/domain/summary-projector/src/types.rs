// [libs/domain/summary-projector/src/types.rs]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceCounts {
    pub total: u32,
    pub up: u32,
    pub down: u32,
    pub admin_down: u32,
}

impl InterfaceCounts {
    /// `T/U/D/A` as the CSV export's `ifaces` column renders it.
    pub fn as_tuda(&self) -> String {
        format!("{}/{}/{}/{}", self.total, self.up, self.down, self.admin_down)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Ok,
    Drift,
    /// Carries a free-text reason, e.g. `"parser_partial: no hostname found"`.
    Warning(String),
}

impl DeviceStatus {
    pub fn as_text(&self) -> String {
        match self {
            DeviceStatus::Ok => "OK".to_string(),
            DeviceStatus::Drift => "Drift".to_string(),
            DeviceStatus::Warning(reason) => reason.clone(),
        }
    }
}

/// One row of the project-wide config summary table, as surfaced by
/// `GET /config-summary` and the CSV export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub device_name: String,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub os_ver: Option<String>,
    pub mgmt_ip: Option<String>,
    pub ifaces: InterfaceCounts,
    pub access_count: u32,
    pub trunk_count: u32,
    pub unused_port_count: u32,
    pub vlan_count: u32,
    pub native_vlan: Option<u32>,
    pub trunk_allowed_summary: String,
    pub stp_mode: Option<String>,
    pub stp_role: Option<String>,
    pub ospf_neigh_count: u32,
    pub bgp_asn_neigh: Option<String>,
    pub rt_proto: String,
    pub cpu: Option<f64>,
    pub mem: Option<f64>,
    pub status: DeviceStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleRollup {
    pub core: u32,
    pub distribution: u32,
    pub access: u32,
    pub router: u32,
    pub unknown: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthRollup {
    pub ok: u32,
    pub drift: u32,
    pub warning: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_devices: u32,
    pub by_role: RoleRollup,
    pub by_health: HealthRollup,
}
