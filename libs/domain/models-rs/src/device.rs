// [libs/domain/models-rs/src/device.rs]
//! Normalized, vendor-agnostic structured representation of a single
//! device's parsed configuration. Numeric fields absent in the source
//! text are `null`, never zero; `"—"` placeholders are a presentation
//! concern and never stored here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    Cisco,
    Huawei,
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeviceRole {
    Core,
    Distribution,
    Access,
    Router,
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceOverview {
    pub hostname: Option<String>,
    pub model: Option<String>,
    pub os_version: Option<String>,
    pub serial_number: Option<String>,
    pub mgmt_ip: Option<String>,
    pub role: Option<DeviceRole>,
    pub uptime: Option<String>,
    pub cpu_utilization: Option<f64>,
    pub memory_usage: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PortMode {
    Access,
    Trunk,
    Unknown,
}

/// Allowed VLANs on a trunk port. Preserves the original textual form
/// (for download) while the normalized integer set is available via
/// [`AllowedVlans::expand`].
///
/// Serializes as the JSON string `"all"` for [`AllowedVlans::All`] (per
/// `spec.md` §4.4's tie-break: "emit the string \"all\" rather than an
/// unbounded list") or as a plain JSON array of ids for `List`; `derive`'s
/// `untagged` would serialize a unit variant as `null`, so this is a
/// hand-written impl instead.
#[derive(Debug, Clone)]
pub enum AllowedVlans {
    All,
    List(Vec<u32>),
}

impl Serialize for AllowedVlans {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AllowedVlans::All => serializer.serialize_str("all"),
            AllowedVlans::List(ids) => ids.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for AllowedVlans {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) if s.eq_ignore_ascii_case("all") => Ok(AllowedVlans::All),
            serde_json::Value::Array(_) => {
                serde_json::from_value(value).map(AllowedVlans::List).map_err(serde::de::Error::custom)
            }
            other => Err(serde::de::Error::custom(format!("invalid allowed_vlans value: {other}"))),
        }
    }
}

impl AllowedVlans {
    /// Expands ranges into a sorted, deduplicated set. `All` expands to
    /// the full 1..=4094 space per the spec's tie-break rule.
    pub fn expand(&self) -> Vec<u32> {
        match self {
            AllowedVlans::All => (1..=4094).collect(),
            AllowedVlans::List(ids) => {
                let mut ids = ids.clone();
                ids.sort_unstable();
                ids.dedup();
                ids
            }
        }
    }

    pub fn count(&self) -> usize {
        self.expand().len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfaceErrors {
    pub input: Option<u64>,
    pub output: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub interface_type: Option<String>,
    pub admin_status: Option<String>,
    pub oper_status: Option<String>,
    pub ipv4_address: Option<String>,
    pub port_mode: PortMode,
    pub access_vlan: Option<u32>,
    /// Defaults to 1 when a trunk carries no explicit native VLAN.
    pub native_vlan: Option<u32>,
    pub allowed_vlans: Option<AllowedVlans>,
    pub speed: Option<String>,
    pub duplex: Option<String>,
    pub poe_power: Option<f64>,
    pub description: Option<String>,
    pub stp_role: Option<String>,
    pub stp_state: Option<String>,
    pub stp_edged_port: Option<bool>,
    pub errors: InterfaceErrors,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VlanTable {
    pub vlan_list: Vec<u32>,
    pub vlan_names: std::collections::BTreeMap<u32, String>,
    pub vlan_status: std::collections::BTreeMap<u32, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StpState {
    pub mode: Option<String>,
    pub bridge_id: Option<String>,
    pub root_bridge_id: Option<String>,
    pub bridge_priority: Option<u32>,
    pub root_bridge_status: Option<bool>,
    pub portfast_enabled: Option<bool>,
    pub bpdu_guard: Option<bool>,
    pub port_roles: std::collections::BTreeMap<String, String>,
    pub port_states: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticRoute {
    pub prefix: String,
    pub next_hop: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OspfState {
    pub router_id: Option<String>,
    pub process_id: Option<String>,
    pub areas: Vec<String>,
    pub interfaces: Vec<String>,
    pub neighbors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EigrpState {
    pub as_number: Option<u32>,
    pub neighbors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BgpPeer {
    pub peer_address: String,
    pub remote_as: Option<u32>,
    pub prefixes_received: Option<u32>,
    pub prefixes_advertised: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BgpState {
    pub as_number: Option<u32>,
    pub router_id: Option<String>,
    pub peers: Vec<BgpPeer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingTable {
    pub static_routes: Vec<StaticRoute>,
    pub ospf: Option<OspfState>,
    pub eigrp: Option<EigrpState>,
    pub bgp: Option<BgpState>,
    pub rip_enabled: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NeighborProtocol {
    Cdp,
    Lldp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighbor {
    pub device_name: String,
    pub ip_address: Option<String>,
    pub platform: Option<String>,
    pub local_port: Option<String>,
    pub remote_port: Option<String>,
    pub capabilities: Option<String>,
    pub protocol: NeighborProtocol,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacEntry {
    pub mac_address: String,
    pub vlan: Option<u32>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArpEntry {
    pub ip_address: String,
    pub mac_address: Option<String>,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacArpTables {
    pub mac_table: Vec<MacEntry>,
    pub arp_table: Vec<ArpEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AaaConfig {
    pub authentication: Option<String>,
    pub authorization: Option<String>,
    pub accounting: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnmpConfig {
    pub enabled: bool,
    pub version: Option<String>,
    pub communities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NtpConfig {
    pub enabled: bool,
    pub synchronized: Option<bool>,
    pub stratum: Option<u8>,
    pub servers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityPosture {
    pub user_accounts: Vec<String>,
    pub aaa: AaaConfig,
    pub ssh_enabled: Option<bool>,
    pub snmp: SnmpConfig,
    pub ntp: NtpConfig,
    pub syslog_servers: Vec<String>,
    pub acls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EtherChannel {
    pub group_id: String,
    pub members: Vec<String>,
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HsrpGroup {
    pub group_id: String,
    pub virtual_ip: Option<String>,
    pub priority: Option<u16>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VrrpGroup {
    pub group_id: String,
    pub virtual_ip: Option<String>,
    pub priority: Option<u16>,
    pub is_master: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HaState {
    pub etherchannel: Vec<EtherChannel>,
    pub hsrp_groups: Vec<HsrpGroup>,
    pub vrrp_groups: Vec<VrrpGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub project_id: String,
    pub device_name: String,
    pub vendor: Vendor,
    pub parsed_at: DateTime<Utc>,
    /// The document version this record was derived from (weak back-reference).
    pub source_version: u32,
    pub device_overview: DeviceOverview,
    pub interfaces: Vec<Interface>,
    pub vlans: VlanTable,
    pub stp: StpState,
    pub routing: RoutingTable,
    pub neighbors: Vec<Neighbor>,
    pub mac_arp: MacArpTables,
    pub security: SecurityPosture,
    pub ha: HaState,
    /// Byte-for-byte preserved raw configuration text, for the Raw view.
    pub original_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_vlans_all_serializes_as_the_string_all() {
        let json = serde_json::to_value(AllowedVlans::All).unwrap();
        assert_eq!(json, serde_json::json!("all"));
    }

    #[test]
    fn allowed_vlans_list_serializes_as_an_array() {
        let json = serde_json::to_value(AllowedVlans::List(vec![10, 20, 30])).unwrap();
        assert_eq!(json, serde_json::json!([10, 20, 30]));
    }

    #[test]
    fn allowed_vlans_round_trips_through_json() {
        let all: AllowedVlans = serde_json::from_value(serde_json::json!("all")).unwrap();
        assert!(matches!(all, AllowedVlans::All));
        assert_eq!(all.count(), 4094);

        let list: AllowedVlans = serde_json::from_value(serde_json::json!([1, 2, 2, 1])).unwrap();
        assert_eq!(list.expand(), vec![1, 2]);
    }

    #[test]
    fn allowed_vlans_range_1_4094_counts_as_4094() {
        let ids: Vec<u32> = (1..=4094).collect();
        assert_eq!(AllowedVlans::List(ids).count(), 4094);
    }
}
