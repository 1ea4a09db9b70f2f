// [libs/domain/device-parser/src/cisco.rs]
//! Cisco IOS/IOS-XE/NX-OS extraction. Operates on the raw text of either a
//! `show running-config` dump or a handful of `show` command outputs
//! concatenated together, which is how these files arrive in practice.

use crate::common::{classify_role, expand_vlan_ranges, is_neighbor_header_artifact};
use meridian_domain_models::{
    AaaConfig, ArpEntry, BgpPeer, BgpState, DeviceOverview, EigrpState, EtherChannel, HaState,
    HsrpGroup, Interface, InterfaceErrors, MacArpTables, MacEntry, Neighbor, NeighborProtocol,
    NtpConfig, OspfState, PortMode, RoutingTable, SecurityPosture, SnmpConfig, StaticRoute,
    StpState, VlanTable, VrrpGroup,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static HOSTNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^hostname\s+(\S+)").unwrap());
static SERIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^(?:Processor board ID|System [Ss]erial [Nn]umber)\s*:?\s*(\S+)").unwrap());
static OS_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Cisco IOS Software|IOS \(tm\)).{0,80}?[Vv]ersion\s+([0-9A-Za-z().]+)").unwrap()
});
static MODEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^[Cc]isco\s+(\S+)\s+\([^)]*\)\s+processor").unwrap());
static UPTIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)uptime is (.+)").unwrap());
static CPU: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)CPU utilization.*?(\d+)% (?:one|five) minute").unwrap());
static MEM_USED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Processor\s+Pool\s+Total:\s*(\d+)\s+Used:\s*(\d+)").unwrap());
static INTERFACE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^interface\s+(\S+)").unwrap());
static VLAN_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^vlan\s+(\d+)\s*$").unwrap());
static VLAN_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*name\s+(\S+)").unwrap());
static SPANNING_TREE_MODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^spanning-tree mode\s+(\S+)").unwrap());
static OSPF_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^router ospf\s+(\d+)").unwrap());
static OSPF_ROUTER_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*router-id\s+(\S+)").unwrap());
static OSPF_NETWORK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*network\s+\S+\s+\S+\s+area\s+(\S+)").unwrap());
static BGP_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^router bgp\s+(\d+)").unwrap());
static BGP_NEIGHBOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*neighbor\s+(\S+)\s+remote-as\s+(\d+)").unwrap());
static STATIC_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^ip route\s+(\S+\s+\S+)\s+(\S+)").unwrap());
static CDP_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(\S+)\s+.*?\s+(\S+)\s+\d+\s+(?:S|R|[A-Z])+\s+(\S+)\s+(\S+)").unwrap()
});
static MAC_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(\d+)\s+([0-9a-fA-F.:]{12,17})\s+\S+\s+(\S+)").unwrap());
static ARP_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^Internet\s+(\S+)\s+\S+\s+([0-9a-fA-F.]{14})\s+\S+\s+(\S+)").unwrap()
});

pub fn parse_overview(raw: &str, device_name: &str) -> DeviceOverview {
    let hostname = HOSTNAME.captures(raw).map(|c| c[1].to_string());
    let serial_number = SERIAL.captures(raw).map(|c| c[1].to_string());
    let os_version = OS_VERSION.captures(raw).map(|c| c[1].to_string());
    let model = MODEL.captures(raw).map(|c| c[1].to_string());
    let uptime = UPTIME.captures(raw).map(|c| c[1].trim().to_string());
    let cpu_utilization = CPU.captures(raw).and_then(|c| c[1].parse::<f64>().ok());
    let memory_usage = MEM_USED.captures(raw).and_then(|c| {
        let total: f64 = c[1].parse().ok()?;
        let used: f64 = c[2].parse().ok()?;
        if total > 0.0 {
            Some((used / total) * 100.0)
        } else {
            None
        }
    });
    let mgmt_ip = find_management_ip(raw);

    DeviceOverview {
        hostname,
        model,
        os_version,
        serial_number,
        mgmt_ip,
        role: Some(classify_role(device_name)),
        uptime,
        cpu_utilization,
        memory_usage,
    }
}

fn find_management_ip(raw: &str) -> Option<String> {
    let loopback_ip = Regex::new(r"(?m)^interface Loopback\d+\s*\n(?:\s+.*\n)*?\s*ip address\s+(\S+)")
        .ok()?
        .captures(raw)
        .map(|c| c[1].to_string());
    if loopback_ip.is_some() {
        return loopback_ip;
    }
    Regex::new(r"(?m)^interface Vlan1\s*\n(?:\s+.*\n)*?\s*ip address\s+(\S+)")
        .ok()?
        .captures(raw)
        .map(|c| c[1].to_string())
}

/// Splits the config into `interface X ... !` blocks and extracts the
/// per-port fields the spec requires.
pub fn parse_interfaces(raw: &str) -> Vec<Interface> {
    let mut interfaces = Vec::new();
    let headers: Vec<_> = INTERFACE_HEADER.captures_iter(raw).collect();
    for (idx, capture) in headers.iter().enumerate() {
        let name = capture[1].to_string();
        let start = capture.get(0).unwrap().end();
        let end = headers
            .get(idx + 1)
            .map(|next| next.get(0).unwrap().start())
            .unwrap_or(raw.len());
        let block = &raw[start..end.min(raw.len())];
        interfaces.push(parse_interface_block(&name, block));
    }
    interfaces
}

fn parse_interface_block(name: &str, block: &str) -> Interface {
    let description = first_capture(block, r"(?m)^\s*description\s+(.+)$");
    let admin_status = if block.contains("shutdown") {
        Some("down".to_string())
    } else {
        Some("up".to_string())
    };
    let oper_status = admin_status.clone();
    let ipv4_address = first_capture(block, r"(?m)^\s*ip address\s+(\S+\s+\S+)");

    let is_trunk = block.contains("switchport mode trunk");
    let is_access = block.contains("switchport mode access");
    let port_mode = if is_trunk {
        PortMode::Trunk
    } else if is_access {
        PortMode::Access
    } else {
        PortMode::Unknown
    };

    let access_vlan = first_capture(block, r"(?m)^\s*switchport access vlan\s+(\d+)")
        .and_then(|s| s.parse().ok());

    let native_vlan = if is_trunk {
        Some(
            first_capture(block, r"(?m)^\s*switchport trunk native vlan\s+(\d+)")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
        )
    } else {
        None
    };

    let allowed_vlans = if is_trunk {
        parse_allowed_vlans(block)
    } else {
        None
    };

    let speed = first_capture(block, r"(?m)^\s*speed\s+(\S+)");
    let duplex = first_capture(block, r"(?m)^\s*duplex\s+(\S+)");
    let stp_edged_port = Some(block.contains("spanning-tree portfast"));

    Interface {
        name: name.to_string(),
        interface_type: infer_interface_type(name),
        admin_status,
        oper_status,
        ipv4_address,
        port_mode,
        access_vlan,
        native_vlan,
        allowed_vlans,
        speed,
        duplex,
        poe_power: None,
        description,
        stp_role: None,
        stp_state: None,
        stp_edged_port,
        errors: InterfaceErrors::default(),
    }
}

fn parse_allowed_vlans(block: &str) -> Option<meridian_domain_models::AllowedVlans> {
    use meridian_domain_models::AllowedVlans;
    let raw = first_capture(block, r"(?m)^\s*switchport trunk allowed vlan\s+(\S+)")?;
    if raw.eq_ignore_ascii_case("all") {
        Some(AllowedVlans::All)
    } else {
        Some(AllowedVlans::List(expand_vlan_ranges(&raw)))
    }
}

fn infer_interface_type(name: &str) -> Option<String> {
    let lower = name.to_ascii_lowercase();
    let kind = if lower.starts_with("gigabitethernet") || lower.starts_with("gi") {
        "GigabitEthernet"
    } else if lower.starts_with("tengigabitethernet") || lower.starts_with("te") {
        "TenGigabitEthernet"
    } else if lower.starts_with("vlan") {
        "SVI"
    } else if lower.starts_with("loopback") {
        "Loopback"
    } else if lower.starts_with("port-channel") {
        "PortChannel"
    } else {
        return None;
    };
    Some(kind.to_string())
}

pub fn parse_vlans(raw: &str) -> VlanTable {
    let mut vlan_list = Vec::new();
    let mut vlan_names = BTreeMap::new();
    let vlan_status = BTreeMap::new();

    for capture in VLAN_LINE.captures_iter(raw) {
        if let Ok(id) = capture[1].parse::<u32>() {
            vlan_list.push(id);
            let tail_start = capture.get(0).unwrap().end();
            let tail_end = raw[tail_start..].find("\nvlan ").map(|p| tail_start + p).unwrap_or(raw.len());
            if let Some(name_capture) = VLAN_NAME.captures(&raw[tail_start..tail_end]) {
                vlan_names.insert(id, name_capture[1].to_string());
            }
        }
    }
    vlan_list.sort_unstable();
    vlan_list.dedup();

    VlanTable {
        vlan_list,
        vlan_names,
        vlan_status,
    }
}

pub fn parse_stp(raw: &str) -> StpState {
    let mode = SPANNING_TREE_MODE.captures(raw).map(|c| c[1].to_string());
    let bridge_id = first_capture(raw, r"(?mi)Bridge ID\s+Priority\s+\d+\s+\(?.*?address\s+(\S+)");
    let root_bridge_id = first_capture(raw, r"(?mi)Root ID\s+Priority\s+\d+\s+Address\s+(\S+)");
    let root_bridge_status = Some(raw.contains("This bridge is the root"));
    let portfast_enabled = Some(raw.contains("spanning-tree portfast default") || raw.contains("spanning-tree portfast\n"));
    let bpdu_guard = Some(raw.contains("spanning-tree portfast bpduguard default"));

    StpState {
        mode,
        bridge_id,
        root_bridge_id,
        bridge_priority: None,
        root_bridge_status,
        portfast_enabled,
        bpdu_guard,
        port_roles: BTreeMap::new(),
        port_states: BTreeMap::new(),
    }
}

pub fn parse_routing(raw: &str) -> RoutingTable {
    let static_routes = STATIC_ROUTE
        .captures_iter(raw)
        .map(|c| StaticRoute {
            prefix: c[1].to_string(),
            next_hop: c[2].to_string(),
        })
        .collect();

    let ospf = OSPF_BLOCK.captures(raw).map(|c| {
        let process_id = Some(c[1].to_string());
        let router_id = OSPF_ROUTER_ID.captures(raw).map(|rc| rc[1].to_string());
        let areas: Vec<String> = OSPF_NETWORK
            .captures_iter(raw)
            .map(|nc| nc[1].to_string())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        OspfState {
            router_id,
            process_id,
            areas,
            interfaces: Vec::new(),
            neighbors: Vec::new(),
        }
    });

    let bgp = BGP_BLOCK.captures(raw).map(|c| {
        let as_number = c[1].parse().ok();
        let peers = BGP_NEIGHBOR
            .captures_iter(raw)
            .map(|nc| BgpPeer {
                peer_address: nc[1].to_string(),
                remote_as: nc[2].parse().ok(),
                prefixes_received: None,
                prefixes_advertised: None,
            })
            .collect();
        BgpState {
            as_number,
            router_id: None,
            peers,
        }
    });

    RoutingTable {
        static_routes,
        ospf,
        eigrp: parse_eigrp(raw),
        bgp,
        rip_enabled: Some(raw.contains("router rip")),
    }
}

fn parse_eigrp(raw: &str) -> Option<EigrpState> {
    let as_number = first_capture(raw, r"(?m)^router eigrp\s+(\d+)")?.parse().ok();
    Some(EigrpState {
        as_number,
        neighbors: Vec::new(),
    })
}

/// Parses `show cdp neighbors detail` / `show lldp neighbors detail` style
/// output, filtering header-row artifacts.
pub fn parse_neighbors(raw: &str) -> Vec<Neighbor> {
    let protocol = if raw.contains("show lldp") || raw.contains("LLDP") {
        NeighborProtocol::Lldp
    } else {
        NeighborProtocol::Cdp
    };

    CDP_ENTRY
        .captures_iter(raw)
        .filter_map(|c| {
            let device_name = c[1].to_string();
            if is_neighbor_header_artifact(&device_name) {
                return None;
            }
            Some(Neighbor {
                device_name,
                ip_address: None,
                platform: Some(c[2].to_string()),
                local_port: Some(c[3].to_string()),
                remote_port: Some(c[4].to_string()),
                capabilities: None,
                protocol,
            })
        })
        .collect()
}

pub fn parse_mac_arp(raw: &str) -> MacArpTables {
    let mac_table = MAC_ENTRY
        .captures_iter(raw)
        .map(|c| MacEntry {
            mac_address: c[2].to_string(),
            vlan: c[1].parse().ok(),
            port: Some(c[3].to_string()),
        })
        .collect();

    let arp_table = ARP_ENTRY
        .captures_iter(raw)
        .map(|c| ArpEntry {
            ip_address: c[1].to_string(),
            mac_address: Some(c[2].to_string()),
            interface: Some(c[3].to_string()),
        })
        .collect();

    MacArpTables { mac_table, arp_table }
}

pub fn parse_security(raw: &str) -> SecurityPosture {
    let user_accounts = Regex::new(r"(?m)^username\s+(\S+)")
        .unwrap()
        .captures_iter(raw)
        .map(|c| c[1].to_string())
        .collect();

    let aaa = AaaConfig {
        authentication: first_capture(raw, r"(?m)^aaa authentication\s+(.+)$"),
        authorization: first_capture(raw, r"(?m)^aaa authorization\s+(.+)$"),
        accounting: first_capture(raw, r"(?m)^aaa accounting\s+(.+)$"),
    };

    let ssh_enabled = Some(raw.contains("ip ssh") || raw.contains("transport input ssh"));

    let snmp = SnmpConfig {
        enabled: raw.contains("snmp-server"),
        version: first_capture(raw, r"(?m)^snmp-server\s+(?:community|version)\s+(\S+)"),
        communities: Regex::new(r"(?m)^snmp-server community\s+(\S+)")
            .unwrap()
            .captures_iter(raw)
            .map(|c| c[1].to_string())
            .collect(),
    };

    let ntp = NtpConfig {
        enabled: raw.contains("ntp server"),
        synchronized: None,
        stratum: None,
        servers: Regex::new(r"(?m)^ntp server\s+(\S+)")
            .unwrap()
            .captures_iter(raw)
            .map(|c| c[1].to_string())
            .collect(),
    };

    let syslog_servers = Regex::new(r"(?m)^logging host\s+(\S+)")
        .unwrap()
        .captures_iter(raw)
        .map(|c| c[1].to_string())
        .collect();

    let acls = Regex::new(r"(?m)^ip access-list \S+\s+(\S+)")
        .unwrap()
        .captures_iter(raw)
        .map(|c| c[1].to_string())
        .collect();

    SecurityPosture {
        user_accounts,
        aaa,
        ssh_enabled,
        snmp,
        ntp,
        syslog_servers,
        acls,
    }
}

pub fn parse_ha(raw: &str) -> HaState {
    let etherchannel = Regex::new(r"(?m)^interface Port-channel(\d+)")
        .unwrap()
        .captures_iter(raw)
        .map(|c| EtherChannel {
            group_id: c[1].to_string(),
            members: Vec::new(),
            protocol: None,
        })
        .collect();

    let hsrp_groups = Regex::new(r"(?m)^\s*standby\s+(\d+)\s+ip\s+(\S+)")
        .unwrap()
        .captures_iter(raw)
        .map(|c| HsrpGroup {
            group_id: c[1].to_string(),
            virtual_ip: Some(c[2].to_string()),
            priority: None,
            is_active: None,
        })
        .collect();

    let vrrp_groups = Regex::new(r"(?m)^\s*vrrp\s+(\d+)\s+ip\s+(\S+)")
        .unwrap()
        .captures_iter(raw)
        .map(|c| VrrpGroup {
            group_id: c[1].to_string(),
            virtual_ip: Some(c[2].to_string()),
            priority: None,
            is_master: None,
        })
        .collect();

    HaState {
        etherchannel,
        hsrp_groups,
        vrrp_groups,
    }
}

fn first_capture(raw: &str, pattern: &str) -> Option<String> {
    Regex::new(pattern).ok()?.captures(raw).map(|c| c[1].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
hostname core-sw1
!
vlan 10
 name USERS
vlan 20
 name VOICE
!
interface GigabitEthernet1/0/24
 description uplink to dist-sw2
 switchport mode trunk
 switchport trunk native vlan 1
 switchport trunk allowed vlan 10,20
!
interface GigabitEthernet1/0/1
 switchport mode access
 switchport access vlan 10
!
spanning-tree mode rapid-pvst
router ospf 1
 router-id 10.0.0.1
 network 10.0.0.0 0.0.0.255 area 0
"#;

    #[test]
    fn parses_hostname_and_vlans() {
        let overview = parse_overview(SAMPLE, "core-sw1");
        assert_eq!(overview.hostname.as_deref(), Some("core-sw1"));

        let vlans = parse_vlans(SAMPLE);
        assert_eq!(vlans.vlan_list, vec![10, 20]);
        assert_eq!(vlans.vlan_names.get(&10).map(String::as_str), Some("USERS"));
    }

    #[test]
    fn parses_trunk_and_access_interfaces() {
        let interfaces = parse_interfaces(SAMPLE);
        assert_eq!(interfaces.len(), 2);
        let trunk = &interfaces[0];
        assert_eq!(trunk.name, "GigabitEthernet1/0/24");
        assert_eq!(trunk.port_mode, PortMode::Trunk);
        assert_eq!(trunk.native_vlan, Some(1));

        let access = &interfaces[1];
        assert_eq!(access.port_mode, PortMode::Access);
        assert_eq!(access.access_vlan, Some(10));
    }

    #[test]
    fn parses_ospf_block() {
        let routing = parse_routing(SAMPLE);
        let ospf = routing.ospf.expect("ospf block present");
        assert_eq!(ospf.router_id.as_deref(), Some("10.0.0.1"));
        assert_eq!(ospf.areas, vec!["0".to_string()]);
    }
}
