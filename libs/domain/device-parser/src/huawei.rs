// [libs/domain/device-parser/src/huawei.rs]
//! Huawei VRP extraction. Syntax differs from Cisco IOS enough (`sysname`,
//! `vlan batch`, `Vlanif`, `display` commands) to warrant its own module,
//! but the output contract matches `cisco.rs` field for field.

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

static SYSNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^sysname\s+(\S+)").unwrap());
static SERIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mi)^\s*ESN\s*:?\s*(\S+)").unwrap());
static OS_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)VRP \(R\) software,\s*[Vv]ersion\s+([0-9A-Za-z().]+)").unwrap());
static MODEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mi)^HUAWEI\s+(\S+)\s+uptime").unwrap());
static UPTIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)uptime is (.+)").unwrap());
static VLAN_BATCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^vlan batch\s+(.+)$").unwrap());
static INTERFACE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^interface\s+(\S+)").unwrap());
static STP_MODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^stp mode\s+(\S+)").unwrap());
static OSPF_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ospf\s+(\d+)").unwrap());
static OSPF_ROUTER_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*router-id\s+(\S+)").unwrap());
static OSPF_AREA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*area\s+(\S+)").unwrap());
static BGP_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^bgp\s+(\d+)").unwrap());
static BGP_PEER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*peer\s+(\S+)\s+as-number\s+(\d+)").unwrap());
static STATIC_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^ip route-static\s+(\S+\s+\S+)\s+(\S+)").unwrap());
static LLDP_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s*$").unwrap());

pub fn parse_overview(raw: &str, device_name: &str) -> DeviceOverview {
    let hostname = SYSNAME.captures(raw).map(|c| c[1].to_string());
    let serial_number = SERIAL.captures(raw).map(|c| c[1].to_string());
    let os_version = OS_VERSION.captures(raw).map(|c| c[1].to_string());
    let model = MODEL.captures(raw).map(|c| c[1].to_string());
    let uptime = UPTIME.captures(raw).map(|c| c[1].trim().to_string());
    let mgmt_ip = find_management_ip(raw);

    DeviceOverview {
        hostname,
        model,
        os_version,
        serial_number,
        mgmt_ip,
        role: Some(classify_role(device_name)),
        uptime,
        cpu_utilization: first_capture(raw, r"(?i)CPU [Uu]sage\s*:?\s*(\d+)%").and_then(|s| s.parse().ok()),
        memory_usage: first_capture(raw, r"(?i)Memory [Uu]sage\s*:?\s*(\d+)%").and_then(|s| s.parse().ok()),
    }
}

fn find_management_ip(raw: &str) -> Option<String> {
    Regex::new(r"(?m)^interface LoopBack\d+\s*\n(?:\s+.*\n)*?\s*ip address\s+(\S+)")
        .ok()?
        .captures(raw)
        .map(|c| c[1].to_string())
        .or_else(|| {
            Regex::new(r"(?m)^interface Vlanif1\s*\n(?:\s+.*\n)*?\s*ip address\s+(\S+)")
                .ok()?
                .captures(raw)
                .map(|c| c[1].to_string())
        })
}

pub fn parse_interfaces(raw: &str) -> Vec<Interface> {
    let headers: Vec<_> = INTERFACE_HEADER.captures_iter(raw).collect();
    headers
        .iter()
        .enumerate()
        .map(|(idx, capture)| {
            let name = capture[1].to_string();
            let start = capture.get(0).unwrap().end();
            let end = headers
                .get(idx + 1)
                .map(|next| next.get(0).unwrap().start())
                .unwrap_or(raw.len());
            parse_interface_block(&name, &raw[start..end.min(raw.len())])
        })
        .collect()
}

fn parse_interface_block(name: &str, block: &str) -> Interface {
    let description = first_capture(block, r"(?m)^\s*description\s+(.+)$");
    let admin_status = Some(if block.contains("shutdown") { "down" } else { "up" }.to_string());
    let ipv4_address = first_capture(block, r"(?m)^\s*ip address\s+(\S+\s+\S+)");

    let is_trunk = block.contains("port link-type trunk");
    let is_access = block.contains("port link-type access");
    let port_mode = if is_trunk {
        PortMode::Trunk
    } else if is_access {
        PortMode::Access
    } else {
        PortMode::Unknown
    };

    let access_vlan =
        first_capture(block, r"(?m)^\s*port default vlan\s+(\d+)").and_then(|s| s.parse().ok());

    let (native_vlan, allowed_vlans) = if is_trunk {
        let native = first_capture(block, r"(?m)^\s*port trunk pvid vlan\s+(\d+)")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        let allowed = first_capture(block, r"(?m)^\s*port trunk allow-pass vlan\s+(.+)$").map(|raw| {
            if raw.trim().eq_ignore_ascii_case("all") {
                meridian_domain_models::AllowedVlans::All
            } else {
                meridian_domain_models::AllowedVlans::List(expand_vlan_ranges(&raw.replace(' ', ",")))
            }
        });
        (Some(native), allowed)
    } else {
        (None, None)
    };

    Interface {
        name: name.to_string(),
        interface_type: infer_interface_type(name),
        admin_status: admin_status.clone(),
        oper_status: admin_status,
        ipv4_address,
        port_mode,
        access_vlan,
        native_vlan,
        allowed_vlans,
        speed: first_capture(block, r"(?m)^\s*speed\s+(\S+)"),
        duplex: first_capture(block, r"(?m)^\s*duplex\s+(\S+)"),
        poe_power: None,
        description,
        stp_role: None,
        stp_state: None,
        stp_edged_port: Some(block.contains("stp edged-port enable")),
        errors: InterfaceErrors::default(),
    }
}

fn infer_interface_type(name: &str) -> Option<String> {
    let lower = name.to_ascii_lowercase();
    let kind = if lower.starts_with("gigabitethernet") {
        "GigabitEthernet"
    } else if lower.starts_with("10ge") || lower.starts_with("xge") {
        "10GE"
    } else if lower.starts_with("vlanif") {
        "SVI"
    } else if lower.starts_with("loopback") {
        "Loopback"
    } else if lower.starts_with("eth-trunk") {
        "EthTrunk"
    } else {
        return None;
    };
    Some(kind.to_string())
}

pub fn parse_vlans(raw: &str) -> VlanTable {
    let mut vlan_list = Vec::new();
    for capture in VLAN_BATCH.captures_iter(raw) {
        vlan_list.extend(expand_vlan_ranges(&capture[1].replace(' ', ",")));
    }
    vlan_list.sort_unstable();
    vlan_list.dedup();

    let mut vlan_names = BTreeMap::new();
    for capture in Regex::new(r"(?m)^vlan\s+(\d+)\s*\n\s*name\s+(\S+)").unwrap().captures_iter(raw) {
        if let Ok(id) = capture[1].parse::<u32>() {
            vlan_names.insert(id, capture[2].to_string());
        }
    }

    VlanTable {
        vlan_list,
        vlan_names,
        vlan_status: BTreeMap::new(),
    }
}

pub fn parse_stp(raw: &str) -> StpState {
    StpState {
        mode: STP_MODE.captures(raw).map(|c| c[1].to_string()),
        bridge_id: first_capture(raw, r"(?mi)Bridge-ID\s*:?\s*(\S+)"),
        root_bridge_id: first_capture(raw, r"(?mi)Root bridge ID\s*:?\s*(\S+)"),
        bridge_priority: None,
        root_bridge_status: Some(raw.contains("CIST Root/ERPC") && raw.contains("Self")),
        portfast_enabled: Some(raw.contains("stp edged-port default")),
        bpdu_guard: Some(raw.contains("stp bpdu-protection")),
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

    let ospf = OSPF_BLOCK.captures(raw).map(|c| OspfState {
        router_id: OSPF_ROUTER_ID.captures(raw).map(|rc| rc[1].to_string()),
        process_id: Some(c[1].to_string()),
        areas: OSPF_AREA
            .captures_iter(raw)
            .map(|ac| ac[1].to_string())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect(),
        interfaces: Vec::new(),
        neighbors: Vec::new(),
    });

    let bgp = BGP_BLOCK.captures(raw).map(|c| BgpState {
        as_number: c[1].parse().ok(),
        router_id: None,
        peers: BGP_PEER
            .captures_iter(raw)
            .map(|pc| BgpPeer {
                peer_address: pc[1].to_string(),
                remote_as: pc[2].parse().ok(),
                prefixes_received: None,
                prefixes_advertised: None,
            })
            .collect(),
    });

    RoutingTable {
        static_routes,
        ospf,
        eigrp: parse_eigrp(raw),
        bgp,
        rip_enabled: Some(raw.contains("rip ")),
    }
}

fn parse_eigrp(raw: &str) -> Option<EigrpState> {
    // EIGRP is a Cisco-proprietary protocol; VRP devices do not run it, but
    // the field stays present (as `None`) for schema uniformity.
    let _ = raw;
    None
}

pub fn parse_neighbors(raw: &str) -> Vec<Neighbor> {
    LLDP_ENTRY
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
                protocol: NeighborProtocol::Lldp,
            })
        })
        .collect()
}

pub fn parse_mac_arp(raw: &str) -> MacArpTables {
    let mac_table = Regex::new(r"(?m)^\s*([0-9a-fA-F-]{14,17})\s+(\d+)\s+\S+\s+(\S+)")
        .unwrap()
        .captures_iter(raw)
        .map(|c| MacEntry {
            mac_address: c[1].to_string(),
            vlan: c[2].parse().ok(),
            port: Some(c[3].to_string()),
        })
        .collect();

    let arp_table = Regex::new(r"(?m)^\s*(\d+\.\d+\.\d+\.\d+)\s+([0-9a-fA-F-]{14,17})\s+\S+\s+\S+\s+(\S+)")
        .unwrap()
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
    let user_accounts = Regex::new(r"(?m)^\s*local-user\s+(\S+)")
        .unwrap()
        .captures_iter(raw)
        .map(|c| c[1].to_string())
        .collect();

    let aaa = AaaConfig {
        authentication: first_capture(raw, r"(?m)^\s*authentication-scheme\s+(.+)$"),
        authorization: first_capture(raw, r"(?m)^\s*authorization-scheme\s+(.+)$"),
        accounting: first_capture(raw, r"(?m)^\s*accounting-scheme\s+(.+)$"),
    };

    let ssh_enabled = Some(raw.contains("stelnet server enable") || raw.contains("ssh server enable"));

    let snmp = SnmpConfig {
        enabled: raw.contains("snmp-agent"),
        version: first_capture(raw, r"(?m)^snmp-agent sys-info version\s+(\S+)"),
        communities: Regex::new(r"(?m)^snmp-agent community\s+\S+\s+(\S+)")
            .unwrap()
            .captures_iter(raw)
            .map(|c| c[1].to_string())
            .collect(),
    };

    let ntp = NtpConfig {
        enabled: raw.contains("ntp-service unicast-server") || raw.contains("ntp unicast-server"),
        synchronized: None,
        stratum: None,
        servers: Regex::new(r"(?m)^ntp[- ]?(?:service )?unicast-server\s+(\S+)")
            .unwrap()
            .captures_iter(raw)
            .map(|c| c[1].to_string())
            .collect(),
    };

    let syslog_servers = Regex::new(r"(?m)^info-center loghost\s+(\S+)")
        .unwrap()
        .captures_iter(raw)
        .map(|c| c[1].to_string())
        .collect();

    let acls = Regex::new(r"(?m)^acl (?:number|name)\s+(\S+)")
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
    let etherchannel = Regex::new(r"(?m)^interface Eth-Trunk(\d+)")
        .unwrap()
        .captures_iter(raw)
        .map(|c| EtherChannel {
            group_id: c[1].to_string(),
            members: Vec::new(),
            protocol: None,
        })
        .collect();

    let hsrp_groups = Vec::new(); // HSRP is Cisco-proprietary; VRP uses VRRP exclusively.

    let vrrp_groups = Regex::new(r"(?m)^\s*vrrp vrid\s+(\d+)\s+virtual-ip\s+(\S+)")
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
sysname dist-sw2
#
vlan batch 30 40
#
vlan 30
 name SERVERS
#
interface Vlanif30
 ip address 10.0.30.1 255.255.255.0
#
interface GigabitEthernet0/0/1
 port link-type trunk
 port trunk pvid vlan 1
 port trunk allow-pass vlan 30 40
#
stp mode mstp
"#;

    #[test]
    fn parses_sysname_and_vlan_batch() {
        let overview = parse_overview(SAMPLE, "dist-sw2");
        assert_eq!(overview.hostname.as_deref(), Some("dist-sw2"));

        let vlans = parse_vlans(SAMPLE);
        assert_eq!(vlans.vlan_list, vec![30, 40]);
        assert_eq!(vlans.vlan_names.get(&30).map(String::as_str), Some("SERVERS"));
    }

    #[test]
    fn parses_trunk_interface() {
        let interfaces = parse_interfaces(SAMPLE);
        let trunk = interfaces.iter().find(|i| i.name == "GigabitEthernet0/0/1").unwrap();
        assert_eq!(trunk.port_mode, PortMode::Trunk);
    }

    #[test]
    fn parses_stp_mode() {
        let stp = parse_stp(SAMPLE);
        assert_eq!(stp.mode.as_deref(), Some("mstp"));
    }
}
