// [libs/domain/device-parser/src/lib.rs]
/*!
 * Vendor-dispatched device configuration parser.
 *
 * Takes the raw bytes of a `Config`-folder upload and a `source_version`
 * back-reference and produces a normalized [`DeviceRecord`]. Dispatch is a
 * simple `match` over [`Vendor`] rather than dynamic dispatch: there is no
 * plugin registry to extend at runtime, so a closed enum plus one match
 * arm per variant is the idiomatic choice here (a new vendor module is a
 * new enum variant and a new arm, never a change to callers).
 *
 * The parser never fails: malformed or empty input still produces a
 * `DeviceRecord` with every array empty and every overview field `None`,
 * per the tolerant propagation policy the rest of the system relies on.
 */

pub mod cisco;
pub mod common;
pub mod huawei;
pub mod naming;
pub mod vendor;

pub use naming::derive_device_name;
pub use vendor::detect_vendor;

use chrono::Utc;
use meridian_domain_models::{DeviceRecord, Vendor};
use tracing::{debug, instrument};

/// Parses `raw_content` into a [`DeviceRecord`]. `device_name` is the
/// caller-derived name (see [`derive_device_name`]); `source_version` is
/// the document version this parse run is attributed to.
#[instrument(skip(raw_content))]
pub fn parse(project_id: &str, device_name: &str, raw_content: &str, source_version: u32) -> DeviceRecord {
    let vendor = detect_vendor(raw_content);
    debug!(?vendor, bytes = raw_content.len(), "dispatching to vendor parser");

    let (device_overview, interfaces, vlans, stp, routing, neighbors, mac_arp, security, ha) = match vendor {
        Vendor::Huawei => (
            huawei::parse_overview(raw_content, device_name),
            huawei::parse_interfaces(raw_content),
            huawei::parse_vlans(raw_content),
            huawei::parse_stp(raw_content),
            huawei::parse_routing(raw_content),
            huawei::parse_neighbors(raw_content),
            huawei::parse_mac_arp(raw_content),
            huawei::parse_security(raw_content),
            huawei::parse_ha(raw_content),
        ),
        Vendor::Cisco | Vendor::Unknown => (
            cisco::parse_overview(raw_content, device_name),
            cisco::parse_interfaces(raw_content),
            cisco::parse_vlans(raw_content),
            cisco::parse_stp(raw_content),
            cisco::parse_routing(raw_content),
            cisco::parse_neighbors(raw_content),
            cisco::parse_mac_arp(raw_content),
            cisco::parse_security(raw_content),
            cisco::parse_ha(raw_content),
        ),
    };

    DeviceRecord {
        project_id: project_id.to_string(),
        device_name: device_name.to_string(),
        vendor,
        parsed_at: Utc::now(),
        source_version,
        device_overview,
        interfaces,
        vlans,
        stp,
        routing,
        neighbors,
        mac_arp,
        security,
        ha,
        original_content: raw_content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_but_well_formed_record() {
        let record = parse("proj-1", "blank-device", "", 1);
        assert!(record.interfaces.is_empty());
        assert!(record.vlans.vlan_list.is_empty());
        assert!(record.device_overview.hostname.is_none());
        assert!(record.device_overview.cpu_utilization.is_none());
        assert_eq!(record.original_content, "");
    }

    #[test]
    fn is_idempotent_modulo_parsed_at() {
        let raw = "hostname core-sw1\nvlan 10\n name USERS\n";
        let first = parse("proj-1", "core-sw1", raw, 1);
        let second = parse("proj-1", "core-sw1", raw, 1);
        assert_eq!(first.device_overview.hostname, second.device_overview.hostname);
        assert_eq!(first.vlans.vlan_list, second.vlans.vlan_list);
        assert_eq!(first.original_content, second.original_content);
    }

    #[test]
    fn dispatches_huawei_vendor() {
        let raw = "sysname dist-sw2\nvlan batch 30\n";
        let record = parse("proj-1", "dist-sw2", raw, 1);
        assert_eq!(record.vendor, Vendor::Huawei);
        assert_eq!(record.device_overview.hostname.as_deref(), Some("dist-sw2"));
    }

    #[test]
    fn allowed_vlans_all_expands_to_4094() {
        use meridian_domain_models::AllowedVlans;
        assert_eq!(AllowedVlans::All.count(), 4094);
        assert_eq!(AllowedVlans::List(common::expand_vlan_ranges("1-4094")).count(), 4094);
    }
}
