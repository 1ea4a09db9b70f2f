// [libs/domain/device-parser/src/common.rs]
//! Helpers shared by every vendor parser: name-based role classification,
//! VLAN range expansion, and neighbor-table artifact filtering. Kept
//! vendor-agnostic so new vendor modules never have to reimplement them.

use meridian_domain_models::DeviceRole;

/// Classifies a device by substring match on its name. Tried in the
/// order the spec prescribes: core, distribution, access, router.
/// `node_roles`/override tables always win over this at the topology
/// layer; this classifier only supplies the default.
pub fn classify_role(device_name: &str) -> DeviceRole {
    let lower = device_name.to_ascii_lowercase();
    if lower.contains("core") {
        DeviceRole::Core
    } else if lower.contains("dist") {
        DeviceRole::Distribution
    } else if lower.contains("access") {
        DeviceRole::Access
    } else if lower.contains("router") || lower.contains("rtr") {
        DeviceRole::Router
    } else {
        DeviceRole::Unknown
    }
}

/// Expands a comma-separated VLAN list that may contain ranges
/// (`10-20,30`) into a sorted, deduplicated set of VLAN ids.
pub fn expand_vlan_ranges(raw: &str) -> Vec<u32> {
    let mut ids = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((start, end)) = part.split_once('-') {
            if let (Ok(start), Ok(end)) = (start.trim().parse::<u32>(), end.trim().parse::<u32>()) {
                if start <= end {
                    ids.extend(start..=end);
                }
            }
        } else if let Ok(id) = part.parse::<u32>() {
            ids.push(id);
        }
    }
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Neighbor tables (CDP/LLDP) include banner/header lines that look like
/// data rows once split on whitespace. These device-name-shaped artifacts
/// must never surface as real neighbors.
pub fn is_neighbor_header_artifact(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return true;
    }
    matches!(
        trimmed,
        "Device" | "Device ID" | "Port" | "(R)" | "Capability" | "Codes" | "Total"
    ) || trimmed.starts_with("Device ID")
        || trimmed.starts_with('(')
        || trimmed.starts_with("Capability codes")
}

/// A bare heuristic for management/loopback SVI addresses: prefers a
/// Loopback interface address first, falling back to the lowest-numbered
/// VLAN SVI (Vlan1/Vlanif1 and friends are conventionally management).
pub fn looks_like_management_interface(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("loopback") || lower.starts_with("vlanif") || lower.starts_with("vlan")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_simple_range() {
        assert_eq!(expand_vlan_ranges("10-12"), vec![10, 11, 12]);
    }

    #[test]
    fn expands_mixed_list_and_dedups() {
        assert_eq!(expand_vlan_ranges("10,10-12,30"), vec![10, 11, 12, 30]);
    }

    #[test]
    fn classifies_by_substring() {
        assert_eq!(classify_role("core-sw1"), DeviceRole::Core);
        assert_eq!(classify_role("dist-sw2"), DeviceRole::Distribution);
        assert_eq!(classify_role("access-sw3"), DeviceRole::Access);
        assert_eq!(classify_role("edge-router1"), DeviceRole::Router);
        assert_eq!(classify_role("misc-box"), DeviceRole::Unknown);
    }

    #[test]
    fn filters_header_artifacts() {
        assert!(is_neighbor_header_artifact("Device ID"));
        assert!(is_neighbor_header_artifact("(R)"));
        assert!(!is_neighbor_header_artifact("core-sw1"));
    }
}
