// [libs/domain/topology-engine/src/classify.rs]
//! Name-based default role classification. Always the *default*; a stored
//! `node_roles` override always wins and this is never re-derived on read
//! once an override exists (see [`crate::merge::apply_overrides`]).

use meridian_domain_models::NodeRole;

pub fn classify_default_role(device_name: &str) -> NodeRole {
    let lower = device_name.to_ascii_lowercase();
    if lower.contains("core") {
        NodeRole::Core
    } else if lower.contains("dist") {
        NodeRole::Distribution
    } else if lower.contains("access") {
        NodeRole::Access
    } else if lower.contains("router") {
        NodeRole::Router
    } else {
        NodeRole::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_patterns() {
        assert_eq!(classify_default_role("core-sw1"), NodeRole::Core);
        assert_eq!(classify_default_role("distribution-2"), NodeRole::Distribution);
        assert_eq!(classify_default_role("access-floor3"), NodeRole::Access);
        assert_eq!(classify_default_role("edge-router"), NodeRole::Router);
        assert_eq!(classify_default_role("firewall-1"), NodeRole::Unknown);
    }
}
