// [libs/domain/device-parser/src/vendor.rs]
//! Vendor detection. First match wins; vendor detection always takes
//! precedence over hostname-convention guesses — a device named
//! `cisco-core1` with a VRP body is still Huawei.

use meridian_domain_models::Vendor;

pub fn detect_vendor(raw: &str) -> Vendor {
    if raw.contains("display version") || raw.contains("display current-configuration") {
        return Vendor::Huawei;
    }
    let cisco_signatures = ["Cisco IOS", "NX-OS", "IOS-XE"];
    let has_cisco_banner = cisco_signatures.iter().any(|sig| raw.contains(sig));
    let has_show_version = raw.contains("show version") || raw.contains("show running-config");
    if has_cisco_banner || has_show_version {
        return Vendor::Cisco;
    }
    // Common Cisco config idioms that show up without a banner (e.g. a
    // startup-config dump with no `show` preamble).
    if raw.contains("ip cef") || raw.contains("spanning-tree mode") || raw.contains("interface GigabitEthernet") {
        return Vendor::Cisco;
    }
    if raw.contains("sysname") || raw.contains("vlan batch") {
        return Vendor::Huawei;
    }
    Vendor::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_huawei_from_display_commands() {
        assert_eq!(detect_vendor("display current-configuration\nsysname dist-sw2"), Vendor::Huawei);
    }

    #[test]
    fn detects_cisco_from_banner() {
        assert_eq!(detect_vendor("Cisco IOS Software, C2960 Software"), Vendor::Cisco);
    }

    #[test]
    fn falls_back_to_unknown() {
        assert_eq!(detect_vendor("some random text file"), Vendor::Unknown);
    }

    #[test]
    fn vendor_detection_wins_over_hostname_convention() {
        // Named like a Cisco device but the body is VRP.
        let text = "sysname cisco-core1\nvlan batch 10 20";
        assert_eq!(detect_vendor(text), Vendor::Huawei);
    }
}
