// [libs/domain/device-parser/src/naming.rs]
//! Derives a canonical `device_name` from an uploaded filename. The upload
//! pipeline feeds raw filenames like `core-sw1_20251001.txt` or
//! `dist-sw2_v2.cfg`; the parser keys DeviceRecords on the name with
//! extension, version suffix, and timestamp suffix stripped.

use once_cell::sync::Lazy;
use regex::Regex;

static TIMESTAMP_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[_-](\d{8}|\d{4}-\d{2}-\d{2}|\d{6})$").unwrap());
static VERSION_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[_-]v\d+$").unwrap());
static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_\s]+").unwrap());

pub fn derive_device_name(filename: &str) -> String {
    let without_extension = match filename.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => filename,
    };

    let mut stem = without_extension.to_string();
    loop {
        let after_timestamp = TIMESTAMP_SUFFIX.replace(&stem, "").into_owned();
        let after_version = VERSION_SUFFIX.replace(&after_timestamp, "").into_owned();
        if after_version == stem {
            stem = after_version;
            break;
        }
        stem = after_version;
    }

    let normalized = SEPARATOR_RUN.replace_all(&stem, "-").into_owned();
    normalized.trim_matches('-').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_extension_and_timestamp() {
        assert_eq!(derive_device_name("core-sw1_20251001.txt"), "core-sw1");
    }

    #[test]
    fn strips_version_suffix() {
        assert_eq!(derive_device_name("dist-sw2_v2.cfg"), "dist-sw2");
    }

    #[test]
    fn normalizes_separators() {
        assert_eq!(derive_device_name("access sw_3.log"), "access-sw-3");
    }

    #[test]
    fn handles_bare_name() {
        assert_eq!(derive_device_name("router1.conf"), "router1");
    }
}
