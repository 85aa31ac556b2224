// SPDX-License-Identifier: MPL-2.0

//! Short hardware names for the tooltip.

/// Vendor and family tokens removed from hardware names (case-sensitive).
const VENDOR_TOKENS: [&str; 8] = [
    "Intel", "AMD", "NVIDIA", "GeForce", "Radeon", "Core", "Ryzen", "Processor",
];

/// Strip vendor tokens from a raw hardware name and prefix a vendor tag.
///
/// The tag is `R` for AMD/Ryzen and `I` for Intel/Core, decided on the
/// lowercased original name before any stripping.
///
/// `"AMD Ryzen 9 5900X 12-Core Processor"` becomes `"R9 5900X 12-"`.
pub fn clean_hardware_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let lower = name.to_lowercase();
    let tag = if lower.contains("ryzen") || lower.contains("amd") {
        "R"
    } else if lower.contains("intel") || lower.contains("core") {
        "I"
    } else {
        ""
    };

    let mut cleaned = name.to_string();
    for token in VENDOR_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    format!("{tag}{cleaned}")
}
