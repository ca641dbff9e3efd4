//! Fixed maintenance interval presets

use serde::Serialize;

/// A named maintenance type with a fixed mileage interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaintenancePreset {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "interval")]
    pub interval_miles: u64,
}

/// Quick-add catalog, in display order
pub const PRESETS: &[MaintenancePreset] = &[
    MaintenancePreset {
        kind: "Oil Change",
        interval_miles: 5_000,
    },
    MaintenancePreset {
        kind: "Tire Rotation",
        interval_miles: 6_000,
    },
    MaintenancePreset {
        kind: "Brake Inspection",
        interval_miles: 12_000,
    },
];

/// Look up a preset by type name.
///
/// Matching ignores case and treats `-`/`_` as spaces, so `oil-change`
/// finds "Oil Change".
pub fn find_preset(name: &str) -> Option<&'static MaintenancePreset> {
    let wanted = normalize_name(name);
    PRESETS.iter().find(|p| normalize_name(p.kind) == wanted)
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
