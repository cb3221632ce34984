//! Default network data compiled into the firmware.
//!
//! The authorized set seeds the secure registry at every cold start; the
//! demonstration sequence stands in for a radio until real sensing is wired in.

/// Networks this device treats as authorized. Matching is exact and case-sensitive.
pub static AUTHORIZED_SSIDS: &[&str] = &[
    "IoT_Secure",
    "LabNet_Protected",
    "HomeNet_5G",
    "OfficeNet",
    "GuestNet",
];

/// Observation sequence replayed (with wraparound) by the demo sensor.
pub static DEMO_SSIDS: &[&str] = &[
    "IoT_Secure",
    "EvilTwin",
    "RandomAP",
    "LabNet_Protected",
    "Unknown_AP",
    "HomeNet_5G",
];
