//! Static reference enumerations offered to the requester.

use super::request::ClinicalRole;

/// Roles selectable in the request form.
pub const ROLES: &[ClinicalRole] = &[
    ClinicalRole::Doctor,
    ClinicalRole::Nurse,
    ClinicalRole::Receptionist,
    ClinicalRole::Pharmacist,
    ClinicalRole::LabTechnician,
    ClinicalRole::Administrator,
];

/// Location labels selectable in the request form.
pub const LOCATION_LABELS: &[&str] = &["Internal_IP (Hospital)", "External_IP (Home/VPN)"];

/// Purposes suggested in the request form.
pub const SUGGESTED_PURPOSES: &[&str] = &[
    "Patient Record",
    "Lab Results",
    "Prescription History",
    "Billing Information",
];
