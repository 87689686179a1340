//! Access request model sent to the policy decision service.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Clinical role claimed by the requester.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum ClinicalRole {
    /// Attending or consulting physician.
    Doctor,
    /// Registered or practical nurse.
    Nurse,
    /// Front-desk staff.
    Receptionist,
    /// Dispensing pharmacist.
    Pharmacist,
    /// Laboratory technician.
    #[serde(rename = "Lab Technician")]
    #[value(name = "lab-technician")]
    LabTechnician,
    /// Records or system administrator.
    Administrator,
}

impl ClinicalRole {
    /// Wire and display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Doctor => "Doctor",
            Self::Nurse => "Nurse",
            Self::Receptionist => "Receptionist",
            Self::Pharmacist => "Pharmacist",
            Self::LabTechnician => "Lab Technician",
            Self::Administrator => "Administrator",
        }
    }
}

impl Display for ClinicalRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClinicalRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        crate::models::reference::ROLES
            .iter()
            .copied()
            .find(|role| {
                role.label().eq_ignore_ascii_case(wanted)
                    || role
                        .to_possible_value()
                        .is_some_and(|v| v.matches(wanted, true))
            })
            .ok_or_else(|| AppError::Validation(format!("unknown role '{wanted}'")))
    }
}

/// Network classification of the requester's location.
///
/// Only the classification token travels on the wire; the descriptive
/// label shown to the user stays local.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum LocationClass {
    /// Request originates inside the hospital network.
    #[serde(rename = "Internal_IP")]
    InternalNetwork,
    /// Request originates outside the hospital network.
    #[serde(rename = "External_IP")]
    ExternalNetwork,
}

impl LocationClass {
    /// Classification token as transmitted.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::InternalNetwork => "Internal_IP",
            Self::ExternalNetwork => "External_IP",
        }
    }

    /// Parse a bare classification token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for anything but the known tokens.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "Internal_IP" => Ok(Self::InternalNetwork),
            "External_IP" => Ok(Self::ExternalNetwork),
            other => Err(AppError::Validation(format!(
                "unknown location classification '{other}'"
            ))),
        }
    }
}

impl Display for LocationClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Coarse time window of the request.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// Regular working hours.
    #[default]
    Daytime,
    /// Outside regular working hours.
    Nighttime,
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daytime => f.write_str("Daytime"),
            Self::Nighttime => f.write_str("Nighttime"),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daytime" | "day" => Ok(Self::Daytime),
            "nighttime" | "night" => Ok(Self::Nighttime),
            other => Err(AppError::Validation(format!("unknown time of day '{other}'"))),
        }
    }
}

/// A validated request for access to a patient record.
///
/// Immutable once constructed. A break-glass request always carries a
/// justification and a normal request never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AccessRequest {
    role: ClinicalRole,
    location_class: LocationClass,
    time_of_day: TimeOfDay,
    purpose: String,
    emergency_override: bool,
    justification: String,
}

impl AccessRequest {
    /// Construct a request, enforcing the break-glass justification rule.
    ///
    /// Justification text supplied for a non-emergency request is dropped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when `emergency_override` is set and
    /// the justification is blank.
    pub fn new(
        role: ClinicalRole,
        location_class: LocationClass,
        time_of_day: TimeOfDay,
        purpose: impl Into<String>,
        emergency_override: bool,
        justification: &str,
    ) -> Result<Self> {
        let justification = if emergency_override {
            let trimmed = justification.trim();
            if trimmed.is_empty() {
                return Err(AppError::Validation(
                    "emergency override requires a justification".into(),
                ));
            }
            trimmed.to_owned()
        } else {
            String::new()
        };

        Ok(Self {
            role,
            location_class,
            time_of_day,
            purpose: purpose.into(),
            emergency_override,
            justification,
        })
    }

    /// Claimed clinical role.
    #[must_use]
    pub fn role(&self) -> ClinicalRole {
        self.role
    }

    /// Network classification token.
    #[must_use]
    pub fn location_class(&self) -> LocationClass {
        self.location_class
    }

    /// Time window.
    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    /// Requested resource or purpose identifier.
    #[must_use]
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Whether break-glass access is requested.
    #[must_use]
    pub fn emergency_override(&self) -> bool {
        self.emergency_override
    }

    /// Break-glass justification; empty for normal requests.
    #[must_use]
    pub fn justification(&self) -> &str {
        &self.justification
    }
}
