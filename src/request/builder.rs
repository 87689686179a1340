//! Mutable request form that assembles validated [`AccessRequest`]s.
//!
//! The form is never cleared by [`RequestBuilder::build`], so the same
//! attributes can be resubmitted for repeated what-if trials.

use tracing::debug;

use crate::models::reference::{LOCATION_LABELS, SUGGESTED_PURPOSES};
use crate::models::request::{AccessRequest, ClinicalRole, LocationClass, TimeOfDay};
use crate::{AppError, Result};

/// Project a human location label onto its classification token.
///
/// `"Internal_IP (Hospital)"` becomes [`LocationClass::InternalNetwork`];
/// a bare token is accepted as-is.
///
/// # Errors
///
/// Returns `AppError::Validation` if the stripped label is not a known token.
pub fn classify_location(label: &str) -> Result<LocationClass> {
    let token = label.split_once('(').map_or(label, |(head, _)| head).trim();
    LocationClass::from_token(token)
}

/// Form state for a single requester session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    role: ClinicalRole,
    location_label: String,
    time_of_day: TimeOfDay,
    purpose: String,
    emergency_override: bool,
    justification: String,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            role: ClinicalRole::Doctor,
            location_label: LOCATION_LABELS.first().copied().unwrap_or("Internal_IP").to_owned(),
            time_of_day: TimeOfDay::Daytime,
            purpose: SUGGESTED_PURPOSES.first().copied().unwrap_or_default().to_owned(),
            emergency_override: false,
            justification: String::new(),
        }
    }
}

impl RequestBuilder {
    /// Form pre-filled with the first entry of each reference list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the clinical role.
    pub fn set_role(&mut self, role: ClinicalRole) -> &mut Self {
        self.role = role;
        self
    }

    /// Select the location by its display label.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the label does not classify.
    pub fn set_location(&mut self, label: &str) -> Result<&mut Self> {
        classify_location(label)?;
        label.trim().clone_into(&mut self.location_label);
        Ok(self)
    }

    /// Select the time window.
    pub fn set_time_of_day(&mut self, time_of_day: TimeOfDay) -> &mut Self {
        self.time_of_day = time_of_day;
        self
    }

    /// Set the resource or purpose identifier.
    pub fn set_purpose(&mut self, purpose: impl Into<String>) -> &mut Self {
        self.purpose = purpose.into();
        self
    }

    /// Toggle break-glass access.
    ///
    /// Turning it off keeps any typed justification in the form; it is
    /// simply not transmitted.
    pub fn set_emergency_override(&mut self, enabled: bool) -> &mut Self {
        self.emergency_override = enabled;
        self
    }

    /// Set the break-glass justification text.
    pub fn set_justification(&mut self, text: impl Into<String>) -> &mut Self {
        self.justification = text.into();
        self
    }

    /// Current role.
    #[must_use]
    pub fn role(&self) -> ClinicalRole {
        self.role
    }

    /// Current location label as displayed.
    #[must_use]
    pub fn location_label(&self) -> &str {
        &self.location_label
    }

    /// Current time window.
    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    /// Current purpose text.
    #[must_use]
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Whether break-glass is selected.
    #[must_use]
    pub fn emergency_override(&self) -> bool {
        self.emergency_override
    }

    /// Justification text held in the form, transmitted or not.
    #[must_use]
    pub fn justification(&self) -> &str {
        &self.justification
    }

    /// Why submission is currently blocked, if it is.
    #[must_use]
    pub fn blocking_reason(&self) -> Option<&'static str> {
        if self.emergency_override && self.justification.trim().is_empty() {
            Some("justification is required for emergency override")
        } else {
            None
        }
    }

    /// Whether the submit action is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.blocking_reason().is_none()
    }

    /// Assemble an [`AccessRequest`] from the current form state.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when submission is blocked or the
    /// location label does not classify.
    pub fn build(&self) -> Result<AccessRequest> {
        if let Some(reason) = self.blocking_reason() {
            return Err(AppError::Validation(reason.into()));
        }

        let location_class = classify_location(&self.location_label)?;
        debug!(
            role = %self.role,
            location = %location_class,
            emergency = self.emergency_override,
            "access request assembled"
        );

        AccessRequest::new(
            self.role,
            location_class,
            self.time_of_day,
            self.purpose.clone(),
            self.emergency_override,
            &self.justification,
        )
    }
}
