//! One visitor's pass through the lead wizard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::model::{ContactDetails, LeadRecord, PropertyType, Timeline};
use super::state::IntakeStep;
use crate::error::IntakeError;

/// Wizard state plus the partial lead record it has collected.
#[derive(Debug, Clone, Serialize)]
pub struct LeadIntakeFlow {
    pub id: Uuid,
    step: IntakeStep,
    record: LeadRecord,
    pub created_at: DateTime<Utc>,
    /// Last time the visitor moved the flow; idle flows are pruned.
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for LeadIntakeFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadIntakeFlow {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            step: IntakeStep::default(),
            record: LeadRecord::default(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    pub fn record(&self) -> &LeadRecord {
        &self.record
    }

    /// Step 1 → 2. The address is best effort: an empty one is stored as
    /// absent and never blocks advancing.
    pub fn submit_address(&mut self, address: &str) -> Result<IntakeStep, IntakeError> {
        self.require(IntakeStep::Address)?;
        let address = address.trim();
        self.record.address = (!address.is_empty()).then(|| address.to_string());
        self.advance()
    }

    /// Capture the property type. Allowed any number of times on step 2 and
    /// never gates advancing.
    pub fn set_property_type(&mut self, property_type: PropertyType) -> Result<(), IntakeError> {
        self.require(IntakeStep::Details)?;
        self.record.property_type = Some(property_type);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Step 2 → 3: picking a timeline option advances immediately.
    pub fn select_timeline(&mut self, timeline: Timeline) -> Result<IntakeStep, IntakeError> {
        self.require(IntakeStep::Details)?;
        self.record.timeline = Some(timeline);
        self.advance()
    }

    /// Step 3 → submitting. Validates the contact fields and returns the
    /// completed record to hand to the submitter.
    pub fn begin_submission(&mut self, contact: &ContactDetails) -> Result<LeadRecord, IntakeError> {
        self.require(IntakeStep::Contact)?;
        contact.validate()?;
        self.record.apply_contact(contact);
        self.advance()?;
        Ok(self.record.clone())
    }

    /// Submitting → success. The record has been handed off by now, so the
    /// contact details are not kept.
    pub fn complete_submission(&mut self) -> Result<IntakeStep, IntakeError> {
        self.require(IntakeStep::Submitting)?;
        self.completed_at = Some(Utc::now());
        self.record = LeadRecord::default();
        self.advance()
    }

    /// Discard everything collected and return to step 1.
    pub fn reset(&mut self) {
        self.step = IntakeStep::Address;
        self.record = LeadRecord::default();
        self.completed_at = None;
        self.updated_at = Utc::now();
    }

    fn require(&self, expected: IntakeStep) -> Result<(), IntakeError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(IntakeError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    fn advance(&mut self) -> Result<IntakeStep, IntakeError> {
        let next = self.step.next().ok_or(IntakeError::WrongStep {
            expected: IntakeStep::Submitting,
            actual: self.step,
        })?;
        debug_assert!(self.step.can_transition_to(next));
        self.step = next;
        self.updated_at = Utc::now();
        Ok(next)
    }
}
