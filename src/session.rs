// ============================================
// src/session.rs
// Form/session state: busy flag, generation epoch, reset
// ============================================

use log::{debug, info, warn};

use crate::activity::GeneratedActivity;
use crate::error::{AppError, Result};
use crate::form::{FormInput, ValidatedInput};

/// Issued by [`Session::begin`]; carries the epoch a result must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub epoch: u64,
    pub input: ValidatedInput,
}

/// The single form/session instance.
#[derive(Debug, Default)]
pub struct Session {
    pub form: FormInput,
    /// The shown activity and the input it was generated from.
    activity: Option<(ValidatedInput, GeneratedActivity)>,
    error: Option<String>,
    /// The generation in flight, if any.
    pending: Option<Ticket>,
    /// Advanced on every reset so late results can be recognised.
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activity(&self) -> Option<&GeneratedActivity> {
        self.activity.as_ref().map(|(_, activity)| activity)
    }

    /// Input submitted for the shown activity. Later form edits do not
    /// change it.
    pub fn generated_from(&self) -> Option<&ValidatedInput> {
        self.activity.as_ref().map(|(input, _)| input)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Validates the form and marks the session busy.
    pub fn begin(&mut self) -> Result<Ticket> {
        if self.is_busy() {
            return Err(AppError::Busy);
        }
        self.error = None;

        match self.form.validate() {
            Ok(input) => {
                let ticket = Ticket {
                    epoch: self.epoch,
                    input,
                };
                self.pending = Some(ticket.clone());
                debug!("generation started at epoch {}", self.epoch);
                Ok(ticket)
            }
            Err(err) => {
                if let AppError::MissingFields(fields) = &err {
                    info!("validation failed, missing {:?}", fields);
                }
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Applies a finished activity. Returns false if it belongs to an
    /// earlier epoch or nothing is pending.
    pub fn complete(&mut self, epoch: u64, activity: GeneratedActivity) -> bool {
        let Some(ticket) = self.take_pending(epoch) else {
            warn!(
                "dropping stale activity from epoch {} (current {})",
                epoch, self.epoch
            );
            return false;
        };
        info!("activity ready: {}", activity.title);
        self.activity = Some((ticket.input, activity));
        true
    }

    /// Records an upstream failure for the current generation.
    pub fn fail(&mut self, epoch: u64, err: &AppError) -> bool {
        if self.take_pending(epoch).is_none() {
            return false;
        }
        warn!("generation failed: {:?}", err);
        self.error = Some(err.to_string());
        true
    }

    fn take_pending(&mut self, epoch: u64) -> Option<Ticket> {
        self.pending.take_if(|ticket| ticket.epoch == epoch)
    }

    /// Clears the activity and all three fields, and invalidates any
    /// generation still in flight.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.pending = None;
        self.activity = None;
        self.error = None;
        self.form.clear();
        debug!("session reset, epoch now {}", self.epoch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityType, compose};
    use crate::error::{GENERATION_FAILED_MESSAGE, MISSING_FIELDS_MESSAGE};

    fn filled_session() -> Session {
        let mut session = Session::new();
        session.form = FormInput::new("Year 8", "Mathematics", "Fractions");
        session
    }

    #[test]
    fn empty_form_sets_error_and_stays_idle() {
        let mut session = Session::new();
        session.form = FormInput::new("Year 8", "", "Fractions");

        assert!(session.begin().is_err());
        assert_eq!(session.error(), Some(MISSING_FIELDS_MESSAGE));
        assert!(!session.is_busy());
        assert!(session.activity().is_none());
    }

    #[test]
    fn begin_then_complete_shows_activity() {
        let mut session = filled_session();
        let ticket = session.begin().unwrap();
        assert!(session.is_busy());

        let activity = compose(&ticket.input, ActivityType::OddOneOut);
        assert!(session.complete(ticket.epoch, activity.clone()));
        assert!(!session.is_busy());
        assert_eq!(session.activity(), Some(&activity));
    }

    #[test]
    fn second_submit_while_busy_is_refused() {
        let mut session = filled_session();
        session.begin().unwrap();
        assert!(matches!(session.begin(), Err(AppError::Busy)));
    }

    #[test]
    fn successful_submit_clears_previous_error() {
        let mut session = Session::new();
        let _ = session.begin();
        assert!(session.error().is_some());

        session.form = FormInput::new("Year 8", "Science", "Cells");
        session.begin().unwrap();
        assert_eq!(session.error(), None);
    }

    #[test]
    fn reset_clears_activity_and_fields() {
        let mut session = filled_session();
        let ticket = session.begin().unwrap();
        session.complete(ticket.epoch, compose(&ticket.input, ActivityType::WhatIf));

        session.reset();
        assert!(session.activity().is_none());
        assert_eq!(session.form.year_level, "");
        assert_eq!(session.form.subject_area, "");
        assert_eq!(session.form.unit_topic, "");
    }

    #[test]
    fn result_after_reset_is_ignored() {
        let mut session = filled_session();
        let ticket = session.begin().unwrap();
        session.reset();

        let late = compose(&ticket.input, ActivityType::MysteryVisual);
        assert!(!session.complete(ticket.epoch, late));
        assert!(session.activity().is_none());
        assert!(!session.is_busy());
    }

    #[test]
    fn stale_result_does_not_land_on_a_newer_generation() {
        let mut session = filled_session();
        let old = session.begin().unwrap();
        session.reset();

        session.form = FormInput::new("Year 10", "Science", "Cells");
        let current = session.begin().unwrap();
        assert_ne!(old.epoch, current.epoch);

        assert!(!session.complete(old.epoch, compose(&old.input, ActivityType::OddOneOut)));
        assert!(session.is_busy());

        let fresh = compose(&current.input, ActivityType::OddOneOut);
        assert!(session.complete(current.epoch, fresh.clone()));
        assert_eq!(session.activity(), Some(&fresh));
    }

    #[test]
    fn edits_after_submit_do_not_change_the_generated_input() {
        let mut session = filled_session();
        let ticket = session.begin().unwrap();
        session.form.unit_topic.push_str(" and Decimals");

        let activity = compose(&ticket.input, ActivityType::WhatIf);
        assert!(session.complete(ticket.epoch, activity));
        assert_eq!(session.generated_from().unwrap().unit_topic, "Fractions");
        assert_eq!(session.form.unit_topic, "Fractions and Decimals");
    }

    #[test]
    fn reset_forgets_the_generated_input() {
        let mut session = filled_session();
        let ticket = session.begin().unwrap();
        session.complete(ticket.epoch, compose(&ticket.input, ActivityType::OddOneOut));
        assert!(session.generated_from().is_some());

        session.reset();
        assert!(session.generated_from().is_none());
    }

    #[test]
    fn upstream_failure_surfaces_retry_message() {
        let mut session = filled_session();
        let ticket = session.begin().unwrap();
        let err = AppError::GenerationFailed("503".to_string());

        assert!(session.fail(ticket.epoch, &err));
        assert_eq!(session.error(), Some(GENERATION_FAILED_MESSAGE));
        assert!(!session.is_busy());
    }
}
