//! Registration wizard controller.
//!
//! The controller owns the current step and the draft. Steps validate their
//! own data and hand a [`StepData`] slice to [`RegistrationWizard::advance`];
//! only the controller mutates the draft.
use crate::error::{SubmissionError, ValidationError};
use crate::gateway::{submit_registration, MerchantApi};
use crate::registration::preview::PreviewRegistry;
use crate::registration::{
    BusinessForm, ContactForm, DocumentsForm, MerchantRegistration, PaymentForm,
    RegistrationDraft, ReviewForm, StepData, StepForm, StepId, TermsAcceptance,
};
use std::fmt;

/// Where the wizard is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Step(StepId),
    Submitting,
    Submitted,
    SubmitError,
}

/// User-visible outcome of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success { title: String, description: String },
    Error { title: String, description: String },
}

/// Render state of one entry in the step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepIndicator {
    pub step: StepId,
    pub status: StepStatus,
    pub clickable: bool,
}

/// The form to render for the current step, pre-filled from the draft.
#[derive(Debug)]
pub enum ActiveStep {
    Contact(ContactForm),
    Business(BusinessForm),
    Payment(PaymentForm),
    Documents(DocumentsForm),
    Review(ReviewForm),
}

impl ActiveStep {
    pub fn step(&self) -> StepId {
        match self {
            ActiveStep::Contact(_) => StepId::Contact,
            ActiveStep::Business(_) => StepId::Business,
            ActiveStep::Payment(_) => StepId::Payment,
            ActiveStep::Documents(_) => StepId::Documents,
            ActiveStep::Review(_) => StepId::Review,
        }
    }
}

type CompletionHook = Box<dyn FnMut(&MerchantRegistration)>;

pub struct RegistrationWizard {
    current: StepId,
    state: WizardState,
    draft: RegistrationDraft,
    notice: Option<Notice>,
    previews: PreviewRegistry,
    on_complete: Option<CompletionHook>,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegistrationWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationWizard")
            .field("current", &self.current)
            .field("state", &self.state)
            .field("draft", &self.draft)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            current: StepId::FIRST,
            state: WizardState::Step(StepId::FIRST),
            draft: RegistrationDraft::default(),
            notice: None,
            previews: PreviewRegistry::new(),
            on_complete: None,
        }
    }

    /// Use `previews` for document slots instead of a private registry.
    pub fn with_preview_registry(mut self, previews: PreviewRegistry) -> Self {
        self.previews = previews;
        self
    }

    /// Register a callback fired with the accepted payload after submission.
    pub fn on_complete(mut self, hook: impl FnMut(&MerchantRegistration) + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    pub fn current_step(&self) -> StepId {
        self.current
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.state == WizardState::Submitting
    }

    /// Build the form for the current step.
    pub fn active_step(&self) -> ActiveStep {
        let draft = &self.draft;
        match self.current {
            StepId::Contact => ActiveStep::Contact(draft.contact.clone().unwrap_or_default()),
            StepId::Business => ActiveStep::Business(draft.business.clone().unwrap_or_default()),
            StepId::Payment => ActiveStep::Payment(draft.payment.clone().unwrap_or_default()),
            StepId::Documents => {
                ActiveStep::Documents(DocumentsForm::from_draft(draft, self.previews.clone()))
            }
            StepId::Review => ActiveStep::Review(ReviewForm::from_draft(draft)),
        }
    }

    pub fn step_indicators(&self) -> Vec<StepIndicator> {
        StepId::ALL
            .into_iter()
            .map(|step| {
                let status = if step < self.current {
                    StepStatus::Completed
                } else if step == self.current {
                    StepStatus::Current
                } else {
                    StepStatus::Upcoming
                };
                StepIndicator {
                    step,
                    status,
                    clickable: status != StepStatus::Upcoming && self.accepts_navigation(),
                }
            })
            .collect()
    }

    /// Whether submit is enabled for the given acceptance state.
    pub fn can_submit(&self, acceptance: TermsAcceptance) -> bool {
        self.current == StepId::Review
            && !self.is_submitting()
            && self.state != WizardState::Submitted
            && acceptance.terms_and_condition
            && acceptance.return_policy
    }

    fn accepts_navigation(&self) -> bool {
        !matches!(
            self.state,
            WizardState::Submitting | WizardState::Submitted
        )
    }

    fn move_to(&mut self, step: StepId) {
        if step != self.current {
            tracing::info!(from = %self.current, to = %step, "wizard step changed");
        }
        self.current = step;
        self.state = WizardState::Step(step);
    }

    /// Merge a step's data and move to the next step.
    ///
    /// Validation belongs to the emitting step; nothing is checked here.
    pub fn advance(&mut self, data: StepData) {
        if !self.accepts_navigation() {
            tracing::warn!(state = ?self.state, "ignoring step data after submission");
            return;
        }
        tracing::debug!(step = %data.step(), "merging step data");
        self.draft.merge(data);
        let next = self.current.next().unwrap_or(self.current);
        self.move_to(next);
    }

    /// Go back one step, keeping everything already merged.
    pub fn retreat(&mut self) {
        if !self.accepts_navigation() {
            return;
        }
        let previous = self.current.previous().unwrap_or(StepId::FIRST);
        self.move_to(previous);
    }

    /// Jump to an earlier or the current step. Skipping ahead is refused.
    pub fn jump_to(&mut self, step: StepId) -> bool {
        if !self.accepts_navigation() || step > self.current {
            return false;
        }
        self.move_to(step);
        true
    }

    /// Merge the final acceptance and submit through `api`.
    ///
    /// On failure the draft is kept and the wizard stays on the review step,
    /// so the same call can be retried.
    pub fn submit<A: MerchantApi + ?Sized>(
        &mut self,
        api: &A,
        acceptance: TermsAcceptance,
    ) -> Result<MerchantRegistration, SubmissionError> {
        if self.state == WizardState::Submitted {
            return Err(SubmissionError::AlreadySubmitted);
        }
        if self.current != StepId::Review {
            return Err(SubmissionError::NotOnReviewStep);
        }
        self.draft.merge(StepData::Terms(acceptance));
        self.check_ready()?;

        self.state = WizardState::Submitting;
        self.notice = None;
        tracing::info!("submitting merchant registration");

        match submit_registration(api, &self.draft) {
            Ok(outcome) => {
                self.state = WizardState::Submitted;
                self.notice = Some(Notice::Success {
                    title: "Registration submitted successfully!".to_string(),
                    description: "Your application is being reviewed. You'll receive an email confirmation shortly.".to_string(),
                });
                if let Some(hook) = self.on_complete.as_mut() {
                    hook(&outcome.payload);
                }
                self.draft = RegistrationDraft::default();
                Ok(outcome.payload)
            }
            Err(err) => {
                tracing::warn!(error = %err, "merchant registration failed");
                self.state = WizardState::SubmitError;
                self.notice = Some(Notice::Error {
                    title: "Failed to submit registration".to_string(),
                    description: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn check_ready(&self) -> Result<(), ValidationError> {
        if let Some(step) = self.draft.first_missing_step() {
            let mut fields = crate::registration::FieldErrors::new();
            fields.insert("step", format!("{} information has not been completed", step.title()));
            return Err(ValidationError::new(step, fields));
        }
        ReviewForm::from_draft(&self.draft).submit().map(|_| ())
    }
}

#[cfg(test)]
#[path = "wizard_tests.rs"]
mod tests;
