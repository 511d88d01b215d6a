//! Application submission workflow.
//!
//! Drives one "apply" form through
//! `Idle → Validating → ResolvingIdentity → ResolvingRole → Inserting` and
//! ends in `Succeeded`, `Failed`, or `NoOp` when the project has no role to
//! attach the application to. No step is retried; a failure is terminal for
//! that attempt and leaves the form populated.

use std::sync::Arc;

use tracing::{info, warn};

use super::ports::{
    ApplicationRepository, BackendError, FormSurface, Notification, Notifier, RoleRepository,
    SessionError, SessionProvider,
};
use super::{
    Application, ApplicationFormValues, DomainError, FieldErrors, FormSchema, FormState, ProjectId,
    RoleId, RoleSelectionPolicy, WorkflowTrace,
};

/// Notification title when nobody is signed in.
pub const AUTH_REQUIRED_TITLE: &str = "Authentication required";
/// Notification body when an applicant is not signed in.
pub const APPLY_LOGIN_REQUIRED: &str = "You must be logged in to apply";
/// Notification title for a stored application.
pub const APPLICATION_SUBMITTED_TITLE: &str = "Application submitted!";
/// Notification title when a backend call fails.
pub const APPLICATION_FAILED_TITLE: &str = "Error submitting application";
/// Notification title for the zero-role outcome.
pub const INTEREST_NOTED_TITLE: &str = "Interest noted";

/// States of the submission state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Idle,
    Validating,
    ResolvingIdentity,
    ResolvingRole,
    Inserting,
    Succeeded,
    Failed,
    NoOp,
}

/// States visited by one submission.
pub type SubmissionTrace = WorkflowTrace<SubmissionStage>;

/// What the applicant is applying to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationTarget {
    /// A role the applicant picked explicitly.
    Role { role_id: RoleId, title: String },
    /// A project; the role is chosen by the configured policy.
    Project { project_id: ProjectId, title: String },
}

impl ApplicationTarget {
    /// Name shown in notifications.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Role { title, .. } | Self::Project { title, .. } => title,
        }
    }
}

/// Why a submission failed.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionFailure {
    /// One or more fields failed validation.
    Invalid(FieldErrors),
    /// No session could be resolved.
    Unauthenticated(SessionError),
    /// A backend call failed during `stage`.
    Backend {
        stage: SubmissionStage,
        error: BackendError,
    },
}

impl SubmissionFailure {
    /// Text shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(errors) => errors.to_string(),
            Self::Unauthenticated(_) => APPLY_LOGIN_REQUIRED.to_owned(),
            Self::Backend { error, .. } => error.message().to_owned(),
        }
    }
}

impl From<SubmissionFailure> for DomainError {
    fn from(value: SubmissionFailure) -> Self {
        match value {
            SubmissionFailure::Invalid(errors) => errors.into(),
            SubmissionFailure::Unauthenticated(_) => Self::unauthorized(APPLY_LOGIN_REQUIRED),
            SubmissionFailure::Backend { error, .. } => error.into(),
        }
    }
}

/// Terminal result of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The application row was stored.
    Submitted(Application),
    /// The project has no roles, so nothing was written.
    InterestNoted { project_id: ProjectId },
    /// The attempt failed.
    Failed(SubmissionFailure),
    /// Another submission on this form is still running.
    InProgress,
}

/// Outcome plus the states visited on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub trace: SubmissionTrace,
    pub outcome: SubmissionOutcome,
}

impl SubmissionReport {
    /// The state the workflow ended in.
    #[must_use]
    pub fn terminal_stage(&self) -> Option<SubmissionStage> {
        self.trace.last()
    }

    /// Whether an application row was written.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self.outcome, SubmissionOutcome::Submitted(_))
    }
}

/// Submits application forms against the backend ports.
pub struct ApplicationSubmission<S, R, A> {
    session: Arc<S>,
    roles: Arc<R>,
    applications: Arc<A>,
    notifier: Arc<dyn Notifier>,
    surface: Arc<dyn FormSurface>,
    policy: RoleSelectionPolicy,
}

impl<S, R, A> ApplicationSubmission<S, R, A>
where
    S: SessionProvider,
    R: RoleRepository,
    A: ApplicationRepository,
{
    /// Create a workflow using the default role selection policy.
    #[must_use]
    pub fn new(
        session: Arc<S>,
        roles: Arc<R>,
        applications: Arc<A>,
        notifier: Arc<dyn Notifier>,
        surface: Arc<dyn FormSurface>,
    ) -> Self {
        Self {
            session,
            roles,
            applications,
            notifier,
            surface,
            policy: RoleSelectionPolicy::default(),
        }
    }

    /// Replace the role selection policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RoleSelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The policy applied to project-level applications.
    #[must_use]
    pub const fn policy(&self) -> RoleSelectionPolicy {
        self.policy
    }

    /// Run one submission of `form` against `target`.
    ///
    /// The form's `submitting` flag is raised for the whole run and lowered
    /// on return, whatever the outcome.
    pub async fn submit(
        &self,
        form: &FormState<ApplicationFormValues>,
        target: &ApplicationTarget,
    ) -> SubmissionReport {
        let mut trace = SubmissionTrace::starting_at("application_submission", SubmissionStage::Idle);
        let Some(_busy) = form.begin_submit() else {
            warn!("application submission refused: already submitting");
            return SubmissionReport {
                trace,
                outcome: SubmissionOutcome::InProgress,
            };
        };

        let outcome = self.run(form, target, &mut trace).await;
        SubmissionReport { trace, outcome }
    }

    async fn run(
        &self,
        form: &FormState<ApplicationFormValues>,
        target: &ApplicationTarget,
        trace: &mut SubmissionTrace,
    ) -> SubmissionOutcome {
        trace.enter(SubmissionStage::Validating);
        let draft = match form.values().validate() {
            Ok(draft) => draft,
            Err(errors) => {
                return fail(trace, SubmissionFailure::Invalid(errors));
            }
        };

        trace.enter(SubmissionStage::ResolvingIdentity);
        let user = match self.session.current_user().await {
            Ok(user) => user,
            Err(err) => {
                warn!(kind = err.kind(), "application submission without a session");
                self.notifier
                    .notify(Notification::error(AUTH_REQUIRED_TITLE, APPLY_LOGIN_REQUIRED));
                return fail(trace, SubmissionFailure::Unauthenticated(err));
            }
        };

        trace.enter(SubmissionStage::ResolvingRole);
        let role_id = match target {
            ApplicationTarget::Role { role_id, .. } => *role_id,
            ApplicationTarget::Project { project_id, title } => {
                let roles = match self.roles.list_roles_for_project(project_id).await {
                    Ok(roles) => roles,
                    Err(error) => {
                        return self.backend_failure(trace, SubmissionStage::ResolvingRole, error);
                    }
                };
                let Some(role) = self.policy.select(&roles) else {
                    info!(%project_id, "project has no roles; recording interest only");
                    trace.enter(SubmissionStage::NoOp);
                    self.notifier.notify(Notification::info(
                        INTEREST_NOTED_TITLE,
                        format!(
                            "{title} has no open roles yet, so your interest has been noted."
                        ),
                    ));
                    form.reset();
                    self.surface.dismiss();
                    return SubmissionOutcome::InterestNoted {
                        project_id: *project_id,
                    };
                };
                role.id
            }
        };

        trace.enter(SubmissionStage::Inserting);
        let new_application = draft.into_new_application(role_id, user.id);
        match self.applications.insert_application(&new_application).await {
            Ok(application) => {
                trace.enter(SubmissionStage::Succeeded);
                info!(
                    application_id = %application.id,
                    %role_id,
                    applicant_id = %user.id,
                    "application submitted"
                );
                self.notifier.notify(Notification::success(
                    APPLICATION_SUBMITTED_TITLE,
                    format!(
                        "Your application for {} has been successfully submitted.",
                        target.title()
                    ),
                ));
                form.reset();
                self.surface.dismiss();
                SubmissionOutcome::Submitted(application)
            }
            Err(error) => self.backend_failure(trace, SubmissionStage::Inserting, error),
        }
    }

    fn backend_failure(
        &self,
        trace: &mut SubmissionTrace,
        stage: SubmissionStage,
        error: BackendError,
    ) -> SubmissionOutcome {
        warn!(?stage, kind = error.kind(), message = error.message(), "application submission failed");
        self.notifier.notify(Notification::error(
            APPLICATION_FAILED_TITLE,
            error.message(),
        ));
        fail(trace, SubmissionFailure::Backend { stage, error })
    }
}

fn fail(trace: &mut SubmissionTrace, failure: SubmissionFailure) -> SubmissionOutcome {
    trace.enter(SubmissionStage::Failed);
    SubmissionOutcome::Failed(failure)
}

#[cfg(test)]
mod tests;
