//! Create-project form and its submission workflow.
//!
//! The project row is inserted first; when role drafts exist they are written
//! afterwards in a single bulk insert referencing the new project id. A
//! rejected role batch leaves the project row in place.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use super::ports::{
    BackendError, FormSurface, Notification, Notifier, ProjectRepository, RoleRepository, Route,
    SessionError, SessionProvider,
};
use super::application_submission::AUTH_REQUIRED_TITLE;
use super::{
    BusyGuard, DomainError, FieldErrors, FormSchema, FormState, NewRole, Project, ProjectFormValues,
    ProjectId, Role, RoleDraft, RoleFormValues, WorkflowTrace,
};

/// Notification body when a creator is not signed in.
pub const CREATE_LOGIN_REQUIRED: &str = "You must be logged in to create a project";
/// Notification title for a stored project.
pub const PROJECT_CREATED_TITLE: &str = "Project created!";
/// Notification title when a backend call fails.
pub const PROJECT_FAILED_TITLE: &str = "Error creating project";

/// The create-project form: project fields plus an ordered list of roles.
#[derive(Debug, Default)]
pub struct ProjectForm {
    fields: FormState<ProjectFormValues>,
    roles: Mutex<Vec<RoleDraft>>,
}

impl ProjectForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled with `values` and no roles.
    #[must_use]
    pub fn with_values(values: ProjectFormValues) -> Self {
        Self {
            fields: FormState::with_values(values),
            roles: Mutex::new(Vec::new()),
        }
    }

    fn roles_lock(&self) -> MutexGuard<'_, Vec<RoleDraft>> {
        self.roles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Project field state.
    #[must_use]
    pub const fn fields(&self) -> &FormState<ProjectFormValues> {
        &self.fields
    }

    /// Validate the role sub-form and append its draft.
    ///
    /// On success the role sub-form is reset so another role can be entered.
    ///
    /// # Errors
    ///
    /// Returns the role form's inline messages and leaves the list unchanged.
    pub fn add_role(&self, role_form: &FormState<RoleFormValues>) -> Result<RoleDraft, FieldErrors> {
        let draft = role_form.values().validate()?;
        self.roles_lock().push(draft.clone());
        role_form.reset();
        Ok(draft)
    }

    /// Remove the role at `index`, or `None` when out of range.
    #[must_use]
    pub fn remove_role(&self, index: usize) -> Option<RoleDraft> {
        let mut roles = self.roles_lock();
        (index < roles.len()).then(|| roles.remove(index))
    }

    /// Snapshot of the role drafts in entry order.
    #[must_use]
    pub fn roles(&self) -> Vec<RoleDraft> {
        self.roles_lock().clone()
    }

    /// True once a field differs from its default or a role was added.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.fields.is_dirty() || !self.roles_lock().is_empty()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.fields.is_submitting()
    }

    fn begin_submit(&self) -> Option<BusyGuard> {
        self.fields.begin_submit()
    }

    /// Clear every field and drop all role drafts.
    pub fn reset(&self) {
        self.fields.reset();
        self.roles_lock().clear();
    }
}

/// States of the creation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStage {
    Idle,
    Validating,
    ResolvingIdentity,
    InsertingProject,
    InsertingRoles,
    Succeeded,
    Failed,
}

/// States visited by one creation attempt.
pub type CreationTrace = WorkflowTrace<CreationStage>;

/// Why a creation attempt failed.
#[derive(Debug, Clone, PartialEq)]
pub enum CreationFailure {
    Invalid(FieldErrors),
    Unauthenticated(SessionError),
    /// A backend call failed during `stage`. `created_project` is set when
    /// the project row was already written.
    Backend {
        stage: CreationStage,
        error: BackendError,
        created_project: Option<ProjectId>,
    },
}

impl From<CreationFailure> for DomainError {
    fn from(value: CreationFailure) -> Self {
        match value {
            CreationFailure::Invalid(errors) => errors.into(),
            CreationFailure::Unauthenticated(_) => Self::unauthorized(CREATE_LOGIN_REQUIRED),
            CreationFailure::Backend { error, .. } => error.into(),
        }
    }
}

/// A stored project and its roles.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedProject {
    pub project: Project,
    pub roles: Vec<Role>,
    pub navigate_to: Route,
}

/// Terminal result of a creation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CreationOutcome {
    Created(CreatedProject),
    Failed(CreationFailure),
    InProgress,
}

/// Outcome plus the states visited on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationReport {
    pub trace: CreationTrace,
    pub outcome: CreationOutcome,
}

impl CreationReport {
    #[must_use]
    pub fn terminal_stage(&self) -> Option<CreationStage> {
        self.trace.last()
    }

    /// The created project, when the attempt succeeded.
    #[must_use]
    pub const fn created(&self) -> Option<&CreatedProject> {
        match &self.outcome {
            CreationOutcome::Created(created) => Some(created),
            CreationOutcome::Failed(_) | CreationOutcome::InProgress => None,
        }
    }
}

/// Success message for a project created with `role_count` roles.
#[must_use]
pub fn created_message(role_count: usize) -> String {
    let roles = if role_count > 0 {
        format!("{role_count} role(s)")
    } else {
        "no roles".to_owned()
    };
    format!("Your project has been successfully created with {roles}.")
}

/// Submits create-project forms against the backend ports.
pub struct ProjectCreation<S, P, R> {
    session: Arc<S>,
    projects: Arc<P>,
    roles: Arc<R>,
    notifier: Arc<dyn Notifier>,
    surface: Arc<dyn FormSurface>,
}

impl<S, P, R> ProjectCreation<S, P, R>
where
    S: SessionProvider,
    P: ProjectRepository,
    R: RoleRepository,
{
    #[must_use]
    pub fn new(
        session: Arc<S>,
        projects: Arc<P>,
        roles: Arc<R>,
        notifier: Arc<dyn Notifier>,
        surface: Arc<dyn FormSurface>,
    ) -> Self {
        Self {
            session,
            projects,
            roles,
            notifier,
            surface,
        }
    }

    /// Run one submission of `form`.
    pub async fn submit(&self, form: &ProjectForm) -> CreationReport {
        let mut trace = CreationTrace::starting_at("project_creation", CreationStage::Idle);
        let Some(_busy) = form.begin_submit() else {
            warn!("project creation refused: already submitting");
            return CreationReport {
                trace,
                outcome: CreationOutcome::InProgress,
            };
        };
        let outcome = self.run(form, &mut trace).await;
        CreationReport { trace, outcome }
    }

    async fn run(&self, form: &ProjectForm, trace: &mut CreationTrace) -> CreationOutcome {
        trace.enter(CreationStage::Validating);
        let draft = match form.fields().values().validate() {
            Ok(draft) => draft,
            Err(errors) => return fail(trace, CreationFailure::Invalid(errors)),
        };
        let role_drafts = form.roles();

        trace.enter(CreationStage::ResolvingIdentity);
        let user = match self.session.current_user().await {
            Ok(user) => user,
            Err(err) => {
                warn!(kind = err.kind(), "project creation without a session");
                self.notifier
                    .notify(Notification::error(AUTH_REQUIRED_TITLE, CREATE_LOGIN_REQUIRED));
                return fail(trace, CreationFailure::Unauthenticated(err));
            }
        };

        trace.enter(CreationStage::InsertingProject);
        let project = match self.projects.insert_project(&draft.into_new_project(user.id)).await {
            Ok(project) => project,
            Err(error) => {
                return self.backend_failure(trace, CreationStage::InsertingProject, error, None);
            }
        };

        let roles = if role_drafts.is_empty() {
            Vec::new()
        } else {
            trace.enter(CreationStage::InsertingRoles);
            let new_roles: Vec<NewRole> = role_drafts
                .iter()
                .map(|role| role.to_new_role(project.id, user.id))
                .collect();
            match self.roles.insert_roles(&new_roles).await {
                Ok(roles) => roles,
                Err(error) => {
                    return self.backend_failure(
                        trace,
                        CreationStage::InsertingRoles,
                        error,
                        Some(project.id),
                    );
                }
            }
        };

        trace.enter(CreationStage::Succeeded);
        info!(
            project_id = %project.id,
            role_count = role_drafts.len(),
            creator_id = %user.id,
            "project created"
        );
        self.notifier.notify(Notification::success(
            PROJECT_CREATED_TITLE,
            created_message(role_drafts.len()),
        ));
        form.reset();
        self.surface.navigate(Route::Dashboard);
        CreationOutcome::Created(CreatedProject {
            project,
            roles,
            navigate_to: Route::Dashboard,
        })
    }

    fn backend_failure(
        &self,
        trace: &mut CreationTrace,
        stage: CreationStage,
        error: BackendError,
        created_project: Option<ProjectId>,
    ) -> CreationOutcome {
        warn!(
            ?stage,
            kind = error.kind(),
            message = error.message(),
            orphaned_project = ?created_project,
            "project creation failed"
        );
        self.notifier
            .notify(Notification::error(PROJECT_FAILED_TITLE, error.message()));
        fail(
            trace,
            CreationFailure::Backend {
                stage,
                error,
                created_project,
            },
        )
    }
}

fn fail(trace: &mut CreationTrace, failure: CreationFailure) -> CreationOutcome {
    trace.enter(CreationStage::Failed);
    CreationOutcome::Failed(failure)
}
