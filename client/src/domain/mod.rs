//! Domain primitives, form schemas, workflows, and loaders.
//!
//! Purpose: hold everything that does not depend on a transport. Adapters in
//! `outbound` implement the traits in [`ports`]; inbound surfaces drive the
//! workflows and loaders exported here.
//!
//! Public surface:
//! - Entities: [`Project`], [`Role`], [`Application`], [`ProjectMember`],
//!   [`Profile`] and their ids.
//! - Forms: [`FormSchema`] implementations and the [`FormState`] controller.
//! - Workflows: [`ApplicationSubmission`] and [`ProjectCreation`].
//! - Loaders: [`DashboardLoader`], [`ExploreLoader`],
//!   [`ProjectDetailsLoader`].

pub mod application;
pub mod application_submission;
pub mod dashboard;
pub mod error;
pub mod form_state;
pub mod formatting;
pub mod forms;
pub mod ids;
pub mod ports;
pub mod profile;
pub mod project;
pub mod project_creation;
pub mod project_details;
pub mod reactive;
pub mod role;
pub mod role_selection;
pub mod session;
pub mod validation;
pub mod workflow_trace;

pub use self::application::{
    Application, ApplicationDraft, ApplicationStatus, ApplicationWithProject, NewApplication,
};
pub use self::application_submission::{
    ApplicationSubmission, ApplicationTarget, SubmissionFailure, SubmissionOutcome,
    SubmissionReport, SubmissionStage, SubmissionTrace,
};
pub use self::dashboard::{
    ActivityItem, DashboardLoader, DashboardView, ExploreLoader, ProjectSummary,
};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::form_state::{BusyFlag, BusyGuard, FormState};
pub use self::formatting::format_timestamp;
pub use self::forms::{
    ApplicationFormValues, FormSchema, ProjectFormValues, RoleFormValues, normalize_skills,
};
pub use self::ids::{ApplicationId, IdValidationError, ProjectId, RoleId, UserId};
pub use self::profile::{
    Avatar, PLACEHOLDER_INITIALS, Profile, ProjectMember, UNKNOWN_USER_NAME, initials,
};
pub use self::project::{
    NewProject, Project, ProjectDraft, ProjectFilter, ProjectStage, ProjectWithOwner,
    ProjectWithRoleCount, UnknownVariantError,
};
pub use self::project_creation::{
    CreatedProject, CreationFailure, CreationOutcome, CreationReport, CreationStage,
    ProjectCreation, ProjectForm,
};
pub use self::project_details::{
    ProjectDetailsLoader, ProjectDetailsView, ProjectHeader, ProjectOwner, TeamMember,
};
pub use self::reactive::{LoadStatus, ReactiveView};
pub use self::role::{Commitment, NewRole, Role, RoleDraft};
pub use self::role_selection::RoleSelectionPolicy;
pub use self::session::{AuthUser, SessionContext};
pub use self::validation::{FieldError, FieldErrors};
pub use self::workflow_trace::WorkflowTrace;
