//! Behavioural coverage for the application submission workflow.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    FormSurface, MockApplicationRepository, MockRoleRepository, MockSessionProvider,
    NotificationVariant, Route,
};
use crate::domain::{
    ApplicationId, ApplicationStatus, AuthUser, Commitment, NewApplication, Role, SessionContext,
    UserId,
};

#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn seen(&self) -> Vec<Notification> {
        self.seen.lock().expect("notifier lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().expect("notifier lock").push(notification);
    }
}

#[derive(Default)]
struct RecordingSurface {
    dismissals: Mutex<u32>,
}

impl RecordingSurface {
    fn dismissals(&self) -> u32 {
        *self.dismissals.lock().expect("surface lock")
    }
}

impl FormSurface for RecordingSurface {
    fn dismiss(&self) {
        *self.dismissals.lock().expect("surface lock") += 1;
    }

    fn navigate(&self, _route: Route) {}
}

struct Harness {
    user: AuthUser,
    notifier: Arc<RecordingNotifier>,
    surface: Arc<RecordingSurface>,
    form: FormState<ApplicationFormValues>,
}

impl Harness {
    fn workflow<S: SessionProvider>(
        &self,
        session: S,
        roles: MockRoleRepository,
        applications: MockApplicationRepository,
    ) -> ApplicationSubmission<S, MockRoleRepository, MockApplicationRepository> {
        ApplicationSubmission::new(
            Arc::new(session),
            Arc::new(roles),
            Arc::new(applications),
            self.notifier.clone(),
            self.surface.clone(),
        )
    }

    fn signed_in(&self) -> SessionContext {
        SessionContext::signed_in(self.user.clone())
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        user: AuthUser::new(UserId::random(), Some("ada@example.com".to_owned())),
        notifier: Arc::new(RecordingNotifier::default()),
        surface: Arc::new(RecordingSurface::default()),
        form: FormState::with_values(valid_values()),
    }
}

fn valid_values() -> ApplicationFormValues {
    ApplicationFormValues {
        experience: "Five years building React apps".to_owned(),
        motivation: "I care about climate tooling".to_owned(),
        portfolio: "   ".to_owned(),
        phone: String::new(),
        email: " ada@example.com ".to_owned(),
    }
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 5, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn stored(new: &NewApplication) -> Application {
    Application {
        id: ApplicationId::random(),
        role_id: new.role_id,
        applicant_id: new.applicant_id,
        experience: new.experience.clone(),
        motivation: new.motivation.clone(),
        portfolio: new.portfolio.clone(),
        contact_phone: new.contact_phone.clone(),
        contact_email: new.contact_email.clone(),
        status: new.status,
        created_at: at(14),
        updated_at: at(14),
    }
}

fn role(project_id: ProjectId, title: &str, created_at: DateTime<Utc>) -> Role {
    Role {
        id: RoleId::random(),
        project_id,
        creator_id: UserId::random(),
        title: title.to_owned(),
        description: "Owns the product surface".to_owned(),
        skills: vec!["React".to_owned()],
        commitment: Commitment::PartTime,
        remote: true,
        created_at,
    }
}

fn role_target(role_id: RoleId) -> ApplicationTarget {
    ApplicationTarget::Role {
        role_id,
        title: "Frontend Developer".to_owned(),
    }
}

#[rstest]
#[tokio::test]
async fn explicit_role_writes_one_application(harness: Harness) {
    let role_id = RoleId::random();
    let user_id = harness.user.id;
    let mut roles = MockRoleRepository::new();
    roles.expect_list_roles_for_project().times(0);
    let mut applications = MockApplicationRepository::new();
    applications
        .expect_insert_application()
        .withf(move |new| {
            new.role_id == role_id
                && new.applicant_id == user_id
                && new.portfolio.is_none()
                && new.contact_phone.is_none()
                && new.contact_email == "ada@example.com"
                && new.status == ApplicationStatus::Pending
        })
        .times(1)
        .returning(|new| Ok(stored(new)));

    let workflow = harness.workflow(harness.signed_in(), roles, applications);
    let report = workflow.submit(&harness.form, &role_target(role_id)).await;

    assert!(report.is_submitted());
    assert_eq!(
        report.trace.stages(),
        &[
            SubmissionStage::Idle,
            SubmissionStage::Validating,
            SubmissionStage::ResolvingIdentity,
            SubmissionStage::ResolvingRole,
            SubmissionStage::Inserting,
            SubmissionStage::Succeeded,
        ]
    );
    assert!(!harness.form.is_submitting());
    assert!(!harness.form.is_dirty());
    assert_eq!(harness.surface.dismissals(), 1);

    let seen = harness.notifier.seen();
    assert_eq!(seen.len(), 1);
    let notification = seen.first().expect("one notification");
    assert_eq!(notification.title, APPLICATION_SUBMITTED_TITLE);
    assert_eq!(
        notification.description,
        "Your application for Frontend Developer has been successfully submitted."
    );
}

#[rstest]
#[tokio::test]
async fn unauthenticated_fails_without_writes(harness: Harness) {
    let mut roles = MockRoleRepository::new();
    roles.expect_list_roles_for_project().times(0);
    let mut applications = MockApplicationRepository::new();
    applications.expect_insert_application().times(0);

    let workflow = harness.workflow(SessionContext::signed_out(), roles, applications);
    let report = workflow
        .submit(&harness.form, &role_target(RoleId::random()))
        .await;

    assert_eq!(report.terminal_stage(), Some(SubmissionStage::Failed));
    assert!(!report.trace.visited(SubmissionStage::ResolvingRole));
    assert!(matches!(
        report.outcome,
        SubmissionOutcome::Failed(SubmissionFailure::Unauthenticated(SessionError::Missing))
    ));
    let seen = harness.notifier.seen();
    let notification = seen.first().expect("auth notification");
    assert_eq!(notification.description, "You must be logged in to apply");
    assert!(notification.is_destructive());
    assert!(!harness.form.is_submitting());
    assert!(harness.form.is_dirty());
    assert_eq!(harness.surface.dismissals(), 0);
}

#[rstest]
#[tokio::test]
async fn session_lookup_error_is_treated_as_signed_out(harness: Harness) {
    let mut session = MockSessionProvider::new();
    session
        .expect_current_user()
        .return_once(|| Err(SessionError::lookup("auth service unreachable")));
    let mut applications = MockApplicationRepository::new();
    applications.expect_insert_application().times(0);

    let workflow = harness.workflow(session, MockRoleRepository::new(), applications);
    let report = workflow
        .submit(&harness.form, &role_target(RoleId::random()))
        .await;

    let SubmissionOutcome::Failed(failure) = report.outcome else {
        panic!("expected failure, got {:?}", report.outcome);
    };
    assert_eq!(failure.user_message(), APPLY_LOGIN_REQUIRED);
    assert_eq!(DomainError::from(failure).code(), crate::domain::ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn project_without_roles_notes_interest(harness: Harness) {
    let project_id = ProjectId::random();
    let mut roles = MockRoleRepository::new();
    roles
        .expect_list_roles_for_project()
        .times(1)
        .returning(|_| Ok(Vec::new()));
    let mut applications = MockApplicationRepository::new();
    applications.expect_insert_application().times(0);

    let workflow = harness.workflow(harness.signed_in(), roles, applications);
    let target = ApplicationTarget::Project {
        project_id,
        title: "EcoTrack".to_owned(),
    };
    let report = workflow.submit(&harness.form, &target).await;

    assert_eq!(report.outcome, SubmissionOutcome::InterestNoted { project_id });
    assert_eq!(report.terminal_stage(), Some(SubmissionStage::NoOp));
    let seen = harness.notifier.seen();
    let notification = seen.first().expect("interest notification");
    assert_eq!(notification.title, INTEREST_NOTED_TITLE);
    assert_eq!(notification.variant, NotificationVariant::Info);
    assert_eq!(harness.surface.dismissals(), 1);
    assert!(!harness.form.is_submitting());
}

#[rstest]
#[case(RoleSelectionPolicy::FirstListed, "Designer")]
#[case(RoleSelectionPolicy::MostRecent, "Engineer")]
#[tokio::test]
async fn project_target_uses_selection_policy(
    harness: Harness,
    #[case] policy: RoleSelectionPolicy,
    #[case] expected_title: &str,
) {
    let project_id = ProjectId::random();
    let listed = vec![
        role(project_id, "Designer", at(9)),
        role(project_id, "Engineer", at(11)),
    ];
    let expected_id = listed
        .iter()
        .find(|r| r.title == expected_title)
        .map(|r| r.id)
        .expect("expected role listed");

    let mut roles = MockRoleRepository::new();
    roles
        .expect_list_roles_for_project()
        .return_once(move |_| Ok(listed));
    let mut applications = MockApplicationRepository::new();
    applications
        .expect_insert_application()
        .withf(move |new| new.role_id == expected_id)
        .times(1)
        .returning(|new| Ok(stored(new)));

    let workflow = harness
        .workflow(harness.signed_in(), roles, applications)
        .with_policy(policy);
    let target = ApplicationTarget::Project {
        project_id,
        title: "EcoTrack".to_owned(),
    };
    let report = workflow.submit(&harness.form, &target).await;

    assert!(report.is_submitted());
}

#[rstest]
#[tokio::test]
async fn insert_failure_surfaces_raw_message_and_keeps_form(harness: Harness) {
    let mut applications = MockApplicationRepository::new();
    applications.expect_insert_application().return_once(|_| {
        Err(BackendError::constraint(
            "insert or update on table \"applications\" violates foreign key constraint",
        ))
    });

    let workflow = harness.workflow(harness.signed_in(), MockRoleRepository::new(), applications);
    let report = workflow
        .submit(&harness.form, &role_target(RoleId::random()))
        .await;

    assert!(matches!(
        report.outcome,
        SubmissionOutcome::Failed(SubmissionFailure::Backend {
            stage: SubmissionStage::Inserting,
            ..
        })
    ));
    let seen = harness.notifier.seen();
    let notification = seen.first().expect("failure notification");
    assert_eq!(notification.title, APPLICATION_FAILED_TITLE);
    assert_eq!(
        notification.description,
        "insert or update on table \"applications\" violates foreign key constraint"
    );
    assert_eq!(harness.form.values(), valid_values());
    assert!(!harness.form.is_submitting());
    assert_eq!(harness.surface.dismissals(), 0);
}

#[rstest]
#[tokio::test]
async fn role_lookup_failure_stops_before_insert(harness: Harness) {
    let mut roles = MockRoleRepository::new();
    roles
        .expect_list_roles_for_project()
        .return_once(|_| Err(BackendError::connection("connection refused")));
    let mut applications = MockApplicationRepository::new();
    applications.expect_insert_application().times(0);

    let workflow = harness.workflow(harness.signed_in(), roles, applications);
    let target = ApplicationTarget::Project {
        project_id: ProjectId::random(),
        title: "EcoTrack".to_owned(),
    };
    let report = workflow.submit(&harness.form, &target).await;

    assert!(!report.trace.visited(SubmissionStage::Inserting));
    assert!(matches!(
        report.outcome,
        SubmissionOutcome::Failed(SubmissionFailure::Backend {
            stage: SubmissionStage::ResolvingRole,
            ..
        })
    ));
}

#[rstest]
#[case("123456789", false)]
#[case("1234567890", true)]
#[tokio::test]
async fn experience_length_gates_the_network(
    harness: Harness,
    #[case] experience: &str,
    #[case] accepted: bool,
) {
    harness.form.update(|values| values.experience = experience.to_owned());
    let mut applications = MockApplicationRepository::new();
    applications
        .expect_insert_application()
        .times(usize::from(accepted))
        .returning(|new| Ok(stored(new)));

    let workflow = harness.workflow(harness.signed_in(), MockRoleRepository::new(), applications);
    let report = workflow
        .submit(&harness.form, &role_target(RoleId::random()))
        .await;

    assert_eq!(report.is_submitted(), accepted);
    if !accepted {
        assert_eq!(
            report.trace.stages(),
            &[
                SubmissionStage::Idle,
                SubmissionStage::Validating,
                SubmissionStage::Failed
            ]
        );
        let SubmissionOutcome::Failed(SubmissionFailure::Invalid(errors)) = report.outcome else {
            panic!("expected validation failure");
        };
        assert!(errors.get("experience").is_some());
        assert!(harness.notifier.seen().is_empty());
    }
}

#[rstest]
#[tokio::test]
async fn validation_failure_skips_session_lookup(harness: Harness) {
    harness.form.reset();
    let mut session = MockSessionProvider::new();
    session.expect_current_user().times(0);

    let workflow = harness.workflow(
        session,
        MockRoleRepository::new(),
        MockApplicationRepository::new(),
    );
    let report = workflow
        .submit(&harness.form, &role_target(RoleId::random()))
        .await;

    let SubmissionOutcome::Failed(SubmissionFailure::Invalid(errors)) = report.outcome else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.fields(), vec!["experience", "motivation", "email"]);
}

#[rstest]
#[tokio::test]
async fn second_submit_while_in_flight_is_refused(harness: Harness) {
    let mut applications = MockApplicationRepository::new();
    applications.expect_insert_application().times(0);
    let workflow = harness.workflow(harness.signed_in(), MockRoleRepository::new(), applications);

    let held = harness.form.begin_submit().expect("first submit raises flag");
    let report = workflow
        .submit(&harness.form, &role_target(RoleId::random()))
        .await;
    drop(held);

    assert_eq!(report.outcome, SubmissionOutcome::InProgress);
    assert_eq!(report.trace.stages(), &[SubmissionStage::Idle]);
    assert!(!harness.form.is_submitting());
}
