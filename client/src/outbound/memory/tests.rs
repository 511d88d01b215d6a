//! Behavioural coverage for the in-memory backend.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{ApplicationStatus, Commitment, ProjectStage};

struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    fn starting_at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.0.lock().expect("clock lock");
        let current = *now;
        *now += TimeDelta::minutes(1);
        current
    }
}

#[fixture]
fn backend() -> InMemoryBackend {
    let start = Utc
        .with_ymd_and_hms(2025, 3, 5, 14, 7, 0)
        .single()
        .expect("valid timestamp");
    InMemoryBackend::new(Arc::new(SteppingClock::starting_at(start)))
}

fn new_project(title: &str, creator_id: UserId) -> NewProject {
    NewProject {
        title: title.to_owned(),
        description: "A project description long enough".to_owned(),
        category: "Climate".to_owned(),
        stage: ProjectStage::Idea,
        creator_id,
    }
}

fn new_role(project_id: ProjectId, creator_id: UserId, title: &str) -> NewRole {
    NewRole {
        project_id,
        creator_id,
        title: title.to_owned(),
        description: "Role description".to_owned(),
        skills: vec!["Rust".to_owned()],
        commitment: Commitment::FullTime,
        remote: true,
    }
}

fn new_application(role_id: RoleId, applicant_id: UserId) -> NewApplication {
    NewApplication {
        role_id,
        applicant_id,
        experience: "Ten years of Rust".to_owned(),
        motivation: "I like the mission".to_owned(),
        portfolio: None,
        contact_phone: None,
        contact_email: "ada@example.com".to_owned(),
        status: ApplicationStatus::Pending,
    }
}

#[rstest]
#[tokio::test]
async fn lists_projects_newest_first_with_role_counts(backend: InMemoryBackend) {
    let creator = UserId::random();
    let older = backend
        .insert_project(&new_project("Older", creator))
        .await
        .expect("insert older");
    let newer = backend
        .insert_project(&new_project("Newer", creator))
        .await
        .expect("insert newer");
    backend
        .insert_roles(&[
            new_role(older.id, creator, "Designer"),
            new_role(older.id, creator, "Engineer"),
        ])
        .await
        .expect("insert roles");
    backend
        .insert_project(&new_project("Someone else's", UserId::random()))
        .await
        .expect("insert other");

    let own = backend
        .list_projects(ProjectFilter::created_by(creator))
        .await
        .expect("list own");
    let summary: Vec<_> = own
        .iter()
        .map(|row| (row.project.id, row.role_count))
        .collect();
    assert_eq!(summary, vec![(newer.id, 0), (older.id, 2)]);

    let all = backend
        .list_projects(ProjectFilter::all())
        .await
        .expect("list all");
    assert_eq!(all.len(), 3);
}

#[rstest]
#[tokio::test]
async fn role_batch_is_all_or_nothing(backend: InMemoryBackend) {
    let creator = UserId::random();
    let project = backend
        .insert_project(&new_project("EcoTrack", creator))
        .await
        .expect("insert project");

    let error = backend
        .insert_roles(&[
            new_role(project.id, creator, "Designer"),
            new_role(ProjectId::random(), creator, "Ghost"),
        ])
        .await
        .expect_err("unknown project rejected");

    assert!(matches!(error, BackendError::Constraint { .. }));
    assert!(error.message().contains("roles_project_id_fkey"));
    assert!(backend.roles().is_empty());
    assert_eq!(backend.writes(), vec![WriteRecord::Project(project.id)]);
}

#[rstest]
#[tokio::test]
async fn project_roles_are_listed_oldest_first(backend: InMemoryBackend) {
    let creator = UserId::random();
    let project = backend
        .insert_project(&new_project("EcoTrack", creator))
        .await
        .expect("insert project");
    let posted = |title: &str, day: u32| Role {
        id: RoleId::random(),
        project_id: project.id,
        creator_id: creator,
        title: title.to_owned(),
        description: "Role description".to_owned(),
        skills: Vec::new(),
        commitment: Commitment::Flexible,
        remote: true,
        created_at: Utc
            .with_ymd_and_hms(2025, 3, day, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    };
    backend.seed_role(posted("Marketer", 9));
    backend.seed_role(posted("Designer", 2));

    let roles = backend
        .list_roles_for_project(&project.id)
        .await
        .expect("list roles");

    let titles: Vec<&str> = roles.iter().map(|role| role.title.as_str()).collect();
    assert_eq!(titles, vec!["Designer", "Marketer"]);
}

#[rstest]
#[tokio::test]
async fn application_requires_existing_role(backend: InMemoryBackend) {
    let error = backend
        .insert_application(&new_application(RoleId::random(), UserId::random()))
        .await
        .expect_err("unknown role rejected");
    assert!(error.message().contains("applications_role_id_fkey"));
    assert!(backend.writes().is_empty());
}

#[rstest]
#[tokio::test]
async fn duplicate_applications_are_accepted(backend: InMemoryBackend) {
    let creator = UserId::random();
    let applicant = UserId::random();
    let project = backend
        .insert_project(&new_project("EcoTrack", creator))
        .await
        .expect("insert project");
    let roles = backend
        .insert_roles(&[new_role(project.id, creator, "Designer")])
        .await
        .expect("insert role");
    let role = roles.first().expect("one role");

    for _ in 0..2 {
        backend
            .insert_application(&new_application(role.id, applicant))
            .await
            .expect("insert application");
    }

    let joined = backend
        .list_applications_for_applicant(&applicant)
        .await
        .expect("list applications");
    assert_eq!(joined.len(), 2);
    assert!(joined.iter().all(|row| row.project.id == project.id));
    let first = joined.first().expect("newest");
    let second = joined.get(1).expect("oldest");
    assert!(first.application.created_at > second.application.created_at);
}

#[rstest]
#[tokio::test]
async fn find_project_joins_owner_profile(backend: InMemoryBackend) {
    let creator = UserId::random();
    backend.seed_profile(Profile {
        id: creator,
        full_name: Some("Grace Hopper".to_owned()),
        avatar_url: None,
        username: Some("grace".to_owned()),
    });
    let project = backend
        .insert_project(&new_project("EcoTrack", creator))
        .await
        .expect("insert project");

    let found = backend
        .find_project(&project.id)
        .await
        .expect("lookup")
        .expect("project exists");
    assert_eq!(
        found.owner.and_then(|owner| owner.full_name),
        Some("Grace Hopper".to_owned())
    );
    assert!(
        backend
            .find_project(&ProjectId::random())
            .await
            .expect("lookup")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn members_are_joined_with_profiles(backend: InMemoryBackend) {
    let project_id = ProjectId::random();
    let with_profile = UserId::random();
    backend.seed_profile(Profile {
        id: with_profile,
        full_name: Some("Ada Lovelace".to_owned()),
        avatar_url: None,
        username: None,
    });
    for user_id in [with_profile, UserId::random()] {
        backend.seed_member(ProjectMember {
            project_id,
            user_id,
            role: "Engineer".to_owned(),
            joined_at: Utc::now(),
            profile: None,
        });
    }

    let members = backend.list_members(&project_id).await.expect("list members");
    let profiles: Vec<_> = members.iter().map(|m| m.profile.is_some()).collect();
    assert_eq!(profiles, vec![true, false]);
}

#[rstest]
#[tokio::test]
async fn injected_failures_apply_until_healed(backend: InMemoryBackend) {
    backend.fail_table(Table::Projects, BackendError::connection("connection refused"));
    let error = backend
        .list_projects(ProjectFilter::all())
        .await
        .expect_err("failure injected");
    assert_eq!(error.message(), "connection refused");

    backend.heal_table(Table::Projects);
    assert!(backend.list_projects(ProjectFilter::all()).await.is_ok());
}
