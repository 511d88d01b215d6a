//! Loader coverage for the project details page.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockMemberRepository, MockProjectRepository, MockRoleRepository};
use crate::domain::{Commitment, Project, ProjectWithOwner, RoleId};

#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().expect("notifier lock").push(notification);
    }
}

impl RecordingNotifier {
    fn titles(&self) -> Vec<String> {
        self.seen
            .lock()
            .expect("notifier lock")
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

#[fixture]
fn notifier() -> Arc<RecordingNotifier> {
    Arc::new(RecordingNotifier::default())
}

fn profile(full_name: Option<&str>, avatar_url: Option<&str>) -> Profile {
    Profile {
        id: UserId::random(),
        full_name: full_name.map(str::to_owned),
        avatar_url: avatar_url.map(str::to_owned),
        username: None,
    }
}

fn project(id: ProjectId) -> Project {
    Project {
        id,
        title: "EcoTrack".to_owned(),
        description: "Carbon footprint tracking for small teams".to_owned(),
        category: "Climate".to_owned(),
        stage: ProjectStage::Launched,
        creator_id: UserId::random(),
        team_size: 3,
        created_at: Utc
            .with_ymd_and_hms(2025, 3, 5, 14, 7, 0)
            .single()
            .expect("valid timestamp"),
    }
}

fn member(project_id: ProjectId, role: &str, profile: Option<Profile>) -> ProjectMember {
    ProjectMember {
        project_id,
        user_id: UserId::random(),
        role: role.to_owned(),
        joined_at: Utc::now(),
        profile,
    }
}

fn role(project_id: ProjectId) -> Role {
    Role {
        id: RoleId::random(),
        project_id,
        creator_id: UserId::random(),
        title: "Backend Engineer".to_owned(),
        description: "Owns the data pipeline".to_owned(),
        skills: vec!["Rust".to_owned()],
        commitment: Commitment::FullTime,
        remote: false,
        created_at: Utc::now(),
    }
}

struct Repos {
    projects: MockProjectRepository,
    roles: MockRoleRepository,
    members: MockMemberRepository,
}

impl Repos {
    fn loader(
        self,
        notifier: Arc<RecordingNotifier>,
    ) -> ProjectDetailsLoader<MockProjectRepository, MockRoleRepository, MockMemberRepository>
    {
        ProjectDetailsLoader::new(
            Arc::new(self.projects),
            Arc::new(self.roles),
            Arc::new(self.members),
            notifier,
        )
    }
}

fn repos_for(project_id: ProjectId, members: Vec<ProjectMember>) -> Repos {
    let mut projects = MockProjectRepository::new();
    projects.expect_find_project().times(1).returning(|id| {
        Ok(Some(ProjectWithOwner {
            project: project(*id),
            owner: Some(profile(Some("Grace Hopper"), None)),
        }))
    });
    let mut roles = MockRoleRepository::new();
    roles
        .expect_list_roles_for_project()
        .times(1)
        .returning(move |_| Ok(vec![role(project_id)]));
    let mut member_repo = MockMemberRepository::new();
    member_repo
        .expect_list_members()
        .times(1)
        .return_once(move |_| Ok(members));
    Repos {
        projects,
        roles,
        members: member_repo,
    }
}

#[rstest]
#[tokio::test]
async fn loads_header_roles_and_team(notifier: Arc<RecordingNotifier>) {
    let project_id = ProjectId::random();
    let members = vec![
        member(
            project_id,
            "Founder",
            Some(profile(Some("Ada Lovelace"), Some("https://cdn.test/ada.png"))),
        ),
        member(project_id, "Engineer", Some(profile(Some("Ada Lovelace"), None))),
        member(project_id, "Advisor", Some(profile(Some("Plato"), None))),
        member(project_id, "Intern", Some(profile(None, None))),
    ];
    let loader = repos_for(project_id, members).loader(notifier.clone());

    assert_eq!(loader.load(Some(project_id)).await, LoadStatus::Loaded);
    let view = loader.view();
    let header = view.project.expect("header loaded");
    assert_eq!(header.title, "EcoTrack");
    let owner = header.owner.expect("owner joined");
    assert_eq!(owner.avatar, Avatar::Initials("GH".to_owned()));
    assert_eq!(view.roles.len(), 1);

    let avatars: Vec<_> = view.team.iter().map(|m| m.avatar.as_str()).collect();
    assert_eq!(avatars, vec!["https://cdn.test/ada.png", "AL", "P", "UN"]);
    let names: Vec<_> = view.team.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names.last(), Some(&"Unknown User"));
    assert!(notifier.titles().is_empty());
}

#[rstest]
#[tokio::test]
async fn same_project_is_not_refetched(notifier: Arc<RecordingNotifier>) {
    let project_id = ProjectId::random();
    let loader = repos_for(project_id, Vec::new()).loader(notifier);

    assert_eq!(loader.load(Some(project_id)).await, LoadStatus::Loaded);
    assert_eq!(loader.load(Some(project_id)).await, LoadStatus::Unchanged);
}

#[rstest]
#[tokio::test]
async fn missing_route_id_does_nothing(notifier: Arc<RecordingNotifier>) {
    let mut projects = MockProjectRepository::new();
    projects.expect_find_project().times(0);
    let repos = Repos {
        projects,
        roles: MockRoleRepository::new(),
        members: MockMemberRepository::new(),
    };
    let loader = repos.loader(notifier);

    assert_eq!(loader.load(None).await, LoadStatus::Skipped);
    assert!(loader.view().is_empty());
}

#[rstest]
#[tokio::test]
async fn unknown_project_raises_not_found(notifier: Arc<RecordingNotifier>) {
    let mut projects = MockProjectRepository::new();
    projects.expect_find_project().return_once(|_| Ok(None));
    let mut roles = MockRoleRepository::new();
    roles.expect_list_roles_for_project().times(0);
    let repos = Repos {
        projects,
        roles,
        members: MockMemberRepository::new(),
    };
    let loader = repos.loader(notifier.clone());

    assert_eq!(
        loader.load(Some(ProjectId::random())).await,
        LoadStatus::NotFound
    );
    assert!(loader.view().is_empty());
    assert_eq!(notifier.titles(), vec![PROJECT_NOT_FOUND.to_owned()]);
}

#[rstest]
#[tokio::test]
async fn member_read_failure_leaves_view_empty(notifier: Arc<RecordingNotifier>) {
    let mut projects = MockProjectRepository::new();
    projects.expect_find_project().returning(|id| {
        Ok(Some(ProjectWithOwner {
            project: project(*id),
            owner: None,
        }))
    });
    let mut roles = MockRoleRepository::new();
    roles
        .expect_list_roles_for_project()
        .returning(|id| Ok(vec![role(*id)]));
    let mut members = MockMemberRepository::new();
    members
        .expect_list_members()
        .return_once(|_| Err(BackendError::query("relation \"project_members\" does not exist")));
    let loader = Repos {
        projects,
        roles,
        members,
    }
    .loader(notifier.clone());

    assert_eq!(
        loader.load(Some(ProjectId::random())).await,
        LoadStatus::Failed
    );
    assert_eq!(loader.view(), ProjectDetailsView::default());
    assert_eq!(notifier.titles(), vec![PROJECT_LOAD_FAILED.to_owned()]);
}

#[rstest]
fn member_without_profile_uses_placeholders() {
    let card = TeamMember::from(member(ProjectId::random(), "Mentor", None));
    assert_eq!(card.name, UNKNOWN_USER_NAME);
    assert_eq!(card.avatar, Avatar::Initials(PLACEHOLDER_INITIALS.to_owned()));
}
