//! Shared doubles for client integration tests.
//!
//! Integration tests compile as separate crates, so the presentation doubles
//! and seeding helpers live here rather than in each test file.

use std::sync::{Arc, Mutex};

use chrono::{TimeDelta, Utc};
use teamup_client::domain::ports::{FormSurface, Notification, Notifier, Route};
use teamup_client::domain::{
    AuthUser, Commitment, Project, ProjectId, ProjectStage, Role, RoleId, UserId,
};
use teamup_client::outbound::memory::InMemoryBackend;
use tokio::runtime::Runtime;

/// Runtime shared by the steps of one scenario.
#[derive(Clone)]
pub struct RuntimeHandle(pub Arc<Runtime>);

impl RuntimeHandle {
    pub fn new() -> Self {
        Self(Arc::new(Runtime::new().expect("create runtime")))
    }
}

/// Notifier that keeps every notification.
#[derive(Default)]
pub struct RecordingNotifier(Mutex<Vec<Notification>>);

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.0
            .lock()
            .expect("notifier lock")
            .iter()
            .map(|notification| notification.title.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.0.lock().expect("notifier lock").push(notification);
    }
}

/// Surface that counts dismissals and keeps navigation requests.
#[derive(Default)]
pub struct RecordingSurface {
    dismissed: Mutex<usize>,
    routes: Mutex<Vec<Route>>,
}

impl RecordingSurface {
    pub fn dismissed(&self) -> usize {
        *self.dismissed.lock().expect("surface lock")
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().expect("surface lock").clone()
    }
}

impl FormSurface for RecordingSurface {
    fn dismiss(&self) {
        *self.dismissed.lock().expect("surface lock") += 1;
    }

    fn navigate(&self, route: Route) {
        self.routes.lock().expect("surface lock").push(route);
    }
}

/// Strip the quotes Gherkin captures keep around string arguments.
pub fn unquote(raw: &str) -> String {
    raw.trim().trim_matches('"').to_owned()
}

/// Seed a project owned by a fresh founder with `role_titles`, oldest first.
pub fn seed_project(backend: &InMemoryBackend, title: &str, role_titles: &[String]) -> ProjectId {
    let founder = UserId::random();
    let project_id = ProjectId::random();
    let created_at = Utc::now() - TimeDelta::days(1);
    backend.seed_project(Project {
        id: project_id,
        title: title.to_owned(),
        description: "A project description long enough".to_owned(),
        category: "Climate".to_owned(),
        stage: ProjectStage::Idea,
        creator_id: founder,
        team_size: 1,
        created_at,
    });
    for (offset, role_title) in (0_i64..).zip(role_titles) {
        backend.seed_role(Role {
            id: RoleId::random(),
            project_id,
            creator_id: founder,
            title: role_title.clone(),
            description: "Role description".to_owned(),
            skills: vec!["Rust".to_owned()],
            commitment: Commitment::FullTime,
            remote: true,
            created_at: created_at + TimeDelta::minutes(offset),
        });
    }
    project_id
}

/// A signed-in user with an email address.
pub fn applicant() -> AuthUser {
    AuthUser::new(UserId::random(), Some("ada@example.com".to_owned()))
}
