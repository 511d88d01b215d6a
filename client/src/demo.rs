//! Seed data for running the binary without a hosted service.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use teamup_client::domain::{
    AuthUser, Commitment, Profile, Project, ProjectId, ProjectMember, ProjectStage, Role, RoleId,
    UserId,
};
use teamup_client::outbound::memory::InMemoryBackend;

struct ProjectSeed {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    stage: ProjectStage,
    roles: &'static [(&'static str, &'static str, &'static str, Commitment, bool)],
}

const PROJECTS: [ProjectSeed; 3] = [
    ProjectSeed {
        title: "EcoTrack",
        description: "Carbon footprint tracking for small teams and their suppliers.",
        category: "Climate",
        stage: ProjectStage::Development,
        roles: &[
            (
                "Product Designer",
                "Own the dashboard experience end to end.",
                "Figma, UI/UX",
                Commitment::PartTime,
                true,
            ),
            (
                "Backend Engineer",
                "Build the ingestion pipeline for supplier data.",
                "Rust, PostgreSQL",
                Commitment::FullTime,
                false,
            ),
        ],
    },
    ProjectSeed {
        title: "Ledgerly",
        description: "Bookkeeping assistant that reconciles receipts automatically.",
        category: "Fintech",
        stage: ProjectStage::Idea,
        roles: &[(
            "Growth Marketer",
            "Find the first hundred paying customers.",
            "SEO, Content",
            Commitment::Flexible,
            true,
        )],
    },
    ProjectSeed {
        title: "Quiet Hours",
        description: "Focus scheduling for distributed teams across time zones.",
        category: "Productivity",
        stage: ProjectStage::Launched,
        roles: &[],
    },
];

fn profile(name: &str, username: &str) -> Profile {
    Profile {
        id: UserId::random(),
        full_name: Some(name.to_owned()),
        avatar_url: None,
        username: Some(username.to_owned()),
    }
}

fn seed_project(
    backend: &InMemoryBackend,
    seed: &ProjectSeed,
    owner: &Profile,
    created_at: DateTime<Utc>,
) -> ProjectId {
    let project_id = ProjectId::random();
    backend.seed_project(Project {
        id: project_id,
        title: seed.title.to_owned(),
        description: seed.description.to_owned(),
        category: seed.category.to_owned(),
        stage: seed.stage,
        creator_id: owner.id,
        team_size: 1,
        created_at,
    });
    for (title, description, skills, commitment, remote) in seed.roles {
        backend.seed_role(Role {
            id: RoleId::random(),
            project_id,
            creator_id: owner.id,
            title: (*title).to_owned(),
            description: (*description).to_owned(),
            skills: teamup_client::domain::normalize_skills(skills),
            commitment: *commitment,
            remote: *remote,
            created_at,
        });
    }
    backend.seed_member(ProjectMember {
        project_id,
        user_id: owner.id,
        role: "Founder".to_owned(),
        joined_at: created_at,
        profile: None,
    });
    project_id
}

/// A backend holding a few projects and the user the demo signs in as.
#[must_use]
pub fn seeded_backend() -> (InMemoryBackend, AuthUser) {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let now = clock.utc();
    let backend = InMemoryBackend::new(clock);

    let demo_user = profile("Ada Lovelace", "ada");
    let founder = profile("Grace Hopper", "grace");
    backend.seed_profile(demo_user.clone());
    backend.seed_profile(founder.clone());

    let mut created_at = now - TimeDelta::days(3);
    for (index, seed) in PROJECTS.iter().enumerate() {
        let owner = if index == 1 { &demo_user } else { &founder };
        seed_project(&backend, seed, owner, created_at);
        created_at += TimeDelta::days(1);
    }

    let user = AuthUser::new(demo_user.id, Some("ada@example.com".to_owned()));
    (backend, user)
}
