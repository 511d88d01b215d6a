//! Text pages for the explore list, project details, and dashboard.

use std::fmt::Debug;

use crate::domain::formatting::{member_count_label, open_roles_label};
use crate::domain::{
    DashboardView, ProjectDetailsView, ProjectSummary, Role, WorkflowTrace, format_timestamp,
};

const EMPTY_EXPLORE: &str = "No projects yet.";
const EMPTY_MY_PROJECTS: &str = "You haven't created any projects yet.";
const EMPTY_APPLIED: &str = "You haven't applied to any projects yet.";
const EMPTY_ACTIVITY: &str = "No recent activity.";
const EMPTY_ROLES: &str = "No open roles.";
const EMPTY_TEAM: &str = "No team members yet.";

fn project_card(summary: &ProjectSummary) -> Vec<String> {
    vec![
        format!(
            "* {} [{}] ({})",
            summary.title,
            summary.stage.label(),
            summary.category
        ),
        format!("  {}", summary.description),
        format!(
            "  {} · {} · created {}",
            open_roles_label(summary.open_roles),
            member_count_label(summary.team_size),
            format_timestamp(summary.created_at)
        ),
        format!("  id: {}", summary.id),
    ]
}

fn role_card(role: &Role) -> Vec<String> {
    let mut lines = vec![
        format!(
            "* {} ({}, {})",
            role.title,
            role.commitment.label(),
            role.location_label()
        ),
        format!("  {}", role.description),
    ];
    if !role.skills.is_empty() {
        lines.push(format!("  skills: {}", role.skills.join(", ")));
    }
    lines.push(format!("  id: {}", role.id));
    lines
}

fn section<T>(
    lines: &mut Vec<String>,
    heading: &str,
    items: &[T],
    empty: &str,
    render: impl Fn(&T) -> Vec<String>,
) {
    lines.push(String::new());
    lines.push(heading.to_owned());
    if items.is_empty() {
        lines.push(format!("  {empty}"));
    } else {
        lines.extend(items.iter().flat_map(render));
    }
}

/// Render the public project list.
#[must_use]
pub fn render_explore(projects: &[ProjectSummary]) -> String {
    let mut lines = vec!["Explore projects".to_owned()];
    section(&mut lines, "Projects", projects, EMPTY_EXPLORE, project_card);
    lines.join("\n")
}

/// Render a project page. An empty view renders as a not-found notice.
#[must_use]
pub fn render_project_details(view: &ProjectDetailsView) -> String {
    let Some(header) = &view.project else {
        return "Project not found.".to_owned();
    };
    let mut lines = vec![
        format!("{} [{}]", header.title, header.stage.label()),
        format!(
            "{} · {} · created {}",
            header.category,
            member_count_label(header.team_size),
            format_timestamp(header.created_at)
        ),
        String::new(),
        header.description.clone(),
    ];
    if let Some(owner) = &header.owner {
        lines.push(String::new());
        lines.push(format!("Owner: {} ({})", owner.name, owner.avatar));
    }
    section(&mut lines, "Open roles", &view.roles, EMPTY_ROLES, role_card);
    section(&mut lines, "Team", &view.team, EMPTY_TEAM, |member| {
        vec![format!("* [{}] {} ({})", member.avatar, member.name, member.role)]
    });
    lines.join("\n")
}

/// Render the signed-in user's dashboard.
#[must_use]
pub fn render_dashboard(view: &DashboardView) -> String {
    let mut lines = vec![
        "Dashboard".to_owned(),
        format!(
            "{} projects · {} · {} applications",
            view.my_projects.len(),
            open_roles_label(view.open_roles_total()),
            view.application_count()
        ),
    ];
    section(
        &mut lines,
        "My projects",
        &view.my_projects,
        EMPTY_MY_PROJECTS,
        project_card,
    );
    section(
        &mut lines,
        "Applied projects",
        &view.applied_projects,
        EMPTY_APPLIED,
        project_card,
    );
    section(
        &mut lines,
        "Recent activity",
        &view.recent_activity,
        EMPTY_ACTIVITY,
        |item| {
            vec![format!(
                "* {} for {} ({}) {}",
                item.role,
                item.project,
                item.status.as_str(),
                format_timestamp(item.date)
            )]
        },
    );
    lines.join("\n")
}

/// Render the states a workflow visited, e.g. `Idle -> Validating`.
#[must_use]
pub fn render_report<S>(trace: &WorkflowTrace<S>) -> String
where
    S: Copy + Debug + PartialEq,
{
    trace
        .stages()
        .iter()
        .map(|stage| format!("{stage:?}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}
