//! URL construction for the hosted REST endpoints.
//!
//! Filters follow PostgREST conventions: `column=eq.value`,
//! `order=column.desc`, and embedded resources in `select`.

use url::Url;

use crate::domain::{ProjectFilter, ProjectId, UserId};

const REST_PREFIX: &str = "rest/v1/";
const AUTH_USER_PATH: &str = "auth/v1/user";

/// Select clause joining each project with its role count.
pub(super) const PROJECT_WITH_ROLE_COUNT: &str = "*,roles(count)";
/// Select clause joining a row with its profile.
pub(super) const WITH_PROFILE: &str = "*,profiles(id,full_name,avatar_url,username)";
/// Select clause joining applications through the role to its project.
pub(super) const APPLICATION_WITH_PROJECT: &str = "*,roles(*,projects(*))";

/// Builds endpoint URLs below one service base URL.
#[derive(Debug, Clone)]
pub(super) struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Wrap `base`, making sure relative joins land below its path.
    pub(super) fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base }
    }

    pub(super) const fn base(&self) -> &Url {
        &self.base
    }

    /// `{base}/rest/v1/{table}` with no query.
    pub(super) fn table(&self, table: &str) -> Result<Url, url::ParseError> {
        self.base.join(&format!("{REST_PREFIX}{table}"))
    }

    pub(super) fn auth_user(&self) -> Result<Url, url::ParseError> {
        self.base.join(AUTH_USER_PATH)
    }

    fn select(
        &self,
        table: &str,
        select: &str,
        filters: &[(&str, String)],
        order: Option<&str>,
    ) -> Result<Url, url::ParseError> {
        let mut url = self.table(table)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", select);
            for (column, value) in filters {
                pairs.append_pair(column, value);
            }
            if let Some(ordering) = order {
                pairs.append_pair("order", ordering);
            }
        }
        Ok(url)
    }

    pub(super) fn list_projects(&self, filter: ProjectFilter) -> Result<Url, url::ParseError> {
        let filters: Vec<(&str, String)> = filter
            .creator_id
            .map(|creator_id| ("creator_id", eq(creator_id)))
            .into_iter()
            .collect();
        self.select(
            "projects",
            PROJECT_WITH_ROLE_COUNT,
            &filters,
            Some("created_at.desc"),
        )
    }

    pub(super) fn find_project(&self, project_id: &ProjectId) -> Result<Url, url::ParseError> {
        self.select("projects", WITH_PROFILE, &[("id", eq(project_id))], None)
    }

    pub(super) fn roles_for_project(&self, project_id: &ProjectId) -> Result<Url, url::ParseError> {
        self.select(
            "roles",
            "*",
            &[("project_id", eq(project_id))],
            Some("created_at.asc"),
        )
    }

    pub(super) fn members(&self, project_id: &ProjectId) -> Result<Url, url::ParseError> {
        self.select(
            "project_members",
            WITH_PROFILE,
            &[("project_id", eq(project_id))],
            None,
        )
    }

    pub(super) fn applications_for(&self, applicant_id: &UserId) -> Result<Url, url::ParseError> {
        self.select(
            "applications",
            APPLICATION_WITH_PROJECT,
            &[("applicant_id", eq(applicant_id))],
            Some("created_at.desc"),
        )
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn endpoints() -> Endpoints {
        Endpoints::new(Url::parse("https://abc.supabase.co").expect("valid url"))
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[rstest]
    fn creator_filtered_projects(endpoints: Endpoints) {
        let creator = UserId::random();
        let url = endpoints
            .list_projects(ProjectFilter::created_by(creator))
            .expect("url builds");

        assert_eq!(url.path(), "/rest/v1/projects");
        assert_eq!(
            pairs(&url),
            vec![
                ("select".to_owned(), "*,roles(count)".to_owned()),
                ("creator_id".to_owned(), format!("eq.{creator}")),
                ("order".to_owned(), "created_at.desc".to_owned()),
            ]
        );
    }

    #[rstest]
    fn unfiltered_projects_have_no_creator(endpoints: Endpoints) {
        let url = endpoints
            .list_projects(ProjectFilter::all())
            .expect("url builds");
        assert!(pairs(&url).iter().all(|(k, _)| k != "creator_id"));
    }

    #[rstest]
    fn base_path_is_preserved() {
        let endpoints =
            Endpoints::new(Url::parse("https://gateway.test/tenant").expect("valid url"));
        let url = endpoints.table("roles").expect("url builds");
        assert_eq!(url.as_str(), "https://gateway.test/tenant/rest/v1/roles");
        let auth = endpoints.auth_user().expect("url builds");
        assert_eq!(auth.path(), "/tenant/auth/v1/user");
    }

    #[rstest]
    fn project_roles_are_listed_oldest_first(endpoints: Endpoints) {
        let project = ProjectId::random();
        let url = endpoints.roles_for_project(&project).expect("url builds");

        assert_eq!(url.path(), "/rest/v1/roles");
        assert_eq!(
            pairs(&url),
            vec![
                ("select".to_owned(), "*".to_owned()),
                ("project_id".to_owned(), format!("eq.{project}")),
                ("order".to_owned(), "created_at.asc".to_owned()),
            ]
        );
    }

    #[rstest]
    fn applications_join_role_and_project(endpoints: Endpoints) {
        let applicant = UserId::random();
        let url = endpoints.applications_for(&applicant).expect("url builds");
        let query = pairs(&url);
        assert!(query.contains(&("select".to_owned(), "*,roles(*,projects(*))".to_owned())));
        assert!(query.contains(&("applicant_id".to_owned(), format!("eq.{applicant}"))));
    }
}
