//! `teamup` command-line client: browse projects, apply, and create projects.

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use teamup_client::config::ClientSettings;
use teamup_client::domain::ports::{
    ApplicationRepository, FormSurface, MemberRepository, Notifier, ProjectRepository,
    RoleRepository,
};
use teamup_client::domain::{
    ApplicationFormValues, ApplicationSubmission, ApplicationTarget, CreationOutcome,
    DashboardLoader, ExploreLoader, FormState, ProjectCreation, ProjectDetailsLoader,
    ProjectForm, ProjectFormValues, ProjectId, RoleFormValues, RoleId, RoleSelectionPolicy,
    SessionContext, SubmissionOutcome,
};
use teamup_client::inbound::cli::{
    TerminalNotifier, TerminalSurface, render_dashboard, render_explore, render_project_details,
    render_report,
};
use teamup_client::outbound::rest::{RestBackend, RestSessionProvider};

mod demo;

/// `teamup` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "teamup",
    about = "Browse startup projects, apply to roles, and post new projects",
    version
)]
struct Cli {
    /// Hosted service URL. Falls back to `TEAMUP_SERVICE_URL`; demo data
    /// is used when neither is set.
    #[arg(long, global = true, value_name = "url")]
    service_url: Option<String>,
    /// Access token of the signed-in user.
    #[arg(long, global = true, value_name = "token")]
    access_token: Option<String>,
    /// Role chosen when applying to a project: `first-listed` or `most-recent`.
    #[arg(long, global = true, value_name = "policy")]
    role_selection: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every project, newest first.
    Explore,
    /// Show one project with its roles and team.
    Project {
        /// Project identifier.
        id: ProjectId,
    },
    /// Show your projects, applications, and recent activity.
    Dashboard,
    /// Apply to a project or one of its roles.
    Apply(ApplyArgs),
    /// Create a project with optional roles.
    CreateProject(CreateProjectArgs),
}

#[derive(Debug, Args)]
struct ApplyArgs {
    /// Project to apply to.
    #[arg(long, value_name = "id")]
    project: ProjectId,
    /// Specific role; the role selection policy picks one when omitted.
    #[arg(long, value_name = "id")]
    role: Option<RoleId>,
    #[arg(long, default_value = "")]
    experience: String,
    #[arg(long, default_value = "")]
    motivation: String,
    #[arg(long, default_value = "")]
    portfolio: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    email: String,
}

#[derive(Debug, Args)]
struct CreateProjectArgs {
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    category: String,
    /// `idea`, `development`, or `launched`.
    #[arg(long, default_value = "idea")]
    stage: String,
    /// Role as `title;description;skills;commitment[;remote|on-site]`. Repeatable.
    #[arg(long = "role", value_name = "role", value_parser = parse_role)]
    roles: Vec<RoleFormValues>,
}

const ROLE_SYNTAX: &str = "role must be `title;description;skills;commitment[;remote|on-site]`";

/// Parse a `--role` value; the location defaults to remote when omitted.
fn parse_role(raw: &str) -> Result<RoleFormValues, String> {
    let parts: Vec<&str> = raw.split(';').map(str::trim).collect();
    let (fields, location) = match parts.as_slice() {
        [title, description, skills, commitment] => {
            ([*title, *description, *skills, *commitment], None)
        }
        [title, description, skills, commitment, location] => (
            [*title, *description, *skills, *commitment],
            Some(*location),
        ),
        _ => return Err(ROLE_SYNTAX.to_owned()),
    };
    let [title, description, skills, commitment] = fields.map(str::to_owned);
    let defaults = RoleFormValues::default();
    let remote = match location {
        None => defaults.remote,
        Some(value) if value.eq_ignore_ascii_case("remote") => true,
        Some(value) if value.eq_ignore_ascii_case("on-site") => false,
        Some(value) => return Err(format!("unknown role location `{value}`; {ROLE_SYNTAX}")),
    };
    Ok(RoleFormValues {
        title,
        description,
        skills,
        commitment,
        remote,
    })
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(cli.command, settings))
}

/// Environment and config file layers, then command-line overrides.
fn load_settings(cli: &Cli) -> Result<ClientSettings> {
    let mut settings = ClientSettings::load_from_iter([OsString::from("teamup")])
        .map_err(|error| eyre!("load settings: {error}"))?;
    if cli.service_url.is_some() {
        settings.service_url.clone_from(&cli.service_url);
    }
    if cli.access_token.is_some() {
        settings.access_token.clone_from(&cli.access_token);
    }
    if cli.role_selection.is_some() {
        settings.role_selection.clone_from(&cli.role_selection);
    }
    Ok(settings)
}

async fn async_main(command: Command, settings: ClientSettings) -> Result<()> {
    let policy = settings.role_selection()?;
    let notifier = Arc::new(TerminalNotifier::stderr());

    if let Some(config) = settings.rest_config()? {
        let backend = Arc::new(RestBackend::new(&config)?);
        let session = SessionContext::signed_out();
        let provider = RestSessionProvider::new(&config)?;
        if let Err(error) = session.initialise(&provider).await {
            debug!(%error, "continuing without a session");
        }
        info!(service_url = %backend.service_url(), "using hosted service");
        let app = App {
            backend,
            session: Arc::new(session),
            notifier,
            policy,
        };
        app.execute(command).await
    } else {
        let (backend, user) = demo::seeded_backend();
        info!("no service URL configured; using demo data");
        let app = App {
            backend: Arc::new(backend),
            session: Arc::new(SessionContext::signed_in(user)),
            notifier,
            policy,
        };
        app.execute(command).await
    }
}

struct App<B> {
    backend: Arc<B>,
    session: Arc<SessionContext>,
    notifier: Arc<TerminalNotifier>,
    policy: RoleSelectionPolicy,
}

impl<B> App<B>
where
    B: ProjectRepository + RoleRepository + ApplicationRepository + MemberRepository + 'static,
{
    fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    async fn execute(&self, command: Command) -> Result<()> {
        match command {
            Command::Explore => {
                let loader = ExploreLoader::new(self.backend.clone(), self.notifier());
                loader.load().await;
                page(&render_explore(&loader.projects()))?;
            }
            Command::Project { id } => {
                let loader = self.details_loader();
                loader.load(Some(id)).await;
                page(&render_project_details(&loader.view()))?;
            }
            Command::Dashboard => {
                let Some(user_id) = self.session.user_id() else {
                    bail!("sign in to see your dashboard");
                };
                let loader = DashboardLoader::new(
                    self.backend.clone(),
                    self.backend.clone(),
                    self.notifier(),
                );
                loader.load(Some(user_id)).await;
                page(&render_dashboard(&loader.view()))?;
            }
            Command::Apply(args) => self.apply(args).await?,
            Command::CreateProject(args) => self.create_project(args).await?,
        }
        if self.notifier.reported_failure() {
            bail!("command finished with errors");
        }
        Ok(())
    }

    fn details_loader(&self) -> ProjectDetailsLoader<B, B, B> {
        ProjectDetailsLoader::new(
            self.backend.clone(),
            self.backend.clone(),
            self.backend.clone(),
            self.notifier(),
        )
    }

    async fn apply(&self, args: ApplyArgs) -> Result<()> {
        let loader = self.details_loader();
        loader.load(Some(args.project)).await;
        let view = loader.view();
        let Some(header) = view.project else {
            bail!("project {} not found", args.project);
        };
        let target = args.role.map_or_else(
            || ApplicationTarget::Project {
                project_id: header.id,
                title: header.title.clone(),
            },
            |role_id| ApplicationTarget::Role {
                role_id,
                title: view
                    .roles
                    .iter()
                    .find(|role| role.id == role_id)
                    .map_or_else(|| header.title.clone(), |role| role.title.clone()),
            },
        );

        let form = FormState::with_values(ApplicationFormValues {
            experience: args.experience,
            motivation: args.motivation,
            portfolio: args.portfolio,
            phone: args.phone,
            email: args.email,
        });
        let surface: Arc<dyn FormSurface> = Arc::new(TerminalSurface::new());
        let workflow = ApplicationSubmission::new(
            self.session.clone(),
            self.backend.clone(),
            self.backend.clone(),
            self.notifier(),
            surface,
        )
        .with_policy(self.policy);

        let report = workflow.submit(&form, &target).await;
        page(&format!("stages: {}", render_report(&report.trace)))?;
        match report.outcome {
            SubmissionOutcome::Submitted(application) => {
                page(&format!("application: {}", application.id))
            }
            SubmissionOutcome::InterestNoted { .. } => Ok(()),
            SubmissionOutcome::Failed(failure) => bail!(failure.user_message()),
            SubmissionOutcome::InProgress => bail!("a submission is already running"),
        }
    }

    async fn create_project(&self, args: CreateProjectArgs) -> Result<()> {
        let form = ProjectForm::with_values(ProjectFormValues {
            title: args.title,
            description: args.description,
            category: args.category,
            stage: args.stage,
        });
        for values in args.roles {
            let role_form = FormState::with_values(values);
            form.add_role(&role_form)
                .map_err(|errors| eyre!("invalid role: {errors}"))?;
        }

        let surface: Arc<dyn FormSurface> = Arc::new(TerminalSurface::new());
        let workflow = ProjectCreation::new(
            self.session.clone(),
            self.backend.clone(),
            self.backend.clone(),
            self.notifier(),
            surface,
        );
        let report = workflow.submit(&form).await;
        page(&format!("stages: {}", render_report(&report.trace)))?;
        match report.outcome {
            CreationOutcome::Created(created) => page(&format!(
                "project: {} ({} roles), next: {}",
                created.project.id,
                created.roles.len(),
                created.navigate_to.path()
            )),
            CreationOutcome::Failed(failure) => {
                bail!(teamup_client::domain::DomainError::from(failure))
            }
            CreationOutcome::InProgress => bail!("a submission is already running"),
        }
    }
}

fn page(text: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{text}").wrap_err("write to stdout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use teamup_client::domain::FormSchema;

    #[rstest]
    fn role_without_location_defaults_to_remote() {
        let values = parse_role("Designer;Designs the product UI;Figma, UX;flexible")
            .expect("four fields parse");
        let draft = values.validate().expect("role validates");
        assert!(draft.remote);
        assert_eq!(draft.skills, vec!["Figma", "UX"]);
    }

    #[rstest]
    #[case("remote", true)]
    #[case("Remote", true)]
    #[case("on-site", false)]
    #[case("ON-SITE", false)]
    fn explicit_location_sets_remote(#[case] location: &str, #[case] remote: bool) {
        let raw = format!("Designer;Designs the product UI;Figma;flexible;{location}");
        let values = parse_role(&raw).expect("five fields parse");
        assert_eq!(values.remote, remote);
    }

    #[rstest]
    #[case("Designer;Designs the product UI;Figma;flexible;office")]
    #[case("Designer;Designs the product UI;Figma;flexible;")]
    #[case("Designer;Designs the product UI;Figma")]
    fn malformed_role_is_rejected(#[case] raw: &str) {
        assert!(parse_role(raw).is_err());
    }
}
