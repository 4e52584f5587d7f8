use anyhow::anyhow;
use harbor::schema::*;
use harbor::*;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "HarborCli", about = "Harbor container registry CLI tool")]
/// Interact with a Harbor container registry through a CLI
///
/// Use environment variables HARBOR_USER and HARBOR_PASSWORD to authenticate with Harbor
/// when sending the requests. Requests are sent anonymously otherwise.
struct HarborCli {
    /// Supplies the Harbor address, e.g. https://harbor.example.com
    #[structopt(long = "url", env = "HARBOR_URL")]
    url: String,
    /// Number of items requested per page by list commands
    #[structopt(long = "page-size", default_value = "10")]
    page_size: i64,
    /// Prints the json output with pretty format
    #[structopt(short = "p", long = "pretty")]
    pretty_json: bool,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Shows the health of Harbor and its components
    #[structopt(name = "health")]
    Health,
    /// Shows general system information
    #[structopt(name = "info")]
    Info,
    /// Shows project and repository statistics
    #[structopt(name = "statistics")]
    Statistics,
    /// Lists projects
    #[structopt(name = "projects")]
    Projects {
        /// Only lists projects whose name contains this value
        #[structopt(long = "name", default_value = "")]
        name: String,
    },
    /// Shows a project by name or ID
    #[structopt(name = "project")]
    Project {
        /// Supplies the project name or ID
        name: String,
    },
    /// Creates a project
    #[structopt(name = "create-project")]
    CreateProject {
        /// Supplies the project name
        name: String,
        /// Makes the project public
        #[structopt(long = "public")]
        public: bool,
        /// Storage quota of the project in bytes, -1 for unlimited
        #[structopt(long = "storage-limit")]
        storage_limit: Option<i64>,
    },
    /// Deletes an empty project
    #[structopt(name = "delete-project")]
    DeleteProject {
        /// Supplies the project name
        name: String,
    },
    /// Lists registry endpoints
    #[structopt(name = "registries")]
    Registries {
        /// Only lists registries whose name contains this value
        #[structopt(long = "term", default_value = "")]
        term: String,
    },
    /// Lists robot accounts
    #[structopt(name = "robots")]
    Robots,
    /// Lists the artifacts of a project/repository
    #[structopt(name = "artifacts")]
    Artifacts {
        /// Supplies the project/repository
        repository: String,
    },
    /// Lists the tags of a project/repository:reference artifact
    #[structopt(name = "tags")]
    Tags {
        /// Supplies the artifact as project/repository:tag or project/repository@digest
        artifact: String,
    },
    /// Copies an artifact into a project/repository
    #[structopt(name = "copy")]
    Copy {
        /// Supplies the source artifact as project/repository:tag or project/repository@digest
        from: String,
        /// Supplies the destination project/repository
        repository: String,
    },
    /// Shows the garbage collection schedule
    #[structopt(name = "gc-schedule")]
    GcSchedule,
    /// Lists garbage collection runs
    #[structopt(name = "gc-history")]
    GcHistory,
    /// Lists audit logs
    #[structopt(name = "audit-logs")]
    AuditLogs,
    /// Shows system configurations
    #[structopt(name = "configs")]
    Configs,
}

fn parse_repository(repository: &str) -> anyhow::Result<RepositoryPath> {
    repository
        .parse()
        .map_err(|e| anyhow!("invalid repository {}: {}", repository, e))
}

fn parse_artifact(artifact: &str) -> anyhow::Result<ArtifactReference> {
    artifact
        .parse()
        .map_err(|e| anyhow!("invalid artifact reference {}: {}", artifact, e))
}

async fn run(args: &HarborCli) -> anyhow::Result<()> {
    macro_rules! printjson {
        ($obj:ident, $pretty:expr) => {
            if $pretty {
                println!("{}", serde_json::to_string_pretty(&$obj)?);
            } else {
                println!("{}", serde_json::to_string(&$obj)?);
            }
        };
    }

    let harbor = HarborClient::new(&args.url)?
        .with_options(ClientOptions::default().with_page_size(args.page_size));
    let pretty_json = args.pretty_json;

    match &args.command {
        Command::Health => {
            let health = harbor.system().health().await?;
            printjson!(health, pretty_json);
        }
        Command::Info => {
            let info = harbor.system().get_system_info().await?;
            printjson!(info, pretty_json);
        }
        Command::Statistics => {
            let statistics = harbor.system().get_statistics().await?;
            printjson!(statistics, pretty_json);
        }
        Command::Projects { name } => {
            let projects = harbor.projects().list_projects(name).await?;
            printjson!(projects, pretty_json);
        }
        Command::Project { name } => {
            let project = harbor.projects().get_project(name).await?;
            printjson!(project, pretty_json);
        }
        Command::CreateProject {
            name,
            public,
            storage_limit,
        } => {
            let req = ProjectReq {
                project_name: name.clone(),
                public: Some(*public),
                storage_limit: *storage_limit,
                ..Default::default()
            };
            let project = harbor.projects().new_project(&req).await?;
            printjson!(project, pretty_json);
        }
        Command::DeleteProject { name } => {
            let project = harbor.projects().get_project_by_name(name).await?;
            harbor.projects().delete_project(&project).await?;
            log::info!("Deleted project {}", name);
        }
        Command::Registries { term } => {
            let registries = harbor.registries().list_registries(term).await?;
            printjson!(registries, pretty_json);
        }
        Command::Robots => {
            let robots = harbor.robots().list_robot_accounts().await?;
            printjson!(robots, pretty_json);
        }
        Command::Artifacts { repository } => {
            let repository = parse_repository(repository)?;
            let artifacts = harbor
                .artifacts()
                .list_artifacts(&repository.project, &repository.repository)
                .await?;
            printjson!(artifacts, pretty_json);
        }
        Command::Tags { artifact } => {
            let artifact = parse_artifact(artifact)?;
            let tags = harbor
                .artifacts()
                .list_tags(&artifact.project, &artifact.repository, &artifact.reference)
                .await?;
            printjson!(tags, pretty_json);
        }
        Command::Copy { from, repository } => {
            let from = parse_artifact(from)?;
            let repository = parse_repository(repository)?;
            harbor
                .artifacts()
                .copy_artifact(&from.to_string(), &repository.project, &repository.repository)
                .await?;
            log::info!(
                "Copied {} to {}/{}",
                &from,
                &repository.project,
                &repository.repository
            );
        }
        Command::GcSchedule => {
            let schedule = harbor.gc().get_garbage_collection_schedule().await?;
            printjson!(schedule, pretty_json);
        }
        Command::GcHistory => {
            let history = harbor.gc().list_gc_history().await?;
            printjson!(history, pretty_json);
        }
        Command::AuditLogs => {
            let logs = harbor.audit_logs().list_audit_logs().await?;
            printjson!(logs, pretty_json);
        }
        Command::Configs => {
            let configs = harbor.configure().get_configs().await?;
            printjson!(configs, pretty_json);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(e) = run(&HarborCli::from_args()).await {
        println!("Failure captured running HARBOR CLI << {} >>", e);
        std::process::exit(-1);
    }
}
