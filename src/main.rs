//! Command-line front end of the admin client.
//!
//! Every command goes through the same [`ListController`] a screen would use,
//! so permission gates, validation and toasts behave identically here.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use mehfil_admin::api::resources::{
    Categories, KarkunJoinRequests, Mehfils, Messages, NaatShareefs, Questions, Tags,
    TarteebRequests, Zones,
};
use mehfil_admin::api::{ApiClient, Resource};
use mehfil_admin::controller::notify::{Notification, NotificationKind};
use mehfil_admin::controller::sort::Sortable;
use mehfil_admin::controller::{ColumnOf, ControllerError, ListController};
use mehfil_admin::domain::types::{
    KarkunJoinRequestId, Language, QuestionId, TypeConstraintError,
};
use mehfil_admin::forms::Editable;
use mehfil_admin::forms::khat::AnswerForm;
use mehfil_admin::models::config::{ClientConfig, DEFAULT_STATE_FILE};
use mehfil_admin::pagination::PageSize;
use mehfil_admin::permissions::{Action, Capabilities, PermissionDenied, ensure};
use mehfil_admin::persist::{AuthSnapshot, AuthUser, FileStateStore, PersistError};
use mehfil_admin::transport::ApiError;
use mehfil_admin::transport::http::HttpTransport;

#[derive(Parser, Debug)]
#[command(name = "mehfil-admin", version, about = "Admin client for the mehfil backend")]
struct Cli {
    /// Extra YAML config file, applied after `config/default.yaml`.
    #[arg(long, global = true, env = "MEHFIL_ADMIN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of a table as JSON.
    List {
        resource: ResourceArg,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// One of 5, 10, 25, 50, 100.
        #[arg(long)]
        size: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        resource: ResourceArg,
        id: i32,
    },
    /// Print a form as JSON: blank, prefilled from `id`, or a duplicate draft.
    Form {
        resource: ResourceArg,
        id: Option<i32>,
        #[arg(long, requires = "id")]
        duplicate: bool,
    },
    Create {
        resource: ResourceArg,
        /// JSON file holding the filled form.
        #[arg(long)]
        file: PathBuf,
    },
    Update {
        resource: ResourceArg,
        id: i32,
        #[arg(long)]
        file: PathBuf,
    },
    Delete {
        resource: ResourceArg,
        id: i32,
    },
    /// Approve a karkun join request, or reject it with `--reject`.
    Approve {
        id: i32,
        #[arg(long)]
        reject: bool,
    },
    /// Answer a pending khat question.
    Answer {
        id: i32,
        answer: String,
    },
    /// Store the bearer token and the user it belongs to.
    Token {
        token: String,
        #[arg(long, default_value_t = 0)]
        user_id: i32,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        super_admin: bool,
        /// Permission key such as `edit_zones`; repeatable.
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
    Logout,
    /// Print the interface language, or switch it.
    Language {
        language: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResourceArg {
    Zones,
    Mehfils,
    NaatShareefs,
    Messages,
    KarkunJoinRequests,
    TarteebRequests,
    Tags,
    Categories,
    Questions,
}

/// Calls `$run::<R>(args..)` with `R` chosen by a [`ResourceArg`].
macro_rules! with_resource {
    ($resource:expr, $run:ident($($arg:expr),* $(,)?)) => {
        match $resource {
            ResourceArg::Zones => $run::<Zones>($($arg),*),
            ResourceArg::Mehfils => $run::<Mehfils>($($arg),*),
            ResourceArg::NaatShareefs => $run::<NaatShareefs>($($arg),*),
            ResourceArg::Messages => $run::<Messages>($($arg),*),
            ResourceArg::KarkunJoinRequests => $run::<KarkunJoinRequests>($($arg),*),
            ResourceArg::TarteebRequests => $run::<TarteebRequests>($($arg),*),
            ResourceArg::Tags => $run::<Tags>($($arg),*),
            ResourceArg::Categories => $run::<Categories>($($arg),*),
            ResourceArg::Questions => $run::<Questions>($($arg),*),
        }
    };
}

#[derive(Debug, Error)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Controller(#[from] ControllerError),

    #[error(transparent)]
    Forbidden(#[from] PermissionDenied),

    #[error("invalid value: {0}")]
    Constraint(#[from] TypeConstraintError),

    #[error("{0}")]
    Input(String),

    #[error("{0} {1} not found")]
    NotFound(&'static str, i32),

    #[error("{0} was not deleted")]
    NotDeleted(&'static str),
}

type AppResult<T> = Result<T, AppError>;

/// Connected client plus what the signed-in user may do.
struct Session {
    client: ApiClient<HttpTransport>,
    capabilities: Capabilities,
    config: ClientConfig,
}

impl Session {
    fn open(config_file: Option<&Path>) -> AppResult<Self> {
        let config = ClientConfig::load(config_file)?;
        let state = FileStateStore::new(&config.state_file).load()?;
        let transport =
            HttpTransport::new(config.api_url.as_str())?.with_token(state.token().map(str::to_string));
        Ok(Self {
            client: ApiClient::new(transport),
            capabilities: state.capabilities(),
            config,
        })
    }

    fn controller<R>(&self) -> AppResult<ListController<R>>
    where
        R: Editable,
        R::Entity: Sortable,
    {
        Ok(ListController::new(self.capabilities.clone())
            .with_debounce(self.config.debounce())
            .with_page_size(self.config.page_size()?))
    }

    fn fetch<R: Resource>(&mut self, id: i32) -> AppResult<R::Entity> {
        let typed = R::Id::try_from(id)?;
        self.client
            .get_by_id::<R>(typed)?
            .ok_or(AppError::NotFound(R::LABEL, id))
    }
}

/// State file used by commands that never talk to the backend. Falls back
/// to the default location when no usable config is found.
fn state_store(config_file: Option<&Path>) -> FileStateStore {
    match ClientConfig::load(config_file) {
        Ok(config) => FileStateStore::new(config.state_file),
        Err(err) => {
            log::debug!("Using default state file, config not loaded: {err}");
            FileStateStore::new(DEFAULT_STATE_FILE)
        }
    }
}

fn print_json<S: Serialize + ?Sized>(value: &S) -> AppResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(ApiError::from)?;
    println!("{text}");
    Ok(())
}

fn read_form<F: DeserializeOwned>(path: &Path) -> AppResult<F> {
    let text = fs::read_to_string(path)
        .map_err(|err| AppError::Input(format!("cannot read {}: {err}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|err| AppError::Input(format!("{} is not a valid form: {err}", path.display())))
}

/// Prints toasts and inline form errors to stderr.
fn report<R>(controller: &mut ListController<R>)
where
    R: Editable,
    R::Entity: Sortable,
{
    for Notification { kind, message } in controller.take_notifications() {
        match kind {
            NotificationKind::Success => eprintln!("{message}"),
            NotificationKind::Error => eprintln!("error: {message}"),
        }
    }
    for (field, message) in controller.form_errors() {
        if field.is_empty() {
            eprintln!("  {message}");
        } else {
            eprintln!("  {field}: {message}");
        }
    }
}

fn list<R>(
    session: &mut Session,
    page: u32,
    size: Option<u32>,
    search: Option<String>,
) -> AppResult<()>
where
    R: Editable,
    R::Entity: Sortable,
    ColumnOf<R>: Serialize,
{
    let mut controller = session.controller::<R>()?;
    if let Some(size) = size {
        let size = PageSize::try_from(size)
            .map_err(|size| AppError::Input(format!("page size {size} is not offered")))?;
        controller.on_page_size_change(size);
    }
    if let Some(search) = search {
        controller.on_search_change(search, Instant::now());
        controller.flush_search();
    }
    controller.on_page_change(page);

    let loaded = controller.load(&mut session.client);
    report(&mut controller);
    loaded?;
    print_json(&controller.view())
}

fn show<R: Resource>(session: &mut Session, id: i32) -> AppResult<()> {
    ensure(&session.capabilities, Action::View, R::KIND)?;
    let entity = session.fetch::<R>(id)?;
    print_json(&entity)
}

fn form<R>(session: &mut Session, id: Option<i32>, duplicate: bool) -> AppResult<()>
where
    R: Editable,
    R::Entity: Sortable,
    R::Form: Serialize,
{
    let mut controller = session.controller::<R>()?;
    match id {
        None => controller.on_add()?,
        Some(id) => {
            let entity = session.fetch::<R>(id)?;
            if duplicate {
                controller.on_duplicate(&entity)?;
            } else {
                controller.on_edit(&entity)?;
            }
        }
    }
    let draft = controller.draft_mut().ok_or(ControllerError::NoDraft)?;
    print_json(&*draft)
}

fn create<R>(session: &mut Session, file: &Path) -> AppResult<()>
where
    R: Editable,
    R::Entity: Sortable,
    R::Form: DeserializeOwned,
{
    let filled: R::Form = read_form(file)?;
    let mut controller = session.controller::<R>()?;
    controller.on_add()?;
    submit(session, &mut controller, filled)
}

fn update<R>(session: &mut Session, id: i32, file: &Path) -> AppResult<()>
where
    R: Editable,
    R::Entity: Sortable,
    R::Form: DeserializeOwned,
{
    let filled: R::Form = read_form(file)?;
    let entity = session.fetch::<R>(id)?;
    let mut controller = session.controller::<R>()?;
    controller.on_edit(&entity)?;
    submit(session, &mut controller, filled)
}

fn submit<R>(
    session: &mut Session,
    controller: &mut ListController<R>,
    filled: R::Form,
) -> AppResult<()>
where
    R: Editable,
    R::Entity: Sortable,
{
    let draft = controller.draft_mut().ok_or(ControllerError::NoDraft)?;
    *draft = filled;

    let result = controller.on_submit(&mut session.client);
    report(controller);
    if let Some(entity) = result? {
        print_json(&entity)?;
    }
    Ok(())
}

fn delete<R>(session: &mut Session, id: i32) -> AppResult<()>
where
    R: Editable,
    R::Entity: Sortable,
{
    let entity = session.fetch::<R>(id)?;
    let mut controller = session.controller::<R>()?;
    controller.on_delete(&entity)?;

    let result = controller.on_confirm_delete(&mut session.client);
    report(&mut controller);
    if result? {
        Ok(())
    } else {
        Err(AppError::NotDeleted(R::LABEL))
    }
}

fn approve(session: &mut Session, id: i32, is_approved: bool) -> AppResult<()> {
    let id = KarkunJoinRequestId::new(id)?;
    let mut controller = session.controller::<KarkunJoinRequests>()?;
    let result = controller.on_approve(&mut session.client, id, is_approved);
    report(&mut controller);
    Ok(result?)
}

fn answer(session: &mut Session, id: i32, text: String) -> AppResult<()> {
    let id = QuestionId::new(id)?;
    let mut controller = session.controller::<Questions>()?;
    let result = controller.on_answer(&mut session.client, id, &AnswerForm { answer: text });
    report(&mut controller);
    Ok(result?)
}

fn run(cli: Cli) -> AppResult<()> {
    let config_file = cli.config.as_deref();
    match cli.command {
        Command::Token {
            token,
            user_id,
            name,
            email,
            super_admin,
            permissions,
        } => {
            if token.trim().is_empty() {
                return Err(AppError::Input("token is empty".to_string()));
            }
            let auth = AuthSnapshot {
                token,
                user: AuthUser {
                    id: user_id,
                    name,
                    email,
                    is_super_admin: super_admin,
                    permissions,
                },
            };
            state_store(config_file).update(|state| state.auth = Some(auth))?;
            log::info!("Token stored");
            Ok(())
        }
        Command::Logout => {
            state_store(config_file).update(|state| state.sign_out())?;
            log::info!("Signed out");
            Ok(())
        }
        Command::Language { language: None } => {
            let state = state_store(config_file).load()?;
            println!("{}", state.language);
            Ok(())
        }
        Command::Language {
            language: Some(language),
        } => {
            let language: Language = language.parse()?;
            state_store(config_file).update(|state| state.language = language)?;
            Ok(())
        }
        command => {
            let mut session = Session::open(config_file)?;
            dispatch(&mut session, command)
        }
    }
}

fn dispatch(session: &mut Session, command: Command) -> AppResult<()> {
    match command {
        Command::List {
            resource,
            page,
            size,
            search,
        } => with_resource!(resource, list(session, page, size, search)),
        Command::Show { resource, id } => with_resource!(resource, show(session, id)),
        Command::Form {
            resource,
            id,
            duplicate,
        } => with_resource!(resource, form(session, id, duplicate)),
        Command::Create { resource, file } => with_resource!(resource, create(session, &file)),
        Command::Update { resource, id, file } => {
            with_resource!(resource, update(session, id, &file))
        }
        Command::Delete { resource, id } => with_resource!(resource, delete(session, id)),
        Command::Approve { id, reject } => approve(session, id, !reject),
        Command::Answer { id, answer: text } => answer(session, id, text),
        Command::Token { .. } | Command::Logout | Command::Language { .. } => Ok(()),
    }
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
