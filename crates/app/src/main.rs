//! Marquee - command line entry point.
//!
//! Reads the configuration from `MARQUEE_*` environment variables, wires the
//! services over the storage file and runs one subcommand. Results are
//! printed as JSON on stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use marquee::{App, AppError, AppResult};
use marquee_application::{ApplicationError, ProfileDraft};
use marquee_domain::{RequestContext, format_runtime};
use marquee_infrastructure::ClientConfig;
use serde_json::{Value, json};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "marquee",
    version,
    about = "Marquee streaming client",
    long_about = "Signs in against the Marquee backend, manages profiles and looks up movies."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Request cookies to act on behalf of, e.g. "netflix.token=...; netflix.ref=..."
    #[arg(long, global = true, env = "MARQUEE_COOKIE")]
    cookie: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the token
    Login {
        /// Account e-mail
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "MARQUEE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        /// Account e-mail
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Account password
        #[arg(long, env = "MARQUEE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the current session
    Session,

    /// Sign out and forget the token
    Logout,

    /// Profile management
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Show a movie with its trailer
    Movie {
        /// Provider movie id
        id: u64,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Create a profile
    Create {
        /// Profile name
        #[arg(long)]
        name: String,

        /// Preferred genre title, repeatable
        #[arg(long = "genre", required = true)]
        genres: Vec<String>,

        /// Avatar image id
        #[arg(long)]
        image: String,
    },

    /// Edit a profile; its slug stays the same
    Update {
        /// Profile slug
        slug: String,

        /// New profile name
        #[arg(long)]
        name: String,

        /// Preferred genre title, repeatable
        #[arg(long = "genre", required = true)]
        genres: Vec<String>,

        /// Avatar image id
        #[arg(long)]
        image: String,
    },

    /// List avatar images still available
    Images,

    /// Make a profile of the session the active one
    Use {
        /// Profile slug
        slug: String,
    },

    /// Show the active profile
    Current,

    /// Forget the active profile
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env()?;
    tracing::debug!(backend = %config.backend_url, "starting Marquee v{}", env!("CARGO_PKG_VERSION"));

    let app = App::from_config(&config)?;
    let context = cli.cookie.as_deref().map(RequestContext::from_cookie_header);

    let output = run(&app, cli.command, context.as_ref()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(app: &App, command: Command, context: Option<&RequestContext>) -> AppResult<Value> {
    match command {
        Command::Login { email, password } => {
            let response = app.auth.login(&email, &password).await.map_err(app_error)?;
            if !response.is_ok() {
                tracing::warn!(message = response.message().unwrap_or_default(), "login failed");
            }
            Ok(json!(response))
        }
        Command::Register {
            email,
            name,
            password,
        } => Ok(json!(app.account.register(&email, &name, &password).await)),
        Command::Session => {
            let session = app.auth.get_session(context).await.map_err(app_error)?;
            Ok(json!(session))
        }
        Command::Logout => {
            let data = app.auth.logout(context).await.map_err(app_error)?;
            app.profiles.reset().await.map_err(app_error)?;
            Ok(data)
        }
        Command::Profile { action } => run_profile(app, action, context).await,
        Command::Movie { id } => {
            let output = app.movies()?.execute(id).await.map_err(app_error)?;
            Ok(json!({
                "title": output.movie.title,
                "overview": output.movie.overview,
                "runtime": output.movie.runtime.map(format_runtime),
                "backdrop": output.movie.backdrop_url(),
                "trailer": output.video,
            }))
        }
    }
}

async fn run_profile(
    app: &App,
    action: ProfileCommand,
    context: Option<&RequestContext>,
) -> AppResult<Value> {
    match action {
        ProfileCommand::Create {
            name,
            genres,
            image,
        } => {
            let session = app.auth.get_session(context).await.map_err(app_error)?;
            let draft = ProfileDraft {
                name,
                genres,
                image_id: image,
            };
            let response = app
                .account
                .create_profile(&session, &draft)
                .await
                .map_err(app_error)?;
            Ok(json!(response))
        }
        ProfileCommand::Update {
            slug,
            name,
            genres,
            image,
        } => {
            let draft = ProfileDraft {
                name,
                genres,
                image_id: image,
            };
            Ok(json!(app.update_profile(context, &slug, &draft).await?))
        }
        ProfileCommand::Images => {
            let session = app.auth.get_session(context).await.map_err(app_error)?;
            let images = app.account.profile_images(&session).await.map_err(app_error)?;
            Ok(json!(images))
        }
        ProfileCommand::Use { slug } => {
            let session = app.auth.get_session(context).await.map_err(app_error)?;
            let profile = session
                .profile(&slug)
                .ok_or_else(|| AppError::UnknownProfile(slug.clone()))?;
            app.profiles.set(profile).await.map_err(app_error)?;
            Ok(json!(profile))
        }
        ProfileCommand::Current => Ok(json!(app.profiles.load().await.map_err(app_error)?)),
        ProfileCommand::Reset => {
            app.profiles.reset().await.map_err(app_error)?;
            Ok(Value::Null)
        }
    }
}

fn app_error(error: impl Into<ApplicationError>) -> AppError {
    AppError::Application(error.into())
}
