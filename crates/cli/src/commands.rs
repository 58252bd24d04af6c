//! CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;
use plumb_core::FileStore;
use plumb_http::client::SessionNavigator;
use plumb_http::types::NotificationFilter;
use plumb_http::{ApiRequest, PlumbClient};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::CliConfig;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and save the session
    Login {
        /// Account email
        email: String,

        /// Account password
        #[arg(long, env = "PLUMB_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List plumbers
    Plumbers,

    /// List service locations
    Locations,

    /// List community posts
    Posts,

    /// List knowledge-base articles
    Articles,

    /// List notifications
    Notifications {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Authenticated GET of an API path, printing the JSON body
    Get {
        /// Path below the API root, e.g. `/services/list/`
        path: String,
    },
}

impl Commands {
    pub async fn execute(self, settings: &CliConfig) -> Result<()> {
        let client = connect(settings)?;

        match self {
            Self::Login { email, password } => {
                let user = client.login(email, password).await?;
                info!(user_id = user.id, "Session saved to {}", settings.session_path().display());
                println!("Signed in as {} ({:?})", user.name, user.role);
                Ok(())
            }
            Self::Logout => {
                client.logout()?;
                println!("Signed out");
                Ok(())
            }
            Self::Whoami => {
                let user = match client.storage().current_user() {
                    Some(user) => user,
                    None => client.current_user().await?,
                };
                print_json(&user)
            }
            Self::Plumbers => print_json(&client.plumbers().await?),
            Self::Locations => print_json(&client.locations().await?),
            Self::Posts => print_json(&client.posts().await?),
            Self::Articles => print_json(&client.articles().await?),
            Self::Notifications { unread } => {
                let filter = NotificationFilter {
                    is_read: unread.then_some(false),
                    ..NotificationFilter::default()
                };
                print_json(&client.notifications(&filter).await?)
            }
            Self::Get { path } => {
                let path = if path.starts_with('/') {
                    path
                } else {
                    format!("/{path}")
                };
                let body: serde_json::Value = client.execute(ApiRequest::get(path)).await?;
                print_json(&body)
            }
        }
    }
}

/// Build a client whose session lives in the data directory
fn connect(settings: &CliConfig) -> Result<PlumbClient> {
    let session_path = settings.session_path();
    let store = FileStore::open(&session_path)
        .with_context(|| format!("Failed to open session at {}", session_path.display()))?;

    let navigator: Arc<dyn SessionNavigator> = Arc::new(|_: &str| {
        warn!("Session expired, run `plumb login` again");
    });

    Ok(PlumbClient::builder()
        .config(&settings.client)
        .store(Arc::new(store))
        .navigator(navigator)
        .build()?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
