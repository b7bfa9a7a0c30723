//! Bootstrap: provisions the first admin account on an empty deployment.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p prestige-identity --bin bootstrap -- \
//!     --first-name Ada --last-name Lovelace \
//!     --email ada@example.com --phone +33100000000 --country-code FRA
//! ```
//!
//! Reuses the role named by `--role-name` when it exists, otherwise creates it
//! with every permission. Prints the password-creation link on success.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sea_orm::Database;

use prestige_core::config::Config;
use prestige_core::tracing::{LogFormat, init_tracing};
use prestige_domain::access::AccessControl;

use prestige_identity::config::IdentityConfig;
use prestige_identity::domain::repository::RoleRepository;
use prestige_identity::domain::types::{Address, Personal, Profile, RoleDraft};
use prestige_identity::domain::validation;
use prestige_identity::infra::mailer::BrevoMailer;
use prestige_identity::state::{AppState, DbRepositories};
use prestige_identity::usecase::role::AddRoleUseCase;
use prestige_identity::usecase::user::{AddUserInput, AddUserUseCase};

#[derive(Parser)]
#[command(about = "Create the first admin account")]
struct Args {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: String,

    /// ISO3 country code of the admin's address
    #[arg(long)]
    country_code: String,

    /// Role to attach; created with every permission when missing
    #[arg(long, default_value = "Administrator")]
    role_name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(LogFormat::Compact);
    let args = Args::parse();

    validation::email(&args.email).context("invalid --email")?;
    validation::iso3(&args.country_code).context("invalid --country-code")?;

    let config = IdentityConfig::from_env().context("failed to load configuration")?;
    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState {
        repos: DbRepositories {
            db,
            mailer: BrevoMailer {
                client: reqwest::Client::new(),
                api_url: config.brevo_api_url.clone(),
                api_key: config.brevo_api_key.clone(),
                sender: config.mail_sender(),
            },
        },
        tokens: config.token_codec(),
        secrets: config.secret_codec().context("invalid AES_SECRET_KEY")?,
        settings: Arc::new(config.account_settings()),
    };

    let role_id = match state.role_repo().find_by_name(&args.role_name).await? {
        Some(role) => role.id,
        None => {
            AddRoleUseCase {
                roles: state.role_repo(),
            }
            .execute(RoleDraft {
                name: args.role_name.clone(),
                description: Some("Full access to the admin portal".to_owned()),
                access_control: AccessControl {
                    permissions: Vec::new(),
                    has_all_permissions: true,
                },
            })
            .await?
        }
    };

    let usecase = AddUserUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        mailer: state.mailer(),
        secrets: state.secrets.clone(),
        settings: state.settings.clone(),
    };
    let output = usecase
        .execute(AddUserInput {
            role_id,
            profile: Profile {
                email_address: args.email,
                phone_number: args.phone,
                personal: Personal {
                    first_name: args.first_name,
                    last_name: args.last_name,
                    ..Default::default()
                },
                address: Address {
                    country_code: args.country_code,
                    state_id: None,
                    city_id: None,
                    address_line: None,
                    postal_code: None,
                },
            },
        })
        .await?;

    println!("created admin {}", output.user_id);
    if !output.email_sent {
        println!("welcome email was not delivered");
    }
    println!(
        "set the password at {}/reset-password?token={}",
        state.settings.admin_portal_url.trim_end_matches('/'),
        output.password_reset_token
    );
    Ok(())
}
