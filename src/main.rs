use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use serde::Serialize;

use finance_tracker::gate::{AccessGate, GateDecision};
use finance_tracker::models::users::{Registration, User};
use finance_tracker::server::MockBackend;
use finance_tracker::services::{
    self, auth::AuthRequest, dashboard::DashboardRequest, expenses::ExpenseRequest,
    goals::GoalRequest, reports::ReportRequest, ServiceChannels,
};
use finance_tracker::session::{FileStorage, SessionState};
use finance_tracker::settings::Settings;
use finance_tracker::store::MockStore;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    #[arg(long, default_value = "log4rs.yaml")]
    log4rs: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account (does not sign in).
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        return_url: Option<String>,
    },
    Logout,
    Whoami,
    Dashboard,
    Report {
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    Expenses {
        #[arg(long)]
        category: Option<String>,
    },
    Goals,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::new(&args.config).expect("Failed to load settings.");

    init_logging(&args.log4rs).expect("Failed to initialize logging.");
    log::info!("Starting finance tracker.");

    let today = Local::now().date_naive();
    let store = if settings.store.seed_fixtures {
        MockStore::seeded(today)?
    } else {
        MockStore::empty()
    };

    let storage = FileStorage::open(settings.session.storage_path())?;
    log::debug!("Session storage at {}.", storage.path().display());
    let session = SessionState::new(Arc::new(storage));

    let channels =
        services::start_services(&settings, MockBackend::new(store), session.clone()).await?;
    let gate = AccessGate::new(&settings.gate);

    match args.command {
        Command::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let registration = Registration {
                email,
                password,
                first_name,
                last_name,
            };
            let user = services::request(&channels.auth, "AuthService", |response| {
                AuthRequest::Register {
                    registration,
                    response,
                }
            })
            .await?;
            print_json(&user)?;
        }
        Command::Login {
            email,
            password,
            return_url,
        } => {
            let user = services::request(&channels.auth, "AuthService", |response| {
                AuthRequest::Login {
                    email,
                    password,
                    response,
                }
            })
            .await?;

            match user {
                Some(user) => {
                    println!("Signed in as {}.", user.full_name());
                    println!("Continue to {}", gate.after_login(return_url.as_deref()));
                }
                None => bail!("Invalid email or password."),
            }
        }
        Command::Logout => {
            services::request(&channels.auth, "AuthService", |response| {
                AuthRequest::Logout { response }
            })
            .await?;
            println!("Signed out.");
        }
        Command::Whoami => {
            let user = require_user(&gate, &session, "/profile")?;
            print_json(&user)?;
        }
        Command::Dashboard => {
            let user = require_user(&gate, &session, "/dashboard")?;
            let dashboard = services::request(&channels.dashboard, "DashboardService", |response| {
                DashboardRequest::Build {
                    user_id: user.id,
                    today,
                    response,
                }
            })
            .await?;
            print_json(&dashboard)?;
        }
        Command::Report { month, year } => {
            let user = require_user(&gate, &session, "/reports")?;
            let report = services::request(&channels.reports, "ReportService", |response| {
                ReportRequest::Variance {
                    user_id: user.id,
                    month: month.unwrap_or(today.month()),
                    year: year.unwrap_or(today.year()),
                    response,
                }
            })
            .await?;
            print_json(&report)?;
        }
        Command::Expenses { category } => {
            let user = require_user(&gate, &session, "/expenses")?;
            list_expenses(&channels, user.id, category).await?;
        }
        Command::Goals => {
            let user = require_user(&gate, &session, "/goals")?;
            let goals = services::request(&channels.queries.goals, "GoalService", |response| {
                GoalRequest::ListByUser {
                    user_id: user.id,
                    response,
                }
            })
            .await?;
            print_json(&goals)?;
        }
    }

    Ok(())
}

fn require_user(gate: &AccessGate, session: &SessionState, path: &str) -> Result<User> {
    let user = session.current();

    match gate.check(user.as_ref(), path) {
        GateDecision::Allow => user.ok_or_else(|| anyhow!("Session vanished.")),
        decision => bail!(
            "Sign in first: {}",
            decision.location().unwrap_or_default()
        ),
    }
}

async fn list_expenses(
    channels: &ServiceChannels,
    user_id: u64,
    category: Option<String>,
) -> Result<()> {
    let expenses = match category {
        Some(category) => {
            services::request(&channels.queries.expenses, "ExpenseService", |response| {
                ExpenseRequest::ListByCategory {
                    user_id,
                    category,
                    response,
                }
            })
            .await?
        }
        None => {
            services::request(&channels.queries.expenses, "ExpenseService", |response| {
                ExpenseRequest::ListByUser { user_id, response }
            })
            .await?
        }
    };

    print_json(&expenses)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging(path: &str) -> Result<(), anyhow::Error> {
    if !Path::new("logs").exists() {
        fs::create_dir("logs")?;
    }

    match log4rs::init_file(path, Default::default()) {
        Ok(_) => {
            eprintln!("[*] Logging initialized successfully.");
            Ok(())
        }
        Err(e) => {
            eprintln!("[ERROR] Failed to initialize logging: {}", e);
            Err(anyhow::anyhow!("Could not initialize logging: {}", e))
        }
    }
}
