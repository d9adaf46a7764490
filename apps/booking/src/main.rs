use std::sync::Arc;
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use dotenv::dotenv;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;

use args::BookingArgs;
use scheduling_cell::{BookingOutcome, Dashboard, HttpSchedulingApi, TimeSlot};
use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::{SignOut, User};

/// Sign-out for a one-shot command line run: there is no stored session to
/// clear beyond the token held in memory.
struct ProcessSignOut;

impl SignOut for ProcessSignOut {
    fn sign_out(&self) {
        info!("Signed out");
    }
}

fn print_section(title: &str, slots: &[TimeSlot]) {
    println!("{}", title);
    if slots.is_empty() {
        println!("  (no slots)");
    }
    for slot in slots {
        let marker = if slot.selected { '*' } else { ' ' };
        let status = if slot.available { "available" } else { "taken" };
        println!(" {} {} {}", marker, slot.display_label, status);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,scheduling_cell=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting booking client");

    let args = BookingArgs::parse();
    let config = AppConfig::from_env();

    let mut client = ApiClient::new(&config).context("failed to create API client")?;
    if let Some(token) = &config.api_token {
        client = client.with_token(token.clone());
    }

    let user = User::new(config.user_id.clone(), config.user_name.clone());

    let api = Arc::new(HttpSchedulingApi::new(client));
    let mut dashboard = Dashboard::new(user, api, &config, Arc::new(ProcessSignOut));

    println!("{}", dashboard.greeting());
    let providers = dashboard
        .load_providers()
        .await
        .context("failed to load providers")?;

    for provider in providers {
        println!("  {} ({})", provider.display_name, provider.id);
    }

    let provider_id = match args.provider_id {
        Some(id) => id,
        None => providers
            .first()
            .map(|p| p.id.clone())
            .ok_or_else(|| anyhow!("no providers available"))?,
    };
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let mut session = dashboard.open_booking(provider_id, date);
    session.open().await.context("failed to open booking session")?;

    if let Some(hour) = args.hour {
        session.select_hour(hour);
    }

    let schedule = session.schedule();
    println!("Availability on {}", date);
    print_section("Morning", &schedule.morning);
    print_section("Afternoon", &schedule.afternoon);

    if args.hour.is_none() {
        return Ok(());
    }

    match session.submit().await? {
        BookingOutcome::Created { appointment_id, scheduled_at } => {
            println!(
                "Appointment created for {} (id: {})",
                scheduled_at.format("%Y-%m-%d %H:%M"),
                appointment_id.as_deref().unwrap_or("unknown")
            );
        }
        BookingOutcome::Failed { reason } => {
            println!("Booking failed: {}", reason);
        }
    }

    Ok(())
}
