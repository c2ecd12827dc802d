//! CLI module for the CookSetu command-line interface.
//!
//! Provides subcommands for working with a CookSetu backend:
//! - `login` / `signup` / `logout` / `whoami` - Manage the saved session
//! - `cooks` - Browse cooks nearby or by city and cuisine
//! - `cook show|register` - View or submit your own cook profile
//! - `admin list|approve|reject` - Review cook applications
//! - `location set` - Update your saved location
//! - `theme` - Show or change the display theme
//! - `config check` - Show the effective configuration

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

use crate::admin::AdminReview;
use crate::browse::{fetch_cooks, CookFilter};
use crate::models::{
    Coordinates, CookListing, CookStatus, LocationUpdate, ReviewDecision, Role, SignupData,
    CUISINE_OPTIONS,
};
use crate::registration::{CookRegistration, SUBMITTED_MESSAGE};
use crate::session::Theme;
use crate::AppContext;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "cooksetu")]
#[command(author, version, about = "Find home cooks, or become one", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cooksetu.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Base URL of the CookSetu API (required)
    #[arg(long, env = "COOKSETU_API_URL")]
    pub api_url: Option<String>,

    /// Directory holding the saved session (overrides the config file)
    #[arg(long, env = "COOKSETU_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and save the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "COOKSETU_PASSWORD", hide_env_values = true)]
        password: String,
        // Reported to the server after logging in
        #[command(flatten)]
        position: PositionArgs,
        /// Label for the reported position
        #[arg(long, default_value = "Current location")]
        location: String,
    },

    /// Create an account and save the session
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "COOKSETU_PASSWORD", hide_env_values = true)]
        password: String,
        /// Phone number; only the last 10 digits are kept
        #[arg(long)]
        phone: String,
        /// Account type: user or cook
        #[arg(long, default_value = "user")]
        role: String,
        #[command(flatten)]
        position: PositionArgs,
        #[arg(long)]
        location: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Browse cooks
    Cooks {
        // Searches near this position instead of listing everyone
        #[command(flatten)]
        position: PositionArgs,
        /// Only cooks whose location mentions this city (ignored with --lat/--lng)
        #[arg(long)]
        city: Option<String>,
        /// Only cooks offering this cuisine
        #[arg(long)]
        cuisine: Option<String>,
    },

    /// Your own cook profile
    #[command(subcommand)]
    Cook(CookCommands),

    /// Cook application review (admins only)
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Saved location
    #[command(subcommand)]
    Location(LocationCommands),

    /// Show or change the display theme
    Theme {
        /// dark or light; omit to show the current theme
        theme: Option<String>,
        /// Switch to the other theme
        #[arg(long, conflicts_with = "theme")]
        toggle: bool,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PositionArgs {
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
}

impl PositionArgs {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

/// Cook profile subcommands
#[derive(Subcommand, Debug)]
pub enum CookCommands {
    /// Show your cook profile and its review status
    Show,
    /// Create or update your cook profile
    Register {
        /// City / location shown to customers
        #[arg(long)]
        location: Option<String>,
        #[command(flatten)]
        position: PositionArgs,
        /// Cuisine you offer; repeat for several (replaces the saved list)
        #[arg(long = "cuisine")]
        cuisines: Vec<String>,
        /// Years of experience
        #[arg(long)]
        experience: Option<u32>,
        /// Price in rupees
        #[arg(long)]
        price: Option<u32>,
        /// Whether you are taking orders
        #[arg(long)]
        available: Option<bool>,
        /// 10-digit contact number
        #[arg(long)]
        phone: Option<String>,
    },
}

/// Admin subcommands
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// List cook applications
    List {
        /// Only show applications awaiting review
        #[arg(long)]
        pending: bool,
    },
    /// Approve a pending application
    Approve { id: String },
    /// Reject a pending application
    Reject { id: String },
}

/// Location subcommands
#[derive(Subcommand, Debug)]
pub enum LocationCommands {
    /// Send a new position to the server
    Set {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, default_value = "Current location")]
        label: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Check,
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

/// Run a CLI command
pub async fn run_command(cli: &Cli, ctx: &AppContext) -> Result<()> {
    match &cli.command {
        Commands::Login {
            email,
            password,
            position,
            location,
        } => cmd_login(ctx, email, password, position.coordinates(), location).await,
        Commands::Signup {
            name,
            email,
            password,
            phone,
            role,
            position,
            location,
        } => {
            let role: Role = role.parse().map_err(anyhow::Error::msg)?;
            if role == Role::Admin {
                anyhow::bail!("Role must be user or cook");
            }
            let data = SignupData {
                name: name.clone(),
                email: email.clone(),
                password: password.clone(),
                phone_num: phone.clone(),
                role: Some(role),
                lat: position.lat,
                lng: position.lng,
                location_string: location.clone(),
            };
            cmd_signup(ctx, &data).await
        }
        Commands::Logout => cmd_logout(ctx),
        Commands::Whoami => cmd_whoami(ctx),
        Commands::Cooks {
            position,
            city,
            cuisine,
        } => cmd_cooks(ctx, position.coordinates(), city.as_deref(), cuisine.as_deref()).await,
        Commands::Cook(CookCommands::Show) => cmd_cook_show(ctx).await,
        Commands::Cook(CookCommands::Register {
            location,
            position,
            cuisines,
            experience,
            price,
            available,
            phone,
        }) => {
            let changes = ProfileChanges {
                location: location.clone(),
                coordinates: position.coordinates(),
                cuisines: cuisines.clone(),
                experience: *experience,
                price: *price,
                available: *available,
                phone: phone.clone(),
            };
            cmd_cook_register(ctx, changes).await
        }
        Commands::Admin(AdminCommands::List { pending }) => cmd_admin_list(ctx, *pending).await,
        Commands::Admin(AdminCommands::Approve { id }) => {
            cmd_admin_decide(ctx, id, ReviewDecision::Approve).await
        }
        Commands::Admin(AdminCommands::Reject { id }) => {
            cmd_admin_decide(ctx, id, ReviewDecision::Reject).await
        }
        Commands::Location(LocationCommands::Set { lat, lng, label }) => {
            cmd_location_set(ctx, Coordinates::new(*lat, *lng), label).await
        }
        Commands::Theme { theme, toggle } => cmd_theme(ctx, theme.as_deref(), *toggle),
        Commands::Config(ConfigCommands::Check) => cmd_config_check(cli, ctx),
    }
}

async fn cmd_login(
    ctx: &AppContext,
    email: &str,
    password: &str,
    position: Option<Coordinates>,
    location: &str,
) -> Result<()> {
    let session = ctx.session.login(email, password).await?;

    println!("[OK] Logged in as {} ({})", session.user.name, session.user.role);

    // Best effort: a failed location update does not undo the login
    if let Some(coords) = position {
        let update = LocationUpdate::new(coords, location);
        if let Err(e) = ctx.update_location(&update).await {
            warn!(error = %e, "Failed to update location after login");
            eprintln!("Warning: could not update your location: {}", e);
        }
    }

    Ok(())
}

async fn cmd_signup(ctx: &AppContext, data: &SignupData) -> Result<()> {
    let session = ctx.session.signup(data).await?;

    println!("[OK] Account created for {}", session.user.name);
    println!();
    match session.user.role {
        Role::Cook => println!("Next: run 'cooksetu cook register' to submit your cook profile."),
        _ => println!("Next: run 'cooksetu cooks --lat <LAT> --lng <LNG>' to find cooks near you."),
    }
    Ok(())
}

fn cmd_logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout();
    println!("Logged out.");
    Ok(())
}

fn cmd_whoami(ctx: &AppContext) -> Result<()> {
    let Some(user) = ctx.session.user() else {
        println!("Not logged in.");
        return Ok(());
    };

    println!();
    println!("Name:     {}", user.name);
    println!("Role:     {}", user.role.to_string().to_uppercase());
    println!("Email:    {}", user.email.as_deref().unwrap_or("-"));
    println!("Phone:    {}", user.phone_num.as_deref().unwrap_or("-"));
    println!(
        "Location: {}",
        user.location_string.as_deref().unwrap_or("-")
    );
    println!();
    Ok(())
}

async fn cmd_cooks(
    ctx: &AppContext,
    position: Option<Coordinates>,
    city: Option<&str>,
    cuisine: Option<&str>,
) -> Result<()> {
    if let Some(cuisine) = cuisine {
        if !CUISINE_OPTIONS.iter().any(|c| *c == cuisine) {
            println!(
                "Note: '{}' is not a standard cuisine ({}).",
                cuisine,
                CUISINE_OPTIONS.join(", ")
            );
        }
    }

    let cooks = match fetch_cooks(&ctx.api, position).await {
        Ok(cooks) => cooks,
        Err(e) => {
            warn!(error = %e, "Error fetching cooks");
            eprintln!("Could not load cooks: {}", e);
            Vec::new()
        }
    };

    let mut filter = CookFilter::new(position.is_some());
    if let Some(city) = city {
        filter = filter.with_manual_location(city);
    }
    if let Some(cuisine) = cuisine {
        filter = filter.with_cuisine(cuisine);
    }
    let shown = filter.apply(&cooks);

    if shown.is_empty() {
        println!("No cooks found");
        return Ok(());
    }

    println!();
    println!(
        "{:<24}  {:<32}  {:<6}  {:<10}  {:<10}",
        "LOCATION", "CUISINES", "EXP", "PRICE/DAY", "PHONE"
    );
    println!("{}", "-".repeat(92));
    for cook in shown {
        println!(
            "{:<24}  {:<32}  {:<6}  {:<10}  {:<10}",
            truncate(cook.location_string.as_deref().unwrap_or("Location hidden"), 24),
            truncate(&cook.cuisines.join(", "), 32),
            format!("{}y", cook.experience),
            format!("₹{}", cook.price),
            cook.phone_num
        );
    }
    println!();
    Ok(())
}

async fn cmd_cook_show(ctx: &AppContext) -> Result<()> {
    let registration = CookRegistration::load(ctx.api.clone(), &ctx.session).await?;

    match registration.existing() {
        Some(cook) => print_cook(cook),
        None => {
            println!("No cook profile yet.");
            println!("Run 'cooksetu cook register' to create one.");
        }
    }
    Ok(())
}

/// Field overrides collected from `cook register` flags
#[derive(Debug, Default)]
struct ProfileChanges {
    location: Option<String>,
    coordinates: Option<Coordinates>,
    cuisines: Vec<String>,
    experience: Option<u32>,
    price: Option<u32>,
    available: Option<bool>,
    phone: Option<String>,
}

async fn cmd_cook_register(ctx: &AppContext, changes: ProfileChanges) -> Result<()> {
    let mut registration = CookRegistration::load(ctx.api.clone(), &ctx.session).await?;

    let form = &mut registration.form;
    if let Some(location) = changes.location {
        form.location_string = location;
    }
    if let Some(coords) = changes.coordinates {
        form.set_coordinates(coords);
    }
    if !changes.cuisines.is_empty() {
        form.cuisines = changes.cuisines;
    }
    if let Some(experience) = changes.experience {
        form.experience = experience;
    }
    if let Some(price) = changes.price {
        form.price = price;
    }
    if let Some(available) = changes.available {
        form.availability = available;
    }
    if let Some(phone) = changes.phone {
        form.phone_num = phone;
    }

    let updating = registration.is_update();
    let cook = registration
        .submit()
        .await
        .with_context(|| if updating { "Update failed" } else { "Submission failed" })?;

    println!("[OK] {}", SUBMITTED_MESSAGE);
    print_cook(cook);
    Ok(())
}

async fn cmd_admin_list(ctx: &AppContext, pending_only: bool) -> Result<()> {
    let review = AdminReview::load(ctx.api.clone(), &ctx.session).await?;

    let listings: Vec<&CookListing> = if pending_only {
        review.pending().collect()
    } else {
        review.listings().iter().collect()
    };

    if listings.is_empty() {
        println!("No cook applications found.");
        return Ok(());
    }

    println!();
    println!(
        "{:<26}  {:<18}  {:<18}  {:<11}  {:<5}  {:<7}  {:<11}  {:<9}",
        "ID", "NAME", "LOCATION", "PHONE", "EXP", "PRICE", "AVAILABLE", "STATUS"
    );
    println!("{}", "-".repeat(120));
    for cook in listings {
        println!(
            "{:<26}  {:<18}  {:<18}  {:<11}  {:<5}  {:<7}  {:<11}  {:<9}",
            truncate(&cook.id, 26),
            truncate(cook.owner_name(), 18),
            truncate(
                cook.location_string.as_deref().unwrap_or("Location not provided"),
                18
            ),
            cook.phone_num,
            format!("{}y", cook.experience),
            format!("₹{}", cook.price),
            if cook.availability { "Available" } else { "Unavailable" },
            cook.status.to_string().to_uppercase()
        );
        println!("{:<28}Cuisines: {}", "", cook.cuisines.join(", "));
    }
    println!();

    let pending = review.pending().count();
    if pending > 0 {
        println!(
            "{} pending. Use 'cooksetu admin approve <ID>' or 'cooksetu admin reject <ID>'.",
            pending
        );
        println!();
    }
    Ok(())
}

async fn cmd_admin_decide(ctx: &AppContext, cook_id: &str, decision: ReviewDecision) -> Result<()> {
    let mut review = AdminReview::load(ctx.api.clone(), &ctx.session).await?;
    let status = review.decide(cook_id, decision).await?;

    let name = review
        .get(cook_id)
        .map(|c| c.owner_name().to_string())
        .unwrap_or_else(|| cook_id.to_string());
    let label = match status {
        CookStatus::Approved => "[OK]",
        CookStatus::Rejected => "[--]",
        CookStatus::Pending => "[..]",
    };
    println!("{} {} is now {}", label, name, status.to_string().to_uppercase());
    Ok(())
}

async fn cmd_location_set(ctx: &AppContext, coords: Coordinates, label: &str) -> Result<()> {
    let update = LocationUpdate::new(coords, label);
    ctx.update_location(&update)
        .await
        .context("Failed to update location")?;
    println!("[OK] Location set to {} ({:.4}, {:.4})", label, coords.lat, coords.lng);
    Ok(())
}

fn cmd_theme(ctx: &AppContext, theme: Option<&str>, toggle: bool) -> Result<()> {
    let current = if toggle {
        ctx.preferences.toggle_theme()?
    } else if let Some(raw) = theme {
        let theme: Theme = raw.parse().map_err(anyhow::Error::msg)?;
        ctx.preferences.set_theme(theme)?;
        theme
    } else {
        ctx.preferences.theme()
    };
    println!("Theme: {}", current);
    Ok(())
}

fn cmd_config_check(cli: &Cli, ctx: &AppContext) -> Result<()> {
    let config = &ctx.config;

    println!();
    println!("=== Configuration Summary ===");
    println!();
    if cli.config.exists() {
        println!("Config file:   {}", cli.config.display());
    } else {
        println!("Config file:   {} (not found, using defaults)", cli.config.display());
    }
    println!("API URL:       {}", ctx.api.base_url());
    println!();
    println!("HTTP:");
    println!("  Timeout:     {}s", config.http.timeout_secs);
    println!("  User agent:  {}", config.http.user_agent);
    println!();
    println!("Storage:");
    println!("  File:        {}", config.storage.path().display());
    println!(
        "  Session:     {}",
        if ctx.session.is_authenticated() {
            "Saved"
        } else {
            "None"
        }
    );
    println!("  Theme:       {}", ctx.preferences.theme());
    println!();
    println!("Logging:");
    println!(
        "  Level:       {}",
        cli.log_level.as_deref().unwrap_or(&config.logging.level)
    );
    println!();
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn print_cook(cook: &CookListing) {
    println!();
    println!("=== Cook Profile ===");
    println!();
    println!("Status:       {}", cook.status.to_string().to_uppercase());
    println!(
        "Location:     {}",
        cook.location_string.as_deref().unwrap_or("-")
    );
    if let Some(coords) = cook.coordinates() {
        println!("Coordinates:  {:.4}, {:.4}", coords.lat, coords.lng);
    }
    println!("Cuisines:     {}", cook.cuisines.join(", "));
    println!("Experience:   {} years", cook.experience);
    println!("Price:        ₹{}", cook.price);
    println!(
        "Availability: {}",
        if cook.availability {
            "Available"
        } else {
            "Unavailable"
        }
    );
    println!("Phone:        {}", cook.phone_num);
    println!();
}

/// Truncate a string to max characters with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
