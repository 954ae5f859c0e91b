#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for the Smart Anti-Spam email service

use antispam_client::{
    Action, ApiConfig, App, ComposeForm, DateRange, Email, FileTokenStore, FilterOption,
    FiltersPatch, LoginForm, RegisterForm, SpamCheckRequest, Tab,
};
use anyhow::{Context, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "antispam-cli")]
#[command(about = "Send, list and reclassify mail on the Smart Anti-Spam service")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account and store its session token
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show the logged-in account
    Whoami,

    /// List emails
    List {
        /// Tab to list: inbox, sent, spam or important
        #[arg(long, default_value = "inbox", value_parser = parse_tab)]
        tab: Tab,

        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,

        /// Show emails created on or after this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        since: Option<NaiveDate>,

        /// Show emails created on or before this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        until: Option<NaiveDate>,

        /// Filter chip, e.g. spam=legitimate, date=week, sender=bob
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<FilterOption>,

        /// Show spam verdict and confidence for each email
        #[arg(long)]
        show_spam: bool,

        /// Maximum number of emails to show
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Show a single email by id
    Show {
        /// Email id
        id: i64,
    },

    /// Send an email
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
    },

    /// Mark emails as spam
    MarkSpam {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Mark emails as not spam
    MarkNotSpam {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Classify a message without storing it
    Check {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
    },

    /// Check that the API is reachable
    Health,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{s}': {e}"))
}

fn parse_tab(s: &str) -> Result<Tab, String> {
    s.parse()
}

fn parse_filter(s: &str) -> Result<FilterOption, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ApiConfig::from_env()?;
    let mut app = App::from_config(config);

    let result = run(&mut app, &args).await;

    for notification in app.drain_notifications() {
        eprintln!("{notification}");
    }

    result
}

#[allow(clippy::too_many_lines)]
async fn run(app: &mut App<FileTokenStore>, args: &Args) -> anyhow::Result<()> {
    match &args.command {
        Command::Login { email, password } => {
            app.login(&LoginForm::new(email, password)).await?;
            cmd_whoami(app, args)?;
        }
        Command::Register {
            email,
            password,
            confirm_password,
        } => {
            app.register(&RegisterForm::new(email, password, confirm_password))
                .await?;
            cmd_whoami(app, args)?;
        }
        Command::Logout => {
            app.logout();
            if !args.json {
                println!("Logged out.");
            }
        }
        Command::Whoami => cmd_whoami(app, args)?,
        Command::List {
            tab,
            search,
            since,
            until,
            filters,
            show_spam,
            limit,
        } => {
            require_session(app)?;
            let query = ListQuery {
                tab: *tab,
                search: search.as_deref(),
                since: *since,
                until: *until,
                filters,
                show_spam: *show_spam,
            };
            cmd_list(app, args, &query, *limit).await?;
        }
        Command::Show { id } => {
            require_session(app)?;
            cmd_show(app, args, *id).await?;
        }
        Command::Send { to, subject, body } => {
            require_session(app)?;
            let email = app
                .send_email(&ComposeForm::new(to, subject, body))
                .await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&email)?);
            } else {
                print_email_detail(&email);
            }
        }
        Command::MarkSpam { ids } => {
            require_session(app)?;
            mark(app, ids, true).await?;
        }
        Command::MarkNotSpam { ids } => {
            require_session(app)?;
            mark(app, ids, false).await?;
        }
        Command::Check {
            sender,
            recipient,
            subject,
            body,
        } => {
            require_session(app)?;
            let request = SpamCheckRequest {
                sender: sender.clone(),
                recipient: recipient.clone(),
                subject: subject.clone(),
                content: body.clone(),
            };
            let verdict = app.check_email(&request).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                println!(
                    "{}",
                    if verdict.is_spam {
                        "Spam detected"
                    } else {
                        "Legitimate email"
                    }
                );
                println!("Confidence: {:.2}%", verdict.confidence * 100.0);
                println!("{}", verdict.message);
            }
        }
        Command::Health => {
            let health = app.client().health().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("{} ({})", health.status, health.service);
            }
        }
    }

    Ok(())
}

fn require_session(app: &App<FileTokenStore>) -> anyhow::Result<()> {
    if !app.auth().is_authenticated() {
        bail!("Not logged in. Run `antispam-cli login` first.");
    }
    Ok(())
}

fn cmd_whoami(app: &App<FileTokenStore>, args: &Args) -> anyhow::Result<()> {
    let email = app.auth().email();
    if args.json {
        let out = serde_json::json!({
            "authenticated": app.auth().is_authenticated(),
            "email": email,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if app.auth().is_authenticated() {
        println!("Logged in as {}", email.unwrap_or("(unknown)"));
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

struct ListQuery<'a> {
    tab: Tab,
    search: Option<&'a str>,
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    filters: &'a [FilterOption],
    show_spam: bool,
}

async fn cmd_list(
    app: &mut App<FileTokenStore>,
    args: &Args,
    query: &ListQuery<'_>,
    limit: usize,
) -> anyhow::Result<()> {
    app.dispatch(Action::SetActiveTab(query.tab));
    if let Some(search) = query.search {
        app.dispatch(Action::SetSearchQuery(search.to_string()));
    }
    for option in query.filters {
        app.stage_filter(option.clone());
    }
    if query.since.is_some() || query.until.is_some() {
        let range = DateRange::new(
            query.since.map(start_of_day),
            query.until.map(end_of_day),
        );
        app.dispatch(Action::SetFilters(FiltersPatch::date_range(range)));
    }
    app.dispatch(Action::SetFilters(FiltersPatch::show_spam(query.show_spam)));
    app.refresh_if_stale().await?;

    let display: Vec<&Email> = app.visible().into_iter().take(limit).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&display)?);
    } else {
        let state = app.state();
        println!("{}", state.active_tab.title());
        for chip in app.filter_chips().iter() {
            println!("  [{}]", chip.label);
        }
        print_email_table(&display, state.active_tab, state.filters.show_spam);
    }

    Ok(())
}

async fn cmd_show(app: &mut App<FileTokenStore>, args: &Args, id: i64) -> anyhow::Result<()> {
    app.refresh().await?;
    app.select_email(Some(id));
    let email = app
        .selected_email()
        .with_context(|| format!("Email {id} not found"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(email)?);
    } else {
        print_email_detail(email);
    }

    Ok(())
}

async fn mark(app: &mut App<FileTokenStore>, ids: &[i64], spam: bool) -> anyhow::Result<()> {
    if let [id] = ids {
        if spam {
            app.mark_as_spam(*id).await?;
        } else {
            app.mark_as_not_spam(*id).await?;
        }
    } else {
        for id in ids {
            app.toggle_selected(*id);
        }
        if spam {
            app.mark_selected_as_spam().await?;
        } else {
            app.mark_selected_as_not_spam().await?;
        }
    }
    Ok(())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map_or_else(|| start_of_day(date), |dt| dt.and_utc())
}

fn print_email_table(emails: &[&Email], tab: Tab, show_spam: bool) {
    if emails.is_empty() {
        println!("No emails found.");
        return;
    }

    let who = if tab == Tab::Sent { "To" } else { "From" };
    let header = format!("{:<8} {:<17} {:<30} {}", "ID", "Date", who, "Subject");
    if show_spam {
        println!("{header:<100} Spam");
    } else {
        println!("{header}");
    }
    println!("{}", "-".repeat(100));

    for email in emails {
        let party = if tab == Tab::Sent {
            &email.recipient_email
        } else {
            &email.sender_email
        };
        let row = format!(
            "{:<8} {:<17} {:<30} {}",
            email.id,
            email.created_at.format("%Y-%m-%d %H:%M"),
            truncate(party, 28),
            truncate(&email.subject, 40),
        );
        if show_spam {
            println!("{row:<100} {}", spam_badge(email));
        } else {
            println!("{row}");
        }
    }

    println!("\n{} email(s)", emails.len());
}

fn spam_badge(email: &Email) -> String {
    if email.is_spam {
        format!("Spam ({}%)", email.confidence_percent())
    } else {
        "-".to_string()
    }
}

fn print_email_detail(email: &Email) {
    println!("ID:      {}", email.id);
    println!("Date:    {}", email.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("From:    {}", email.sender_email);
    println!("To:      {}", email.recipient_email);
    println!("Subject: {}", email.subject);
    println!("Spam:    {}", spam_badge(email));

    println!("\n--- Body ---\n");
    println!("{}", email.content);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
