mod cli;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use jot::config::JotConfig;
use jot::journal::prefs::Mode;

#[derive(Parser)]
#[command(name = "jot", version, about = "Local-first journal with an on-device AI companion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a new entry (or continue one); reads stdin when TEXT is omitted
    Write {
        /// Entry text
        text: Option<String>,
        /// Start from a template (built-in or custom id)
        #[arg(long, conflicts_with = "entry")]
        template: Option<String>,
        /// Continue editing an existing entry
        #[arg(long)]
        entry: Option<String>,
    },
    /// List entries, newest first
    List {
        /// Case-insensitive text in content or title
        #[arg(long)]
        search: Option<String>,
        /// Earliest date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Only entries marked as templates
        #[arg(long)]
        templates: bool,
    },
    /// Print one entry
    Show { id: String },
    /// Delete an entry
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Manage entry titles
    Title {
        #[command(subcommand)]
        action: TitleAction,
    },
    /// Manage custom templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Print the context the AI companion would see for QUERY
    Context { query: String },
    /// Ask the AI companion about your journal
    Ask { question: String },
    /// Show the model server connection status
    Status {
        /// Keep probing on the configured interval until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Manage the selected model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
    /// Show or change the colour theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Export all entries as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Import entries from an export file (existing ids are kept)
    Import { file: PathBuf },
    /// Show journal statistics
    Stats,
    /// Run database diagnostics
    Doctor,
}

#[derive(Subcommand)]
enum TitleAction {
    /// Set an entry's title
    Set { id: String, title: String },
    /// Remove an entry's title
    Clear { id: String },
    /// Ask the AI companion for a title
    Suggest {
        id: String,
        /// Store the suggestion as the entry's title
        #[arg(long)]
        apply: bool,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// List custom and built-in templates
    List,
    /// Turn an entry into a custom template
    Mark { id: String },
    /// Turn a custom template back into an ordinary entry
    Unmark { id: String },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Print the selected model
    Get,
    /// Select a model
    Set { name: String },
    /// List models installed on the server
    List,
    /// Download the selected model
    Pull,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the active theme
    Get,
    /// Store a theme preference
    Set {
        theme: String,
        /// light or dark (defaults to the terminal's mode)
        #[arg(long)]
        mode: Option<Mode>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match JotConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Log to stderr so stdout stays clean for exports and rendered context.
    let filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &JotConfig) -> Result<()> {
    match command {
        Command::Write {
            text,
            template,
            entry,
        } => cli::write::write(config, text, template.as_deref(), entry.as_deref()).await,
        Command::List {
            search,
            from,
            to,
            templates,
        } => cli::list::list(config, search, from, to, templates),
        Command::Show { id } => cli::show::show(config, &id),
        Command::Delete { id, yes } => cli::delete::delete(config, &id, yes),
        Command::Title { action } => match action {
            TitleAction::Set { id, title } => cli::title::set(config, &id, &title),
            TitleAction::Clear { id } => cli::title::clear(config, &id),
            TitleAction::Suggest { id, apply } => cli::title::suggest(config, &id, apply).await,
        },
        Command::Template { action } => match action {
            TemplateAction::List => cli::template::list(config),
            TemplateAction::Mark { id } => cli::template::mark(config, &id),
            TemplateAction::Unmark { id } => cli::template::unmark(config, &id),
        },
        Command::Context { query } => cli::context::context(config, &query),
        Command::Ask { question } => cli::ask::ask(config, &question).await,
        Command::Status { watch } => cli::status::status(config, watch).await,
        Command::Model { action } => match action {
            ModelAction::Get => cli::model::get(config),
            ModelAction::Set { name } => cli::model::set(config, &name),
            ModelAction::List => cli::model::list(config).await,
            ModelAction::Pull => cli::model::pull(config).await,
        },
        Command::Theme { action } => match action {
            ThemeAction::Get => cli::theme::get(config),
            ThemeAction::Set { theme, mode } => cli::theme::set(config, &theme, mode),
        },
        Command::Export { output } => cli::export::export(config, output.as_deref()),
        Command::Import { file } => cli::import::import(config, &file),
        Command::Stats => cli::stats::stats(config),
        Command::Doctor => cli::doctor::doctor(config),
    }
}
