//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use blogoutline_core::{AgentOutlineStep, AgentResearchStep, ProgressReporter, Session};
use blogoutline_shared::{
    AppConfig, BlogPreferences, Domain, Intent, OutlineDocument, PointOfView, Tone, WordCount,
    credentials_from_env, init_config, load_config,
};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Blog outline builder: from writing preferences to a researched outline.
#[derive(Parser)]
#[command(
    name = "blogoutline",
    version,
    about = "Research top-ranking articles and draft a structured blog outline.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Research reference articles and draft an outline.
    Generate(GenerateArgs),

    /// List the accepted values of every choice field.
    Choices,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Preference fields and generation options.
///
/// Every field flag overrides the same field from `--preferences`.
#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// TOML file with preference fields (topic, audience, domain, ...).
    #[arg(long, value_name = "FILE")]
    pub preferences: Option<PathBuf>,

    /// Blog topic, e.g. "How to build healthy habits".
    #[arg(long)]
    pub topic: Option<String>,

    /// Target audience, e.g. "Busy professionals in their 30s".
    #[arg(long)]
    pub audience: Option<String>,

    /// Industry/domain (see `blogoutline choices`).
    #[arg(long)]
    pub domain: Option<Domain>,

    /// Desired tone.
    #[arg(long)]
    pub tone: Option<Tone>,

    /// Point of view.
    #[arg(long = "pov")]
    pub point_of_view: Option<PointOfView>,

    /// Primary intent.
    #[arg(long)]
    pub intent: Option<Intent>,

    /// Preferred word count bracket.
    #[arg(long)]
    pub word_count: Option<WordCount>,

    /// Include an FAQ section: yes or no.
    #[arg(long, value_parser = parse_yes_no)]
    pub faq: Option<bool>,

    /// Key subtopics or notes.
    #[arg(long)]
    pub notes: Option<String>,

    /// OpenAI API key (defaults to the configured env var).
    #[arg(long)]
    pub openai_key: Option<String>,

    /// SerpAPI key (defaults to the configured env var).
    #[arg(long)]
    pub serp_key: Option<String>,

    /// Where to save the outline (defaults to the configured file name).
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Print the outline without saving it.
    #[arg(long, conflicts_with = "out")]
    pub no_save: bool,

    /// Print the composed preferences block and exit without calling any API.
    #[arg(long)]
    pub dry_run: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

fn parse_yes_no(s: &str) -> std::result::Result<bool, String> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => Err(format!("expected yes or no, got '{other}'")),
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// the outline.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "blogoutline=warn",
        1 => "blogoutline=info",
        2 => "blogoutline=debug",
        _ => "blogoutline=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => cmd_generate(args).await,
        Command::Choices => cmd_choices(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Merge the optional preferences file with field flags.
fn resolve_preferences(args: &GenerateArgs) -> Result<BlogPreferences> {
    let mut prefs = match &args.preferences {
        Some(path) => load_preferences(path)?,
        None => BlogPreferences::default(),
    };

    if let Some(topic) = &args.topic {
        prefs.topic = topic.clone();
    }
    if let Some(audience) = &args.audience {
        prefs.audience = audience.clone();
    }
    if let Some(domain) = args.domain {
        prefs.domain = domain;
    }
    if let Some(tone) = args.tone {
        prefs.tone = tone;
    }
    if let Some(pov) = args.point_of_view {
        prefs.point_of_view = pov;
    }
    if let Some(intent) = args.intent {
        prefs.intent = intent;
    }
    if let Some(word_count) = args.word_count {
        prefs.word_count = word_count;
    }
    if let Some(faq) = args.faq {
        prefs.include_faq = faq;
    }
    if let Some(notes) = &args.notes {
        prefs.notes = notes.clone();
    }

    Ok(prefs)
}

fn load_preferences(path: &Path) -> Result<BlogPreferences> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read preferences file '{}'", path.display()))?;
    toml::from_str(&content)
        .wrap_err_with(|| format!("invalid preferences file '{}'", path.display()))
}

async fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let config = load_config()?;
    let prefs = resolve_preferences(&args)?;
    let block = blogoutline_core::compose_block(&prefs);

    if args.dry_run {
        print!("{block}");
        return Ok(());
    }

    let mut session = Session::with_credentials(credentials_from_env(&config));
    if let Some(key) = &args.openai_key {
        session.credentials.set_openai_key(key);
    }
    if let Some(key) = &args.serp_key {
        session.credentials.set_serp_key(key);
    }

    info!(topic = %prefs.topic, session = %session.id, "generating blog outline");

    let research = AgentResearchStep::new(config.clone());
    let outline = AgentOutlineStep::new(config.clone());
    let reporter = CliProgress::new();

    session
        .generate(&block, &research, &outline, &reporter)
        .await?;
    drop(reporter);

    let Some(text) = session.rendered_outline() else {
        return Err(eyre!("generation finished without an outline"));
    };
    println!("{text}");

    if args.no_save {
        return Ok(());
    }

    let target = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.file_name));
    let (dir, file_name) = split_target(&target)?;
    let download = session
        .download(&file_name)
        .ok_or_else(|| eyre!("no outline to save"))?;
    let path = download.write_to(&dir)?;
    eprintln!();
    eprintln!("  Outline saved to {}", path.display());

    Ok(())
}

/// Split an output path into directory and file name (directory defaults to cwd).
fn split_target(target: &Path) -> Result<(PathBuf, String)> {
    let file_name = target
        .file_name()
        .ok_or_else(|| eyre!("output path '{}' has no file name", target.display()))?
        .to_string_lossy()
        .to_string();
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name))
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(format!("{name}..."));
    }

    fn done(&self, _outline: &OutlineDocument) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

fn cmd_choices() -> Result<()> {
    fn section<T: Copy>(title: &str, all: &[T], slug: fn(&T) -> &'static str, label: fn(&T) -> &'static str) {
        println!("{title}:");
        for choice in all {
            println!("  {:<22} {}", slug(choice), label(choice));
        }
        println!();
    }

    section("--domain", Domain::ALL, Domain::slug, Domain::label);
    section("--tone", Tone::ALL, Tone::slug, Tone::label);
    section("--pov", PointOfView::ALL, PointOfView::slug, PointOfView::label);
    section("--intent", Intent::ALL, Intent::slug, Intent::label);
    section("--word-count", WordCount::ALL, WordCount::slug, WordCount::label);
    println!("--faq:\n  yes | no");
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
