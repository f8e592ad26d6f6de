use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use content_client::GenerationClient;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio::controller::IN_FLIGHT_LABEL;
use studio::presentation::DEFAULT_EXPORT_FILENAME;
use studio::render::{render_notification, render_outcome};
use studio::{
    Collaborator, Config, DemoCollaborator, Field, HttpCollaborator, LanguageModel, Studio,
    SystemClipboard,
};

#[derive(Parser, Debug)]
#[command(
    name = "studio",
    version,
    about = "Generate a blog post and a LinkedIn post from a topic"
)]
struct Cli {
    #[arg(long, global = true, help = "Serve canned content instead of calling the backend")]
    demo: bool,
    #[arg(long, global = true, help = "Generation backend base URL")]
    backend: Option<String>,
    #[arg(long, global = true, help = "Directory downloads are written to")]
    download_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate once and print both views
    Generate(GenerateArgs),
    /// Fill the form and act on results interactively
    Interactive,
    /// Check that the backend is up
    Health,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long, help = "Language model (gemini or gpt4)")]
    model: Option<String>,
    #[arg(long, help = "API key (defaults to STUDIO_API_KEY)")]
    api_key: Option<String>,
    #[arg(long, help = "Blog content ideas")]
    topic: Option<String>,
    #[arg(long, default_value = "", help = "Targeted audience")]
    audience: String,
    #[arg(long, help = "Disclaimer shown under the content")]
    disclaimer: Option<String>,
    #[arg(long, value_enum, help = "Copy a view to the clipboard")]
    copy: Option<CopyTarget>,
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = DEFAULT_EXPORT_FILENAME,
        help = "Download the blog document as JSON"
    )]
    export: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CopyTarget {
    Document,
    Social,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,studio=info,content_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(backend) = &cli.backend {
        config.backend_url = backend.clone();
    }
    if let Some(dir) = &cli.download_dir {
        config.download_dir = dir.clone();
    }

    match cli.command {
        Commands::Health => health(&config).await,
        Commands::Generate(args) => {
            let studio = build_studio(&config, cli.demo)?;
            generate(&studio, &config, args).await
        }
        Commands::Interactive => {
            let studio = build_studio(&config, cli.demo)?;
            interactive(&studio, &config).await
        }
    }
}

fn build_studio(config: &Config, demo: bool) -> Result<Studio> {
    let collaborator: Arc<dyn Collaborator> = if demo {
        Arc::new(DemoCollaborator::default())
    } else {
        let client = GenerationClient::with_timeout(&config.backend_url, config.timeout)
            .context("Failed to build generation client")?;
        Arc::new(HttpCollaborator::new(client))
    };

    let clipboard = SystemClipboard::detect();
    if !clipboard.is_available() {
        tracing::debug!("copy actions will only show a confirmation");
    }

    Ok(Studio::new(collaborator, Arc::new(clipboard), config.settings()))
}

async fn health(config: &Config) -> Result<ExitCode> {
    let client = GenerationClient::with_timeout(&config.backend_url, config.timeout)
        .context("Failed to build generation client")?;

    match client.health().await {
        Ok(status) if status.is_ok() => {
            println!("{} {} is up", style("✓").green(), config.backend_url);
            Ok(ExitCode::SUCCESS)
        }
        Ok(status) => {
            println!(
                "{} {} reported status {:?}",
                style("!").yellow(),
                config.backend_url,
                status.status
            );
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            println!("{} {}: {}", style("✗").red(), config.backend_url, e);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn generate(studio: &Studio, config: &Config, args: GenerateArgs) -> Result<ExitCode> {
    let credential = args.api_key.or_else(|| config.api_key.clone()).unwrap_or_default();

    studio
        .update_field(Field::Model, args.model.as_deref().unwrap_or_default())
        .context("Invalid --model")?;
    studio.update_field(Field::Credential, &credential)?;
    studio.update_field(Field::TopicSeed, args.topic.as_deref().unwrap_or_default())?;
    studio.update_field(Field::Audience, &args.audience)?;
    if let Some(disclaimer) = args.disclaimer {
        studio.set_disclaimer(disclaimer);
    }

    eprintln!("{}", style(IN_FLIGHT_LABEL).dim());
    studio.submit().await;
    print_outcome(studio);

    let state = studio.controller().state();
    if state.error().is_some() {
        return Ok(ExitCode::FAILURE);
    }

    match args.copy {
        Some(CopyTarget::Document) => {
            studio.copy_document();
        }
        Some(CopyTarget::Social) => {
            studio.copy_social();
        }
        None => {}
    }

    let mut code = ExitCode::SUCCESS;
    if let Some(filename) = args.export {
        match studio.export_document(&filename) {
            Ok(Some(path)) => println!("{}", style(path.display()).dim()),
            Ok(None) => {}
            Err(_) => code = ExitCode::FAILURE,
        }
    }

    print_notification(studio);
    Ok(code)
}

const ACTIONS: &[&str] = &[
    "📋 Copy blog",
    "📋 Copy LinkedIn post",
    "💾 Download JSON",
    "⚠️  Edit disclaimer",
    "✏️  Edit inputs",
    "🔄 Regenerate",
    "🔕 Dismiss notification",
    "🛑 Exit",
];

async fn interactive(studio: &Studio, config: &Config) -> Result<ExitCode> {
    let theme = ColorfulTheme::default();

    println!();
    println!("{}", style("Content Studio").bold());

    prompt_inputs(studio, config, &theme)?;
    submit_and_render(studio).await;

    loop {
        println!();
        print_notification(studio);

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(ACTIONS)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                if !studio.copy_document() {
                    println!("{}", style("Nothing generated yet").yellow());
                }
            }
            1 => {
                if !studio.copy_social() {
                    println!("{}", style("Nothing generated yet").yellow());
                }
            }
            2 => {
                let filename: String = Input::with_theme(&theme)
                    .with_prompt("File name")
                    .default(DEFAULT_EXPORT_FILENAME.to_string())
                    .interact_text()?;
                match studio.export_document(&filename) {
                    Ok(Some(path)) => println!("{}", style(path.display()).dim()),
                    Ok(None) => println!("{}", style("Nothing generated yet").yellow()),
                    Err(_) => {}
                }
            }
            3 => {
                let text: String = Input::with_theme(&theme)
                    .with_prompt("Disclaimer")
                    .with_initial_text(studio.disclaimer())
                    .allow_empty(true)
                    .interact_text()?;
                studio.set_disclaimer(text);
                print_outcome(studio);
            }
            4 => {
                prompt_inputs(studio, config, &theme)?;
                submit_and_render(studio).await;
            }
            5 => submit_and_render(studio).await,
            6 => studio.dismiss_notification(),
            _ => {
                println!("{}", style("👋 Goodbye!").blue());
                break;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn prompt_inputs(studio: &Studio, config: &Config, theme: &ColorfulTheme) -> Result<()> {
    let draft = studio.controller().draft();

    let models = LanguageModel::all();
    let labels: Vec<&str> = models.iter().map(|m| m.label()).collect();
    let current = draft
        .model
        .and_then(|m| models.iter().position(|&candidate| candidate == m))
        .unwrap_or(0);
    let model = Select::with_theme(theme)
        .with_prompt(Field::Model.label())
        .items(&labels)
        .default(current)
        .interact()?;
    studio.update_field(Field::Model, models[model].id())?;

    let mut credential = Password::with_theme(theme)
        .with_prompt(Field::Credential.label())
        .allow_empty_password(true)
        .interact()?;
    if credential.is_empty() {
        if !draft.credential.is_blank() {
            credential = draft.credential.expose().to_string();
        } else if let Some(key) = &config.api_key {
            credential = key.clone();
        }
    }
    studio.update_field(Field::Credential, &credential)?;

    let topic: String = Input::with_theme(theme)
        .with_prompt(Field::TopicSeed.label())
        .with_initial_text(draft.topic_seed.clone())
        .allow_empty(true)
        .interact_text()?;
    studio.update_field(Field::TopicSeed, &topic)?;

    let audience: String = Input::with_theme(theme)
        .with_prompt(Field::Audience.label())
        .with_initial_text(draft.audience.clone())
        .allow_empty(true)
        .interact_text()?;
    studio.update_field(Field::Audience, &audience)?;

    Ok(())
}

async fn submit_and_render(studio: &Studio) {
    println!("{}", style(IN_FLIGHT_LABEL).dim());
    studio.submit().await;
    print_outcome(studio);
}

fn print_outcome(studio: &Studio) {
    let state = studio.controller().state();
    let presentation = studio.presentation();
    println!();
    print!(
        "{}",
        render_outcome(&state, presentation.as_ref(), &studio.disclaimer())
    );
}

fn print_notification(studio: &Studio) {
    if let Some(line) = studio
        .notifications()
        .current()
        .as_ref()
        .and_then(render_notification)
    {
        println!("{}", line);
    }
}
