//! CLI entry point for wabisabi

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wabisabi::ai::GeminiClient;
use wabisabi::commands::{self, edit::FormatAction, PostFields};
use wabisabi::editor::Format;

#[derive(Parser)]
#[command(name = "wabisabi")]
#[command(version = "0.1.0")]
#[command(about = "Marketing site and blog editor for the Wabisabi trading course", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Post fields shared by `new` and `edit`
#[derive(Args)]
struct FieldArgs {
    /// Short summary shown on post cards
    #[arg(short, long)]
    excerpt: Option<String>,

    /// Markdown content
    #[arg(long, conflicts_with = "file")]
    content: Option<String>,

    /// Read markdown content from a file (`-` for stdin)
    #[arg(short = 'f', long = "content-file")]
    file: Option<PathBuf>,

    /// Comma separated tags
    #[arg(long)]
    tags: Option<String>,

    /// Cover image URL
    #[arg(short, long = "image-url")]
    image: Option<String>,
}

impl FieldArgs {
    fn into_fields(self, title: Option<String>) -> Result<PostFields> {
        let content = match (self.content, self.file) {
            (Some(content), _) => Some(content),
            (None, Some(path)) => Some(commands::read_content(&path)?),
            (None, None) => None,
        };
        Ok(PostFields {
            title,
            excerpt: self.excerpt,
            content,
            tags: self.tags,
            image_url: self.image,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit an existing post
    Edit {
        /// Slug of the post
        slug: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,

        /// Toolbar action to apply to the content (h2, bold, italic, list)
        #[arg(long, requires = "selection")]
        format: Option<Format>,

        /// Character range for --format, as START:END
        #[arg(long, requires = "format")]
        selection: Option<String>,
    },

    /// Print the rendered HTML body of a post
    Render {
        /// Slug of the post
        slug: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Drafting assistant
    #[command(subcommand)]
    Ai(AiCommands),

    /// Display version information
    Version,
}

#[derive(Subcommand)]
enum AiCommands {
    /// Suggest post topics
    Ideas,

    /// Draft a post on a topic
    Draft {
        /// Topic to write about
        topic: String,

        /// Save the draft as a new post
        #[arg(short, long)]
        save: bool,
    },

    /// Reformat a post's content as markdown
    Format {
        /// Slug of the post
        slug: String,
    },
}

fn drafting_client(app: &wabisabi::Wabisabi) -> Result<GeminiClient> {
    Ok(GeminiClient::from_config(&app.config.gemini)?)
}

fn resolve(base_dir: &Path, folder: PathBuf) -> PathBuf {
    if folder.is_absolute() {
        folder
    } else {
        base_dir.join(folder)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "wabisabi=debug,info"
    } else {
        "wabisabi=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = resolve(&base_dir, folder);
            tracing::info!("Initializing site in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, fields } => {
            let app = wabisabi::Wabisabi::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            commands::new::create_post(&app, &fields.into_fields(Some(title))?)?;
        }

        Commands::Edit {
            slug,
            title,
            fields,
            format,
            selection,
        } => {
            let app = wabisabi::Wabisabi::new(&base_dir)?;
            let action = match (format, selection) {
                (Some(format), Some(selection)) => Some(FormatAction {
                    format,
                    selection: commands::edit::parse_selection(&selection)?,
                }),
                _ => None,
            };
            commands::edit::edit_post(&app, &slug, &fields.into_fields(title)?, action.as_ref())?;
        }

        Commands::Render { slug } => {
            let app = wabisabi::Wabisabi::new(&base_dir)?;
            println!("{}", commands::render::render_post(&app, &slug)?);
        }

        Commands::Generate { watch } => {
            let app = wabisabi::Wabisabi::new(&base_dir)?;
            tracing::info!("Generating static files...");

            commands::generate::run(&app)?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                commands::generate::watch(&app).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let app = wabisabi::Wabisabi::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            app.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            wabisabi::server::start(&app, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let app = wabisabi::Wabisabi::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            app.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let app = wabisabi::Wabisabi::new(&base_dir)?;
            commands::list::run(&app, &r#type)?;
        }

        Commands::Ai(ai) => {
            let app = wabisabi::Wabisabi::new(&base_dir)?;
            let client = drafting_client(&app)?;
            match ai {
                AiCommands::Ideas => {
                    commands::ai::ideas(&client).await?;
                }
                AiCommands::Draft { topic, save } => {
                    commands::ai::draft(&app, &client, &topic, save).await?;
                }
                AiCommands::Format { slug } => {
                    commands::ai::format(&app, &client, &slug).await?;
                }
            }
        }

        Commands::Version => {
            println!("wabisabi version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
