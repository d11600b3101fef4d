use clap::{Parser, Subcommand};
use geoshare::client::parse_share_target;
use geoshare::config::parse_size;
use geoshare::logging::init_logging;
use geoshare::utils::files::{collect_paths, read_uploads};
use geoshare::utils::status::print_file_summary;
use geoshare::{Config, HeadlessSurface, Session, ShareClient, ShareServer};
use std::path::PathBuf;

const DEFAULT_SERVER: &str = "http://localhost:3001";

#[derive(Parser)]
#[command(name = "geoshare")]
#[command(about = "Drag-and-drop GeoJSON maps with shareable read-only links", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web map and bundle API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: std::net::Ipv4Addr,

        #[arg(long, default_value_t = Config::default().port)]
        port: u16,

        /// Largest accepted share request, e.g. "20MB"
        #[arg(long, default_value = "20MB", value_parser = parse_size)]
        max_payload: usize,

        /// Serve static assets from this directory ahead of the built-in map
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Load GeoJSON files or directories and print a share link
    Share {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,

        /// Limit to report if the server rejects the upload without stating one
        #[arg(long, default_value = "20MB", value_parser = parse_size)]
        max_payload: usize,
    },

    /// Fetch a shared map by link or id and list its files
    View {
        target: String,

        /// Server to ask when TARGET is a bare id
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            max_payload,
            static_dir,
        } => {
            let config = Config {
                host: host.octets(),
                port,
                max_payload_bytes: max_payload,
                static_dir,
                ..Config::default()
            };
            ShareServer::new(config).start().await
        }
        Command::Share {
            paths,
            server,
            max_payload,
        } => share(paths, server, max_payload).await,
        Command::View { target, server } => view(&target, server).await,
    }
}

async fn share(paths: Vec<PathBuf>, server: String, max_payload: usize) -> anyhow::Result<()> {
    let (uploads, unreadable) = read_uploads(&collect_paths(&paths));
    for (path, reason) in &unreadable {
        eprintln!("❌ Failed to read {:?}: {}", path, reason);
    }

    let client = ShareClient::new(server, max_payload);
    let mut session = Session::new(HeadlessSurface::new(), "/");
    let outcome = session.upload_batch(&client, uploads).await?;
    print_file_summary(session.registry().list_files(), &outcome.report.errors);

    match outcome.share {
        Some(Ok(link)) => {
            println!("🔗 Share link: {}", link);
            Ok(())
        }
        Some(Err(err)) => Err(err.into()),
        None => anyhow::bail!("No valid GeoJSON files to share"),
    }
}

async fn view(target: &str, server: String) -> anyhow::Result<()> {
    let Some((base, id)) = parse_share_target(target) else {
        anyhow::bail!("'{}' is not a share link or id", target);
    };
    let client = ShareClient::new(base.unwrap_or(server), Config::default().max_payload_bytes);

    let mut session = Session::new(HeadlessSurface::new(), &format!("/v/{}", id));
    let report = session.hydrate(&client).await?;
    println!("🔒 Read-only shared map {}", client.share_url(&id));
    print_file_summary(session.registry().list_files(), &report.errors);
    if let Some(b) = session.registry().combined_bounds() {
        let c = b.center();
        println!("🌍 Centre of all files: {:.4}, {:.4}", c.lng, c.lat);
    }
    Ok(())
}
