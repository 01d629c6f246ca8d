use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::Value;
use walkdir::WalkDir;

/// Directory names mapped to the resource they hold.
const RESOURCES: [(&str, &str); 4] = [
    ("riddles", "riddle"),
    ("sites", "site"),
    ("topics", "topic"),
    ("tutorials", "tutorial"),
];

#[derive(Parser)]
#[command(name = "carousel-sync")]
#[command(about = "Push carousel content files to a Carousel Studio server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create one item per JSON file found under a directory
    Push {
        /// Directory containing riddles/, sites/, topics/ and tutorials/
        dir: PathBuf,

        #[arg(long, default_value = "http://localhost:3000")]
        server: String,

        /// Also generate video slides for every created item
        #[arg(long)]
        convert: bool,

        /// Validate files without contacting the server
        #[arg(long)]
        dry_run: bool,
    },
}

/// A content file ready to be submitted.
#[derive(Debug)]
struct PushItem {
    path: PathBuf,
    /// Singular kind, as used by `/api/generate-{kind}`.
    kind: &'static str,
    body: Value,
}

impl PushItem {
    fn resource(&self) -> &'static str {
        RESOURCES
            .iter()
            .find(|(_, kind)| *kind == self.kind)
            .map(|(resource, _)| *resource)
            .unwrap_or(self.kind)
    }
}

#[derive(Deserialize)]
struct Created {
    data: CreatedItem,
}

#[derive(Deserialize)]
struct CreatedItem {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Default, PartialEq)]
struct Summary {
    created: usize,
    converted: usize,
    failed: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Push {
            dir,
            server,
            convert,
            dry_run,
        } => push(&dir, &server, convert, dry_run).await,
    };

    match result {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn push(dir: &Path, server: &str, convert: bool, dry_run: bool) -> anyhow::Result<Summary> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let files = collect_json_files(dir);
    if files.is_empty() {
        println!("No JSON files found under {}", dir.display());
        return Ok(Summary::default());
    }

    let client = reqwest::Client::new();
    let server = server.trim_end_matches('/');
    let mut summary = Summary::default();

    for path in files {
        let item = match load_item(dir, &path) {
            Ok(item) => item,
            Err(e) => {
                println!("FAIL {}: {e:#}", path.display());
                summary.failed += 1;
                continue;
            }
        };

        if dry_run {
            println!("OK   {} ({})", item.path.display(), item.kind);
            continue;
        }

        match create(&client, server, &item).await {
            Ok(id) => {
                summary.created += 1;
                println!("NEW  {} -> {}/{}", item.path.display(), item.resource(), id);
                if convert {
                    match generate_video_slides(&client, server, item.resource(), &id).await {
                        Ok(()) => summary.converted += 1,
                        Err(e) => {
                            println!("FAIL {} (video slides): {e:#}", item.path.display());
                            summary.failed += 1;
                        }
                    }
                }
            }
            Err(e) => {
                println!("FAIL {}: {e:#}", item.path.display());
                summary.failed += 1;
            }
        }
    }

    println!(
        "{} created, {} converted, {} failed",
        summary.created, summary.converted, summary.failed
    );
    Ok(summary)
}

/// Every `*.json` file below `dir`, in a stable order.
fn collect_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

fn load_item(root: &Path, path: &Path) -> anyhow::Result<PushItem> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let body: Value = serde_json::from_str(&raw).context("Invalid JSON")?;
    if !body.is_object() {
        bail!("Expected a JSON object");
    }

    let kind = kind_for(root, path, &body)
        .ok_or_else(|| anyhow!("Cannot tell the content kind (use a riddles/, sites/, topics/ or tutorials/ folder, or a \"kind\" key)"))?;

    Ok(PushItem {
        path: path.to_path_buf(),
        kind,
        body,
    })
}

/// The declared `"kind"` wins over the folder the file sits in.
fn kind_for(root: &Path, path: &Path, body: &Value) -> Option<&'static str> {
    if let Some(declared) = body.get("kind").and_then(Value::as_str) {
        return parse_kind(declared);
    }

    path.strip_prefix(root)
        .ok()?
        .parent()?
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .find_map(parse_kind)
}

fn parse_kind(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    RESOURCES
        .iter()
        .find(|(resource, kind)| lower == *resource || lower == *kind)
        .map(|(_, kind)| *kind)
}

async fn create(client: &reqwest::Client, server: &str, item: &PushItem) -> anyhow::Result<String> {
    let url = format!("{}/api/generate-{}", server, item.kind);
    let response = client.post(&url).json(&item.body).send().await?;

    let status = response.status();
    if !status.is_success() {
        bail!("{} {}", status, error_message(response).await);
    }
    let created: Created = response.json().await.context("Unexpected response")?;
    Ok(created.data.id)
}

async fn generate_video_slides(
    client: &reqwest::Client,
    server: &str,
    resource: &str,
    id: &str,
) -> anyhow::Result<()> {
    let url = format!("{}/api/{}/{}/video-slides", server, resource, id);
    let response = client.post(&url).send().await?;

    let status = response.status();
    if !status.is_success() {
        bail!("{} {}", status, error_message(response).await);
    }
    Ok(())
}

async fn error_message(response: reqwest::Response) -> String {
    match response.json::<Value>().await {
        Ok(body) => body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Err(_) => String::new(),
    }
}
