use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use quark::api::{ApiClient, ApiConfig, ApiResponse, CourseBackend};
use quark::course::{Course, CourseId};
use quark::outline::write_outline;
use quark::session::{FileStorage, SessionStore};
use tracing_subscriber::EnvFilter;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const DEFAULT_OUTPUT_DIR: &str = "output/course";
const DEFAULT_SESSION_FILE: &str = ".quark-session.json";

pub struct Config {
    pub course_id: CourseId,
    pub output_dir: PathBuf,
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let course_id = args.next().context("course_id is required")?;
    let course_id = course_id
        .parse()
        .context(format!("course_id must be a number, got '{}'", course_id))?;
    let output_dir = args.next().unwrap_or(DEFAULT_OUTPUT_DIR.to_string());

    Ok(Config {
        course_id,
        output_dir: PathBuf::from(output_dir),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Usage: fetch_course <course_id> [output_dir]");
            return Err(e);
        }
    };

    let mut api_config = ApiConfig::from_env().context("failed to read configuration")?;
    if api_config.token.is_none() {
        let session_file =
            env::var("QUARK_SESSION_FILE").unwrap_or(DEFAULT_SESSION_FILE.to_string());
        let session = SessionStore::new(FileStorage::new(&session_file));
        api_config.token = session.token().map(str::to_string);
    }

    let client = ApiClient::new(api_config);
    let response: ApiResponse<Course> = client.fetch_course(config.course_id).into();
    let course = response
        .into_result()
        .map_err(anyhow::Error::msg)
        .context(format!("could not fetch course {}", config.course_id))?;

    clear_output_dir(&config.output_dir).context("failed to prepare output directory")?;
    let written = write_outline(&course, &config.output_dir)?;

    let items: usize = course.chapters.iter().map(|c| c.items.len()).sum();
    println!(
        "fetched {BOLD}{}{RESET}: {} chapters, {} items",
        course.name,
        course.chapters.len(),
        items
    );
    println!(
        "wrote {BOLD}{}{RESET} files to {BOLD}{}{RESET}",
        written.len(),
        config.output_dir.display()
    );

    Ok(())
}

fn clear_output_dir(output_dir: &Path) -> anyhow::Result<()> {
    if output_dir.exists() {
        std::fs::remove_dir_all(output_dir)?;
    }
    Ok(())
}
