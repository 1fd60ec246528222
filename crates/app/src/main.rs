use atlas_core::model::{LearningPath, StepStatus};
use services::AppServices;
use tracing_subscriber::EnvFilter;

mod args;

use args::{Args, ArgsError, Command, Parsed, print_usage};

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn status_marker(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Locked => "[ ]",
        StepStatus::Unlocked => "[>]",
        StepStatus::Finished => "[x]",
    }
}

fn print_path(path: &LearningPath) {
    for entry in path.entries() {
        println!(
            "{} {:>2}  {:<30} {:<9} {}",
            status_marker(entry.status),
            entry.index,
            entry.step.title,
            entry.status,
            entry.step.route,
        );
    }
    println!();
    println!("{}/{} finished", path.finished_count(), path.len());
    if let Some(next) = path.next_step() {
        println!("next: {} ({})", next.step.title, next.step.route);
    }
}

fn report(applied: bool) {
    if !applied {
        eprintln!("no change");
    }
}

fn render_json(path: &LearningPath) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(path)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = args::parse(
        std::env::args().skip(1),
        std::env::var("ATLAS_DB_URL").ok(),
    )
    .map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let Args {
        db_url,
        json,
        command,
    } = match parsed {
        Parsed::Help => {
            print_usage();
            return Ok(());
        }
        Parsed::Run(args) => args,
    };

    // Open + migrate SQLite at startup; services stay storage-agnostic.
    let db_url = normalize_sqlite_url(db_url);
    prepare_sqlite_file(&db_url)?;
    let services = AppServices::new_sqlite(&db_url).await?;
    let progress = services.progress();
    tracing::debug!(db = %db_url, steps = progress.step_count(), "progress loaded");

    match command {
        Command::Path => {}
        Command::Unlock { index } => report(progress.unlock(index).await?),
        Command::Finish { index } => report(progress.complete_step(index).await?),
        Command::Set { index, status } => report(progress.set_status(index, status).await?),
        Command::Reset => {
            progress.reset().await?;
            progress.ensure_first_step_unlocked().await?;
        }
    }

    let path = progress.learning_path();
    if json {
        println!("{}", render_json(&path)?);
    } else {
        print_path(&path);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::curriculum::{STEP_COUNT, steps};
    use atlas_core::model::{ProgressRecord, derive_learning_path};

    #[test]
    fn json_output_is_one_entry_per_step() {
        let mut record = ProgressRecord::new(STEP_COUNT);
        record.set(0, StepStatus::Finished).unwrap();
        let rendered = render_json(&derive_learning_path(steps(), &record)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), STEP_COUNT);
        assert_eq!(entries[0]["status"], "finished");
        assert_eq!(entries[0]["route"], steps()[0].route);
        assert_eq!(entries[1]["status"], "locked");
    }
}
