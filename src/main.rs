use anyhow::Result;
use clap::Parser;
use log::{error, info};

use jobapptracker::config::Config;
use jobapptracker::email::build_search_query;
use jobapptracker::tracker::JobTracker;

#[derive(Parser)]
#[command(name = "jobapptracker")]
#[command(about = "Records job application acknowledgements from Gmail into a Google Sheet")]
#[command(version = "0.1.0")]
struct Args {
    /// Dry-run mode: scan and extract without touching the spreadsheet
    #[arg(short, long)]
    dry_run: bool,

    /// Daemon mode: run on the schedule from SCHEDULER_TIMES
    #[arg(long)]
    daemon: bool,

    /// Maximum number of emails to examine (capped by TRACKER_MAX_RESULTS)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u32).range(1..=500))]
    limit: Option<u32>,

    /// Check the configuration without connecting
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    env_logger::init();

    if args.dry_run {
        info!("🧪 Starting job application tracker in DRY-RUN mode");
    } else {
        info!("🚀 Starting job application tracker");
    }

    let config = Config::new()?;

    if args.check_config {
        println!("✅ Configuration valid!");
        println!("🔑 Credentials: {}", config.gmail.credentials_path);
        println!("💾 Token cache: {}", config.gmail.token_cache_path);
        println!("📊 Spreadsheet: {} (sheet '{}', from row {})",
                 config.tracker.spreadsheet_id, config.tracker.sheet_name, config.tracker.start_row);
        println!("🔎 Query: {}", build_search_query(&config.tracker.keywords)?);
        println!("🏢 ATS domain: {}", config.tracker.ats_domain);
        return Ok(());
    }

    if args.daemon {
        info!("🔄 Starting in daemon mode");
        run_daemon_mode(config, args).await?;
        return Ok(());
    }

    if let Err(e) = run_once(&config, args.dry_run, args.limit).await {
        error!("❌ Error while tracking applications: {:#}", e);
        return Err(e);
    }

    Ok(())
}

async fn run_once(config: &Config, dry_run: bool, limit: Option<u32>) -> Result<()> {
    let tracker = JobTracker::connect(config, dry_run).await?;

    let report = if dry_run {
        tracker.run_dry(limit).await?
    } else {
        tracker.run(limit).await?
    };

    if !report.failures.is_empty() {
        error!("⚠️  {} email(s) skipped, re-run after fixing them:", report.failures.len());
        for (message_id, reason) in &report.failures {
            error!("   {}: {}", message_id, reason);
        }
    }

    match report.start_row {
        Some(row) => info!("✅ {} application(s) recorded from row {}", report.accepted, row),
        None => info!("✅ Done, nothing written. {}", report.summary()),
    }

    Ok(())
}

async fn run_daemon_mode(config: Config, args: Args) -> Result<()> {
    use chrono::{Local, Timelike};
    use tokio_cron_scheduler::{Job, JobScheduler};

    if !config.scheduler.enabled {
        error!("❌ Daemon mode requires SCHEDULER_ENABLED=true");
        anyhow::bail!("Scheduler not enabled in configuration");
    }

    if config.scheduler.schedule_times.is_empty() {
        error!("❌ No schedule defined (SCHEDULER_TIMES)");
        anyhow::bail!("No schedule defined");
    }

    info!("📅 Scheduled runs: {:?}", config.scheduler.schedule_times);

    let scheduler = JobScheduler::new().await?;

    for schedule_time in &config.scheduler.schedule_times {
        let Some((hour, minute)) = schedule_time.split_once(':') else {
            error!("❌ Invalid schedule '{}', expected HH:MM", schedule_time);
            continue;
        };

        // Cron format: "sec min hour day month weekday"
        let cron_expr = format!("0 {} {} * * *", minute.trim(), hour.trim());
        info!("📆 Adding scheduled job {} (cron: {})", schedule_time, cron_expr);

        let config_clone = config.clone();
        let dry_run = args.dry_run;
        let limit = args.limit;
        let schedule_time_clone = schedule_time.clone();

        let job = Job::new_async(cron_expr.as_str(), move |_uuid, _l| {
            let config = config_clone.clone();
            let schedule_time = schedule_time_clone.clone();

            Box::pin(async move {
                info!("⏰ Scheduled run at {}", schedule_time);

                if let Err(e) = run_once(&config, dry_run, limit).await {
                    error!("❌ Scheduled run at {} failed: {:#}", schedule_time, e);
                }
            })
        })?;

        scheduler.add(job).await?;
    }

    scheduler.start().await?;

    info!("✅ Daemon started, waiting for scheduled runs");
    info!("⏸️  Press Ctrl+C to stop");

    loop {
        tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;

        let now = Local::now();
        if now.minute() == 0 {
            info!("💓 Daemon alive - {}", now.format("%Y-%m-%d %H:%M"));
        }
    }
}
