use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use cron_lookahead::{Schedule, DISPLAY_FORMAT};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Shows the structure of a cron expression and its upcoming events.
#[derive(Debug, Parser)]
#[command(name = "cron-lookahead", version, about)]
struct Cli {
    /// Cron expression: "<minute> <hour> <day> <month> <weekday> [<command>]".
    expression: String,

    /// Number of upcoming events to show.
    #[arg(short = 'n', long, default_value_t = 0)]
    count: usize,

    /// Reference time as YYYY-MM-DDTHH:MM, local now by default.
    #[arg(short, long, value_parser = parse_reference)]
    reference: Option<NaiveDateTime>,
}

fn parse_reference(input: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
        .with_context(|| format!("invalid reference time `{input}`, expected YYYY-MM-DDTHH:MM"))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let schedule = Schedule::new(cli.expression.as_str())?;

    println!("minutes:  {}", join(schedule.minutes()));
    println!("hours:    {}", join(schedule.hours()));
    println!("days:     {}", join(schedule.days()));
    println!("months:   {}", join(schedule.months()));
    println!("weekdays: {}", join(schedule.weekdays()));
    println!("command:  {}", schedule.command().unwrap_or_default());

    if cli.count > 0 {
        let reference = cli.reference.unwrap_or_else(|| Local::now().naive_local());
        tracing::debug!(%reference, count = cli.count, "calculating upcoming events");

        // the first one fails loudly, the rest are best-effort
        let first = schedule.next_occurrence(&reference)?;
        for (index, event) in schedule.iter(&first).take(cli.count).enumerate() {
            println!("next #{}: {}", index + 1, event.format(DISPLAY_FORMAT));
        }
    }

    Ok(())
}

fn join<'a>(values: impl IntoIterator<Item = &'a u16>) -> String {
    values.into_iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
