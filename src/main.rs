// Entry point and high-level CLI flow.
//
// Every invocation loads district data once (spreadsheet, or mock data when
// the spreadsheet is unavailable) and then renders one view of it:
// - `summary` prints the status line, comparisons, district table and trend.
// - `district <id>` prints the daily table for one district.
// - `export` writes the tables as CSV plus the full dashboard as JSON.
mod config;
mod error;
mod mock;
mod output;
mod reports;
mod sheets;
mod source;
mod types;
mod util;

use chrono::NaiveDate;
use clap::Parser;
use config::{Cli, Commands, Credentials};
use std::error::Error;
use std::path::Path;
use types::{find_district, DataSource, District};

/// Handle `summary`: everything the dashboard page shows, as text.
fn handle_summary(districts: &[District], source: DataSource, as_of: Option<NaiveDate>) {
    let dash = reports::build_dashboard(districts, source, as_of);

    println!("Holiday Operations Report: New Year 2569 (29 Dec 2025 - 4 Jan 2026)");
    println!("Status: {}\n", source.label());

    let yoy = &dash.year_over_year;
    println!(
        "Accidents vs last year: {} vs {} ({})",
        util::format_int(yoy.accident.current),
        util::format_int(yoy.accident.previous),
        util::format_percent(yoy.accident.change_pct)
    );
    println!(
        "Fatalities vs last year: {} vs {} ({})",
        util::format_int(yoy.fatality.current),
        util::format_int(yoy.fatality.previous),
        util::format_percent(yoy.fatality.change_pct)
    );

    let dod = &dash.day_over_day;
    let (today, yesterday) = (util::format_day(dod.today), util::format_day(dod.yesterday));
    println!(
        "Accidents {} vs {}: {} vs {} ({})",
        yesterday,
        today,
        dod.accident.previous,
        dod.accident.current,
        util::format_percent(dod.accident.change_pct)
    );
    println!(
        "Fatalities {} vs {}: {} vs {} ({})\n",
        yesterday,
        today,
        dod.fatality.previous,
        dod.fatality.current,
        util::format_percent(dod.fatality.change_pct)
    );

    output::preview_table(
        "District Summary",
        Some("staff is the average per day; other columns are totals"),
        &reports::summary_rows(&dash.summaries, &dash.grand_total),
    );
    output::preview_table("Daily Trend (all districts)", None, &reports::trend_rows(&dash.trend));
    let note = format!("{} vs {}", yesterday, today);
    output::preview_table(
        "Accidents and Fatalities by District",
        Some(note.as_str()),
        &reports::day_comparison_rows(&dash.district_days),
    );
}

/// Handle `district <id>`: the daily table for a single district.
fn handle_district(districts: &[District], id: &str) -> Result<(), Box<dyn Error>> {
    let Some(district) = find_district(districts, id) else {
        return Err(format!("No district with id \"{}\"", id).into());
    };
    output::preview_table(
        &district.name,
        Some("Daily operations, 29 Dec 2025 - 4 Jan 2026"),
        &reports::daily_rows(district),
    );
    Ok(())
}

/// Handle `export`: one CSV per table and a JSON dashboard payload.
///
/// Write failures are reported and the remaining files are still attempted.
fn handle_export(
    districts: &[District],
    source: DataSource,
    as_of: Option<NaiveDate>,
    out_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(out_dir)?;
    let dash = reports::build_dashboard(districts, source, as_of);

    let report = |name: &str, result: Result<(), Box<dyn Error>>| match result {
        Ok(()) => println!("Wrote {}", out_dir.join(name).display()),
        Err(e) => eprintln!("Write error ({}): {}", name, e),
    };

    let name = "summary.csv";
    let summary = reports::summary_rows(&dash.summaries, &dash.grand_total);
    report(name, output::write_csv(&out_dir.join(name), &summary));
    let name = "trend.csv";
    report(name, output::write_csv(&out_dir.join(name), &reports::trend_rows(&dash.trend)));
    for district in districts {
        let name = format!("{}.csv", district.id);
        let rows = reports::daily_rows(district);
        report(name.as_str(), output::write_csv(&out_dir.join(&name), &rows));
    }
    let name = "dashboard.json";
    report(name, output::write_json(&out_dir.join(name), &dash));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let (districts, source) = if cli.mock {
        source::mock_source()
    } else {
        source::select_source(Credentials::from_env().as_ref()).await
    };
    log::info!("Using {} ({} districts)", source.label(), districts.len());

    match cli.command {
        Commands::Summary => handle_summary(&districts, source, cli.as_of),
        Commands::District { id } => handle_district(&districts, &id)?,
        Commands::Export { out_dir } => handle_export(&districts, source, cli.as_of, &out_dir)?,
    }
    Ok(())
}
