use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::simulate::{GameRecord, SimulationAggregate};

#[derive(Serialize)]
struct JsonReport<'a> {
    aggregate: &'a SimulationAggregate,
    games: &'a [GameRecord],
}

pub fn generate_json_report<W: Write + ?Sized>(
    writer: &mut W,
    aggregate: &SimulationAggregate,
    records: &[GameRecord],
) -> Result<()> {
    let report = JsonReport {
        aggregate,
        games: records,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    writer: &mut W,
    aggregate: &SimulationAggregate,
    records: &[GameRecord],
) -> Result<()> {
    writeln!(writer, "# Gridiron Dice Simulation Results\n")?;
    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Strategy**: {}", aggregate.strategy)?;
    writeln!(writer, "- **Games**: {}", aggregate.games)?;
    writeln!(
        writer,
        "- **Record**: {}-{}-{}",
        aggregate.wins, aggregate.losses, aggregate.ties
    )?;
    writeln!(writer, "- **Win rate**: {:.1}%", aggregate.win_pct * 100.0)?;
    writeln!(
        writer,
        "- **Mean score**: {:.1} - {:.1}",
        aggregate.mean_home_score, aggregate.mean_away_score
    )?;
    writeln!(
        writer,
        "- **Chaos triggers per game**: {:.2}\n",
        aggregate.mean_chaos_triggers
    )?;

    writeln!(writer, "## Games\n")?;
    writeln!(writer, "| seed | iter | home | away | verdict | TD | FG | chaos | TO |")?;
    writeln!(writer, "|---|---|---|---|---|---|---|---|---|")?;
    for record in records {
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            record.seed,
            record.iteration,
            record.home_score,
            record.away_score,
            record.verdict,
            record.touchdowns,
            record.field_goals,
            record.chaos_triggers,
            record.turnovers
        )?;
    }
    Ok(())
}

pub fn generate_csv_report<W: Write + ?Sized>(writer: &mut W, records: &[GameRecord]) -> Result<()> {
    writeln!(
        writer,
        "seed,iteration,strategy,home_score,away_score,verdict,steps,touchdowns,field_goals,punts,chaos_triggers,turnovers"
    )?;
    for record in records {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            record.seed,
            record.iteration,
            record.strategy,
            record.home_score,
            record.away_score,
            record.verdict,
            record.steps,
            record.touchdowns,
            record.field_goals,
            record.punts,
            record.chaos_triggers,
            record.turnovers
        )?;
    }
    Ok(())
}

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    aggregate: &SimulationAggregate,
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Simulation Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "=====================".cyan())?;
    writeln!(writer, "Strategy: {}", aggregate.strategy.to_string().bold())?;
    writeln!(writer, "Games: {}", aggregate.games)?;
    writeln!(writer, "Wins: {}", aggregate.wins.to_string().green())?;
    writeln!(writer, "Losses: {}", aggregate.losses.to_string().red())?;
    writeln!(writer, "Ties: {}", aggregate.ties.to_string().yellow())?;
    writeln!(writer, "Win rate: {:.1}%", aggregate.win_pct * 100.0)?;
    writeln!(
        writer,
        "Mean score: {:.1} - {:.1}",
        aggregate.mean_home_score, aggregate.mean_away_score
    )?;
    writeln!(
        writer,
        "Per game: {:.2} TD, {:.2} FG, {:.2} chaos, {:.2} turnovers, {:.1} steps",
        aggregate.mean_touchdowns,
        aggregate.mean_field_goals,
        aggregate.mean_chaos_triggers,
        aggregate.mean_turnovers,
        aggregate.mean_steps
    )?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    Ok(())
}
