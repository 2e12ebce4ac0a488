use std::io::{BufRead, Write};

use anyhow::Result;
use colored::Colorize;
use gridiron_game::{
    Banner, DiceBag, DiceRoll, EngineEvent, GameSession, PlayCall, Scoreboard, Tone,
};

/// Line-level commands accepted at any prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quit,
    NewGame,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => Some(Command::Quit),
        "new" => Some(Command::NewGame),
        _ => None,
    }
}

/// Parse `d6 d10 d20` from one line; `-` or a missing token leaves that die blank.
#[must_use]
pub fn parse_dice_line(line: &str) -> DiceRoll {
    let mut tokens = line
        .split_whitespace()
        .map(|token| if token == "-" { "" } else { token });
    let d6 = tokens.next().unwrap_or("");
    let d10 = tokens.next().unwrap_or("");
    let d20 = tokens.next().unwrap_or("");
    DiceRoll::parse(d6, d10, d20)
}

pub fn render_banner<W: Write + ?Sized>(out: &mut W, banner: &Banner) -> Result<()> {
    let title = match banner.tone {
        Tone::Normal => banner.title.bold(),
        Tone::Shake => banner.title.red().bold(),
        Tone::Celebrate => banner.title.bright_green().bold(),
    };
    writeln!(out, "*** {title} *** {}", banner.subtitle)?;
    Ok(())
}

fn render_scoreboard<W: Write + ?Sized>(
    out: &mut W,
    board: &Scoreboard,
    session: &GameSession,
) -> Result<()> {
    let teams = &session.config().teams;
    writeln!(
        out,
        "{} {} - {} {} | {} {} | {}",
        teams.home_abbr,
        board.score.home,
        teams.away_abbr,
        board.score.away,
        board.quarter_label,
        board.clock_label,
        board.situation.cyan()
    )?;
    Ok(())
}

pub fn render_events<'a, W: Write + ?Sized>(
    out: &mut W,
    session: &GameSession,
    events: impl IntoIterator<Item = &'a EngineEvent>,
) -> Result<()> {
    for event in events {
        match event {
            EngineEvent::Banner(banner) => render_banner(out, banner)?,
            EngineEvent::Log(entry) => {
                writeln!(out, "{}  {}", entry.meta.dimmed(), entry.text)?;
            }
            EngineEvent::Snapshot(board) => render_scoreboard(out, board, session)?,
        }
    }
    Ok(())
}

/// Read one trimmed line after printing `label`; `None` at end of input.
fn prompt<R: BufRead, W: Write + ?Sized>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Terminal game loop. Returns when the player quits or input runs out.
pub fn run_interactive<R: BufRead, W: Write + ?Sized>(
    session: &mut GameSession,
    input: &mut R,
    out: &mut W,
    mut auto_dice: Option<DiceBag>,
) -> Result<()> {
    let intro = session.intro_events();
    render_events(out, session, &intro)?;

    loop {
        if session.state().is_final() {
            writeln!(out, "Game over. Type `new` to play again or `quit` to exit.")?;
            let Some(line) = prompt(input, out, "> ")? else {
                break;
            };
            match parse_command(&line) {
                Some(Command::NewGame) => {
                    let events = session.new_game();
                    render_events(out, session, &events)?;
                }
                Some(Command::Quit) => break,
                None => {}
            }
            continue;
        }

        writeln!(out, "{}", session.hint_line().italic())?;
        let state = session.state();
        if session.is_human_turn() && !state.expecting_chaos && state.pending_play_call.is_none()
        {
            let Some(line) = prompt(input, out, "call (run/pass/punt/fg)> ")? else {
                break;
            };
            match parse_command(&line) {
                Some(Command::Quit) => break,
                Some(Command::NewGame) => {
                    let events = session.new_game();
                    render_events(out, session, &events)?;
                    continue;
                }
                None => {}
            }
            let Ok(call) = line.parse::<PlayCall>() else {
                writeln!(out, "{}", format!("unknown play `{line}`").yellow())?;
                continue;
            };
            match session.select_play_call(call) {
                Ok(banner) => render_banner(out, &banner)?,
                Err(err) => writeln!(out, "{}", err.to_string().yellow())?,
            }
            continue;
        }

        let roll = if let Some(bag) = auto_dice.as_mut() {
            let roll = bag.roll();
            writeln!(
                out,
                "rolled d6={} d10={} d20={}",
                roll.d6.unwrap_or_default(),
                roll.d10.unwrap_or_default(),
                roll.d20.unwrap_or_default()
            )?;
            roll
        } else {
            let Some(line) = prompt(input, out, "dice (d6 d10 d20)> ")? else {
                break;
            };
            match parse_command(&line) {
                Some(Command::Quit) => break,
                Some(Command::NewGame) => {
                    let events = session.new_game();
                    render_events(out, session, &events)?;
                    continue;
                }
                None => parse_dice_line(&line),
            }
        };

        match session.resolve(&roll) {
            Ok(outcome) => render_events(out, session, &outcome.events)?,
            Err(err) => {
                let banner = Banner {
                    title: String::from("DICE NEEDED"),
                    subtitle: err.to_string(),
                    tone: Tone::Normal,
                };
                render_banner(out, &banner)?;
            }
        }
    }
    Ok(())
}
