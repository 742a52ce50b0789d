use crate::output::print_json;
use anyhow::Context;
use chrono::NaiveDateTime;
use humanos_core::catalog::fetch_routines;
use humanos_core::routine::find;
use humanos_core::runner::{RoutineRunner, RunOutcome};
use humanos_core::status;
use humanos_core::types::RoutineStatus;
use humanos_core::HumanosError;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::Path;

#[derive(Serialize)]
struct RunOutput<'a> {
    id: &'a str,
    outcome: &'static str,
    status: Option<RoutineStatus>,
}

pub fn run(root: &Path, now: NaiveDateTime, id: &str, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root);
    let source = super::http_source()?;
    let today = now.date();

    let routines = fetch_routines(&store, &source, today, false);
    let routine = find(&routines, id).ok_or_else(|| HumanosError::RoutineNotFound(id.into()))?;

    status::reset_if_new_day(&store, today).context("failed to start a new day")?;

    let mut runner = RoutineRunner::new(routine);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    // Prompts go to stderr in JSON mode so stdout stays parseable.
    let outcome = if json {
        drive(&mut runner, stdin.lock(), std::io::stderr().lock())?
    } else {
        drive(&mut runner, stdin.lock(), stdout.lock())?
    };

    if let Some(new_status) = outcome.status() {
        status::set_status(&store, id, new_status, today, today)
            .with_context(|| format!("failed to record status of '{id}'"))?;
    }

    if json {
        return print_json(&RunOutput {
            id,
            outcome: outcome_name(outcome),
            status: outcome.status(),
        });
    }

    match outcome {
        RunOutcome::Completed => println!("Completed {}", routine.name),
        RunOutcome::Partial => println!("{} marked in progress", routine.name),
        RunOutcome::Abandoned => println!("Left {} unchanged", routine.name),
    }
    Ok(())
}

fn outcome_name(outcome: RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Completed => "completed",
        RunOutcome::Partial => "partial",
        RunOutcome::Abandoned => "abandoned",
    }
}

/// Feed line commands to the runner until it finishes or input ends.
///
/// Empty line or `n` advances, `s` skips, `b` goes back, `q` or end of
/// input exits.
fn drive<R: BufRead, W: Write>(
    runner: &mut RoutineRunner<'_>,
    input: R,
    mut out: W,
) -> anyhow::Result<RunOutcome> {
    writeln!(out, "{}", runner.routine().label())?;
    let mut lines = input.lines();

    loop {
        if let Some(outcome) = runner.outcome() {
            return Ok(outcome);
        }
        show_step(runner, &mut out)?;

        let line = match lines.next() {
            Some(line) => line.context("failed to read input")?,
            None => return Ok(runner.exit()),
        };
        match line.trim() {
            "" | "n" => {
                runner.advance();
            }
            "s" => {
                runner.skip();
            }
            "b" => runner.back(),
            "q" => return Ok(runner.exit()),
            other => writeln!(out, "unknown command '{other}' (n, s, b, q)")?,
        }
    }
}

fn show_step<W: Write>(runner: &RoutineRunner<'_>, out: &mut W) -> anyhow::Result<()> {
    let Some(step) = runner.current_step() else {
        return Ok(());
    };
    writeln!(
        out,
        "Step {} of {}: {}",
        runner.index() + 1,
        runner.total_steps(),
        step.text
    )?;
    if let Some(intention) = &step.intention {
        writeln!(out, "  intention: {intention}")?;
    }
    if let Some(minutes) = step.duration {
        writeln!(out, "  {minutes} min")?;
    }
    write!(out, "[Enter/n] next  [s] skip  [b] back  [q] quit > ")?;
    out.flush()?;
    Ok(())
}
