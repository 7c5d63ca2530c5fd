//! `xcall run`: run the conformance harness and report per case.

use termcolor::Color;
use xcall_host::{CaseResult, Direction, HarnessError, Report, RunOptions};

use super::GlobalArgs;
use crate::output::{self, StyledOutput};

pub fn execute(global: &GlobalArgs, options: RunOptions) -> anyhow::Result<()> {
    let mut out = StyledOutput::new(output::resolve_color_choice(&global.color));
    let master = super::start(global)?;

    let report = xcall_host::run(&master, &options)?;
    if report.total() == 0 {
        out.warning("No cases selected.");
        out.newline();
        return Ok(());
    }

    for direction in [Direction::Forward, Direction::Reverse] {
        print_direction(&mut out, &report, direction);
    }
    print_failure_details(&mut out, &report);
    print_summary(&mut out, &report);

    if report.has_failures() {
        drop(master);
        std::process::exit(1);
    }
    Ok(())
}

fn print_direction(out: &mut StyledOutput, report: &Report, direction: Direction) {
    let results: Vec<&CaseResult> = report
        .results
        .iter()
        .filter(|r| r.direction == direction)
        .collect();
    if results.is_empty() {
        return;
    }

    out.newline();
    if results.iter().all(|r| r.passed()) {
        out.pass_badge();
    } else {
        out.fail_badge();
    }
    out.plain(&format!("  {}", direction));
    out.dim(&format!(" ({} cases)", results.len()));
    out.newline();

    for result in results {
        if result.passed() {
            out.write_styled("   ✓ ", Some(Color::Green), false);
            out.write_styled(&result.name, Some(Color::Green), false);
        } else {
            out.write_styled("   ✗ ", Some(Color::Red), true);
            out.write_styled(&result.name, Some(Color::Red), true);
        }
        out.newline();
    }
}

fn print_failure_details(out: &mut StyledOutput, report: &Report) {
    let mut first = true;
    for failure in report.failures() {
        if first {
            first = false;
            out.newline();
            out.dim("──────────────────────────────────────────");
            out.newline();
        }

        out.newline();
        out.write_styled("  ● ", Some(Color::Red), true);
        out.write_styled(failure.test(), Some(Color::Red), true);
        out.newline();

        match failure {
            HarnessError::Assertion {
                expected, actual, ..
            } => {
                out.plain("    ");
                out.write_styled(&format!("Expected: {}", expected), Some(Color::Green), false);
                out.newline();
                out.plain("    ");
                out.write_styled(&format!("Received: {}", actual), Some(Color::Red), false);
                out.newline();
            }
            HarnessError::Fault { source, .. } => {
                out.plain("    ");
                out.error("Fault: ");
                out.plain(&source.to_string());
                out.newline();
            }
        }
    }
}

fn print_summary(out: &mut StyledOutput, report: &Report) {
    out.newline();
    out.dim("──────────────────────────────────────────");
    out.newline();

    out.bold("Cases:  ");
    if report.failed() > 0 {
        out.error(&format!("{} failed", report.failed()));
        out.plain(", ");
    }
    if report.passed() > 0 {
        out.success(&format!("{} passed", report.passed()));
        out.plain(", ");
    }
    out.bold(&format!("{} total", report.total()));
    out.newline();

    out.bold("Time:   ");
    out.dim(&format!("{:.2}ms", report.duration().as_secs_f64() * 1000.0));
    out.newline();
}
