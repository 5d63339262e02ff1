use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use ornament_sim::countdown::next_occurrence;
use ornament_sim::{Countdown, CountdownDigits, CountdownDisplay, SceneConfig};

pub fn format_line(digits: &CountdownDigits) -> String {
    format!(
        "{} days {}:{}:{}",
        digits.days, digits.hours, digits.minutes, digits.seconds
    )
}

/// Writes one line per tick to any writer.
pub struct TerminalDisplay<W: Write> {
    out: W,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CountdownDisplay for TerminalDisplay<W> {
    fn show(&mut self, digits: &CountdownDigits) {
        if let Err(e) = writeln!(self.out, "{}", format_line(digits)).and_then(|()| self.out.flush()) {
            log::warn!("Failed to write countdown: {e}");
        }
    }
}

pub async fn run(month: Option<u32>, day: Option<u32>, once: bool, config: SceneConfig) -> anyhow::Result<()> {
    let month = month.unwrap_or(config.countdown.month);
    let day = day.unwrap_or(config.countdown.day);
    let target = next_occurrence(month, day, &Local::now())
        .with_context(|| format!("Cannot count down to month {month}, day {day}"))?;
    let countdown = Countdown::new(target);
    let mut display = TerminalDisplay::new(std::io::stdout());

    if once {
        countdown.tick(&Local::now(), &mut display);
        return Ok(());
    }

    println!("Counting down to {}", countdown.target().format("%Y-%m-%d %H:%M %Z"));
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately; the display starts one second in.
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                countdown.tick(&Local::now(), &mut display);
            }
            _ = &mut ctrl_c => {
                log::info!("Countdown stopped");
                break;
            }
        }
    }
    Ok(())
}
