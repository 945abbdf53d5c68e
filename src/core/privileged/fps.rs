//! Frame-rate analysis over the privileged command channel.
//!
//! Two-step protocol: find the foreground package in a window-state
//! dump, then count its completed frames inside the last second of the
//! compositor's frame-timing dump. Both parsers are pure functions over
//! captured lines so they can be exercised with literal fixture text.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::channel::PrivilegedChannel;
use super::tier::TierProbe;

/// Focused-app record in the window-state dump:
/// `ActivityRecord{<hash> <user> <package>/<activity> ...`.
static ACTIVITY_RECORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ActivityRecord\{\S+ \S+ ([A-Za-z][A-Za-z0-9_.]*)/").unwrap());

const WINDOW_DUMP_COMMAND: &str = "dumpsys activity activities";

/// Marker of the line naming the currently resumed (foreground)
/// activity. Matches both `topResumedActivity=` and `ResumedActivity:`.
const FOREGROUND_MARKER: &str = "ResumedActivity";

/// CSV header of the frame-timing table.
const FRAME_HEADER_PREFIX: &str = "Flags,";
/// Marker delimiting the frame-timing table.
const FRAME_SECTION_MARKER: &str = "---PROFILEDATA---";
/// Column carrying the frame's completion timestamp (nanoseconds,
/// CLOCK_MONOTONIC domain).
const FRAME_COMPLETED_COLUMN: &str = "FrameCompleted";

const WINDOW_NANOS: i64 = 1_000_000_000;

/// Frames-per-second estimator for the foreground application.
pub struct FrameRateAnalyzer<'a, P: TierProbe> {
    channel: &'a PrivilegedChannel<P>,
}

impl<'a, P: TierProbe> FrameRateAnalyzer<'a, P> {
    pub fn new(channel: &'a PrivilegedChannel<P>) -> Self {
        Self { channel }
    }

    /// Frames the foreground app presented in the last second.
    /// `0` means "could not be determined".
    pub fn current_fps(&self) -> u32 {
        let dump = self.channel.execute(WINDOW_DUMP_COMMAND);
        let Some(package) = foreground_package(&dump.lines) else {
            debug!("no foreground activity record found");
            return 0;
        };
        self.fps_for_package(&package)
    }

    /// Frame count for an explicit package, skipping foreground
    /// detection.
    pub fn fps_for_package(&self, package: &str) -> u32 {
        let dump = self
            .channel
            .execute(&format!("dumpsys gfxinfo {package} framestats"));
        if dump.is_empty() {
            return 0;
        }
        frames_in_window(&dump.lines, monotonic_nanos(), WINDOW_NANOS)
    }
}

/// Package-name token of the foreground activity record, or `None`.
///
/// Marker lines take priority; dumps that carry activity records
/// without a resumed-activity marker fall back to the first record.
pub fn foreground_package(lines: &[String]) -> Option<String> {
    let capture = |line: &String| ACTIVITY_RECORD.captures(line).map(|c| c[1].to_string());
    lines
        .iter()
        .filter(|line| line.contains(FOREGROUND_MARKER))
        .find_map(capture)
        .or_else(|| lines.iter().find_map(capture))
}

/// Count frame rows completed within `window_nanos` of `now_nanos`.
///
/// The dump carries a CSV table delimited by `---PROFILEDATA---`: a
/// header line naming the columns, then one row per frame. Rows with a
/// malformed timestamp are skipped; a structurally short row or the
/// closing marker ends the table. Timestamps and `now_nanos` must come
/// from the same monotonic clock domain.
pub fn frames_in_window(lines: &[String], now_nanos: i64, window_nanos: i64) -> u32 {
    let mut completed_column: Option<usize> = None;
    let mut count = 0u32;

    for line in lines {
        let line = line.trim();

        match completed_column {
            None => {
                if line.starts_with(FRAME_HEADER_PREFIX) {
                    let column = line
                        .split(',')
                        .position(|field| field.trim() == FRAME_COMPLETED_COLUMN);
                    match column {
                        Some(index) => completed_column = Some(index),
                        // header without the column: format we don't know
                        None => return 0,
                    }
                }
            }
            Some(column) => {
                if line.starts_with(FRAME_SECTION_MARKER) {
                    break;
                }
                let fields: Vec<&str> = line.split(',').collect();
                if fields.len() <= column {
                    break;
                }
                match fields[column].trim().parse::<i64>() {
                    Ok(completed) if now_nanos - completed <= window_nanos => count += 1,
                    Ok(_) => {}
                    Err(_) => continue,
                }
            }
        }
    }

    count
}

#[cfg(unix)]
fn monotonic_nanos() -> i64 {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: ts is a valid out-pointer for the duration of the call.
    unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
    ts.tv_sec as i64 * 1_000_000_000 + ts.tv_nsec as i64
}

#[cfg(not(unix))]
fn monotonic_nanos() -> i64 {
    use std::time::Instant;
    static START: Lazy<Instant> = Lazy::new(Instant::now);
    START.elapsed().as_nanos() as i64
}
