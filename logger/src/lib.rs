//! Default logging setup for the cutkit tools and tests.
//!
//! Every log line is prefixed with the time since [`setup`] was called and the resident and
//! peak memory of the process, which is the main thing to watch when enumerating cuts of large
//! graphs.
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

use std::{
    fmt,
    io::Write,
    sync::atomic::{AtomicUsize, Ordering},
    time::Instant,
};

/// Environment variable holding the `env_logger` filter, defaults to `info`.
pub const LOG_ENV: &str = "CUTKIT_LOG";

/// Environment variable controlling colored output (`auto`, `always` or `never`).
pub const LOG_STYLE_ENV: &str = "CUTKIT_LOG_STYLE";

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Bytes(usize);

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [(char, u32); 3] = [('K', 10), ('M', 20), ('G', 30)];
        if self.0 < 1000 {
            return write!(f, "{:5}B", self.0);
        }
        let (unit, shift) = UNITS
            .into_iter()
            .find(|&(_, shift)| (self.0 as u64) < 1000 << shift)
            .unwrap_or(UNITS[2]);
        write!(f, "{:5.1}{unit}", self.0 as f64 / (1u64 << shift) as f64)
    }
}

/// Resident memory of the process, either value is `None` where the platform does not report it.
struct MemoryUsage {
    resident: Option<Bytes>,
    peak: Option<Bytes>,
}

impl MemoryUsage {
    fn now() -> Self {
        Self {
            resident: resident_bytes().map(Bytes),
            peak: peak_bytes().map(Bytes),
        }
    }
}

#[cfg(all(unix, not(miri)))]
fn peak_bytes() -> Option<usize> {
    // SAFETY: rusage is plain old data so all zeros is valid
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    // SAFETY: getrusage only writes to the passed pointer, which is valid for writes
    if unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) } < 0 {
        return None;
    }
    let max_rss = usize::try_from(usage.ru_maxrss).ok()?;
    // Linux reports kilobytes, macOS reports bytes.
    Some(if cfg!(target_os = "macos") {
        max_rss
    } else {
        max_rss * 1024
    })
}

#[cfg(not(all(unix, not(miri))))]
fn peak_bytes() -> Option<usize> {
    None
}

#[cfg(all(target_os = "linux", not(miri)))]
fn resident_bytes() -> Option<usize> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let pages: usize = statm.split_ascii_whitespace().nth(1)?.parse().ok()?;
    // SAFETY: sysconf has no preconditions
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    Some(pages * usize::try_from(page_size).ok()?)
}

#[cfg(not(all(target_os = "linux", not(miri))))]
fn resident_bytes() -> Option<usize> {
    None
}

const ELAPSED_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));
const RESIDENT_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue)));
const PEAK_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));
const NEW_PEAK_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red)));
const TARGET_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Magenta)));

struct Styled<T>(anstyle::Style, T);

impl<T: fmt::Display> fmt::Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:#}", self.0, self.1, self.0)
    }
}

struct OrBlank(Option<Bytes>);

impl fmt::Display for OrBlank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(bytes) => fmt::Display::fmt(&bytes, f),
            None => f.write_str("     -"),
        }
    }
}

/// Installs the default logger writing to stderr.
///
/// The filter is read from `CUTKIT_LOG` and the color choice from `CUTKIT_LOG_STYLE`.
///
/// Panics if a logger is already installed.
pub fn setup() {
    let start_time = Instant::now();
    let seen_peak = AtomicUsize::new(peak_bytes().unwrap_or(0));

    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or(LOG_ENV, "info")
            .write_style(LOG_STYLE_ENV),
    )
    .format(move |buf, record| {
        let elapsed = format!("{:>9.2?}", start_time.elapsed());
        let MemoryUsage { resident, peak } = MemoryUsage::now();

        let new_peak = peak.is_some_and(|Bytes(peak)| {
            seen_peak.fetch_max(peak, Ordering::Relaxed) < peak
        });

        writeln!(
            buf,
            "{} {} {} {} {} {}",
            Styled(ELAPSED_STYLE, elapsed),
            Styled(RESIDENT_STYLE, OrBlank(resident)),
            Styled(
                if new_peak { NEW_PEAK_STYLE } else { PEAK_STYLE },
                OrBlank(peak)
            ),
            Styled(buf.default_level_style(record.level()), record.level()),
            Styled(TARGET_STYLE, record.target()),
            record.args(),
        )
    })
    .init();
}

/// Installs a logger suitable for unit and integration tests.
///
/// Output goes through the test harness capture and defaults to the `debug` level. Calling this
/// more than once, e.g. from several tests of the same binary, is fine.
pub fn setup_for_tests() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or(LOG_ENV, "debug")
            .write_style(LOG_STYLE_ENV),
    )
    .is_test(true)
    .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_amounts() {
        assert_eq!(Bytes(999).to_string(), "  999B");
        assert_eq!(Bytes(1000).to_string(), "  1.0K");
        assert_eq!(Bytes(3 << 20).to_string(), "  3.0M");
        assert_eq!(Bytes(5 << 30).to_string(), "  5.0G");
        assert_eq!(OrBlank(None).to_string(), "     -");
    }

    #[test]
    fn memory_is_reported_where_supported() {
        let usage = MemoryUsage::now();
        if cfg!(target_os = "linux") {
            assert!(usage.resident.is_some());
            assert!(usage.peak.is_some());
        }
    }
}
