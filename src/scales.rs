// Continuous scales mapping data values to pixels, plus tick generation
// for the two chart axes.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// A zero-width domain maps everything to the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round tick values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if count == 0 || hi == lo {
            return vec![lo];
        }
        let step = tick_step(lo, hi, count);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

// 1, 2 or 5 times a power of ten, whichever lands closest to `count` ticks.
fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Square-root scale: equal steps in the output correspond to equal steps
/// in the *area* of a circle with that radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    inner: LinearScale,
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new((signed_sqrt(domain.0), signed_sqrt(domain.1)), range),
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        self.inner.apply(signed_sqrt(value))
    }
}

fn signed_sqrt(v: f64) -> f64 {
    v.signum() * v.abs().sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickInterval {
    Seconds(i64),
    Months(u32),
}

const HOUR: i64 = 3600;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

const TIME_INTERVALS: [TickInterval; 11] = [
    TickInterval::Seconds(HOUR),
    TickInterval::Seconds(3 * HOUR),
    TickInterval::Seconds(6 * HOUR),
    TickInterval::Seconds(12 * HOUR),
    TickInterval::Seconds(DAY),
    TickInterval::Seconds(2 * DAY),
    TickInterval::Seconds(WEEK),
    TickInterval::Months(1),
    TickInterval::Months(3),
    TickInterval::Months(12),
    TickInterval::Months(120),
];

impl TickInterval {
    fn approx_seconds(self) -> i64 {
        match self {
            TickInterval::Seconds(s) => s,
            TickInterval::Months(m) => m as i64 * 30 * DAY,
        }
    }

    fn label_format(self) -> &'static str {
        match self {
            TickInterval::Seconds(s) if s < DAY => "%H:%M",
            TickInterval::Seconds(_) => "%b %d",
            TickInterval::Months(m) if m < 12 => "%b %Y",
            TickInterval::Months(_) => "%Y",
        }
    }
}

/// Maps instants onto the horizontal axis. Labels and ticks are in UTC,
/// since commits in one dataset can carry different offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    inner: LinearScale,
}

impl TimeScale {
    pub fn new<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>, range: (f64, f64)) -> Self {
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        Self {
            start,
            end,
            inner: LinearScale::new(
                (start.timestamp_millis() as f64, end.timestamp_millis() as f64),
                range,
            ),
        }
    }

    pub fn apply<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> f64 {
        self.inner.apply(instant.timestamp_millis() as f64)
    }

    /// Calendar-aligned ticks with their labels, at most about `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<(DateTime<Utc>, String)> {
        let span = (self.end - self.start).num_seconds().max(0);
        let wanted = count.max(1) as i64;
        let interval = TIME_INTERVALS
            .iter()
            .copied()
            .find(|iv| span / iv.approx_seconds() < wanted)
            .unwrap_or(TickInterval::Months(120));

        let instants = match interval {
            TickInterval::Seconds(step) => {
                // Weeks start on Sunday; the epoch was a Thursday.
                let anchor = if step % WEEK == 0 { 3 * DAY } else { 0 };
                let from = self.start.timestamp() - anchor;
                let mut first = from.div_euclid(step) * step;
                if first < from {
                    first += step;
                }
                let first = first + anchor;
                (0..)
                    .map(|i| first + i * step)
                    .take_while(|t| *t <= self.end.timestamp())
                    .filter_map(|t| DateTime::from_timestamp(t, 0))
                    .collect::<Vec<_>>()
            }
            TickInterval::Months(step) => month_ticks(self.start, self.end, step),
        };

        let format = interval.label_format();
        instants
            .into_iter()
            .map(|t| (t, t.format(format).to_string()))
            .collect()
    }
}

fn month_ticks(start: DateTime<Utc>, end: DateTime<Utc>, step: u32) -> Vec<DateTime<Utc>> {
    // Months counted from year 0 so steps of 3/12/120 land on quarter,
    // year and decade boundaries.
    let index = start.year() as i64 * 12 + start.month0() as i64;
    let mut index = (index + step as i64 - 1).div_euclid(step as i64) * step as i64;
    let mut out = Vec::new();
    loop {
        let year = index.div_euclid(12) as i32;
        let month = index.rem_euclid(12) as u32 + 1;
        let Some(tick) = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc())
        else {
            break;
        };
        if tick > end {
            break;
        }
        if tick >= start {
            out.push(tick);
        }
        index += step as i64;
    }
    out
}
