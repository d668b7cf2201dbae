use crate::locale::Language;
use crate::settings::{DateOrder, DisplaySettings};

/// The wall-clock reading a frame is drawn from. Replaced wholesale on every tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub hour: u8,
    pub minute: u8,
    pub day: u8,
    /// Zero-based: January is 0.
    pub month: u8,
    pub is_24h: bool,
}

impl ClockSnapshot {
    pub fn from_date_time(time: time::OffsetDateTime, is_24h: bool) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
            day: time.day(),
            month: time.month() - 1,
            is_24h,
        }
    }

    /// Read the host clock, in local time where the offset can be determined.
    pub fn now(is_24h: bool) -> Self {
        let now = time::OffsetDateTime::try_now_local()
            .unwrap_or_else(|_| time::OffsetDateTime::now_utc());
        Self::from_date_time(now, is_24h)
    }
}

/// `HH:MM` on a 24-hour clock, `H:MM` on a 12-hour clock.
pub fn compose_time_text(snapshot: &ClockSnapshot) -> String {
    let mut text = if snapshot.is_24h {
        format!("{:02}:{:02}", snapshot.hour, snapshot.minute)
    } else {
        let hour = match snapshot.hour % 12 {
            0 => 12,
            hour => hour,
        };
        format!("{:02}:{:02}", hour, snapshot.minute)
    };

    if !snapshot.is_24h && (text.starts_with('0') || text.starts_with(' ')) {
        text.remove(0);
    }

    text
}

/// The date line, e.g. `January 3`, `3 janvier` or, in Catalan, `3 d'abril` / `3 de gener`.
pub fn compose_date_text(snapshot: &ClockSnapshot, settings: &DisplaySettings) -> String {
    let month = settings
        .language
        .month_name(snapshot.month)
        .unwrap_or_default();

    match settings.date_order {
        DateOrder::MonthThenDay => format!("{} {}", month, snapshot.day),
        DateOrder::DayThenMonth => {
            let connective = if settings.language == Language::Catalan {
                if month.starts_with(|c: char| "aeiou".contains(c)) {
                    "d'"
                } else {
                    "de "
                }
            } else {
                ""
            };
            format!("{} {}{}", snapshot.day, connective, month)
        }
    }
}
