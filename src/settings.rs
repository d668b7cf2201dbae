use tracing::{debug, info};

use crate::locale::Language;

/// Order of the day number and month name in the date line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DateOrder {
    MonthThenDay = 0,
    DayThenMonth = 1,
}

impl DateOrder {
    pub fn from_digit(ch: u8) -> Option<Self> {
        match ch {
            b'0' => Some(Self::MonthThenDay),
            b'1' => Some(Self::DayThenMonth),
            _ => None,
        }
    }
}

impl Default for DateOrder {
    fn default() -> Self {
        Self::MonthThenDay
    }
}

/// The user-adjustable display parameters. Always renderable; the defaults are used until (and
/// unless) the settings service answers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplaySettings {
    pub invert_screen: bool,
    pub language: Language,
    pub date_order: DateOrder,
}

/// The positional settings string from the service, e.g. `b"141"`.
///
/// Read like a C string: anything from the first NUL byte on is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawSettingsPayload(Vec<u8>);

impl RawSettingsPayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let mut bytes = bytes.into();
        if let Some(nul) = bytes.iter().position(|&b| b == 0) {
            bytes.truncate(nul);
        }
        Self(bytes)
    }

    pub fn field(&self, position: usize) -> Option<u8> {
        self.0.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RawSettingsPayload {
    fn from(input: &str) -> Self {
        Self::new(input.as_bytes())
    }
}

/// What happened to a single positional field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldOutcome {
    Applied,
    /// The field was present but asks for nothing (e.g. `'0'` for the inversion flag).
    Unchanged,
    Absent,
    Malformed(u8),
}

/// Per-field result of [`DisplaySettings::apply`], in payload order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ApplyReport {
    pub invert_screen: FieldOutcome,
    pub language: FieldOutcome,
    pub date_order: FieldOutcome,
}

impl ApplyReport {
    pub fn any_applied(&self) -> bool {
        [self.invert_screen, self.language, self.date_order]
            .iter()
            .any(|outcome| *outcome == FieldOutcome::Applied)
    }
}

impl DisplaySettings {
    /// Apply each field of the payload independently. Fields that are missing or invalid leave
    /// the current value alone; they are never reported as errors.
    ///
    /// Inversion is one-way: a payload can switch it on but nothing switches it back off.
    pub fn apply(&mut self, payload: &RawSettingsPayload) -> ApplyReport {
        let invert_screen = match payload.field(0) {
            Some(b'1') => {
                self.invert_screen = true;
                FieldOutcome::Applied
            }
            Some(_) => FieldOutcome::Unchanged,
            None => FieldOutcome::Absent,
        };

        let language = match payload.field(1) {
            Some(ch) => match Language::from_digit(ch) {
                Some(language) => {
                    self.language = language;
                    FieldOutcome::Applied
                }
                None => FieldOutcome::Malformed(ch),
            },
            None => FieldOutcome::Absent,
        };

        let date_order = match payload.field(2) {
            Some(ch) => match DateOrder::from_digit(ch) {
                Some(date_order) => {
                    self.date_order = date_order;
                    FieldOutcome::Applied
                }
                None => FieldOutcome::Malformed(ch),
            },
            None => FieldOutcome::Absent,
        };

        let report = ApplyReport {
            invert_screen,
            language,
            date_order,
        };

        if report.any_applied() {
            info!(settings = ?self, "applied remote settings");
        }
        debug!(?report, "settings payload processed");

        report
    }
}
