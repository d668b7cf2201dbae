use std::convert::TryFrom;

/// Number of languages in the month table. The remote service selects one with a single digit,
/// so this can never exceed 10.
pub const NUM_LANGUAGES: usize = 10;

/// Supported languages, in wire order. The discriminant is the digit the settings service sends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Language {
    English = 0,
    French = 1,
    German = 2,
    Spanish = 3,
    Catalan = 4,
    Dutch = 5,
    Italian = 6,
    Turkish = 7,
    Portuguese = 8,
    Swedish = 9,
}

impl Language {
    pub const ALL: [Language; NUM_LANGUAGES] = [
        Self::English,
        Self::French,
        Self::German,
        Self::Spanish,
        Self::Catalan,
        Self::Dutch,
        Self::Italian,
        Self::Turkish,
        Self::Portuguese,
        Self::Swedish,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse the ASCII digit used by the settings service.
    pub fn from_digit(ch: u8) -> Option<Self> {
        if ch.is_ascii_digit() {
            Self::try_from(ch - b'0').ok()
        } else {
            None
        }
    }

    /// Month name for a zero-based month index, or `None` if the index is out of range.
    pub fn month_name(self, month: u8) -> Option<&'static str> {
        if month < 12 {
            MONTHS.get(12 * self.index() + month as usize).copied()
        } else {
            None
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl TryFrom<u8> for Language {
    type Error = &'static str;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or("Language index out of range.")
    }
}

// Strings must match the remote configuration service exactly, including the trailing space on
// the Turkish "Eylül ".
static MONTHS: [&str; 12 * NUM_LANGUAGES] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December", //
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre", //
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September", "Oktober",
    "November", "Dezember", //
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre", //
    "gener", "febrer", "març", "abril", "maig", "juny", "juliol", "agost", "setembre", "octubre",
    "novembre", "desembre", //
    "januari", "februari", "maart", "april", "mei", "juni", "juli", "augustus", "september",
    "oktober", "november", "december", //
    "Gennaio", "Febbraio", "Marzo", "Aprile", "Maggio", "Giugno", "Luglio", "Agosto", "Settembre",
    "Ottobre", "Novembre", "Dicembre", //
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül ", "Ekim",
    "Kasım", "Aralık", //
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro", //
    "Januari", "Februari", "Mars", "April", "Maj", "Juni", "Juli", "Augusti", "September",
    "Oktober", "November", "December",
];
