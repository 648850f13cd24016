use core::fmt::Write;

use chrono::format::{Fixed, Item, Numeric, Pad, Parsed};
use chrono::{NaiveDateTime, NaiveTime};

use super::FormatError;

/// A compiled date pattern.
///
/// Supported letters: `yyyy` `yy` (year), `M` `MM` `MMM` `MMMM` (month),
/// `d` `dd` (day), `H` `HH` (hour of day), `h` `hh` (hour of half-day), `m`
/// `mm`, `s` `ss`, `a` (AM/PM marker), `E` `EEEE` (weekday). Text between
/// single quotes is literal, `''` is a quote. Any other non-letter character
/// is literal.
///
/// A pattern using `h` without `a` reads hours as before noon.
///
/// ```
/// use chrono::NaiveDate;
/// use jm_bind::format::DatePattern;
///
/// let pattern = DatePattern::compile("dd-MM-yyyy hh:mm:ss").unwrap();
/// let dt = NaiveDate::from_ymd_opt(2021, 11, 5).unwrap().and_hms_opt(2, 30, 0).unwrap();
///
/// assert_eq!(pattern.format(&dt).unwrap(), "05-11-2021 02:30:00");
/// assert_eq!(pattern.parse("05-11-2021 02:30:00").unwrap(), dt);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    items: Vec<Item<'static>>,
    has_time: bool,
    half_day_without_marker: bool,
}

impl DatePattern {
    pub fn compile(pattern: &str) -> Result<Self, FormatError> {
        let mut items = Vec::new();
        let mut literal = String::new();
        let mut has_date = false;
        let mut has_time = false;
        let mut has_half_day = false;
        let mut has_marker = false;

        let mut chars = pattern.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    literal.push('\'');
                    continue;
                }
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    if inner == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            literal.push('\'');
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    literal.push(inner);
                }
                if !closed {
                    return Err(FormatError::UnterminatedQuote(pattern.to_owned()));
                }
                continue;
            }

            if !ch.is_ascii_alphabetic() {
                literal.push(ch);
                continue;
            }

            let mut width = 1;
            while chars.peek() == Some(&ch) {
                chars.next();
                width += 1;
            }

            if !literal.is_empty() {
                items.push(Item::OwnedLiteral(core::mem::take(&mut literal).into_boxed_str()));
            }

            let pad = if width >= 2 { Pad::Zero } else { Pad::None };
            let item = match ch {
                'y' if width == 2 => Item::Numeric(Numeric::YearMod100, Pad::Zero),
                'y' => Item::Numeric(Numeric::Year, Pad::Zero),
                'M' if width == 3 => Item::Fixed(Fixed::ShortMonthName),
                'M' if width >= 4 => Item::Fixed(Fixed::LongMonthName),
                'M' => Item::Numeric(Numeric::Month, pad),
                'd' => Item::Numeric(Numeric::Day, pad),
                'E' if width >= 4 => Item::Fixed(Fixed::LongWeekdayName),
                'E' => Item::Fixed(Fixed::ShortWeekdayName),
                'H' => Item::Numeric(Numeric::Hour, pad),
                'h' => Item::Numeric(Numeric::Hour12, pad),
                'm' => Item::Numeric(Numeric::Minute, pad),
                's' => Item::Numeric(Numeric::Second, pad),
                'a' => Item::Fixed(Fixed::UpperAmPm),
                letter => {
                    return Err(FormatError::UnsupportedLetter {
                        pattern: pattern.to_owned(),
                        letter,
                    });
                }
            };

            match ch {
                'y' | 'M' | 'd' => has_date = true,
                'H' | 'm' | 's' => has_time = true,
                'h' => {
                    has_time = true;
                    has_half_day = true;
                }
                'a' => has_marker = true,
                _ => {}
            }
            items.push(item);
        }

        if !literal.is_empty() {
            items.push(Item::OwnedLiteral(literal.into_boxed_str()));
        }
        if !has_date {
            return Err(FormatError::MissingDate(pattern.to_owned()));
        }

        Ok(Self {
            source: pattern.to_owned(),
            items,
            has_time,
            half_day_without_marker: has_half_day && !has_marker,
        })
    }

    /// The pattern text this was compiled from.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn format(&self, value: &NaiveDateTime) -> Result<String, FormatError> {
        let mut out = String::new();
        write!(out, "{}", value.format_with_items(self.items.iter()))
            .map_err(|_| FormatError::Render(self.source.clone()))?;
        Ok(out)
    }

    pub fn parse(&self, text: &str) -> Result<NaiveDateTime, FormatError> {
        let error = |source| FormatError::Parse {
            text: text.to_owned(),
            pattern: self.source.clone(),
            source,
        };

        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, text, self.items.iter()).map_err(error)?;
        if self.half_day_without_marker {
            parsed.set_ampm(false).map_err(error)?;
        }

        let date = parsed.to_naive_date().map_err(error)?;
        let time = if self.has_time {
            parsed.to_naive_time().map_err(error)?
        } else {
            NaiveTime::MIN
        };
        Ok(NaiveDateTime::new(date, time))
    }
}
