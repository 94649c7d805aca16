//! Timer duration presets and the hours/minutes/seconds entry form

/// Largest value accepted in the hours field. Durations are elapsed time,
/// not a time of day, so this is not capped at 23.
pub const MAX_HOURS: u64 = 99;
pub const MAX_MINUTES: u64 = 59;
pub const MAX_SECONDS: u64 = 59;

const FIELD_WIDTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    FiveMinutes,
    FifteenMinutes,
    Pomodoro,
    OneHour,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::FiveMinutes,
        Preset::FifteenMinutes,
        Preset::Pomodoro,
        Preset::OneHour,
    ];

    pub fn minutes(self) -> u64 {
        match self {
            Preset::FiveMinutes => 5,
            Preset::FifteenMinutes => 15,
            Preset::Pomodoro => 25,
            Preset::OneHour => 60,
        }
    }

    pub fn seconds(self) -> u64 {
        self.minutes() * 60
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::FiveMinutes => "5min",
            Preset::FifteenMinutes => "15min",
            Preset::Pomodoro => "25min",
            Preset::OneHour => "1hr",
        }
    }

    /// Looks a preset up by its 1-based position in [`Preset::ALL`].
    pub fn from_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Hours,
    Minutes,
    Seconds,
}

impl Field {
    pub fn max(self) -> u64 {
        match self {
            Field::Hours => MAX_HOURS,
            Field::Minutes => MAX_MINUTES,
            Field::Seconds => MAX_SECONDS,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Field::Hours => Field::Minutes,
            Field::Minutes => Field::Seconds,
            Field::Seconds => Field::Hours,
        }
    }
}

/// Reads one form field as a number.
///
/// Non-digit characters are dropped, an empty field counts as zero and
/// anything above `max` (including values too large to parse) becomes `max`.
pub fn parse_field(input: &str, max: u64) -> u64 {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().map_or(max, |value| value.min(max))
}

/// The custom duration form: three short text fields edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomDuration {
    hours: String,
    minutes: String,
    seconds: String,
    focus: Field,
}

impl Default for CustomDuration {
    fn default() -> Self {
        Self::new("00", "25", "00")
    }
}

impl CustomDuration {
    pub fn new(hours: &str, minutes: &str, seconds: &str) -> Self {
        Self {
            hours: hours.to_string(),
            minutes: minutes.to_string(),
            seconds: seconds.to_string(),
            focus: Field::Hours,
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Hours => &self.hours,
            Field::Minutes => &self.minutes,
            Field::Seconds => &self.seconds,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Hours => &mut self.hours,
            Field::Minutes => &mut self.minutes,
            Field::Seconds => &mut self.seconds,
        }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Types one character into the focused field.
    ///
    /// Non-digits are ignored. A full field starts over with the new digit,
    /// and a value above the field's maximum is replaced by the maximum.
    pub fn push_char(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        let max = self.focus.max();
        let text = self.field_mut(self.focus);
        if text.len() >= FIELD_WIDTH {
            text.clear();
        }
        text.push(c);
        if parse_field(text, max) < text.parse::<u64>().unwrap_or(0) {
            *text = max.to_string();
        }
        text.truncate(FIELD_WIDTH);
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.field_mut(focus).pop();
    }

    /// Moves to the next field, zero-padding the one being left.
    pub fn focus_next(&mut self) {
        self.pad_field(self.focus);
        self.focus = self.focus.next();
    }

    fn pad_field(&mut self, field: Field) {
        let text = self.field_mut(field);
        let value = if text.is_empty() { "0" } else { text.as_str() };
        *text = format!("{:0>width$}", value, width = FIELD_WIDTH);
    }

    pub fn total_seconds(&self) -> u64 {
        parse_field(&self.hours, MAX_HOURS) * 3600
            + parse_field(&self.minutes, MAX_MINUTES) * 60
            + parse_field(&self.seconds, MAX_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_cover_the_fixed_set() {
        let minutes: Vec<u64> = Preset::ALL.iter().map(|p| p.minutes()).collect();
        assert_eq!(minutes, vec![5, 15, 25, 60]);
        assert_eq!(Preset::from_index(1), Some(Preset::FiveMinutes));
        assert_eq!(Preset::from_index(4), Some(Preset::OneHour));
        assert_eq!(Preset::from_index(0), None);
        assert_eq!(Preset::from_index(5), None);
    }

    #[test]
    fn parse_field_treats_garbage_as_zero_and_clamps() {
        assert_eq!(parse_field("", 59), 0);
        assert_eq!(parse_field("abc", 59), 0);
        assert_eq!(parse_field("4x2", 59), 42);
        assert_eq!(parse_field("75", 59), 59);
        assert_eq!(parse_field("150", MAX_HOURS), 99);
        assert_eq!(parse_field("99999999999999999999999", 59), 59);
    }

    #[test]
    fn custom_duration_combines_fields() {
        let custom = CustomDuration::new("02", "30", "00");
        assert_eq!(custom.total_seconds(), 9000);

        let custom = CustomDuration::new("", "1", "5");
        assert_eq!(custom.total_seconds(), 65);

        let custom = CustomDuration::new("120", "75", "60");
        assert_eq!(custom.total_seconds(), 99 * 3600 + 59 * 60 + 59);
    }

    #[test]
    fn typing_clamps_and_restarts_full_fields() {
        let mut custom = CustomDuration::new("", "", "");
        custom.focus_next();
        custom.push_char('7');
        custom.push_char('5');
        assert_eq!(custom.field(Field::Minutes), "59");

        custom.push_char('3');
        assert_eq!(custom.field(Field::Minutes), "3");

        custom.push_char('x');
        assert_eq!(custom.field(Field::Minutes), "3");
    }

    #[test]
    fn leaving_a_field_pads_it() {
        let mut custom = CustomDuration::new("", "5", "00");
        custom.focus_next();
        assert_eq!(custom.field(Field::Hours), "00");
        assert_eq!(custom.focus(), Field::Minutes);
        custom.focus_next();
        assert_eq!(custom.field(Field::Minutes), "05");
    }

    #[test]
    fn backspace_edits_focused_field_only() {
        let mut custom = CustomDuration::default();
        custom.backspace();
        assert_eq!(custom.field(Field::Hours), "0");
        assert_eq!(custom.field(Field::Minutes), "25");
    }
}
