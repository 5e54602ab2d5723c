use chrono::{Local, NaiveDateTime, SecondsFormat, TimeZone, Timelike};

/// Source of the wall-clock time stamped into each header.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// How the header renders its timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2023-02-02 20:48:26.544420`; the fraction is dropped when it is exactly zero.
    #[default]
    Local,
    /// `2023-02-02T20:48:26.544420+01:00`, using the local UTC offset.
    Rfc3339,
}

impl TimestampFormat {
    pub fn render(&self, at: &NaiveDateTime) -> String {
        match self {
            TimestampFormat::Local => {
                let micros = at.nanosecond() % 1_000_000_000 / 1_000;
                if micros == 0 {
                    at.format("%Y-%m-%d %H:%M:%S").to_string()
                } else {
                    format!("{}.{:06}", at.format("%Y-%m-%d %H:%M:%S"), micros)
                }
            }
            TimestampFormat::Rfc3339 => match Local.from_local_datetime(at).earliest() {
                Some(local) => local.to_rfc3339_opts(SecondsFormat::Micros, false),
                // skipped by a DST transition; keep the naive reading
                None => at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 2, 2)
            .unwrap()
            .and_hms_micro_opt(20, 48, 26, micro)
            .unwrap()
    }

    #[test]
    fn test_local_format_with_fraction() {
        assert_eq!(
            TimestampFormat::Local.render(&at(544_420)),
            "2023-02-02 20:48:26.544420"
        );
        assert_eq!(
            TimestampFormat::Local.render(&at(7)),
            "2023-02-02 20:48:26.000007"
        );
    }

    #[test]
    fn test_local_format_drops_zero_fraction() {
        assert_eq!(TimestampFormat::Local.render(&at(0)), "2023-02-02 20:48:26");
    }

    #[test]
    fn test_rfc3339_keeps_date_and_time() {
        let rendered = TimestampFormat::Rfc3339.render(&at(544_420));
        assert!(rendered.starts_with("2023-02-02T20:48:26.544420"), "{rendered}");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(at(1));
        assert_eq!(clock.now(), at(1));
        assert_eq!((&clock).now(), at(1));
    }
}
