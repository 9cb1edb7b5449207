//! Date helper functions

use chrono::{DateTime, Locale, Utc};
use chrono_tz::Tz;

use crate::config::SiteConfig;

/// Format a date in a timezone with localized month and weekday names
///
/// # Examples
/// ```ignore
/// format_localized(&date, "%-d %b %Y", chrono_tz::UTC, Locale::pt_BR) // -> "15 mar 2021"
/// ```
pub fn format_localized(date: &DateTime<Utc>, format: &str, tz: Tz, locale: Locale) -> String {
    date.with_timezone(&tz)
        .format_localized(format, locale)
        .to_string()
}

/// Publication date as shown on the feed and post header
pub fn publish_date(config: &SiteConfig, date: &DateTime<Utc>) -> String {
    format_localized(date, &config.date_format, config.tz(), config.chrono_locale())
}

/// "Edited at" stamp shown when a post was republished
pub fn edited_date(config: &SiteConfig, date: &DateTime<Utc>) -> String {
    format_localized(date, &config.edited_format, config.tz(), config.chrono_locale())
}

/// Format a date in ISO 8601 for `<time datetime>`
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 19, 15, 49, 0).unwrap()
    }

    #[test]
    fn test_publish_date_pt_br() {
        let config = SiteConfig::default();
        assert_eq!(publish_date(&config, &date()), "19 mar 2021");
    }

    #[test]
    fn test_edited_date_in_timezone() {
        let config = SiteConfig {
            timezone: "America/Sao_Paulo".to_string(),
            ..SiteConfig::default()
        };
        assert_eq!(edited_date(&config, &date()), "19 mar 2021, às 12:49");
    }

    #[test]
    fn test_english_locale() {
        let formatted = format_localized(&date(), "%B %-d, %Y", chrono_tz::UTC, Locale::en_US);
        assert_eq!(formatted, "March 19, 2021");
    }

    #[test]
    fn test_date_xml() {
        assert_eq!(date_xml(&date()), "2021-03-19T15:49:00+00:00");
    }
}
