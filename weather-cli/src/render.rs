use chrono::{DateTime, Local, Utc};
use weather_core::{ThemePreference, WeatherError, WeatherReading};

/// ANSI styling for one theme. Empty strings when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    title: &'static str,
    accent: &'static str,
    muted: &'static str,
    reset: &'static str,
}

impl Palette {
    pub fn for_theme(theme: ThemePreference, color: bool) -> Self {
        if !color {
            return Self { title: "", accent: "", muted: "", reset: "" };
        }

        match theme {
            ThemePreference::Dark => Self {
                title: "\x1b[1;97m",
                accent: "\x1b[96m",
                muted: "\x1b[37m",
                reset: "\x1b[0m",
            },
            ThemePreference::Light => Self {
                title: "\x1b[1;30m",
                accent: "\x1b[34m",
                muted: "\x1b[90m",
                reset: "\x1b[0m",
            },
        }
    }
}

/// Multi-line card for a reading, sun times shown in local time.
pub fn render_reading(reading: &WeatherReading, palette: Palette) -> String {
    let Palette { title, accent, muted, reset } = palette;

    let mut lines = vec![
        format!("{title}{}, {}{reset}", reading.location_name(), reading.country_code()),
        format!(
            "{accent}{}°C{reset}  {}",
            reading.temperature_c(),
            capitalize(reading.condition_description())
        ),
        format!("{muted}{}{reset}", reading.icon_url()),
        String::new(),
    ];

    let details = [
        ("Feels like", format!("{}°C", reading.feels_like_c())),
        ("Wind", format!("{} m/s", reading.wind_speed_mps())),
        ("Humidity", format!("{}%", reading.humidity_percent())),
        ("Sunrise", local_time(reading.sunrise())),
        ("Sunset", local_time(reading.sunset())),
    ];
    for (label, value) in details {
        lines.push(format!("{muted}{label:<11}{reset}{value}"));
    }

    lines.join("\n")
}

/// User-facing text that says which side the problem is on.
pub fn describe_error(err: &WeatherError) -> String {
    match err {
        WeatherError::InvalidQuery(msg) => format!("Input problem: {msg}"),
        WeatherError::NetworkFailure(msg) => {
            format!("Could not reach the weather service: {msg}")
        }
        WeatherError::UpstreamError { status, message } => {
            format!("The weather service returned an error ({status}): {message}")
        }
        WeatherError::MalformedResponse(msg) => {
            format!("The weather service returned bad data: {msg}")
        }
    }
}

fn local_time(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn capitalize(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISBON: &str = r#"{
        "name": "Lisbon",
        "sys": { "country": "PT", "sunrise": 1700000000, "sunset": 1700030000 },
        "main": { "temp": 18.4, "feels_like": 17.9, "humidity": 72 },
        "weather": [{ "description": "few clouds", "icon": "02d" }],
        "wind": { "speed": 5.2 }
    }"#;

    #[test]
    fn card_lists_every_field() {
        let reading = weather_core::parse_current_response(LISBON).expect("valid body");
        let card = render_reading(&reading, Palette::for_theme(ThemePreference::Light, false));

        assert!(card.starts_with("Lisbon, PT\n18.4°C  Few Clouds"));
        assert!(card.contains("https://openweathermap.org/img/wn/02d@4x.png"));
        assert!(card.contains("Feels like 17.9°C"));
        assert!(card.contains("Wind       5.2 m/s"));
        assert!(card.contains("Humidity   72%"));
        assert!(card.contains("Sunrise"));
        assert!(!card.contains("unknown"));
    }

    #[test]
    fn colored_card_wraps_title() {
        let reading = weather_core::parse_current_response(LISBON).expect("valid body");
        let card = render_reading(&reading, Palette::for_theme(ThemePreference::Dark, true));
        assert!(card.starts_with("\x1b[1;97mLisbon, PT\x1b[0m"));
    }

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(capitalize("clear sky"), "Clear Sky");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn plain_palette_has_no_escapes() {
        let p = Palette::for_theme(ThemePreference::Dark, false);
        assert_eq!(p, Palette::for_theme(ThemePreference::Light, false));
        assert_eq!(p.reset, "");
    }

    #[test]
    fn themes_use_different_colors() {
        let dark = Palette::for_theme(ThemePreference::Dark, true);
        let light = Palette::for_theme(ThemePreference::Light, true);
        assert_ne!(dark, light);
    }

    #[test]
    fn unknown_time_renders_placeholder() {
        assert_eq!(local_time(None), "unknown");
    }

    #[test]
    fn error_messages_name_the_category() {
        let input = describe_error(&WeatherError::InvalidQuery("city name must not be empty".into()));
        assert!(input.starts_with("Input problem"));

        let net = describe_error(&WeatherError::NetworkFailure("timed out".into()));
        assert!(net.starts_with("Could not reach"));

        let upstream = describe_error(&WeatherError::UpstreamError {
            status: 404,
            message: "city not found".into(),
        });
        assert!(upstream.contains("(404)"));
        assert!(upstream.contains("city not found"));

        let bad = describe_error(&WeatherError::MalformedResponse("missing field `temp`".into()));
        assert!(bad.contains("bad data"));
    }
}
