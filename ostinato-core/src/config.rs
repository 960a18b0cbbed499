use std::path::PathBuf;

use serde::Deserialize;

use ostinato_types::{ArpStyle, RetrigMode, Scale};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    bpm: Option<u16>,
    channel: Option<u8>,
    arp_style: Option<String>,
    arp_speed: Option<u8>,
    arp_octaves: Option<u8>,
    arp_times: Option<u8>,
    arp_retrig: Option<String>,
    euclid_hits: Option<u8>,
    euclid_rotation: Option<u8>,
    euclid_note_length: Option<u8>,
    euclid_base_pitch: Option<u8>,
    euclid_pitch_length: Option<u8>,
    euclid_scale: Option<String>,
}

/// Startup defaults for the engines, after merging the embedded config with
/// the user's override file.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineDefaults {
    pub bpm: u16,
    pub channel: u8,
    pub arp_style: ArpStyle,
    pub arp_speed: u8,
    pub arp_octaves: u8,
    pub arp_times: u8,
    pub arp_retrig: RetrigMode,
    pub euclid_hits: u8,
    pub euclid_rotation: u8,
    pub euclid_note_length: u8,
    pub euclid_base_pitch: u8,
    pub euclid_pitch_length: u8,
    pub euclid_scale: Scale,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            bpm: 120,
            channel: 0,
            arp_style: ArpStyle::Up,
            arp_speed: 2,
            arp_octaves: 0,
            arp_times: 0,
            arp_retrig: RetrigMode::Off,
            euclid_hits: 4,
            euclid_rotation: 0,
            euclid_note_length: 2,
            euclid_base_pitch: 48,
            euclid_pitch_length: 4,
            euclid_scale: Scale::Ionian,
        }
    }
}

pub struct Config {
    defaults: DefaultsConfig,
}

impl Config {
    pub fn load() -> Self {
        let user = user_config_path().and_then(|path| {
            if !path.exists() {
                return None;
            }
            match std::fs::read_to_string(&path) {
                Ok(contents) => Some((path, contents)),
                Err(e) => {
                    log::warn!(target: "config", "could not read config {}: {}", path.display(), e);
                    None
                }
            }
        });
        match user {
            Some((path, contents)) => Self::from_sources(DEFAULT_CONFIG, Some((&path, &contents))),
            None => Self::from_sources(DEFAULT_CONFIG, None),
        }
    }

    fn from_sources(base: &str, user: Option<(&PathBuf, &str)>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(base).expect("Failed to parse embedded config.toml");

        if let Some((path, contents)) = user {
            match toml::from_str::<ConfigFile>(contents) {
                Ok(user) => merge_defaults(&mut base.defaults, user.defaults),
                Err(e) => {
                    log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                }
            }
        }

        Config {
            defaults: base.defaults,
        }
    }

    pub fn defaults(&self) -> EngineDefaults {
        let fallback = EngineDefaults::default();
        EngineDefaults {
            bpm: self.defaults.bpm.unwrap_or(fallback.bpm),
            channel: self.defaults.channel.unwrap_or(fallback.channel).min(15),
            arp_style: self
                .defaults
                .arp_style
                .as_deref()
                .and_then(parse_style)
                .unwrap_or(fallback.arp_style),
            arp_speed: self.defaults.arp_speed.unwrap_or(fallback.arp_speed).max(1),
            arp_octaves: self.defaults.arp_octaves.unwrap_or(fallback.arp_octaves),
            arp_times: self.defaults.arp_times.unwrap_or(fallback.arp_times),
            arp_retrig: self
                .defaults
                .arp_retrig
                .as_deref()
                .and_then(parse_retrig)
                .unwrap_or(fallback.arp_retrig),
            euclid_hits: self.defaults.euclid_hits.unwrap_or(fallback.euclid_hits),
            euclid_rotation: self
                .defaults
                .euclid_rotation
                .unwrap_or(fallback.euclid_rotation),
            euclid_note_length: self
                .defaults
                .euclid_note_length
                .unwrap_or(fallback.euclid_note_length),
            euclid_base_pitch: self
                .defaults
                .euclid_base_pitch
                .unwrap_or(fallback.euclid_base_pitch)
                .min(127),
            euclid_pitch_length: self
                .defaults
                .euclid_pitch_length
                .unwrap_or(fallback.euclid_pitch_length),
            euclid_scale: self
                .defaults
                .euclid_scale
                .as_deref()
                .and_then(parse_scale)
                .unwrap_or(fallback.euclid_scale),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ostinato").join("config.toml"))
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.bpm.is_some() {
        base.bpm = user.bpm;
    }
    if user.channel.is_some() {
        base.channel = user.channel;
    }
    if user.arp_style.is_some() {
        base.arp_style = user.arp_style;
    }
    if user.arp_speed.is_some() {
        base.arp_speed = user.arp_speed;
    }
    if user.arp_octaves.is_some() {
        base.arp_octaves = user.arp_octaves;
    }
    if user.arp_times.is_some() {
        base.arp_times = user.arp_times;
    }
    if user.arp_retrig.is_some() {
        base.arp_retrig = user.arp_retrig;
    }
    if user.euclid_hits.is_some() {
        base.euclid_hits = user.euclid_hits;
    }
    if user.euclid_rotation.is_some() {
        base.euclid_rotation = user.euclid_rotation;
    }
    if user.euclid_note_length.is_some() {
        base.euclid_note_length = user.euclid_note_length;
    }
    if user.euclid_base_pitch.is_some() {
        base.euclid_base_pitch = user.euclid_base_pitch;
    }
    if user.euclid_pitch_length.is_some() {
        base.euclid_pitch_length = user.euclid_pitch_length;
    }
    if user.euclid_scale.is_some() {
        base.euclid_scale = user.euclid_scale;
    }
}

fn parse_style(s: &str) -> Option<ArpStyle> {
    ArpStyle::ALL
        .into_iter()
        .find(|style| style.name().eq_ignore_ascii_case(s))
}

fn parse_retrig(s: &str) -> Option<RetrigMode> {
    RetrigMode::ALL
        .into_iter()
        .find(|mode| mode.name().eq_ignore_ascii_case(s))
}

fn parse_scale(s: &str) -> Option<Scale> {
    Scale::ALL
        .into_iter()
        .find(|scale| scale.name().eq_ignore_ascii_case(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_fallback_defaults() {
        let config = Config::from_sources(DEFAULT_CONFIG, None);
        assert_eq!(config.defaults(), EngineDefaults::default());
    }

    #[test]
    fn user_config_overrides_per_field() {
        let user = "[defaults]\nbpm = 90\narp_style = \"Converge\"\n";
        let path = PathBuf::from("user.toml");
        let config = Config::from_sources(DEFAULT_CONFIG, Some((&path, user)));
        let defaults = config.defaults();
        assert_eq!(defaults.bpm, 90);
        assert_eq!(defaults.arp_style, ArpStyle::Converge);
        // untouched fields keep the embedded values
        assert_eq!(defaults.euclid_hits, 4);
        assert_eq!(defaults.euclid_scale, Scale::Ionian);
    }

    #[test]
    fn malformed_user_config_is_ignored() {
        let path = PathBuf::from("user.toml");
        let config = Config::from_sources(DEFAULT_CONFIG, Some((&path, "not toml ][")));
        assert_eq!(config.defaults(), EngineDefaults::default());
    }

    #[test]
    fn unknown_names_fall_back() {
        let user = "[defaults]\narp_style = \"Sideways\"\neuclid_scale = \"Klingon\"\n";
        let path = PathBuf::from("user.toml");
        let config = Config::from_sources(DEFAULT_CONFIG, Some((&path, user)));
        assert_eq!(config.defaults().arp_style, ArpStyle::Up);
        assert_eq!(config.defaults().euclid_scale, Scale::Ionian);
    }

    #[test]
    fn parse_style_names() {
        assert_eq!(parse_style("Up"), Some(ArpStyle::Up));
        assert_eq!(parse_style("down"), Some(ArpStyle::Down));
        assert_eq!(parse_style("Con & Div"), Some(ArpStyle::ConAndDiverge));
        assert_eq!(parse_style("nope"), None);
    }

    #[test]
    fn parse_scale_names() {
        assert_eq!(parse_scale("Blues"), Some(Scale::Blues));
        assert_eq!(parse_scale("minor pentatonic"), Some(Scale::MinorPentatonic));
        assert_eq!(parse_scale("X"), None);
    }

    #[test]
    fn out_of_range_channel_clamped() {
        let user = "[defaults]\nchannel = 99\n";
        let path = PathBuf::from("user.toml");
        let config = Config::from_sources(DEFAULT_CONFIG, Some((&path, user)));
        assert_eq!(config.defaults().channel, 15);
    }

    #[test]
    fn speed_floor_is_one() {
        let user = "[defaults]\narp_speed = 0\n";
        let path = PathBuf::from("user.toml");
        let config = Config::from_sources(DEFAULT_CONFIG, Some((&path, user)));
        assert_eq!(config.defaults().arp_speed, 1);
    }
}
