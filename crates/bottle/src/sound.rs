use serde::{Deserialize, Deserializer, Serialize};
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SoundError {
    #[error("Sound output failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Sound device unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SoundSettings {
    pub muted: bool,
    #[serde(deserialize_with = "deserialize_volume")]
    pub volume: f64,
    pub bell: bool,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: 1.0,
            bell: true,
        }
    }
}

fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}

fn deserialize_volume<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_volume)
}

impl SoundSettings {
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = clamp_volume(volume);
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn audible(&self) -> bool {
        !self.muted && self.volume > 0.0
    }
}

/// Receives the spin sound cues. Callers log failures and carry on.
pub trait SoundSink {
    fn spin_started(&mut self, volume: f64) -> Result<(), SoundError>;
    fn spin_finished(&mut self) -> Result<(), SoundError>;
}

impl<T: SoundSink + ?Sized> SoundSink for Box<T> {
    fn spin_started(&mut self, volume: f64) -> Result<(), SoundError> {
        (**self).spin_started(volume)
    }

    fn spin_finished(&mut self) -> Result<(), SoundError> {
        (**self).spin_finished()
    }
}

#[derive(Debug, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn spin_started(&mut self, _volume: f64) -> Result<(), SoundError> {
        Ok(())
    }

    fn spin_finished(&mut self) -> Result<(), SoundError> {
        Ok(())
    }
}

/// Rings the terminal bell once per spin.
pub struct Bell<W: Write> {
    out: W,
    playing: bool,
}

impl Bell<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> Bell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            playing: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SoundSink for Bell<W> {
    fn spin_started(&mut self, _volume: f64) -> Result<(), SoundError> {
        if self.playing {
            return Ok(());
        }
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        self.playing = true;
        Ok(())
    }

    fn spin_finished(&mut self) -> Result<(), SoundError> {
        self.playing = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_is_clamped() {
        let mut settings = SoundSettings::default();
        settings.set_volume(3.0);
        assert_eq!(settings.volume, 1.0);
        settings.set_volume(-1.0);
        assert_eq!(settings.volume, 0.0);
        assert!(!settings.audible());
        settings.set_volume(f64::NAN);
        assert_eq!(settings.volume, 0.0);
    }

    #[test]
    fn test_deserialized_volume_is_clamped() {
        let loud: SoundSettings = serde_json::from_str(r#"{"volume": 5.0}"#).unwrap();
        assert_eq!(loud.volume, 1.0);
        let negative: SoundSettings = serde_json::from_str(r#"{"volume": -0.5}"#).unwrap();
        assert_eq!(negative.volume, 0.0);
        assert!(!negative.audible());
    }

    #[test]
    fn test_toggle_mute() {
        let mut settings = SoundSettings::default();
        assert!(settings.audible());
        assert!(settings.toggle_mute());
        assert!(!settings.audible());
        assert!(!settings.toggle_mute());
    }

    #[test]
    fn test_bell_rings_once_per_spin() {
        let mut bell = Bell::new(Vec::new());
        bell.spin_started(1.0).unwrap();
        bell.spin_started(1.0).unwrap();
        bell.spin_finished().unwrap();
        bell.spin_started(1.0).unwrap();
        assert_eq!(bell.into_inner(), b"\x07\x07".to_vec());
    }
}
