//! Non-speech audio event classification from per-window features.
//!
//! Windows are classified by loudness first, then by spectral centroid:
//!
//! | Condition                          | Event            | Confidence       |
//! |------------------------------------|------------------|------------------|
//! | rms below silence floor            | none             |                  |
//! | loud, high zero-crossing rate      | `loud_event`     | `min(rms*5, 1)`  |
//! | loud otherwise                     | `loud_sound`     | `min(rms*4, 1)`  |
//! | medium, centroid below low cutoff  | `low_frequency`  | 0.6              |
//! | medium, centroid above high cutoff | `high_frequency` | 0.7              |

use vfuse_models::{AudioEvent, AudioEventType, AudioWindowFeatures};

use crate::config::SignalConfig;

#[derive(Debug, Clone, Default)]
pub struct AudioEventClassifier {
    config: SignalConfig,
}

impl AudioEventClassifier {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Classify one analysis window, or `None` when nothing notable is heard.
    pub fn classify(&self, window: &AudioWindowFeatures) -> Option<AudioEvent> {
        let c = &self.config;
        let rms = window.rms;

        if !rms.is_finite() || rms < c.silence_rms {
            return None;
        }

        let (event_type, confidence, description) = if rms > c.loud_rms {
            if window.zero_crossing_rate > c.sharp_zero_crossing_rate {
                (AudioEventType::LoudEvent, (rms * 5.0).min(1.0), "Loud impact or alarm")
            } else {
                (AudioEventType::LoudSound, (rms * 4.0).min(1.0), "Loud continuous sound")
            }
        } else if window.spectral_centroid < c.low_frequency_centroid && rms > c.medium_rms {
            (AudioEventType::LowFrequency, 0.6, "Engine or mechanical sound")
        } else if window.spectral_centroid > c.high_frequency_centroid && rms > c.medium_rms {
            (AudioEventType::HighFrequency, 0.7, "Beep or electronic sound")
        } else {
            return None;
        };

        Some(AudioEvent::new(
            round_to(window.timestamp, 2),
            event_type,
            round_to(confidence, 2),
            description,
            round_to(rms, 3),
        ))
    }

    /// Classify a sequence of windows, keeping only notable ones.
    pub fn classify_all(&self, windows: &[AudioWindowFeatures]) -> Vec<AudioEvent> {
        windows.iter().filter_map(|w| self.classify(w)).collect()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(rms: f64, zcr: f64, centroid: f64) -> AudioWindowFeatures {
        AudioWindowFeatures {
            timestamp: 4.0,
            rms,
            zero_crossing_rate: zcr,
            spectral_centroid: centroid,
        }
    }

    #[test]
    fn test_silence() {
        let classifier = AudioEventClassifier::default();
        assert!(classifier.classify(&window(0.005, 0.5, 500.0)).is_none());
    }

    #[test]
    fn test_loud_event_vs_loud_sound() {
        let classifier = AudioEventClassifier::default();

        let sharp = classifier.classify(&window(0.15, 0.2, 2000.0)).unwrap();
        assert_eq!(sharp.event_type, AudioEventType::LoudEvent);
        assert_eq!(sharp.description, "Loud impact or alarm");
        assert!((sharp.confidence - 0.75).abs() < 1e-9);

        let steady = classifier.classify(&window(0.15, 0.1, 2000.0)).unwrap();
        assert_eq!(steady.event_type, AudioEventType::LoudSound);
        assert!((steady.confidence - 0.6).abs() < 1e-9);

        let very_loud = classifier.classify(&window(0.4, 0.3, 2000.0)).unwrap();
        assert_eq!(very_loud.confidence, 1.0);
    }

    #[test]
    fn test_frequency_bands() {
        let classifier = AudioEventClassifier::default();

        let hum = classifier.classify(&window(0.05, 0.01, 800.0)).unwrap();
        assert_eq!(hum.event_type, AudioEventType::LowFrequency);
        assert_eq!(hum.confidence, 0.6);

        let beep = classifier.classify(&window(0.05, 0.01, 3500.0)).unwrap();
        assert_eq!(beep.event_type, AudioEventType::HighFrequency);
        assert_eq!(beep.confidence, 0.7);

        // Mid-band or too quiet: nothing.
        assert!(classifier.classify(&window(0.05, 0.01, 2000.0)).is_none());
        assert!(classifier.classify(&window(0.02, 0.01, 800.0)).is_none());
    }

    #[test]
    fn test_rounding() {
        let classifier = AudioEventClassifier::default();
        let mut w = window(0.123456, 0.01, 500.0);
        w.timestamp = 7.4567;
        let event = classifier.classify(&w).unwrap();
        assert_eq!(event.timestamp, 7.46);
        assert_eq!(event.energy, 0.123);
        assert_eq!(event.confidence, 0.49);
    }

    #[test]
    fn test_classify_all_skips_silence() {
        let classifier = AudioEventClassifier::default();
        let events = classifier.classify_all(&[window(0.001, 0.0, 0.0), window(0.2, 0.3, 100.0)]);
        assert_eq!(events.len(), 1);
    }
}
