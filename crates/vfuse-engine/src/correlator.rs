//! Audio-visual correlation on a one-second bucket axis.
//!
//! Each filtered detection lands in bucket `floor(timestamp)`. For every
//! occupied bucket the correlator gathers the speech segments covering the
//! bucket start and the audio events within the event window, then checks
//! each visible class against the confirmation lexicon.
//!
//! Buckets without detections are never emitted, even when audio is
//! present there.

use std::collections::BTreeMap;

use tracing::debug;
use vfuse_models::{
    AudioBucket, AudioEvent, AudioSegment, AudioVisualFusion, Detection, TimelineEntry, Transcript,
    VisualBucket,
};

use crate::config::CorrelationConfig;
use crate::lexicon;

/// Builds the fused audio-visual timeline.
#[derive(Debug, Clone, Default)]
pub struct AudioVisualCorrelator {
    config: CorrelationConfig,
}

impl AudioVisualCorrelator {
    /// Create a correlator with the given configuration.
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CorrelationConfig::default())
    }

    /// Correlate filtered detections with the transcript and audio events.
    pub fn correlate(
        &self,
        detections: &[Detection],
        transcript: &Transcript,
        events: &[AudioEvent],
    ) -> AudioVisualFusion {
        let buckets = bucket_detections(detections);
        let mut timeline = Vec::with_capacity(buckets.len());
        let mut confirmations = 0usize;

        for (bucket, members) in buckets {
            let entry = self.correlate_bucket(bucket, &members, &transcript.segments, events);
            confirmations += entry.confirmed_by_audio.len();
            timeline.push(entry);
        }

        debug!(
            moments = timeline.len(),
            confirmations = confirmations,
            "Audio-visual timeline built"
        );

        AudioVisualFusion {
            timeline,
            full_transcript: transcript.full_text.clone(),
            total_speech_segments: transcript.segments.len(),
            total_audio_events: events.len(),
            audio_confirmations: confirmations,
        }
    }

    fn correlate_bucket(
        &self,
        bucket: u64,
        members: &[&Detection],
        segments: &[AudioSegment],
        events: &[AudioEvent],
    ) -> TimelineEntry {
        let bucket_start = bucket as f64;

        let speech: Vec<&AudioSegment> = segments
            .iter()
            .filter(|s| s.covers(bucket_start))
            .collect();
        let nearby_events: Vec<&AudioEvent> = events
            .iter()
            .filter(|e| (e.timestamp - bucket_start).abs() < self.config.event_window_secs)
            .collect();

        let mut objects: BTreeMap<String, usize> = BTreeMap::new();
        for detection in members {
            *objects.entry(detection.class_name.clone()).or_insert(0) += 1;
        }

        let confirmed_by_audio = objects
            .keys()
            .filter(|class_name| is_confirmed(class_name, &speech, &nearby_events))
            .cloned()
            .collect();

        TimelineEntry {
            timestamp: bucket,
            visual: VisualBucket {
                objects,
                total: members.len(),
            },
            audio: AudioBucket {
                speech: speech.first().map(|s| s.text.clone()),
                events: nearby_events.iter().map(|e| e.description.clone()).collect(),
            },
            confirmed_by_audio,
        }
    }
}

/// Group detections by whole-second bucket, ascending.
fn bucket_detections(detections: &[Detection]) -> BTreeMap<u64, Vec<&Detection>> {
    let mut buckets: BTreeMap<u64, Vec<&Detection>> = BTreeMap::new();
    for detection in detections {
        let bucket = detection.timestamp.max(0.0).floor() as u64;
        buckets.entry(bucket).or_default().push(detection);
    }
    buckets
}

fn is_confirmed(class_name: &str, speech: &[&AudioSegment], events: &[&AudioEvent]) -> bool {
    let Some(entry) = lexicon::lookup(class_name) else {
        return false;
    };

    speech.iter().any(|s| entry.matches_speech(&s.text))
        || events
            .iter()
            .any(|e| entry.matches_event(e.event_type.as_str(), &e.description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfuse_models::{AudioEventType, BoundingBox};

    fn det(timestamp: f64, class_name: &str) -> Detection {
        Detection::new(
            (timestamp * 10.0) as u64,
            timestamp,
            0,
            class_name,
            0.9,
            BoundingBox::new(0.0, 0.0, 50.0, 50.0),
        )
    }

    fn transcript(segments: Vec<AudioSegment>) -> Transcript {
        Transcript::from_segments("en", segments)
    }

    #[test]
    fn test_speech_keyword_confirms_class() {
        let correlator = AudioVisualCorrelator::with_defaults();
        let detections = vec![det(12.2, "car"), det(12.7, "car")];
        let speech = transcript(vec![AudioSegment::new(11.5, 13.0, "the car is driving", 0.9)]);

        let fusion = correlator.correlate(&detections, &speech, &[]);

        assert_eq!(fusion.timeline.len(), 1);
        let entry = &fusion.timeline[0];
        assert_eq!(entry.timestamp, 12);
        assert_eq!(entry.visual.objects.get("car"), Some(&2));
        assert_eq!(entry.visual.total, 2);
        assert_eq!(entry.audio.speech.as_deref(), Some("the car is driving"));
        assert_eq!(entry.confirmed_by_audio, vec!["car".to_string()]);
        assert_eq!(fusion.audio_confirmations, 1);
    }

    #[test]
    fn test_unconfirmable_class_counted_but_not_confirmed() {
        let correlator = AudioVisualCorrelator::with_defaults();
        let detections = vec![det(3.1, "bicycle"), det(3.4, "car")];
        let speech = transcript(vec![AudioSegment::new(2.0, 4.0, "a bicycle and a car", 0.9)]);

        let fusion = correlator.correlate(&detections, &speech, &[]);
        let entry = &fusion.timeline[0];
        assert_eq!(entry.visual.objects.get("bicycle"), Some(&1));
        assert!(!entry.is_confirmed("bicycle"));
        assert!(entry.is_confirmed("car"));
    }

    #[test]
    fn test_event_window_is_strict() {
        let correlator = AudioVisualCorrelator::with_defaults();
        let detections = vec![det(5.5, "door")];
        let inside = AudioEvent::new(5.6, AudioEventType::LoudEvent, 0.8, "Loud impact or alarm", 0.2);
        let outside = AudioEvent::new(6.0, AudioEventType::LoudEvent, 0.8, "Loud impact or alarm", 0.2);

        let fusion = correlator.correlate(&detections, &Transcript::default(), &[outside.clone()]);
        assert!(fusion.timeline[0].confirmed_by_audio.is_empty());
        assert!(fusion.timeline[0].audio.events.is_empty());

        let fusion = correlator.correlate(&detections, &Transcript::default(), &[inside, outside]);
        assert!(fusion.timeline[0].is_confirmed("door"));
        assert_eq!(fusion.timeline[0].audio.events.len(), 1);
        assert_eq!(fusion.total_audio_events, 2);
    }

    #[test]
    fn test_low_frequency_event_confirms_car() {
        let correlator = AudioVisualCorrelator::with_defaults();
        let detections = vec![det(8.0, "car")];
        let hum = AudioEvent::new(8.3, AudioEventType::LowFrequency, 0.6, "Engine or mechanical sound", 0.05);

        let fusion = correlator.correlate(&detections, &Transcript::default(), &[hum]);
        assert!(fusion.timeline[0].is_confirmed("car"));
    }

    #[test]
    fn test_first_overlapping_segment_surfaced_but_all_matched() {
        let correlator = AudioVisualCorrelator::with_defaults();
        let detections = vec![det(4.2, "dog")];
        let speech = transcript(vec![
            AudioSegment::new(3.0, 5.0, "look over there", 0.9),
            AudioSegment::new(4.0, 6.0, "what a good puppy", 0.9),
        ]);

        let fusion = correlator.correlate(&detections, &speech, &[]);
        let entry = &fusion.timeline[0];
        assert_eq!(entry.audio.speech.as_deref(), Some("look over there"));
        assert!(entry.is_confirmed("dog"));
    }

    #[test]
    fn test_segment_end_is_exclusive() {
        let correlator = AudioVisualCorrelator::with_defaults();
        let detections = vec![det(13.0, "car")];
        let speech = transcript(vec![AudioSegment::new(11.5, 13.0, "the car is driving", 0.9)]);

        let fusion = correlator.correlate(&detections, &speech, &[]);
        assert!(fusion.timeline[0].audio.speech.is_none());
        assert!(fusion.timeline[0].confirmed_by_audio.is_empty());
    }

    #[test]
    fn test_buckets_ascending_and_silent_buckets_omitted() {
        let correlator = AudioVisualCorrelator::with_defaults();
        let detections = vec![det(9.9, "person"), det(2.0, "person"), det(2.5, "cat")];
        let speech = transcript(vec![AudioSegment::new(5.0, 6.0, "someone is here", 0.9)]);

        let fusion = correlator.correlate(&detections, &speech, &[]);
        let buckets: Vec<u64> = fusion.timeline.iter().map(|e| e.timestamp).collect();
        assert_eq!(buckets, vec![2, 9]);
        assert_eq!(fusion.total_speech_segments, 1);
        assert_eq!(fusion.full_transcript, "someone is here");
    }

    #[test]
    fn test_no_detections_no_timeline() {
        let fusion = AudioVisualCorrelator::with_defaults().correlate(&[], &Transcript::default(), &[]);
        assert!(fusion.timeline.is_empty());
        assert_eq!(fusion.audio_confirmations, 0);
    }
}
