//! Track preference matching
//!
//! Pure scoring over mapped track options against a stored preference.
//! The matcher never guesses across languages: a candidate only wins
//! when its score reaches the language weight, so a preference whose
//! language matches nothing returns no match and the engine default
//! stands.

use crate::tracks::TrackOption;
use vireo_core::types::{AudioTrackProperties, SubtitleTrackProperties};

/// Score contributed by a language match
const SCORE_LANGUAGE: u32 = 3;

/// Score contributed by a channel-count (audio) or forced-flag
/// (subtitle) match
const SCORE_SECONDARY: u32 = 2;

/// Score contributed by a label match
const SCORE_LABEL: u32 = 1;

/// Minimum score a candidate must reach to be returned
const SCORE_THRESHOLD: u32 = 3;

/// Find the stored audio preference's best match among the mapped
/// audio options.
///
/// Weights: language 3, channel count 2, label 1; a candidate is only
/// returned when it scores at least 3. Ties resolve to the first
/// maximum in listing order.
pub fn find_best_audio_match<'a>(
    tracks: &'a [TrackOption],
    preference: &AudioTrackProperties,
) -> Option<&'a TrackOption> {
    best_above_threshold(tracks.iter(), |track| {
        let mut score = 0;
        if both_equal(track.language.as_deref(), preference.language.as_deref()) {
            score += SCORE_LANGUAGE;
        }
        if track.channel_count.is_some() && track.channel_count == preference.channel_count {
            score += SCORE_SECONDARY;
        }
        if preference.label.as_deref() == Some(track.label.as_str()) {
            score += SCORE_LABEL;
        }
        score
    })
}

/// Find the stored subtitle preference's best match among the mapped
/// text options.
///
/// An `is_off` preference short-circuits to the synthetic Off option;
/// otherwise the Off option is excluded from scoring and the weights
/// mirror the audio matcher with the forced flag in place of channel
/// count.
pub fn find_best_subtitle_match<'a>(
    tracks: &'a [TrackOption],
    preference: &SubtitleTrackProperties,
) -> Option<&'a TrackOption> {
    if preference.is_off {
        return tracks.iter().find(|track| track.is_off);
    }

    best_above_threshold(tracks.iter().filter(|track| !track.is_off), |track| {
        let mut score = 0;
        if both_equal(track.language.as_deref(), preference.language.as_deref()) {
            score += SCORE_LANGUAGE;
        }
        if track.forced == preference.forced {
            score += SCORE_SECONDARY;
        }
        if preference.label.as_deref() == Some(track.label.as_str()) {
            score += SCORE_LABEL;
        }
        score
    })
}

fn both_equal(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

fn best_above_threshold<'a>(
    candidates: impl Iterator<Item = &'a TrackOption>,
    score: impl Fn(&TrackOption) -> u32,
) -> Option<&'a TrackOption> {
    let mut best: Option<(&TrackOption, u32)> = None;
    for track in candidates {
        let track_score = score(track);
        // strict comparison keeps the first maximum in listing order
        if best.map_or(true, |(_, best_score)| track_score > best_score) {
            best = Some((track, track_score));
        }
    }
    best.and_then(|(track, track_score)| (track_score >= SCORE_THRESHOLD).then_some(track))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TrackKind;
    use crate::tracks::OFF_TEXT_TRACK_ID;

    fn audio_option(id: &str, language: Option<&str>, channels: Option<u32>, label: &str) -> TrackOption {
        TrackOption {
            id: id.to_string(),
            label: label.to_string(),
            language: language.map(str::to_string),
            bitrate: None,
            channel_count: channels,
            height: None,
            forced: false,
            group_index: 0,
            track_index: 0,
            kind: TrackKind::Audio,
            is_off: false,
        }
    }

    fn text_option(id: &str, language: Option<&str>, forced: bool, label: &str) -> TrackOption {
        TrackOption {
            id: id.to_string(),
            label: label.to_string(),
            language: language.map(str::to_string),
            bitrate: None,
            channel_count: None,
            height: None,
            forced,
            group_index: 0,
            track_index: 0,
            kind: TrackKind::Text,
            is_off: false,
        }
    }

    fn off_option() -> TrackOption {
        TrackOption {
            id: OFF_TEXT_TRACK_ID.to_string(),
            label: "Off".to_string(),
            language: None,
            bitrate: None,
            channel_count: None,
            height: None,
            forced: false,
            group_index: -1,
            track_index: -1,
            kind: TrackKind::Text,
            is_off: true,
        }
    }

    #[test]
    fn language_match_is_enough() {
        let tracks = vec![
            audio_option("a_0_0", Some("en"), Some(2), "en"),
            audio_option("a_0_1", Some("es"), Some(2), "es"),
        ];
        let preference = AudioTrackProperties {
            language: Some("es".to_string()),
            channel_count: None,
            label: None,
        };

        let best = find_best_audio_match(&tracks, &preference).expect("match");
        assert_eq!(best.id, "a_0_1");
    }

    #[test]
    fn channel_count_breaks_language_ties() {
        let tracks = vec![
            audio_option("a_0_0", Some("en"), Some(2), "Stereo"),
            audio_option("a_0_1", Some("en"), Some(6), "Surround"),
        ];
        let preference = AudioTrackProperties {
            language: Some("en".to_string()),
            channel_count: Some(6),
            label: None,
        };

        let best = find_best_audio_match(&tracks, &preference).expect("match");
        assert_eq!(best.id, "a_0_1");
    }

    #[test]
    fn channels_and_label_alone_stay_below_threshold() {
        // 2 + 1 = 3 requires the label too; channels alone must lose
        let tracks = vec![audio_option("a_0_0", Some("en"), Some(6), "Surround")];
        let preference = AudioTrackProperties {
            language: Some("ja".to_string()),
            channel_count: Some(6),
            label: None,
        };

        assert!(find_best_audio_match(&tracks, &preference).is_none());
    }

    #[test]
    fn no_field_overlap_returns_none() {
        let tracks = vec![audio_option("a_0_0", Some("en"), Some(2), "Stereo")];
        let preference = AudioTrackProperties {
            language: Some("de".to_string()),
            channel_count: Some(8),
            label: Some("DTS".to_string()),
        };

        assert!(find_best_audio_match(&tracks, &preference).is_none());
    }

    #[test]
    fn missing_languages_never_count_as_equal() {
        let tracks = vec![audio_option("a_0_0", None, Some(2), "Stereo")];
        let preference = AudioTrackProperties {
            language: None,
            channel_count: Some(2),
            label: Some("Stereo".to_string()),
        };

        // 2 + 1 = 3 without any language involvement still clears the
        // threshold; None == None must not add the language weight
        let best = find_best_audio_match(&tracks, &preference).expect("match");
        assert_eq!(best.id, "a_0_0");
    }

    #[test]
    fn ties_resolve_to_first_in_listing_order() {
        let tracks = vec![
            audio_option("a_0_0", Some("en"), Some(2), "A"),
            audio_option("a_0_1", Some("en"), Some(2), "B"),
        ];
        let preference = AudioTrackProperties {
            language: Some("en".to_string()),
            channel_count: Some(2),
            label: None,
        };

        let best = find_best_audio_match(&tracks, &preference).expect("match");
        assert_eq!(best.id, "a_0_0");
    }

    #[test]
    fn off_preference_short_circuits_to_sentinel() {
        let tracks = vec![
            off_option(),
            text_option("t_0_0", Some("en"), false, "en"),
        ];
        let preference = SubtitleTrackProperties {
            language: Some("en".to_string()),
            forced: false,
            label: Some("en".to_string()),
            is_off: true,
        };

        let best = find_best_subtitle_match(&tracks, &preference).expect("off option");
        assert!(best.is_off);
        assert_eq!(best.id, OFF_TEXT_TRACK_ID);
    }

    #[test]
    fn sentinel_is_excluded_when_not_off() {
        let tracks = vec![off_option()];
        let preference = SubtitleTrackProperties {
            language: Some("en".to_string()),
            forced: false,
            label: None,
            is_off: false,
        };

        assert!(find_best_subtitle_match(&tracks, &preference).is_none());
    }

    #[test]
    fn forced_flag_acts_as_secondary_weight() {
        let tracks = vec![
            text_option("t_0_0", Some("en"), false, "Full"),
            text_option("t_0_1", Some("en"), true, "Forced"),
        ];
        let preference = SubtitleTrackProperties {
            language: Some("en".to_string()),
            forced: true,
            label: None,
            is_off: false,
        };

        let best = find_best_subtitle_match(&tracks, &preference).expect("match");
        assert_eq!(best.id, "t_0_1");
    }

    #[test]
    fn forced_agreement_alone_stays_below_threshold() {
        let tracks = vec![text_option("t_0_0", Some("en"), false, "Full")];
        let preference = SubtitleTrackProperties {
            language: Some("ko".to_string()),
            forced: false,
            label: None,
            is_off: false,
        };

        assert!(find_best_subtitle_match(&tracks, &preference).is_none());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const LANGUAGES: [&str; 6] = ["en", "es", "fr", "de", "ja", "ko"];

        fn arbitrary_audio_tracks() -> impl Strategy<Value = Vec<TrackOption>> {
            prop::collection::vec(
                (0usize..LANGUAGES.len(), prop::option::of(1u32..9)),
                1..LANGUAGES.len(),
            )
            .prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(index, (lang, channels))| {
                        audio_option(
                            &format!("a_0_{index}"),
                            Some(LANGUAGES[lang]),
                            channels,
                            LANGUAGES[lang],
                        )
                    })
                    .collect()
            })
        }

        proptest! {
            /// A preference whose language matches exactly one track
            /// always returns that track.
            #[test]
            fn unique_language_always_matches(tracks in arbitrary_audio_tracks()) {
                for language in LANGUAGES {
                    let matching: Vec<&TrackOption> = tracks
                        .iter()
                        .filter(|t| t.language.as_deref() == Some(language))
                        .collect();
                    if matching.len() != 1 {
                        continue;
                    }

                    let preference = AudioTrackProperties {
                        language: Some(language.to_string()),
                        channel_count: None,
                        label: None,
                    };
                    let best = find_best_audio_match(&tracks, &preference);
                    prop_assert_eq!(best.map(|t| t.id.as_str()), Some(matching[0].id.as_str()));
                }
            }

            /// A preference sharing no field with any track never
            /// returns a match.
            #[test]
            fn disjoint_preference_never_matches(tracks in arbitrary_audio_tracks()) {
                let preference = AudioTrackProperties {
                    language: Some("zu".to_string()),
                    channel_count: Some(64),
                    label: Some("nonexistent".to_string()),
                };
                prop_assert!(find_best_audio_match(&tracks, &preference).is_none());
            }
        }
    }
}
