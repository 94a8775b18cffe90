use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Page sections in scroll order.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    #[default]
    Hero,
    Focus,
    Transition,
    Showcase2,
    Contacts,
}

impl SectionState {
    pub const ALL: [SectionState; 5] = [
        SectionState::Hero,
        SectionState::Focus,
        SectionState::Transition,
        SectionState::Showcase2,
        SectionState::Contacts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionState::Hero => "hero",
            SectionState::Focus => "focus",
            SectionState::Transition => "transition",
            SectionState::Showcase2 => "showcase2",
            SectionState::Contacts => "contacts",
        }
    }

    /// Whether the globe spins on its own while this section is active.
    pub fn idle_rotation(self) -> bool {
        matches!(
            self,
            SectionState::Hero | SectionState::Showcase2 | SectionState::Contacts
        )
    }

    /// Whether hovering a marker shows its label.
    pub fn hover_labels(self) -> bool {
        matches!(self, SectionState::Focus | SectionState::Showcase2)
    }

    /// Whether the active point's marker is shown (and blinks).
    pub fn shows_active_marker(self) -> bool {
        matches!(self, SectionState::Focus | SectionState::Showcase2)
    }
}

impl std::fmt::Display for SectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[start, end)` slice of pinned progress owned by one section. The last
/// band also owns its `end`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub section: SectionState,
    pub start: f64,
    pub end: f64,
}

/// Contiguous, non-overlapping cover of `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    bands: Vec<Band>,
}

impl Default for Partition {
    fn default() -> Self {
        Self {
            bands: default_bands(),
        }
    }
}

pub fn default_bands() -> Vec<Band> {
    vec![
        Band {
            section: SectionState::Hero,
            start: 0.0,
            end: 0.5,
        },
        Band {
            section: SectionState::Focus,
            start: 0.5,
            end: 0.75,
        },
        Band {
            section: SectionState::Transition,
            start: 0.75,
            end: 1.0,
        },
    ]
}

impl Partition {
    pub fn new(bands: Vec<Band>) -> Result<Self, ConfigError> {
        let (Some(first), Some(last)) = (bands.first(), bands.last()) else {
            return Err(ConfigError::Partition("no bands".to_string()));
        };
        if first.start != 0.0 {
            return Err(ConfigError::Partition(format!(
                "first band starts at {} instead of 0",
                first.start
            )));
        }
        if last.end != 1.0 {
            return Err(ConfigError::Partition(format!(
                "last band ends at {} instead of 1",
                last.end
            )));
        }
        for band in &bands {
            if !(band.start < band.end) {
                return Err(ConfigError::Partition(format!(
                    "{} band is empty: [{}, {})",
                    band.section, band.start, band.end
                )));
            }
        }
        for pair in bands.windows(2) {
            if pair[0].end != pair[1].start {
                let kind = if pair[0].end < pair[1].start {
                    "gap"
                } else {
                    "overlap"
                };
                return Err(ConfigError::Partition(format!(
                    "{kind} between {} and {} at {}..{}",
                    pair[0].section, pair[1].section, pair[0].end, pair[1].start
                )));
            }
        }
        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Section owning `progress`; input is clamped to `[0, 1]`, NaN reads as 0.
    pub fn section_at(&self, progress: f64) -> SectionState {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.bands
            .iter()
            .find(|b| p >= b.start && p < b.end)
            .or(self.bands.last())
            .map(|b| b.section)
            .unwrap_or_default()
    }

    /// Band owned by `section`, if it is reached through progress at all.
    pub fn band_of(&self, section: SectionState) -> Option<Band> {
        self.bands.iter().find(|b| b.section == section).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{Band, Partition, SectionState};
    use crate::config::ConfigError;

    #[test]
    fn default_partition_boundaries() {
        let p = Partition::default();
        assert_eq!(p.section_at(0.0), SectionState::Hero);
        assert_eq!(p.section_at(0.4999), SectionState::Hero);
        assert_eq!(p.section_at(0.5), SectionState::Focus);
        assert_eq!(p.section_at(0.74), SectionState::Focus);
        assert_eq!(p.section_at(0.75), SectionState::Transition);
        assert_eq!(p.section_at(1.0), SectionState::Transition);
    }

    #[test]
    fn every_progress_maps_to_one_section() {
        let p = Partition::default();
        for i in 0..=1000 {
            let progress = i as f64 / 1000.0;
            let owners = p
                .bands()
                .iter()
                .filter(|b| {
                    (progress >= b.start && progress < b.end)
                        || (b.end == 1.0 && progress == 1.0)
                })
                .count();
            assert_eq!(owners, 1, "progress {progress}");
            let s = p.section_at(progress);
            assert!(SectionState::ALL.contains(&s));
        }
        assert_eq!(p.section_at(-3.0), SectionState::Hero);
        assert_eq!(p.section_at(7.0), SectionState::Transition);
        assert_eq!(p.section_at(f64::NAN), SectionState::Hero);
    }

    #[test]
    fn rejects_gaps_and_overlaps() {
        let gapped = vec![
            Band {
                section: SectionState::Hero,
                start: 0.0,
                end: 0.4,
            },
            Band {
                section: SectionState::Focus,
                start: 0.5,
                end: 1.0,
            },
        ];
        assert!(matches!(
            Partition::new(gapped),
            Err(ConfigError::Partition(m)) if m.contains("gap")
        ));

        let overlapping = vec![
            Band {
                section: SectionState::Hero,
                start: 0.0,
                end: 0.6,
            },
            Band {
                section: SectionState::Focus,
                start: 0.5,
                end: 1.0,
            },
        ];
        assert!(matches!(
            Partition::new(overlapping),
            Err(ConfigError::Partition(m)) if m.contains("overlap")
        ));

        assert!(Partition::new(Vec::new()).is_err());
        let short = vec![Band {
            section: SectionState::Hero,
            start: 0.0,
            end: 0.9,
        }];
        assert!(Partition::new(short).is_err());
    }

    #[test]
    fn flags_per_section() {
        assert!(SectionState::Hero.idle_rotation());
        assert!(!SectionState::Focus.idle_rotation());
        assert!(!SectionState::Transition.idle_rotation());
        assert!(SectionState::Showcase2.hover_labels());
        assert!(!SectionState::Contacts.hover_labels());
        assert_eq!(SectionState::Showcase2.to_string(), "showcase2");
        assert!(SectionState::Focus < SectionState::Contacts);
    }

    #[test]
    fn band_lookup_by_section() {
        let p = Partition::default();
        assert_eq!(
            p.band_of(SectionState::Focus),
            Some(Band {
                section: SectionState::Focus,
                start: 0.5,
                end: 0.75,
            })
        );
        assert_eq!(p.band_of(SectionState::Showcase2), None);
    }
}
