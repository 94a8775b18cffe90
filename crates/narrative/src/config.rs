//! Tunables for the narrative, loadable from JSON.
//!
//! Every field has a default, so a partial document such as
//! `{"curtain": {"start": 0.6}}` is valid.

use serde::{Deserialize, Serialize};

use foundation::math::{AimOffset, SphereCalibration, Vec3};
use scene::PointOfInterest;

use crate::section::{Band, Partition, SectionState, default_bands};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Json(String),
    Partition(String),
    PointOutOfRange { index: usize, lat: f64, lon: f64 },
    Layout(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(msg) => write!(f, "invalid configuration json: {msg}"),
            ConfigError::Partition(msg) => write!(f, "invalid section partition: {msg}"),
            ConfigError::PointOutOfRange { index, lat, lon } => {
                write!(f, "point {index} out of range: lat {lat}, lon {lon}")
            }
            ConfigError::Layout(msg) => write!(f, "invalid page layout: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub points: Vec<PointOfInterest>,
    pub partition: Vec<Band>,
    /// Named scroll regions that force a section while active.
    pub region_sections: Vec<RegionSection>,
    pub layout: LayoutConfig,
    pub calibration: CalibrationConfig,
    pub aim: AimConfig,
    pub globe_radius: f64,
    /// Marker radius as a multiple of the globe radius.
    pub marker_lift: f64,
    /// Marker hover radius, globe-local units.
    pub marker_pick_radius: f64,
    pub poses: PosesConfig,
    pub timing: TimingConfig,
    pub curtain: CurtainWindow,
    /// Idle globe spin (rad/s).
    pub idle_speed: f64,
    /// Starfield parallax spin (rad/s).
    pub starfield_speed: f64,
    pub drag_rad_per_px: f64,
    pub orbit: OrbitConfig,
    /// Duration multiplier applied when reduced motion is requested.
    pub reduced_motion_scale: f64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            points: default_points(),
            partition: default_bands(),
            region_sections: vec![
                RegionSection {
                    region: "showcase".to_string(),
                    section: SectionState::Showcase2,
                },
                RegionSection {
                    region: "contacts".to_string(),
                    section: SectionState::Contacts,
                },
            ],
            layout: LayoutConfig::default(),
            calibration: CalibrationConfig::default(),
            aim: AimConfig::default(),
            globe_radius: 2.0,
            marker_lift: 1.005,
            marker_pick_radius: 0.06,
            poses: PosesConfig::default(),
            timing: TimingConfig::default(),
            curtain: CurtainWindow::default(),
            idle_speed: 0.048,
            starfield_speed: 0.01,
            drag_rad_per_px: 0.005,
            orbit: OrbitConfig::default(),
            reduced_motion_scale: 0.0,
        }
    }
}

impl NarrativeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: NarrativeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.partition()?;
        validate_points(&self.points)?;
        self.layout.validate()?;
        if !(0.0 <= self.curtain.start
            && self.curtain.start <= self.curtain.end
            && self.curtain.end <= 1.0)
        {
            return Err(ConfigError::Partition(format!(
                "curtain window [{}, {}] outside [0, 1]",
                self.curtain.start, self.curtain.end
            )));
        }
        Ok(())
    }

    pub fn partition(&self) -> Result<Partition, ConfigError> {
        Partition::new(self.partition.clone())
    }

    pub fn section_for_region(&self, region: &str) -> Option<SectionState> {
        self.region_sections
            .iter()
            .find(|r| r.region == region)
            .map(|r| r.section)
    }

    pub fn sphere_calibration(&self) -> SphereCalibration {
        SphereCalibration {
            lon_sign: self.calibration.lon_sign,
            lon_offset_deg: self.calibration.lon_offset_deg,
        }
    }

    pub fn aim_offset(&self) -> AimOffset {
        AimOffset {
            yaw_deg: self.aim.yaw_deg,
            pitch_deg: self.aim.pitch_deg,
        }
    }
}

/// Parse a bare JSON array of points, as served next to the page.
pub fn points_from_json(json: &str) -> Result<Vec<PointOfInterest>, ConfigError> {
    let points: Vec<PointOfInterest> = serde_json::from_str(json)?;
    validate_points(&points)?;
    Ok(points)
}

pub fn validate_points(points: &[PointOfInterest]) -> Result<(), ConfigError> {
    match points.iter().position(|p| !p.in_range()) {
        Some(index) => Err(ConfigError::PointOutOfRange {
            index,
            lat: points[index].lat,
            lon: points[index].lon,
        }),
        None => Ok(()),
    }
}

pub fn default_points() -> Vec<PointOfInterest> {
    let point = |title: &str, country: &str, city: &str, lat: f64, lon: f64| PointOfInterest {
        title: title.to_string(),
        country: country.to_string(),
        city: city.to_string(),
        lat,
        lon,
        rating: None,
    };
    vec![
        point("Informatics — Finalist", "Indonesia", "Yogyakarta", -1.7956, 110.3695),
        point("Physics Olympiad — Gold", "Germany", "Hannover", 52.3759, 9.732),
        point("Math Olympiad — Silver", "Kazakhstan", "Almaty", 43.2389, 76.8897),
        point("Informatics — Finalist", "Indonesia", "Yogyakarta", -7.7956, 110.3695),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSection {
    pub region: String,
    pub section: SectionState,
}

/// Page geometry in viewport heights (`vh`), measured from the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub pinned_start_vh: f64,
    pub pinned_length_vh: f64,
    pub regions: Vec<RegionLayout>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pinned_start_vh: 0.0,
            pinned_length_vh: 3.5,
            regions: vec![
                RegionLayout {
                    name: "showcase".to_string(),
                    start_vh: 5.0,
                    end_vh: Some(7.0),
                },
                RegionLayout {
                    name: "contacts".to_string(),
                    start_vh: 7.0,
                    end_vh: None,
                },
            ],
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pinned_length_vh >= 0.0) || !self.pinned_start_vh.is_finite() {
            return Err(ConfigError::Layout(format!(
                "pinned range start {} length {}",
                self.pinned_start_vh, self.pinned_length_vh
            )));
        }
        for r in &self.regions {
            if r.name.is_empty() {
                return Err(ConfigError::Layout("region without a name".to_string()));
            }
            if let Some(end) = r.end_vh
                && !(r.start_vh <= end)
            {
                return Err(ConfigError::Layout(format!(
                    "region {} ends before it starts",
                    r.name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionLayout {
    pub name: String,
    pub start_vh: f64,
    /// Open-ended when absent.
    #[serde(default)]
    pub end_vh: Option<f64>,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub lon_sign: f64,
    pub lon_offset_deg: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            lon_sign: 1.0,
            lon_offset_deg: 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
}

impl Default for AimConfig {
    fn default() -> Self {
        let aim = AimOffset::default();
        Self {
            yaw_deg: aim.yaw_deg,
            pitch_deg: aim.pitch_deg,
        }
    }
}

/// Globe group placement and camera position for one section.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    pub position: [f64; 3],
    pub scale: f64,
    pub camera: [f64; 3],
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            scale: 0.9,
            camera: [0.0, 0.0, 6.0],
        }
    }
}

impl PoseConfig {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.position[0], self.position[1], self.position[2])
    }

    pub fn camera(&self) -> Vec3 {
        Vec3::new(self.camera[0], self.camera[1], self.camera[2])
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosesConfig {
    pub hero: PoseConfig,
    pub focus: PoseConfig,
    pub transition: PoseConfig,
    pub showcase: PoseConfig,
    pub contacts: PoseConfig,
}

impl Default for PosesConfig {
    fn default() -> Self {
        let focus = PoseConfig {
            position: [-5.0, -3.1, 0.0],
            scale: 1.55,
            camera: [0.0, 0.0, 6.0],
        };
        Self {
            hero: PoseConfig::default(),
            focus,
            transition: PoseConfig::default(),
            showcase: PoseConfig {
                position: [2.2, 0.0, 0.0],
                scale: 1.1,
                camera: [0.0, 0.0, 6.0],
            },
            contacts: PoseConfig {
                position: [0.0, -1.0, 0.0],
                scale: 0.7,
                camera: [0.0, 0.0, 6.0],
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub pose_s: f64,
    /// Lag of the progress-driven hero pose behind the scroll position.
    pub scrub_s: f64,
    pub focus_rotation_s: f64,
    pub scroll_lock_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pose_s: 1.2,
            scrub_s: 1.2,
            focus_rotation_s: 1.1,
            scroll_lock_ms: 700.0,
        }
    }
}

/// Progress window over which the curtain rises.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurtainWindow {
    pub start: f64,
    pub end: f64,
}

impl Default for CurtainWindow {
    fn default() -> Self {
        Self {
            start: 0.68,
            end: 0.75,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub enabled: bool,
    /// rad/s
    pub speed: f64,
    pub radius_x: f64,
    pub radius_z: f64,
    pub height: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 0.15,
            radius_x: 6.0,
            radius_z: 6.0,
            height: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, NarrativeConfig, points_from_json};
    use crate::section::SectionState;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = NarrativeConfig::default();
        config.validate().expect("valid defaults");
        assert_eq!(config.points.len(), 4);
        assert_eq!(config.section_for_region("contacts"), Some(SectionState::Contacts));
        assert_eq!(config.section_for_region("nope"), None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            NarrativeConfig::from_json(r#"{"curtain": {"start": 0.6}, "idle_speed": 0.1}"#)
                .expect("parse");
        assert_eq!(config.curtain.start, 0.6);
        assert_eq!(config.curtain.end, 0.75);
        assert_eq!(config.idle_speed, 0.1);
        assert_eq!(config.poses, NarrativeConfig::default().poses);
    }

    #[test]
    fn json_round_trips_through_pretty_form() {
        let config = NarrativeConfig::default();
        let json = config.to_json_pretty().expect("serialize");
        assert_eq!(NarrativeConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn rejects_gapped_partition() {
        let json = r#"{"partition": [
            {"section": "hero", "start": 0.0, "end": 0.4},
            {"section": "focus", "start": 0.5, "end": 1.0}
        ]}"#;
        assert!(matches!(
            NarrativeConfig::from_json(json),
            Err(ConfigError::Partition(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_points() {
        let json = r#"[
            {"title": "a", "country": "b", "city": "c", "lat": 10.0, "lon": 20.0},
            {"title": "a", "country": "b", "city": "c", "lat": 95.0, "lon": 20.0, "rating": 4}
        ]"#;
        assert_eq!(
            points_from_json(json),
            Err(ConfigError::PointOutOfRange {
                index: 1,
                lat: 95.0,
                lon: 20.0
            })
        );
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = NarrativeConfig::from_json("{").expect_err("malformed");
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("invalid configuration json"));
    }

    #[test]
    fn rejects_inverted_regions() {
        let json =
            r#"{"layout": {"regions": [{"name": "showcase", "start_vh": 4.0, "end_vh": 3.0}]}}"#;
        assert!(matches!(
            NarrativeConfig::from_json(json),
            Err(ConfigError::Layout(_))
        ));
    }
}
