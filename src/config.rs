//! Showcase configuration
//!
//! Everything the page hard-codes (camera intrinsics, lights, model list,
//! camera waypoints) lives in [`ShowcaseConfig`]. `Default` reproduces the
//! stock scene; a JSON file can override any subset of fields.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::AssetSpec;
use crate::errors::{Result, SkyscrollError};
use crate::sequencer::{Ease, Keyframe, PoseSequencer};

/// Perspective camera intrinsics and the pose shown before any scrolling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
}

impl Default for CameraConfig {
    #[allow(clippy::excessive_precision, clippy::unreadable_literal)]
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.5,
            far: 400.0,
            position: Vec3::new(3.1118979947186505, 203.3443032074982, 18.73685711010565),
            rotation: Vec3::new(-2.7674097051953916, 0.13166883152219006, 3.0900833814855555),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightConfig {
    /// `0xRRGGBB`
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
    /// Rotation about the Y axis in radians.
    pub rotation_y: f32,
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            color: 0xff_ffff,
            intensity: 5.0,
            position: Vec3::new(-35.0, 84.0, -35.0),
            rotation_y: 3.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HemisphereLightConfig {
    pub sky_color: u32,
    pub ground_color: u32,
    pub intensity: f32,
}

impl Default for HemisphereLightConfig {
    fn default() -> Self {
        Self {
            sky_color: 0xdd_eeff,
            ground_color: 0x20_2020,
            intensity: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub directional: Option<DirectionalLightConfig>,
    pub hemisphere: Option<HemisphereLightConfig>,
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            directional: Some(DirectionalLightConfig::default()),
            hemisphere: Some(HemisphereLightConfig::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub title: String,
    /// Clear color, `0xRRGGBB`.
    pub background: u32,
    pub camera: CameraConfig,
    pub lights: LightsConfig,
    /// Directory or base URL the asset locators are relative to.
    pub asset_root: String,
    pub assets: Vec<AssetSpec>,
    /// Camera path. The first entry is normally the initial camera pose.
    pub keyframes: Vec<Keyframe>,
    pub ease: Ease,
    /// Upper bound for one frame's delta, in seconds.
    pub max_frame_delta: f32,
    /// Extra attempts per asset after the first failure.
    pub load_retries: u32,
    /// CSS selector of the element whose scroll drives the camera (web).
    pub scroll_selector: String,
    /// Height of the virtual page in viewport heights (native wheel scrolling).
    pub virtual_page_height: f32,
    /// Pixels scrolled per wheel line (native).
    pub wheel_line_height: f32,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        let camera = CameraConfig::default();
        let model_scale = 0.05;

        Self {
            title: "Skyscroll".into(),
            background: 0x87_ceeb,
            keyframes: default_keyframes(&camera),
            camera,
            lights: LightsConfig::default(),
            asset_root: "assets".into(),
            assets: vec![
                AssetSpec::new("Parrot.glb", Vec3::new(0.0, 200.0, 40.0), model_scale),
                AssetSpec::new("Flamingo.glb", Vec3::new(5.0, 204.0, 30.0), model_scale),
                AssetSpec::new("Stork.glb", Vec3::new(10.0, 198.0, 50.0), model_scale),
                AssetSpec::new("MainScene.glb", Vec3::ZERO, model_scale),
            ],
            ease: Ease::Linear,
            max_frame_delta: 1.0 / 30.0,
            load_retries: 1,
            scroll_selector: ".page".into(),
            virtual_page_height: 6.0,
            wheel_line_height: 40.0,
        }
    }
}

#[allow(clippy::excessive_precision, clippy::unreadable_literal)]
fn default_keyframes(camera: &CameraConfig) -> Vec<Keyframe> {
    vec![
        Keyframe::new(camera.position, camera.rotation),
        Keyframe::new(
            Vec3::new(-57.107254020681374, 8.274332354787813, -20.297409110893618),
            Vec3::new(-3.04602951884379, -0.9305971251084648, -3.06486997939833),
        )
        .with_look_at(Vec3::ZERO),
        Keyframe::new(
            Vec3::new(13.48097266007278, 5.387304279919668, 52.76364050918752),
            Vec3::new(0.007336059469284603, -0.03634135440187486, 0.00026654843299389727),
        )
        .with_look_at(Vec3::new(15.0, 0.0, 0.0)),
        Keyframe::new(
            Vec3::new(-4.336851126967199, 6.27717610625403, -13.273825945679029),
            Vec3::new(-3.131494504798053, -0.5208847421845741, -3.136567204154933),
        )
        .with_look_at(Vec3::new(10.0, 5.0, 15.0)),
        Keyframe::new(
            Vec3::new(12.5912158584227, 5.681856785128295, 2.1053184874),
            Vec3::new(-2.8059970071164173, 0.946195940999368, 2.8658629110522686),
        )
        .with_look_at(Vec3::new(10.0, 5.0, 15.0)),
        Keyframe::new(
            Vec3::new(8.45308520659809, 5.163919466394349, 13.66343250707847),
            Vec3::new(-0.16762693407281756, -0.4107256693080156, -0.06746068222792981),
        )
        .with_look_at(Vec3::new(10.0, 5.0, 5.0)),
        Keyframe::new(
            Vec3::new(18.250126645438755, 5.3860849150838535, 5.880834221265962),
            Vec3::new(-0.9309195616778742, 1.4494504720739347, 0.9273807651034073),
        )
        .with_look_at(Vec3::new(-20.0, 5.0, 6.0)),
    ]
}

impl ShowcaseConfig {
    /// Parses JSON. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects configurations the showcase cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.keyframes.len() < 2 {
            return Err(SkyscrollError::TooFewKeyframes {
                count: self.keyframes.len(),
            });
        }
        if let Some(index) = self.keyframes.iter().position(|k| !k.is_finite()) {
            return invalid(format!("keyframe {index} has a non-finite component"));
        }

        let cam = &self.camera;
        if !(cam.fov.is_finite() && cam.fov > 0.0 && cam.fov < 180.0) {
            return invalid(format!("camera fov must be in (0, 180) degrees, got {}", cam.fov));
        }
        if !(cam.near.is_finite() && cam.near > 0.0) {
            return invalid(format!("camera near must be positive, got {}", cam.near));
        }
        if !(cam.far.is_finite() && cam.far > cam.near) {
            return invalid(format!(
                "camera far ({}) must be greater than near ({})",
                cam.far, cam.near
            ));
        }
        if !(cam.position.is_finite() && cam.rotation.is_finite()) {
            return invalid("camera pose has a non-finite component".into());
        }

        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return invalid(format!(
                "max_frame_delta must be positive, got {}",
                self.max_frame_delta
            ));
        }
        if !(self.virtual_page_height.is_finite() && self.virtual_page_height >= 1.0) {
            return invalid(format!(
                "virtual_page_height must be at least 1, got {}",
                self.virtual_page_height
            ));
        }

        for asset in &self.assets {
            if asset.locator.trim().is_empty() {
                return invalid("asset with an empty locator".into());
            }
            if !(asset.position.is_finite() && asset.scale.is_finite() && asset.scale > 0.0) {
                return invalid(format!("asset '{}' has an invalid placement", asset.locator));
            }
        }
        Ok(())
    }

    /// Builds the camera path sequencer from `keyframes` and `ease`.
    pub fn sequencer(&self) -> Result<PoseSequencer> {
        PoseSequencer::new(self.keyframes.clone(), self.ease)
    }
}

fn invalid<T>(reason: String) -> Result<T> {
    Err(SkyscrollError::InvalidConfig(reason))
}
