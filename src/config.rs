use std::path::Path;
use std::str::FromStr;

use ini::Ini;
use lazy_static::lazy_static;

use crate::alg;
use crate::error::{Error, Result};
use crate::graphics::Color;
use crate::targets::MAX_TARGETS;

pub const CONFIG_PATH: &str = "config.ini";

pub const DEFAULT_FOV: f32 = 30.0;
pub const DEFAULT_NEAR: f32 = 1.0;
pub const DEFAULT_FAR: f32 = 100.0;
pub const DEFAULT_ANGLE_INCREMENT: f32 = 0.2;
pub const DEFAULT_TARGET_COUNT: usize = 2;

lazy_static! {
    pub static ref RENDERER_CONFIG: RendererConfig = {
        load_or_default(CONFIG_PATH)
    };
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CameraSettings {
    pub fov: f32, // Vertical, in degrees
    pub near: f32,
    pub far: f32,
    pub eye: alg::Vec3,
    pub target: alg::Vec3,
    pub up: alg::Vec3,
}

impl Default for CameraSettings {
    fn default() -> CameraSettings {
        CameraSettings {
            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            eye: alg::Vec3::new(0., 0., -10.),
            target: alg::Vec3::zero(),
            up: alg::Vec3::up(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RendererConfig {
    pub camera: CameraSettings,
    pub model_offset: alg::Vec3,
    pub spin_axis: alg::Vec3,
    pub angle_increment: f32, // Degrees per frame, before doubling
    pub clear_color: Color,
    pub target_count: usize,
}

impl Default for RendererConfig {
    fn default() -> RendererConfig {
        RendererConfig {
            camera: CameraSettings::default(),
            model_offset: alg::Vec3::new(0., -0.5, -1.5),
            spin_axis: alg::Vec3::new(0., 1., 1.),
            angle_increment: DEFAULT_ANGLE_INCREMENT,
            clear_color: Color::grey(),
            target_count: DEFAULT_TARGET_COUNT,
        }
    }
}

impl RendererConfig {
    pub fn load<P: AsRef<Path>>(filename: P) -> Result<RendererConfig> {
        let ini = Ini::load_from_file(filename)?;
        RendererConfig::from_ini(&ini)
    }

    pub fn parse(text: &str) -> Result<RendererConfig> {
        let ini = Ini::load_from_str(text)
            .map_err(|e| Error::Config(e.to_string()))?;

        RendererConfig::from_ini(&ini)
    }

    /// Read every known setting, keeping defaults for missing ones
    pub fn from_ini(ini: &Ini) -> Result<RendererConfig> {
        let defaults = RendererConfig::default();

        let camera = CameraSettings {
            fov: parse_setting(ini, "camera", "fov", defaults.camera.fov)?,
            near: parse_setting(ini, "camera", "near", defaults.camera.near)?,
            far: parse_setting(ini, "camera", "far", defaults.camera.far)?,
            eye: parse_vec(ini, "camera", "eye", defaults.camera.eye)?,
            target: parse_vec(ini, "camera", "target", defaults.camera.target)?,
            up: parse_vec(ini, "camera", "up", defaults.camera.up)?,
        };

        let clear_color = match load_section_setting(ini, "display", "clear_color") {
            Some(value) => {
                let [r, g, b, a] = parse_floats::<4>("display", "clear_color", value)?;
                Color::new(r, g, b, a)
            },

            None => defaults.clear_color,
        };

        let config = RendererConfig {
            camera,
            model_offset: parse_vec(ini, "model", "offset", defaults.model_offset)?,
            spin_axis: parse_vec(ini, "model", "spin_axis", defaults.spin_axis)?,
            angle_increment: parse_setting(
                ini,
                "animation",
                "angle_increment",
                defaults.angle_increment,
            )?,
            clear_color,
            target_count: parse_setting(
                ini,
                "remote",
                "target_count",
                defaults.target_count,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let camera = &self.camera;

        if !(camera.fov > 0. && camera.fov < 180.) {
            return Err(Error::Config(
                format!("fov must lie in (0, 180), got {}", camera.fov)
            ));
        }

        if !(camera.near > 0. && camera.far > camera.near) {
            return Err(Error::Config(format!(
                "clip planes must satisfy 0 < near < far, got {} and {}",
                camera.near,
                camera.far,
            )));
        }

        if self.target_count == 0 || self.target_count > MAX_TARGETS {
            return Err(Error::Config(format!(
                "target_count must lie in [1, {}], got {}",
                MAX_TARGETS,
                self.target_count,
            )));
        }

        Ok(())
    }
}

/// Load settings from `filename`, falling back to defaults on any failure
pub fn load_or_default(filename: &str) -> RendererConfig {
    match RendererConfig::load(filename) {
        Ok(config) => {
            log::info!("Loaded renderer config from \"{}\"", filename);
            config
        },

        Err(e) => {
            log::warn!(
                "Using default renderer config (\"{}\": {})",
                filename,
                e,
            );

            RendererConfig::default()
        },
    }
}

pub fn load_section_setting<'a>(
    ini: &'a Ini,
    section: &str,
    setting: &str,
) -> Option<&'a str> {
    ini.section(Some(section))
        .and_then(|settings| settings.get(setting))
        .map(str::trim)
}

fn parse_setting<T: FromStr>(
    ini: &Ini,
    section: &str,
    setting: &str,
    default: T,
) -> Result<T> {
    match load_section_setting(ini, section, setting) {
        Some(value) => value.parse().map_err(|_| Error::Config(format!(
            "Failed to parse setting \"{}\" in section \"{}\": \"{}\"",
            setting,
            section,
            value,
        ))),

        None => Ok(default),
    }
}

fn parse_vec(
    ini: &Ini,
    section: &str,
    setting: &str,
    default: alg::Vec3,
) -> Result<alg::Vec3> {
    match load_section_setting(ini, section, setting) {
        Some(value) => {
            let [x, y, z] = parse_floats::<3>(section, setting, value)?;
            Ok(alg::Vec3::new(x, y, z))
        },

        None => Ok(default),
    }
}

// Whitespace or comma separated
fn parse_floats<const N: usize>(
    section: &str,
    setting: &str,
    value: &str,
) -> Result<[f32; N]> {
    let error = || Error::Config(format!(
        "Setting \"{}\" in section \"{}\" expects {} numbers, got \"{}\"",
        setting,
        section,
        N,
        value,
    ));

    let parsed = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(f32::from_str)
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(|_| error())?;

    if parsed.len() != N {
        return Err(error());
    }

    let mut result = [0f32; N];
    result.copy_from_slice(&parsed);

    Ok(result)
}
