use glam::Vec3;

#[derive(Debug, Clone)]
pub struct DirectionalLight;

/// Sky/ground gradient light. `color` on the owning [`Light`] is the sky color.
#[derive(Debug, Clone)]
pub struct HemisphereLight {
    pub ground_color: Vec3,
}

#[derive(Debug, Clone)]
pub enum LightKind {
    Directional(DirectionalLight),
    Hemisphere(HemisphereLight),
}

#[derive(Debug, Clone)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional(DirectionalLight),
        }
    }

    #[must_use]
    pub fn new_hemisphere(sky_color: Vec3, ground_color: Vec3, intensity: f32) -> Self {
        Self {
            color: sky_color,
            intensity,
            kind: LightKind::Hemisphere(HemisphereLight { ground_color }),
        }
    }
}

/// Converts a `0xRRGGBB` color into `[0, 1]` components.
#[must_use]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}
