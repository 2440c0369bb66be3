use modelview_common::Color;
use serde::{Deserialize, Serialize};

/// Light sources. Position comes from the owning node's transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    /// Parallel rays shining from the node position towards the origin.
    Directional { color: Color, intensity: f32 },
    /// Uniform light on every surface.
    Ambient { color: Color, intensity: f32 },
}

impl Light {
    pub fn directional(color: Color) -> Self {
        Self::Directional {
            color,
            intensity: 1.0,
        }
    }

    pub fn ambient(color: Color) -> Self {
        Self::Ambient {
            color,
            intensity: 1.0,
        }
    }

    /// Color scaled by intensity.
    pub fn radiance(&self) -> Color {
        let (Light::Directional { color, intensity } | Light::Ambient { color, intensity }) = *self;
        Color::rgb(color.r * intensity, color.g * intensity, color.b * intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radiance_scales_color() {
        let light = Light::Ambient {
            color: Color::WHITE,
            intensity: 0.5,
        };
        assert_eq!(light.radiance(), Color::rgb(0.5, 0.5, 0.5));
    }
}
