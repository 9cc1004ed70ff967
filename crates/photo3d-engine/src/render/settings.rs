use std::fmt;
use std::str::FromStr;

/// Draw-call topology. Selects both the mesh shape and the GPU pipeline.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum PrimitiveMode {
    /// Dense indexed triangle surface over every grid cell.
    #[default]
    Triangles,
    /// Sparse point list.
    Points,
    /// Sparse connected line strip.
    Lines,
}

impl PrimitiveMode {
    pub const ALL: [PrimitiveMode; 3] = [Self::Triangles, Self::Points, Self::Lines];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Triangles => "triangles",
            Self::Points => "points",
            Self::Lines => "lines",
        }
    }

    pub(crate) fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            Self::Triangles => wgpu::PrimitiveTopology::TriangleList,
            Self::Points => wgpu::PrimitiveTopology::PointList,
            Self::Lines => wgpu::PrimitiveTopology::LineStrip,
        }
    }
}

impl fmt::Display for PrimitiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a primitive mode name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown primitive mode `{0}` (expected triangles, points or lines)")]
pub struct ParseModeError(pub String);

impl FromStr for PrimitiveMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "triangles" | "triangle" => Ok(Self::Triangles),
            "points" | "point" => Ok(Self::Points),
            "lines" | "line" | "linestrip" => Ok(Self::Lines),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Grid sampling step in image pixels.
///
/// Always positive and finite; degenerate inputs collapse to `1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplingStep(f32);

impl SamplingStep {
    pub const DEFAULT: SamplingStep = SamplingStep(5.0);

    pub fn new(value: f32) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self(1.0)
        }
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Row stride used by the sparse (points/lines) sampling loops.
    ///
    /// Truncates like an integer conversion but never drops below one row.
    #[inline]
    pub(crate) fn row_stride(self) -> usize {
        (self.0 as usize).max(1)
    }
}

impl Default for SamplingStep {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The (mode, step) pair a frame is rendered with.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RenderSettings {
    pub mode: PrimitiveMode,
    pub step: SamplingStep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_normalizes_degenerate_values() {
        assert_eq!(SamplingStep::new(0.0).get(), 1.0);
        assert_eq!(SamplingStep::new(-3.0).get(), 1.0);
        assert_eq!(SamplingStep::new(f32::NAN).get(), 1.0);
        assert_eq!(SamplingStep::new(f32::INFINITY).get(), 1.0);
        assert_eq!(SamplingStep::new(2.5).get(), 2.5);
    }

    #[test]
    fn row_stride_truncates_but_stays_positive() {
        assert_eq!(SamplingStep::new(0.5).row_stride(), 1);
        assert_eq!(SamplingStep::new(5.9).row_stride(), 5);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Points".parse::<PrimitiveMode>(), Ok(PrimitiveMode::Points));
        assert_eq!(" LINES ".parse::<PrimitiveMode>(), Ok(PrimitiveMode::Lines));
        assert_eq!("triangles".parse::<PrimitiveMode>(), Ok(PrimitiveMode::Triangles));
        assert!("quads".parse::<PrimitiveMode>().is_err());
    }

    #[test]
    fn mode_display_round_trips_through_parse() {
        for mode in PrimitiveMode::ALL {
            assert_eq!(mode.to_string().parse::<PrimitiveMode>(), Ok(mode));
        }
    }

    #[test]
    fn defaults_match_initial_viewer_state() {
        let s = RenderSettings::default();
        assert_eq!(s.mode, PrimitiveMode::Triangles);
        assert_eq!(s.step.get(), 5.0);
    }
}
