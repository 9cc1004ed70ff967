//! Keyboard-driven mode and density controls.

use photo3d_engine::input::Key;
use photo3d_engine::render::{PrimitiveMode, RenderSettings, SamplingStep};

pub const SLIDER_MIN: f32 = 1.0;
pub const SLIDER_MAX: f32 = 10.0;
pub const SLIDER_INCREMENT: f32 = 0.5;

/// What a key press asks the viewer to do.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlAction {
    SetMode(PrimitiveMode),
    NudgeSlider(f32),
    Quit,
}

impl ControlAction {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Digit1 => Some(Self::SetMode(PrimitiveMode::Triangles)),
            Key::Digit2 => Some(Self::SetMode(PrimitiveMode::Points)),
            Key::Digit3 => Some(Self::SetMode(PrimitiveMode::Lines)),
            Key::ArrowUp => Some(Self::NudgeSlider(SLIDER_INCREMENT)),
            Key::ArrowDown => Some(Self::NudgeSlider(-SLIDER_INCREMENT)),
            Key::Escape => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Segmented mode selector plus the density slider.
///
/// The slider drives the sampling step only in the sparse modes: Points use
/// the slider value, Lines twice that. Triangles ignore it and keep whatever
/// step was last set. Switching mode does not re-derive the step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Controls {
    settings: RenderSettings,
    slider: f32,
}

impl Controls {
    pub fn new(mode: PrimitiveMode, slider: f32) -> Self {
        let slider = clamp_slider(slider);
        let mut controls = Self {
            settings: RenderSettings {
                mode,
                step: SamplingStep::new(slider),
            },
            slider,
        };
        controls.apply_slider();
        controls
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    pub fn slider(&self) -> f32 {
        self.slider
    }

    /// Returns true when the rendered output changes.
    pub fn set_mode(&mut self, mode: PrimitiveMode) -> bool {
        if self.settings.mode == mode {
            return false;
        }
        self.settings.mode = mode;
        true
    }

    /// Moves the slider by `delta` within its range; returns true when the
    /// rendered output changes.
    pub fn nudge_slider(&mut self, delta: f32) -> bool {
        let next = clamp_slider(self.slider + delta);
        if next == self.slider {
            return false;
        }
        self.slider = next;
        self.apply_slider()
    }

    fn apply_slider(&mut self) -> bool {
        let step = match self.settings.mode {
            PrimitiveMode::Triangles => return false,
            PrimitiveMode::Points => self.slider,
            PrimitiveMode::Lines => self.slider * 2.0,
        };
        self.settings.step = SamplingStep::new(step);
        true
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(PrimitiveMode::default(), SamplingStep::DEFAULT.get())
    }
}

fn clamp_slider(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(SLIDER_MIN, SLIDER_MAX)
    } else {
        SamplingStep::DEFAULT.get()
    }
}
