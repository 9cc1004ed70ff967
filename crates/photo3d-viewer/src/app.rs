use std::path::PathBuf;

use photo3d_engine::camera::{CameraState, GestureController};
use photo3d_engine::core::{App, AppControl, FrameCtx};
use photo3d_engine::input::{GestureRecognizer, InputEvent, KeyState};
use photo3d_engine::render::ColorSpace;

use crate::controls::{ControlAction, Controls};

pub struct ViewerApp {
    initial_image: Option<PathBuf>,
    camera: CameraState,
    recognizer: GestureRecognizer,
    controller: GestureController,
    controls: Controls,
}

impl ViewerApp {
    pub fn new(initial_image: Option<PathBuf>, controls: Controls) -> Self {
        Self {
            initial_image,
            camera: CameraState::default(),
            recognizer: GestureRecognizer::new(),
            controller: GestureController::new(),
            controls,
        }
    }

    fn load(&mut self, path: &std::path::Path, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        match ctx.renderer.load_image_path(path, ColorSpace::Linear) {
            Ok(_) => {
                if let Some(name) = path.file_name() {
                    ctx.window
                        .set_title(&format!("photo3d - {}", name.to_string_lossy()));
                }
                AppControl::Redraw
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                AppControl::Continue
            }
        }
    }

    fn apply_action(&mut self, action: ControlAction) -> AppControl {
        let changed = match action {
            ControlAction::SetMode(mode) => self.controls.set_mode(mode),
            ControlAction::NudgeSlider(delta) => self.controls.nudge_slider(delta),
            ControlAction::Quit => return AppControl::Exit,
        };

        if changed {
            let settings = self.controls.settings();
            log::debug!("mode={} step={}", settings.mode, settings.step.get());
            AppControl::Redraw
        } else {
            AppControl::Continue
        }
    }
}

/// Outcome of routing one input event.
#[derive(Debug, Clone, PartialEq)]
enum Dispatch {
    Control(AppControl),
    /// A file was dropped; loading needs the renderer.
    Load(PathBuf),
}

impl ViewerApp {
    /// Routes an input event. Only recognized gestures reach the camera.
    ///
    /// `image_size` is the current photo's size, `None` before one loads.
    fn dispatch(&mut self, event: &InputEvent, image_size: Option<(f32, f32)>) -> Dispatch {
        let control = match event {
            InputEvent::Key {
                key,
                state: KeyState::Pressed,
                ..
            } => ControlAction::from_key(*key)
                .map(|action| self.apply_action(action))
                .unwrap_or_default(),

            InputEvent::FileDropped(path) => return Dispatch::Load(path.clone()),

            _ => match (self.recognizer.handle(event), image_size) {
                (Some(gesture), Some(size)) => {
                    self.controller.apply(&mut self.camera, gesture, size);
                    AppControl::Redraw
                }
                // Gestures only make sense against a loaded photo.
                _ => AppControl::Continue,
            },
        };
        Dispatch::Control(control)
    }
}

impl App for ViewerApp {
    fn on_start(&mut self, ctx: &mut FrameCtx<'_, '_>) {
        if let Some(path) = self.initial_image.take() {
            self.load(&path, ctx);
        } else {
            log::info!("no image given; drop one onto the window");
        }
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        match self.dispatch(event, ctx.renderer.image_size()) {
            Dispatch::Control(control) => control,
            Dispatch::Load(path) => self.load(&path, ctx),
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        ctx.render(self.controls.settings(), &self.camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo3d_engine::input::{
        Key, MouseButton, MouseButtonState, MouseWheelDelta, PointerButtonEvent, PointerMoveEvent,
    };
    use photo3d_engine::render::PrimitiveMode;

    const PHOTO: Option<(f32, f32)> = Some((400.0, 300.0));

    fn viewer() -> ViewerApp {
        ViewerApp::new(None, Controls::new(PrimitiveMode::Points, 5.0))
    }

    fn press(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            repeat: false,
        }
    }

    fn drag(app: &mut ViewerApp, from: (f32, f32), to: (f32, f32), image: Option<(f32, f32)>) {
        let button = |state| {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
            })
        };
        app.dispatch(&InputEvent::PointerMoved(PointerMoveEvent { x: from.0, y: from.1 }), image);
        app.dispatch(&button(MouseButtonState::Pressed), image);
        app.dispatch(&InputEvent::PointerMoved(PointerMoveEvent { x: to.0, y: to.1 }), image);
        app.dispatch(&button(MouseButtonState::Released), image);
    }

    #[test]
    fn mode_and_step_keys_leave_camera_alone() {
        let mut app = viewer();
        let before = app.camera;

        for key in [Key::Digit1, Key::Digit3, Key::ArrowUp, Key::ArrowDown, Key::Digit2] {
            assert_eq!(
                app.dispatch(&press(key), PHOTO),
                Dispatch::Control(AppControl::Redraw)
            );
        }
        assert_eq!(app.camera, before);
        assert_eq!(app.controls.settings().mode, PrimitiveMode::Points);
    }

    #[test]
    fn escape_exits() {
        assert_eq!(
            viewer().dispatch(&press(Key::Escape), PHOTO),
            Dispatch::Control(AppControl::Exit)
        );
    }

    #[test]
    fn dropped_file_is_loaded_without_touching_camera() {
        let mut app = viewer();
        drag(&mut app, (0.0, 0.0), (40.0, 0.0), PHOTO);
        let rotated = app.camera;

        let path = PathBuf::from("/tmp/next.png");
        assert_eq!(
            app.dispatch(&InputEvent::FileDropped(path.clone()), PHOTO),
            Dispatch::Load(path)
        );
        assert_eq!(app.camera, rotated);

        // A different photo size afterwards changes nothing until a gesture arrives.
        app.dispatch(&InputEvent::Focused(true), Some((1024.0, 768.0)));
        assert_eq!(app.camera, rotated);
    }

    #[test]
    fn pan_rotates_the_camera() {
        let mut app = viewer();
        drag(&mut app, (10.0, 10.0), (410.0, 10.0), PHOTO);
        assert!((app.camera.rotation_y() - 0.8).abs() < 1e-6);
        assert_eq!(app.camera.rotation_x(), 0.0);
    }

    #[test]
    fn pinch_and_wheel_zoom_the_camera() {
        let mut app = viewer();
        assert_eq!(
            app.dispatch(&InputEvent::Pinch(0.5), PHOTO),
            Dispatch::Control(AppControl::Redraw)
        );
        assert!((app.camera.field_of_view_deg() - 40.0).abs() < 1e-4);

        let wheel = InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 1.0 });
        assert_eq!(app.dispatch(&wheel, PHOTO), Dispatch::Control(AppControl::Redraw));
        assert!(app.camera.field_of_view_deg() < 40.0);
    }

    #[test]
    fn gestures_before_any_photo_are_ignored() {
        let mut app = viewer();
        let before = app.camera;
        drag(&mut app, (0.0, 0.0), (100.0, 50.0), None);
        let wheel = InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 3.0 });
        assert_eq!(app.dispatch(&wheel, None), Dispatch::Control(AppControl::Continue));
        assert_eq!(app.camera, before);
    }
}
