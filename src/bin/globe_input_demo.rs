//! Globe Input Demo
//!
//! Run with: `cargo run --bin globe_input_demo [config.json]`
//!
//! Opens a window and routes its input through the globe input manager.
//! Nothing is drawn; every emitted action is logged as JSON (set
//! `RUST_LOG=debug` or `trace` for dispatch details).
//!
//! Controls:
//! - 1 / 2 / 3 / 4: Navigation / Place intel / Inspect intel / Measure
//! - Navigation: drag to rotate, scroll or +/- to zoom, arrows to rotate
//! - Place intel: click the globe to drop a marker, Esc to cancel the preview
//! - Inspect intel: hover and click markers, double-click for details
//! - Measure: click points, double-click or Enter to finish, Backspace to undo, Esc to clear

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use starcom_globe_engine::input::{
    ActionData, ActionEvent, ActionKind, CanvasSurface, InteractionMode, Subscription, SurfaceRect,
    WinitInputAdapter,
};
use starcom_globe_engine::{GlobeCamera, GlobeInputManager, GlobeScene, InputConfig, MarkerAnchor};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct AppState {
    window: Arc<Window>,
    canvas: Rc<CanvasSurface>,
    scene: Rc<RefCell<GlobeScene>>,
    manager: GlobeInputManager,
    adapter: WinitInputAdapter,
    /// Actions emitted during the last dispatch, applied afterwards
    pending: Rc<RefCell<Vec<ActionEvent>>>,
    _subscription: Subscription,
    markers_placed: usize,
}

impl AppState {
    fn new(window: Arc<Window>, config: InputConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let size = window.inner_size();
        let camera = GlobeCamera::new(size.width.max(1) as f32 / size.height.max(1) as f32);
        let scene = Rc::new(RefCell::new(GlobeScene::with_config(camera, &config)));

        let mut manager = GlobeInputManager::new(scene.clone(), config)?;
        let canvas = CanvasSurface::shared(SurfaceRect::from_size(size.width as f32, size.height as f32));
        manager.set_container(Some(canvas.clone()));

        let pending = Rc::new(RefCell::new(Vec::new()));
        let queue = pending.clone();
        let subscription = manager.on_any_action(move |event| queue.borrow_mut().push(event.clone()));

        let state = Self {
            window,
            canvas,
            scene,
            manager,
            adapter: WinitInputAdapter::new(),
            pending,
            _subscription: subscription,
            markers_placed: 0,
        };
        state.update_title();
        Ok(state)
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.canvas
            .set_bounds(SurfaceRect::from_size(size.width as f32, size.height as f32));
        self.scene.borrow_mut().camera_mut().resize(size.width, size.height);
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        if self.manager.set_mode(mode) {
            self.apply_pending();
            self.update_title();
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) {
        if let Some(raw) = self.adapter.translate(event) {
            let outcome = self.manager.handle_raw(&raw);
            log::trace!("[Demo] {:?} -> {:?}", raw.event_type, outcome.status);
            self.apply_pending();
        }
    }

    /// Apply and log the actions emitted by the last dispatch.
    fn apply_pending(&mut self) {
        let actions: Vec<ActionEvent> = self.pending.borrow_mut().drain(..).collect();

        for action in actions {
            match action.to_json() {
                Ok(json) => log::info!("[Action] {}", json),
                Err(err) => log::warn!("[Action] {} (unserializable: {})", action.action, err),
            }

            match (action.action, &action.data) {
                (ActionKind::IntelPlaceConfirm, ActionData::Placement { coordinate, .. }) => {
                    self.markers_placed += 1;
                    let id = format!("intel-{}", self.markers_placed);
                    log::info!(
                        "[Demo] Placed {} at ({:.2}, {:.2})",
                        id,
                        coordinate.latitude,
                        coordinate.longitude
                    );
                    self.scene.borrow_mut().add_marker(MarkerAnchor::new(id, *coordinate));
                }
                (ActionKind::MeasurementComplete, ActionData::Measurement { total_distance_km, .. }) => {
                    log::info!("[Demo] Measured {:.1} km", total_distance_km);
                }
                _ => {
                    self.scene.borrow_mut().camera_mut().apply_action(&action);
                }
            }
        }
    }

    fn update_title(&self) {
        let config = self.manager.current_mode_config();
        self.window.set_title(&format!(
            "Globe Input Demo - {} [{}] - {}",
            config.label,
            config.cursor.as_css(),
            config.hint
        ));
    }
}

fn mode_for_key(key: KeyCode) -> Option<InteractionMode> {
    match key {
        KeyCode::Digit1 => Some(InteractionMode::Navigation),
        KeyCode::Digit2 => Some(InteractionMode::IntelPlacement),
        KeyCode::Digit3 => Some(InteractionMode::IntelInspection),
        KeyCode::Digit4 => Some(InteractionMode::Measurement),
        _ => None,
    }
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

struct App {
    config: Option<InputConfig>,
    state: Option<AppState>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("[Globe Demo] Creating window...");
        let window_attrs = WindowAttributes::default()
            .with_title("Globe Input Demo")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("[Globe Demo] Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };

        let config = self.config.take().unwrap_or_default();
        match AppState::new(window, config) {
            Ok(state) => {
                log::info!("[Globe Demo] Ready! Press 1-4 to switch modes.");
                self.state = Some(state);
            }
            Err(err) => {
                log::error!("[Globe Demo] Failed to start input manager: {}", err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                state.manager.destroy();
                log::info!(
                    "[Globe Demo] Closing ({} listeners left attached)",
                    state.canvas.listener_count()
                );
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(new_size) => {
                state.resize(*new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                // Mode switching is the host's job, never the core's
                if let Some(mode) = mode_for_key(*key) {
                    state.set_mode(mode);
                    return;
                }
            }
            _ => {}
        }

        state.handle_window_event(&event);
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("=== Globe Input Demo ===");

    let config = match std::env::args().nth(1) {
        Some(path) => match InputConfig::load(&path) {
            Ok(config) => {
                log::info!("[Globe Demo] Loaded config from {}", path);
                config
            }
            Err(err) => {
                log::error!("[Globe Demo] {}; using defaults", err);
                InputConfig::default()
            }
        },
        None => InputConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App {
        config: Some(config),
        state: None,
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}
