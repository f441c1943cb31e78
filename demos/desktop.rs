use anyhow::Result;
use glam::{Vec2, vec2};
use sill::{
    DragController, InputTracker, Key, KeyChord, Viewport, WindowConfig, WindowId, WindowStore,
    WindowsBinding,
};
use winit::{
    event::{ElementState, Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

// No renderer in this demo, so every surface gets a fixed footprint for
// hit-testing.
const SURFACE_SIZE: Vec2 = Vec2::new(320.0, 240.0);

fn main() -> Result<()> {
    sill::init_logging();

    let event_loop = EventLoop::new()?;
    let os_window = WindowBuilder::new()
        .with_title("sill desktop demo — n spawns, ctrl+c closes the hovered window")
        .build(&event_loop)?;

    let initial = os_window.inner_size();
    let viewport = Viewport::new(initial.width as f32, initial.height as f32);
    let store = WindowStore::new(viewport.clone());
    let windows = WindowsBinding::new(&store);
    let mut tracker = InputTracker::new(viewport);
    let mut drag = DragController::new(store.clone());

    let spawn = KeyChord::bare(Key::Character("n".into()));
    let close = KeyChord::ctrl(Key::Character("c".into()));

    let mut cursor = Vec2::ZERO;
    let mut target: Option<WindowId> = None;

    event_loop.run(move |event, elwt| {
        let Event::WindowEvent { event, .. } = event else {
            return;
        };
        tracker.handle_window_event(&event);

        match &event {
            WindowEvent::CloseRequested => elwt.exit(),

            WindowEvent::KeyboardInput { event: key, .. }
                if key.state == ElementState::Pressed && !key.repeat =>
            {
                if spawn.matches(tracker.modifiers, &key.logical_key) {
                    let id = windows.push(WindowConfig::default());
                    log::info!("spawned window {id}");
                }
                if close.matches(tracker.modifiers, &key.logical_key) {
                    if let Some(id) = store.hovered_window() {
                        windows.pop(id);
                        log::info!("closed window {id}");
                        if target == Some(id) {
                            target = None;
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                cursor = vec2(position.x as f32, position.y as f32);

                // Keep the target locked while a drag is in flight, even if
                // the cursor briefly outruns the surface.
                let dragging = target.is_some_and(|id| {
                    store.state_snapshot(id).is_ok_and(|s| s.is_pressed)
                });
                if !dragging {
                    let hit = hit_test(&store, cursor);
                    if hit != target {
                        if let Some(prev) = target {
                            drag.pointer_out(prev);
                        }
                        if let Some(next) = hit {
                            drag.pointer_over(next);
                        }
                        target = hit;
                    }
                }

                if let Some(id) = target {
                    drag.pointer_move(id, cursor);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(id) = target {
                    match state {
                        ElementState::Pressed => drag.pointer_down(id, *button, cursor),
                        ElementState::Released => drag.pointer_up(id, *button),
                    }
                }
            }

            _ => {}
        }

        if windows.is_dirty() {
            let ids: Vec<String> = windows
                .snapshot()
                .iter()
                .map(|w| w.id.to_string())
                .collect();
            log::info!("live windows: [{}]", ids.join(", "));
        }
    })?;

    Ok(())
}

fn hit_test(store: &WindowStore, cursor: Vec2) -> Option<WindowId> {
    // Topmost = latest pushed, hence the reverse scan.
    store
        .snapshot()
        .iter()
        .rev()
        .find(|w| {
            store.state_snapshot(w.id).is_ok_and(|s| {
                cursor.x >= s.pos.x
                    && cursor.x <= s.pos.x + SURFACE_SIZE.x
                    && cursor.y >= s.pos.y
                    && cursor.y <= s.pos.y + SURFACE_SIZE.y
            })
        })
        .map(|w| w.id)
}
