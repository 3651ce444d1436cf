//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Binds the core bridge logic to concrete host toolkits.
//
// Architecture:
// ```text
//  UI Thread:                          Any Thread:
//  ┌───────────────────────────┐      ┌──────────────────┐
//  │  Winit Event Loop         │      │  WindowHandle    │
//  │   ↓                       │      │   set_title      │
//  │  HostShell                │      │   set_size       │
//  │   ├─ EventTranslator      │      │   destroy        │
//  │   │   (WindowEvent →      │      └────────┬─────────┘
//  │   │    Message)           │               │ commands
//  │   ↓                       │  ◄────────────┘ (MPSC)
//  │  MessageSink::dispatch    │
//  │   ↓ Forward | Consume     │
//  │  default handling or not  │
//  └───────────────────────────┘
// ```
//
// Dispatch is synchronous on the UI thread, one message at a time, in
// delivery order. Window mutations arriving from other threads travel
// over the command channel and are applied on the UI thread between
// dispatches, so no command ever races an in-flight dispatch — that is
// the whole teardown guarantee for `destroy`.
//
// Submodules:
// - `translate`: Winit event → Message conversion
// - `joystick`:  gilrs-backed device bridge driver
// - `audio_out`: cpal-backed audio pull driver
//
//=========================================================================

//=== Submodules ==========================================================

pub mod audio_out;
pub mod joystick;
mod translate;

//=== External Crates =====================================================

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::dispatch::{DispatchControl, MessageSink};
use translate::EventTranslator;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are typically fatal - if the event loop can't be created,
/// the shell cannot run.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error (rare, indicates corruption).
    EventLoopExecution(winit::error::EventLoopError),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=== WindowCommand =======================================================

/// Window mutations requested from outside the UI thread.
#[derive(Debug, Clone)]
enum WindowCommand {
    SetTitle(String),
    SetSize(u16, u16),
    Destroy,
}

//=== WindowHandle ========================================================

/// Thread-safe handle to the shell's window.
///
/// The thin forwarding surface: each method queues one command for the
/// UI thread; nothing happens until the event loop picks it up between
/// dispatches. If the shell is gone the command is dropped with a
/// warning - callers racing shutdown get best-effort semantics, never
/// a panic.
#[derive(Debug, Clone)]
pub struct WindowHandle {
    commands: Sender<WindowCommand>,
}

impl WindowHandle {
    /// Replaces the window title.
    pub fn set_title(&self, title: impl Into<String>) {
        self.send(WindowCommand::SetTitle(title.into()));
    }

    /// Resizes the window content area.
    pub fn set_size(&self, width: u16, height: u16) {
        self.send(WindowCommand::SetSize(width, height));
    }

    /// Destroys the window and exits the event loop.
    ///
    /// Serialized onto the UI thread, so no dispatch is in flight when
    /// teardown begins. This is the operation the `close` callback is
    /// expected to invoke once the runtime decides to shut down.
    pub fn destroy(&self) {
        self.send(WindowCommand::Destroy);
    }

    fn send(&self, command: WindowCommand) {
        if self.commands.send(command).is_err() {
            warn!(target: "platform", "Shell gone, dropping window command");
        }
    }
}

//=== HostShell ===========================================================

/// Winit-backed window shell feeding a [`MessageSink`].
///
/// Owns the native window and the sink; every Winit event it classifies
/// is translated into a [`Message`](crate::core::message::Message) and
/// dispatched synchronously. `DispatchControl::Consume` skips the
/// default handling for that event — today that only matters for close
/// requests, where default handling would exit the loop.
///
/// # Lifecycle
///
/// 1. `HostShell::new(sink, title, w, h)` — no window yet
/// 2. `shell.run()` — starts the event loop (blocks until destroy)
/// 3. Winit delivers events; the sink's callbacks fire on this thread
/// 4. Some callback invokes [`WindowHandle::destroy`] — loop exits
pub struct HostShell<S: MessageSink> {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    /// Consumer of the translated message stream.
    sink: S,

    /// Winit event → Message conversion with button/cursor tracking.
    translator: EventTranslator,

    /// Commands queued by `WindowHandle`s on other threads.
    commands: Receiver<WindowCommand>,

    /// Initial window attributes, applied at `resumed()`.
    title: String,
    size: (u16, u16),
}

impl<S: MessageSink> HostShell<S> {
    //--- Construction -----------------------------------------------------

    /// Creates a shell around `sink` plus a cloneable window handle.
    ///
    /// Does not create the window yet - that happens lazily in
    /// `resumed()`.
    pub fn new(sink: S, title: impl Into<String>, width: u16, height: u16) -> (Self, WindowHandle) {
        let (tx, rx) = unbounded();
        info!(target: "platform", "Host shell initialized");

        let shell = Self {
            window: None,
            sink,
            translator: EventTranslator::new(),
            commands: rx,
            title: title.into(),
            size: (width, height),
        };
        (shell, WindowHandle { commands: tx })
    }

    /// Shared borrow of the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window is destroyed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while executing.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit
    /// requirement).
    pub fn run(mut self) -> Result<(), PlatformError> {
        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Applies queued window commands on the UI thread.
    fn drain_commands(&mut self, event_loop: &ActiveEventLoop) {
        loop {
            match self.commands.try_recv() {
                Ok(WindowCommand::SetTitle(title)) => {
                    if let Some(window) = &self.window {
                        window.set_title(&title);
                    }
                }
                Ok(WindowCommand::SetSize(width, height)) => {
                    if let Some(window) = &self.window {
                        let _ = window.request_inner_size(LogicalSize::new(width, height));
                    }
                }
                Ok(WindowCommand::Destroy) => {
                    info!(target: "platform", "Window destroy requested");
                    self.window = None;
                    event_loop.exit();
                    return;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return,
            }
        }
    }
}

//=== Winit Integration ===================================================

impl<S: MessageSink> ApplicationHandler for HostShell<S> {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.size.0, self.size.1));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{}",
                    window.inner_size().width,
                    window.inner_size().height
                );
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    /// Translates and dispatches per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let message = match &event {
            WindowEvent::CloseRequested => self.translator.close_requested(),
            WindowEvent::Focused(active) => self.translator.focus_changed(*active),
            WindowEvent::Occluded(hidden) => self.translator.minimize_changed(*hidden),
            WindowEvent::Resized(size) => self.translator.resized(size.width, size.height),
            WindowEvent::KeyboardInput { event: key, .. } => self.translator.key_event(
                key.physical_key,
                key.state,
                key.repeat,
                key.text.as_deref(),
            ),
            WindowEvent::MouseInput { state, button, .. } => {
                self.translator.mouse_button(*button, *state)
            }
            WindowEvent::CursorMoved { position, .. } => self
                .translator
                .cursor_moved(position.x as f32, position.y as f32),
            WindowEvent::MouseWheel { delta, .. } => self.translator.wheel(delta),
            _ => {
                // No message class; default handling only.
                return;
            }
        };

        let control = self.sink.dispatch(&message);

        // `Forward` means the host's default behavior still applies.
        // The only default we implement ourselves is teardown on close;
        // a consumed close leaves the window alive until a callback
        // asks for destruction explicitly.
        if control == DispatchControl::Forward {
            if let WindowEvent::CloseRequested = event {
                trace!(target: "platform", "Close forwarded to default handling");
                self.window = None;
                event_loop.exit();
            }
        }
    }

    /// Applies cross-thread window commands between dispatches.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.drain_commands(event_loop);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;

    //--- Counting Sink ----------------------------------------------------

    struct CountingSink {
        dispatched: usize,
    }

    impl MessageSink for CountingSink {
        fn dispatch(&mut self, _message: &Message) -> DispatchControl {
            self.dispatched += 1;
            DispatchControl::Forward
        }
    }

    //=====================================================================
    // Shell Construction
    //=====================================================================

    #[test]
    fn shell_creates_window_lazily() {
        let (shell, _handle) = HostShell::new(CountingSink { dispatched: 0 }, "test", 640, 480);

        assert!(shell.window.is_none(), "Window must be created in resumed()");
        assert_eq!(shell.sink().dispatched, 0);
    }

    //=====================================================================
    // WindowHandle
    //=====================================================================

    #[test]
    fn handle_survives_shell_teardown() {
        let (shell, handle) = HostShell::new(CountingSink { dispatched: 0 }, "test", 640, 480);
        drop(shell);

        // Channel is disconnected; commands are dropped with a warning,
        // never a panic.
        handle.set_title("late");
        handle.set_size(1, 1);
        handle.destroy();
    }

    #[test]
    fn handle_queues_commands_for_the_ui_thread() {
        let (shell, handle) = HostShell::new(CountingSink { dispatched: 0 }, "test", 640, 480);

        handle.set_title("renamed");
        handle.destroy();

        let queued: Vec<WindowCommand> = shell.commands.try_iter().collect();
        assert_eq!(queued.len(), 2, "Both commands wait for the UI thread");
        assert!(matches!(queued[0], WindowCommand::SetTitle(ref t) if t == "renamed"));
        assert!(matches!(queued[1], WindowCommand::Destroy));
    }

    //=====================================================================
    // PlatformError
    //=====================================================================

    #[test]
    fn platform_error_implements_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }
}
