//=========================================================================
// Mullion — Library Root
//
// Translation shim between a host operating system's windowing/event
// subsystem and a stable, toolkit-agnostic callback contract.
//
// Responsibilities:
// - Normalize the host's heterogeneous window message stream into a
//   fixed set of callback entry points (`core::dispatch`)
// - Track the exclusive current rendering context (`core::context`)
// - Bridge polling joystick input and pull-model audio output
//   (`core::device`, `core::audio`)
// - Bind those contracts to concrete host toolkits (`platform`)
//
// Typical usage:
// ```no_run
// use mullion::core::{WindowCallbacks, WindowDispatcher};
// use mullion::platform::HostShell;
//
// struct App;
// impl WindowCallbacks for App {
//     fn close(&mut self) { /* decide when to destroy the window */ }
// }
//
// fn main() {
//     let dispatcher = WindowDispatcher::new(App);
//     let (shell, _window) = HostShell::new(dispatcher, "app", 800, 600);
//     shell.run().unwrap();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds all bridge logic, independent of any host toolkit.
// `platform` holds the host bindings (Winit window shell, gilrs
// joystick driver, cpal audio driver) that feed and implement the core
// traits.
//
pub mod core;
pub mod platform;

//--- Convenience ---------------------------------------------------------

pub mod prelude;
