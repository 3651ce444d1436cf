//=========================================================================
// Audio Pull Bridge
//=========================================================================
//
// Pull-model audio output: the host's mixer invokes a registered
// callback every time it needs more samples, and the bridge forwards
// the destination buffer verbatim to the external fill function. No
// buffering, no resampling, no error checking of its own.
//
// Threading: the host drives the pull callback from its own
// audio-rendering thread, concurrently with the UI thread. The fill
// function must therefore be `Send` and must not assume UI-thread
// affinity; protecting state it shares with window callbacks is the
// external runtime's job, not this layer's.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== AudioSpec ===========================================================

/// Playback format requested at session open.
///
/// Samples are 32-bit floats in host-native byte order; the host picks
/// the buffer size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpec {
    /// Frames per second (e.g. 44100).
    pub sample_rate: u32,

    /// Interleaved channel count (e.g. 2 for stereo).
    pub channels: u8,
}

//=== Fill Function =======================================================

/// The external fill function, with its caller context captured.
///
/// Invoked on the host's audio thread with the destination buffer; the
/// slice carries the buffer pointer and size together, exactly as the
/// host handed them over.
pub type FillFn = Box<dyn FnMut(&mut [f32]) + Send>;

//=== Backend Traits ======================================================

/// A running host audio stream.
pub trait AudioStream {
    /// Stops playback. The host makes no further pull invocations after
    /// this returns.
    fn stop(&mut self);
}

/// Host audio driver capable of opening pull-model output streams.
pub trait AudioBackend {
    type Stream: AudioStream;

    /// Opens a stream at `spec`, registers `fill` as its pull callback,
    /// and starts playback immediately.
    ///
    /// Returns `None` when session initialization fails; no partial
    /// stream is leaked.
    fn open_stream(&mut self, spec: AudioSpec, fill: FillFn) -> Option<Self::Stream>;
}

//=== AudioOutput =========================================================

/// One playback session: a format paired with a running stream.
///
/// Playback starts at open and stops at [`close`](Self::close) (or
/// drop). Between the two, the host invokes the fill function at its
/// own cadence.
pub struct AudioOutput<S: AudioStream> {
    stream: Option<S>,
    spec: AudioSpec,
}

impl<S: AudioStream> AudioOutput<S> {
    //--- Construction -----------------------------------------------------

    /// Opens a playback session on `backend` at `spec`.
    ///
    /// `fill` is registered as the pull callback and playback starts
    /// before this returns. Yields `None` when the backend cannot
    /// initialize the session.
    pub fn open<B, F>(backend: &mut B, spec: AudioSpec, fill: F) -> Option<Self>
    where
        B: AudioBackend<Stream = S>,
        F: FnMut(&mut [f32]) + Send + 'static,
    {
        let stream = backend.open_stream(spec, Box::new(fill))?;
        debug!(
            target: "audio",
            "Audio output opened: {} Hz, {} channels",
            spec.sample_rate, spec.channels
        );
        Some(Self {
            stream: Some(stream),
            spec,
        })
    }

    /// The format the session was opened with.
    pub fn spec(&self) -> AudioSpec {
        self.spec
    }

    //--- Teardown ---------------------------------------------------------

    /// Stops playback and releases the session.
    pub fn close(mut self) {
        self.stop_stream();
    }

    fn stop_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!(target: "audio", "Audio output closed");
        }
    }
}

impl<S: AudioStream> Drop for AudioOutput<S> {
    fn drop(&mut self) {
        self.stop_stream();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    //--- Scripted Test Double ---------------------------------------------
    //
    // Backend that hands the registered fill function back to the test,
    // which then plays the host's audio thread itself.
    //

    struct LoanerStream {
        stopped: Arc<AtomicBool>,
    }

    impl AudioStream for LoanerStream {
        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
        }
    }

    struct LoanerBackend {
        fail: bool,
        loaned_fill: Option<FillFn>,
        stopped: Arc<AtomicBool>,
    }

    impl LoanerBackend {
        fn new() -> Self {
            Self {
                fail: false,
                loaned_fill: None,
                stopped: Arc::default(),
            }
        }
    }

    impl AudioBackend for LoanerBackend {
        type Stream = LoanerStream;

        fn open_stream(&mut self, _spec: AudioSpec, fill: FillFn) -> Option<LoanerStream> {
            if self.fail {
                return None;
            }
            self.loaned_fill = Some(fill);
            Some(LoanerStream {
                stopped: Arc::clone(&self.stopped),
            })
        }
    }

    //=====================================================================
    // Session Lifecycle
    //=====================================================================

    #[test]
    fn open_reports_requested_spec() {
        let mut backend = LoanerBackend::new();
        let spec = AudioSpec {
            sample_rate: 44100,
            channels: 2,
        };

        let output = AudioOutput::open(&mut backend, spec, |_: &mut [f32]| {})
            .expect("Backend accepts the session");

        assert_eq!(output.spec(), spec);
    }

    #[test]
    fn failed_open_yields_none_and_no_stream() {
        let mut backend = LoanerBackend::new();
        backend.fail = true;

        let output = AudioOutput::open(
            &mut backend,
            AudioSpec {
                sample_rate: 48000,
                channels: 1,
            },
            |_: &mut [f32]| {},
        );

        assert!(output.is_none(), "Failure must surface as None");
        assert!(backend.loaned_fill.is_none(), "No partial session leaked");
    }

    #[test]
    fn close_stops_the_stream() {
        let mut backend = LoanerBackend::new();
        let stopped = Arc::clone(&backend.stopped);

        let output = AudioOutput::open(
            &mut backend,
            AudioSpec {
                sample_rate: 44100,
                channels: 2,
            },
            |_: &mut [f32]| {},
        )
        .unwrap();
        output.close();

        assert!(stopped.load(Ordering::SeqCst), "Close must stop playback");
    }

    #[test]
    fn drop_also_stops_the_stream() {
        let mut backend = LoanerBackend::new();
        let stopped = Arc::clone(&backend.stopped);

        drop(
            AudioOutput::open(
                &mut backend,
                AudioSpec {
                    sample_rate: 44100,
                    channels: 2,
                },
                |_: &mut [f32]| {},
            )
            .unwrap(),
        );

        assert!(stopped.load(Ordering::SeqCst));
    }

    //=====================================================================
    // Pull Forwarding
    //=====================================================================

    #[test]
    fn ten_pulls_forward_each_buffer_size_in_order() {
        let mut backend = LoanerBackend::new();
        let (tx, rx) = unbounded();

        let _output = AudioOutput::open(
            &mut backend,
            AudioSpec {
                sample_rate: 44100,
                channels: 2,
            },
            move |buffer: &mut [f32]| {
                // Mark the buffer so the test can see it was the same
                // slice the host handed over.
                let len = buffer.len();
                if let Some(first) = buffer.first_mut() {
                    *first = len as f32;
                }
                let _ = tx.send(buffer.len());
            },
        )
        .unwrap();

        let mut fill = backend.loaned_fill.take().expect("Fill was registered at open");
        let sizes = [64usize, 128, 256, 100, 512, 32, 64, 2048, 16, 960];

        // Pull from a separate thread: the contract requires the fill
        // function to work off the UI thread.
        let pump = std::thread::spawn(move || {
            for &size in &sizes {
                let mut buffer = vec![0.0f32; size];
                fill(&mut buffer);
                assert_eq!(
                    buffer[0], size as f32,
                    "Fill must have written into the very buffer it was handed"
                );
            }
        });
        pump.join().expect("Pump thread must not panic");

        let delivered: Vec<usize> = rx.try_iter().collect();
        assert_eq!(delivered, sizes, "Every size forwarded unmodified, in order");
    }
}
