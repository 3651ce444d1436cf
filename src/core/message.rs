//=========================================================================
// Host Message Model
//=========================================================================
//
// Toolkit-neutral representation of one message delivered by the host's
// window message loop.
//
// A message is a tagged union: a `MessageKind` discriminant ("what it
// is") plus an associative set of named, typed fields. Messages are
// consumed once per dispatch and never persisted.
//
// Decoding is best-effort by design: every `find_*` accessor returns an
// `Option`, and an absent or mistyped field decodes as `None`. The
// dispatcher gates each callback on the fields it needs, so an
// incomplete message yields a partial (or no) callback invocation
// rather than an error.
//
//=========================================================================

//=== MessageKind =========================================================

/// Discriminant of a host window message.
///
/// Mirrors the message classes the dispatcher cares about. Anything the
/// host delivers outside this set arrives as `Other` and passes through
/// to default handling untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// User or OS asked the window to close.
    QuitRequested,

    /// Window activation (focus) changed. Carries bool `active`.
    Activated,

    /// Window minimize state changed. Carries bool `minimize`.
    Minimized,

    /// Window was resized. Carries i32 `width` and `height`.
    Resized,

    /// Key pressed (key mapped to a code by the host).
    KeyDown,

    /// Key pressed that the host could not map to a code.
    UnmappedKeyDown,

    /// Key released.
    KeyUp,

    /// Unmapped key released.
    UnmappedKeyUp,

    /// Mouse button pressed. Carries i32 `buttons` bitmask and the
    /// cursor position.
    MouseDown,

    /// Mouse button released.
    MouseUp,

    /// Cursor moved. Carries point `where`.
    MouseMoved,

    /// Scroll wheel moved. Carries f32 `wheel_delta_y` / `wheel_delta_x`.
    WheelChanged,

    /// Any message kind the translation layer does not classify.
    Other(u32),
}

//=== Field ===============================================================

/// Typed value of one named message field.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Bool(bool),
    I32(i32),
    F32(f32),
    Str(String),
    Point(f32, f32),
}

//=== Message =============================================================

/// One host window message: discriminant plus named, typed fields.
///
/// Built by the platform translation layer (or directly by tests) with
/// the `with_*` builder methods, then handed to a
/// [`MessageSink`](crate::core::dispatch::MessageSink) exactly once.
///
/// Field lookup is a linear scan; messages carry at most a handful of
/// fields.
#[derive(Debug, Clone)]
pub struct Message {
    what: MessageKind,
    fields: Vec<(&'static str, Field)>,
}

impl Message {
    //--- Construction -----------------------------------------------------

    /// Creates an empty message of the given kind.
    pub fn new(what: MessageKind) -> Self {
        Self {
            what,
            fields: Vec::new(),
        }
    }

    /// The message discriminant.
    pub fn what(&self) -> MessageKind {
        self.what
    }

    //--- Builder ----------------------------------------------------------

    pub fn with_bool(mut self, name: &'static str, value: bool) -> Self {
        self.fields.push((name, Field::Bool(value)));
        self
    }

    pub fn with_i32(mut self, name: &'static str, value: i32) -> Self {
        self.fields.push((name, Field::I32(value)));
        self
    }

    pub fn with_f32(mut self, name: &'static str, value: f32) -> Self {
        self.fields.push((name, Field::F32(value)));
        self
    }

    pub fn with_str(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, Field::Str(value.into())));
        self
    }

    pub fn with_point(mut self, name: &'static str, x: f32, y: f32) -> Self {
        self.fields.push((name, Field::Point(x, y)));
        self
    }

    //--- Best-Effort Decoding ---------------------------------------------
    //
    // Absent field: None. Present but wrong type: also None. Callers gate
    // callback invocation on the fields that callback needs.
    //

    pub fn find_bool(&self, name: &str) -> Option<bool> {
        match self.find(name)? {
            Field::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn find_i32(&self, name: &str) -> Option<i32> {
        match self.find(name)? {
            Field::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn find_f32(&self, name: &str) -> Option<f32> {
        match self.find(name)? {
            Field::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn find_str(&self, name: &str) -> Option<&str> {
        match self.find(name)? {
            Field::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn find_point(&self, name: &str) -> Option<(f32, f32)> {
        match self.find(name)? {
            Field::Point(x, y) => Some((*x, *y)),
            _ => None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn find(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|(_, field)| field)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
