//! Caller-frame resolver — used when a `Writer` is plugged into a generic
//! log sink and needs to report the user's true source file/line rather
//! than a frame inside the logging facade.
//!
//! Stack walking is inherently platform-specific; this implementation uses
//! the `backtrace` crate (the conventional portable choice in the Rust
//! ecosystem) and degrades to the `("???", 0)` sentinel whenever a frame
//! can't be resolved — stripped binaries, an exhausted stack, or simply no
//! debug info.

use backtrace::Backtrace;

/// Returned when the requested frame doesn't exist or can't be resolved.
pub const SENTINEL_FILE: &str = "???";

/// Walks the call stack to find a caller's true source location.
pub struct CallerResolver {
    /// Substring identifying the logging facade's source directory; frames
    /// whose file path contains this are skipped by
    /// `get_caller_ignoring_log_multi`.
    facade_substring: String,
}

impl CallerResolver {
    pub fn new(facade_substring: impl Into<String>) -> Self {
        Self {
            facade_substring: facade_substring.into(),
        }
    }

    /// `(file, line)` of the stack frame `skip` levels above the caller of
    /// this function. Returns the sentinel if the stack isn't that deep.
    pub fn get_caller(&self, skip: usize) -> (String, u32) {
        match self.caller_frames().get(skip) {
            Some((file, line)) => (file.clone(), *line),
            None => (SENTINEL_FILE.to_string(), 0),
        }
    }

    /// Like `get_caller`, but first discards every frame whose file path
    /// contains the configured logging-facade substring, so a generic sink
    /// adapter reports the application's call site rather than its own.
    pub fn get_caller_ignoring_log_multi(&self, skip: usize) -> (String, u32) {
        let relevant: Vec<_> = self
            .caller_frames()
            .into_iter()
            .filter(|(file, _)| !file.contains(&self.facade_substring))
            .collect();

        match relevant.get(skip) {
            Some((file, line)) => (file.clone(), *line),
            None => (SENTINEL_FILE.to_string(), 0),
        }
    }

    /// Capture a backtrace and drop every frame belonging to this resolver
    /// itself, however many frames that turns out to be after inlining —
    /// counting a fixed skip depth would be fragile across build profiles,
    /// so frames are dropped by matching this type's own symbol name
    /// instead.
    fn caller_frames(&self) -> Vec<(String, u32)> {
        let backtrace = Backtrace::new();
        let mut frames = Vec::new();
        let mut still_inside_resolver = true;

        for frame in backtrace.frames() {
            for symbol in frame.symbols() {
                let name = symbol
                    .name()
                    .map(|n| n.to_string())
                    .unwrap_or_default();

                if still_inside_resolver {
                    if name.contains("CallerResolver") || name.contains("caller_frames") {
                        continue;
                    }
                    still_inside_resolver = false;
                }

                if let Some(filename) = symbol.filename() {
                    frames.push((filename.display().to_string(), symbol.lineno().unwrap_or(0)));
                }
            }
        }

        frames
    }
}
