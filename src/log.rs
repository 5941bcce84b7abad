//! Logging shims.
//!
//! Render code logs through `crate::log::{debug, warn}`. With the `tracing`
//! feature these are the `tracing` macros; without it they swallow their
//! arguments. The no-op macros live at the crate root under hidden names and
//! are imported here by path, since a bare `warn` would also name the
//! built-in lint attribute.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __lbx_debug {
    ($($field:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __lbx_warn {
    ($($field:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use crate::{__lbx_debug as debug, __lbx_warn as warn};

#[cfg(test)]
mod tests {
    use super::{debug, warn};

    #[test]
    fn macros_accept_fields_and_messages() {
        let tag = "draw:ellipse";
        debug!(tag, width = 3.5, "skipping element");
        warn!(%tag, "drawing an outline");
        warn!("plain message");
    }
}
