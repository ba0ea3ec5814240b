pub use puffin;

/// Starts a new profiler frame. Called once per simulation tick by the driver.
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

/// Scopes are off by default so instrumented code costs next to nothing until a
/// profiler is attached.
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
}

pub fn is_enabled() -> bool {
    puffin::are_scopes_on()
}

#[macro_export]
macro_rules! profile_function {
    () => {
        $crate::puffin::profile_function!();
    };
    ($data:expr) => {
        $crate::puffin::profile_function!($data);
    };
}

#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        $crate::puffin::profile_scope!($name);
    };
    ($name:expr, $data:expr) => {
        $crate::puffin::profile_scope!($name, $data);
    };
}
