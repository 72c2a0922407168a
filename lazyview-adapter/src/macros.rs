// Logging shims: forward to `tracing` under the `tracing` feature, no-ops otherwise.

#[cfg(feature = "tracing")]
macro_rules! lv_event {
    ($level:ident, $($tt:tt)*) => {
        tracing::$level!(target: "lazyview_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! lv_event {
    ($level:ident, $($tt:tt)*) => {};
}

macro_rules! ltrace {
    ($($tt:tt)*) => { lv_event!(trace, $($tt)*) };
}

macro_rules! ldebug {
    ($($tt:tt)*) => { lv_event!(debug, $($tt)*) };
}

macro_rules! lwarn {
    ($($tt:tt)*) => { lv_event!(warn, $($tt)*) };
}
