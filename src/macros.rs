// Logging macros that compile to nothing unless the 'logging' feature is
// enabled. They're used in place of the 'log' crate's macros directly so that
// call sites don't need to be guarded individually.

macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) }
}
