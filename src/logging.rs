//! Cross-platform diagnostic output for the crate's own failure paths.
//!
//! Writes to stderr on native targets and to the browser console on
//! WebAssembly. With the `logwise` cargo feature enabled, messages are routed
//! through the logwise structured logger instead, so they participate in
//! whatever log capture the host application has installed.
//!
//! This is deliberately not a logging framework: the crate only logs rare,
//! diagnostically useful events (a search that found nothing, a directory it
//! could not read), never per-call chatter.

pub fn log(message: &str) {
    #[cfg(feature = "logwise")]
    {
        logwise::debug_sync!("syskit: {message}", message = logwise::privacy::LogIt(message));
    }
    #[cfg(all(not(feature = "logwise"), not(target_arch = "wasm32")))]
    {
        eprintln!("{message}");
    }
    #[cfg(all(not(feature = "logwise"), target_arch = "wasm32"))]
    {
        use web_sys::console;
        console::log_1(&message.into());
    }
}
