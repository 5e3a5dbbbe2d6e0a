//! Display macros for user-facing terminal output.
//!
//! Everything here goes to stdout in CLI mode and to stderr in JSON mode.

#[macro_export]
macro_rules! display_print {
    ($($arg:tt)*) => {{
        use $crate::output::{current_mode, writer::write_output};
        let _ = write_output(current_mode(), format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! display_println {
    () => {
        $crate::display_print!("\n")
    };
    ($($arg:tt)*) => {{
        use $crate::output::{current_mode, writer::writeln_output};
        let _ = writeln_output(current_mode(), format_args!($($arg)*));
    }};
}

/// A completed action, prefixed with a green check mark
#[macro_export]
macro_rules! display_success {
    ($($arg:tt)*) => {
        $crate::display_println!(
            "{} {}",
            ::console::style("✓").green().bold(),
            format_args!($($arg)*)
        )
    };
}

/// A recoverable problem the user can act on
#[macro_export]
macro_rules! display_warning {
    ($($arg:tt)*) => {
        $crate::display_println!(
            "{} {}",
            ::console::style("⚠").yellow().bold(),
            format_args!($($arg)*)
        )
    };
}
