//! `sysexits.h`-style process exit codes (§10.5).

use flowmind_error::{FlowmindError, FlowmindErrorKind};

pub const EX_OK: i32 = 0;
pub const EX_DATAERR: i32 = 65;
pub const EX_SOFTWARE: i32 = 70;

/// Map a kernel error to the exit code the `run` subcommand reports.
#[must_use]
pub fn for_error(error: &FlowmindError) -> i32 {
    match error.kind() {
        FlowmindErrorKind::Validation => EX_DATAERR,
        _ => EX_SOFTWARE,
    }
}
