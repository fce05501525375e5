//! Exit codes for precise CI triage.

use stepmark_core::{ConfigurationError, Error};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_GENERIC_FAIL: i32 = 1;
pub const EXIT_CONFIGURATION_FAIL: i32 = 2;

/// Map an error to the process exit code.
///
/// Configuration failures (bad dimensions, non-converging compression) get
/// their own code so CI can tell "the requested system cannot be built" from
/// a crashed run. The check walks the whole cause chain, so `context`
/// wrapping never hides the code.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if is_configuration(err) {
        EXIT_CONFIGURATION_FAIL
    } else {
        EXIT_GENERIC_FAIL
    }
}

fn is_configuration(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        // the umbrella's transparent variant hides the inner error from the
        // chain, so match both shapes
        cause.downcast_ref::<ConfigurationError>().is_some()
            || matches!(
                cause.downcast_ref::<Error>(),
                Some(Error::Configuration(_))
            )
    })
}
