//! Canonical logging macros
//!
//! Every catalog operation logs one `start` and exactly one of `end` /
//! `end_error`, all tagged with the same `op`.

/// Log the start of an operation
///
/// ```
/// # use ambrosia_core::log_op_start;
/// log_op_start!("fetch_recipes");
/// log_op_start!("get_recipe", recipe_id = "abc-123");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = ambrosia_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = ambrosia_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use ambrosia_core::log_op_end;
/// log_op_end!("fetch_recipes", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = ambrosia_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = ambrosia_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// ```
/// # use ambrosia_core::{log_op_error, errors::{AmError, AmErrorKind}};
/// let err = AmError::new(AmErrorKind::NotFound);
/// log_op_error!("get_recipe", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::AmError;
        let am_err: AmError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = ambrosia_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?am_err.kind(),
            err_code = am_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::AmError;
        let am_err: AmError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = ambrosia_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?am_err.kind(),
            err_code = am_err.code(),
            $($field)*
        );
    }};
}
