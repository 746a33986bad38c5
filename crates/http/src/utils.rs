//! Small helpers shared by the codec.

/// Returns `Err($error)` from the enclosing function unless `$predicate` holds.
///
/// ```ignore
/// ensure!(head_size <= MAX_HEADER_BYTES, ParseError::too_large_header(head_size, MAX_HEADER_BYTES));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
