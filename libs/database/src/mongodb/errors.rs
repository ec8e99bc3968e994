use mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server error code for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Whether `err` is a unique-index violation, whether it came back from a
/// plain insert (write error) or from `findAndModify` (command error).
pub fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mongodb::options::ClientOptions;

    #[tokio::test]
    async fn test_non_server_errors_are_not_duplicates() {
        let err = ClientOptions::parse("not-a-mongo-url").await.unwrap_err();
        assert!(!is_duplicate_key(&err));
    }
}
