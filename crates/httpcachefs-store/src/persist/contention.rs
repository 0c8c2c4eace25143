//! Transient lock contention detection
//!
//! A failure is transient when another process briefly holds the target or
//! staging file. Classification prefers OS error codes; the message text is
//! consulted only when the error carries no code. Contention reported under
//! an unlisted code is misclassified as fatal and not retried.

use std::io;

/// `ERROR_ACCESS_DENIED`, `ERROR_SHARING_VIOLATION`, `ERROR_LOCK_VIOLATION`
#[cfg(windows)]
const CONTENTION_OS_CODES: &[i32] = &[5, 32, 33];

/// Busy files plus the permission errors an external lock surfaces as
#[cfg(unix)]
const CONTENTION_OS_CODES: &[i32] = &[libc::EBUSY, libc::ETXTBSY, libc::EACCES, libc::EPERM];

#[cfg(not(any(unix, windows)))]
const CONTENTION_OS_CODES: &[i32] = &[];

/// Lowercase message fragments, checked only for code-less errors
const CONTENTION_MESSAGE_FRAGMENTS: &[&str] = &[
    "being used by another process",
    "permission denied",
    "resource busy",
    "locked",
];

/// Classify an I/O error as transient lock contention.
///
/// Permission failures count as contention: a genuine misconfiguration
/// cannot be told apart from an external lock, and is retried in vain.
pub fn is_transient_contention(err: &io::Error) -> bool {
    if let Some(code) = err.raw_os_error() {
        return CONTENTION_OS_CODES.contains(&code);
    }
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    let message = err.to_string().to_lowercase();
    CONTENTION_MESSAGE_FRAGMENTS
        .iter()
        .any(|fragment| message.contains(fragment))
}
