//! Status and transport classification for retry decisions.

use reqwest::StatusCode;
use std::error::Error;
use std::io;

/// How a response status participates in the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusClass {
    /// 200: decode the body.
    Ok,
    /// 502, 503, 504: transient server-side condition.
    Unavailable,
    /// 302, 307: the documented redirect-to-HTML server defect.
    Redirect,
    /// Anything else: fatal.
    Unexpected,
}

pub(crate) fn classify_status(status: StatusCode) -> StatusClass {
    match status {
        StatusCode::OK => StatusClass::Ok,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            StatusClass::Unavailable
        }
        StatusCode::FOUND | StatusCode::TEMPORARY_REDIRECT => StatusClass::Redirect,
        _ => StatusClass::Unexpected,
    }
}

/// Whether a transport failure may clear up on retry.
///
/// Capability probes only: the transport's own timeout signal, or an
/// underlying io condition (connection reset or aborted) left by a
/// transient peer-side drop. Connection refused and DNS failures are
/// not transient.
pub(crate) fn is_transient_transport(source: &reqwest::Error) -> bool {
    if source.is_timeout() {
        return true;
    }
    matches!(
        io_error_kind(source),
        Some(io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted)
    )
}

/// Walks the source chain looking for the underlying io error.
fn io_error_kind(err: &(dyn Error + 'static)) -> Option<io::ErrorKind> {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = cause.source();
    }
    None
}
