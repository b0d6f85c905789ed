//! API utilities for frontend-backend communication

/// Base URL of the backend: same host as the page, port 3000.
/// Empty string when there is no window (tests, workers).
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Error text shown to the user for a failed request
pub fn status_message(action: &str, status: u16) -> String {
    let reason = match status {
        400 => "invalid data",
        401 => "session expired, please log in again",
        403 => "you do not have permission for this action",
        404 => "not found",
        409 => "this email is already registered",
        500..=599 => "server error",
        _ => "unexpected response",
    };
    format!("{} failed: {} ({})", action, reason, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        assert_eq!(
            status_message("Delete user", 403),
            "Delete user failed: you do not have permission for this action (403)"
        );
        assert_eq!(
            status_message("Create user", 409),
            "Create user failed: this email is already registered (409)"
        );
        assert_eq!(
            status_message("Load users", 502),
            "Load users failed: server error (502)"
        );
        assert_eq!(status_message("X", 418), "X failed: unexpected response (418)");
    }
}
