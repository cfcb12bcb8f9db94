//! Semaphore API model types.

mod branch;
mod build;
mod commit;
mod deploy;
mod project;
mod server;
mod thread;
mod webhook;

pub use branch::*;
pub use build::*;
pub use commit::*;
pub use deploy::*;
pub use project::*;
pub use server::*;
pub use thread::*;
pub use webhook::*;

/// Replace every occurrence of `from` in the path of `url` with `to`.
/// The query string is left untouched.
pub(crate) fn replace_in_path(url: &str, from: &str, to: &str) -> String {
    match url.split_once('?') {
        Some((path, query)) => format!("{}?{query}", path.replace(from, to)),
        None => url.replace(from, to),
    }
}

#[cfg(test)]
mod tests {
    use super::replace_in_path;

    #[test]
    fn test_replace_in_path_keeps_query() {
        assert_eq!(
            replace_in_path("http://x/projects/login-id/1/status?auth_token=t", "/status", "/build"),
            "http://x/projects/login-id/1/build?auth_token=t"
        );
        assert_eq!(
            replace_in_path("http://x/projects/h/1/builds/4/log", "/log", "/stop"),
            "http://x/projects/h/1/builds/4/stop"
        );
    }

    #[test]
    fn test_replace_in_path_trailing_slash() {
        assert_eq!(
            replace_in_path("http://x/projects/h/1/status/", "/status", "/build"),
            "http://x/projects/h/1/build/"
        );
    }

    #[test]
    fn test_replace_in_path_without_segment_is_unchanged() {
        assert_eq!(
            replace_in_path("http://x/projects/h/1", "/status", "/build"),
            "http://x/projects/h/1"
        );
        assert_eq!(
            replace_in_path("http://x/projects/h/1?status=/status", "/status", "/build"),
            "http://x/projects/h/1?status=/status"
        );
    }
}
