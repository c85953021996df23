//! Exceptions attached to a log record

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Error value shared between a record and the reports built from it
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;

/// Shared handle to an error attached to a record's context
///
/// Cloning is cheap and keeps pointing at the same error, so whatever the
/// logging side attached is exactly what the reporting side receives.
#[derive(Clone)]
pub struct ExceptionRef {
    class: String,
    error: SharedError,
}

impl ExceptionRef {
    /// Takes ownership of an error, remembering its type name as the class
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            class: short_type_name(std::any::type_name::<E>()),
            error: Arc::new(error),
        }
    }

    /// Wraps an already shared error
    pub fn from_arc(class: impl Into<String>, error: SharedError) -> Self {
        Self {
            class: class.into(),
            error,
        }
    }

    /// Copies a borrowed error and its source chain
    ///
    /// Used where only a reference is available (e.g. tracing fields). The
    /// class of each link is derived from its `Debug` output.
    pub fn capture(error: &(dyn Error + 'static)) -> Self {
        let captured = CapturedError::from_dyn(error);
        Self {
            class: captured.class.clone(),
            error: Arc::new(captured),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    /// Walks `source()` links below the top-level error as `(class, message)`
    pub fn causes(&self) -> Vec<(String, String)> {
        let mut causes = Vec::new();
        let mut current = self.error.source();
        while let Some(cause) = current {
            let class = match cause.downcast_ref::<CapturedError>() {
                Some(captured) => captured.class.clone(),
                None => class_from_debug(cause),
            };
            causes.push((class, cause.to_string()));
            current = cause.source();
        }
        causes
    }

    /// True when both handles point at the same error value
    pub fn ptr_eq(&self, other: &ExceptionRef) -> bool {
        Arc::ptr_eq(&self.error, &other.error)
    }
}

impl fmt::Debug for ExceptionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionRef")
            .field("class", &self.class)
            .field("message", &self.error.to_string())
            .finish()
    }
}

impl fmt::Display for ExceptionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class, self.error)
    }
}

/// Owned copy of a borrowed error chain
#[derive(Debug)]
struct CapturedError {
    class: String,
    message: String,
    source: Option<Box<CapturedError>>,
}

impl CapturedError {
    fn from_dyn(error: &(dyn Error + 'static)) -> Self {
        if let Some(captured) = error.downcast_ref::<CapturedError>() {
            return captured.duplicate();
        }

        Self {
            class: class_from_debug(error),
            message: error.to_string(),
            source: error.source().map(|s| Box::new(CapturedError::from_dyn(s))),
        }
    }

    fn duplicate(&self) -> Self {
        Self {
            class: self.class.clone(),
            message: self.message.clone(),
            source: self.source.as_ref().map(|s| Box::new(s.duplicate())),
        }
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for CapturedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|s| s as &(dyn Error + 'static))
    }
}

/// `std::io::Error` -> `Error`, `my_crate::ParseError<T>` -> `ParseError<T>`
fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    let generics = &full[base.len()..];
    let short = base.rsplit("::").next().unwrap_or(base);
    format!("{}{}", short, generics)
}

/// Leading identifier of a `Debug` rendering, e.g. `Os { code: 2, .. }` -> `Os`
fn class_from_debug(error: &dyn Error) -> String {
    let debug = format!("{:?}", error);
    let ident: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        "Error".to_string()
    } else {
        ident
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct DiskFull {
        source: std::io::Error,
    }

    impl fmt::Display for DiskFull {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "disk full")
        }
    }

    impl Error for DiskFull {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.source)
        }
    }

    fn disk_full() -> DiskFull {
        DiskFull {
            source: std::io::Error::other("no space left on device"),
        }
    }

    #[test]
    fn test_new_uses_short_type_name() {
        let exception = ExceptionRef::new(disk_full());
        assert_eq!(exception.class(), "DiskFull");
        assert_eq!(exception.message(), "disk full");
        assert_eq!(exception.to_string(), "DiskFull: disk full");
    }

    #[test]
    fn test_causes_walk_the_source_chain() {
        let exception = ExceptionRef::new(disk_full());
        let causes = exception.causes();
        assert_eq!(causes.len(), 1);
        assert_eq!(causes[0].0, "Custom");
        assert_eq!(causes[0].1, "no space left on device");
    }

    #[test]
    fn test_clone_shares_the_error() {
        let exception = ExceptionRef::new(disk_full());
        let copy = exception.clone();
        assert!(exception.ptr_eq(&copy));

        let other = ExceptionRef::new(disk_full());
        assert!(!exception.ptr_eq(&other));
    }

    #[test]
    fn test_capture_copies_the_chain() {
        let original = disk_full();
        let captured = ExceptionRef::capture(&original);

        assert_eq!(captured.class(), "DiskFull");
        assert_eq!(captured.message(), "disk full");
        assert_eq!(captured.causes().len(), 1);
        assert_eq!(captured.causes()[0].1, "no space left on device");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("std::io::error::Error"), "Error");
        assert_eq!(short_type_name("Plain"), "Plain");
        assert_eq!(short_type_name("a::b::Wrapper<a::Inner>"), "Wrapper<a::Inner>");
    }
}
