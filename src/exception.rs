use std::{fmt::Write, panic::PanicHookInfo};

/// A crash that reached the handler, either a panic or a fatal error that
/// made it all the way to the top of the application
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exception {
    kind: String,
    message: String,
    location: Option<String>,
    thread: Option<String>,
    backtrace: String,
    cause: Option<Box<Exception>>,
}

impl Exception {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            location: None,
            thread: None,
            backtrace: String::new(),
            cause: None,
        }
    }

    /// Builds an exception from the panic currently being processed by the
    /// panic hook, capturing a backtrace of the panicking thread
    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let payload = info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_owned()
        };

        let mut exception = Self::new("panic", message)
            .with_backtrace(format!("{:?}", backtrace::Backtrace::new()));

        exception.location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
        exception.thread = std::thread::current().name().map(String::from);
        exception
    }

    /// Builds an exception from an error, every `source` in the chain
    /// becomes a nested cause
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut exception = Self::error_chain(error);
        // Causes happened on the same thread, only the outermost says so
        exception.thread = std::thread::current().name().map(String::from);
        exception
    }

    fn error_chain(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut exception = Self::new("error", error.to_string());
        exception.cause = error
            .source()
            .map(|source| Box::new(Self::error_chain(source)));
        exception
    }

    pub fn with_cause(mut self, cause: Exception) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn with_backtrace(mut self, backtrace: String) -> Self {
        self.backtrace = backtrace;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_thread(mut self, thread: impl Into<String>) -> Self {
        self.thread = Some(thread.into());
        self
    }

    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    #[inline]
    pub fn cause(&self) -> Option<&Exception> {
        self.cause.as_deref()
    }

    /// Renders this exception only, causes are not included
    pub fn stack_trace(&self) -> String {
        let mut trace = String::with_capacity(self.backtrace.len() + 128);

        if let Some(thread) = &self.thread {
            let _ = write!(trace, "Exception in thread \"{}\" ", thread);
        }
        let _ = writeln!(trace, "{}: {}", self.kind, self.message);

        if let Some(location) = &self.location {
            let _ = writeln!(trace, "\tat {}", location);
        }

        for line in self.backtrace.lines() {
            let _ = writeln!(trace, "{}", line);
        }

        trace
    }
}
