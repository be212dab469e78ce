//! Logging macros. Context values may be any `Display` type.

/// Log an error with a code, an optional span and `"key" => value` context
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, span = $span:expr) => {
        $crate::logging::log_error_with_context($code, $message, Some($span), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            None,
            vec![$(($key, format!("{}", $value))),+],
        )
    };

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            Some($span),
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}

/// Log a success code with optional context
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_success_with_context(
            $code,
            $message,
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::info($message),
            vec![],
        )
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::info($message),
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::warning($message),
            vec![],
        )
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::warning($message),
            vec![$(($key, format!("{}", $value))),+],
        )
    };
}

/// Debug events skip formatting their context entirely unless the
/// active logger lets them through.
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::log_with_context($crate::logging::LogEvent::debug($message), vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::debug($message),
                vec![$(($key, format!("{}", $value))),+],
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    // Expands every arm; logging is a no-op until the global service exists.
    #[test]
    fn test_macro_arms_expand() {
        let length: usize = 300;
        let path = std::path::PathBuf::from("model.one");

        log_error!(codes::lexical::IDENTIFIER_TOO_LONG, "Identifier too long");
        log_error!(codes::lexical::IDENTIFIER_TOO_LONG, "Identifier too long",
            "length" => length,
            "file" => path.display(),
        );
        log_success!(codes::success::TOKENIZATION_COMPLETE, "done", "tokens" => 12);
        log_info!("Processing", "large" => length > 100);
        log_warning!("Suspicious input");
        log_debug!("Scope push", "depth" => 3, "identifier" => "A");
    }
}
