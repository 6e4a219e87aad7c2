//! Transient notifications ("snackbars") raised by screens

use owo_colors::OwoColorize;

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl Toast {
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self { message, level }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }

    /// Render for a terminal
    pub fn render(&self) -> String {
        match self.level {
            ToastLevel::Info => self.message.cyan().to_string(),
            ToastLevel::Success => self.message.green().to_string(),
            ToastLevel::Error => self.message.red().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert!(Toast::error("Error fetching customers.").is_error());
        assert!(!Toast::success("Customer saved successfully!").is_error());
        assert_eq!(Toast::info("x").level, ToastLevel::Info);
    }

    #[test]
    fn test_render_keeps_message() {
        assert!(Toast::error("boom").render().contains("boom"));
    }
}
