//! Per-call configuration.

/// What record and mapping assignment do when one field or entry fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OnFieldError {
    /// Stop at the first failing field and return its error.
    #[default]
    Abort,
    /// Log the failure, keep copying the remaining fields, and return every
    /// failure at the end as one `Collected` error.
    CollectAndContinue,
}

/// Options for [`copy_with`](crate::copy_with).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CopyOptions {
    pub on_field_error: OnFieldError,
}

impl CopyOptions {
    /// Default options: abort on the first failure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field-error policy.
    pub fn on_field_error(mut self, policy: OnFieldError) -> Self {
        self.on_field_error = policy;
        self
    }
}
