//! Write options passed through to clients.

/// Options for a create call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Validate and return the would-be object without persisting it.
    pub dry_run: bool,
    /// Name of the actor making the change.
    pub field_manager: Option<String>,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn field_manager(mut self, manager: impl Into<String>) -> Self {
        self.field_manager = Some(manager.into());
        self
    }
}

/// Options for an update call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    pub dry_run: bool,
    pub field_manager: Option<String>,
}

impl UpdateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn field_manager(mut self, manager: impl Into<String>) -> Self {
        self.field_manager = Some(manager.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builders() {
        let opts = CreateOptions::new().dry_run(true).field_manager("operator");
        assert!(opts.dry_run);
        assert_eq!(opts.field_manager.as_deref(), Some("operator"));

        let opts = UpdateOptions::new();
        assert!(!opts.dry_run);
        assert!(opts.field_manager.is_none());
    }
}
