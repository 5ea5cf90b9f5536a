//! Editor settings.

/// Behavior switches for a [`crate::ConfigEditor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorSettings {
    /// Re-fetch a tier after it was saved, so identifiers assigned by the
    /// backend (e.g. a new rule's developer name) show up in the draft.
    pub reload_after_save: bool,
}

impl EditorSettings {
    /// Reads settings from environment variables with sensible defaults.
    ///
    /// | Variable                    | Default |
    /// |-----------------------------|---------|
    /// | `CASCADE_RELOAD_AFTER_SAVE` | `true`  |
    pub fn from_env() -> Self {
        Self {
            reload_after_save: std::env::var("CASCADE_RELOAD_AFTER_SAVE")
                .map(|v| parse_switch(&v))
                .unwrap_or(true),
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            reload_after_save: true,
        }
    }
}

/// Anything but an explicit "off" spelling counts as on.
fn parse_switch(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reloads_after_save() {
        assert!(EditorSettings::default().reload_after_save);
    }

    #[test]
    fn off_spellings() {
        assert!(!parse_switch("false"));
        assert!(!parse_switch(" OFF "));
        assert!(!parse_switch("0"));
        assert!(parse_switch("true"));
        assert!(parse_switch("yes"));
    }
}
