//! Widget tags.
//!
//! Forms are not rendered here; a widget is only a descriptive tag telling a
//! front end how a field is meant to be presented.

use std::fmt;

/// The presentation hint attached to a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetType {
    /// A single-line text box.
    TextInput,
    /// A numeric input.
    NumberInput,
    /// A multi-line text box.
    Textarea,
    /// A single checkbox.
    CheckboxInput,
    /// A drop-down list.
    Select,
    /// A multi-select list box.
    SelectMultiple,
    /// One checkbox per choice.
    CheckboxSelectMultiple,
    /// A file picker.
    FileInput,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::Textarea => "Textarea",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::SelectMultiple => "SelectMultiple",
            Self::CheckboxSelectMultiple => "CheckboxSelectMultiple",
            Self::FileInput => "FileInput",
        };
        f.write_str(name)
    }
}

impl WidgetType {
    /// Returns `true` for widgets that submit one value per selected choice.
    pub const fn is_multiple(self) -> bool {
        matches!(self, Self::SelectMultiple | Self::CheckboxSelectMultiple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(WidgetType::CheckboxSelectMultiple.to_string(), "CheckboxSelectMultiple");
        assert_eq!(WidgetType::FileInput.to_string(), "FileInput");
    }

    #[test]
    fn test_is_multiple() {
        assert!(WidgetType::CheckboxSelectMultiple.is_multiple());
        assert!(!WidgetType::Select.is_multiple());
    }
}
