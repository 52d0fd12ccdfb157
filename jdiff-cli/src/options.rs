//! Resolution of display and version flags into comparison settings.

use jdiff_core::{ComparisonRules, OutputStyle, SourceVersion};

/// Settings resolved from command-line flags and configuration defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub brief: bool,
    pub context: bool,
    pub highlight: bool,
    pub from_source: SourceVersion,
    pub to_source: SourceVersion,
    /// Display name for the first file, from the first `-L`.
    pub first_file_name: Option<String>,
    /// Display name for the second file, from the second `-L`.
    pub second_file_name: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            brief: false,
            context: false,
            highlight: false,
            from_source: SourceVersion::DEFAULT,
            to_source: SourceVersion::DEFAULT,
            first_file_name: None,
            second_file_name: None,
        }
    }
}

impl Options {
    /// Apply the display flags. Highlighting turns brief output off, and
    /// context output turns highlighting on and brief output off, whatever
    /// order the flags were given in.
    pub fn with_display(mut self, brief: bool, context: bool, highlight: bool) -> Self {
        self.brief = brief;
        self.context = context;
        self.highlight = highlight;
        if self.highlight {
            self.brief = false;
        }
        if self.context {
            self.highlight = true;
            self.brief = false;
        }
        self
    }

    /// Apply the source versions. `source` sets both sides and wins over
    /// `from`/`to`; configuration values fill in what the flags leave unset.
    pub fn with_versions(
        mut self,
        from: Option<&str>,
        to: Option<&str>,
        source: Option<&str>,
        defaults: (Option<&str>, Option<&str>),
    ) -> jdiff_core::Result<Self> {
        let from = source.or(from).or(defaults.0);
        let to = source.or(to).or(defaults.1);
        if let Some(v) = from {
            self.from_source = v.parse()?;
        }
        if let Some(v) = to {
            self.to_source = v.parse()?;
        }
        Ok(self)
    }

    /// Take up to two display names, in order.
    pub fn with_names(mut self, names: &[String]) -> Self {
        let mut it = names.iter().cloned();
        self.first_file_name = it.next();
        self.second_file_name = it.next();
        self
    }

    pub fn output_style(&self) -> OutputStyle {
        if self.context {
            OutputStyle::Context
        } else if self.brief {
            OutputStyle::Brief
        } else {
            OutputStyle::NoContext
        }
    }

    pub fn rules(&self) -> ComparisonRules {
        ComparisonRules::for_versions(self.from_source, self.to_source)
    }
}
