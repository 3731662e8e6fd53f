use console::style;
use pitstop_core::PitstopError;
use std::fmt;

/// Error with remediation hints for the terminal
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Attach remediation hints to a core error
pub fn from_core(err: &PitstopError) -> CliError {
    match err {
        PitstopError::DataUnavailable { location, reason } => {
            CliError::new("Could not load circuit data")
                .with_context(format!("{}\n{}", location, reason))
                .with_suggestion("Check your network connection if the data is remote")
                .with_suggestion("Point --data-url (or PITSTOP_DATA_URL) at a directory or URL holding the datasets")
                .with_suggestion("Run 'pitstop config' to see the resolved dataset locations")
        }
        PitstopError::NoCircuits => CliError::new("No circuits available")
            .with_context("The circuit dataset contains no features with a Name property")
            .with_suggestion("Verify PITSTOP_GEOJSON_FILE names the circuits GeoJSON"),
        PitstopError::ConfigInvalid { key, reason } => {
            CliError::new(format!("Invalid configuration value for '{}'", key))
                .with_context(reason.clone())
                .with_suggestion("Run 'pitstop config' to see where each value comes from")
        }
        PitstopError::ConfigMissing { key } => {
            CliError::new(format!("Missing configuration value '{}'", key))
                .with_suggestion("Set it in the config file or the matching PITSTOP_* variable")
        }
        other => CliError::new(other.to_string()),
    }
}
