//! Resolve command implementation

use kh_config::{ContextResolver, ResolvedContext, ResolverSettings};

use crate::cli::OutputFormat;
use crate::error::Result;

/// Resolve `section` and print the context to stdout.
pub fn run_resolve(settings: &ResolverSettings, section: &str, format: OutputFormat) -> Result<()> {
    let context = ContextResolver::new(settings).resolve_section(section)?;
    print!("{}", render(&context, format)?);
    Ok(())
}

/// Render a context in the requested format, newline-terminated.
pub fn render(context: &ResolvedContext, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Yaml => serde_yaml::to_string(context)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(context)?;
            json.push('\n');
            json
        }
    };
    Ok(text)
}
