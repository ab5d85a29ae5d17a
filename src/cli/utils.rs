//! Shared terminal helpers for tool front-ends

use colored::*;

/// Display a user-friendly error message with suggestions
pub fn display_error_with_suggestions<E: std::fmt::Display>(
    error: &E,
    context: &str,
    app_name: Option<&str>,
) {
    let app = app_name.unwrap_or("tool");

    eprintln!("{} {}", "Error:".red().bold(), context);
    eprintln!("   {}", error.to_string().red());

    // Provide contextual suggestions based on error type
    let error_str = error.to_string().to_lowercase();
    if error_str.contains("unrecognized argument") || error_str.contains("invalid argument") {
        eprintln!("{}", "Suggestions:".blue());
        eprintln!("   • Run '{} --help' to list aliases and control flags", app);
        eprintln!(
            "   • Run '{} --help-all' to list every Class.attribute flag",
            app
        );
    } else if error_str.contains("config file") {
        eprintln!("{}", "Suggestions:".blue());
        eprintln!("   • Check the path passed to --config");
        eprintln!("   • Use one section per class, e.g. [MyTool] iterations = 3");
    } else if error_str.contains("alias") {
        eprintln!("{}", "Suggestions:".blue());
        eprintln!("   • Alias targets must be Class.attribute of a configurable attribute");
    }
}

