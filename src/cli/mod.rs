use clap::Parser;

pub mod adapter;
pub mod args;
pub mod dispatcher;
pub mod handlers;

/// Builds the color-aware help text from the `<tag>` markup in the locale file.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// cdash: a terminal dashboard for a remote command service.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = build_help_string(),
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Server base URL; overrides `server_url` from config.toml.
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// The action to run. Defaults to the interactive menu.
    #[arg()]
    pub action: Option<String>,

    /// Arguments for the action, parsed by its handler.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Options that apply to every action.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub server: Option<String>,
}
