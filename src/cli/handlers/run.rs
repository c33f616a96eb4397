// src/cli/handlers/run.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::*;

use crate::{
    cli::{
        GlobalOptions, adapter,
        args::{RunArgs, parse_assignment},
        handlers::commons::{self, AppContext},
    },
    core::{
        coordinator::Coordinator,
        form::{self, FormDescriptor},
    },
    models::Submission,
    system::transport::Transport,
};

/// Submits one command without the menu. The form's initial values are sent
/// as a browser would send them, overlaid with the `name=value` pairs given.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let context = AppContext::load(options)?;
    let transport = context.transport()?;

    let tree = transport
        .fetch_command_tree(true)
        .with_context(|| t!("common.error.fetch_commands"))?;
    let command = commons::resolve_command(&tree, &run_args.command)?;
    let descriptor = form::synthesize(&command.info.options, &command.invocation_path);

    let submission = if run_args.interactive {
        adapter::print_command_header(&command);
        match adapter::prompt_form(&descriptor)? {
            Some(submission) => submission,
            None => {
                println!("{}", t!("form.cancelled").dimmed());
                return Ok(());
            }
        }
    } else {
        build_submission(&descriptor, &run_args.values)?
    };

    let issues = descriptor.check_submission(&submission);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  - {}", issue.to_string().red());
        }
        return Err(anyhow!(t!("run.error.invalid_input")));
    }

    let mut coordinator = Coordinator::new();
    adapter::show_waiting();
    let display = commons::submit_command(&transport, &mut coordinator, &command, &submission)?;
    adapter::show_display(display);

    if display.succeeded() {
        Ok(())
    } else {
        Err(anyhow!(format!(
            t!("run.error.failed"),
            command = run_args.command
        )))
    }
}

/// The initial submission of `form` with `name=value` overrides applied.
pub fn build_submission(form: &FormDescriptor, values: &[String]) -> Result<Submission> {
    let mut submission = form.initial_submission();
    for raw in values {
        let (name, value) = parse_assignment(raw)
            .ok_or_else(|| anyhow!(format!(t!("run.error.bad_assignment"), value = raw)))?;
        if form.field(name).is_none() {
            return Err(anyhow!(format!(
                t!("run.error.unknown_option"),
                name = name,
                command = form.invocation_path
            )));
        }
        submission.insert(name.to_string(), value.to_string());
    }
    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cli::handlers::commons::fixtures::sample_tree, cli::handlers::commons::resolve_command};

    fn deploy_form() -> FormDescriptor {
        let tree = sample_tree();
        let command = resolve_command(&tree, "deploy/web").unwrap();
        form::synthesize(&command.info.options, &command.invocation_path)
    }

    #[test]
    fn test_initial_values_are_submitted() {
        let submission = build_submission(&deploy_form(), &[]).unwrap();
        assert_eq!(submission.get("replicas").map(String::as_str), Some("2"));
        // required select without default: placeholder, nothing submitted
        assert!(submission.get("env").is_none());
        // unchecked toggle
        assert!(submission.get("force").is_none());
    }

    #[test]
    fn test_overrides_replace_initial_values() {
        let form = deploy_form();
        let submission = build_submission(
            &form,
            &["replicas=5".to_string(), "env=prod".to_string(), "force=true".to_string()],
        )
        .unwrap();
        assert_eq!(submission.get("replicas").map(String::as_str), Some("5"));
        assert_eq!(submission.get("env").map(String::as_str), Some("prod"));
        assert_eq!(submission.get("force").map(String::as_str), Some("true"));
        assert!(form.check_submission(&submission).is_empty());
    }

    #[test]
    fn test_missing_required_select_is_reported() {
        let form = deploy_form();
        let submission = build_submission(&form, &[]).unwrap();
        let issues = form.check_submission(&submission);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("env"));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let err = build_submission(&deploy_form(), &["colour=blue".to_string()]).unwrap_err();
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_malformed_assignment_is_rejected() {
        let err = build_submission(&deploy_form(), &["replicas".to_string()]).unwrap_err();
        assert!(err.to_string().contains("replicas"));
    }
}
