// src/cli/adapter.rs

//! Applies the engine's descriptors to the terminal: `colored` for output,
//! `dialoguer` for every prompt. Nothing here decides behavior; it only draws
//! what it is given and collects raw text.

use anyhow::Result;
use colored::*;
use dialoguer::{Confirm, Editor, Input, Password, Select, theme::ColorfulTheme};

use crate::{
    core::{
        coordinator::{DisplayRegion, SessionControl},
        form::{
            FieldDescriptor, FormDescriptor, NumberStep, TOGGLE_ON_VALUE, TextAreaWidget, Widget,
        },
        menu::{CommandRef, NavFragment, NavItem, NavTarget, capitalize_label},
    },
    models::{ServerConfiguration, Submission},
};

/// What the user picked in the navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Command(CommandRef),
    Settings,
    Quit,
}

/// Entries of the Settings submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChoice {
    ChangePassword,
    ReloadConfiguration,
    ReloadCommands,
    Logout,
    Login,
}

// --- HEADER / FOOTER ---

pub fn print_header(configuration: &ServerConfiguration) {
    let title = configuration
        .service_name
        .as_deref()
        .unwrap_or(t!("menu.default_title"));
    println!("\n{}", title.yellow().bold());
}

pub fn print_footer(configuration: &ServerConfiguration) {
    if let Some(footer) = &configuration.footer {
        println!("{}", footer.dimmed());
    }
}

// --- NAVIGATION ---

/// Prints the navigation as an ASCII tree.
pub fn print_navigation(navigation: &NavFragment, show_ids: bool) {
    if navigation.command_count() == 0 {
        println!("{}", t!("tree.empty").dimmed());
    }
    for (i, item) in navigation.items.iter().enumerate() {
        let is_last = i == navigation.items.len() - 1;
        print_nav_item(item, "", is_last, show_ids);
    }
}

fn print_nav_item(item: &NavItem, prefix: &str, is_last: bool, show_ids: bool) {
    let connector = if is_last { "└─" } else { "├─" };

    let label = match &item.target {
        NavTarget::Submenu(_) => capitalize_label(&item.label).cyan().bold().to_string(),
        NavTarget::OpenCommand(command) => {
            let mut text = capitalize_label(&item.label);
            if !command.info.description.is_empty() {
                text = format!("{} {}", text, format!("- {}", command.info.description).dimmed());
            }
            text
        }
        NavTarget::Settings => t!("menu.settings").yellow().to_string(),
    };
    let id_marker = match (&item.id, show_ids) {
        (Some(id), true) => format!(" [{}]", id).dimmed().to_string(),
        _ => String::new(),
    };

    println!("{}{}{}{}", prefix, connector, label, id_marker);

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    if let NavTarget::Submenu(submenu) = &item.target {
        for (i, child) in submenu.items.iter().enumerate() {
            let is_last_child = i == submenu.items.len() - 1;
            print_nav_item(child, &child_prefix, is_last_child, show_ids);
        }
    }
}

fn entry_label(item: &NavItem) -> String {
    match &item.target {
        NavTarget::Submenu(_) => format!("{} ▸", capitalize_label(&item.label)),
        NavTarget::OpenCommand(_) => capitalize_label(&item.label),
        NavTarget::Settings => t!("menu.settings").to_string(),
    }
}

/// Walks the navigation until the user opens a command, opens Settings or quits.
/// Escape goes up one level.
pub fn navigate(root: &NavFragment) -> Result<Selection> {
    let theme = ColorfulTheme::default();
    let mut stack: Vec<&NavFragment> = vec![root];

    loop {
        let Some(current) = stack.last().copied() else {
            return Ok(Selection::Quit);
        };

        let mut labels: Vec<String> = current.items.iter().map(entry_label).collect();
        let back_index = if stack.len() > 1 {
            labels.push(t!("menu.back").to_string());
            Some(labels.len() - 1)
        } else {
            None
        };
        labels.push(t!("menu.quit").to_string());
        let quit_index = labels.len() - 1;

        let choice = Select::with_theme(&theme)
            .with_prompt(t!("menu.prompt"))
            .items(&labels)
            .default(0)
            .interact_opt()?;

        match choice {
            None if stack.len() > 1 => {
                stack.pop();
            }
            None => return Ok(Selection::Quit),
            Some(i) if i == quit_index => return Ok(Selection::Quit),
            Some(i) if Some(i) == back_index => {
                stack.pop();
            }
            Some(i) => match &current.items[i].target {
                NavTarget::Submenu(submenu) => stack.push(submenu),
                NavTarget::OpenCommand(command) => return Ok(Selection::Command(command.clone())),
                NavTarget::Settings => return Ok(Selection::Settings),
            },
        }
    }
}

/// The Settings submenu. The session entry follows the coordinator's control.
pub fn choose_setting(control: SessionControl) -> Result<Option<SettingsChoice>> {
    let session_entry = match control {
        SessionControl::Logout => (SettingsChoice::Logout, t!("settings.logout")),
        SessionControl::Login => (SettingsChoice::Login, t!("settings.login")),
    };
    let entries = [
        (SettingsChoice::ChangePassword, t!("settings.change_password")),
        (SettingsChoice::ReloadConfiguration, t!("settings.reload_configuration")),
        (SettingsChoice::ReloadCommands, t!("settings.reload_commands")),
        session_entry,
    ];
    let labels: Vec<&str> = entries.iter().map(|(_, label)| *label).collect();

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("menu.settings"))
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|i| entries[i].0))
}

// --- FORMS ---

pub fn print_command_header(command: &CommandRef) {
    println!("\n--- {} ---", command.path().yellow());
    if let Some(version) = &command.info.version {
        println!("  {:<12} {}", t!("form.label.version").blue(), version);
    }
    if !command.info.description.is_empty() {
        println!("  {:<12} {}", t!("form.label.description").blue(), command.info.description);
    }
}

fn describe_widget(widget: &Widget) -> String {
    match widget {
        Widget::Select(select) => {
            let entries: Vec<String> = select
                .entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let text = if entry.submittable {
                        entry.value.clone()
                    } else {
                        format!("({})", entry.label)
                    };
                    if select.selected == Some(i) {
                        format!("*{}*", text)
                    } else {
                        text
                    }
                })
                .collect();
            format!("{} [{}]", t!("form.widget.select"), entries.join(", "))
        }
        Widget::TextArea(text) => {
            let mut out = t!("form.widget.text").to_string();
            if text.min_length.is_some() || text.max_length.is_some() {
                out.push_str(&format!(
                    " {}..{}",
                    bound_text(&text.min_length),
                    bound_text(&text.max_length)
                ));
            }
            if !text.initial.is_empty() {
                out.push_str(&format!(" = \"{}\"", text.initial));
            }
            out
        }
        Widget::Number(number) => {
            let kind = match number.step {
                NumberStep::Integer => t!("form.widget.integer"),
                NumberStep::Any => t!("form.widget.number"),
            };
            let mut out = kind.to_string();
            if number.min.is_some() || number.max.is_some() {
                out.push_str(&format!(
                    " [{}..{}]",
                    bound_text(&number.min),
                    bound_text(&number.max)
                ));
            }
            if !number.initial.is_empty() {
                out.push_str(&format!(" = {}", number.initial));
            }
            out
        }
        Widget::Toggle(toggle) => {
            let state = if toggle.checked {
                t!("form.widget.on")
            } else {
                t!("form.widget.off")
            };
            format!("{} ({})", t!("form.widget.toggle"), state)
        }
    }
}

fn bound_text(bound: &Option<serde_json::Number>) -> String {
    bound.as_ref().map(|n| n.to_string()).unwrap_or_default()
}

/// Prints the synthesized widgets of a form.
pub fn print_form(form: &FormDescriptor) {
    if form.fields.is_empty() {
        println!("\n  {}", t!("form.no_options").dimmed());
    } else {
        println!("\n  {}:", t!("form.label.options").blue());
    }
    for field in &form.fields {
        let marker = if field.requires_value() { "*" } else { " " };
        println!(
            "    {}{:<18} {}",
            marker.red(),
            field.name.cyan(),
            describe_widget(&field.widget)
        );
        if !field.description.is_empty() {
            println!("      {}", field.description.dimmed());
        }
    }
    for diagnostic in &form.diagnostics {
        println!(
            "    {}",
            format!(
                t!("form.warning.skipped_option"),
                option = diagnostic.option,
                tag = diagnostic.type_tag
            )
            .yellow()
        );
    }
}

/// What one field prompt produced.
enum Answer {
    Value(String),
    /// The field submits nothing.
    Nothing,
    /// The user pressed Escape; the whole form is abandoned.
    Cancel,
}

/// Prompts for every field. `Ok(None)` when the user declines to submit, backs
/// out of a prompt, or the form has a field nothing can satisfy.
pub fn prompt_form(form: &FormDescriptor) -> Result<Option<Submission>> {
    let theme = ColorfulTheme::default();
    let mut submission = Submission::new();

    for diagnostic in &form.diagnostics {
        println!(
            "{}",
            format!(
                t!("form.warning.skipped_option"),
                option = diagnostic.option,
                tag = diagnostic.type_tag
            )
            .yellow()
        );
    }

    if let Some(field) = form.unsatisfiable_field() {
        println!(
            "{}",
            format!(t!("form.error.unsatisfiable"), field = field.label).red()
        );
        return Ok(None);
    }

    for field in &form.fields {
        if !field.description.is_empty() {
            println!("{}", field.description.dimmed());
        }
        match prompt_field(&theme, field)? {
            Answer::Value(value) => {
                submission.insert(field.name.clone(), value);
            }
            Answer::Nothing => {}
            Answer::Cancel => return Ok(None),
        }
    }

    let confirmed = Confirm::with_theme(&theme)
        .with_prompt(t!("form.confirm_submit"))
        .default(true)
        .interact()?;
    Ok(confirmed.then_some(submission))
}

fn prompt_field(theme: &ColorfulTheme, field: &FieldDescriptor) -> Result<Answer> {
    let prompt = if field.requires_value() {
        format!("{} *", field.label)
    } else {
        field.label.clone()
    };

    match &field.widget {
        Widget::Select(select) => {
            if select.entries.is_empty() {
                return Ok(Answer::Nothing);
            }
            let labels: Vec<&str> = select.entries.iter().map(|e| e.label.as_str()).collect();
            loop {
                let Some(index) = Select::with_theme(theme)
                    .with_prompt(&prompt)
                    .items(&labels)
                    .default(select.selected.unwrap_or(0))
                    .interact_opt()?
                else {
                    return Ok(Answer::Cancel);
                };
                let entry = &select.entries[index];
                if entry.submittable {
                    return Ok(Answer::Value(entry.value.clone()));
                }
                if !field.requires_value() {
                    return Ok(Answer::Nothing);
                }
                println!("{}", format!(t!("form.error.required"), field = field.label).red());
            }
        }
        Widget::TextArea(text) => prompt_text_area(theme, field, &prompt, text).map(Answer::Value),
        Widget::Number(number) => {
            prompt_text(theme, field, &prompt, &number.initial).map(Answer::Value)
        }
        Widget::Toggle(toggle) => {
            let Some(on) = Confirm::with_theme(theme)
                .with_prompt(&prompt)
                .default(toggle.checked)
                .interact_opt()?
            else {
                return Ok(Answer::Cancel);
            };
            Ok(if on {
                Answer::Value(TOGGLE_ON_VALUE.to_string())
            } else {
                Answer::Nothing
            })
        }
    }
}

/// Multi-line text goes through `$EDITOR`; a single line can be typed inline.
fn prompt_text_area(
    theme: &ColorfulTheme,
    field: &FieldDescriptor,
    prompt: &str,
    text: &TextAreaWidget,
) -> Result<String> {
    let use_editor = Confirm::with_theme(theme)
        .with_prompt(format!(t!("form.prompt.use_editor"), field = field.label))
        .default(text.initial.contains('\n'))
        .interact()?;
    if !use_editor {
        return prompt_text(theme, field, prompt, &text.initial);
    }

    let mut current = text.initial.clone();
    loop {
        if let Some(edited) = Editor::new().edit(&current)? {
            current = edited.trim_end_matches(['\r', '\n']).to_string();
        }
        match field.check(Some(current.as_str())) {
            Ok(()) => return Ok(current),
            Err(issue) => println!("{}", issue.to_string().red()),
        }
    }
}

fn prompt_text(
    theme: &ColorfulTheme,
    field: &FieldDescriptor,
    prompt: &str,
    initial: &str,
) -> Result<String> {
    let value = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            field.check(Some(input.as_str())).map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(value)
}

// --- CREDENTIALS ---

pub fn prompt_credentials(username: Option<String>) -> Result<(String, String)> {
    let theme = ColorfulTheme::default();
    let username = match username {
        Some(name) => name,
        None => Input::<String>::with_theme(&theme)
            .with_prompt(t!("login.prompt.username"))
            .interact_text()?,
    };
    let password = Password::with_theme(&theme)
        .with_prompt(t!("login.prompt.password"))
        .interact()?;
    Ok((username, password))
}

pub fn prompt_new_password() -> Result<String> {
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("password.prompt.new"))
        .with_confirmation(t!("password.prompt.confirm"), t!("password.error.mismatch"))
        .interact()?;
    Ok(password)
}

// --- RESULT AREA ---

pub fn show_waiting() {
    println!("{}", t!("result.waiting").dimmed());
}

/// Draws the result area: status line, service code, body, statistics and the
/// "Login Again" affordance.
pub fn show_display(region: &DisplayRegion) {
    if let Some(view) = &region.result {
        let status = match &view.message {
            Some(message) => format!("{} {}", view.status, message),
            None => view.status.to_string(),
        };
        let status = if view.ok {
            status.green().bold()
        } else {
            status.red().bold()
        };
        println!("\n{} {}", t!("result.label.status").blue(), status);
        if let Some(code) = view.code {
            println!("{} {}", t!("result.label.code").blue(), code);
        }
        println!("{}", "---------------------------------".dimmed());
        print!("{}", view.body);
        if !view.body.ends_with('\n') {
            println!();
        }
        if let Some(statistics) = &view.statistics {
            println!("{}", t!("result.label.statistics").blue());
            print!("{}", statistics);
        }
    }
    if region.login_again {
        println!("\n{}", t!("result.login_again").yellow().bold());
    }
}
