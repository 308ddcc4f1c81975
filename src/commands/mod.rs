pub mod attendance;
pub mod init;
pub mod login;
pub mod product;
pub mod reset_password;
pub mod signup;
pub mod summary;
pub mod task;
pub mod user;

use crate::libs::app::App;
use crate::libs::config::Config;
use crate::libs::error::AuthError;
use crate::libs::formatter;
use crate::libs::messages::Message;
use crate::libs::user::{User, UserProfile};
use crate::{msg_debug, msg_error, msg_print};
use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input, Password};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Check credentials and record a login")]
    Login(login::LoginArgs),
    #[command(about = "Create a regular account")]
    Signup,
    #[command(about = "Set a new password using the account email")]
    ResetPassword(reset_password::ResetPasswordArgs),
    #[command(about = "Manage user accounts (administrators only)")]
    User(user::UserArgs),
    #[command(about = "Manage the product inventory")]
    Product(product::ProductArgs),
    #[command(about = "Manage tasks")]
    Task(task::TaskArgs),
    #[command(about = "Record and review attendance")]
    Attendance(attendance::AttendanceArgs),
    #[command(about = "Show statistics across all collections")]
    Summary,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Login(args) => login::cmd(args),
            Commands::Signup => signup::cmd(),
            Commands::ResetPassword(args) => reset_password::cmd(args),
            Commands::User(args) => user::cmd(args),
            Commands::Product(args) => product::cmd(args),
            Commands::Task(args) => task::cmd(args),
            Commands::Attendance(args) => attendance::cmd(args),
            Commands::Summary => summary::cmd(),
        }
    }
}

/// Opens every collection from the configured data directory.
pub(crate) fn open_app() -> Result<App> {
    let config = Config::read()?;
    let app = App::from_config(&config)?;
    msg_debug!(format!("Using data directory {}", app.data_dir().display()));
    Ok(app)
}

/// Prints the user-facing form of a rejected login. Storage failures are
/// returned instead.
pub(crate) fn report_auth_error(error: AuthError) -> Result<()> {
    match error {
        AuthError::InvalidCredentials => msg_error!(Message::InvalidCredentials),
        AuthError::Locked { until } => {
            msg_error!(Message::AccountLocked(formatter::display_timestamp(until.as_ref())))
        }
        AuthError::Store(e) => return Err(e.into()),
    }
    Ok(())
}

/// Prompts for administrator credentials. Returns `None` after printing the
/// reason when the login fails or the account is not an administrator.
pub(crate) fn login_admin(app: &mut App) -> Result<Option<User>> {
    msg_print!(Message::AdminLoginHeader);
    let username = prompt_text(Message::PromptUsername, None)?;
    let password = prompt_password(Message::PromptPassword, false)?;

    let user = match app.auth().login(&username, &password) {
        Ok(user) => user,
        Err(e) => {
            report_auth_error(e)?;
            return Ok(None);
        }
    };
    if !user.is_admin {
        msg_error!(Message::AdminRequired);
        return Ok(None);
    }
    Ok(Some(user))
}

pub(crate) fn prompt_text(prompt: Message, default: Option<String>) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt.to_string());
    if let Some(default) = default {
        input = input.default(default).allow_empty(true);
    }
    Ok(input.interact_text()?)
}

pub(crate) fn prompt_password(prompt: Message, confirm: bool) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut password = Password::with_theme(&theme).with_prompt(prompt.to_string());
    if confirm {
        password = password.with_confirmation(Message::PromptPasswordConfirm.to_string(), Message::PasswordMismatch.to_string());
    }
    Ok(password.interact()?)
}

pub(crate) fn prompt_profile() -> Result<UserProfile> {
    Ok(UserProfile {
        full_name: prompt_text(Message::PromptFullName, None)?,
        email: prompt_text(Message::PromptEmail, None)?,
        department: prompt_text(Message::PromptDepartment, Some(String::new()))?,
        position: prompt_text(Message::PromptPosition, Some(String::new()))?,
        phone_number: prompt_text(Message::PromptPhoneNumber, Some(String::new()))?,
    })
}
