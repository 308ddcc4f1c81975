use super::{open_app, prompt_password, prompt_text};
use crate::{
    libs::{error::AuthError, messages::Message},
    msg_error, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    username: Option<String>,
    #[arg(short, long)]
    email: Option<String>,
}

pub fn cmd(args: ResetPasswordArgs) -> Result<()> {
    let mut app = open_app()?;
    let username = match args.username {
        Some(username) => username,
        None => prompt_text(Message::PromptUsername, None)?,
    };
    let email = match args.email {
        Some(email) => email,
        None => prompt_text(Message::PromptEmail, None)?,
    };
    let password = prompt_password(Message::PromptNewPassword, true)?;

    match app.auth().reset_password(&username, &email, &password) {
        Ok(()) => msg_success!(Message::PasswordResetDone(username)),
        Err(AuthError::Store(e)) => return Err(e.into()),
        Err(_) => msg_error!(Message::PasswordResetFailed),
    }
    Ok(())
}
