use super::{open_app, prompt_password, prompt_profile, prompt_text};
use crate::{
    libs::{error::AuthError, messages::Message},
    msg_error, msg_success,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let mut app = open_app()?;

    let username = prompt_text(Message::PromptUsername, None)?;
    if app.users.exists(&username) {
        msg_error!(Message::UserAlreadyExists(username));
        return Ok(());
    }
    let password = prompt_password(Message::PromptPassword, true)?;
    let profile = prompt_profile()?;

    match app.auth().register(&username, &password, profile) {
        Ok(_) => msg_success!(Message::UserRegistered(username)),
        Err(AuthError::Store(e)) if e.is_duplicate() => msg_error!(Message::UserAlreadyExists(username)),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
